//! Presentation collaborator
//!
//! The driver calls into a `Presenter` for everything the player sees: screen
//! switching, HUD text, toasts, confetti and drawing. The browser build
//! implements it on top of the DOM and a 2D canvas; the native build logs.

use rand::Rng;

use crate::sim::GameState;

/// Toast visibility before it fades (ms)
pub const TOAST_DURATION_MS: u32 = 250;

/// Confetti pieces per celebration
pub const CONFETTI_COUNT: usize = 90;
/// Confetti palette
pub const CONFETTI_COLORS: [&str; 5] = ["#ffd84d", "#60a5fa", "#22c55e", "#f97316", "#a78bfa"];
/// Pieces remove themselves after this long (ms)
pub const CONFETTI_LIFETIME_MS: u32 = 6500;

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Game,
    Finish,
}

impl Screen {
    /// DOM id of the view
    pub fn element_id(self) -> &'static str {
        match self {
            Screen::Start => "screen-start",
            Screen::Game => "screen-game",
            Screen::Finish => "screen-over",
        }
    }
}

/// Toast colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Success => "#22c55e",
            Tone::Danger => "#ef4444",
        }
    }
}

/// Everything the game core asks of the presentation layer
pub trait Presenter {
    fn show_screen(&mut self, screen: Screen);

    /// HUD clock, in seconds
    fn set_time_display(&mut self, seconds: f32);

    fn set_collectible_count_display(&mut self, count: u32);

    /// Short-lived message; clears itself after `TOAST_DURATION_MS`
    fn notify_transient(&mut self, text: &str, tone: Tone);

    /// Final score on the finish screen
    fn set_final_time(&mut self, seconds: f32);

    /// Spawn confetti
    fn trigger_celebration(&mut self);

    /// Remove leftover confetti (on reset)
    fn clear_celebration(&mut self) {}

    /// Draw a frame of the session
    fn render(&mut self, state: &GameState, timestamp_ms: f64);
}

/// One falling confetti piece
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal start, percent of container width
    pub left_percent: f32,
    pub color: &'static str,
    /// Fall animation length (s)
    pub duration_secs: f32,
}

/// Roll `count` confetti pieces
pub fn confetti<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<ConfettiPiece> {
    (0..count)
        .map(|_| ConfettiPiece {
            left_percent: rng.random::<f32>() * 100.0,
            color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
            duration_secs: 4.0 + rng.random::<f32>() * 2.0,
        })
        .collect()
}

/// Presenter for headless runs: keeps the last HUD values and logs
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    pub screen: Option<Screen>,
    pub time: f32,
    pub jugs: u32,
    pub final_time: Option<f32>,
    pub frames: u64,
}

impl Presenter for HeadlessPresenter {
    fn show_screen(&mut self, screen: Screen) {
        log::debug!("Screen: {:?}", screen);
        self.screen = Some(screen);
    }

    fn set_time_display(&mut self, seconds: f32) {
        self.time = seconds;
    }

    fn set_collectible_count_display(&mut self, count: u32) {
        self.jugs = count;
    }

    fn notify_transient(&mut self, text: &str, _tone: Tone) {
        log::debug!("{} at {}", text, crate::format_seconds(self.time));
    }

    fn set_final_time(&mut self, seconds: f32) {
        self.final_time = Some(seconds);
    }

    fn trigger_celebration(&mut self) {
        log::info!("Finished in {}", crate::format_seconds(self.time));
    }

    fn render(&mut self, _state: &GameState, _timestamp_ms: f64) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_confetti_ranges() {
        let mut rng = Pcg32::seed_from_u64(17);
        let pieces = confetti(&mut rng, CONFETTI_COUNT);
        assert_eq!(pieces.len(), CONFETTI_COUNT);
        for piece in &pieces {
            assert!((0.0..100.0).contains(&piece.left_percent));
            assert!((4.0..6.0).contains(&piece.duration_secs));
            assert!(CONFETTI_COLORS.contains(&piece.color));
        }
        // Lifetime outlasts the longest fall
        assert!(CONFETTI_LIFETIME_MS as f32 / 1000.0 > 6.0);
    }

    #[test]
    fn test_screen_ids() {
        assert_eq!(Screen::Finish.element_id(), "screen-over");
        assert_eq!(Tone::Danger.color(), "#ef4444");
    }
}
