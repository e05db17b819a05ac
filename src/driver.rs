//! Game loop driver
//!
//! Owns the session and runs the state machine:
//!
//! ```text
//! Idle --start--> Running            (AutoRun)
//! Idle --start--> Armed --key--> Running   (HoldToMove)
//! Running --finish line--> Finished
//! any --reset--> Idle
//! ```
//!
//! The host calls `frame` once per display refresh and keeps scheduling while
//! it returns `FrameOutcome::Continue`. Resetting clears the active phase, so
//! the next frame returns `Stop` and the loop ends on its own.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::consts::{HAZARD_PENALTY, JUG_BONUS};
use crate::presenter::{Presenter, Screen, Tone};
use crate::sim::{Direction, GameEvent, GameState, InputState, SessionPhase, frame_delta, tick};

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

/// Session owner and frame scheduler
pub struct GameDriver<P: Presenter> {
    config: GameConfig,
    state: GameState,
    input: InputState,
    presenter: P,
    /// Draws one world seed per session
    seeder: Pcg32,
    last_frame_ms: Option<f64>,
}

impl<P: Presenter> GameDriver<P> {
    /// Build an idle session on the start screen with the world already placed
    pub fn new(config: GameConfig, presenter: P, seed: u64) -> Self {
        let config = config.sanitized();
        let mut seeder = Pcg32::seed_from_u64(config.seed.unwrap_or(seed));
        let state = GameState::new(&config, seeder.random());

        let mut driver = Self {
            config,
            state,
            input: InputState::new(),
            presenter,
            seeder,
            last_frame_ms: None,
        };
        driver.presenter.show_screen(Screen::Start);
        driver.refresh_hud();
        driver
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// The loop's continue predicate
    pub fn is_active(&self) -> bool {
        self.state.phase.is_active()
    }

    /// Fresh world, timer at zero, no frames wanted
    pub fn reset(&mut self) {
        let seed = self.seeder.random();
        self.state.reset(seed);
        self.input.clear();
        self.last_frame_ms = None;
        self.refresh_hud();
        self.presenter.clear_celebration();
        log::info!(
            "Session reset (seed {}): {} jugs, {} hazards",
            seed,
            self.state.jugs.len(),
            self.state.hazards.len()
        );
    }

    /// Reset and go back to the start screen
    pub fn reset_to_start(&mut self) {
        self.reset();
        self.presenter.show_screen(Screen::Start);
    }

    /// Reset and begin a run (Start / Play Again)
    pub fn start(&mut self) {
        self.reset();
        self.presenter.show_screen(Screen::Game);
        self.state.phase = if self.state.input_model.starts_armed() {
            SessionPhase::Armed
        } else {
            SessionPhase::Running
        };
        log::info!("Session started ({:?})", self.state.phase);
    }

    /// Directional key pressed. The first one of an armed session starts the clock.
    pub fn key_down(&mut self, direction: Direction) {
        if !self.is_active() {
            return;
        }
        self.arm_off();
        self.input.press(direction, self.state.input_model);
    }

    pub fn key_up(&mut self, direction: Direction) {
        self.input.release(direction);
    }

    /// Completed touch gesture (screen-space delta, px)
    pub fn swipe(&mut self, dx: f32, dy: f32) {
        if !self.is_active() {
            return;
        }
        let directions = self.input.swipe(dx, dy, self.state.input_model);
        if !directions.is_empty() {
            self.arm_off();
        }
    }

    fn arm_off(&mut self) {
        if self.state.phase == SessionPhase::Armed {
            self.state.phase = SessionPhase::Running;
            log::debug!("Armed -> Running");
        }
    }

    /// Run one frame at host time `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        if !self.is_active() {
            return FrameOutcome::Stop;
        }

        let dt = frame_delta(self.last_frame_ms, timestamp_ms, self.config.max_frame_ms);
        self.last_frame_ms = Some(timestamp_ms);

        let events = tick(&mut self.state, &mut self.input, dt);
        if self.state.phase == SessionPhase::Running || !events.is_empty() {
            self.presenter.set_time_display(self.state.elapsed);
        }

        let mut finished = None;
        for event in events {
            match event {
                GameEvent::JugCollected { total } => {
                    self.presenter.set_collectible_count_display(total);
                    self.presenter
                        .notify_transient(&format!("-{:.2}s", JUG_BONUS), Tone::Success);
                }
                GameEvent::HazardHit => {
                    self.presenter
                        .notify_transient(&format!("+{:.2}s", HAZARD_PENALTY), Tone::Danger);
                }
                GameEvent::Finished { elapsed, jugs } => finished = Some((elapsed, jugs)),
            }
        }

        self.presenter.render(&self.state, timestamp_ms);

        if let Some((elapsed, jugs)) = finished {
            self.finish(elapsed, jugs);
            return FrameOutcome::Stop;
        }

        if self.is_active() {
            FrameOutcome::Continue
        } else {
            FrameOutcome::Stop
        }
    }

    fn finish(&mut self, elapsed: f32, jugs: u32) {
        log::info!(
            "Finished: {} with {} jugs",
            crate::format_seconds(elapsed),
            jugs
        );
        self.presenter.set_final_time(elapsed);
        self.presenter.show_screen(Screen::Finish);
        self.presenter.trigger_celebration();
    }

    /// Drive frames from `timestamps` until the session stops or they run out.
    ///
    /// `between` runs after every frame that asked to continue, standing in for
    /// the host's yield (input arrives here). Returns the last outcome.
    pub fn run_frames<I, F>(&mut self, timestamps: I, mut between: F) -> FrameOutcome
    where
        I: IntoIterator<Item = f64>,
        F: FnMut(&mut Self),
    {
        let mut outcome = if self.is_active() {
            FrameOutcome::Continue
        } else {
            FrameOutcome::Stop
        };

        for timestamp in timestamps {
            if !self.is_active() {
                outcome = FrameOutcome::Stop;
                break;
            }
            outcome = self.frame(timestamp);
            if outcome == FrameOutcome::Stop {
                break;
            }
            between(self);
        }

        outcome
    }

    fn refresh_hud(&mut self) {
        self.presenter.set_time_display(self.state.elapsed);
        self.presenter
            .set_collectible_count_display(self.state.jug_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::HeadlessPresenter;
    use crate::sim::InputModel;

    fn driver(config: GameConfig) -> GameDriver<HeadlessPresenter> {
        GameDriver::new(config, HeadlessPresenter::default(), 1)
    }

    #[test]
    fn test_initial_state_is_idle_on_start_screen() {
        let driver = driver(GameConfig::default());
        assert_eq!(driver.phase(), SessionPhase::Idle);
        assert_eq!(driver.presenter().screen, Some(Screen::Start));
        assert_eq!(driver.presenter().time, 0.0);
        assert_eq!(driver.presenter().jugs, 0);
    }

    #[test]
    fn test_idle_frame_stops() {
        let mut driver = driver(GameConfig::default());
        assert_eq!(driver.frame(0.0), FrameOutcome::Stop);
        assert_eq!(driver.presenter().frames, 0);
    }

    #[test]
    fn test_input_ignored_when_idle() {
        let mut driver = driver(GameConfig::default());
        driver.key_down(Direction::Right);
        driver.start();
        driver.frame(0.0);
        assert_eq!(driver.state().runner.lane, 1);
    }

    #[test]
    fn test_start_auto_run() {
        let mut driver = driver(GameConfig::default());
        driver.start();
        assert_eq!(driver.phase(), SessionPhase::Running);
        assert_eq!(driver.presenter().screen, Some(Screen::Game));

        // First frame has no delta
        assert_eq!(driver.frame(1000.0), FrameOutcome::Continue);
        assert_eq!(driver.state().elapsed, 0.0);

        driver.frame(1016.0);
        assert!(driver.state().elapsed > 0.0);
    }

    #[test]
    fn test_armed_waits_for_first_key() {
        let mut driver = driver(GameConfig {
            input_model: InputModel::HoldToMove,
            ..Default::default()
        });
        driver.start();
        assert_eq!(driver.phase(), SessionPhase::Armed);

        // Frames keep coming but the clock stays still
        assert_eq!(driver.frame(0.0), FrameOutcome::Continue);
        assert_eq!(driver.frame(16.0), FrameOutcome::Continue);
        assert_eq!(driver.state().elapsed, 0.0);
        assert_eq!(driver.presenter().frames, 2);

        driver.key_down(Direction::Up);
        assert_eq!(driver.phase(), SessionPhase::Running);
        driver.frame(32.0);
        assert!(driver.state().elapsed > 0.0);
        assert!(driver.state().runner.y > driver.config().start_y);

        driver.key_up(Direction::Up);
        let y = driver.state().runner.y;
        driver.frame(48.0);
        assert_eq!(driver.state().runner.y, y);
    }

    #[test]
    fn test_reset_stops_loop() {
        let mut driver = driver(GameConfig::default());
        driver.start();
        driver.frame(0.0);
        driver.frame(16.0);
        driver.reset_to_start();
        assert_eq!(driver.phase(), SessionPhase::Idle);
        assert_eq!(driver.frame(32.0), FrameOutcome::Stop);
        assert_eq!(driver.presenter().screen, Some(Screen::Start));
        assert_eq!(driver.presenter().time, 0.0);
    }

    #[test]
    fn test_degenerate_track_finishes_on_first_frame() {
        let mut driver = driver(GameConfig {
            track_length: f32::NAN,
            ..Default::default()
        });
        assert!(driver.state().jugs.is_empty());
        assert!(driver.state().hazards.is_empty());

        driver.start();
        assert_eq!(driver.frame(0.0), FrameOutcome::Stop);
        assert_eq!(driver.phase(), SessionPhase::Finished);
        assert_eq!(driver.presenter().screen, Some(Screen::Finish));
        assert_eq!(driver.presenter().final_time, Some(0.0));
    }

    #[test]
    fn test_huge_track_builds_capped_world() {
        let driver = driver(GameConfig {
            track_length: 1e10,
            seed: Some(1),
            ..Default::default()
        });
        assert_eq!(driver.config().track_length, crate::consts::MAX_TRACK_LENGTH);
        assert_eq!(driver.state().track_length, crate::consts::MAX_TRACK_LENGTH);
        assert_eq!(driver.phase(), SessionPhase::Idle);
    }
}
