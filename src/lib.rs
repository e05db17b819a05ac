//! Water Run - a three-lane vertical runner
//!
//! Core modules:
//! - `sim`: Simulation core (world generation, camera, input, collisions, tick)
//! - `driver`: Session state machine and frame scheduling
//! - `presenter`: Presentation collaborator interface
//! - `assets`: Polled sprite handles with procedural fallbacks
//! - `config`: Data-driven game tuning

pub mod assets;
pub mod config;
pub mod driver;
pub mod presenter;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use driver::{FrameOutcome, GameDriver};
pub use presenter::{Presenter, Screen, Tone};

/// Game configuration constants
pub mod consts {
    /// Base canvas dimensions
    pub const VIEWPORT_WIDTH: f32 = 480.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// World distance from start to the finish line
    pub const TRACK_LENGTH: f32 = 5200.0;
    /// Longest accepted track; well inside exact f32 range for the spawn cursor
    pub const MAX_TRACK_LENGTH: f32 = 1_000_000.0;
    /// Lane centres as fractions of viewport width
    pub const LANE_FRACTIONS: [f32; 3] = [0.22, 0.50, 0.78];

    /// Runner defaults
    pub const RUNNER_START_Y: f32 = 80.0;
    pub const START_LANE: usize = 1;
    pub const RUN_SPEED: f32 = 140.0; // units per second
    pub const HOLD_SPEED: f32 = 160.0;
    pub const JUMP_DISTANCE: f32 = 60.0;
    /// Runner vertical hitbox: extends further below centre than above
    pub const RUNNER_HITBOX_BELOW: f32 = 40.0;
    pub const RUNNER_HITBOX_ABOVE: f32 = 20.0;

    /// Camera keeps the runner at this fraction of the viewport height
    pub const FOLLOW_FACTOR: f32 = 0.68;

    /// Largest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_MS: f64 = 48.0;

    /// World generation
    pub const SPAWN_MARGIN: f32 = 300.0;
    pub const SPAWN_STEP_MIN: f32 = 220.0;
    pub const SPAWN_STEP_JITTER: f32 = 80.0;
    pub const JUG_CHANCE: f32 = 0.6;
    pub const HAZARD_CHANCE: f32 = 0.45;
    pub const HAZARD_WIDTH: f32 = 46.0;
    pub const HAZARD_HEIGHT: f32 = 26.0;

    /// Jug pickup window
    pub const JUG_REACH_X: f32 = 28.0;
    pub const JUG_REACH_Y: f32 = 42.0;
    /// Hazard lane overlap as a fraction of hazard width
    pub const HAZARD_LANE_FACTOR: f32 = 0.6;

    /// Seconds removed per jug / added per hazard
    pub const JUG_BONUS: f32 = 2.0;
    pub const HAZARD_PENALTY: f32 = 2.0;

    /// Touch swipe threshold (px)
    pub const SWIPE_THRESHOLD: f32 = 20.0;
}

/// Round to hundredths, the precision shown on the HUD
#[inline]
pub fn round_hundredths(seconds: f32) -> f32 {
    (seconds * 100.0).round() / 100.0
}

/// HUD time label, e.g. `37.14s`
pub fn format_seconds(seconds: f32) -> String {
    format!("{:.2}s", round_hundredths(seconds))
}

/// Final-score label (no unit suffix)
pub fn format_final_time(seconds: f32) -> String {
    format!("{:.2}", round_hundredths(seconds))
}
