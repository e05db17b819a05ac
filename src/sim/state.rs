//! Game state and core simulation types
//!
//! A session owns everything that changes during a run. Nothing here is global:
//! the driver holds one `GameState` and rebuilds its world on every reset.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::input::InputModel;
use super::world::{World, generate_world};
use crate::config::GameConfig;
use crate::consts::*;

/// Number of lanes on the track
pub const LANE_COUNT: usize = 3;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// World generated, start screen showing, timer at zero
    Idle,
    /// World visible, waiting for the first directional input
    Armed,
    /// Timer advancing, input live
    Running,
    /// Finish line crossed, timer frozen
    Finished,
}

impl SessionPhase {
    /// Input is accepted and frames keep being scheduled
    pub fn is_active(self) -> bool {
        matches!(self, SessionPhase::Armed | SessionPhase::Running)
    }
}

/// Fixed horizontal lane positions (screen space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lanes {
    xs: [f32; LANE_COUNT],
}

impl Lanes {
    pub fn new(xs: [f32; LANE_COUNT]) -> Self {
        Self { xs }
    }

    /// X coordinate of a lane; out-of-range indices clamp to the outer lanes
    pub fn x(&self, lane: usize) -> f32 {
        self.xs[lane.min(LANE_COUNT - 1)]
    }

    pub fn xs(&self) -> &[f32; LANE_COUNT] {
        &self.xs
    }

    /// Shift a lane index, saturating at the outer lanes
    pub fn shift(lane: usize, delta: i32) -> usize {
        let target = lane as i64 + delta as i64;
        target.clamp(0, LANE_COUNT as i64 - 1) as usize
    }
}

impl Default for Lanes {
    fn default() -> Self {
        Self::new(LANE_FRACTIONS.map(|f| f * VIEWPORT_WIDTH))
    }
}

/// Movement tuning for the runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerTuning {
    pub run_speed: f32,
    pub hold_speed: f32,
    pub jump_distance: f32,
    /// Starting height and the floor the runner can never drop below
    pub min_y: f32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            run_speed: RUN_SPEED,
            hold_speed: HOLD_SPEED,
            jump_distance: JUMP_DISTANCE,
            min_y: RUNNER_START_Y,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    /// Lane index, always in `0..LANE_COUNT`
    pub lane: usize,
    /// World height (increases toward the finish)
    pub y: f32,
}

impl Runner {
    pub fn new(start_y: f32) -> Self {
        Self {
            lane: START_LANE,
            y: start_y,
        }
    }

    pub fn shift_lane(&mut self, delta: i32) {
        self.lane = Lanes::shift(self.lane, delta);
    }

    /// Vertical extent used for hit tests: 40 below centre, 20 above
    pub fn vertical_extent(&self) -> (f32, f32) {
        (self.y - RUNNER_HITBOX_BELOW, self.y + RUNNER_HITBOX_ABOVE)
    }
}

/// A water jug (collectible, removes time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jug {
    pub pos: Vec2,
}

/// An obstacle (adds time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Hazard {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(HAZARD_WIDTH, HAZARD_HEIGHT),
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A jug was picked up; `total` is the run's jug count
    JugCollected { total: u32 },
    /// A hazard was hit
    HazardHit,
    /// The runner crossed the finish line
    Finished { elapsed: f32, jugs: u32 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// World seed for this session
    pub rng_state: RngState,
    pub phase: SessionPhase,
    pub input_model: InputModel,
    pub tuning: RunnerTuning,
    pub lanes: Lanes,
    /// Finish line height
    pub track_length: f32,
    pub runner: Runner,
    pub camera: Camera,
    /// Elapsed time in seconds; the score, never negative
    pub elapsed: f32,
    /// Jugs collected this run
    pub jug_count: u32,
    /// Remaining jugs (ascending y)
    pub jugs: Vec<Jug>,
    /// Remaining hazards (ascending y)
    pub hazards: Vec<Hazard>,
}

impl GameState {
    /// Create an idle session with a freshly generated world
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut state = Self {
            rng_state: RngState::new(seed),
            phase: SessionPhase::Idle,
            input_model: config.input_model,
            tuning: RunnerTuning {
                run_speed: config.run_speed,
                hold_speed: config.hold_speed,
                jump_distance: config.jump_distance,
                min_y: config.start_y,
            },
            lanes: Lanes::new(config.lane_xs()),
            track_length: config.track_length,
            runner: Runner::new(config.start_y),
            camera: Camera::new(config.viewport_height, config.follow_factor),
            elapsed: 0.0,
            jug_count: 0,
            jugs: Vec::new(),
            hazards: Vec::new(),
        };
        state.reset(seed);
        state
    }

    /// Return to Idle with a new world; nothing carries over from the last run
    pub fn reset(&mut self, seed: u64) {
        self.rng_state = RngState::new(seed);
        self.phase = SessionPhase::Idle;
        self.runner = Runner::new(self.tuning.min_y);
        self.camera.reset();
        self.elapsed = 0.0;
        self.jug_count = 0;

        let mut rng = self.rng_state.to_rng();
        let World { jugs, hazards } = generate_world(self.track_length, &self.lanes, &mut rng);
        self.jugs = jugs;
        self.hazards = hazards;
    }

    /// Screen x of the runner's current lane
    pub fn runner_x(&self) -> f32 {
        self.lanes.x(self.runner.lane)
    }

    /// Take time off the clock, never below zero
    pub fn apply_bonus(&mut self, seconds: f32) {
        self.elapsed = (self.elapsed - seconds).max(0.0);
    }

    pub fn apply_penalty(&mut self, seconds: f32) {
        self.elapsed += seconds;
    }

    pub fn reached_finish(&self) -> bool {
        self.runner.y >= self.track_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_shift_saturates() {
        assert_eq!(Lanes::shift(0, -1), 0);
        assert_eq!(Lanes::shift(2, 1), 2);
        assert_eq!(Lanes::shift(1, -1), 0);
        assert_eq!(Lanes::shift(1, 1), 2);
    }

    #[test]
    fn test_runner_lane_clamped_at_edges() {
        let mut runner = Runner::new(RUNNER_START_Y);
        runner.lane = 0;
        runner.shift_lane(-1);
        assert_eq!(runner.lane, 0);

        runner.lane = 2;
        runner.shift_lane(1);
        assert_eq!(runner.lane, 2);
    }

    #[test]
    fn test_runner_hitbox_is_asymmetric() {
        let runner = Runner { lane: 1, y: 1000.0 };
        assert_eq!(runner.vertical_extent(), (960.0, 1020.0));
    }

    #[test]
    fn test_hazard_bounds() {
        let hazard = Hazard::new(Vec2::new(105.6, 2000.0));
        assert_eq!(hazard.top(), 1987.0);
        assert_eq!(hazard.bottom(), 2013.0);
    }

    #[test]
    fn test_bonus_floors_at_zero() {
        let mut state = GameState::new(&GameConfig::default(), 1);
        state.elapsed = 1.25;
        state.apply_bonus(JUG_BONUS);
        assert_eq!(state.elapsed, 0.0);

        state.apply_penalty(HAZARD_PENALTY);
        assert_eq!(state.elapsed, 2.0);
    }

    #[test]
    fn test_reset_regenerates_world() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 42);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.runner.y, RUNNER_START_Y);
        assert_eq!(state.runner.lane, START_LANE);

        state.jugs.clear();
        state.hazards.clear();
        state.elapsed = 12.0;
        state.jug_count = 3;
        state.camera.follow(3000.0);
        state.phase = SessionPhase::Finished;

        state.reset(42);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.jug_count, 0);
        assert_eq!(state.camera.offset, 0.0);
        assert!(!state.jugs.is_empty() || !state.hazards.is_empty());
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = GameConfig::default();
        let a = GameState::new(&config, 7);
        let b = GameState::new(&config, 7);
        assert_eq!(a.jugs, b.jugs);
        assert_eq!(a.hazards, b.hazards);
    }
}
