//! Runner input
//!
//! Keyboard and touch handlers only record what happened; the next tick
//! applies it. Two control schemes are supported:
//! - `AutoRun`: the runner climbs at a constant speed, up/down are 60-unit jumps
//! - `HoldToMove`: the runner only climbs or descends while a key is held

use serde::{Deserialize, Serialize};

use super::state::{Runner, RunnerTuning};
use crate::consts::SWIPE_THRESHOLD;

/// Control scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputModel {
    /// Constant climb, discrete jumps
    #[default]
    AutoRun,
    /// Armed start, climb while held
    HoldToMove,
}

impl InputModel {
    /// Sessions under this model wait for the first key before the clock starts
    pub fn starts_armed(self) -> bool {
        self == InputModel::HoldToMove
    }
}

/// A directional input (arrow key or swipe)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Discrete action waiting for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Move one lane (-1 left, +1 right)
    Lane(i32),
    /// Instant jump up the track
    JumpUp,
    /// Instant jump back down the track
    JumpDown,
}

/// Pending input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pending: Vec<InputAction>,
    held_up: bool,
    held_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key (or gesture) pressed
    pub fn press(&mut self, direction: Direction, model: InputModel) {
        match (direction, model) {
            (Direction::Left, _) => self.pending.push(InputAction::Lane(-1)),
            (Direction::Right, _) => self.pending.push(InputAction::Lane(1)),
            (Direction::Up, InputModel::AutoRun) => self.pending.push(InputAction::JumpUp),
            (Direction::Down, InputModel::AutoRun) => self.pending.push(InputAction::JumpDown),
            (Direction::Up, InputModel::HoldToMove) => self.held_up = true,
            (Direction::Down, InputModel::HoldToMove) => self.held_down = true,
        }
    }

    /// Key released; only matters for held movement
    pub fn release(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.held_up = false,
            Direction::Down => self.held_down = false,
            Direction::Left | Direction::Right => {}
        }
    }

    /// Record a completed swipe. Returns the directions it produced.
    pub fn swipe(&mut self, dx: f32, dy: f32, model: InputModel) -> Vec<Direction> {
        let directions = swipe_directions(dx, dy, model);
        for &direction in &directions {
            self.press(direction, model);
        }
        directions
    }

    pub fn held_up(&self) -> bool {
        self.held_up
    }

    pub fn held_down(&self) -> bool {
        self.held_down
    }

    pub fn pending(&self) -> &[InputAction] {
        &self.pending
    }

    /// Drop everything (session reset)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply queued actions, then continuous motion for `dt` seconds
    pub fn apply(&mut self, runner: &mut Runner, tuning: &RunnerTuning, model: InputModel, dt: f32) {
        for action in self.pending.drain(..) {
            match action {
                InputAction::Lane(delta) => runner.shift_lane(delta),
                InputAction::JumpUp => runner.y += tuning.jump_distance,
                InputAction::JumpDown => {
                    runner.y = (runner.y - tuning.jump_distance).max(tuning.min_y);
                }
            }
        }

        match model {
            InputModel::AutoRun => runner.y += tuning.run_speed * dt,
            InputModel::HoldToMove => {
                if self.held_up {
                    runner.y += tuning.hold_speed * dt;
                }
                if self.held_down {
                    runner.y = (runner.y - tuning.hold_speed * dt).max(tuning.min_y);
                }
            }
        }

        runner.y = runner.y.max(tuning.min_y);
    }
}

/// Classify a swipe by its screen-space delta.
///
/// Horizontal movement past the threshold changes lane. Under `AutoRun` a
/// vertical swipe also jumps (screen up is track up); under `HoldToMove`
/// swipes are lane-only.
pub fn swipe_directions(dx: f32, dy: f32, model: InputModel) -> Vec<Direction> {
    let mut directions = Vec::with_capacity(2);

    if dx < -SWIPE_THRESHOLD {
        directions.push(Direction::Left);
    } else if dx > SWIPE_THRESHOLD {
        directions.push(Direction::Right);
    }

    if model == InputModel::AutoRun {
        if dy < -SWIPE_THRESHOLD {
            directions.push(Direction::Up);
        } else if dy > SWIPE_THRESHOLD {
            directions.push(Direction::Down);
        }
    }

    directions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::RUNNER_START_Y;
    use proptest::prelude::*;

    fn runner_at(lane: usize, y: f32) -> Runner {
        Runner { lane, y }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("a"), None);
    }

    #[test]
    fn test_auto_run_climbs_every_frame() {
        let mut input = InputState::new();
        let mut runner = runner_at(1, RUNNER_START_Y);
        input.apply(&mut runner, &RunnerTuning::default(), InputModel::AutoRun, 0.5);
        assert_eq!(runner.y, RUNNER_START_Y + 70.0);
    }

    #[test]
    fn test_jumps_and_floor() {
        let tuning = RunnerTuning::default();
        let mut input = InputState::new();
        let mut runner = runner_at(1, 100.0);

        input.press(Direction::Up, InputModel::AutoRun);
        input.apply(&mut runner, &tuning, InputModel::AutoRun, 0.0);
        assert_eq!(runner.y, 160.0);

        input.press(Direction::Down, InputModel::AutoRun);
        input.press(Direction::Down, InputModel::AutoRun);
        input.apply(&mut runner, &tuning, InputModel::AutoRun, 0.0);
        assert_eq!(runner.y, RUNNER_START_Y);
        assert!(input.pending().is_empty());
    }

    #[test]
    fn test_lane_changes_clamp() {
        let tuning = RunnerTuning::default();
        let mut input = InputState::new();

        let mut runner = runner_at(0, 500.0);
        input.press(Direction::Left, InputModel::AutoRun);
        input.apply(&mut runner, &tuning, InputModel::AutoRun, 0.0);
        assert_eq!(runner.lane, 0);

        let mut runner = runner_at(2, 500.0);
        input.press(Direction::Right, InputModel::HoldToMove);
        input.apply(&mut runner, &tuning, InputModel::HoldToMove, 0.0);
        assert_eq!(runner.lane, 2);
    }

    #[test]
    fn test_hold_to_move() {
        let tuning = RunnerTuning::default();
        let mut input = InputState::new();
        let mut runner = runner_at(1, 200.0);

        // Nothing held: no motion
        input.apply(&mut runner, &tuning, InputModel::HoldToMove, 1.0);
        assert_eq!(runner.y, 200.0);

        input.press(Direction::Up, InputModel::HoldToMove);
        input.apply(&mut runner, &tuning, InputModel::HoldToMove, 0.5);
        assert_eq!(runner.y, 200.0 + tuning.hold_speed * 0.5);

        input.release(Direction::Up);
        input.press(Direction::Down, InputModel::HoldToMove);
        input.apply(&mut runner, &tuning, InputModel::HoldToMove, 10.0);
        assert_eq!(runner.y, tuning.min_y);
        assert!(input.held_down());
    }

    #[test]
    fn test_swipe_classification() {
        assert_eq!(
            swipe_directions(-30.0, -40.0, InputModel::AutoRun),
            vec![Direction::Left, Direction::Up]
        );
        assert_eq!(
            swipe_directions(25.0, 90.0, InputModel::HoldToMove),
            vec![Direction::Right]
        );
        assert!(swipe_directions(20.0, -20.0, InputModel::AutoRun).is_empty());
    }

    proptest! {
        #[test]
        fn prop_lane_and_floor_invariants(
            keys in proptest::collection::vec(0u8..4, 0..40),
            hold in any::<bool>(),
        ) {
            let model = if hold { InputModel::HoldToMove } else { InputModel::AutoRun };
            let tuning = RunnerTuning::default();
            let mut input = InputState::new();
            let mut runner = Runner::new(tuning.min_y);

            for key in keys {
                let direction = match key {
                    0 => Direction::Left,
                    1 => Direction::Right,
                    2 => Direction::Up,
                    _ => Direction::Down,
                };
                input.press(direction, model);
                input.apply(&mut runner, &tuning, model, 0.016);
                prop_assert!(runner.lane <= 2);
                prop_assert!(runner.y >= tuning.min_y);
            }
        }
    }
}
