//! Per-frame simulation step
//!
//! Order within a frame: input and motion, camera, clock, collisions, finish
//! check. Rendering happens in the driver between collisions and the finish
//! transition being reported.

use super::collision::resolve_collisions;
use super::input::InputState;
use super::state::{GameEvent, GameState, SessionPhase};

/// Seconds since the previous frame, clamped to `max_ms`.
///
/// The first frame of a run (no previous timestamp) advances nothing. A clock
/// that goes backwards also yields zero.
pub fn frame_delta(last_ms: Option<f64>, now_ms: f64, max_ms: f64) -> f32 {
    let Some(last) = last_ms else {
        return 0.0;
    };
    let delta = (now_ms - last).clamp(0.0, max_ms);
    (delta / 1000.0) as f32
}

/// Advance a running session by `dt` seconds
pub fn tick(state: &mut GameState, input: &mut InputState, dt: f32) -> Vec<GameEvent> {
    if state.phase != SessionPhase::Running {
        return Vec::new();
    }

    input.apply(&mut state.runner, &state.tuning, state.input_model, dt);
    state.camera.follow(state.runner.y);

    // Continuous accrual comes before any pickup/hazard adjustments
    state.elapsed += dt;

    let mut events = resolve_collisions(state);

    if state.reached_finish() {
        state.phase = SessionPhase::Finished;
        events.push(GameEvent::Finished {
            elapsed: state.elapsed,
            jugs: state.jug_count,
        });
    }

    events
}
