//! Runner vs item overlap tests
//!
//! Everything is axis-aligned. The runner's vertical hitbox is lopsided:
//! 40 units below its centre and 20 above.

use super::state::{GameEvent, GameState, Hazard, Jug};
use crate::consts::*;

/// Whether the runner at (`lane_x`, `runner_y`) can grab a jug
#[inline]
pub fn jug_in_reach(jug: &Jug, lane_x: f32, runner_y: f32) -> bool {
    (jug.pos.x - lane_x).abs() < JUG_REACH_X && (jug.pos.y - runner_y).abs() < JUG_REACH_Y
}

/// Whether the runner at (`lane_x`, `runner_y`) overlaps a hazard
pub fn hazard_overlaps(hazard: &Hazard, lane_x: f32, runner_y: f32) -> bool {
    let overlap_lane = (hazard.pos.x - lane_x).abs() < hazard.size.x * HAZARD_LANE_FACTOR;
    let below = runner_y - RUNNER_HITBOX_BELOW;
    let above = runner_y + RUNNER_HITBOX_ABOVE;
    let overlap_vertical = !(below > hazard.bottom() || above < hazard.top());
    overlap_lane && overlap_vertical
}

/// Resolve every jug and hazard the runner touches this frame.
///
/// Matched items are removed as they are found (walking each list from the
/// back so removals don't shift unvisited indices), so an item can only ever
/// apply its effect once. A jug and a hazard at the same spot both apply.
pub fn resolve_collisions(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let lane_x = state.runner_x();
    let runner_y = state.runner.y;

    for i in (0..state.jugs.len()).rev() {
        if jug_in_reach(&state.jugs[i], lane_x, runner_y) {
            state.jugs.remove(i);
            state.jug_count += 1;
            state.apply_bonus(JUG_BONUS);
            events.push(GameEvent::JugCollected {
                total: state.jug_count,
            });
        }
    }

    for i in (0..state.hazards.len()).rev() {
        if hazard_overlaps(&state.hazards[i], lane_x, runner_y) {
            state.hazards.remove(i);
            state.apply_penalty(HAZARD_PENALTY);
            events.push(GameEvent::HazardHit);
        }
    }

    events
}
