//! World generation
//!
//! Items are pre-placed along the whole track when a session is created.
//! A cursor walks up the track in random strides and rolls independently for
//! a jug and a hazard at every stop.

use glam::Vec2;
use rand::Rng;

use super::state::{Hazard, Jug, LANE_COUNT, Lanes};
use crate::consts::*;

/// Items placed along the track, in ascending y
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub jugs: Vec<Jug>,
    pub hazards: Vec<Hazard>,
}

/// Place jugs and hazards between `SPAWN_MARGIN` and `track_length - SPAWN_MARGIN`.
///
/// A stop may produce a jug, a hazard, both (possibly in the same lane), or
/// nothing. Tracks too short to fit a stop produce an empty world, and tracks
/// longer than `MAX_TRACK_LENGTH` are only populated up to that length.
pub fn generate_world<R: Rng + ?Sized>(track_length: f32, lanes: &Lanes, rng: &mut R) -> World {
    let mut world = World::default();
    let end = track_length.clamp(0.0, MAX_TRACK_LENGTH) - SPAWN_MARGIN;

    let mut y = SPAWN_MARGIN;
    while y < end {
        if rng.random::<f32>() < JUG_CHANCE {
            let lane = rng.random_range(0..LANE_COUNT);
            world.jugs.push(Jug {
                pos: Vec2::new(lanes.x(lane), y),
            });
        }
        if rng.random::<f32>() < HAZARD_CHANCE {
            let lane = rng.random_range(0..LANE_COUNT);
            world.hazards.push(Hazard::new(Vec2::new(lanes.x(lane), y)));
        }
        let next = y + SPAWN_STEP_MIN + rng.random::<f32>() * SPAWN_STEP_JITTER;
        if next <= y {
            break;
        }
        y = next;
    }

    log::debug!(
        "Generated world: track={}, jugs={}, hazards={}",
        track_length,
        world.jugs.len(),
        world.hazards.len()
    );
    world
}
