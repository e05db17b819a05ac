//! Simulation module
//!
//! All gameplay logic lives here and nothing here touches the platform:
//! - Seeded RNG only (world generation)
//! - Input is recorded by handlers and applied on the next tick
//! - Item lists keep insertion (ascending y) order

pub mod camera;
pub mod collision;
pub mod input;
pub mod state;
pub mod tick;
pub mod world;

pub use camera::Camera;
pub use collision::{hazard_overlaps, jug_in_reach, resolve_collisions};
pub use input::{Direction, InputAction, InputModel, InputState, swipe_directions};
pub use state::{
    GameEvent, GameState, Hazard, Jug, LANE_COUNT, Lanes, Runner, RunnerTuning, SessionPhase,
};
pub use tick::{frame_delta, tick};
pub use world::{World, generate_world};
