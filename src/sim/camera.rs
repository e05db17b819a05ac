//! Vertical follow camera
//!
//! World y grows toward the finish; screen y grows downward. The camera only
//! ever moves up: once it has advanced, a runner moving back down the track
//! does not pull it along.

use serde::{Deserialize, Serialize};

/// World-to-screen vertical projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World height at the bottom edge of the viewport; non-decreasing
    pub offset: f32,
    pub viewport_height: f32,
    /// Fraction of the viewport height the runner is pinned at once tracked
    pub follow_factor: f32,
}

impl Camera {
    pub fn new(viewport_height: f32, follow_factor: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height,
            follow_factor,
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Screen y for a world y
    #[inline]
    pub fn project(&self, world_y: f32) -> f32 {
        self.viewport_height - (world_y - self.offset)
    }

    /// Advance toward the runner, never backward
    pub fn follow(&mut self, runner_y: f32) {
        let target = runner_y - self.follow_factor * self.viewport_height;
        self.offset = self.offset.max(target);
    }

    /// Whether a world line sits above the bottom edge plus `margin` (screen px).
    /// Lines above the top edge still count; the canvas clips them.
    pub fn is_above_bottom(&self, world_y: f32, margin: f32) -> bool {
        self.project(world_y) < self.viewport_height + margin
    }
}
