//! Sprite handles
//!
//! Sprites load in the background while the game runs. Rendering polls the
//! handle each frame: until an image is ready (or if it never arrives) items
//! are drawn as flat rectangles instead.

use thiserror::Error;

use crate::sim::Hazard;

/// Drawn sprite size when the image is available
pub const SPRITE_WIDTH: f32 = 40.0;
pub const SPRITE_HEIGHT: f32 = 48.0;

/// Why a sprite is unavailable
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image failed: {0}")]
    Load(String),

    #[error("image handle unavailable: {0}")]
    Platform(String),
}

/// Logical sprite names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Jug,
    Hazard,
}

impl Sprite {
    pub const ALL: [Sprite; 2] = [Sprite::Jug, Sprite::Hazard];

    /// Path relative to the page
    pub fn path(self) -> &'static str {
        match self {
            Sprite::Jug => "assets/jerry_jug_yellow.svg",
            Sprite::Hazard => "assets/jerry_jug_black.svg",
        }
    }
}

/// Load state of one asset
#[derive(Debug, Clone, Default)]
pub enum AssetHandle<T> {
    #[default]
    Pending,
    Ready(T),
    Failed,
}

impl<T> AssetHandle<T> {
    /// Settle the handle with a load result. Failures are logged and kept local.
    pub fn resolve(&mut self, name: &str, result: Result<T, AssetError>) {
        *self = match result {
            Ok(image) => {
                log::info!("[assets] {} loaded", name);
                AssetHandle::Ready(image)
            }
            Err(err) => {
                log::error!("[assets] load error: {}", err);
                AssetHandle::Failed
            }
        };
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            AssetHandle::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetHandle::Pending)
    }
}

/// Axis-aligned filled rectangle, relative to an item's centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: &'static str,
}

/// How to draw an item this frame
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable<'a, T> {
    /// Image centred on the item
    Image { image: &'a T, width: f32, height: f32 },
    /// Procedural stand-in
    Shapes(Vec<FillRect>),
}

/// Jug stand-in: yellow body with a darker cap
pub fn jug_fallback() -> Vec<FillRect> {
    vec![
        FillRect {
            x: -16.0,
            y: -22.0,
            w: 32.0,
            h: 44.0,
            color: "#FFD84D",
        },
        FillRect {
            x: -6.0,
            y: -26.0,
            w: 12.0,
            h: 6.0,
            color: "#bda10d",
        },
    ]
}

/// Hazard stand-in: a dark block matching its collision box
pub fn hazard_fallback(hazard: &Hazard) -> Vec<FillRect> {
    vec![FillRect {
        x: -hazard.size.x / 2.0,
        y: -hazard.size.y / 2.0,
        w: hazard.size.x,
        h: hazard.size.y,
        color: "#253331",
    }]
}

/// The game's sprites
#[derive(Debug, Clone)]
pub struct SpriteSet<T> {
    pub jug: AssetHandle<T>,
    pub hazard: AssetHandle<T>,
}

impl<T> Default for SpriteSet<T> {
    fn default() -> Self {
        Self {
            jug: AssetHandle::Pending,
            hazard: AssetHandle::Pending,
        }
    }
}

impl<T> SpriteSet<T> {
    pub fn handle_mut(&mut self, sprite: Sprite) -> &mut AssetHandle<T> {
        match sprite {
            Sprite::Jug => &mut self.jug,
            Sprite::Hazard => &mut self.hazard,
        }
    }

    pub fn jug_drawable(&self) -> Drawable<'_, T> {
        match self.jug.get() {
            Some(image) => sprite_drawable(image),
            None => Drawable::Shapes(jug_fallback()),
        }
    }

    pub fn hazard_drawable(&self, hazard: &Hazard) -> Drawable<'_, T> {
        match self.hazard.get() {
            Some(image) => sprite_drawable(image),
            None => Drawable::Shapes(hazard_fallback(hazard)),
        }
    }
}

fn sprite_drawable<T>(image: &T) -> Drawable<'_, T> {
    Drawable::Image {
        image,
        width: SPRITE_WIDTH,
        height: SPRITE_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_pending_uses_fallback() {
        let sprites: SpriteSet<&str> = SpriteSet::default();
        assert!(sprites.jug.is_pending());
        assert_eq!(sprites.jug_drawable(), Drawable::Shapes(jug_fallback()));
    }

    #[test]
    fn test_ready_mid_session() {
        let mut sprites: SpriteSet<&str> = SpriteSet::default();
        let hazard = Hazard::new(Vec2::new(240.0, 900.0));
        assert!(matches!(sprites.hazard_drawable(&hazard), Drawable::Shapes(_)));

        sprites
            .handle_mut(Sprite::Hazard)
            .resolve("hazard", Ok("black.svg"));
        assert_eq!(
            sprites.hazard_drawable(&hazard),
            Drawable::Image {
                image: &"black.svg",
                width: SPRITE_WIDTH,
                height: SPRITE_HEIGHT,
            }
        );
        // Other sprite is unaffected
        assert!(matches!(sprites.jug_drawable(), Drawable::Shapes(_)));
    }

    #[test]
    fn test_failure_degrades_to_fallback() {
        let mut sprites: SpriteSet<&str> = SpriteSet::default();
        sprites
            .handle_mut(Sprite::Jug)
            .resolve("jug", Err(AssetError::Load(Sprite::Jug.path().to_string())));
        assert!(matches!(sprites.jug, AssetHandle::Failed));
        assert_eq!(sprites.jug_drawable(), Drawable::Shapes(jug_fallback()));
    }

    #[test]
    fn test_hazard_fallback_matches_hitbox() {
        let hazard = Hazard::new(Vec2::new(0.0, 0.0));
        let rects = hazard_fallback(&hazard);
        assert_eq!(rects.len(), 1);
        assert_eq!((rects[0].w, rects[0].h), (46.0, 26.0));
        assert_eq!((rects[0].x, rects[0].y), (-23.0, -13.0));
    }
}
