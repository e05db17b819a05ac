//! Game tuning and configuration
//!
//! Loaded from JSON. Unknown or missing fields fall back to defaults, and
//! degenerate values are clamped to something playable instead of rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::InputModel;

/// Configuration load failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Tunable parameters for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Distance from start to finish line (world units)
    pub track_length: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Lane centres as fractions of viewport width
    pub lane_fractions: [f32; 3],
    /// Auto-run speed (units/sec)
    pub run_speed: f32,
    /// Hold-to-move speed (units/sec)
    pub hold_speed: f32,
    /// Instantaneous up/down jump (auto-run model)
    pub jump_distance: f32,
    /// Runner start height, also the lowest it can go
    pub start_y: f32,
    pub follow_factor: f32,
    /// Frame delta clamp (ms)
    pub max_frame_ms: f64,
    pub input_model: InputModel,
    /// World seed; `None` picks one from the clock
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            track_length: TRACK_LENGTH,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            lane_fractions: LANE_FRACTIONS,
            run_speed: RUN_SPEED,
            hold_speed: HOLD_SPEED,
            jump_distance: JUMP_DISTANCE,
            start_y: RUNNER_START_Y,
            follow_factor: FOLLOW_FACTOR,
            max_frame_ms: MAX_FRAME_MS,
            input_model: InputModel::AutoRun,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse from JSON and sanitize
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Read a JSON config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace degenerate values so a session can always run.
    ///
    /// A non-finite or negative track length becomes 0: no items are placed
    /// and the first frame finishes the run. Longer than `MAX_TRACK_LENGTH`
    /// is capped.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.track_length.is_finite() || self.track_length < 0.0 {
            log::warn!("track_length {} is degenerate, using 0", self.track_length);
            self.track_length = 0.0;
        } else if self.track_length > MAX_TRACK_LENGTH {
            log::warn!(
                "track_length {} too long, capping at {}",
                self.track_length,
                MAX_TRACK_LENGTH
            );
            self.track_length = MAX_TRACK_LENGTH;
        }
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            log::warn!("viewport_width {} invalid, using default", self.viewport_width);
            self.viewport_width = defaults.viewport_width;
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            log::warn!("viewport_height {} invalid, using default", self.viewport_height);
            self.viewport_height = defaults.viewport_height;
        }
        if self.lane_fractions.iter().any(|f| !f.is_finite()) {
            log::warn!("lane_fractions contain non-finite values, using defaults");
            self.lane_fractions = defaults.lane_fractions;
        }
        for (value, fallback, name) in [
            (&mut self.run_speed, defaults.run_speed, "run_speed"),
            (&mut self.hold_speed, defaults.hold_speed, "hold_speed"),
            (&mut self.jump_distance, defaults.jump_distance, "jump_distance"),
            (&mut self.start_y, defaults.start_y, "start_y"),
        ] {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("{} {} invalid, using {}", name, value, fallback);
                *value = fallback;
            }
        }
        if !(self.follow_factor.is_finite() && (0.0..=1.0).contains(&self.follow_factor)) {
            log::warn!("follow_factor {} out of range, using default", self.follow_factor);
            self.follow_factor = defaults.follow_factor;
        }
        if !(self.max_frame_ms.is_finite() && self.max_frame_ms > 0.0) {
            log::warn!("max_frame_ms {} invalid, using default", self.max_frame_ms);
            self.max_frame_ms = defaults.max_frame_ms;
        }

        self
    }

    /// Lane x-coordinates in screen space
    pub fn lane_xs(&self) -> [f32; 3] {
        self.lane_fractions.map(|f| f * self.viewport_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lanes() {
        let lanes = GameConfig::default().lane_xs();
        assert!((lanes[0] - 105.6).abs() < 0.001);
        assert!((lanes[1] - 240.0).abs() < 0.001);
        assert!((lanes[2] - 374.4).abs() < 0.001);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "track_length": 1200, "seed": 7 }"#).unwrap();
        assert_eq!(config.track_length, 1200.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.run_speed, RUN_SPEED);
        assert_eq!(config.input_model, InputModel::AutoRun);
    }

    #[test]
    fn test_input_model_from_json() {
        let config = GameConfig::from_json(r#"{ "input_model": "HoldToMove" }"#).unwrap();
        assert_eq!(config.input_model, InputModel::HoldToMove);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            GameConfig::from_json("{ track_length: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_degenerate_values_sanitized() {
        let config = GameConfig {
            track_length: -50.0,
            viewport_height: 0.0,
            run_speed: f32::NAN,
            follow_factor: 3.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.track_length, 0.0);
        assert_eq!(config.viewport_height, VIEWPORT_HEIGHT);
        assert_eq!(config.run_speed, RUN_SPEED);
        assert_eq!(config.follow_factor, FOLLOW_FACTOR);
    }

    #[test]
    fn test_huge_track_is_capped() {
        let config = GameConfig::from_json(r#"{ "track_length": 1e10, "seed": 1 }"#).unwrap();
        assert_eq!(config.track_length, MAX_TRACK_LENGTH);

        let config = GameConfig {
            track_length: MAX_TRACK_LENGTH - 1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.track_length, MAX_TRACK_LENGTH - 1.0);
    }

    #[test]
    fn test_bad_frame_clamp_restored() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = GameConfig {
                max_frame_ms: bad,
                ..Default::default()
            }
            .sanitized();
            assert_eq!(config.max_frame_ms, MAX_FRAME_MS);
        }
    }
}
