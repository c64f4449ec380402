//! Engine configuration, loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "title": "breakout", "target_fps": 120, "gravity": [0.0, 9.8] }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ecs::world::DEFAULT_PHYSICS_SCALE;
use crate::error::ConfigError;
use crate::math::{Color, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    /// Scene units per physics unit.
    pub physics_scale: f32,
    /// In physics units per second squared.
    pub gravity: [f32; 2],
    /// Minimum age before a system's stale entries are reclaimed.
    pub compaction_interval_secs: f32,
    pub clear_color: Color,
    /// Upper bound on a frame's `dt`, so a stall does not explode the step.
    pub max_frame_dt_secs: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "vindr".to_owned(),
            width: 640,
            height: 400,
            target_fps: 60,
            physics_scale: DEFAULT_PHYSICS_SCALE,
            gravity: [0.0, 20.0],
            compaction_interval_secs: 1.0,
            clear_color: Color::BLACK,
            max_frame_dt_secs: 0.25,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        if !(self.physics_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics_scale must be positive, got {}",
                self.physics_scale
            )));
        }
        if self.compaction_interval_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "compaction_interval_secs must not be negative, got {}",
                self.compaction_interval_secs
            )));
        }
        if !(self.max_frame_dt_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_frame_dt_secs must be positive, got {}",
                self.max_frame_dt_secs
            )));
        }
        Ok(())
    }

    /// Time budget of one frame.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }
}
