//! Game settings
//!
//! Read once at startup (JSON), never written back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty the first round starts on
    pub difficulty: Difficulty,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Code that unlocks the easy profile
    pub unlock_code: String,

    // === Entities ===
    pub player_width: f32,
    pub player_height: f32,
    /// Player top edge sits this far above the bottom of the viewport
    pub player_bottom_offset: f32,
    pub item_size: f32,
    /// Particles per collision burst
    pub particle_burst: usize,

    // === Headless runner ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Simulated display refresh rate (frames per second)
    pub frame_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            seed: None,
            unlock_code: "mommy".to_string(),

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            item_size: ITEM_SIZE,
            particle_burst: PARTICLE_BURST,

            viewport_width: 800.0,
            viewport_height: 600.0,
            frame_rate: 60,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings ({})", settings.difficulty.as_str());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("player_width", self.player_width)?;
        check_size("player_height", self.player_height)?;
        check_size("item_size", self.item_size)?;
        if !self.player_bottom_offset.is_finite() {
            return Err(ConfigError::InvalidSize {
                field: "player_bottom_offset",
                value: self.player_bottom_offset,
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::InvalidSize {
                field: "frame_rate",
                value: 0.0,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    /// Case-insensitive match, surrounding whitespace ignored
    pub fn matches_unlock_code(&self, input: &str) -> bool {
        !self.unlock_code.is_empty()
            && input.trim().to_lowercase() == self.unlock_code.trim().to_lowercase()
    }
}

fn check_size(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize { field, value })
    }
}
