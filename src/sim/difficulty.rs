//! Difficulty profiles
//!
//! Two fixed tunings exist. Selecting one swaps which profile the session
//! reads; the values themselves never change at runtime.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Hard,
    Easy,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Hard => "Hard",
            Difficulty::Easy => "Easy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hard" => Some(Difficulty::Hard),
            "easy" => Some(Difficulty::Easy),
            _ => None,
        }
    }

    /// The fixed tuning for this level
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Hard => HARD,
            Difficulty::Easy => EASY,
        }
    }
}

/// Spawn and speed tuning for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Probability a spawned item is a rose; broken hearts get the rest
    pub rose_chance: f32,
    /// Rose fall speed range (pixels per frame)
    pub rose_speed: (f32, f32),
    /// Broken heart fall speed range (pixels per frame)
    pub broken_speed: (f32, f32),
    /// Probability of a spawn on any single frame
    pub spawn_chance: f32,
    /// Round length in countdown ticks (seconds)
    pub round_seconds: u32,
    pub label: &'static str,
}

pub const HARD: DifficultyProfile = DifficultyProfile {
    rose_chance: 0.18,
    rose_speed: (2.0, 3.0),
    broken_speed: (6.0, 10.0),
    spawn_chance: 0.06,
    round_seconds: 30,
    label: "HARD LEVEL",
};

pub const EASY: DifficultyProfile = DifficultyProfile {
    rose_chance: 0.85,
    rose_speed: (2.0, 4.0),
    broken_speed: (2.0, 3.0),
    spawn_chance: 0.04,
    round_seconds: 60,
    label: "JUST A GIRL LEVEL",
};

impl DifficultyProfile {
    /// Probability a spawned item is a broken heart
    #[inline]
    pub fn broken_heart_chance(&self) -> f32 {
        1.0 - self.rose_chance
    }

    /// Reject tunings the spawner cannot sample from
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("rose_chance", self.rose_chance)?;
        check_probability("spawn_chance", self.spawn_chance)?;
        check_speed("rose_speed", self.rose_speed)?;
        check_speed("broken_speed", self.broken_speed)?;
        if self.round_seconds == 0 {
            return Err(ConfigError::ZeroRoundDuration);
        }
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn check_speed(field: &'static str, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpeedRange { field, min, max })
    }
}
