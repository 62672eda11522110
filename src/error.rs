//! Configuration errors
//!
//! The simulation itself has no recoverable failures; these cover values
//! handed in from outside (settings JSON, viewport resizes, custom profiles).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Viewport dimensions must be finite and strictly positive
    InvalidViewport { width: f32, height: f32 },
    /// A probability field fell outside [0, 1]
    ProbabilityOutOfRange { field: &'static str, value: f32 },
    /// A speed range was empty, negative or non-finite
    InvalidSpeedRange { field: &'static str, min: f32, max: f32 },
    /// Rounds must last at least one second
    ZeroRoundDuration,
    /// An entity dimension was non-positive or non-finite
    InvalidSize { field: &'static str, value: f32 },
    /// Settings JSON could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "invalid viewport: {width}x{height}")
            }
            Self::ProbabilityOutOfRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            Self::InvalidSpeedRange { field, min, max } => {
                write!(f, "{field} must satisfy 0 <= min <= max, got [{min}, {max}]")
            }
            Self::ZeroRoundDuration => write!(f, "round duration must be at least one second"),
            Self::InvalidSize { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Parse(msg) => write!(f, "failed to parse settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
