//! Rose Catcher - catch falling roses, dodge broken hearts
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, round state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame/countdown scheduling outside the browser
//! - `settings`: Data-driven configuration

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Net roses needed to win a round
    pub const WIN_SCORE: u32 = 15;

    /// Player defaults (pixels)
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Distance from the bottom of the viewport to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 100.0;
    /// Autopilot steering speed (pixels per frame)
    pub const PLAYER_SPEED: f32 = 10.0;

    /// Falling item edge length (pixels)
    pub const ITEM_SIZE: f32 = 35.0;

    /// Particle lifetime model (integer life units)
    pub const PARTICLE_LIFE: i32 = 100;
    pub const PARTICLE_DECAY: i32 = 3;
    /// Particles emitted per collision
    pub const PARTICLE_BURST: usize = 8;
    /// Bursts emitted by the end-of-round celebration
    pub const CELEBRATION_BURSTS: usize = 50;

    /// Countdown interval (milliseconds)
    pub const COUNTDOWN_INTERVAL_MS: u32 = 1000;
}
