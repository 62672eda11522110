//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; drawing goes through `Painter`

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Contact, check_contact, is_hit};
pub use difficulty::{Difficulty, DifficultyProfile, EASY, HARD};
pub use entity::{Entity, FallingItem, ItemKind, Painter, Particle, Player, Rgba, palette};
pub use spawner::Spawner;
pub use state::{GameEvent, GameSession, RoundState, RoundToken, Score, Viewport};
pub use tick::{FrameInput, Schedule, celebration_frame, countdown_tick, frame};
pub use timer::Countdown;
