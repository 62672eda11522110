//! Game session and round state
//!
//! Everything that used to be ambient (score, entity lists, active profile,
//! round phase) lives in one `GameSession` owned by the caller.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyProfile};
use super::entity::{FallingItem, Particle, Player, emit_burst, palette};
use super::spawner::Spawner;
use super::timer::Countdown;
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(ConfigError::InvalidViewport { width, height })
        }
    }
}

/// Lifecycle of the single round a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// Idle, waiting for a start command
    #[default]
    NotStarted,
    /// Frames and countdown are live
    Running,
    /// Score reached `WIN_SCORE`
    WonRound,
    /// Countdown hit zero first
    LostRound,
}

impl RoundState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundState::WonRound | RoundState::LostRound)
    }
}

/// Net roses caught this round, never below zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Apply a contact's score delta, flooring at zero
    pub fn apply(&mut self, delta: i32) {
        self.0 = self.0.saturating_add_signed(delta);
    }

    #[inline]
    pub fn has_won(&self) -> bool {
        self.0 >= WIN_SCORE
    }

    /// Fill level for the love meter, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        (self.0 as f32 / WIN_SCORE as f32).min(1.0)
    }
}

/// Identifies the round a scheduled callback belongs to
///
/// Callbacks holding a token from a cancelled round become no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundToken(u64);

/// Notifications for the UI layer, drained once per callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted { seconds: u32 },
    ScoreChanged { score: u32 },
    CountdownChanged { remaining: u32 },
    RoundWon { score: u32 },
    RoundLost { score: u32 },
}

/// Complete state for one player's session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) settings: Settings,
    /// Seed the RNG was created from, for reproducing a run
    pub seed: u64,
    pub difficulty: Difficulty,
    pub(crate) profile: DifficultyProfile,
    pub viewport: Viewport,
    pub player: Player,
    pub items: Vec<FallingItem>,
    pub particles: Vec<Particle>,
    pub score: Score,
    pub countdown: Countdown,
    pub phase: RoundState,
    pub spawner: Spawner,
    /// Frames run in the current round
    pub frame_count: u64,
    pub(crate) rng: Pcg32,
    generation: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create an idle session; no round runs until `start_round`
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let profile = settings.difficulty.profile();
        let player = Player::new(&viewport, settings.player_size(), settings.player_bottom_offset);
        Ok(Self {
            difficulty: settings.difficulty,
            profile,
            viewport,
            player,
            items: Vec::new(),
            particles: Vec::new(),
            score: Score::default(),
            countdown: Countdown::new(profile.round_seconds),
            phase: RoundState::NotStarted,
            spawner: Spawner::new(settings.item_size),
            frame_count: 0,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            generation: 0,
            events: Vec::new(),
            settings,
        })
    }

    #[inline]
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch to one of the two named profiles (takes effect for spawns
    /// immediately, for round length at the next start)
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            log::info!("Difficulty changed: {} -> {}", self.difficulty.as_str(), difficulty.as_str());
        }
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    /// Install a custom tuning, e.g. for tests or tooling
    pub fn set_profile(&mut self, profile: DifficultyProfile) -> Result<(), ConfigError> {
        profile.validate()?;
        self.profile = profile;
        Ok(())
    }

    /// Recompute bounds and pull the player back inside
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        let viewport = Viewport::new(width, height).inspect_err(|e| {
            log::warn!("Ignoring resize: {e}");
        })?;
        self.viewport = viewport;
        self.player.pos.y = viewport.height - self.settings.player_bottom_offset;
        self.player.clamp_to(&viewport);
        Ok(())
    }

    /// Pointer or touch moved to `x` (viewport pixels)
    pub fn pointer_moved(&mut self, x: f32) {
        self.player.follow_pointer(x);
    }

    /// Begin a fresh round, invalidating every callback of the previous one
    pub fn start_round(&mut self) -> RoundToken {
        self.generation += 1;

        self.player = Player::new(
            &self.viewport,
            self.settings.player_size(),
            self.settings.player_bottom_offset,
        );
        self.items.clear();
        self.particles.clear();
        self.score = Score::default();
        self.countdown = Countdown::new(self.profile.round_seconds);
        self.frame_count = 0;
        self.phase = RoundState::Running;

        self.events.push(GameEvent::RoundStarted {
            seconds: self.profile.round_seconds,
        });
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::CountdownChanged {
            remaining: self.profile.round_seconds,
        });

        log::info!(
            "Round {} started ({}, {}s)",
            self.generation,
            self.profile.label,
            self.profile.round_seconds
        );
        RoundToken(self.generation)
    }

    /// Stop the active round's callbacks; a no-op when nothing is running
    pub fn cancel_round(&mut self) {
        if self.phase == RoundState::Running {
            self.generation += 1;
            self.phase = RoundState::NotStarted;
            log::info!("Round cancelled");
        }
    }

    /// Leave any state through Idle and immediately start again
    pub fn restart(&mut self) -> RoundToken {
        self.cancel_round();
        self.phase = RoundState::NotStarted;
        self.start_round()
    }

    /// Token still names the live, running round
    #[inline]
    pub fn is_active(&self, token: RoundToken) -> bool {
        token.0 == self.generation && self.phase == RoundState::Running
    }

    /// Token names the most recent round, whatever its state
    #[inline]
    pub fn is_current(&self, token: RoundToken) -> bool {
        token.0 == self.generation
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn finish(&mut self, phase: RoundState) {
        debug_assert!(phase.is_terminal());
        self.phase = phase;
        let score = self.score.value();
        match phase {
            RoundState::WonRound => {
                log::info!("Round won after {} frames", self.frame_count);
                self.events.push(GameEvent::RoundWon { score });
            }
            RoundState::LostRound => {
                log::info!("Round lost with score {score}");
                self.events.push(GameEvent::RoundLost { score });
            }
            RoundState::NotStarted | RoundState::Running => {}
        }
    }

    /// Confetti: bursts scattered over the whole viewport
    pub fn celebrate(&mut self) {
        let burst = self.settings.particle_burst;
        for _ in 0..CELEBRATION_BURSTS {
            let pos = Vec2::new(
                self.rng.random::<f32>() * self.viewport.width,
                self.rng.random::<f32>() * self.viewport.height,
            );
            let color = palette::CONFETTI[self.rng.random_range(0..palette::CONFETTI.len())];
            emit_burst(&mut self.rng, &mut self.particles, pos, color, burst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session() -> GameSession {
        GameSession::new(
            Settings::default(),
            Viewport::new(800.0, 600.0).unwrap(),
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_viewport_rejects_bad_sizes() {
        assert!(Viewport::new(0.0, 600.0).is_err());
        assert!(Viewport::new(800.0, -1.0).is_err());
        assert!(Viewport::new(f32::NAN, 600.0).is_err());
        assert!(Viewport::new(f32::INFINITY, 600.0).is_err());
    }

    #[test]
    fn test_start_round_resets() {
        let mut session = session();
        assert_eq!(session.phase, RoundState::NotStarted);

        session.score.apply(5);
        session.celebrate();
        let token = session.start_round();

        assert!(session.is_active(token));
        assert_eq!(session.score.value(), 0);
        assert!(session.particles.is_empty());
        assert_eq!(session.countdown.remaining(), 30);
        assert_eq!(
            session.drain_events(),
            vec![
                GameEvent::RoundStarted { seconds: 30 },
                GameEvent::ScoreChanged { score: 0 },
                GameEvent::CountdownChanged { remaining: 30 },
            ]
        );
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut session = session();
        let first = session.start_round();
        let second = session.restart();
        assert!(!session.is_active(first));
        assert!(!session.is_current(first));
        assert!(session.is_active(second));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut session = session();
        let token = session.start_round();
        session.cancel_round();
        assert!(!session.is_active(token));
        assert_eq!(session.phase, RoundState::NotStarted);
        session.cancel_round();
        session.cancel_round();
        assert_eq!(session.phase, RoundState::NotStarted);
    }

    #[test]
    fn test_cancel_keeps_terminal_state() {
        let mut session = session();
        session.start_round();
        session.finish(RoundState::LostRound);
        session.cancel_round();
        assert_eq!(session.phase, RoundState::LostRound);
    }

    #[test]
    fn test_resize_reclamps_player() {
        let mut session = session();
        let viewport = session.viewport;
        session.pointer_moved(790.0);
        session.player.clamp_to(&viewport);
        assert_eq!(session.player.pos.x, 720.0);

        session.resize(400.0, 300.0).unwrap();
        assert_eq!(session.player.pos.x, 320.0);
        assert_eq!(session.player.pos.y, 200.0);

        assert!(session.resize(-10.0, 300.0).is_err());
        assert_eq!(session.viewport.width, 400.0);
    }

    #[test]
    fn test_select_difficulty_applies_next_round() {
        let mut session = session();
        session.select_difficulty(Difficulty::Easy);
        assert_eq!(session.profile().spawn_chance, 0.04);
        session.start_round();
        assert_eq!(session.countdown.remaining(), 60);
    }

    #[test]
    fn test_celebrate_emits_400_particles() {
        let mut session = session();
        session.celebrate();
        assert_eq!(session.particles.len(), CELEBRATION_BURSTS * PARTICLE_BURST);
        assert!(
            session
                .particles
                .iter()
                .all(|p| palette::CONFETTI.contains(&p.color))
        );
    }

    #[test]
    fn test_progress_meter() {
        let mut score = Score::default();
        assert_eq!(score.progress(), 0.0);
        score.apply(3);
        assert!((score.progress() - 0.2).abs() < 1e-6);
        score.apply(20);
        assert_eq!(score.progress(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_score_never_negative(deltas in prop::collection::vec(prop::sample::select(vec![-1i32, 1]), 0..200)) {
            let mut score = Score::default();
            let mut expected: i64 = 0;
            for delta in deltas {
                score.apply(delta);
                expected = (expected + delta as i64).max(0);
                prop_assert_eq!(score.value() as i64, expected);
            }
        }
    }
}
