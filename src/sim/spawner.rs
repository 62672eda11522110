//! Probabilistic item spawning
//!
//! One roll per frame. The spawner never touches the item list; the caller
//! appends whatever comes back.

use rand::Rng;

use super::difficulty::DifficultyProfile;
use super::entity::{FallingItem, ItemKind};
use super::state::Viewport;
use crate::consts::ITEM_SIZE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    pub item_size: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            item_size: ITEM_SIZE,
        }
    }
}

impl Spawner {
    pub fn new(item_size: f32) -> Self {
        Self { item_size }
    }

    /// Roll for a spawn this frame
    ///
    /// The second roll (kind), x position and speed are only drawn when the
    /// first roll succeeds.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        profile: &DifficultyProfile,
        viewport: &Viewport,
    ) -> Option<FallingItem> {
        if rng.random::<f32>() >= profile.spawn_chance {
            return None;
        }

        let kind = if rng.random::<f32>() < profile.rose_chance {
            ItemKind::Rose
        } else {
            ItemKind::BrokenHeart
        };

        let span = (viewport.width - self.item_size).max(0.0);
        let x = rng.random::<f32>() * span;

        let (min, max) = match kind {
            ItemKind::Rose => profile.rose_speed,
            ItemKind::BrokenHeart => profile.broken_speed,
        };
        let speed = min + rng.random::<f32>() * (max - min);

        let mut item = FallingItem::new(kind, x, self.item_size, speed);
        item.rotation_speed = (rng.random::<f32>() - 0.5) * 0.1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{EASY, HARD};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn test_spawn_rate_converges() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let spawner = Spawner::default();
        let vp = viewport();
        let trials = 200_000;

        for profile in [HARD, EASY] {
            let spawned = (0..trials)
                .filter(|_| spawner.maybe_spawn(&mut rng, &profile, &vp).is_some())
                .count();
            let rate = spawned as f32 / trials as f32;
            assert!(
                (rate - profile.spawn_chance).abs() < 0.005,
                "rate {rate} vs {}",
                profile.spawn_chance
            );
        }
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let mut rng = Pcg32::seed_from_u64(1);
        let profile = DifficultyProfile {
            spawn_chance: 0.0,
            ..HARD
        };
        let spawner = Spawner::default();
        let vp = viewport();
        assert!((0..10_000).all(|_| spawner.maybe_spawn(&mut rng, &profile, &vp).is_none()));
    }

    #[test]
    fn test_spawned_items_respect_profile() {
        let mut rng = Pcg32::seed_from_u64(99);
        let profile = DifficultyProfile {
            spawn_chance: 1.0,
            ..HARD
        };
        let spawner = Spawner::default();
        let vp = viewport();

        let mut roses = 0;
        let total = 20_000;
        for _ in 0..total {
            let item = spawner.maybe_spawn(&mut rng, &profile, &vp).unwrap();
            assert_eq!(item.pos.y, -ITEM_SIZE);
            assert!(item.pos.x >= 0.0 && item.pos.x <= vp.width - ITEM_SIZE);
            match item.kind {
                ItemKind::Rose => {
                    roses += 1;
                    assert!((2.0..=3.0).contains(&item.speed));
                }
                ItemKind::BrokenHeart => assert!((6.0..=10.0).contains(&item.speed)),
            }
        }

        let rose_rate = roses as f32 / total as f32;
        assert!((rose_rate - 0.18).abs() < 0.02, "rose rate {rose_rate}");
    }

    #[test]
    fn test_narrow_viewport_spawns_at_left_edge() {
        let mut rng = Pcg32::seed_from_u64(5);
        let profile = DifficultyProfile {
            spawn_chance: 1.0,
            ..EASY
        };
        let vp = Viewport::new(20.0, 600.0).unwrap();
        let item = Spawner::default().maybe_spawn(&mut rng, &profile, &vp).unwrap();
        assert_eq!(item.pos.x, 0.0);
    }
}
