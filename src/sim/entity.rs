//! Entities and their per-frame update/draw contract
//!
//! Positions are in viewport pixels: origin top-left, y grows downward.
//! Every speed is "pixels per frame callback", so perceived speed follows
//! the display's refresh rate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::consts::*;

/// Linear RGBA color
pub type Rgba = [f32; 4];

/// Colors for game elements
pub mod palette {
    use super::Rgba;

    pub const PLAYER_BODY: Rgba = [1.0, 0.302, 0.427, 1.0]; // #ff4d6d
    pub const PLAYER_FACE: Rgba = [1.0, 0.894, 0.882, 1.0]; // #ffe4e1
    pub const PLAYER_EYES: Rgba = [0.2, 0.2, 0.2, 1.0];
    pub const PLAYER_WINGS: Rgba = [1.0, 0.702, 0.757, 1.0]; // #ffb3c1

    pub const ROSE_PETALS: Rgba = [0.788, 0.094, 0.290, 1.0];
    pub const ROSE_LEAF: Rgba = [0.2, 0.6, 0.25, 1.0];
    pub const BROKEN_HEART: Rgba = [0.55, 0.15, 0.25, 1.0];

    /// Burst emitted when a rose is caught
    pub const ROSE_BURST: Rgba = [1.0, 0.302, 0.427, 0.8];
    /// Burst emitted when a broken heart hits
    pub const BROKEN_BURST: Rgba = [0.392, 0.392, 0.392, 0.8];

    pub const CONFETTI: [Rgba; 5] = [
        [1.0, 0.302, 0.427, 1.0], // #ff4d6d
        [1.0, 0.702, 0.757, 1.0], // #ffb3c1
        [1.0, 0.561, 0.639, 1.0], // #ff8fa3
        [0.788, 0.094, 0.290, 1.0], // #c9184a
        [1.0, 0.843, 0.0, 1.0],   // #ffd700
    ];
}

/// Drawing surface the simulation renders into
///
/// Implemented by the GPU frame builder and by recording fakes in tests.
pub trait Painter {
    /// Wipe the whole surface
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Filled ellipse with half-axes `radii`, rotated by `rotation` radians
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba);
}

/// Shared per-frame capability of everything on screen
pub trait Entity {
    fn update(&mut self, viewport: &Viewport);
    fn draw(&self, painter: &mut dyn Painter);
}

/// The catcher at the bottom of the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (pixels per frame); pointer input bypasses it
    pub dx: f32,
    /// Autopilot steering limit (pixels per frame)
    pub speed: f32,
}

impl Player {
    /// Center the player horizontally, `bottom_offset` pixels above the bottom edge
    pub fn new(viewport: &Viewport, size: Vec2, bottom_offset: f32) -> Self {
        Self {
            pos: Vec2::new(
                viewport.width / 2.0 - size.x / 2.0,
                viewport.height - bottom_offset,
            ),
            size,
            dx: 0.0,
            speed: PLAYER_SPEED,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision radius (half the width, for both axes)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.x / 2.0
    }

    /// Direct position control: center the player under the pointer
    pub fn follow_pointer(&mut self, pointer_x: f32) {
        self.dx = 0.0;
        self.pos.x = pointer_x - self.size.x / 2.0;
    }

    /// Set velocity toward `target_x`, limited to the player's speed
    pub fn steer_toward(&mut self, target_x: f32) {
        let delta = target_x - self.center().x;
        self.dx = delta.clamp(-self.speed, self.speed);
    }

    /// Keep the player inside [0, viewport.width - width]
    pub fn clamp_to(&mut self, viewport: &Viewport) {
        let max_x = viewport.width - self.size.x;
        if self.pos.x > max_x {
            self.pos.x = max_x;
        }
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
        }
    }
}

impl Entity for Player {
    fn update(&mut self, viewport: &Viewport) {
        self.pos.x += self.dx;
        self.clamp_to(viewport);
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let c = self.center();
        let r = self.radius();

        // Wings behind the body
        let wing = Vec2::new(15.0, 25.0);
        painter.fill_ellipse(
            Vec2::new(self.pos.x - 10.0, c.y),
            wing,
            -0.3,
            palette::PLAYER_WINGS,
        );
        painter.fill_ellipse(
            Vec2::new(self.pos.x + self.size.x + 10.0, c.y),
            wing,
            0.3,
            palette::PLAYER_WINGS,
        );

        painter.fill_circle(c, r, palette::PLAYER_BODY);
        painter.fill_circle(c, self.size.x / 3.0, palette::PLAYER_FACE);
        painter.fill_circle(c + Vec2::new(-12.0, -5.0), 4.0, palette::PLAYER_EYES);
        painter.fill_circle(c + Vec2::new(12.0, -5.0), 4.0, palette::PLAYER_EYES);
    }
}

/// What fell from the sky
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Rose,
    BrokenHeart,
}

impl ItemKind {
    /// Particle color emitted when this kind collides with the player
    pub fn burst_color(&self) -> Rgba {
        match self {
            ItemKind::Rose => palette::ROSE_BURST,
            ItemKind::BrokenHeart => palette::BROKEN_BURST,
        }
    }
}

/// A rose or broken heart falling at constant speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub kind: ItemKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Edge length of the square bounding box
    pub size: f32,
    /// Downward speed (pixels per frame)
    pub speed: f32,
    /// Cosmetic spin, no gameplay effect
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl FallingItem {
    pub fn new(kind: ItemKind, x: f32, size: f32, speed: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, -size),
            size,
            speed,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Fell past the bottom edge
    pub fn is_below(&self, viewport: &Viewport) -> bool {
        self.pos.y > viewport.height
    }
}

impl Entity for FallingItem {
    fn update(&mut self, _viewport: &Viewport) {
        self.pos.y += self.speed;
        self.rotation += self.rotation_speed;
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let c = self.center();
        let r = self.radius();
        match self.kind {
            ItemKind::Rose => {
                painter.fill_ellipse(
                    c + Vec2::new(r * 0.35, r * 0.55),
                    Vec2::new(r * 0.45, r * 0.2),
                    0.6,
                    palette::ROSE_LEAF,
                );
                painter.fill_circle(c, r * 0.7, palette::ROSE_PETALS);
                painter.fill_circle(c, r * 0.35, palette::ROSE_BURST);
            }
            ItemKind::BrokenHeart => {
                // Two lobes pulled apart
                let lobe = Vec2::new(r * 0.4, r * 0.7);
                painter.fill_ellipse(c + Vec2::new(-r * 0.4, 0.0), lobe, 0.35, palette::BROKEN_HEART);
                painter.fill_ellipse(c + Vec2::new(r * 0.4, 0.0), lobe, -0.35, palette::BROKEN_HEART);
            }
        }
    }
}

/// Short-lived visual spark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Starts at `PARTICLE_LIFE`, loses `PARTICLE_DECAY` per update
    pub life: i32,
    pub color: Rgba,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, color: Rgba) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 6.0,
                (rng.random::<f32>() - 0.5) * 6.0,
            ),
            size: rng.random::<f32>() * 6.0 + 2.0,
            life: PARTICLE_LIFE,
            color,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    /// Draw opacity, fading linearly with remaining life
    pub fn opacity(&self) -> f32 {
        (self.life as f32 / PARTICLE_LIFE as f32).clamp(0.0, 1.0)
    }
}

impl Entity for Particle {
    fn update(&mut self, _viewport: &Viewport) {
        self.pos += self.vel;
        self.life -= PARTICLE_DECAY;
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let mut color = self.color;
        color[3] *= self.opacity();
        painter.fill_circle(self.pos, self.size, color);
    }
}

/// Append `count` particles spraying out of `pos`
pub fn emit_burst<R: Rng + ?Sized>(
    rng: &mut R,
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: Rgba,
    count: usize,
) {
    particles.reserve(count);
    for _ in 0..count {
        particles.push(Particle::new(rng, pos, color));
    }
}
