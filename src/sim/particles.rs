//! Decorative burst particles
//!
//! Particles never affect gameplay; they only exist so the renderer has
//! something to splash when an item is hit.

use glam::Vec2;
use rand::Rng;

use crate::Tuning;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Food eaten
    pub const PAC_YELLOW: Rgb = Rgb::new(255, 204, 0);
    /// Food hit with a closed mouth
    pub const PENALTY_RED: Rgb = Rgb::new(207, 12, 12);
    /// Ghost dodged
    pub const GHOST_BLUE: Rgb = Rgb::new(74, 144, 226);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }
}

/// Full lifespan on the 0-255 alpha scale
pub const PARTICLE_LIFESPAN: f32 = 255.0;

/// A single square particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    /// Remaining life, doubles as alpha (0-255)
    pub lifespan: f32,
    pub color: Rgb,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, decrement: f32) {
        self.vel += self.acc;
        self.pos += self.vel;
        self.lifespan -= decrement;
    }

    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0.0
    }

    /// Alpha on the 0-255 scale
    pub fn alpha(&self) -> f32 {
        self.lifespan.clamp(0.0, PARTICLE_LIFESPAN)
    }
}

/// Owns every live particle
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    speed_range: (f32, f32),
    size_range: (f32, f32),
    gravity: f32,
    decrement: f32,
}

impl ParticleSystem {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            particles: Vec::new(),
            speed_range: (tuning.particle_speed_min, tuning.particle_speed_max),
            size_range: (tuning.particle_size_min, tuning.particle_size_max),
            gravity: tuning.particle_gravity,
            decrement: tuning.particle_lifespan_decrement,
        }
    }

    /// Emit `count` particles from one origin, each with its own random heading
    pub fn create_burst<R: Rng>(&mut self, pos: Vec2, color: Rgb, count: u32, rng: &mut R) {
        self.particles.reserve(count as usize);
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(self.speed_range.0..=self.speed_range.1);
            let size = rng.random_range(self.size_range.0..=self.size_range.1);
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                acc: Vec2::new(0.0, self.gravity), // screen y points down
                lifespan: PARTICLE_LIFESPAN,
                color,
                size,
            });
        }
    }

    /// Integrate one tick and drop dead particles
    pub fn update(&mut self) {
        let decrement = self.decrement;
        self.particles.retain_mut(|p| {
            p.update(decrement);
            !p.is_dead()
        });
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn reset(&mut self) {
        self.particles.clear();
    }
}
