//! The mouth-controlled avatar

use glam::Vec2;
use rand::Rng;

use super::particles::Rgb;
use crate::Tuning;

/// Angles at or below this count as a closed mouth
pub const MOUTH_OPEN_EPSILON: f32 = 0.01;

/// Circular collision bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub radius: f32,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    /// Center of the avatar on screen
    pub pos: Vec2,
    /// Half-opening of the mouth (radians, 0 = closed)
    pub mouth_angle: f32,
    /// On-screen size (pixel grid resolution x scale)
    pub display_size: f32,
    /// Avatar pixel grid resolution
    pub pixel_res: u32,
    /// Remaining sparkle bursts
    pub sparkle_count: u32,
    /// Frames until the next burst
    pub sparkle_timer: f32,
    /// Grid cells lit by this frame's burst (empty between bursts)
    pub sparks: Vec<(u8, u8)>,
    /// Color of this frame's burst
    pub spark_color: Rgb,
    sparkle_bursts: u32,
    sparkle_interval: f32,
    sparks_per_burst: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.screen_width / 4.0, tuning.screen_height / 2.0),
            mouth_angle: 0.0,
            display_size: tuning.player_display_size(),
            pixel_res: tuning.pixel_res,
            sparkle_count: 0,
            sparkle_timer: 0.0,
            sparks: Vec::new(),
            spark_color: Rgb::WHITE,
            sparkle_bursts: tuning.sparkle_bursts,
            sparkle_interval: tuning.sparkle_interval(),
            sparks_per_burst: tuning.sparks_per_burst,
        }
    }

    pub fn set_mouth_angle(&mut self, angle: f32) {
        self.mouth_angle = angle.max(0.0);
    }

    pub fn is_mouth_open(&self) -> bool {
        self.mouth_angle > MOUTH_OPEN_EPSILON
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            center: self.pos,
            radius: self.display_size / 2.0,
        }
    }

    /// Begin the life-up sparkle
    pub fn start_sparkle(&mut self) {
        self.sparkle_count = self.sparkle_bursts;
        self.sparkle_timer = 0.0;
    }

    pub fn is_sparkling(&self) -> bool {
        self.sparkle_count > 0
    }

    /// Advance the sparkle one frame, lighting random cells when a burst is due
    pub fn update_sparkle<R: Rng>(&mut self, rng: &mut R) {
        self.sparks.clear();
        if self.sparkle_count == 0 {
            return;
        }

        if self.sparkle_timer <= 0.0 {
            // Yellowish-white, kept off the one-cell border
            self.spark_color = Rgb::new(
                rng.random_range(200..=255),
                rng.random_range(200..=255),
                rng.random_range(0..=100),
            );
            let max_cell = (self.pixel_res.clamp(3, 256) - 1) as u8;
            for _ in 0..self.sparks_per_burst {
                let sx = rng.random_range(1..max_cell);
                let sy = rng.random_range(1..max_cell);
                self.sparks.push((sx, sy));
            }
            self.sparkle_count -= 1;
            self.sparkle_timer = self.sparkle_interval;
        } else {
            self.sparkle_timer -= 1.0;
        }
    }

    /// Closed mouth, no sparkle
    pub fn reset(&mut self) {
        self.mouth_angle = 0.0;
        self.sparkle_count = 0;
        self.sparkle_timer = 0.0;
        self.sparks.clear();
    }
}
