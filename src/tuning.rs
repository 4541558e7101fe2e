//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON override can retune a build
//! without recompiling. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_HZ;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    /// Logical drawing surface width
    pub screen_width: f32,
    /// Logical drawing surface height
    pub screen_height: f32,
    /// Item and effect icon size (pixels)
    pub icon_size: f32,

    // === Player ===
    /// Pixel-art grid resolution of the avatar
    pub pixel_res: u32,
    /// Screen pixels per avatar grid cell
    pub pixel_scale: f32,
    /// Mouth angle while the open button is held
    pub button_max_angle: f32,
    /// Lip distance at or below which the mouth counts as closed
    pub face_close_threshold: f32,
    /// Lip distance mapped to the widest mouth angle
    pub face_max_open_distance: f32,
    /// Widest mouth angle in face mode
    pub max_mouth_angle: f32,
    /// Upper lip landmark indices (averaged)
    pub upper_lip_indices: Vec<usize>,
    /// Lower lip landmark indices (averaged)
    pub lower_lip_indices: Vec<usize>,

    // === Sparkle ===
    /// Spark bursts per life-up sparkle
    pub sparkle_bursts: u32,
    /// Total sparkle duration in frames
    pub sparkle_duration_frames: f32,
    /// Sparks drawn per burst
    pub sparks_per_burst: u32,

    // === Items ===
    /// Milliseconds between regular spawns
    pub spawn_interval_ms: u32,
    /// Probability that a regular spawn is food rather than a ghost
    pub food_probability: f32,
    /// Number of food sprites
    pub food_variants: u8,
    /// Number of ghost sprites
    pub ghost_variants: u8,
    /// Ghost speed relative to the rolled base speed
    pub ghost_speed_multiplier: f32,
    /// Slowest item speed (pixels per frame)
    pub item_speed_min: f32,
    /// Fastest item speed (pixels per frame)
    pub item_speed_max: f32,
    /// Hit radius added to the player radius, as a fraction of icon size
    pub hitbox_icon_fraction: f32,

    // === Scoring ===
    /// Lives at session start
    pub starting_lives: i32,
    /// Score step between life-up spawns
    pub life_score_threshold: u32,

    // === Effects ===
    /// Frames in a plus/minus indicator
    pub anim_frames: u32,
    /// Ticks per indicator frame
    pub anim_frame_time: u32,
    /// Particles per burst
    pub particle_count: u32,
    /// Lifespan lost per tick (lifespan starts at 255)
    pub particle_lifespan_decrement: f32,
    /// Particle launch speed range (pixels per frame)
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    /// Particle square size range (pixels)
    pub particle_size_min: f32,
    pub particle_size_max: f32,
    /// Downward acceleration (pixels per frame squared)
    pub particle_gravity: f32,

    // === HUD ===
    /// HUD text baseline
    pub hud_y: f32,
    /// Horizontal offset of score/life text from screen center
    pub hud_spacing: f32,
    /// Approximate glyph advance of the HUD font
    pub hud_glyph_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            icon_size: 64.0,

            pixel_res: 16,
            pixel_scale: 10.0,
            button_max_angle: std::f32::consts::FRAC_PI_4,
            face_close_threshold: 25.0,
            face_max_open_distance: 70.0,
            max_mouth_angle: std::f32::consts::FRAC_PI_2,
            upper_lip_indices: vec![61, 185, 40, 39, 37],
            lower_lip_indices: vec![146, 91, 181, 84, 17],

            sparkle_bursts: 16,
            sparkle_duration_frames: 30.0, // ~0.5 sec at 60fps
            sparks_per_burst: 4,

            spawn_interval_ms: 1000,
            food_probability: 0.65,
            food_variants: 4,
            ghost_variants: 4,
            ghost_speed_multiplier: 1.4,
            item_speed_min: 2.0,
            item_speed_max: 5.0,
            hitbox_icon_fraction: 1.0 / 3.0,

            starting_lives: 3,
            life_score_threshold: 10,

            anim_frames: 4,
            anim_frame_time: 5,
            particle_count: 10,
            particle_lifespan_decrement: 5.0,
            particle_speed_min: 1.0,
            particle_speed_max: 4.0,
            particle_size_min: 8.0,
            particle_size_max: 16.0,
            particle_gravity: 0.1,

            hud_y: 140.0,
            hud_spacing: 200.0,
            hud_glyph_width: 26.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.normalized())
    }

    /// Repair values that would break the simulation (inverted ranges, zero counts)
    pub fn normalized(mut self) -> Self {
        fn order(min: &mut f32, max: &mut f32) {
            if *min > *max {
                std::mem::swap(min, max);
            }
        }
        order(&mut self.item_speed_min, &mut self.item_speed_max);
        order(&mut self.particle_speed_min, &mut self.particle_speed_max);
        order(&mut self.particle_size_min, &mut self.particle_size_max);
        order(&mut self.face_close_threshold, &mut self.face_max_open_distance);
        self.food_variants = self.food_variants.max(1);
        self.ghost_variants = self.ghost_variants.max(1);
        self.pixel_res = self.pixel_res.clamp(3, u8::MAX as u32);
        self.life_score_threshold = self.life_score_threshold.max(1);
        self.sparkle_bursts = self.sparkle_bursts.max(1);
        self.anim_frame_time = self.anim_frame_time.max(1);
        self.food_probability = self.food_probability.clamp(0.0, 1.0);
        self
    }

    /// Spawn interval converted to frame ticks (at least one)
    pub fn spawn_interval_frames(&self) -> u32 {
        ((self.spawn_interval_ms as f32 * FRAME_HZ / 1000.0).round() as u32).max(1)
    }

    /// Frames between sparkle bursts
    pub fn sparkle_interval(&self) -> f32 {
        self.sparkle_duration_frames / self.sparkle_bursts as f32
    }

    /// On-screen size of the avatar
    pub fn player_display_size(&self) -> f32 {
        self.pixel_res as f32 * self.pixel_scale
    }

    /// LocalStorage key for tuning overrides (wasm only)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pac_boy_tuning";

    /// Load a tuning override from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring invalid tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_interval_ms": 500 }"#).unwrap();
        assert_eq!(tuning.spawn_interval_ms, 500);
        assert_eq!(tuning.spawn_interval_frames(), 30);
        assert_eq!(tuning.starting_lives, 3);
        assert_eq!(tuning.upper_lip_indices, vec![61, 185, 40, 39, 37]);
    }

    #[test]
    fn test_inverted_ranges_are_repaired() {
        let tuning =
            Tuning::from_json(r#"{ "item_speed_min": 6.0, "item_speed_max": 1.0 }"#).unwrap();
        assert_eq!(tuning.item_speed_min, 1.0);
        assert_eq!(tuning.item_speed_max, 6.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_derived_values() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval_frames(), 60);
        assert!((tuning.sparkle_interval() - 1.875).abs() < 1e-6);
        assert_eq!(tuning.player_display_size(), 160.0);
    }

    #[test]
    fn test_pixel_res_fits_grid_cells() {
        let tuning = Tuning::from_json(r#"{ "pixel_res": 257 }"#).unwrap();
        assert_eq!(tuning.pixel_res, 255);
        let tuning = Tuning::from_json(r#"{ "pixel_res": 1 }"#).unwrap();
        assert_eq!(tuning.pixel_res, 3);
    }

    #[test]
    fn test_life_threshold_at_least_one() {
        let tuning = Tuning::from_json(r#"{ "life_score_threshold": 0 }"#).unwrap();
        assert_eq!(tuning.life_score_threshold, 1);
    }
}
