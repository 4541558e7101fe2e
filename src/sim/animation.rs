//! Floating +/- indicators next to the HUD counters

use glam::Vec2;

use crate::Tuning;

/// Indicator style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Plus,
    Minus,
}

/// Which HUD counter an indicator is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudTarget {
    Score,
    Life,
}

/// Frames of artwork per indicator style
pub const EFFECT_IMAGE_COUNT: u32 = 2;

/// HUD text placement for the current score and lives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudLayout {
    pub y: f32,
    pub score_pos: Vec2,
    pub life_pos: Vec2,
    /// Right edge of the centered score text
    pub score_text_end: f32,
    /// Right edge of the centered life text
    pub life_text_end: f32,
}

impl HudLayout {
    pub fn new(tuning: &Tuning, score: u32, lives: i32) -> Self {
        let center_x = tuning.screen_width / 2.0;
        let score_x = center_x - tuning.hud_spacing;
        let life_x = center_x + tuning.hud_spacing;
        let score_width = score_text(score).chars().count() as f32 * tuning.hud_glyph_width;
        let life_width = life_text(lives).chars().count() as f32 * tuning.hud_glyph_width;
        Self {
            y: tuning.hud_y,
            score_pos: Vec2::new(score_x, tuning.hud_y),
            life_pos: Vec2::new(life_x, tuning.hud_y),
            score_text_end: score_x + score_width / 2.0,
            life_text_end: life_x + life_width / 2.0,
        }
    }

    fn text_end(&self, target: HudTarget) -> f32 {
        match target {
            HudTarget::Score => self.score_text_end,
            HudTarget::Life => self.life_text_end,
        }
    }
}

/// HUD score label
pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}

/// HUD life label (double space lines it up with the score label)
pub fn life_text(lives: i32) -> String {
    format!("Life:  {}", lives)
}

/// One running indicator
#[derive(Debug, Clone)]
pub struct EffectAnimation {
    pub kind: EffectKind,
    /// Top-left of the icon
    pub pos: Vec2,
    pub frame: u32,
    timer: u32,
    frame_time: u32,
    total_frames: u32,
}

impl EffectAnimation {
    pub fn new(kind: EffectKind, pos: Vec2, frame_time: u32, total_frames: u32) -> Self {
        Self {
            kind,
            pos,
            frame: 0,
            timer: frame_time,
            frame_time,
            total_frames,
        }
    }

    pub fn update(&mut self) {
        if self.is_finished() {
            return;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.frame += 1;
            self.timer = self.frame_time;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.total_frames
    }

    /// Artwork frame to show
    pub fn image_index(&self) -> u32 {
        self.frame % EFFECT_IMAGE_COUNT
    }
}

/// Owns every running indicator
#[derive(Debug, Clone)]
pub struct AnimationManager {
    pub animations: Vec<EffectAnimation>,
    icon_size: f32,
    frame_time: u32,
    total_frames: u32,
}

impl AnimationManager {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            animations: Vec::new(),
            icon_size: tuning.icon_size,
            frame_time: tuning.anim_frame_time,
            total_frames: tuning.anim_frames,
        }
    }

    pub fn trigger_plus(&mut self, target: HudTarget, hud: &HudLayout) {
        self.trigger(EffectKind::Plus, target, hud);
    }

    pub fn trigger_minus(&mut self, target: HudTarget, hud: &HudLayout) {
        self.trigger(EffectKind::Minus, target, hud);
    }

    fn trigger(&mut self, kind: EffectKind, target: HudTarget, hud: &HudLayout) {
        let pos = Vec2::new(hud.text_end(target) + 10.0, hud.y - self.icon_size / 2.0);
        self.animations
            .push(EffectAnimation::new(kind, pos, self.frame_time, self.total_frames));
    }

    /// Advance every indicator one tick and drop finished ones
    pub fn update(&mut self) {
        self.animations.retain_mut(|anim| {
            anim.update();
            !anim.is_finished()
        });
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn reset(&mut self) {
        self.animations.clear();
    }
}
