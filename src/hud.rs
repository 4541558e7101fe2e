//! DOM overlay placement and labels
//!
//! HUD text is drawn by the browser on top of the canvas. It is positioned in
//! CSS pixels through the same letterbox the renderer applies to the play
//! field, so the canvas indicators stay next to the text they annotate.

use glam::Vec2;

use crate::Tuning;
use crate::renderer::pipeline::letterbox;
use crate::sim::{ControlMode, GamePhase};

/// Horizontal advance of one "Courier New" glyph, in em
pub const MONO_ADVANCE_EM: f32 = 0.6;

/// Font size in play-field units whose glyphs are `hud_glyph_width` wide
pub fn font_size(tuning: &Tuning) -> f32 {
    tuning.hud_glyph_width / MONO_ADVANCE_EM
}

/// Where a centered HUD label goes on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudPlacement {
    /// Label center, CSS pixels from the canvas left edge
    pub left: f32,
    /// Label center, CSS pixels from the canvas top edge
    pub top: f32,
    pub font_px: f32,
}

impl HudPlacement {
    /// Inline style for an element centered with `translate(-50%, -50%)`
    pub fn style(&self) -> String {
        format!(
            "left:{:.1}px;top:{:.1}px;font-size:{:.2}px",
            self.left, self.top, self.font_px
        )
    }
}

/// Map a play-field point to the page for a canvas of `viewport` CSS pixels
pub fn place(pos: Vec2, tuning: &Tuning, viewport: (u32, u32)) -> HudPlacement {
    let (scale, offset_x, offset_y) =
        letterbox(viewport, (tuning.screen_width, tuning.screen_height));
    HudPlacement {
        left: offset_x + pos.x * scale,
        top: offset_y + pos.y * scale,
        font_px: font_size(tuning) * scale,
    }
}

/// Camera line under the menus; `None` once a run has started
pub fn camera_status(phase: GamePhase, camera: bool) -> Option<&'static str> {
    match phase {
        GamePhase::MainMenu | GamePhase::ModeSelect => Some(if camera {
            "Camera Ready - All Modes Available"
        } else {
            "Camera Not Available - Button Mode Only"
        }),
        GamePhase::Playing | GamePhase::GameOver => None,
    }
}

/// CSS class of a mode-select entry. Face mode is hidden without a camera.
pub fn mode_option_class(mode: ControlMode, selected: ControlMode, camera: bool) -> &'static str {
    if mode == ControlMode::Face && !camera {
        "mode-option hidden"
    } else if mode == selected {
        "mode-option selected"
    } else {
        "mode-option"
    }
}
