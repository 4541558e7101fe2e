//! Game state to vertex list
//!
//! Builds one frame of screen-space geometry. Text (HUD, menus) lives in the
//! DOM overlay, so only sprites, particles, and indicators are drawn here.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::Settings;
use crate::sim::{EffectAnimation, EffectKind, GamePhase, GameState, Item, ItemKind, Player};

const FRAME_THICKNESS: f32 = 12.0;
const SEGMENTS: u32 = 24;

/// Build every vertex for the current frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let tuning = &state.tuning;
    let mut vertices = Vec::with_capacity(4096);

    vertices.extend(shapes::rect(
        Vec2::ZERO,
        Vec2::new(tuning.screen_width, tuning.screen_height),
        colors::BACKGROUND,
    ));

    if settings.frame_border {
        let size = Vec2::new(tuning.screen_width, tuning.screen_height);
        vertices.extend(shapes::frame(Vec2::ZERO, size, FRAME_THICKNESS, colors::FRAME));
        vertices.extend(shapes::frame(
            Vec2::splat(FRAME_THICKNESS),
            size - Vec2::splat(FRAME_THICKNESS * 2.0),
            FRAME_THICKNESS / 3.0,
            colors::FRAME_INNER,
        ));
    }

    match state.phase() {
        GamePhase::MainMenu | GamePhase::ModeSelect => {
            // Idle chomp behind the menu panels
            let phase = (state.time_ticks % 30) as f32 / 30.0;
            let angle = (phase * 2.0 * PI).sin().abs() * tuning.button_max_angle;
            vertices.extend(player_sprite(&state.player, angle));
        }
        GamePhase::Playing | GamePhase::GameOver => {
            for item in &state.items.items {
                vertices.extend(item_sprite(item, tuning.icon_size));
            }
            vertices.extend(player_sprite(&state.player, state.player.mouth_angle));
            if settings.particles {
                for p in &state.particles.particles {
                    let color = p.color.to_rgba(p.alpha() / 255.0);
                    vertices.extend(shapes::square(p.pos, p.size, color));
                }
            }
            for anim in &state.animations.animations {
                vertices.extend(indicator_glyph(anim, tuning.icon_size));
            }
        }
    }

    vertices
}

/// Pixel-grid avatar facing right, with the mouth cut out and sparkle cells on top
fn player_sprite(player: &Player, mouth_angle: f32) -> Vec<Vertex> {
    let res = player.pixel_res.max(1);
    let cell = player.display_size / res as f32;
    let origin = player.pos - Vec2::splat(player.display_size / 2.0);
    let half = res as f32 / 2.0;
    let mut vertices = Vec::new();

    for gy in 0..res {
        for gx in 0..res {
            let local = Vec2::new(gx as f32 + 0.5 - half, gy as f32 + 0.5 - half);
            if local.length() > half {
                continue;
            }
            if local.x > 0.0 && local.y.atan2(local.x).abs() < mouth_angle {
                continue;
            }
            let min = origin + Vec2::new(gx as f32, gy as f32) * cell;
            vertices.extend(shapes::rect(min, Vec2::splat(cell), colors::PAC_BODY));
        }
    }

    // Eye sits above the mouth line, a quarter in from the right
    let eye_cell = Vec2::new(half + res as f32 / 8.0, half - res as f32 / 4.0).floor();
    let eye_local = eye_cell + Vec2::splat(0.5) - Vec2::splat(half);
    if eye_local.y.atan2(eye_local.x).abs() >= mouth_angle {
        vertices.extend(shapes::rect(
            origin + eye_cell * cell,
            Vec2::splat(cell),
            colors::PAC_EYE,
        ));
    }

    let spark = player.spark_color.to_rgba(1.0);
    for &(sx, sy) in &player.sparks {
        let min = origin + Vec2::new(sx as f32, sy as f32) * cell;
        vertices.extend(shapes::rect(min, Vec2::splat(cell), spark));
    }

    vertices
}

fn item_sprite(item: &Item, icon_size: f32) -> Vec<Vertex> {
    match item.kind {
        ItemKind::Food => food_sprite(item.pos, icon_size, item.variant),
        ItemKind::Ghost => ghost_sprite(item.pos, icon_size, item.variant),
        ItemKind::LifeUp => heart_sprite(item.pos, icon_size),
    }
}

fn food_sprite(center: Vec2, size: f32, variant: u8) -> Vec<Vertex> {
    let color = colors::FOODS[variant as usize % colors::FOODS.len()];
    let r = size * 0.38;
    let body = center + Vec2::new(0.0, size * 0.08);
    let mut vertices = shapes::circle(body, r, color, SEGMENTS);
    // Stem and leaf
    vertices.extend(shapes::rect(
        Vec2::new(center.x - size * 0.03, body.y - r - size * 0.14),
        Vec2::new(size * 0.06, size * 0.16),
        colors::STEM,
    ));
    vertices.extend(shapes::triangle(
        Vec2::new(center.x, body.y - r - size * 0.06),
        Vec2::new(center.x + size * 0.2, body.y - r - size * 0.16),
        Vec2::new(center.x + size * 0.16, body.y - r + size * 0.02),
        colors::STEM,
    ));
    // Highlight
    vertices.extend(shapes::circle(
        body + Vec2::new(-r * 0.4, -r * 0.4),
        r * 0.2,
        [1.0, 1.0, 1.0, 0.6],
        8,
    ));
    vertices
}

fn ghost_sprite(center: Vec2, size: f32, variant: u8) -> Vec<Vertex> {
    let color = colors::GHOSTS[variant as usize % colors::GHOSTS.len()];
    let r = size * 0.42;
    let head = center - Vec2::new(0.0, size * 0.06);
    let hem = center.y + size * 0.32;

    // Dome, then skirt down to the hem
    let mut vertices = shapes::pie(head, r, PI, PI, color, SEGMENTS);
    vertices.extend(shapes::rect(
        Vec2::new(head.x - r, head.y),
        Vec2::new(2.0 * r, hem - head.y),
        color,
    ));
    // Wavy feet
    let feet = 4;
    let foot_w = 2.0 * r / feet as f32;
    for i in 0..feet {
        let left = head.x - r + i as f32 * foot_w;
        vertices.extend(shapes::triangle(
            Vec2::new(left, hem),
            Vec2::new(left + foot_w, hem),
            Vec2::new(left + foot_w / 2.0, hem + size * 0.12),
            color,
        ));
    }
    // Eyes looking left, toward the player
    for dx in [-0.17, 0.17] {
        let eye = head + Vec2::new(dx * size, 0.0);
        vertices.extend(shapes::circle(eye, size * 0.11, colors::GHOST_EYE, 12));
        vertices.extend(shapes::circle(
            eye - Vec2::new(size * 0.05, 0.0),
            size * 0.055,
            colors::GHOST_PUPIL,
            8,
        ));
    }
    vertices
}

fn heart_sprite(center: Vec2, size: f32) -> Vec<Vertex> {
    let lobe = size * 0.22;
    let top = center.y - size * 0.1;
    let left = Vec2::new(center.x - lobe, top);
    let right = Vec2::new(center.x + lobe, top);

    let mut vertices = shapes::circle(left, lobe, colors::LIFE_HEART, SEGMENTS);
    vertices.extend(shapes::circle(right, lobe, colors::LIFE_HEART, SEGMENTS));
    vertices.extend(shapes::triangle(
        Vec2::new(center.x - 2.0 * lobe, top + lobe * 0.3),
        Vec2::new(center.x + 2.0 * lobe, top + lobe * 0.3),
        Vec2::new(center.x, center.y + size * 0.38),
        colors::LIFE_HEART,
    ));
    vertices.extend(shapes::circle(
        left - Vec2::splat(lobe * 0.35),
        lobe * 0.3,
        colors::LIFE_SHINE,
        8,
    ));
    vertices
}

/// "+" or "-" glyph; odd artwork frames flash white
fn indicator_glyph(anim: &EffectAnimation, icon_size: f32) -> Vec<Vertex> {
    let center = anim.pos + Vec2::splat(icon_size / 2.0);
    let color = match (anim.kind, anim.image_index()) {
        (_, 1) => colors::GLYPH_FLASH,
        (EffectKind::Plus, _) => colors::PLUS,
        (EffectKind::Minus, _) => colors::MINUS,
    };
    let long = icon_size * 0.6;
    let thick = icon_size * 0.18;

    let mut vertices = shapes::rect(
        center - Vec2::new(long / 2.0, thick / 2.0),
        Vec2::new(long, thick),
        color,
    );
    if anim.kind == EffectKind::Plus {
        vertices.extend(shapes::rect(
            center - Vec2::new(thick / 2.0, long / 2.0),
            Vec2::new(thick, long),
            color,
        ));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_open_mouth_removes_cells() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        let closed = player_sprite(&player, 0.0).len();
        let open = player_sprite(&player, tuning.max_mouth_angle).len();
        assert!(open < closed);
    }

    #[test]
    fn test_sparks_drawn() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let base = player_sprite(&player, 0.0).len();
        player.sparks = vec![(3, 3), (4, 5)];
        assert_eq!(player_sprite(&player, 0.0).len(), base + 12);
    }

    #[test]
    fn test_particles_follow_setting() {
        let mut state = GameState::new(1, Tuning::default());
        state.session.phase = GamePhase::Playing;
        let pos = state.player.pos;
        state
            .particles
            .create_burst(pos, crate::sim::Rgb::WHITE, 10, &mut state.rng);

        let on = Settings::default();
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        let with = build_scene(&state, &on).len();
        let without = build_scene(&state, &off).len();
        assert_eq!(with - without, 10 * 6);
    }

    #[test]
    fn test_scene_stays_on_screen_for_menu() {
        let state = GameState::new(1, Tuning::default());
        let scene = build_scene(&state, &Settings::default());
        assert!(!scene.is_empty());
        for v in scene {
            assert!(v.position[0] >= 0.0 && v.position[0] <= 1280.0);
            assert!(v.position[1] >= 0.0 && v.position[1] <= 720.0);
        }
    }
}
