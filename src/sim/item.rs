//! Scrolling items and the manager that spawns, moves, and resolves them

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::animation::{AnimationManager, HudLayout, HudTarget};
use super::particles::{ParticleSystem, Rgb};
use super::player::{Bounds, Player};
use super::sound::{AudioQueue, Cue};
use super::state::{GamePhase, Session};
use crate::Tuning;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Eat with an open mouth, never with a closed one
    Food,
    /// Keep the mouth shut; biting it ends the run
    Ghost,
    /// Extra life when eaten
    LifeUp,
}

/// A scrolling item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    /// Leftward speed in pixels per frame
    pub speed: f32,
    /// Sprite index within the kind
    pub variant: u8,
}

/// Everything an item effect may touch
pub struct EffectContext<'a> {
    pub tuning: &'a Tuning,
    pub session: &'a mut Session,
    pub player: &'a mut Player,
    pub animations: &'a mut AnimationManager,
    pub particles: &'a mut ParticleSystem,
    pub audio: &'a mut AudioQueue,
    pub rng: &'a mut Pcg32,
}

impl EffectContext<'_> {
    fn hud(&self) -> HudLayout {
        HudLayout::new(self.tuning, self.session.score, self.session.lives)
    }
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec2, speed: f32, variant: u8) -> Self {
        Self {
            kind,
            pos,
            speed,
            variant,
        }
    }

    pub fn advance(&mut self) {
        self.pos.x -= self.speed;
    }

    pub fn is_off_screen(&self, icon_size: f32) -> bool {
        self.pos.x < -icon_size
    }

    /// Lenient circle test: the item counts as touching once its center is
    /// within the player radius plus a fraction of the icon size
    pub fn collides(&self, player: &Bounds, tuning: &Tuning) -> bool {
        let reach = player.radius + tuning.icon_size * tuning.hitbox_icon_fraction;
        self.pos.distance(player.center) < reach
    }

    /// Apply this item's effect for the current mouth state
    pub fn apply_effect(&self, ctx: &mut EffectContext) {
        let mouth_open = ctx.player.is_mouth_open();
        let burst = ctx.tuning.particle_count;

        match (self.kind, mouth_open) {
            (ItemKind::Food, true) => {
                ctx.audio.play(Cue::Eat, 1.0);
                let hud = ctx.hud();
                ctx.animations.trigger_plus(HudTarget::Score, &hud);
                ctx.session.score += 1;
                ctx.particles
                    .create_burst(self.pos, Rgb::PAC_YELLOW, burst, ctx.rng);
            }
            (ItemKind::Food, false) => {
                ctx.audio.play(Cue::EatReversed, 0.5);
                let hud = ctx.hud();
                ctx.animations.trigger_minus(HudTarget::Life, &hud);
                ctx.session.lives -= 1;
                ctx.particles
                    .create_burst(self.pos, Rgb::PENALTY_RED, burst, ctx.rng);
            }
            (ItemKind::Ghost, true) => {
                log::info!("Bitten by a ghost at score {}", ctx.session.score);
                ctx.session.phase = GamePhase::GameOver;
            }
            (ItemKind::Ghost, false) => {
                ctx.audio.play(Cue::GhostHit, 0.5);
                let hud = ctx.hud();
                ctx.animations.trigger_plus(HudTarget::Score, &hud);
                ctx.session.score += 1;
                ctx.particles
                    .create_burst(self.pos, Rgb::GHOST_BLUE, burst, ctx.rng);
            }
            (ItemKind::LifeUp, true) => {
                ctx.audio.play(Cue::LifeCollect, 0.5);
                let hud = ctx.hud();
                ctx.animations.trigger_plus(HudTarget::Life, &hud);
                ctx.session.lives += 1;
                ctx.player.start_sparkle();
            }
            (ItemKind::LifeUp, false) => {}
        }
    }
}

/// Owns the active items and the spawn countdown
#[derive(Debug, Clone, Default)]
pub struct ItemManager {
    /// Active items in spawn order
    pub items: Vec<Item>,
    next_ghost_variant: u8,
    /// Frames until the next regular spawn; `None` while not spawning
    spawn_countdown: Option<u32>,
}

impl ItemManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the regular spawn countdown
    pub fn start_spawning(&mut self, tuning: &Tuning) {
        self.spawn_countdown = Some(tuning.spawn_interval_frames());
    }

    /// Disarm the spawn countdown. Safe to repeat.
    pub fn stop_spawning(&mut self) {
        self.spawn_countdown = None;
    }

    pub fn is_spawning(&self) -> bool {
        self.spawn_countdown.is_some()
    }

    /// Count one frame off the spawn timer, spawning when it runs out
    ///
    /// Runs in every phase; the spawn itself checks the phase.
    pub fn tick_spawner(&mut self, ctx: &mut EffectContext) {
        let Some(remaining) = self.spawn_countdown.as_mut() else {
            return;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return;
        }
        *remaining = ctx.tuning.spawn_interval_frames();
        self.spawn_item(ctx);
    }

    fn spawn_pos(tuning: &Tuning) -> Vec2 {
        Vec2::new(
            tuning.screen_width + tuning.icon_size,
            tuning.screen_height / 2.0,
        )
    }

    /// Spawn a food (random sprite) or a ghost (round-robin sprite)
    pub fn spawn_item(&mut self, ctx: &mut EffectContext) {
        if ctx.session.phase != GamePhase::Playing {
            return;
        }

        let tuning = ctx.tuning;
        let roll: f32 = ctx.rng.random();
        let base_speed = ctx
            .rng
            .random_range(tuning.item_speed_min..=tuning.item_speed_max);
        let pos = Self::spawn_pos(tuning);

        let item = if roll < tuning.food_probability {
            let variant = ctx.rng.random_range(0..tuning.food_variants);
            Item::new(ItemKind::Food, pos, base_speed, variant)
        } else {
            let variant = self.next_ghost_variant;
            self.next_ghost_variant = (self.next_ghost_variant + 1) % tuning.ghost_variants;
            let speed = base_speed * tuning.ghost_speed_multiplier;
            Item::new(ItemKind::Ghost, pos, speed, variant)
        };
        log::debug!(
            "Spawned {:?} #{} at speed {:.2}",
            item.kind,
            item.variant,
            item.speed
        );
        self.items.push(item);
    }

    /// Spawn one life-up outside the regular cadence
    pub fn spawn_life_up(&mut self, ctx: &mut EffectContext) {
        if ctx.session.phase != GamePhase::Playing {
            return;
        }
        ctx.audio.play(Cue::LifeSpawn, 0.5);
        let tuning = ctx.tuning;
        let speed = ctx
            .rng
            .random_range(tuning.item_speed_min..=tuning.item_speed_max);
        self.items
            .push(Item::new(ItemKind::LifeUp, Self::spawn_pos(tuning), speed, 0));
        log::debug!("Spawned life-up at score {}", ctx.session.score);
    }

    /// Advance, cull, and collide every item in spawn order
    ///
    /// A collided item is always removed. Once an effect ends the run, the
    /// rest of the items are left as they are.
    pub fn update(&mut self, ctx: &mut EffectContext) {
        let bounds = ctx.player.bounds();
        let icon_size = ctx.tuning.icon_size;
        let mut halted = false;

        self.items.retain_mut(|item| {
            if halted {
                return true;
            }
            item.advance();
            if item.is_off_screen(icon_size) {
                return false;
            }
            if item.collides(&bounds, ctx.tuning) {
                item.apply_effect(ctx);
                halted = ctx.session.phase == GamePhase::GameOver;
                return false;
            }
            true
        });
    }

    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|i| i.kind == kind).count()
    }

    /// Drop all items, rewind the ghost rotation, and stop spawning
    pub fn reset(&mut self) {
        self.items.clear();
        self.next_ghost_variant = 0;
        self.stop_spawning();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::sim::sound::AudioCommand;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.session.phase = GamePhase::Playing;
        state
    }

    /// An item sitting on the player
    fn item_at_player(state: &GameState, kind: ItemKind) -> Item {
        Item::new(kind, state.player.pos + Vec2::new(10.0, 0.0), 2.0, 0)
    }

    fn resolve(state: &mut GameState, kind: ItemKind, mouth_open: bool) {
        let angle = if mouth_open { 0.5 } else { 0.0 };
        state.player.set_mouth_angle(angle);
        let item = item_at_player(state, kind);
        state.items.items.push(item);
        let (items, mut ctx) = state.split_for_items();
        items.update(&mut ctx);
    }

    #[test]
    fn test_food_open_scores() {
        let mut state = playing_state();
        resolve(&mut state, ItemKind::Food, true);
        assert_eq!(state.session.score, 1);
        assert_eq!(state.session.lives, 3);
        assert!(state.items.items.is_empty());
        assert_eq!(state.particles.len(), 10);
        assert_eq!(state.animations.len(), 1);
        assert_eq!(state.audio.plays_of(Cue::Eat), 1);
    }

    #[test]
    fn test_food_closed_costs_life() {
        let mut state = playing_state();
        resolve(&mut state, ItemKind::Food, false);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.lives, 2);
        assert_eq!(state.particles.particles[0].color, Rgb::PENALTY_RED);
        assert_eq!(
            state.audio.pending(),
            &[AudioCommand::Play {
                cue: Cue::EatReversed,
                volume: 0.5
            }]
        );
    }

    #[test]
    fn test_ghost_open_ends_run() {
        let mut state = playing_state();
        state.session.lives = 99;
        resolve(&mut state, ItemKind::Ghost, true);
        assert_eq!(state.session.phase, GamePhase::GameOver);
        assert_eq!(state.session.score, 0);
        assert!(state.items.items.is_empty());
    }

    #[test]
    fn test_ghost_closed_scores() {
        let mut state = playing_state();
        resolve(&mut state, ItemKind::Ghost, false);
        assert_eq!(state.session.score, 1);
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!(state.audio.plays_of(Cue::GhostHit), 1);
    }

    #[test]
    fn test_life_up_open_and_closed() {
        let mut state = playing_state();
        resolve(&mut state, ItemKind::LifeUp, false);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.session.score, 0);
        assert!(state.items.items.is_empty());
        assert!(state.audio.is_empty());

        resolve(&mut state, ItemKind::LifeUp, true);
        assert_eq!(state.session.lives, 4);
        assert!(state.player.is_sparkling());
        assert_eq!(state.audio.plays_of(Cue::LifeCollect), 1);
    }

    #[test]
    fn test_halts_after_game_over() {
        let mut state = playing_state();
        state.player.set_mouth_angle(0.5);
        let ghost = item_at_player(&state, ItemKind::Ghost);
        let food = item_at_player(&state, ItemKind::Food);
        let far = Item::new(ItemKind::Food, Vec2::new(1000.0, 360.0), 3.0, 1);
        state.items.items.extend([ghost, food.clone(), far.clone()]);

        let (items, mut ctx) = state.split_for_items();
        items.update(&mut ctx);

        // Ghost consumed, the rest untouched
        assert_eq!(state.session.phase, GamePhase::GameOver);
        assert_eq!(state.items.items, vec![food, far]);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_off_screen_culled_without_effect() {
        let mut state = playing_state();
        // Park the player where the item ends up so a collision would fire
        state.player.pos = Vec2::new(-70.0, 360.0);
        state
            .items
            .items
            .push(Item::new(ItemKind::Food, Vec2::new(-63.0, 360.0), 2.0, 0));

        let (items, mut ctx) = state.split_for_items();
        items.update(&mut ctx);

        assert!(state.items.items.is_empty());
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_generous_hitbox() {
        let tuning = Tuning::default();
        let bounds = Bounds {
            center: Vec2::ZERO,
            radius: 80.0,
        };
        // 80 + 64/3 ~= 101.3
        let near = Item::new(ItemKind::Food, Vec2::new(101.0, 0.0), 1.0, 0);
        let far = Item::new(ItemKind::Food, Vec2::new(102.0, 0.0), 1.0, 0);
        assert!(near.collides(&bounds, &tuning));
        assert!(!far.collides(&bounds, &tuning));
    }

    #[test]
    fn test_ghost_variants_round_robin() {
        let tuning = Tuning {
            food_probability: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(5, tuning);
        state.session.phase = GamePhase::Playing;

        let (items, mut ctx) = state.split_for_items();
        for _ in 0..6 {
            items.spawn_item(&mut ctx);
        }
        let variants: Vec<u8> = state.items.items.iter().map(|i| i.variant).collect();
        assert_eq!(variants, vec![0, 1, 2, 3, 0, 1]);
        for item in &state.items.items {
            assert_eq!(item.kind, ItemKind::Ghost);
            assert!(item.speed >= 2.0 * 1.4 - 1e-4 && item.speed <= 5.0 * 1.4 + 1e-4);
        }

        state.items.reset();
        let (items, mut ctx) = state.split_for_items();
        items.spawn_item(&mut ctx);
        assert_eq!(state.items.items[0].variant, 0);
    }

    #[test]
    fn test_food_spawn_speed_and_variant() {
        let tuning = Tuning {
            food_probability: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(11, tuning);
        state.session.phase = GamePhase::Playing;
        let (items, mut ctx) = state.split_for_items();
        for _ in 0..50 {
            items.spawn_item(&mut ctx);
        }
        for item in &state.items.items {
            assert_eq!(item.kind, ItemKind::Food);
            assert!(item.variant < 4);
            assert!((2.0..=5.0).contains(&item.speed));
            assert_eq!(item.pos, Vec2::new(1280.0 + 64.0, 360.0));
        }
    }

    #[test]
    fn test_spawn_requires_playing() {
        let mut state = GameState::new(1, Tuning::default());
        let (items, mut ctx) = state.split_for_items();
        items.spawn_item(&mut ctx);
        items.spawn_life_up(&mut ctx);
        assert!(state.items.items.is_empty());
        assert!(state.audio.is_empty());
    }

    #[test]
    fn test_spawn_countdown() {
        let mut state = playing_state();
        state.items.start_spawning(&state.tuning);
        assert!(state.items.is_spawning());

        for _ in 0..59 {
            let (items, mut ctx) = state.split_for_items();
            items.tick_spawner(&mut ctx);
        }
        assert!(state.items.items.is_empty());

        let (items, mut ctx) = state.split_for_items();
        items.tick_spawner(&mut ctx);
        assert_eq!(state.items.items.len(), 1);

        for _ in 0..60 {
            let (items, mut ctx) = state.split_for_items();
            items.tick_spawner(&mut ctx);
        }
        assert_eq!(state.items.items.len(), 2);
    }

    #[test]
    fn test_stop_and_reset_idempotent() {
        let mut manager = ItemManager::new();
        manager.stop_spawning();
        manager.stop_spawning();
        assert!(!manager.is_spawning());

        manager.reset();
        manager.reset();
        assert!(manager.items.is_empty());
        assert!(!manager.is_spawning());
    }
}
