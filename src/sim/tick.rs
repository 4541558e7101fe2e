//! Fixed frame tick
//!
//! Core game loop that advances the simulation one display frame and routes
//! key presses to the active phase.

use super::item::ItemKind;
use super::mouth::{FaceTracking, mouth_angle};
use super::sound::Cue;
use super::state::{ControlMode, GamePhase, GameState};

/// The three game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Open the mouth / select previous
    One,
    /// Start / confirm
    Two,
    /// Close the mouth / select next
    Three,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(key: &str) -> Option<Key> {
        match key {
            "1" => Some(Key::One),
            "2" => Some(Key::Two),
            "3" => Some(Key::Three),
            _ => None,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys pressed since the last tick, in order
    pub keys: Vec<Key>,
    /// Demo mode - a simple bot drives the button mouth
    pub autopilot: bool,
}

impl TickInput {
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            keys: keys.to_vec(),
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tracker: &mut dyn FaceTracking) {
    for &key in &input.keys {
        handle_key(state, key, tracker);
    }

    state.time_ticks += 1;

    // The spawn countdown runs in every phase; spawning itself is gated on Playing
    {
        let (items, mut ctx) = state.split_for_items();
        items.tick_spawner(&mut ctx);
    }

    if state.session.phase == GamePhase::Playing {
        if input.autopilot {
            steer_autopilot(state);
        }
        update_playing(state, tracker);
    }
}

/// Route one key press to the active phase
fn handle_key(state: &mut GameState, key: Key, tracker: &mut dyn FaceTracking) {
    match state.session.phase {
        GamePhase::MainMenu => {
            if key == Key::Two {
                state.audio.play(Cue::ButtonConfirm, 0.5);
                set_phase(state, GamePhase::ModeSelect);
            }
        }

        GamePhase::ModeSelect => {
            if !tracker.is_available() {
                // Button mode is the only choice without a camera
                if key == Key::Two {
                    state.audio.play(Cue::ButtonConfirm, 0.5);
                    state.session.control_mode = ControlMode::Button;
                    start_session(state, tracker);
                }
                return;
            }
            match key {
                Key::One => {
                    state.audio.play(Cue::ButtonSelect, 0.5);
                    state.selected_mode = ControlMode::Face;
                }
                Key::Three => {
                    state.audio.play(Cue::ButtonSelect, 0.5);
                    state.selected_mode = ControlMode::Button;
                }
                Key::Two => {
                    state.audio.play(Cue::ButtonConfirm, 0.5);
                    state.session.control_mode = state.selected_mode;
                    start_session(state, tracker);
                }
            }
        }

        GamePhase::Playing => {
            if state.session.control_mode == ControlMode::Button {
                match key {
                    Key::One => state.session.button_mouth_open = true,
                    Key::Three => state.session.button_mouth_open = false,
                    Key::Two => {}
                }
            }
        }

        GamePhase::GameOver => {
            if key == Key::Two {
                state.audio.play(Cue::ButtonConfirm, 0.5);
                set_phase(state, GamePhase::MainMenu);
            }
        }
    }
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    log::info!("Phase {:?} -> {:?}", state.session.phase, phase);
    state.session.phase = phase;
}

/// Reset everything for a new run and enter Playing
pub fn start_session(state: &mut GameState, tracker: &mut dyn FaceTracking) {
    let tuning = &state.tuning;
    state.session.reset(tuning);
    state.player.reset();
    state.items.reset();
    state.animations.reset();
    state.particles.reset();

    // Face mode needs a live camera and a tracker that actually starts
    if state.session.control_mode == ControlMode::Face {
        if !tracker.is_available() || !tracker.start() {
            log::warn!("Face tracking unavailable, switching to button mode");
            tracker.stop();
            state.session.control_mode = ControlMode::Button;
        }
    } else {
        tracker.stop();
    }

    state.items.start_spawning(&state.tuning);
    state.audio.start_loop(Cue::StageMusic, 0.3);
    log::info!(
        "Session started in {} (seed {})",
        state.session.control_mode.label(),
        state.seed
    );
    set_phase(state, GamePhase::Playing);
}

/// One Playing frame. The order matters for cause and effect.
fn update_playing(state: &mut GameState, tracker: &mut dyn FaceTracking) {
    let report = match state.session.control_mode {
        ControlMode::Face => tracker.latest(),
        ControlMode::Button => None,
    };
    let angle = mouth_angle(
        state.session.control_mode,
        state.session.button_mouth_open,
        report.as_ref(),
        &state.tuning,
    );
    state.player.set_mouth_angle(angle);
    state.player.update_sparkle(&mut state.rng);

    {
        let (items, mut ctx) = state.split_for_items();
        items.update(&mut ctx);
    }

    state.animations.update();
    state.particles.update();

    if state.session.score >= state.session.next_life_threshold {
        let (items, mut ctx) = state.split_for_items();
        items.spawn_life_up(&mut ctx);
        state.session.next_life_threshold += state.tuning.life_score_threshold;
    }

    if state.session.lives <= 0 && state.session.phase == GamePhase::Playing {
        log::info!("Out of lives");
        state.session.phase = GamePhase::GameOver;
    }

    // Only reachable on the frame the run ends, since this function only runs while Playing
    if state.session.phase == GamePhase::GameOver {
        enter_game_over(state, tracker);
    }
}

/// Side effects of a run ending
fn enter_game_over(state: &mut GameState, tracker: &mut dyn FaceTracking) {
    state.audio.stop(Cue::StageMusic);
    state.audio.play(Cue::Lose, 0.5);
    state.items.stop_spawning();
    if state.session.control_mode == ControlMode::Face {
        tracker.stop();
    }
    log::info!(
        "Game over: score {}, lives {}",
        state.session.score,
        state.session.lives
    );
}

/// Demo bot: shut for any nearby ghost, otherwise open for nearby food or life-ups
fn steer_autopilot(state: &mut GameState) {
    if state.session.control_mode != ControlMode::Button {
        return;
    }
    let bounds = state.player.bounds();
    let lookahead = bounds.radius + state.tuning.icon_size * 2.0;

    let mut ghost_near = false;
    let mut treat_near = false;
    for item in &state.items.items {
        if item.pos.x < bounds.center.x - bounds.radius
            || item.pos.distance(bounds.center) >= lookahead
        {
            continue;
        }
        match item.kind {
            ItemKind::Ghost => ghost_near = true,
            ItemKind::Food | ItemKind::LifeUp => treat_near = true,
        }
    }

    if ghost_near {
        state.session.button_mouth_open = false;
    } else if treat_near {
        state.session.button_mouth_open = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::item::Item;
    use crate::sim::mouth::{FaceReport, FaceTracker};
    use crate::sim::sound::AudioCommand;
    use glam::Vec2;

    fn press(state: &mut GameState, tracker: &mut FaceTracker, keys: &[Key]) {
        tick(state, &TickInput::with_keys(keys), tracker);
    }

    /// Menu -> mode select -> playing in button mode, with regular spawns off
    fn start_button_game(seed: u64) -> (GameState, FaceTracker) {
        let mut state = GameState::new(seed, Tuning::default());
        let mut tracker = FaceTracker::unavailable();
        press(&mut state, &mut tracker, &[Key::Two]);
        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.phase(), GamePhase::Playing);
        state.items.stop_spawning();
        state.audio.clear();
        (state, tracker)
    }

    fn drop_on_player(state: &mut GameState, kind: ItemKind) {
        let pos = state.player.pos + Vec2::new(5.0, 0.0);
        state.items.items.push(Item::new(kind, pos, 2.0, 0));
    }

    #[test]
    fn test_menu_flow() {
        let mut state = GameState::new(1, Tuning::default());
        let mut tracker = FaceTracker::unavailable();
        assert_eq!(state.phase(), GamePhase::MainMenu);

        // Wrong keys are ignored
        press(&mut state, &mut tracker, &[Key::One, Key::Three]);
        assert_eq!(state.phase(), GamePhase::MainMenu);
        assert!(state.audio.is_empty());

        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.phase(), GamePhase::ModeSelect);
        assert_eq!(state.audio.plays_of(Cue::ButtonConfirm), 1);
    }

    #[test]
    fn test_no_camera_forces_button_mode() {
        let mut state = GameState::new(1, Tuning::default());
        let mut tracker = FaceTracker::unavailable();
        press(&mut state, &mut tracker, &[Key::Two]);
        state.audio.clear();

        // Cursor keys do nothing without a camera
        press(&mut state, &mut tracker, &[Key::One]);
        assert!(state.audio.is_empty());
        assert_eq!(state.selected_mode, ControlMode::Face);

        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.session.control_mode, ControlMode::Button);
        assert!(!tracker.is_running());
    }

    #[test]
    fn test_face_mode_starts_tracker() {
        let mut state = GameState::new(1, Tuning::default());
        let mut tracker = FaceTracker::new(true);
        press(&mut state, &mut tracker, &[Key::Two]);
        press(&mut state, &mut tracker, &[Key::Three, Key::One]);
        assert_eq!(state.selected_mode, ControlMode::Face);
        assert_eq!(state.audio.plays_of(Cue::ButtonSelect), 2);

        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.session.control_mode, ControlMode::Face);
        assert!(tracker.is_running());
    }

    #[test]
    fn test_face_mode_downgrades_when_camera_drops() {
        let mut state = GameState::new(1, Tuning::default());
        let mut tracker = FaceTracker::new(true);
        press(&mut state, &mut tracker, &[Key::Two]);
        tracker.available = false;
        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.session.control_mode, ControlMode::Button);
    }

    #[test]
    fn test_face_mode_reads_tracker() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, tuning.clone());
        let mut tracker = FaceTracker::new(true);
        press(&mut state, &mut tracker, &[Key::Two]);
        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.session.control_mode, ControlMode::Face);

        // No report yet: closed
        press(&mut state, &mut tracker, &[]);
        assert!(!state.player.is_mouth_open());

        let mut keypoints = vec![Vec2::ZERO; 200];
        for &i in &tuning.lower_lip_indices {
            keypoints[i] = Vec2::new(0.0, 60.0);
        }
        tracker.deliver(FaceReport { keypoints });
        press(&mut state, &mut tracker, &[]);
        assert!(state.player.is_mouth_open());

        // Buttons do nothing in face mode
        press(&mut state, &mut tracker, &[Key::Three]);
        assert!(state.player.is_mouth_open());
    }

    #[test]
    fn test_session_start_resets() {
        let (mut state, mut tracker) = start_button_game(3);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.session.next_life_threshold, 10);

        state.session.score = 7;
        state.session.phase = GamePhase::GameOver;
        state.player.start_sparkle();
        drop_on_player(&mut state, ItemKind::Ghost);
        state.session.button_mouth_open = true;

        press(&mut state, &mut tracker, &[Key::Two]);
        assert_eq!(state.phase(), GamePhase::MainMenu);
        press(&mut state, &mut tracker, &[Key::Two]);
        state.audio.clear();
        press(&mut state, &mut tracker, &[Key::Two]);

        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.lives, 3);
        assert!(!state.session.button_mouth_open);
        assert!(!state.player.is_sparkling());
        assert!(state.items.items.is_empty());
        assert!(state.items.is_spawning());
        assert!(state.audio.pending().contains(&AudioCommand::Loop {
            cue: Cue::StageMusic,
            volume: 0.3
        }));
    }

    #[test]
    fn test_button_mouth() {
        let (mut state, mut tracker) = start_button_game(4);
        press(&mut state, &mut tracker, &[Key::One]);
        assert!(state.player.is_mouth_open());
        assert!((state.player.mouth_angle - std::f32::consts::FRAC_PI_4).abs() < 1e-6);

        // Held until closed
        press(&mut state, &mut tracker, &[]);
        assert!(state.player.is_mouth_open());

        press(&mut state, &mut tracker, &[Key::Three]);
        assert!(!state.player.is_mouth_open());
    }

    #[test]
    fn test_ten_food_spawns_one_life_up() {
        let (mut state, mut tracker) = start_button_game(5);
        press(&mut state, &mut tracker, &[Key::One]);

        for eaten in 1..=10 {
            drop_on_player(&mut state, ItemKind::Food);
            press(&mut state, &mut tracker, &[]);
            assert_eq!(state.session.score, eaten);
        }

        assert_eq!(state.session.lives, 3);
        assert_eq!(state.items.count(ItemKind::LifeUp), 1);
        assert_eq!(state.session.next_life_threshold, 20);
        assert_eq!(state.audio.plays_of(Cue::LifeSpawn), 1);
    }

    #[test]
    fn test_zero_life_threshold_spawns_per_point() {
        let tuning = Tuning {
            life_score_threshold: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(5, tuning);
        let mut tracker = FaceTracker::unavailable();
        press(&mut state, &mut tracker, &[Key::Two]);
        press(&mut state, &mut tracker, &[Key::Two]);
        state.items.stop_spawning();

        for _ in 0..5 {
            press(&mut state, &mut tracker, &[]);
        }
        assert_eq!(state.items.count(ItemKind::LifeUp), 0);

        press(&mut state, &mut tracker, &[Key::One]);
        drop_on_player(&mut state, ItemKind::Food);
        press(&mut state, &mut tracker, &[]);
        press(&mut state, &mut tracker, &[]);
        assert_eq!(state.session.score, 1);
        assert_eq!(state.items.count(ItemKind::LifeUp), 1);
    }

    #[test]
    fn test_three_closed_food_ends_run() {
        let (mut state, mut tracker) = start_button_game(6);

        for expected in [2, 1, 0] {
            drop_on_player(&mut state, ItemKind::Food);
            press(&mut state, &mut tracker, &[]);
            assert_eq!(state.session.lives, expected);
        }

        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.session.score, 0);
        assert!(!state.items.is_spawning());
    }

    #[test]
    fn test_game_over_side_effects_once() {
        let (mut state, mut tracker) = start_button_game(7);
        press(&mut state, &mut tracker, &[Key::One]);
        drop_on_player(&mut state, ItemKind::Ghost);
        press(&mut state, &mut tracker, &[]);
        assert_eq!(state.phase(), GamePhase::GameOver);

        for _ in 0..30 {
            press(&mut state, &mut tracker, &[]);
        }
        assert_eq!(state.audio.plays_of(Cue::Lose), 1);
        let stops = state
            .audio
            .pending()
            .iter()
            .filter(|c| matches!(c, AudioCommand::Stop { cue: Cue::StageMusic }))
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_face_game_over_stops_tracker() {
        let mut state = GameState::new(8, Tuning::default());
        let mut tracker = FaceTracker::new(true);
        press(&mut state, &mut tracker, &[Key::Two]);
        press(&mut state, &mut tracker, &[Key::Two]);
        assert!(tracker.is_running());

        state.session.lives = 0;
        press(&mut state, &mut tracker, &[]);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(!tracker.is_running());
        // Late reports are dropped
        assert!(!tracker.deliver(FaceReport::default()));
    }

    #[test]
    fn test_lives_zero_without_collision() {
        let (mut state, mut tracker) = start_button_game(9);
        state.session.lives = 0;
        press(&mut state, &mut tracker, &[]);
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_no_spawns_outside_playing() {
        let mut state = GameState::new(10, Tuning::default());
        let mut tracker = FaceTracker::unavailable();
        state.items.start_spawning(&state.tuning);
        for _ in 0..300 {
            press(&mut state, &mut tracker, &[]);
        }
        assert!(state.items.items.is_empty());
    }

    #[test]
    fn test_items_spawn_while_playing() {
        let (mut state, mut tracker) = start_button_game(11);
        state.items.start_spawning(&state.tuning);
        for _ in 0..60 {
            press(&mut state, &mut tracker, &[]);
        }
        assert_eq!(state.items.items.len(), 1);
    }

    #[test]
    fn test_autopilot_scores() {
        let (mut state, mut tracker) = start_button_game(12);
        state.items.start_spawning(&state.tuning);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(60 * 30) {
            tick(&mut state, &input, &mut tracker);
        }
        assert!(state.session.score > 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let run = |seed: u64| {
            let (mut state, mut tracker) = start_button_game(seed);
            state.items.start_spawning(&state.tuning);
            let script: [&[Key]; 4] = [&[Key::One], &[], &[Key::Three], &[]];
            for frame in 0..600 {
                let keys = script[(frame / 45) % script.len()];
                press(&mut state, &mut tracker, keys);
            }
            (
                state.session.clone(),
                state.items.items.clone(),
                state.particles.len(),
            )
        };

        assert_eq!(run(99999), run(99999));
    }
}
