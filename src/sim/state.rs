//! Game state and core simulation types
//!
//! Everything a frame tick reads or writes lives in [`GameState`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::AnimationManager;
use super::item::{EffectContext, ItemManager};
use super::particles::ParticleSystem;
use super::player::Player;
use super::sound::AudioQueue;
use crate::Tuning;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for "2"
    MainMenu,
    /// Choosing face or button control
    ModeSelect,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for "2"
    GameOver,
}

/// How the mouth is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Webcam mouth tracking
    Face,
    /// "1" opens, "3" closes
    #[default]
    Button,
}

impl ControlMode {
    /// Order shown on the mode select screen
    pub const ALL: [ControlMode; 2] = [ControlMode::Face, ControlMode::Button];

    pub fn label(&self) -> &'static str {
        match self {
            ControlMode::Face => "Face Mode",
            ControlMode::Button => "Button Mode",
        }
    }

    /// One-line rule shown under the mode name
    pub fn rule(&self) -> &'static str {
        match self {
            ControlMode::Face => "Open your mouth to control Pac-Boy",
            ControlMode::Button => "Press 1 to open, 3 to close the mouth",
        }
    }
}

/// Score and lives bookkeeping for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub score: u32,
    /// May reach zero or below before the end-of-frame life check
    pub lives: i32,
    pub control_mode: ControlMode,
    pub phase: GamePhase,
    /// Score at which the next life-up spawns
    pub next_life_threshold: u32,
    /// Button mode: mouth held open
    pub button_mouth_open: bool,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            control_mode: ControlMode::default(),
            phase: GamePhase::MainMenu,
            next_life_threshold: tuning.life_score_threshold,
            button_mouth_open: false,
        }
    }

    /// Fresh numbers for a new run; phase and control mode are left alone
    pub fn reset(&mut self, tuning: &Tuning) {
        self.score = 0;
        self.lives = tuning.starting_lives;
        self.next_life_threshold = tuning.life_score_threshold;
        self.button_mouth_open = false;
    }
}

/// Complete game state (deterministic for a given seed and input script)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub session: Session,
    pub player: Player,
    pub items: ItemManager,
    pub animations: AnimationManager,
    pub particles: ParticleSystem,
    /// Audio requests produced this frame
    pub audio: AudioQueue,
    /// Mode-select cursor; survives between runs
    pub selected_mode: ControlMode,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.normalized();
        Self {
            seed,
            session: Session::new(&tuning),
            player: Player::new(&tuning),
            items: ItemManager::new(),
            animations: AnimationManager::new(&tuning),
            particles: ParticleSystem::new(&tuning),
            audio: AudioQueue::default(),
            selected_mode: ControlMode::Face,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Split borrows for code that mutates the session through item effects
    pub fn split_for_items(&mut self) -> (&mut ItemManager, EffectContext<'_>) {
        let GameState {
            tuning,
            session,
            player,
            items,
            animations,
            particles,
            audio,
            rng,
            ..
        } = self;
        (
            items,
            EffectContext {
                tuning,
                session,
                player,
                animations,
                particles,
                audio,
                rng,
            },
        )
    }
}
