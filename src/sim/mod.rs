//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio, or camera dependencies; side effects leave as queued commands

pub mod animation;
pub mod item;
pub mod mouth;
pub mod particles;
pub mod player;
pub mod sound;
pub mod state;
pub mod tick;

pub use animation::{AnimationManager, EffectAnimation, EffectKind, HudLayout, HudTarget};
pub use item::{EffectContext, Item, ItemKind, ItemManager};
pub use mouth::{FaceReport, FaceTracker, FaceTracking};
pub use particles::{Particle, ParticleSystem, Rgb};
pub use player::{Bounds, Player};
pub use sound::{AudioCommand, AudioQueue, Cue};
pub use state::{ControlMode, GamePhase, GameState, Session};
pub use tick::{Key, TickInput, start_session, tick};
