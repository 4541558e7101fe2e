//! Pac-Boy - a mouth-controlled arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, scoring, phases)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser camera and face tracking bindings
//! - `hud`: DOM overlay placement over the letterboxed canvas
//! - `audio`: Procedural Web Audio sound cues (wasm only)
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame tick rate of the simulation (one tick per display frame at 60 Hz)
    pub const FRAME_HZ: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const FRAME_DT: f32 = 1.0 / FRAME_HZ;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}
