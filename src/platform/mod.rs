//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Camera availability and face-landmark tracking (web only)
//!
//! Native builds have no camera; they hand the simulation a
//! [`FaceTracker::unavailable`](crate::sim::FaceTracker::unavailable) instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebFaceTracker;
