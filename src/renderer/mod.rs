//! WebGPU rendering module
//!
//! The scene is flat-colored triangles built on the CPU each frame in
//! play-field coordinates, then letterboxed onto the canvas.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
