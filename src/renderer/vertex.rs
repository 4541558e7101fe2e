//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Letterbox bars outside the 16:9 field
    pub const LETTERBOX: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const FRAME: [f32; 4] = [0.13, 0.13, 0.87, 1.0];
    pub const FRAME_INNER: [f32; 4] = [0.0, 0.0, 0.35, 1.0];
    pub const PAC_BODY: [f32; 4] = [1.0, 0.8, 0.0, 1.0];
    pub const PAC_EYE: [f32; 4] = [0.1, 0.05, 0.0, 1.0];
    pub const GHOST_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GHOST_PUPIL: [f32; 4] = [0.13, 0.2, 0.8, 1.0];
    pub const LIFE_HEART: [f32; 4] = [1.0, 0.25, 0.4, 1.0];
    pub const LIFE_SHINE: [f32; 4] = [1.0, 0.85, 0.9, 1.0];
    pub const STEM: [f32; 4] = [0.2, 0.7, 0.2, 1.0];
    pub const PLUS: [f32; 4] = [0.3, 1.0, 0.3, 1.0];
    pub const MINUS: [f32; 4] = [1.0, 0.25, 0.25, 1.0];
    pub const GLYPH_FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Ghost bodies, picked by sprite variant
    pub const GHOSTS: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 1.0],
        [1.0, 0.72, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
        [1.0, 0.72, 0.32, 1.0],
    ];

    /// Food bodies, picked by sprite variant
    pub const FOODS: [[f32; 4]; 6] = [
        [0.87, 0.1, 0.15, 1.0],
        [1.0, 0.55, 0.1, 1.0],
        [0.95, 0.2, 0.45, 1.0],
        [0.55, 0.85, 0.2, 1.0],
        [0.6, 0.3, 0.85, 1.0],
        [1.0, 0.9, 0.3, 1.0],
    ];
}
