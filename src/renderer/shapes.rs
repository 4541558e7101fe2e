//! Shape generation for 2D primitives
//!
//! All shapes are emitted in screen space (origin top-left, y down) as
//! triangle lists.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Square centered on `center`
pub fn square(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    rect(center - Vec2::splat(size / 2.0), Vec2::splat(size), color)
}

/// Single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    pie(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Filled circular sector from `start` sweeping `span` radians
pub fn pie(
    center: Vec2,
    radius: f32,
    start: f32,
    span: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Rectangular outline of the given thickness, drawn inside `min..min+size`
pub fn frame(min: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(24);
    let t = thickness;
    vertices.extend(rect(min, Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(t, size.y - 2.0 * t), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}
