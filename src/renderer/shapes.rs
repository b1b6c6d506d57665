//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in stage coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let dir1 = Vec2::from_angle((i as f32 / segments as f32) * TAU);
        let dir2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * TAU);

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.extend(quad(inner1, outer1, inner2, outer2, color));
    }

    vertices
}

/// Generate vertices for a thick line segment from `a` to `b`
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    quad(a + perp, a - perp, b + perp, b - perp, color).to_vec()
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    quad(
        min,
        Vec2::new(min.x, max.y),
        Vec2::new(max.x, min.y),
        max,
        color,
    )
    .to_vec()
}

/// Spokes of a wheel turned by `angle`
pub fn spokes(
    center: Vec2,
    radius: f32,
    angle: f32,
    count: u32,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((count * 6) as usize);
    for i in 0..count {
        let theta = angle + (i as f32 / count as f32) * TAU;
        let tip = center + Vec2::from_angle(theta) * radius;
        vertices.extend(segment(center, tip, width, color));
    }
    vertices
}

/// Two triangles over corners a1/a2 (one edge) and b1/b2 (the opposite edge)
fn quad(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::at(a1, color),
        Vertex::at(a2, color),
        Vertex::at(b1, color),
        Vertex::at(b1, color),
        Vertex::at(a2, color),
        Vertex::at(b2, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn pos(v: &Vertex) -> Vec2 {
        Vec2::new(v.position[0], v.position[1])
    }

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, WHITE, 16);
        assert_eq!(verts.len(), 48);
        for v in verts.iter().skip(1).step_by(3) {
            assert!((pos(v).distance(Vec2::new(10.0, 10.0)) - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_segment_width() {
        let verts = segment(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, WHITE);
        assert_eq!(verts.len(), 6);
        assert_eq!(pos(&verts[0]), Vec2::new(0.0, 2.0));
        assert_eq!(pos(&verts[1]), Vec2::new(0.0, -2.0));
        assert_eq!(pos(&verts[5]), Vec2::new(10.0, -2.0));
    }

    #[test]
    fn test_degenerate_segment_is_finite() {
        let verts = segment(Vec2::ONE, Vec2::ONE, 4.0, WHITE);
        assert!(verts.iter().all(|v| pos(v).is_finite()));
    }

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), WHITE);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().any(|v| pos(v) == Vec2::new(4.0, 6.0)));
        assert!(verts.iter().any(|v| pos(v) == Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_spokes_count() {
        let verts = spokes(Vec2::ZERO, 30.0, 0.0, 6, 3.0, WHITE);
        assert_eq!(verts.len(), 36);
    }
}
