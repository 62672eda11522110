//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Generate vertices for a filled ellipse with half-axes `radii`, rotated by `rotation`
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let rot = Vec2::from_angle(rotation);

    let point = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        let local = Vec2::new(radii.x * theta.cos(), radii.y * theta.sin());
        center + rot.rotate(local)
    };

    for i in 0..segments {
        let p1 = point(i);
        let p2 = point(i + 1);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Segment count that keeps edges smooth without wasting triangles on sparks
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.8) as u32).clamp(8, 48)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_on_radius() {
        let verts = circle(Vec2::new(10.0, 20.0), 5.0, [1.0; 4], 12);
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 20.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position).distance(Vec2::new(10.0, 20.0));
                assert!((d - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_rotated_ellipse_swaps_axes() {
        let verts = ellipse(Vec2::ZERO, Vec2::new(10.0, 2.0), PI / 2.0, [1.0; 4], 4);
        // First rim point (theta = 0) lies on the rotated major axis
        let p = Vec2::from(verts[1].position);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_segments_for_is_bounded() {
        assert_eq!(segments_for(2.0), 8);
        assert_eq!(segments_for(40.0), 32);
        assert_eq!(segments_for(500.0), 48);
    }
}
