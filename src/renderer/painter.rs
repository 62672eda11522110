//! Collects the simulation's draw calls into one vertex list per frame

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::sim::{Painter, Rgba};

#[derive(Debug, Default)]
pub struct FrameBuilder {
    vertices: Vec<Vertex>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices in viewport pixels, in paint order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl Painter for FrameBuilder {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 || color[3] <= 0.0 {
            return;
        }
        self.vertices.extend(shapes::circle(
            center,
            radius,
            color,
            shapes::segments_for(radius),
        ));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        if radii.min_element() <= 0.0 || color[3] <= 0.0 {
            return;
        }
        self.vertices.extend(shapes::ellipse(
            center,
            radii,
            rotation,
            color,
            shapes::segments_for(radii.max_element()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_frame() {
        let mut builder = FrameBuilder::new();
        builder.fill_circle(Vec2::ZERO, 10.0, [1.0; 4]);
        assert_eq!(builder.vertices().len(), 8 * 3);
        builder.clear();
        assert!(builder.vertices().is_empty());
    }

    #[test]
    fn test_invisible_shapes_are_skipped() {
        let mut builder = FrameBuilder::new();
        builder.fill_circle(Vec2::ZERO, 10.0, [1.0, 1.0, 1.0, 0.0]);
        builder.fill_ellipse(Vec2::ZERO, Vec2::new(0.0, 5.0), 0.0, [1.0; 4]);
        assert!(builder.vertices().is_empty());
    }
}
