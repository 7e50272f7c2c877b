use crate::shape::{Shape, ShapeId};
use crate::surface::PrimitiveId;

/// Ordered list of live shapes. Order is stacking order: the last shape is
/// frontmost.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    /// Topmost shape owning the given primitive
    pub fn shape_owning(&self, primitive: PrimitiveId) -> Option<ShapeId> {
        self.shapes.iter().rev().find(|s| s.owns(primitive)).map(Shape::id)
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// Move a shape to the end of the list (frontmost). Returns false if absent.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        match self.remove(id) {
            Some(shape) => {
                self.shapes.push(shape);
                true
            }
            None => false,
        }
    }

    /// Take every shape out of the scene, leaving it empty
    pub fn drain(&mut self) -> Vec<Shape> {
        std::mem::take(&mut self.shapes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shape::ShapeStyle;
    use crate::surface::RetainedCanvas;
    use egui::vec2;

    #[test]
    fn test_z_order_and_bring_to_front() {
        let mut canvas = RetainedCanvas::new(vec2(600.0, 600.0), Color::white());
        let mut scene = Scene::new();
        let a = scene.add_shape(Shape::rectangle(&mut canvas, 10.0, 10.0, ShapeStyle::default()));
        let b = scene.add_shape(Shape::ellipse(&mut canvas, 10.0, 10.0, ShapeStyle::default()));

        assert_eq!(scene.index_of(a), Some(0));
        assert!(scene.bring_to_front(a));
        assert_eq!(scene.index_of(a), Some(1));
        assert_eq!(scene.index_of(b), Some(0));
    }

    #[test]
    fn test_remove_missing_shape() {
        let mut scene = Scene::new();
        assert!(scene.remove(ShapeId::new()).is_none());
        assert!(!scene.bring_to_front(ShapeId::new()));
    }
}
