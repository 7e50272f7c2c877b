use egui::{Pos2, Rect, Vec2};

use crate::color::Color;
use crate::shape::ShapeId;
use crate::surface::{DrawingSurface, PrimitiveId, PrimitiveStyle};

/// Pointer distance from the pivot, per axis, below which scaling is ignored
pub const MIN_PIVOT_DISTANCE: f32 = 1.0;

/// How the selection overlay looks
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub color: Color,
    pub handle_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: Color::red(),
            handle_radius: 5.0,
        }
    }
}

/// Bounding-box outline plus the scale handle on its bottom-right corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    frame: PrimitiveId,
    handle: Option<PrimitiveId>,
}

impl Overlay {
    fn draw(surface: &mut dyn DrawingSurface, bbox: Rect, style: &OverlayStyle, with_handle: bool) -> Self {
        let frame = surface.create_rectangle(bbox, &PrimitiveStyle::outlined(style.color.clone(), 1.0));
        let handle = with_handle.then(|| {
            let knob = Rect::from_center_size(bbox.right_bottom(), Vec2::splat(style.handle_radius * 2.0));
            surface.create_oval(knob, &PrimitiveStyle::filled(style.color.clone(), style.color.clone(), 1.0))
        });
        Self { frame, handle }
    }

    fn remove(self, surface: &mut dyn DrawingSurface) {
        surface.delete(self.frame);
        if let Some(handle) = self.handle {
            surface.delete(handle);
        }
    }

    pub fn frame(&self) -> PrimitiveId {
        self.frame
    }

    pub fn handle(&self) -> Option<PrimitiveId> {
        self.handle
    }

    fn raise(&self, surface: &mut dyn DrawingSurface) {
        surface.raise(self.frame);
        if let Some(handle) = self.handle {
            surface.raise(handle);
        }
    }
}

/// What the pointer is doing to the selected shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drag {
    None,
    Move { last: Pos2 },
    /// `pivot` is the bounding-box center, fixed when the drag starts
    Scale { last: Pos2, pivot: Pos2 },
}

/// The current selection, owned by the editor session and rebuilt on every
/// selection or drag update.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    shape: ShapeId,
    bounding_box: Option<Rect>,
    overlay: Option<Overlay>,
    drag: Drag,
}

impl Selection {
    pub(crate) fn new(shape: ShapeId) -> Self {
        Self {
            shape,
            bounding_box: None,
            overlay: None,
            drag: Drag::None,
        }
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        self.bounding_box
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn drag(&self) -> Drag {
        self.drag
    }

    /// Scale pivot while a scale drag is in progress
    pub fn pivot(&self) -> Option<Pos2> {
        match self.drag {
            Drag::Scale { pivot, .. } => Some(pivot),
            _ => None,
        }
    }

    pub(crate) fn set_drag(&mut self, drag: Drag) {
        self.drag = drag;
    }

    /// Whether `primitive` belongs to the overlay's scale handle
    pub fn is_handle(&self, primitive: PrimitiveId) -> bool {
        self.overlay.and_then(|o| o.handle) == Some(primitive)
    }

    /// Whether `primitive` belongs to the overlay at all
    pub fn is_overlay(&self, primitive: PrimitiveId) -> bool {
        self.overlay.is_some_and(|o| o.frame == primitive || o.handle == Some(primitive))
    }

    /// Replace the overlay with one tracking `bbox`
    pub(crate) fn rebuild(
        &mut self,
        surface: &mut dyn DrawingSurface,
        bbox: Option<Rect>,
        style: &OverlayStyle,
        show_overlay: bool,
        with_handle: bool,
    ) {
        self.teardown(surface);
        self.bounding_box = bbox;
        if let (Some(bbox), true) = (bbox, show_overlay) {
            self.overlay = Some(Overlay::draw(surface, bbox, style, with_handle));
        }
    }

    pub(crate) fn raise_overlay(&self, surface: &mut dyn DrawingSurface) {
        if let Some(overlay) = &self.overlay {
            overlay.raise(surface);
        }
    }

    /// Remove the overlay primitives from the surface
    pub(crate) fn teardown(&mut self, surface: &mut dyn DrawingSurface) {
        if let Some(overlay) = self.overlay.take() {
            overlay.remove(surface);
        }
    }
}

/// Scale factor along one axis for a pointer moving from `last` to
/// `current` relative to `pivot`.
///
/// The factor is the ratio of the new to the old distance from the pivot.
/// It is 1 when the old distance is under [`MIN_PIVOT_DISTANCE`] or when the
/// pointer reaches or crosses the pivot, so a shape never collapses or flips.
pub fn axis_scale_factor(current: f32, last: f32, pivot: f32) -> f32 {
    let before = last - pivot;
    if before.abs() < MIN_PIVOT_DISTANCE {
        return 1.0;
    }
    let ratio = (current - pivot) / before;
    if ratio > 0.0 && ratio.is_finite() { ratio } else { 1.0 }
}

/// Independent X/Y scale factors for a scale-drag step
pub fn scale_factors(current: Pos2, last: Pos2, pivot: Pos2) -> Vec2 {
    Vec2::new(
        axis_scale_factor(current.x, last.x, pivot.x),
        axis_scale_factor(current.y, last.y, pivot.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_factor_is_distance_ratio() {
        // Handle 50 units right of the pivot dragged 10 further out
        assert!((axis_scale_factor(60.0, 50.0, 0.0) - 1.2).abs() < 0.0001);
        // and 25 back in
        assert!((axis_scale_factor(25.0, 50.0, 0.0) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_pointer_at_pivot_leaves_size_unchanged() {
        assert_eq!(axis_scale_factor(0.0, 50.0, 0.0), 1.0);
        assert_eq!(axis_scale_factor(10.0, 0.0, 0.0), 1.0);
        assert_eq!(axis_scale_factor(10.0, 0.5, 0.0), 1.0);
        assert_eq!(scale_factors(pos2(3.0, 3.0), pos2(3.0, 3.0), pos2(3.0, 3.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_crossing_the_pivot_is_ignored() {
        assert_eq!(axis_scale_factor(-5.0, 20.0, 0.0), 1.0);
    }
}
