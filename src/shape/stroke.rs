use egui::{Pos2, Vec2};

use crate::color::Color;
use crate::surface::{DrawingSurface, PrimitiveId, PrimitiveStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    /// Freehand line in the current color
    Pen,
    /// Freehand line in the canvas background color
    Eraser,
}

/// Freehand stroke: rendered segments plus the waypoints they were drawn from
#[derive(Debug, Clone)]
pub struct Stroke {
    kind: StrokeKind,
    width: f32,
    waypoints: Vec<Pos2>,
    segments: Vec<PrimitiveId>,
}

impl Stroke {
    pub fn new(kind: StrokeKind, width: f32) -> Self {
        Self {
            kind,
            width,
            waypoints: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn waypoints(&self) -> &[Pos2] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[PrimitiveId] {
        &self.segments
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Record the pointer-down position the stroke starts from
    pub(crate) fn begin_at(&mut self, origin: Pos2) {
        self.waypoints.push(origin);
    }

    /// Append a waypoint and draw the segment leading to it
    pub(crate) fn extend_to(&mut self, surface: &mut dyn DrawingSurface, point: Pos2, color: &Color) {
        if let Some(&previous) = self.waypoints.last() {
            let style = PrimitiveStyle::line(color.clone(), self.width);
            self.segments.push(surface.create_line(previous, point, &style));
        }
        self.waypoints.push(point);
    }

    /// Connect the dots of a stored stroke
    pub(crate) fn replay(&mut self, surface: &mut dyn DrawingSurface, waypoints: Vec<Pos2>, color: &Color) {
        let style = PrimitiveStyle::line(color.clone(), self.width);
        for pair in waypoints.windows(2) {
            self.segments.push(surface.create_line(pair[0], pair[1], &style));
        }
        self.waypoints = waypoints;
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.waypoints.iter_mut().for_each(|p| *p += delta);
    }

    pub(crate) fn clear_segments(&mut self) {
        self.segments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RetainedCanvas;
    use egui::{pos2, vec2};

    #[test]
    fn test_incremental_segments() {
        let mut canvas = RetainedCanvas::new(vec2(100.0, 100.0), Color::white());
        let mut stroke = Stroke::new(StrokeKind::Pen, 3.0);

        stroke.begin_at(pos2(0.0, 0.0));
        assert!(stroke.segments().is_empty());

        stroke.extend_to(&mut canvas, pos2(5.0, 5.0), &Color::black());
        stroke.extend_to(&mut canvas, pos2(10.0, 0.0), &Color::black());

        assert_eq!(stroke.segments().len(), 2);
        assert_eq!(stroke.waypoints(), &[pos2(0.0, 0.0), pos2(5.0, 5.0), pos2(10.0, 0.0)]);
        assert_eq!(canvas.primitive_count(), 2);
    }
}
