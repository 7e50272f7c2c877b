use egui::{Pos2, Rect, Vec2};

use crate::color::Color;
use crate::surface::{DrawingSurface, PrimitiveId, PrimitiveStyle};

/// Radius of the marker that follows the pointer while authoring
pub const CURSOR_RADIUS: f32 = 5.0;

/// Free-form polygon built one click at a time.
///
/// While authoring, `rubber_band` follows the pointer and is rendered as the
/// last vertex; a click commits the current pointer position. Stopping drops
/// the rubber band and freezes the committed vertices.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    vertices: Vec<Pos2>,
    rubber_band: Option<Pos2>,
    authoring: bool,
    cursor: Option<PrimitiveId>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Pos2] {
        &self.vertices
    }

    pub fn is_authoring(&self) -> bool {
        self.authoring
    }

    pub fn cursor(&self) -> Option<PrimitiveId> {
        self.cursor
    }

    /// Points to render: committed vertices plus the rubber band
    pub fn outline_points(&self) -> Vec<Pos2> {
        let mut points = self.vertices.clone();
        points.extend(self.rubber_band);
        points
    }

    pub(crate) fn set_vertices(&mut self, vertices: Vec<Pos2>) {
        self.vertices = vertices;
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.vertices.iter_mut().for_each(|p| *p += delta);
        if let Some(p) = &mut self.rubber_band {
            *p += delta;
        }
    }

    pub(crate) fn start_authoring(&mut self, surface: &mut dyn DrawingSurface, pointer: Pos2) {
        if self.authoring {
            return;
        }
        self.authoring = true;
        let marker = Rect::from_center_size(pointer, Vec2::splat(CURSOR_RADIUS * 2.0));
        self.cursor = Some(surface.create_oval(marker, &PrimitiveStyle::outlined(Color::black(), 2.0)));
    }

    /// Commit a vertex. Returns false if the click repeats the last vertex.
    pub(crate) fn add_vertex(&mut self, point: Pos2) -> bool {
        self.rubber_band = Some(point);
        if self.vertices.last() == Some(&point) {
            return false;
        }
        self.vertices.push(point);
        true
    }

    pub(crate) fn track_pointer(&mut self, surface: &mut dyn DrawingSurface, pointer: Pos2) -> bool {
        if let Some(cursor) = self.cursor {
            if let Some(bbox) = surface.bbox(cursor) {
                surface.move_by(cursor, pointer - bbox.center());
            }
        }
        match &mut self.rubber_band {
            Some(p) => {
                *p = pointer;
                true
            }
            None => false,
        }
    }

    pub(crate) fn finish(&mut self, surface: &mut dyn DrawingSurface) {
        self.authoring = false;
        self.rubber_band = None;
        self.remove_cursor(surface);
    }

    pub(crate) fn raise_cursor(&self, surface: &mut dyn DrawingSurface) {
        if let Some(cursor) = self.cursor {
            surface.raise(cursor);
        }
    }

    pub(crate) fn remove_cursor(&mut self, surface: &mut dyn DrawingSurface) {
        if let Some(cursor) = self.cursor.take() {
            surface.delete(cursor);
        }
    }
}
