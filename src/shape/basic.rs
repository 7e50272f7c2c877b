use egui::{Pos2, Rect, Vec2};

use crate::surface::{DrawingSurface, PrimitiveId, PrimitiveStyle};

/// Axis-aligned rectangle built from its nominal width and height
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    half_width: f32,
    half_height: f32,
}

impl Rectangle {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    /// Size the rectangle was constructed with
    pub fn nominal_size(&self) -> Vec2 {
        Vec2::new(self.half_width * 2.0, self.half_height * 2.0)
    }

    pub(crate) fn render(&self, surface: &mut dyn DrawingSurface, style: &PrimitiveStyle) -> PrimitiveId {
        let rect = Rect::from_center_size(Pos2::ZERO, self.nominal_size());
        surface.create_rectangle(rect, style)
    }
}

/// Ellipse built from its two nominal diameters
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    half_radius_1: f32,
    half_radius_2: f32,
}

impl Ellipse {
    pub fn new(radius_1: f32, radius_2: f32) -> Self {
        Self {
            half_radius_1: radius_1 / 2.0,
            half_radius_2: radius_2 / 2.0,
        }
    }

    pub fn nominal_size(&self) -> Vec2 {
        Vec2::new(self.half_radius_1 * 2.0, self.half_radius_2 * 2.0)
    }

    pub fn is_circle(&self) -> bool {
        self.half_radius_1 == self.half_radius_2
    }

    pub(crate) fn render(&self, surface: &mut dyn DrawingSurface, style: &PrimitiveStyle) -> PrimitiveId {
        let rect = Rect::from_min_max(
            Pos2::new(-self.half_radius_1, -self.half_radius_2),
            Pos2::new(self.half_radius_1, self.half_radius_2),
        );
        surface.create_oval(rect, style)
    }
}

/// Isosceles triangle, apex up, centered on its bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    base: f32,
    height: f32,
}

impl Triangle {
    pub fn new(base: f32, height: f32) -> Self {
        Self { base, height }
    }

    pub fn nominal_size(&self) -> Vec2 {
        Vec2::new(self.base, self.height)
    }

    pub fn vertices(&self) -> [Pos2; 3] {
        [
            Pos2::new(-self.base / 2.0, self.height / 2.0),
            Pos2::new(self.base / 2.0, self.height / 2.0),
            Pos2::new(0.0, -self.height / 2.0),
        ]
    }

    pub(crate) fn render(&self, surface: &mut dyn DrawingSurface, style: &PrimitiveStyle) -> PrimitiveId {
        surface.create_polygon(&self.vertices(), style)
    }
}
