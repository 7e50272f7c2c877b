//! The drawing surface the editor renders onto.
//!
//! The host GUI toolkit owns the actual canvas; the editor only needs a small
//! set of retained-mode services from it: create a primitive, restyle it,
//! move/scale it, ask for its bounding box or coordinates, and find the
//! topmost primitive under the pointer. Every shape keeps the opaque
//! [`PrimitiveId`]s it created and talks to the surface through them.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::color::Color;

mod retained;

pub use retained::RetainedCanvas;

/// Opaque handle to a primitive living on a [`DrawingSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u64);

/// Fill and outline applied to a primitive at creation time
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveStyle {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub width: f32,
}

impl PrimitiveStyle {
    /// A filled primitive with the given outline
    pub fn filled(fill: Color, outline: Color, width: f32) -> Self {
        Self {
            fill: Some(fill),
            outline: Some(outline),
            width,
        }
    }

    /// An unfilled outline, as used for overlays and markers
    pub fn outlined(outline: Color, width: f32) -> Self {
        Self {
            fill: None,
            outline: Some(outline),
            width,
        }
    }

    /// A line segment; lines only have a fill color
    pub fn line(color: Color, width: f32) -> Self {
        Self {
            fill: Some(color),
            outline: None,
            width,
        }
    }
}

/// Font used for text primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub style: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Arial".to_owned(),
            size: 12.0,
            style: "normal".to_owned(),
        }
    }
}

/// Retained-mode 2-D canvas provided by the host toolkit
pub trait DrawingSurface {
    /// Size of the visible canvas
    fn size(&self) -> Vec2;

    fn create_rectangle(&mut self, rect: Rect, style: &PrimitiveStyle) -> PrimitiveId;

    /// An oval inscribed in `rect`
    fn create_oval(&mut self, rect: Rect, style: &PrimitiveStyle) -> PrimitiveId;

    fn create_polygon(&mut self, points: &[Pos2], style: &PrimitiveStyle) -> PrimitiveId;

    fn create_line(&mut self, from: Pos2, to: Pos2, style: &PrimitiveStyle) -> PrimitiveId;

    /// Text centered on `anchor`
    fn create_text(&mut self, anchor: Pos2, text: &str, font: &Font, color: &Color) -> PrimitiveId;

    fn set_fill(&mut self, id: PrimitiveId, color: &Color);

    /// Change outline color and/or width. Lines treat the width as their thickness.
    fn set_outline(&mut self, id: PrimitiveId, color: Option<&Color>, width: Option<f32>);

    fn move_by(&mut self, id: PrimitiveId, delta: Vec2);

    /// Scale every coordinate of the primitive about `origin`
    fn scale(&mut self, id: PrimitiveId, origin: Pos2, scale: Vec2);

    /// Geometric bounding box, `None` if the primitive does not exist
    fn bbox(&self, id: PrimitiveId) -> Option<Rect>;

    /// Defining coordinates of the primitive (corners, vertices or endpoints)
    fn coords(&self, id: PrimitiveId) -> Vec<Pos2>;

    /// Move the primitive to the top of the stacking order
    fn raise(&mut self, id: PrimitiveId);

    fn delete(&mut self, id: PrimitiveId);

    /// Topmost primitive under `pos`
    fn item_at(&self, pos: Pos2) -> Option<PrimitiveId>;

    /// Number of live primitives
    fn primitive_count(&self) -> usize;
}
