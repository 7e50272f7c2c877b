use egui::{Pos2, Rect, Vec2};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::color::Color;
use crate::surface::{DrawingSurface, PrimitiveId, PrimitiveStyle};

mod basic;
mod polygon;
mod stroke;
mod text;

pub use basic::{Ellipse, Rectangle, Triangle};
pub use polygon::Polygon;
pub use stroke::{Stroke, StrokeKind};
pub use text::{Text, TextSpec};

/// Stable identifier of a shape for the lifetime of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fill and outline shared by every shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f32,
}

impl ShapeStyle {
    pub fn new(fill: Color, outline: Color, outline_width: f32) -> Self {
        Self {
            fill,
            outline,
            outline_width,
        }
    }

    pub(crate) fn primitive_style(&self) -> PrimitiveStyle {
        PrimitiveStyle::filled(self.fill.clone(), self.outline.clone(), self.outline_width)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(Color::white(), Color::black(), 1.0)
    }
}

/// State common to all shape variants
#[derive(Debug, Clone)]
pub struct ShapeCore {
    id: ShapeId,
    position: Pos2,
    style: ShapeStyle,
    primitive: Option<PrimitiveId>,
}

impl ShapeCore {
    fn new(style: ShapeStyle) -> Self {
        Self {
            id: ShapeId::new(),
            position: Pos2::ZERO,
            style,
            primitive: None,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Offset accumulated through moves
    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn primitive(&self) -> Option<PrimitiveId> {
        self.primitive
    }
}

/// Behavior that differs between shape kinds
#[derive(Debug, Clone)]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Polygon(Polygon),
    Stroke(Stroke),
    Text(Text),
}

/// A shape on the canvas: the shared core plus its variant
#[derive(Debug, Clone)]
pub struct Shape {
    core: ShapeCore,
    kind: ShapeKind,
}

impl Shape {
    /// Rectangle of `width` x `height` centered on the origin
    pub fn rectangle(surface: &mut dyn DrawingSurface, width: f32, height: f32, style: ShapeStyle) -> Self {
        let rectangle = Rectangle::new(width, height);
        Self::build(surface, ShapeKind::Rectangle(rectangle), style)
    }

    /// Ellipse spanning `radius_1` x `radius_2` centered on the origin
    pub fn ellipse(surface: &mut dyn DrawingSurface, radius_1: f32, radius_2: f32, style: ShapeStyle) -> Self {
        let ellipse = Ellipse::new(radius_1, radius_2);
        Self::build(surface, ShapeKind::Ellipse(ellipse), style)
    }

    /// Apex-up triangle centered on the origin
    pub fn triangle(surface: &mut dyn DrawingSurface, base: f32, height: f32, style: ShapeStyle) -> Self {
        let triangle = Triangle::new(base, height);
        Self::build(surface, ShapeKind::Triangle(triangle), style)
    }

    /// An empty polygon; nothing is rendered until the first vertex
    pub fn polygon(style: ShapeStyle) -> Self {
        Self::from_parts(ShapeCore::new(style), ShapeKind::Polygon(Polygon::new()))
    }

    /// A finished polygon with the given absolute vertices
    pub fn polygon_from_points(surface: &mut dyn DrawingSurface, points: Vec<Pos2>, style: ShapeStyle) -> Self {
        let mut shape = Self::polygon(style);
        if let ShapeKind::Polygon(polygon) = &mut shape.kind {
            polygon.set_vertices(points);
        }
        shape.rerender_polygon(surface);
        shape
    }

    /// An empty freehand stroke; segments are added while drawing
    pub fn stroke(kind: StrokeKind, color: Color, width: f32) -> Self {
        let style = ShapeStyle::new(color, Color::black(), width);
        Self::from_parts(ShapeCore::new(style), ShapeKind::Stroke(Stroke::new(kind, width)))
    }

    /// A text label centered on `anchor`
    pub fn text(surface: &mut dyn DrawingSurface, spec: TextSpec, anchor: Pos2) -> Self {
        let style = ShapeStyle::new(spec.color.clone(), Color::black(), 1.0);
        let text = Text::new(spec);
        let mut core = ShapeCore::new(style);
        core.primitive = Some(text.render(surface, anchor, &core.style.fill));
        info!("Created text shape {}", core.id);
        Self::from_parts(core, ShapeKind::Text(text))
    }

    fn build(surface: &mut dyn DrawingSurface, kind: ShapeKind, style: ShapeStyle) -> Self {
        let mut core = ShapeCore::new(style);
        let primitive_style = core.style.primitive_style();
        core.primitive = match &kind {
            ShapeKind::Rectangle(r) => Some(r.render(surface, &primitive_style)),
            ShapeKind::Ellipse(e) => Some(e.render(surface, &primitive_style)),
            ShapeKind::Triangle(t) => Some(t.render(surface, &primitive_style)),
            _ => None,
        };
        let shape = Self::from_parts(core, kind);
        info!("Created {} shape {}", shape.kind_name(), shape.id());
        shape
    }

    fn from_parts(core: ShapeCore, kind: ShapeKind) -> Self {
        Self { core, kind }
    }

    pub fn id(&self) -> ShapeId {
        self.core.id
    }

    pub fn core(&self) -> &ShapeCore {
        &self.core
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ShapeKind {
        &mut self.kind
    }

    pub fn position(&self) -> Pos2 {
        self.core.position
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.core.style
    }

    /// Human-readable variant name, used in logs
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ShapeKind::Rectangle(_) => "rectangle",
            ShapeKind::Ellipse(e) if e.is_circle() => "circle",
            ShapeKind::Ellipse(_) => "ellipse",
            ShapeKind::Triangle(_) => "triangle",
            ShapeKind::Polygon(_) => "polygon",
            ShapeKind::Stroke(s) if s.kind() == StrokeKind::Eraser => "eraser",
            ShapeKind::Stroke(_) => "stroke",
            ShapeKind::Text(_) => "text",
        }
    }

    /// Every primitive this shape owns on the surface
    pub fn primitives(&self) -> Vec<PrimitiveId> {
        let mut ids: Vec<PrimitiveId> = self.core.primitive.into_iter().collect();
        if let ShapeKind::Stroke(stroke) = &self.kind {
            ids.extend(stroke.segments().iter().copied());
        }
        ids
    }

    pub fn owns(&self, primitive: PrimitiveId) -> bool {
        self.core.primitive == Some(primitive)
            || matches!(&self.kind, ShapeKind::Stroke(s) if s.segments().contains(&primitive))
    }

    pub fn is_visible(&self) -> bool {
        !self.primitives().is_empty()
    }

    /// Whether selecting this shape draws a bounding box overlay
    pub fn shows_overlay(&self) -> bool {
        !matches!(self.kind, ShapeKind::Stroke(_))
    }

    /// Whether the overlay handle may scale this shape
    pub fn can_scale(&self) -> bool {
        !matches!(self.kind, ShapeKind::Stroke(_) | ShapeKind::Text(_))
    }

    /// Whether the shape is a polygon still being authored
    pub fn is_authoring(&self) -> bool {
        matches!(&self.kind, ShapeKind::Polygon(p) if p.is_authoring())
    }

    /// Union of the bounding boxes of every primitive
    pub fn bbox(&self, surface: &dyn DrawingSurface) -> Option<Rect> {
        self.primitives()
            .into_iter()
            .filter_map(|id| surface.bbox(id))
            .reduce(|a, b| a.union(b))
    }

    pub fn move_by(&mut self, surface: &mut dyn DrawingSurface, delta: Vec2) {
        if !self.is_visible() {
            return;
        }
        for id in self.primitives() {
            surface.move_by(id, delta);
        }
        match &mut self.kind {
            ShapeKind::Stroke(stroke) => stroke.translate(delta),
            ShapeKind::Polygon(polygon) => polygon.translate(delta),
            _ => {}
        }
        self.core.position += delta;
    }

    /// Scale the primitive in place about the shape's origin
    pub fn scale(&mut self, surface: &mut dyn DrawingSurface, factor: Vec2) {
        if !self.can_scale() {
            return;
        }
        let Some(primitive) = self.core.primitive else {
            return;
        };
        if let ShapeKind::Polygon(polygon) = &mut self.kind {
            // Polygons grow away from their top-left corner
            if let Some(bbox) = surface.bbox(primitive) {
                self.core.position = bbox.min;
            }
            surface.scale(primitive, self.core.position, factor);
            polygon.set_vertices(surface.coords(primitive));
            return;
        }
        surface.scale(primitive, self.core.position, factor);
        debug!("Scaled {} by {:?}", self.core.id, factor);
    }

    pub fn set_color(&mut self, surface: &mut dyn DrawingSurface, color: Color) {
        match &self.kind {
            ShapeKind::Stroke(stroke) if stroke.kind() == StrokeKind::Eraser => return,
            _ => {}
        }
        for id in self.primitives() {
            surface.set_fill(id, &color);
        }
        self.core.style.fill = color;
    }

    pub fn set_outline(&mut self, surface: &mut dyn DrawingSurface, color: Color, width: f32) {
        match &mut self.kind {
            ShapeKind::Text(_) => {}
            ShapeKind::Stroke(stroke) => {
                stroke.set_width(width);
                for id in stroke.segments() {
                    surface.set_outline(*id, None, Some(width));
                }
                self.core.style.outline = color;
                self.core.style.outline_width = width;
            }
            _ => {
                if let Some(id) = self.core.primitive {
                    surface.set_outline(id, Some(&color), Some(width));
                }
                self.core.style.outline = color;
                self.core.style.outline_width = width;
            }
        }
    }

    /// Raise every primitive to the top of the stacking order
    pub fn raise(&self, surface: &mut dyn DrawingSurface) {
        for id in self.primitives() {
            surface.raise(id);
        }
    }

    /// Detach the shape from the surface
    pub fn delete(&mut self, surface: &mut dyn DrawingSurface) {
        info!("Deleting {} shape {}", self.kind_name(), self.core.id);
        for id in self.primitives() {
            surface.delete(id);
        }
        self.core.primitive = None;
        match &mut self.kind {
            ShapeKind::Stroke(stroke) => stroke.clear_segments(),
            ShapeKind::Polygon(polygon) => polygon.remove_cursor(surface),
            _ => {}
        }
    }

    /// Redraw the polygon outline from its vertices and rubber-band point
    pub(crate) fn rerender_polygon(&mut self, surface: &mut dyn DrawingSurface) {
        let ShapeKind::Polygon(polygon) = &mut self.kind else {
            return;
        };
        if let Some(old) = self.core.primitive.take() {
            surface.delete(old);
        }
        let points = polygon.outline_points();
        if !points.is_empty() {
            self.core.primitive = Some(surface.create_polygon(&points, &self.core.style.primitive_style()));
        }
        polygon.raise_cursor(surface);
    }

    /// Record the first waypoint of a stroke being drawn
    pub(crate) fn begin_stroke_at(&mut self, origin: Pos2) {
        if let ShapeKind::Stroke(stroke) = &mut self.kind {
            stroke.begin_at(origin);
        }
    }

    /// Extend a stroke being drawn to `point`, rendering one segment
    pub(crate) fn extend_stroke(&mut self, surface: &mut dyn DrawingSurface, point: Pos2) {
        let color = self.core.style.fill.clone();
        if let ShapeKind::Stroke(stroke) = &mut self.kind {
            stroke.extend_to(surface, point, &color);
        }
    }

    /// Draw every segment of a stored stroke in one pass
    pub(crate) fn replay_stroke(&mut self, surface: &mut dyn DrawingSurface, waypoints: Vec<Pos2>) {
        let color = self.core.style.fill.clone();
        if let ShapeKind::Stroke(stroke) = &mut self.kind {
            stroke.replay(surface, waypoints, &color);
        }
    }

    pub(crate) fn set_position(&mut self, position: Pos2) {
        self.core.position = position;
    }
}
