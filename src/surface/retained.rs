use egui::{Align2, Color32, FontFamily, FontId, Painter, Pos2, Rect, Vec2};
use log::debug;

use super::{DrawingSurface, Font, PrimitiveId, PrimitiveStyle};
use crate::color::Color;
use crate::geometry;

/// Extra slack around thin geometry when hit testing
const HIT_TOLERANCE: f32 = 2.0;
/// Segments used to approximate an oval when painting
const OVAL_SEGMENTS: usize = 64;
/// Average glyph advance relative to the font size, for text extents
const GLYPH_WIDTH_RATIO: f32 = 0.6;
const LINE_HEIGHT_RATIO: f32 = 1.3;

#[derive(Debug, Clone, PartialEq)]
enum Geometry {
    Rectangle(Rect),
    Oval(Rect),
    Polygon(Vec<Pos2>),
    Line(Pos2, Pos2),
    Text { anchor: Pos2, text: String, font: Font },
}

#[derive(Debug, Clone)]
struct Primitive {
    id: PrimitiveId,
    geometry: Geometry,
    style: PrimitiveStyle,
}

impl Primitive {
    fn bbox(&self) -> Rect {
        match &self.geometry {
            Geometry::Rectangle(rect) | Geometry::Oval(rect) => *rect,
            Geometry::Polygon(points) => geometry::calculate_bounds(points, 0.0),
            Geometry::Line(from, to) => geometry::calculate_bounds(&[*from, *to], 0.0),
            Geometry::Text { anchor, text, font } => {
                let glyphs = text.chars().count().max(1) as f32;
                Rect::from_center_size(
                    *anchor,
                    Vec2::new(glyphs * font.size * GLYPH_WIDTH_RATIO, font.size * LINE_HEIGHT_RATIO),
                )
            }
        }
    }

    fn coords(&self) -> Vec<Pos2> {
        match &self.geometry {
            Geometry::Rectangle(rect) | Geometry::Oval(rect) => vec![rect.min, rect.max],
            Geometry::Polygon(points) => points.clone(),
            Geometry::Line(from, to) => vec![*from, *to],
            Geometry::Text { anchor, .. } => vec![*anchor],
        }
    }

    fn contains(&self, pos: Pos2) -> bool {
        let reach = self.style.width / 2.0 + HIT_TOLERANCE;
        let filled = self.style.fill.is_some();
        match &self.geometry {
            Geometry::Rectangle(rect) => {
                if filled {
                    rect.expand(reach).contains(pos)
                } else {
                    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
                    near_outline(&corners, pos, reach)
                }
            }
            Geometry::Oval(rect) => {
                if filled {
                    geometry::ellipse_contains(rect.expand(reach), pos)
                } else {
                    geometry::ellipse_contains(rect.expand(reach), pos)
                        && !geometry::ellipse_contains(rect.shrink(reach), pos)
                }
            }
            Geometry::Polygon(points) => {
                (filled && geometry::polygon_contains(points, pos)) || near_outline(points, pos, reach)
            }
            Geometry::Line(from, to) => geometry::distance_to_line_segment(pos, *from, *to) <= reach,
            Geometry::Text { .. } => self.bbox().contains(pos),
        }
    }
}

fn near_outline(points: &[Pos2], pos: Pos2, reach: f32) -> bool {
    match points.len() {
        0 => false,
        1 => points[0].distance(pos) <= reach,
        n => (0..n).any(|i| geometry::distance_to_line_segment(pos, points[i], points[(i + 1) % n]) <= reach),
    }
}

/// In-memory [`DrawingSurface`] that keeps every primitive with its geometry.
///
/// Used headless (tests, scene tooling) and by egui hosts, which call
/// [`RetainedCanvas::paint`] once per frame.
#[derive(Debug, Clone)]
pub struct RetainedCanvas {
    size: Vec2,
    background: Color,
    primitives: Vec<Primitive>,
    next_id: u64,
}

impl RetainedCanvas {
    pub fn new(size: Vec2, background: Color) -> Self {
        Self {
            size,
            background,
            primitives: Vec::new(),
            next_id: 1,
        }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn background(&self) -> &Color {
        &self.background
    }

    /// Stacking order, bottom first
    pub fn stacking_order(&self) -> Vec<PrimitiveId> {
        self.primitives.iter().map(|p| p.id).collect()
    }

    /// Fill color currently applied to a primitive
    pub fn fill_of(&self, id: PrimitiveId) -> Option<&Color> {
        self.get(id).and_then(|p| p.style.fill.as_ref())
    }

    /// Outline color and width currently applied to a primitive
    pub fn outline_of(&self, id: PrimitiveId) -> Option<(Option<&Color>, f32)> {
        self.get(id).map(|p| (p.style.outline.as_ref(), p.style.width))
    }

    fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.iter_mut().find(|p| p.id == id)
    }

    fn push(&mut self, geometry: Geometry, style: PrimitiveStyle) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.primitives.push(Primitive { id, geometry, style });
        id
    }

    /// Paint every primitive, bottom first. `origin` is the screen position of
    /// the canvas' top-left corner.
    pub fn paint(&self, painter: &Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        painter.rect_filled(
            Rect::from_min_size(origin, self.size),
            0.0,
            self.background.to_color32().unwrap_or(Color32::WHITE),
        );

        for primitive in &self.primitives {
            let style = &primitive.style;
            let fill = style.fill.as_ref().map_or(Color32::TRANSPARENT, Color::resolve);
            let outline = match &style.outline {
                Some(color) if style.width > 0.0 => egui::Stroke::new(style.width, color.resolve()),
                _ => egui::Stroke::NONE,
            };

            match &primitive.geometry {
                Geometry::Rectangle(rect) => {
                    let rect = rect.translate(offset);
                    painter.rect_filled(rect, 0.0, fill);
                    painter.rect_stroke(rect, 0.0, outline);
                }
                Geometry::Oval(rect) => {
                    let points = geometry::ellipse_points(rect.translate(offset), OVAL_SEGMENTS);
                    painter.add(egui::Shape::convex_polygon(points, fill, outline));
                }
                Geometry::Polygon(points) => {
                    let points: Vec<Pos2> = points.iter().map(|p| *p + offset).collect();
                    if points.len() >= 3 {
                        if fill != Color32::TRANSPARENT {
                            let mut mesh = egui::Mesh::default();
                            for point in &points {
                                mesh.colored_vertex(*point, fill);
                            }
                            for [a, b, c] in geometry::triangulate(&points) {
                                mesh.add_triangle(a as u32, b as u32, c as u32);
                            }
                            painter.add(egui::Shape::mesh(mesh));
                        }
                        painter.add(egui::Shape::closed_line(points, outline));
                    } else if points.len() == 2 {
                        painter.line_segment([points[0], points[1]], outline);
                    }
                }
                Geometry::Line(from, to) => {
                    painter.line_segment([*from + offset, *to + offset], egui::Stroke::new(style.width, fill));
                }
                Geometry::Text { anchor, text, font } => {
                    let family = if font.family.to_lowercase().contains("courier") {
                        FontFamily::Monospace
                    } else {
                        FontFamily::Proportional
                    };
                    painter.text(
                        *anchor + offset,
                        Align2::CENTER_CENTER,
                        text,
                        FontId::new(font.size, family),
                        fill,
                    );
                }
            }
        }
    }
}

impl DrawingSurface for RetainedCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn create_rectangle(&mut self, rect: Rect, style: &PrimitiveStyle) -> PrimitiveId {
        self.push(Geometry::Rectangle(rect), style.clone())
    }

    fn create_oval(&mut self, rect: Rect, style: &PrimitiveStyle) -> PrimitiveId {
        self.push(Geometry::Oval(rect), style.clone())
    }

    fn create_polygon(&mut self, points: &[Pos2], style: &PrimitiveStyle) -> PrimitiveId {
        self.push(Geometry::Polygon(points.to_vec()), style.clone())
    }

    fn create_line(&mut self, from: Pos2, to: Pos2, style: &PrimitiveStyle) -> PrimitiveId {
        self.push(Geometry::Line(from, to), style.clone())
    }

    fn create_text(&mut self, anchor: Pos2, text: &str, font: &Font, color: &Color) -> PrimitiveId {
        let geometry = Geometry::Text {
            anchor,
            text: text.to_owned(),
            font: font.clone(),
        };
        let style = PrimitiveStyle {
            fill: Some(color.clone()),
            outline: None,
            width: 0.0,
        };
        self.push(geometry, style)
    }

    fn set_fill(&mut self, id: PrimitiveId, color: &Color) {
        if let Some(primitive) = self.get_mut(id) {
            primitive.style.fill = Some(color.clone());
        }
    }

    fn set_outline(&mut self, id: PrimitiveId, color: Option<&Color>, width: Option<f32>) {
        if let Some(primitive) = self.get_mut(id) {
            if let Some(color) = color {
                primitive.style.outline = Some(color.clone());
            }
            if let Some(width) = width {
                primitive.style.width = width;
            }
        }
    }

    fn move_by(&mut self, id: PrimitiveId, delta: Vec2) {
        let Some(primitive) = self.get_mut(id) else {
            return;
        };
        match &mut primitive.geometry {
            Geometry::Rectangle(rect) | Geometry::Oval(rect) => *rect = rect.translate(delta),
            Geometry::Polygon(points) => points.iter_mut().for_each(|p| *p += delta),
            Geometry::Line(from, to) => {
                *from += delta;
                *to += delta;
            }
            Geometry::Text { anchor, .. } => *anchor += delta,
        }
    }

    fn scale(&mut self, id: PrimitiveId, origin: Pos2, scale: Vec2) {
        let Some(primitive) = self.get_mut(id) else {
            return;
        };
        match &mut primitive.geometry {
            Geometry::Rectangle(rect) | Geometry::Oval(rect) => {
                *rect = geometry::scale_rect_about(*rect, origin, scale);
            }
            Geometry::Polygon(points) => {
                for p in points.iter_mut() {
                    *p = geometry::scale_about(*p, origin, scale);
                }
            }
            Geometry::Line(from, to) => {
                *from = geometry::scale_about(*from, origin, scale);
                *to = geometry::scale_about(*to, origin, scale);
            }
            // Text keeps its font size; only the anchor follows the scale
            Geometry::Text { anchor, .. } => *anchor = geometry::scale_about(*anchor, origin, scale),
        }
    }

    fn bbox(&self, id: PrimitiveId) -> Option<Rect> {
        self.get(id).map(Primitive::bbox)
    }

    fn coords(&self, id: PrimitiveId) -> Vec<Pos2> {
        self.get(id).map(Primitive::coords).unwrap_or_default()
    }

    fn raise(&mut self, id: PrimitiveId) {
        if let Some(index) = self.primitives.iter().position(|p| p.id == id) {
            let primitive = self.primitives.remove(index);
            self.primitives.push(primitive);
        }
    }

    fn delete(&mut self, id: PrimitiveId) {
        let before = self.primitives.len();
        self.primitives.retain(|p| p.id != id);
        if self.primitives.len() == before {
            debug!("delete of unknown primitive {:?} ignored", id);
        }
    }

    fn item_at(&self, pos: Pos2) -> Option<PrimitiveId> {
        self.primitives.iter().rev().find(|p| p.contains(pos)).map(|p| p.id)
    }

    fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn canvas() -> RetainedCanvas {
        RetainedCanvas::new(vec2(600.0, 600.0), Color::white())
    }

    #[test]
    fn test_create_move_scale() {
        let mut canvas = canvas();
        let style = PrimitiveStyle::filled(Color::red(), Color::black(), 1.0);
        let id = canvas.create_rectangle(Rect::from_min_max(pos2(-50.0, -50.0), pos2(50.0, 50.0)), &style);

        canvas.move_by(id, vec2(100.0, 100.0));
        assert_eq!(canvas.bbox(id), Some(Rect::from_min_max(pos2(50.0, 50.0), pos2(150.0, 150.0))));

        canvas.scale(id, pos2(100.0, 100.0), vec2(2.0, 0.5));
        let rect = canvas.bbox(id).unwrap();
        assert!((rect.width() - 200.0).abs() < 0.001);
        assert!((rect.height() - 50.0).abs() < 0.001);
        assert_eq!(rect.center(), pos2(100.0, 100.0));
    }

    #[test]
    fn test_hit_testing_respects_stacking() {
        let mut canvas = canvas();
        let style = PrimitiveStyle::filled(Color::red(), Color::black(), 1.0);
        let below = canvas.create_rectangle(Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0)), &style);
        let above = canvas.create_oval(Rect::from_min_max(pos2(50.0, 50.0), pos2(150.0, 150.0)), &style);

        assert_eq!(canvas.item_at(pos2(90.0, 90.0)), Some(above));
        assert_eq!(canvas.item_at(pos2(10.0, 10.0)), Some(below));
        assert_eq!(canvas.item_at(pos2(400.0, 400.0)), None);

        canvas.raise(below);
        assert_eq!(canvas.item_at(pos2(90.0, 90.0)), Some(below));
    }

    #[test]
    fn test_unfilled_rectangle_only_hits_outline() {
        let mut canvas = canvas();
        let frame = canvas.create_rectangle(
            Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0)),
            &PrimitiveStyle::outlined(Color::red(), 1.0),
        );
        assert_eq!(canvas.item_at(pos2(50.0, 50.0)), None);
        assert_eq!(canvas.item_at(pos2(100.0, 50.0)), Some(frame));
    }

    #[test]
    fn test_line_hit_and_delete() {
        let mut canvas = canvas();
        let line = canvas.create_line(pos2(0.0, 0.0), pos2(10.0, 0.0), &PrimitiveStyle::line(Color::black(), 2.0));
        assert_eq!(canvas.item_at(pos2(5.0, 1.0)), Some(line));

        canvas.delete(line);
        assert_eq!(canvas.primitive_count(), 0);
        assert_eq!(canvas.bbox(line), None);
    }

    #[test]
    fn test_paint_shapes() {
        let mut canvas = canvas();
        let style = PrimitiveStyle::filled(Color::red(), Color::black(), 1.0);
        canvas.create_rectangle(Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0)), &style);
        canvas.create_oval(Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 20.0)), &style);
        canvas.create_polygon(&[pos2(0.0, 0.0), pos2(5.0, 0.0), pos2(0.0, 5.0)], &style);
        canvas.create_line(pos2(0.0, 0.0), pos2(5.0, 5.0), &PrimitiveStyle::line(Color::black(), 1.0));

        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(600.0, 600.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), rect);
        canvas.paint(&painter, rect.min);
    }
}
