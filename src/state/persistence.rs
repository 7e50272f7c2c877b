//! Scene files: a JSON array with one record per shape, tagged by `name`.
//!
//! ```json
//! [{"name": "Rectangle", "x": 50.0, "y": 50.0, "color": "red",
//!   "outline_color": "black", "outline_width": 1.0,
//!   "current_width": 100.0, "current_height": 100.0,
//!   "width": 100.0, "height": 100.0}]
//! ```

use egui::{Pos2, Vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Color;
use crate::config::LoadPolicy;
use crate::error::{EditorError, EditorResult};
use crate::scene::Scene;
use crate::shape::{Shape, ShapeKind, ShapeStyle, StrokeKind, TextSpec};
use crate::surface::{DrawingSurface, Font};

/// Registry of the `name` tags a scene file may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    Rectangle,
    Ellipse,
    Triangle,
    Polygon,
    Lines,
    Eraser,
    Text,
}

impl ShapeTag {
    pub const ALL: [ShapeTag; 7] = [
        ShapeTag::Rectangle,
        ShapeTag::Ellipse,
        ShapeTag::Triangle,
        ShapeTag::Polygon,
        ShapeTag::Lines,
        ShapeTag::Eraser,
        ShapeTag::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeTag::Rectangle => "Rectangle",
            ShapeTag::Ellipse => "Elips",
            ShapeTag::Triangle => "Triangle",
            ShapeTag::Polygon => "PolygonShape",
            ShapeTag::Lines => "Lines",
            ShapeTag::Eraser => "Eraser",
            ShapeTag::Text => "TextShape",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

/// Fields every record carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub outline_color: Color,
    pub outline_width: f32,
    /// Bounding-box size when saved
    pub current_width: f32,
    pub current_height: f32,
}

impl CommonFields {
    fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn style(&self) -> ShapeStyle {
        ShapeStyle::new(self.color.clone(), self.outline_color.clone(), self.outline_width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    pub radius_1: f32,
    pub radius_2: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    pub base: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    /// Absolute vertex coordinates
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    /// Waypoints, connected in order on load
    pub lines: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_style: String,
}

/// One saved shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum ShapeRecord {
    Rectangle(RectangleRecord),
    #[serde(rename = "Elips")]
    Ellipse(EllipseRecord),
    Triangle(TriangleRecord),
    #[serde(rename = "PolygonShape")]
    Polygon(PolygonRecord),
    Lines(StrokeRecord),
    Eraser(StrokeRecord),
    #[serde(rename = "TextShape")]
    Text(TextRecord),
}

impl ShapeRecord {
    pub fn tag(&self) -> ShapeTag {
        match self {
            ShapeRecord::Rectangle(_) => ShapeTag::Rectangle,
            ShapeRecord::Ellipse(_) => ShapeTag::Ellipse,
            ShapeRecord::Triangle(_) => ShapeTag::Triangle,
            ShapeRecord::Polygon(_) => ShapeTag::Polygon,
            ShapeRecord::Lines(_) => ShapeTag::Lines,
            ShapeRecord::Eraser(_) => ShapeTag::Eraser,
            ShapeRecord::Text(_) => ShapeTag::Text,
        }
    }

    pub fn common(&self) -> &CommonFields {
        match self {
            ShapeRecord::Rectangle(r) => &r.common,
            ShapeRecord::Ellipse(r) => &r.common,
            ShapeRecord::Triangle(r) => &r.common,
            ShapeRecord::Polygon(r) => &r.common,
            ShapeRecord::Lines(r) | ShapeRecord::Eraser(r) => &r.common,
            ShapeRecord::Text(r) => &r.common,
        }
    }

    /// Describe a live shape
    pub fn from_shape(shape: &Shape, surface: &dyn DrawingSurface) -> Self {
        let size = shape.bbox(surface).map(|b| b.size()).unwrap_or(Vec2::ZERO);
        let style = shape.style();
        let common = CommonFields {
            x: shape.position().x,
            y: shape.position().y,
            color: style.fill.clone(),
            outline_color: style.outline.clone(),
            outline_width: style.outline_width,
            current_width: size.x,
            current_height: size.y,
        };

        match shape.kind() {
            ShapeKind::Rectangle(rectangle) => {
                let nominal = rectangle.nominal_size();
                ShapeRecord::Rectangle(RectangleRecord {
                    common,
                    width: nominal.x,
                    height: nominal.y,
                })
            }
            ShapeKind::Ellipse(ellipse) => {
                let nominal = ellipse.nominal_size();
                ShapeRecord::Ellipse(EllipseRecord {
                    common,
                    radius_1: nominal.x,
                    radius_2: nominal.y,
                })
            }
            ShapeKind::Triangle(triangle) => {
                let nominal = triangle.nominal_size();
                ShapeRecord::Triangle(TriangleRecord {
                    common,
                    base: nominal.x,
                    height: nominal.y,
                })
            }
            ShapeKind::Polygon(polygon) => ShapeRecord::Polygon(PolygonRecord {
                common,
                points: to_pairs(polygon.vertices()),
            }),
            ShapeKind::Stroke(stroke) => {
                let record = StrokeRecord {
                    common,
                    width: stroke.width(),
                    lines: to_pairs(stroke.waypoints()),
                };
                match stroke.kind() {
                    StrokeKind::Pen => ShapeRecord::Lines(record),
                    StrokeKind::Eraser => ShapeRecord::Eraser(record),
                }
            }
            ShapeKind::Text(text) => ShapeRecord::Text(TextRecord {
                common,
                text: text.text().to_owned(),
                font_family: text.font().family.clone(),
                font_size: text.font().size,
                font_style: text.font().style.clone(),
            }),
        }
    }

    /// Rebuild the shape on `surface`. Strokes and polygons without enough
    /// points to draw anything come back as `None`.
    pub(crate) fn restore(self, surface: &mut dyn DrawingSurface, background: &Color, text_anchor: Pos2) -> Option<Shape> {
        let shape = match self {
            ShapeRecord::Rectangle(r) => {
                let shape = Shape::rectangle(surface, r.width, r.height, r.common.style());
                place_and_resize(shape, surface, &r.common, Vec2::new(r.width, r.height))
            }
            ShapeRecord::Ellipse(r) => {
                let shape = Shape::ellipse(surface, r.radius_1, r.radius_2, r.common.style());
                place_and_resize(shape, surface, &r.common, Vec2::new(r.radius_1, r.radius_2))
            }
            ShapeRecord::Triangle(r) => {
                let shape = Shape::triangle(surface, r.base, r.height, r.common.style());
                place_and_resize(shape, surface, &r.common, Vec2::new(r.base, r.height))
            }
            ShapeRecord::Polygon(r) => {
                if r.points.is_empty() {
                    return None;
                }
                let mut shape = Shape::polygon_from_points(surface, from_pairs(&r.points), r.common.style());
                shape.set_position(r.common.position().to_pos2());
                shape
            }
            ShapeRecord::Lines(r) => restore_stroke(surface, StrokeKind::Pen, r.common.color.clone(), r)?,
            ShapeRecord::Eraser(r) => restore_stroke(surface, StrokeKind::Eraser, background.clone(), r)?,
            ShapeRecord::Text(r) => {
                let spec = TextSpec {
                    text: r.text,
                    font: Font {
                        family: r.font_family,
                        size: r.font_size,
                        style: r.font_style,
                    },
                    color: r.common.color.clone(),
                };
                let mut shape = Shape::text(surface, spec, text_anchor);
                shape.move_by(surface, r.common.position());
                shape
            }
        };
        Some(shape)
    }
}

/// Move a freshly built shape to its saved position, then stretch it about
/// that position to its saved bounding-box size.
fn place_and_resize(mut shape: Shape, surface: &mut dyn DrawingSurface, common: &CommonFields, nominal: Vec2) -> Shape {
    shape.move_by(surface, common.position());
    let factor = Vec2::new(
        resize_factor(common.current_width, nominal.x),
        resize_factor(common.current_height, nominal.y),
    );
    if factor != Vec2::splat(1.0) {
        shape.scale(surface, factor);
    }
    shape
}

fn resize_factor(current: f32, nominal: f32) -> f32 {
    if nominal > 0.0 && current > 0.0 { current / nominal } else { 1.0 }
}

fn restore_stroke(surface: &mut dyn DrawingSurface, kind: StrokeKind, color: Color, record: StrokeRecord) -> Option<Shape> {
    if record.lines.len() < 2 {
        debug!("Skipping stroke with {} waypoint(s)", record.lines.len());
        return None;
    }
    let mut shape = Shape::stroke(kind, color, record.width);
    shape.replay_stroke(surface, from_pairs(&record.lines));
    shape.set_outline(surface, record.common.outline_color.clone(), record.width);
    shape.set_position(record.common.position().to_pos2());
    Some(shape)
}

fn to_pairs(points: &[Pos2]) -> Vec<[f32; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn from_pairs(pairs: &[[f32; 2]]) -> Vec<Pos2> {
    pairs.iter().map(|[x, y]| Pos2::new(*x, *y)).collect()
}

/// Serialize every shape in stacking order
pub fn encode_scene(scene: &Scene, surface: &dyn DrawingSurface) -> EditorResult<String> {
    if scene.is_empty() {
        return Err(EditorError::EmptyScene);
    }
    let records: Vec<ShapeRecord> = scene
        .shapes()
        .iter()
        .map(|shape| ShapeRecord::from_shape(shape, surface))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parse and validate every record of a scene file without touching any
/// surface.
pub fn decode_scene(json: &str, policy: LoadPolicy) -> EditorResult<Vec<ShapeRecord>> {
    let Value::Array(items) = serde_json::from_str::<Value>(json)? else {
        return Err(EditorError::InvalidScene("expected a JSON array of shapes".to_owned()));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Some(name) = item.get("name").and_then(Value::as_str).map(str::to_owned) else {
            return Err(EditorError::MalformedRecord {
                index,
                source: <serde_json::Error as serde::de::Error>::missing_field("name"),
            });
        };
        if ShapeTag::from_name(&name).is_none() {
            match policy {
                LoadPolicy::Strict => return Err(EditorError::UnknownShapeKind { index, name }),
                LoadPolicy::SkipUnknown => {
                    warn!("Skipping record {index} with unknown shape kind {name:?}");
                    continue;
                }
            }
        }
        let record = serde_json::from_value(item).map_err(|source| EditorError::MalformedRecord { index, source })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_registry_names() {
        for tag in ShapeTag::ALL {
            assert_eq!(ShapeTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(ShapeTag::from_name("Ellipse"), None);
        assert_eq!(ShapeTag::Ellipse.name(), "Elips");
    }

    #[test]
    fn test_integer_fields_are_accepted() {
        let json = r#"[{"name": "Rectangle", "x": 50, "y": 50, "color": "red",
            "outline_color": "black", "outline_width": 1,
            "current_width": 100, "current_height": 100, "width": 100, "height": 100}]"#;
        let records = decode_scene(json, LoadPolicy::Strict).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag(), ShapeTag::Rectangle);
        assert_eq!(records[0].common().x, 50.0);
    }

    #[test]
    fn test_unknown_kind_policies() {
        let json = r#"[{"name": "Hexagon", "x": 0}]"#;
        match decode_scene(json, LoadPolicy::Strict) {
            Err(EditorError::UnknownShapeKind { index, name }) => {
                assert_eq!(index, 0);
                assert_eq!(name, "Hexagon");
            }
            other => panic!("expected unknown shape kind, got {other:?}"),
        }
        assert!(decode_scene(json, LoadPolicy::SkipUnknown).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_and_invalid_input() {
        assert!(matches!(
            decode_scene(r#"[{"name": "Triangle", "x": 1}]"#, LoadPolicy::Strict),
            Err(EditorError::MalformedRecord { index: 0, .. })
        ));
        assert!(matches!(
            decode_scene(r#"[{"x": 1}]"#, LoadPolicy::Strict),
            Err(EditorError::MalformedRecord { index: 0, .. })
        ));
        assert!(matches!(decode_scene("{}", LoadPolicy::Strict), Err(EditorError::InvalidScene(_))));
        assert!(matches!(decode_scene("not json", LoadPolicy::Strict), Err(EditorError::Json(_))));
    }
}
