use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::color::Color;
use crate::error::EditorResult;
use crate::selection::OverlayStyle;

/// What to do with a saved record whose `name` tag is not a known shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Fail the whole load
    #[default]
    Strict,
    /// Log a warning and skip the record
    SkipUnknown,
}

/// Editor configuration. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub background: Color,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f32,
    pub overlay_color: Color,
    pub handle_radius: f32,
    /// Where new text labels are created before being moved
    pub text_anchor: [f32; 2],
    pub load_policy: LoadPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 600.0,
            background: Color::white(),
            fill: Color::white(),
            outline: Color::black(),
            outline_width: 1.0,
            overlay_color: Color::red(),
            handle_radius: 5.0,
            text_anchor: [30.0, 30.0],
            load_policy: LoadPolicy::Strict,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    /// Where the "add shape" operations place new shapes
    pub fn canvas_center(&self) -> Pos2 {
        (self.canvas_size() / 2.0).to_pos2()
    }

    pub fn text_anchor(&self) -> Pos2 {
        Pos2::new(self.text_anchor[0], self.text_anchor[1])
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            color: self.overlay_color.clone(),
            handle_radius: self.handle_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{"canvas_width": 800, "load_policy": "skip_unknown"}"#).unwrap();
        assert_eq!(config.canvas_width, 800.0);
        assert_eq!(config.canvas_height, 600.0);
        assert_eq!(config.load_policy, LoadPolicy::SkipUnknown);
        assert_eq!(config.canvas_center(), Pos2::new(400.0, 300.0));
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(EditorConfig::from_json_str("{\"canvas_width\": \"wide\"}").is_err());
    }
}
