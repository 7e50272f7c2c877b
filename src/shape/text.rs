use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::surface::{DrawingSurface, Font, PrimitiveId};

/// What the "add text" dialog collects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSpec {
    pub text: String,
    pub font: Font,
    pub color: Color,
}

impl TextSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f32, style: impl Into<String>) -> Self {
        self.font = Font {
            family: family.into(),
            size,
            style: style.into(),
        };
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: Font::default(),
            color: Color::black(),
        }
    }
}

/// Text label
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    text: String,
    font: Font,
}

impl Text {
    pub(crate) fn new(spec: TextSpec) -> Self {
        Self {
            text: spec.text,
            font: spec.font,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub(crate) fn render(&self, surface: &mut dyn DrawingSurface, anchor: Pos2, color: &Color) -> PrimitiveId {
        surface.create_text(anchor, &self.text, &self.font, color)
    }
}
