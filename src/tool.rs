use crate::color::Color;
use crate::config::EditorConfig;
use crate::shape::ShapeStyle;

pub const MIN_OUTLINE_WIDTH: f32 = 1.0;
pub const MAX_OUTLINE_WIDTH: f32 = 10.0;

/// What a pointer press on the canvas does
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Tool {
    /// Select, move and scale shapes
    #[default]
    Select,
    Pen,
    Eraser,
    Polygon,
}

/// Current tool and the style applied to newly created shapes
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    current_tool: Tool,
    fill: Color,
    outline: Color,
    outline_width: f32,
}

impl ToolSettings {
    pub fn new(fill: Color, outline: Color, outline_width: f32) -> Self {
        Self {
            current_tool: Tool::Select,
            fill,
            outline,
            outline_width: clamp_outline_width(outline_width),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.fill.clone(), config.outline.clone(), config.outline_width)
    }

    pub fn current_tool(&self) -> Tool {
        self.current_tool
    }

    pub fn set_current_tool(&mut self, tool: Tool) {
        self.current_tool = tool;
    }

    pub fn fill(&self) -> &Color {
        &self.fill
    }

    pub fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    pub fn outline(&self) -> &Color {
        &self.outline
    }

    pub fn set_outline(&mut self, color: Color) {
        self.outline = color;
    }

    pub fn outline_width(&self) -> f32 {
        self.outline_width
    }

    /// Returns the width actually stored after clamping
    pub fn set_outline_width(&mut self, width: f32) -> f32 {
        self.outline_width = clamp_outline_width(width);
        self.outline_width
    }

    /// Style for a shape created with the current settings
    pub fn style(&self) -> ShapeStyle {
        ShapeStyle::new(self.fill.clone(), self.outline.clone(), self.outline_width)
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::new(Color::white(), Color::black(), MIN_OUTLINE_WIDTH)
    }
}

fn clamp_outline_width(width: f32) -> f32 {
    if width.is_nan() {
        return MIN_OUTLINE_WIDTH;
    }
    width.clamp(MIN_OUTLINE_WIDTH, MAX_OUTLINE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_width_is_clamped() {
        let mut settings = ToolSettings::default();
        assert_eq!(settings.set_outline_width(0.0), 1.0);
        assert_eq!(settings.set_outline_width(25.0), 10.0);
        assert_eq!(settings.set_outline_width(4.0), 4.0);
        assert_eq!(settings.style().outline_width, 4.0);
    }

    #[test]
    fn test_tool_selection() {
        let mut settings = ToolSettings::default();
        assert_eq!(settings.current_tool(), Tool::Select);
        settings.set_current_tool(Tool::Eraser);
        assert_eq!(settings.current_tool(), Tool::Eraser);
    }
}
