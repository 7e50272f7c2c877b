use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color as the user picked it: a named color (`"red"`) or a hex string
/// (`"#ff8800"`). The original spelling is kept so scene files round-trip
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

const NAMED_COLORS: &[(&str, Color32)] = &[
    ("white", Color32::WHITE),
    ("black", Color32::BLACK),
    ("red", Color32::from_rgb(255, 0, 0)),
    ("green", Color32::from_rgb(0, 128, 0)),
    ("blue", Color32::from_rgb(0, 0, 255)),
    ("yellow", Color32::from_rgb(255, 255, 0)),
    ("orange", Color32::from_rgb(255, 165, 0)),
    ("purple", Color32::from_rgb(128, 0, 128)),
    ("pink", Color32::from_rgb(255, 192, 203)),
    ("brown", Color32::from_rgb(165, 42, 42)),
    ("gray", Color32::from_rgb(190, 190, 190)),
    ("grey", Color32::from_rgb(190, 190, 190)),
    ("cyan", Color32::from_rgb(0, 255, 255)),
    ("magenta", Color32::from_rgb(255, 0, 255)),
    ("lavender", Color32::from_rgb(230, 230, 250)),
];

impl Color {
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    pub fn white() -> Self {
        Self::new("white")
    }

    pub fn black() -> Self {
        Self::new("black")
    }

    pub fn red() -> Self {
        Self::new("red")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to an sRGB color. Unknown names and malformed hex yield `None`.
    pub fn to_color32(&self) -> Option<Color32> {
        let spec = self.0.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(spec))
            .map(|(_, color)| *color)
    }

    /// Like [`Color::to_color32`] but falls back to black, which is what a
    /// canvas does with a color it cannot parse.
    pub fn resolve(&self) -> Color32 {
        self.to_color32().unwrap_or(Color32::BLACK)
    }
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 16 + v;
            }
            Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(spec: &str) -> Self {
        Self::new(spec)
    }
}

impl From<String> for Color {
    fn from(spec: String) -> Self {
        Self(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::red().to_color32(), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(Color::new("White").to_color32(), Some(Color32::WHITE));
        assert_eq!(Color::new("not-a-color").to_color32(), None);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(Color::new("#ff8800").to_color32(), Some(Color32::from_rgb(255, 136, 0)));
        assert_eq!(Color::new("#fff").to_color32(), Some(Color32::WHITE));
        assert_eq!(Color::new("#12345").to_color32(), None);
        assert_eq!(Color::new("#zzzzzz").resolve(), Color32::BLACK);
    }

    #[test]
    fn test_non_ascii_hex_is_rejected() {
        // Six bytes, five chars
        assert_eq!(Color::new("#a\u{e9}bcd").to_color32(), None);
        assert_eq!(Color::new("#\u{e9}f").to_color32(), None);
        assert_eq!(Color::new("#a\u{e9}bcd").resolve(), Color32::BLACK);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Color::new("#00ff00")).unwrap();
        assert_eq!(json, "\"#00ff00\"");
    }
}
