//! Shared style attributes carried by every drawable.

use serde::{Deserialize, Deserializer, Serialize};

/// RGBA8 color, serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Default stroke color for new drawables.
    pub const fn ink() -> Self {
        Self::new(0x1e, 0x40, 0xaf, 255)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Hex representation; the alpha byte is omitted when fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<peniko::Color> for Color {
    fn from(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Color> for peniko::Color {
    fn from(color: Color) -> Self {
        peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by all drawable kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Stroke color.
    #[serde(default = "Color::ink")]
    pub stroke: Color,
    /// Stroke width.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Fill color (None = transparent).
    #[serde(default, deserialize_with = "deserialize_fill")]
    pub fill: Option<Color>,
    /// Overall opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_opacity() -> f64 {
    1.0
}

/// `null`, a missing field and `"transparent"` all mean "no fill".
fn deserialize_fill<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().eq_ignore_ascii_case("transparent") => Ok(None),
        Some(s) => Color::parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid fill color '{}'", s))),
    }
}

impl Style {
    pub fn new(stroke: Color, stroke_width: f64) -> Self {
        Self {
            stroke,
            stroke_width,
            ..Self::default()
        }
    }

    /// Explicit opacity edit; clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Lower opacity by `amount` (never below 0) and return the new value.
    pub fn fade(&mut self, amount: f64) -> f64 {
        self.opacity = (self.opacity - amount.max(0.0)).max(0.0);
        self.opacity
    }

    /// Stroke color with opacity folded into alpha, for the renderer.
    pub fn stroke_with_opacity(&self) -> peniko::Color {
        let alpha = (self.stroke.a as f64 * self.opacity) as u8;
        peniko::Color::from_rgba8(self.stroke.r, self.stroke.g, self.stroke.b, alpha)
    }

    /// Fill color with opacity folded into alpha, for the renderer.
    pub fn fill_with_opacity(&self) -> Option<peniko::Color> {
        self.fill.map(|c| {
            let alpha = (c.a as f64 * self.opacity) as u8;
            peniko::Color::from_rgba8(c.r, c.g, c.b, alpha)
        })
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color::ink(),
            stroke_width: default_stroke_width(),
            fill: None,
            opacity: default_opacity(),
        }
    }
}
