use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pencil,
    Eraser,
    /// Placeholder for character stamps. Carries no drawing behavior.
    AddCharacter,
}

/// How a stroke's pixels combine with what is already on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    SourceOver,
    DestinationOut,
}

impl Tool {
    pub fn composite_mode(self) -> Option<CompositeMode> {
        match self {
            Tool::Pencil => Some(CompositeMode::SourceOver),
            Tool::Eraser => Some(CompositeMode::DestinationOut),
            Tool::AddCharacter => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::AddCharacter => "Add Characters",
        }
    }
}

/// An opaque RGB color written the CSS way (`#222`, `#E53935`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0x22, 0x22, 0x22]);

    pub fn rgba(self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], 255]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #rgb or #rrggbb", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
                Ok(Color([r * 17, g * 17, b * 17]))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
                Ok(Color([byte(0)?, byte(2)?, byte(4)?]))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// One freehand gesture, from pointer-down to pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    tool: Tool,
    color: Color,
    width: f32,
    points: Vec<[f32; 2]>,
}

impl Stroke {
    pub(crate) fn new(tool: Tool, color: Color, width: f32, start: [f32; 2]) -> Self {
        debug_assert!(width > 0.0, "stroke width must be positive");
        Self {
            tool,
            color,
            width,
            points: vec![start],
        }
    }

    pub(crate) fn push(&mut self, point: [f32; 2]) {
        self.points.push(point);
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }
}
