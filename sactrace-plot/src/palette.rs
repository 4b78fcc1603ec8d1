//! Colors of discrete actions and action components.
use crate::error::RenderError;
use plotters::style::RGBColor;

/// Color of the guide lines joining consecutive actions.
pub const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);

const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Parses `#rrggbb` or one of a few color names.
pub fn parse_color(s: &str) -> Result<RGBColor, RenderError> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok(RGBColor(r, g, b));
            }
        }
        return Err(RenderError::InvalidColor(s.to_string()));
    }
    let color = match s.to_lowercase().as_str() {
        "black" => RGBColor(0, 0, 0),
        "white" => RGBColor(255, 255, 255),
        "red" => RGBColor(255, 0, 0),
        "green" => RGBColor(0, 128, 0),
        "blue" => RGBColor(0, 0, 255),
        "gray" | "grey" => RGBColor(128, 128, 128),
        "lightgray" | "lightgrey" => LIGHT_GRAY,
        "orange" => RGBColor(255, 165, 0),
        "limegreen" => RGBColor(50, 205, 50),
        "cornflowerblue" => RGBColor(100, 149, 237),
        "purple" => RGBColor(128, 0, 128),
        _ => return Err(RenderError::InvalidColor(s.to_string())),
    };
    Ok(color)
}

/// A cyclic list of colors, indexed by discrete action or component.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: TAB10.to_vec(),
        }
    }
}

impl Palette {
    /// Builds a palette from color strings, or the default one if `colors` is `None` or empty.
    pub fn from_names(colors: Option<&[String]>) -> Result<Self, RenderError> {
        match colors {
            Some(colors) if !colors.is_empty() => Ok(Self {
                colors: colors
                    .iter()
                    .map(|c| parse_color(c))
                    .collect::<Result<_, _>>()?,
            }),
            _ => Ok(Self::default()),
        }
    }

    /// The `i`-th color, cycling.
    pub fn color(&self, i: usize) -> RGBColor {
        self.colors[i % self.colors.len()]
    }
}
