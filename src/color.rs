//! Colors and the named color schemes a QR code can be painted with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QrError;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |s: &str| channel(s).map(|v| v * 17);
                Some(Self::new(
                    short(&hex[0..1])?,
                    short(&hex[1..2])?,
                    short(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }

    /// Converts hue (degrees), saturation and lightness (both 0..=1).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| QrError::Config(format!("invalid color '{s}'")))
    }
}

impl TryFrom<String> for Rgb {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// The three colors every render is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub background: Rgb,
}

impl ColorScheme {
    pub const fn new(primary: Rgb, secondary: Rgb, background: Rgb) -> Self {
        Self {
            primary,
            secondary,
            background,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        GRADIENT
    }
}

const GRADIENT: ColorScheme = ColorScheme::new(
    Rgb::new(0x33, 0x41, 0x55),
    Rgb::new(0x64, 0x74, 0x8b),
    Rgb::WHITE,
);

/// Named color schemes. Unknown names resolve to [`ColorSchemeId::Gradient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorSchemeId {
    #[default]
    Gradient,
    Ocean,
    Sunset,
    Forest,
    Purple,
    Neon,
    Rainbow,
    Monochrome,
    Pastel,
    Custom,
}

impl ColorSchemeId {
    pub const ALL: &'static [ColorSchemeId] = &[
        ColorSchemeId::Gradient,
        ColorSchemeId::Ocean,
        ColorSchemeId::Sunset,
        ColorSchemeId::Forest,
        ColorSchemeId::Purple,
        ColorSchemeId::Neon,
        ColorSchemeId::Rainbow,
        ColorSchemeId::Monochrome,
        ColorSchemeId::Pastel,
        ColorSchemeId::Custom,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ColorSchemeId::Gradient => "gradient",
            ColorSchemeId::Ocean => "ocean",
            ColorSchemeId::Sunset => "sunset",
            ColorSchemeId::Forest => "forest",
            ColorSchemeId::Purple => "purple",
            ColorSchemeId::Neon => "neon",
            ColorSchemeId::Rainbow => "rainbow",
            ColorSchemeId::Monochrome => "monochrome",
            ColorSchemeId::Pastel => "pastel",
            ColorSchemeId::Custom => "custom",
        }
    }

    /// Looks a scheme up by id, falling back to `gradient` for unknown ids.
    pub fn from_id(id: &str) -> Self {
        let id = id.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.id() == id)
            .unwrap_or_else(|| {
                warn!(scheme = %id, "unknown color scheme, using gradient");
                Self::default()
            })
    }

    /// Resolves the scheme to its color triple. `custom` hands back the
    /// caller's colors unchanged; every other id is a fixed constant.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrforge::color::{ColorScheme, ColorSchemeId, Rgb};
    ///
    /// let forest = ColorSchemeId::Forest.resolve(&ColorScheme::default());
    /// assert_eq!(forest.background, Rgb::new(0xF0, 0xFD, 0xF4));
    /// ```
    pub fn resolve(self, custom: &ColorScheme) -> ColorScheme {
        let hex = |r, g, b| Rgb::new(r, g, b);
        match self {
            ColorSchemeId::Custom => *custom,
            ColorSchemeId::Gradient => GRADIENT,
            ColorSchemeId::Ocean => ColorScheme::new(
                hex(0x03, 0x69, 0xA1),
                hex(0x02, 0x84, 0xC7),
                hex(0xF0, 0xF9, 0xFF),
            ),
            ColorSchemeId::Sunset => ColorScheme::new(
                hex(0xDC, 0x26, 0x26),
                hex(0xF5, 0x9E, 0x0B),
                hex(0xFE, 0xF3, 0xC7),
            ),
            ColorSchemeId::Forest => ColorScheme::new(
                hex(0x16, 0x65, 0x34),
                hex(0x16, 0xA3, 0x4A),
                hex(0xF0, 0xFD, 0xF4),
            ),
            ColorSchemeId::Purple => ColorScheme::new(
                hex(0x7C, 0x2D, 0x92),
                hex(0xA8, 0x55, 0xF7),
                hex(0xFA, 0xF5, 0xFF),
            ),
            ColorSchemeId::Neon => ColorScheme::new(
                hex(0xFF, 0x00, 0xFF),
                hex(0x00, 0xFF, 0xFF),
                Rgb::BLACK,
            ),
            ColorSchemeId::Rainbow => ColorScheme::new(
                hex(0xFF, 0x00, 0x80),
                hex(0x80, 0x00, 0xFF),
                Rgb::WHITE,
            ),
            ColorSchemeId::Monochrome => {
                ColorScheme::new(Rgb::BLACK, hex(0x40, 0x40, 0x40), Rgb::WHITE)
            }
            ColorSchemeId::Pastel => ColorScheme::new(
                hex(0xF8, 0xBB, 0xD9),
                hex(0xB4, 0xE7, 0xCE),
                hex(0xFF, 0xF9, 0xFC),
            ),
        }
    }
}

impl From<String> for ColorSchemeId {
    fn from(value: String) -> Self {
        Self::from_id(&value)
    }
}

impl From<ColorSchemeId> for String {
    fn from(value: ColorSchemeId) -> Self {
        value.id().to_string()
    }
}

/// Hue in degrees of the rainbow sweep at a module. Depends only on
/// `row + col`, so every anti-diagonal shares one hue.
pub fn rainbow_hue(row: usize, col: usize) -> f32 {
    ((row + col) as f32 * 137.5) % 360.0
}

/// The two gradient endpoints of a rainbow module: the module's hue and the
/// hue 60° further on.
pub fn rainbow_pair(row: usize, col: usize) -> (Rgb, Rgb) {
    let hue = rainbow_hue(row, col);
    (
        Rgb::from_hsl(hue, 0.7, 0.6),
        Rgb::from_hsl((hue + 60.0) % 360.0, 0.7, 0.6),
    )
}
