//! How an outline is painted: fills, strokes, shadows and placement.
//!
//! Every draw call carries its own [`DrawStyle`], so a canvas never holds
//! shadow or opacity state from one call to the next.

use crate::color::Rgb;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgb,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgb) -> Self {
        Self { offset, color }
    }
}

/// A linear gradient between two points in the local coordinate space of the
/// outline it fills.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// A two-stop gradient from `from` at `start` to `to` at `end`.
    pub fn between(start: Point, end: Point, from: Rgb, to: Rgb) -> Self {
        Self {
            start,
            end,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    Linear(LinearGradient),
}

impl From<LinearGradient> for Fill {
    fn from(gradient: LinearGradient) -> Self {
        Fill::Linear(gradient)
    }
}

/// A blurred copy of the drawn shape placed underneath it.
///
/// `blur` follows the canvas convention: the Gaussian standard deviation is
/// half of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgb,
    pub alpha: f32,
    pub blur: f32,
    pub offset: Point,
}

impl Shadow {
    pub fn sigma(&self) -> f32 {
        self.blur / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Fill,
    pub width: f32,
    /// Alternating dash and gap lengths.
    pub dash: Option<Vec<f32>>,
}

impl Stroke {
    pub fn solid(color: Rgb, width: f32) -> Self {
        Self {
            paint: Fill::Solid(color),
            width,
            dash: None,
        }
    }
}

/// Where local coordinates land on the canvas: translated to `origin`, then
/// rotated by `rotation` degrees about `pivot` (given in local coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub origin: Point,
    pub rotation: f32,
    pub pivot: Point,
}

impl Placement {
    pub fn at(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn rotated(mut self, degrees: f32, pivot: Point) -> Self {
        self.rotation = degrees;
        self.pivot = pivot;
        self
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation.rem_euclid(360.0) != 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub placement: Placement,
    /// 0.0 (invisible) to 1.0 (opaque), applied to this call only.
    pub opacity: f32,
    pub shadow: Option<Shadow>,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            opacity: 1.0,
            shadow: None,
        }
    }
}

impl DrawStyle {
    pub fn with_shadow(shadow: Shadow) -> Self {
        Self {
            shadow: Some(shadow),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFont {
    Sans,
    Mono,
}

impl LabelFont {
    pub fn family(self) -> &'static str {
        match self {
            LabelFont::Sans => "Helvetica, Arial, sans-serif",
            LabelFont::Mono => "Courier New, monospace",
        }
    }
}

/// Bold text centered horizontally on `center_x`, sitting on `baseline`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub center_x: f32,
    pub baseline: f32,
    pub font: LabelFont,
    pub size: f32,
    pub color: Rgb,
}
