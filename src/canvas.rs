//! The drawing surface seam shared by the raster and vector renderers.

use crate::color::Rgb;
use crate::geometry::{Outline, Rect};
use crate::logo::LogoImage;
use crate::paint::{DrawStyle, Fill, Label, Stroke};

/// A square surface that module, frame and logo drawing target.
///
/// Implementations must treat every call independently: the [`DrawStyle`]
/// passed in is the only source of placement, opacity and shadow.
pub trait Canvas {
    /// Side length in pixels.
    fn size(&self) -> u32;

    /// Paints the whole surface with `color`.
    fn clear(&mut self, color: Rgb);

    fn fill(&mut self, outline: &Outline, fill: &Fill, style: &DrawStyle);

    fn stroke(&mut self, outline: &Outline, stroke: &Stroke, style: &DrawStyle);

    fn text(&mut self, label: &Label);

    /// Draws `image` scaled into `target`, visible only inside `clip`.
    fn image(&mut self, image: &LogoImage, target: Rect, clip: &Outline);
}
