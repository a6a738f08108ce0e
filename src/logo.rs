//! The centered logo composited on top of a finished code.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::color::ColorScheme;
use crate::config::{clamp_logo_size, LogoSettings};
use crate::error::{QrError, Result};
use crate::geometry::{Outline, Point, Rect};
use crate::layout::Layout;
use crate::paint::{DrawStyle, Fill, Stroke};
use crate::style::LogoShape;

/// A decoded logo, keeping the original bytes for embedding in SVG output.
#[derive(Clone)]
pub struct LogoImage {
    pixels: RgbaImage,
    source: Arc<[u8]>,
    mime: &'static str,
}

impl LogoImage {
    /// Decodes encoded image bytes.
    ///
    /// # Errors
    ///
    /// [`QrError::LogoDecode`] when the format is unknown or the data is
    /// corrupt.
    pub fn decode(data: Arc<[u8]>) -> Result<Self> {
        let format = image::guess_format(&data).map_err(QrError::LogoDecode)?;
        let pixels = image::load_from_memory_with_format(&data, format)
            .map_err(QrError::LogoDecode)?
            .to_rgba8();
        Ok(Self {
            pixels,
            source: data,
            mime: format.to_mime_type(),
        })
    }

    /// Wraps already-decoded pixels; the SVG embedding re-encodes them as PNG.
    pub fn from_pixels(pixels: RgbaImage) -> Result<Self> {
        let mut png = std::io::Cursor::new(Vec::new());
        pixels
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(QrError::Export)?;
        Ok(Self {
            pixels,
            source: Arc::from(png.into_inner()),
            mime: "image/png",
        })
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

impl fmt::Debug for LogoImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoImage")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("mime", &self.mime)
            .finish()
    }
}

/// Where the logo and its plate land on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoPlacement {
    pub plate: Outline,
    pub clip: Outline,
    /// The square the image is scaled into.
    pub target: Rect,
}

/// Sizes the logo as a share of the matrix and centers it with a plate one
/// and a half modules wider.
pub fn logo_placement(layout: &Layout, canvas_size: u32, settings: &LogoSettings) -> LogoPlacement {
    let percent = f32::from(clamp_logo_size(settings.size_percent));
    let m = layout.module_size as f32;
    let logo_px = (layout.matrix_px * percent / 100.0).floor();
    let plate_px = logo_px + (m * 1.5).floor();
    let center = Point::new(canvas_size as f32 / 2.0, canvas_size as f32 / 2.0);
    let target = Rect::centered_square(center, logo_px);
    let plate_rect = Rect::centered_square(center, plate_px);

    let (plate, clip) = match settings.shape {
        LogoShape::Square => (Outline::Rect(plate_rect), Outline::Rect(target)),
        LogoShape::Circle => (
            Outline::Circle {
                center,
                radius: plate_px / 2.0,
            },
            Outline::Circle {
                center,
                radius: logo_px / 2.0,
            },
        ),
        LogoShape::Rounded => (
            Outline::round_rect(plate_rect, (m * 0.75).floor()),
            Outline::round_rect(target, (m * 0.5).floor()),
        ),
    };
    LogoPlacement {
        plate,
        clip,
        target,
    }
}

/// Draws the plate (background fill, primary outline) and then the clipped
/// logo. Call it last so the logo sits above modules and frame.
pub fn overlay_logo<C: Canvas + ?Sized>(
    canvas: &mut C,
    layout: &Layout,
    colors: &ColorScheme,
    logo: &LogoImage,
    settings: &LogoSettings,
) {
    let placement = logo_placement(layout, canvas.size(), settings);
    let plain = DrawStyle::default();
    canvas.fill(&placement.plate, &Fill::Solid(colors.background), &plain);
    canvas.stroke(&placement.plate, &Stroke::solid(colors.primary, 2.0), &plain);
    canvas.image(logo, placement.target, &placement.clip);
}
