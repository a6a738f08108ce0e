//! Terminal artifacts: SVG documents and PNG/JPEG bitmaps.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::info;

use crate::config::RenderConfig;
use crate::error::{QrError, Result};
use crate::pipeline::Prepared;
use crate::raster::RasterSurface;
use crate::svg::SvgDocument;

pub const JPEG_QUALITY: u8 = 95;

/// Base name of exported files.
pub const FILE_STEM: &str = "qr-code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Svg,
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const ALL: &'static [ExportFormat] = &[ExportFormat::Svg, ExportFormat::Png, ExportFormat::Jpeg];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// The deterministic download name, e.g. `qr-code.png`.
    pub fn file_name(self) -> String {
        format!("{FILE_STEM}.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = QrError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            other => Err(QrError::Config(format!("unknown export format '{other}'"))),
        }
    }
}

/// A named, encoded file ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Writes the artifact into `directory`, creating it when missing.
    pub fn write_to(&self, directory: &Path) -> Result<PathBuf> {
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "wrote artifact");
        Ok(path)
    }
}

/// Renders the full raster pipeline, logo included.
pub fn render_raster(config: &RenderConfig) -> Result<RasterSurface> {
    let prepared = Prepared::new(config)?;
    let mut surface = RasterSurface::new(prepared.layout.canvas_size)?;
    prepared.draw(&mut surface);
    Ok(surface)
}

pub fn render_image(config: &RenderConfig) -> Result<RgbaImage> {
    render_raster(config).map(|surface| surface.to_rgba_image())
}

/// Renders the same pipeline into an SVG document.
pub fn render_svg(config: &RenderConfig) -> Result<String> {
    let prepared = Prepared::new(config)?;
    let mut document = SvgDocument::new(prepared.layout.canvas_size);
    prepared.draw(&mut document);
    Ok(document.finish())
}

/// Encodes a finished bitmap. SVG is not a bitmap encoding and is rejected.
pub fn encode_raster(image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(QrError::Export)?;
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(QrError::Export)?;
        }
        ExportFormat::Svg => {
            return Err(QrError::Config("svg is not a raster format".to_string()));
        }
    }
    Ok(bytes)
}

/// Regenerates the render from scratch and encodes it as `format`.
pub fn export(config: &RenderConfig, format: ExportFormat) -> Result<Artifact> {
    let bytes = match format {
        ExportFormat::Svg => render_svg(config)?.into_bytes(),
        ExportFormat::Png | ExportFormat::Jpeg => encode_raster(&render_image(config)?, format)?,
    };
    Ok(Artifact {
        format,
        file_name: format.file_name(),
        bytes,
    })
}
