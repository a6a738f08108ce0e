//! The render pipeline: matrix, modules, frame and logo, in that order, on any
//! [`Canvas`].

use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::color::ColorScheme;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::frame::draw_frame;
use crate::layout::Layout;
use crate::logo::{overlay_logo, LogoImage};
use crate::matrix::ModuleMatrix;
use crate::modules::draw_modules;

/// Everything a render needs besides the canvas, derived once from a config.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub config: RenderConfig,
    pub matrix: ModuleMatrix,
    pub layout: Layout,
    pub colors: ColorScheme,
}

impl Prepared {
    /// Normalizes the config, encodes the payload and computes the layout.
    ///
    /// # Errors
    ///
    /// Fails when the payload cannot be encoded or does not fit the canvas.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let config = config.normalized();
        let matrix = ModuleMatrix::encode(&config.payload)?;
        let layout = Layout::compute(matrix.size(), config.size, config.margin, config.frame)?;
        let colors = config.colors();
        debug!(
            modules = matrix.size(),
            module_size = layout.module_size,
            canvas = layout.canvas_size,
            "prepared render"
        );
        Ok(Self {
            config,
            matrix,
            layout,
            colors,
        })
    }

    /// Background, modules and frame. Everything except the logo.
    pub fn draw_base<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear(self.colors.background);
        draw_modules(canvas, &self.matrix, &self.layout, &self.config, &self.colors);
        draw_frame(
            canvas,
            self.layout.canvas_size,
            &self.colors,
            &self.config.frame_text,
            self.config.frame,
        );
    }

    /// Composites a decoded logo on top, if the config asks for one.
    pub fn draw_logo<C: Canvas + ?Sized>(&self, canvas: &mut C, logo: &LogoImage) {
        if let Some(settings) = &self.config.logo {
            overlay_logo(canvas, &self.layout, &self.colors, logo, settings);
        }
    }

    /// Decodes the configured logo synchronously. A logo that fails to decode
    /// is logged and skipped.
    pub fn decode_logo(&self) -> Option<LogoImage> {
        let settings = self.config.logo.as_ref()?;
        match LogoImage::decode(settings.data.clone()) {
            Ok(logo) => Some(logo),
            Err(err) => {
                warn!(%err, "skipping logo overlay");
                None
            }
        }
    }

    /// Runs the full pipeline on `canvas`.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        self.draw_base(canvas);
        if let Some(logo) = self.decode_logo() {
            self.draw_logo(canvas, &logo);
        }
    }
}
