//! Pixel layout of a render: module size, quiet zone and frame reservation.

use crate::error::{QrError, Result};
use crate::geometry::Point;
use crate::style::FrameKind;

/// Extra pixels added to the canvas side when a frame is drawn. The matrix is
/// shifted by half of it so it stays centered.
pub const FRAME_SPACE: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub module_count: usize,
    /// Integer side of one module in pixels.
    pub module_size: u32,
    /// Quiet zone on each side of the matrix.
    pub margin_px: f32,
    /// Side of the matrix including its quiet zone.
    pub matrix_px: f32,
    pub frame_space: u32,
    pub canvas_size: u32,
}

impl Layout {
    /// Fits `module_count` modules plus the quiet zone into roughly `size`
    /// pixels. `margin` counts tenths of a module per side.
    ///
    /// # Errors
    ///
    /// [`QrError::CanvasTooSmall`] when a module would be narrower than a pixel.
    pub fn compute(module_count: usize, size: u32, margin: u32, frame: FrameKind) -> Result<Self> {
        let margin_modules = margin as f32 / 10.0;
        let module_size = (size as f32 / (module_count as f32 + margin_modules)).floor() as u32;
        if module_size == 0 {
            return Err(QrError::CanvasTooSmall {
                size,
                modules: module_count,
            });
        }
        let matrix_px = (module_count as f32 + margin_modules * 2.0) * module_size as f32;
        let frame_space = if frame.is_none() { 0 } else { FRAME_SPACE };
        Ok(Self {
            module_count,
            module_size,
            margin_px: margin_modules * module_size as f32,
            matrix_px,
            frame_space,
            canvas_size: matrix_px.floor() as u32 + frame_space,
        })
    }

    /// Canvas position of the top-left corner of module `(0, 0)`.
    pub fn origin(&self) -> Point {
        let offset = self.margin_px + self.frame_space as f32 / 2.0;
        Point::new(offset, offset)
    }

    /// Canvas position of the top-left corner of module `(row, col)`.
    pub fn cell_origin(&self, row: usize, col: usize) -> Point {
        let origin = self.origin();
        let m = self.module_size as f32;
        Point::new(origin.x + col as f32 * m, origin.y + row as f32 * m)
    }

    /// Canvas side without the frame reservation.
    pub fn frameless_size(&self) -> u32 {
        self.canvas_size - self.frame_space
    }
}
