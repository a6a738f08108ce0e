//! The boolean module grid a QR code is drawn from.
//!
//! Symbol encoding and error correction are delegated to the [`qrcode`] crate;
//! this module only adapts its output into an immutable square grid that the
//! renderers index as `[row][col]` from the top-left corner.

use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::error::{QrError, Result};

/// The error-correction level every render uses. The highest tier keeps the
/// code readable underneath a centered logo.
pub const ERROR_CORRECTION: EcLevel = EcLevel::H;

/// An immutable N×N grid of dark (`true`) and light (`false`) modules.
///
/// # Example
///
/// ```rust
/// use qrforge::matrix::ModuleMatrix;
///
/// let matrix = ModuleMatrix::encode("Hello, World!").unwrap();
/// assert_eq!(matrix.size() * matrix.size(), matrix.dark_count() + matrix.light_count());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Encodes a text payload at [`ERROR_CORRECTION`].
    ///
    /// # Errors
    ///
    /// Returns [`QrError::EmptyPayload`] for blank input and
    /// [`QrError::Encoding`] when the encoder cannot fit the data.
    pub fn encode(payload: &str) -> Result<Self> {
        if payload.trim().is_empty() {
            return Err(QrError::EmptyPayload);
        }
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ERROR_CORRECTION)?;
        let size = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();
        debug!(size, bytes = payload.len(), "encoded payload");
        Ok(Self { size, modules })
    }

    /// Builds a matrix from explicit rows. Returns `None` unless the rows form
    /// a non-empty square.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            modules: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the module at `(row, col)` is dark. Coordinates outside
    /// the grid read as light, which lets callers iterate over a quiet zone.
    pub fn is_dark(&self, row: i64, col: i64) -> bool {
        let n = self.size as i64;
        if row < 0 || col < 0 || row >= n || col >= n {
            return false;
        }
        self.modules[row as usize * self.size + col as usize]
    }

    /// Iterates the dark modules as `(row, col)` in row-major order.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i / self.size, i % self.size))
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|dark| **dark).count()
    }

    pub fn light_count(&self) -> usize {
        self.modules.len() - self.dark_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_square() {
        let matrix = ModuleMatrix::encode("https://example.com").unwrap();
        assert!(matrix.size() >= 21);
        assert_eq!((matrix.size() - 17) % 4, 0);
        assert_eq!(matrix.modules.len(), matrix.size() * matrix.size());
    }

    #[test]
    fn test_encode_rejects_blank_payload() {
        assert!(matches!(ModuleMatrix::encode(""), Err(QrError::EmptyPayload)));
        assert!(matches!(ModuleMatrix::encode("   \n"), Err(QrError::EmptyPayload)));
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let payload = "x".repeat(4000);
        assert!(matches!(ModuleMatrix::encode(&payload), Err(QrError::Encoding(_))));
    }

    #[test]
    fn test_finder_pattern_corner_is_dark() {
        let matrix = ModuleMatrix::encode("HELLO WORLD").unwrap();
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.is_dark(0, 6));
        assert!(!matrix.is_dark(1, 1));
        assert!(!matrix.is_dark(-1, 0));
        assert!(!matrix.is_dark(0, matrix.size() as i64));
    }

    #[test]
    fn test_from_rows_requires_square() {
        assert!(ModuleMatrix::from_rows(vec![vec![true, false]]).is_none());
        assert!(ModuleMatrix::from_rows(Vec::new()).is_none());
        let matrix = ModuleMatrix::from_rows(vec![vec![true, false], vec![false, true]]).unwrap();
        assert_eq!(matrix.dark_modules().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
        assert_eq!(matrix.light_count(), 2);
    }
}
