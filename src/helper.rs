use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbaImage;
use tracing::info;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::matrix::ModuleMatrix;

/*---- Utilities ----*/

// Returns the matrix as text, two characters per module so the preview keeps
// its aspect ratio in a terminal. Lines end with '\n' on every platform.
pub fn to_ascii(matrix: &ModuleMatrix, border: usize) -> String {
    let border = border as i64;
    let size = matrix.size() as i64;
    let mut result = String::new();
    for row in -border..size + border {
        for col in -border..size + border {
            let c = if matrix.is_dark(row, col) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Prints the given matrix to the console with a four module quiet zone.
pub fn print_qr(matrix: &ModuleMatrix) {
    println!("{}", to_ascii(matrix, 4));
}

fn with_payload(content: &str, config: Option<&RenderConfig>) -> RenderConfig {
    let mut config = config.cloned().unwrap_or_default();
    config.payload = content.to_string();
    config
}

/// Renders `content` into an in-memory RGBA image.
///
/// # Arguments
///
/// * `content` - The text to encode.
/// * `config` - Optional. Styling for the render. If not provided, the default
///   rounded modules on the gradient scheme are used.
///
/// # Errors
///
/// Returns a `QrError` if the content is empty, cannot be encoded, or does not
/// fit the canvas.
///
/// # Example
///
/// ```rust
/// use qrforge::helper::generate_image_buffer;
///
/// let img = generate_image_buffer("Hello, World!", None).unwrap();
/// assert_eq!(img.width(), img.height());
/// ```
pub fn generate_image_buffer(content: &str, config: Option<&RenderConfig>) -> Result<RgbaImage> {
    export::render_image(&with_payload(content, config))
}

/// Renders `content` as a standalone SVG document.
///
/// # Example
///
/// ```rust
/// use qrforge::helper::generate_svg_string;
///
/// let svg = generate_svg_string("Hello, World!", None).unwrap();
/// assert!(svg.starts_with("<?xml"));
/// ```
pub fn generate_svg_string(content: &str, config: Option<&RenderConfig>) -> Result<String> {
    export::render_svg(&with_payload(content, config))
}

/// Renders `content` and saves it to a file.
///
/// # Arguments
///
/// * `content` - The text to encode.
/// * `config` - Optional. Styling for the render.
/// * `directory` - Optional. The directory path where the image will be saved. If not provided, the default directory is "generated".
/// * `filename` - Optional. The name of the file. Its extension picks the format (`.svg`, `.png`, `.jpg`); without one the file is saved as PNG. If not provided, a timestamp-based filename will be used.
///
/// # Errors
///
/// Returns a `QrError` if rendering, encoding, or writing the file fails.
///
/// # Example
///
/// ```no_run
/// use qrforge::helper::save_image;
///
/// let path = save_image("Hello, World!", None, Some("images"), Some("qr_code.png")).unwrap();
/// println!("saved {}", path.display());
/// ```
pub fn save_image(
    content: &str,
    config: Option<&RenderConfig>,
    directory: Option<&str>,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let directory = Path::new(directory.unwrap_or("generated"));
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            format!("{}", since_the_epoch.as_millis())
        }
    };
    let format = Path::new(&filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse::<ExportFormat>().ok());
    let (format, filename) = match format {
        Some(format) => (format, filename),
        None => (ExportFormat::Png, format!("{filename}.png")),
    };

    let artifact = export::export(&with_payload(content, config), format)?;

    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }
    let file_path = directory.join(filename);
    fs::write(&file_path, &artifact.bytes)?;
    info!(path = %file_path.display(), %format, "saved image");
    Ok(file_path)
}
