use thiserror::Error;

/// Errors produced while turning a [`RenderConfig`](crate::config::RenderConfig)
/// into a rendered QR code.
///
/// Nothing here is fatal to the caller: every variant describes a render that
/// can simply be retried with different parameters.
#[derive(Debug, Error)]
pub enum QrError {
    /// The payload was empty or whitespace only.
    #[error("payload is empty")]
    EmptyPayload,

    /// The encoder rejected the payload (usually because it is too long).
    #[error("failed to encode payload: {0}")]
    Encoding(#[from] qrcode::types::QrError),

    /// The requested pixel size leaves less than one pixel per module.
    #[error("canvas of {size}px is too small for {modules} modules")]
    CanvasTooSmall { size: u32, modules: usize },

    /// The logo bytes are not a decodable image.
    #[error("failed to decode logo: {0}")]
    LogoDecode(#[source] image::ImageError),

    /// A drawing surface of the given dimensions could not be allocated.
    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    /// Encoding the raster surface into bytes failed.
    #[error("failed to export image: {0}")]
    Export(#[source] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file or value could not be understood.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QrError>;
