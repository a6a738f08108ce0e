//! # qrforge
//!
//! A Rust library for rendering styled QR codes to bitmaps and SVG documents.
//!
//! `qrforge` encodes text into a QR matrix at error correction level H and
//! draws it with customizable module shapes, color schemes, effects,
//! decorative frames and a centered logo. The same drawing pipeline feeds a
//! pixel surface and an SVG document, so both outputs share one layout.
//!
//! ## Features
//!
//! - Module shapes: squares, rounded, dots, diamond, hexagon.
//! - Nine preset color schemes plus custom colors, with per-module gradients.
//! - Shadow and glow effects, rotation and opacity.
//! - Frames with a call-to-action label.
//! - Logo overlay with square, circle or rounded clipping.
//! - Export to SVG, PNG and JPEG.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrforge = "0.1"
//! ```
//!
//! ## Example
//!
//! Render a framed code on the forest scheme and export it:
//!
//! ```rust
//! use qrforge::{export, ColorSchemeId, ExportFormat, FrameKind, ModuleStyle, RenderConfig};
//!
//! let mut config = RenderConfig::new("https://example.com");
//! config.style = ModuleStyle::Dots;
//! config.scheme = ColorSchemeId::Forest;
//! config.frame = FrameKind::Modern;
//!
//! let png = export(&config, ExportFormat::Png).unwrap();
//! assert_eq!(png.file_name, "qr-code.png");
//! ```
//!
//! Generate an in-memory image buffer:
//!
//! ```no_run
//! use qrforge::helper::generate_image_buffer;
//!
//! let img = generate_image_buffer("Hello, World!", None).unwrap();
//! img.save("qr.png").unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: Payload encoding into a module matrix.
//! - [`config`]: Render settings and the on-disk config file.
//! - [`layout`]: Canvas geometry.
//! - [`modules`], [`frame`], [`logo`]: The drawing stages.
//! - [`raster`], [`svg`]: The two [`Canvas`] backends.
//! - [`export`]: Terminal artifacts.
//! - [`session`]: Interactive renders with asynchronous logo decoding.
//! - [`helper`]: One-call utilities.

#![forbid(unsafe_code)]

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod helper;
pub mod layout;
pub mod logo;
pub mod matrix;
pub mod modules;
pub mod paint;
pub mod pipeline;
pub mod raster;
pub mod session;
pub mod style;
pub mod svg;

pub use canvas::Canvas;
pub use color::{ColorScheme, ColorSchemeId, Rgb};
pub use config::{ConfigFile, LogoSettings, RenderConfig};
pub use error::{QrError, Result};
pub use export::{export, render_image, render_svg, Artifact, ExportFormat};
pub use layout::Layout;
pub use matrix::ModuleMatrix;
pub use session::{Completion, RenderSession, RenderStatus};
pub use style::{Effect, FillPattern, FrameKind, LogoShape, ModuleStyle};
