//! qrforge command line renderer
//!
//! # Usage
//!
//! ```bash
//! # Default rounded modules on the gradient scheme, all three formats
//! qrforge "https://example.com"
//!
//! # Dots on the forest scheme with a modern frame, PNG only
//! qrforge "https://example.com" --style dots --scheme forest --frame modern --format png
//!
//! # Start from a config file and override the size
//! qrforge --config qr.toml --size 600 --out-dir out
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrforge::config::LogoFile;
use qrforge::helper::print_qr;
use qrforge::{
    ColorScheme, ColorSchemeId, ConfigFile, Effect, ExportFormat, FillPattern, FrameKind,
    LogoShape, ModuleMatrix, ModuleStyle, Rgb,
};

/// qrforge - render styled QR codes to SVG, PNG and JPEG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text or URL to encode
    payload: Option<String>,

    /// TOML or JSON file with render settings; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Module shape: squares, rounded, dots, diamond, hexagon
    #[arg(long)]
    style: Option<String>,

    /// Color scheme: gradient, ocean, sunset, forest, purple, neon, rainbow,
    /// monochrome, pastel, custom
    #[arg(long)]
    scheme: Option<String>,

    /// Custom primary color (#rrggbb)
    #[arg(long)]
    primary: Option<Rgb>,

    /// Custom secondary color (#rrggbb)
    #[arg(long)]
    secondary: Option<Rgb>,

    /// Custom background color (#rrggbb)
    #[arg(long)]
    background: Option<Rgb>,

    /// Module fill: gradient or flat
    #[arg(long)]
    pattern: Option<String>,

    /// Module effect: none, shadow, glow, outline
    #[arg(long)]
    effect: Option<String>,

    /// Frame: none, simple, rounded, circle, modern, shadow
    #[arg(long)]
    frame: Option<String>,

    /// Frame label
    #[arg(long)]
    frame_text: Option<String>,

    /// Canvas size in pixels (200-800)
    #[arg(long)]
    size: Option<u32>,

    /// Quiet zone (0-50)
    #[arg(long)]
    margin: Option<u32>,

    /// Per-module rotation in degrees (0-360)
    #[arg(long)]
    rotation: Option<f32>,

    /// Module opacity in percent (10-100)
    #[arg(long)]
    opacity: Option<u8>,

    /// Logo image to place in the center
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo size as a percentage of the code (10-30)
    #[arg(long)]
    logo_size: Option<u8>,

    /// Logo clipping: square, circle, rounded
    #[arg(long)]
    logo_shape: Option<String>,

    /// Output format; repeat for several. Defaults to svg, png and jpg
    #[arg(short, long = "format")]
    formats: Vec<ExportFormat>,

    /// Directory the files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the matrix to the console
    #[arg(long)]
    preview: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// The settings given on the command line, as a config layer.
    fn overrides(&self) -> anyhow::Result<ConfigFile> {
        let colors = if self.primary.is_some() || self.secondary.is_some() || self.background.is_some() {
            let base = ColorScheme::default();
            Some(ColorScheme {
                primary: self.primary.unwrap_or(base.primary),
                secondary: self.secondary.unwrap_or(base.secondary),
                background: self.background.unwrap_or(base.background),
            })
        } else {
            None
        };
        let logo = if self.logo.is_some() || self.logo_size.is_some() || self.logo_shape.is_some() {
            let path = match &self.logo {
                Some(path) if path.is_relative() => Some(
                    std::env::current_dir()
                        .context("Failed to resolve the working directory")?
                        .join(path),
                ),
                other => other.clone(),
            };
            Some(LogoFile {
                path,
                size: self.logo_size,
                shape: self.logo_shape.as_deref().map(LogoShape::from_id),
            })
        } else {
            None
        };
        // Custom colors without an explicit scheme mean the custom scheme.
        let scheme = match (&self.scheme, &colors) {
            (Some(id), _) => Some(ColorSchemeId::from_id(id)),
            (None, Some(_)) => Some(ColorSchemeId::Custom),
            (None, None) => None,
        };
        Ok(ConfigFile {
            payload: self.payload.clone(),
            style: self.style.as_deref().map(ModuleStyle::from_id),
            pattern: self.pattern.as_deref().map(FillPattern::from_id),
            scheme,
            colors,
            effect: self.effect.as_deref().map(Effect::from_id),
            frame: self.frame.as_deref().map(FrameKind::from_id),
            frame_text: self.frame_text.clone(),
            size: self.size,
            margin: self.margin,
            rotation: self.rotation,
            opacity: self.opacity,
            logo,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (file, base_dir) = match &args.config {
        Some(path) => {
            let file = ConfigFile::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (file, base_dir)
        }
        None => (ConfigFile::default(), PathBuf::new()),
    };
    let config = file
        .merge(args.overrides()?)
        .into_render_config(&base_dir)
        .context("Failed to build render settings")?;

    if args.preview {
        let matrix = ModuleMatrix::encode(&config.payload).context("Failed to encode payload")?;
        print_qr(&matrix);
    }

    let formats = if args.formats.is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        args.formats.clone()
    };

    let mut written = 0;
    for format in formats {
        // A failed export produces no file; the others still go out.
        match qrforge::export(&config, format).and_then(|artifact| artifact.write_to(&args.out_dir)) {
            Ok(_) => written += 1,
            Err(err) => warn!(%format, %err, "export failed"),
        }
    }

    if written == 0 {
        anyhow::bail!("no files were written");
    }
    Ok(())
}
