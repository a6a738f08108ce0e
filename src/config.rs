//! Render parameters.
//!
//! A [`RenderConfig`] is an immutable snapshot of every user-tunable setting.
//! Callers build a new one whenever a setting changes and hand it to the
//! renderer; nothing is mutated in place. [`ConfigFile`] is the on-disk form,
//! read from TOML or JSON.
//!
//! # Example Configuration
//!
//! ```toml
//! payload = "https://example.com"
//! style = "dots"
//! scheme = "forest"
//! frame = "modern"
//! frame_text = "SCAN ME"
//! size = 400
//!
//! [logo]
//! path = "logo.png"
//! size = 24
//! shape = "circle"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::{ColorScheme, ColorSchemeId};
use crate::error::{QrError, Result};
use crate::style::{Effect, FillPattern, FrameKind, LogoShape, ModuleStyle};

pub const SIZE_RANGE: (u32, u32) = (200, 800);
pub const MARGIN_RANGE: (u32, u32) = (0, 50);
pub const ROTATION_RANGE: (f32, f32) = (0.0, 360.0);
pub const OPACITY_RANGE: (u8, u8) = (10, 100);
pub const LOGO_SIZE_RANGE: (u8, u8) = (10, 30);

pub const DEFAULT_FRAME_TEXT: &str = "SCAN ME";

/// A logo to composite over the center of the code.
#[derive(Clone, PartialEq)]
pub struct LogoSettings {
    /// Encoded image bytes (PNG, JPEG, ...). Decoded lazily at render time.
    pub data: Arc<[u8]>,
    /// Logo edge as a percentage of the matrix size, clamped to 10–30.
    pub size_percent: u8,
    pub shape: LogoShape,
}

impl LogoSettings {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            data: data.into(),
            size_percent: 18,
            shape: LogoShape::default(),
        }
    }

    pub fn with_size(mut self, percent: u8) -> Self {
        self.size_percent = clamp_logo_size(percent);
        self
    }

    pub fn with_shape(mut self, shape: LogoShape) -> Self {
        self.shape = shape;
        self
    }
}

impl fmt::Debug for LogoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoSettings")
            .field("bytes", &self.data.len())
            .field("size_percent", &self.size_percent)
            .field("shape", &self.shape)
            .finish()
    }
}

pub fn clamp_logo_size(percent: u8) -> u8 {
    percent.clamp(LOGO_SIZE_RANGE.0, LOGO_SIZE_RANGE.1)
}

/// Every parameter of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub payload: String,
    pub style: ModuleStyle,
    pub pattern: FillPattern,
    pub scheme: ColorSchemeId,
    /// Used only when `scheme` is [`ColorSchemeId::Custom`].
    pub custom_colors: ColorScheme,
    pub effect: Effect,
    pub frame: FrameKind,
    pub frame_text: String,
    /// Requested pixel size, clamped to 200–800.
    pub size: u32,
    /// Quiet-zone setting, clamped to 0–50. Ten units equal one module.
    pub margin: u32,
    /// Per-module rotation in degrees, clamped to 0–360.
    pub rotation: f32,
    /// Module opacity in percent, clamped to 10–100.
    pub opacity: u8,
    pub logo: Option<LogoSettings>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            payload: String::new(),
            style: ModuleStyle::default(),
            pattern: FillPattern::default(),
            scheme: ColorSchemeId::default(),
            custom_colors: ColorScheme::default(),
            effect: Effect::default(),
            frame: FrameKind::default(),
            frame_text: DEFAULT_FRAME_TEXT.to_string(),
            size: 400,
            margin: 20,
            rotation: 0.0,
            opacity: 100,
            logo: None,
        }
    }
}

impl RenderConfig {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with every numeric field clamped into its range.
    pub fn normalized(&self) -> Self {
        let rotation = if self.rotation.is_finite() {
            self.rotation.clamp(ROTATION_RANGE.0, ROTATION_RANGE.1)
        } else {
            0.0
        };
        Self {
            size: self.size.clamp(SIZE_RANGE.0, SIZE_RANGE.1),
            margin: self.margin.clamp(MARGIN_RANGE.0, MARGIN_RANGE.1),
            rotation,
            opacity: self.opacity.clamp(OPACITY_RANGE.0, OPACITY_RANGE.1),
            logo: self.logo.clone().map(|logo| {
                let percent = logo.size_percent;
                logo.with_size(percent)
            }),
            ..self.clone()
        }
    }

    /// The resolved color triple for this render.
    pub fn colors(&self) -> ColorScheme {
        self.scheme.resolve(&self.custom_colors)
    }
}

/// Logo section of a [`ConfigFile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoFile {
    pub path: Option<PathBuf>,
    pub size: Option<u8>,
    pub shape: Option<LogoShape>,
}

/// On-disk configuration. Every field is optional; missing fields keep the
/// [`RenderConfig`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub payload: Option<String>,
    pub style: Option<ModuleStyle>,
    pub pattern: Option<FillPattern>,
    pub scheme: Option<ColorSchemeId>,
    pub colors: Option<ColorScheme>,
    pub effect: Option<Effect>,
    pub frame: Option<FrameKind>,
    pub frame_text: Option<String>,
    pub size: Option<u32>,
    pub margin: Option<u32>,
    pub rotation: Option<f32>,
    pub opacity: Option<u8>,
    pub logo: Option<LogoFile>,
}

impl ConfigFile {
    /// Reads a `.toml` or `.json` file; the extension picks the format.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("toml") => Self::from_toml(&text),
            other => Err(QrError::Config(format!(
                "unsupported config extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| QrError::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| QrError::Config(e.to_string()))
    }

    /// Layers `other` on top of `self`: any field set in `other` wins.
    pub fn merge(self, other: ConfigFile) -> Self {
        Self {
            payload: other.payload.or(self.payload),
            style: other.style.or(self.style),
            pattern: other.pattern.or(self.pattern),
            scheme: other.scheme.or(self.scheme),
            colors: other.colors.or(self.colors),
            effect: other.effect.or(self.effect),
            frame: other.frame.or(self.frame),
            frame_text: other.frame_text.or(self.frame_text),
            size: other.size.or(self.size),
            margin: other.margin.or(self.margin),
            rotation: other.rotation.or(self.rotation),
            opacity: other.opacity.or(self.opacity),
            logo: match (self.logo, other.logo) {
                (Some(base), Some(top)) => Some(LogoFile {
                    path: top.path.or(base.path),
                    size: top.size.or(base.size),
                    shape: top.shape.or(base.shape),
                }),
                (base, top) => top.or(base),
            },
        }
    }

    /// Builds the render snapshot, reading the logo file if one is named.
    /// Relative logo paths resolve against `base_dir`.
    pub fn into_render_config(self, base_dir: &Path) -> Result<RenderConfig> {
        let defaults = RenderConfig::default();
        let logo = match self.logo {
            Some(LogoFile {
                path: Some(path), size, shape,
            }) => {
                let path = if path.is_absolute() { path } else { base_dir.join(path) };
                let data = std::fs::read(&path)?;
                let mut logo = LogoSettings::new(data);
                if let Some(size) = size {
                    logo = logo.with_size(size);
                }
                if let Some(shape) = shape {
                    logo = logo.with_shape(shape);
                }
                Some(logo)
            }
            _ => None,
        };
        let config = RenderConfig {
            payload: self.payload.unwrap_or(defaults.payload),
            style: self.style.unwrap_or(defaults.style),
            pattern: self.pattern.unwrap_or(defaults.pattern),
            scheme: self.scheme.unwrap_or(defaults.scheme),
            custom_colors: self.colors.unwrap_or(defaults.custom_colors),
            effect: self.effect.unwrap_or(defaults.effect),
            frame: self.frame.unwrap_or(defaults.frame),
            frame_text: self.frame_text.unwrap_or(defaults.frame_text),
            size: self.size.unwrap_or(defaults.size),
            margin: self.margin.unwrap_or(defaults.margin),
            rotation: self.rotation.unwrap_or(defaults.rotation),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            logo,
        };
        Ok(config.normalized())
    }
}
