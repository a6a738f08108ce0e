//! The user-selectable rendering options, each a closed set of named
//! variants. Every option parses leniently: an unknown name logs a warning and
//! falls back to the option's documented default instead of failing.

use serde::{Deserialize, Serialize};
use tracing::warn;

macro_rules! named_options {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $($variant:ident => $id:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            /// Parses an option name, falling back for unknown names.
            pub fn from_id(id: &str) -> Self {
                let wanted = id.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.id() == wanted)
                    .unwrap_or_else(|| {
                        warn!(
                            option = stringify!($name),
                            value = %wanted,
                            fallback = $name::$fallback.id(),
                            "unknown option value"
                        );
                        $name::$fallback
                    })
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from_id(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.id().to_string()
            }
        }
    };
}

named_options! {
    /// The shape every dark module is drawn as. Unknown names draw squares.
    ModuleStyle, fallback = Squares {
        Squares => "squares",
        Rounded => "rounded",
        Dots => "dots",
        Diamond => "diamond",
        Hexagon => "hexagon",
    }
}

impl Default for ModuleStyle {
    fn default() -> Self {
        ModuleStyle::Rounded
    }
}

named_options! {
    /// How a module is filled. `gradient` runs a diagonal primary→secondary
    /// gradient across each module (or the rainbow hue sweep); `flat` uses
    /// the primary color alone.
    FillPattern, fallback = Gradient {
        Gradient => "gradient",
        Flat => "flat",
    }
}

impl Default for FillPattern {
    fn default() -> Self {
        FillPattern::Gradient
    }
}

named_options! {
    /// Per-module visual effect. Only `shadow` and `glow` draw anything
    /// extra; `outline` renders like `none`.
    Effect, fallback = None {
        None => "none",
        Shadow => "shadow",
        Glow => "glow",
        Outline => "outline",
    }
}

impl Default for Effect {
    fn default() -> Self {
        Effect::None
    }
}

named_options! {
    /// Decorative frame drawn around the matrix.
    FrameKind, fallback = None {
        None => "none",
        Simple => "simple",
        Rounded => "rounded",
        Circle => "circle",
        Modern => "modern",
        Shadow => "shadow",
    }
}

impl Default for FrameKind {
    fn default() -> Self {
        FrameKind::None
    }
}

impl FrameKind {
    pub fn is_none(self) -> bool {
        self == FrameKind::None
    }
}

named_options! {
    /// Clip shape of the logo and its background plate.
    LogoShape, fallback = Square {
        Square => "square",
        Circle => "circle",
        Rounded => "rounded",
    }
}

impl Default for LogoShape {
    fn default() -> Self {
        LogoShape::Rounded
    }
}
