//! Draws the dark modules of a matrix onto any [`Canvas`].
//!
//! The raster renderer and the SVG emitter both run through [`draw_modules`];
//! only the canvas implementation differs between them.

use tracing::debug;

use crate::canvas::Canvas;
use crate::color::{rainbow_pair, ColorScheme, ColorSchemeId};
use crate::config::RenderConfig;
use crate::geometry::Point;
use crate::layout::Layout;
use crate::matrix::ModuleMatrix;
use crate::paint::{DrawStyle, Fill, LinearGradient, Placement, Shadow};
use crate::style::{Effect, FillPattern};

impl Effect {
    /// The shadow an effect casts under each module, if any.
    pub fn shadow(self, colors: &ColorScheme) -> Option<Shadow> {
        match self {
            Effect::Shadow => Some(Shadow {
                color: colors.primary,
                alpha: 1.0,
                blur: 4.0,
                offset: Point::new(2.0, 2.0),
            }),
            Effect::Glow => Some(Shadow {
                color: colors.secondary,
                alpha: 1.0,
                blur: 8.0,
                offset: Point::new(0.0, 0.0),
            }),
            Effect::None | Effect::Outline => None,
        }
    }
}

/// Fill of module `(row, col)` in cell-local coordinates.
///
/// Gradients run diagonally across the cell from its top-left to its
/// bottom-right corner. The rainbow scheme picks its endpoint hues from the
/// module's anti-diagonal.
pub fn module_fill(
    pattern: FillPattern,
    scheme: ColorSchemeId,
    colors: &ColorScheme,
    row: usize,
    col: usize,
    module_size: f32,
) -> Fill {
    if pattern == FillPattern::Flat {
        return Fill::Solid(colors.primary);
    }
    let (from, to) = if scheme == ColorSchemeId::Rainbow {
        rainbow_pair(row, col)
    } else {
        (colors.primary, colors.secondary)
    };
    LinearGradient::between(
        Point::new(0.0, 0.0),
        Point::new(module_size, module_size),
        from,
        to,
    )
    .into()
}

/// Draws one styled shape per dark module.
///
/// Each module rotates about its own center, and its opacity and shadow
/// travel with its own draw call.
pub fn draw_modules<C: Canvas + ?Sized>(
    canvas: &mut C,
    matrix: &ModuleMatrix,
    layout: &Layout,
    config: &RenderConfig,
    colors: &ColorScheme,
) {
    let m = layout.module_size as f32;
    let outline = config.style.outline(m);
    if outline.is_degenerate() {
        debug!(style = config.style.id(), module_size = m, "module too small to draw");
        return;
    }
    let shadow = config.effect.shadow(colors);
    let opacity = f32::from(config.opacity) / 100.0;
    let center = Point::new(m / 2.0, m / 2.0);

    for (row, col) in matrix.dark_modules() {
        let placement =
            Placement::at(layout.cell_origin(row, col)).rotated(config.rotation, center);
        let style = DrawStyle {
            placement,
            opacity,
            shadow,
        };
        let fill = module_fill(config.pattern, config.scheme, colors, row, col, m);
        canvas.fill(&outline, &fill, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::geometry::{Outline, Rect};
    use crate::logo::LogoImage;
    use crate::paint::{Label, Stroke};
    use crate::style::{FrameKind, ModuleStyle};

    #[derive(Default)]
    struct Recorder {
        fills: Vec<(Outline, Fill, DrawStyle)>,
    }

    impl Canvas for Recorder {
        fn size(&self) -> u32 {
            100
        }
        fn clear(&mut self, _color: Rgb) {}
        fn fill(&mut self, outline: &Outline, fill: &Fill, style: &DrawStyle) {
            self.fills.push((outline.clone(), fill.clone(), *style));
        }
        fn stroke(&mut self, _outline: &Outline, _stroke: &Stroke, _style: &DrawStyle) {}
        fn text(&mut self, _label: &Label) {}
        fn image(&mut self, _image: &LogoImage, _target: Rect, _clip: &Outline) {}
    }

    fn checkerboard() -> ModuleMatrix {
        ModuleMatrix::from_rows(vec![
            vec![true, false, true],
            vec![false, true, false],
            vec![true, false, true],
        ])
        .unwrap()
    }

    #[test]
    fn test_one_fill_per_dark_module() {
        let matrix = checkerboard();
        let layout = Layout::compute(3, 30, 0, FrameKind::None).unwrap();
        let config = RenderConfig {
            style: ModuleStyle::Squares,
            ..RenderConfig::new("x")
        };
        let mut canvas = Recorder::default();
        draw_modules(&mut canvas, &matrix, &layout, &config, &config.colors());
        assert_eq!(canvas.fills.len(), 5);
        let (_, _, last) = canvas.fills.last().unwrap();
        assert_eq!(last.placement.origin, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_rotation_pivots_on_module_center() {
        let matrix = checkerboard();
        let layout = Layout::compute(3, 30, 0, FrameKind::None).unwrap();
        let config = RenderConfig {
            rotation: 45.0,
            ..RenderConfig::new("x")
        };
        let mut canvas = Recorder::default();
        draw_modules(&mut canvas, &matrix, &layout, &config, &config.colors());
        for (_, _, style) in &canvas.fills {
            assert_eq!(style.placement.pivot, Point::new(5.0, 5.0));
            assert_eq!(style.placement.rotation, 45.0);
        }
    }

    #[test]
    fn test_effects_map_to_shadows() {
        let colors = ColorSchemeId::Sunset.resolve(&ColorScheme::default());
        let shadow = Effect::Shadow.shadow(&colors).unwrap();
        assert_eq!(shadow.color, colors.primary);
        assert_eq!(shadow.offset, Point::new(2.0, 2.0));
        let glow = Effect::Glow.shadow(&colors).unwrap();
        assert_eq!(glow.color, colors.secondary);
        assert!(glow.blur > shadow.blur);
        assert!(Effect::Outline.shadow(&colors).is_none());
        assert!(Effect::None.shadow(&colors).is_none());
    }

    #[test]
    fn test_flat_pattern_uses_primary() {
        let colors = ColorScheme::default();
        let fill = module_fill(FillPattern::Flat, ColorSchemeId::Gradient, &colors, 0, 0, 10.0);
        assert_eq!(fill, Fill::Solid(colors.primary));
    }

    #[test]
    fn test_rainbow_fill_follows_diagonal() {
        let colors = ColorSchemeId::Rainbow.resolve(&ColorScheme::default());
        let a = module_fill(FillPattern::Gradient, ColorSchemeId::Rainbow, &colors, 1, 4, 10.0);
        let b = module_fill(FillPattern::Gradient, ColorSchemeId::Rainbow, &colors, 4, 1, 10.0);
        let c = module_fill(FillPattern::Gradient, ColorSchemeId::Rainbow, &colors, 2, 4, 10.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_opacity_is_per_module() {
        let matrix = checkerboard();
        let layout = Layout::compute(3, 30, 0, FrameKind::None).unwrap();
        let config = RenderConfig {
            opacity: 40,
            effect: Effect::Shadow,
            ..RenderConfig::new("x")
        };
        let mut canvas = Recorder::default();
        draw_modules(&mut canvas, &matrix, &layout, &config, &config.colors());
        assert!(canvas.fills.iter().all(|(_, _, s)| s.opacity == 0.4 && s.shadow.is_some()));
    }
}
