use std::sync::Arc;

use image::{Rgba, RgbaImage};
use qrforge::layout::Layout;
use qrforge::logo::logo_placement;
use qrforge::{
    export, render_image, render_svg, ColorSchemeId, Effect, ExportFormat, FrameKind,
    LogoSettings, LogoShape, ModuleMatrix, ModuleStyle, QrError, RenderConfig, Rgb,
};

const STYLES: &[ModuleStyle] = &[
    ModuleStyle::Squares,
    ModuleStyle::Rounded,
    ModuleStyle::Dots,
    ModuleStyle::Diamond,
    ModuleStyle::Hexagon,
];

fn red_logo() -> Vec<u8> {
    let mut png = std::io::Cursor::new(Vec::new());
    RgbaImage::from_pixel(32, 32, Rgba([220, 20, 20, 255]))
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    png.into_inner()
}

#[test]
fn canvas_size_follows_frame_reservation() {
    let matrix = ModuleMatrix::encode("https://example.com").unwrap();
    let n = matrix.size() as u32;
    let module_size = 400 / (n + 2);
    let frameless = (n + 4) * module_size;

    for &style in STYLES {
        for &frame in FrameKind::ALL {
            let mut config = RenderConfig::new("https://example.com");
            config.style = style;
            config.frame = frame;
            let img = render_image(&config).unwrap();
            let expected = if frame.is_none() { frameless } else { frameless + 80 };
            assert_eq!(img.dimensions(), (expected, expected), "{style:?} {frame:?}");
        }
    }
}

#[test]
fn svg_and_raster_share_dimensions() {
    let mut config = RenderConfig::new("same layout");
    config.size = 500;
    config.frame = FrameKind::Circle;
    let side = render_image(&config).unwrap().width();
    let svg = render_svg(&config).unwrap();
    assert!(svg.contains(&format!("width=\"{side}\" height=\"{side}\"")));
}

#[test]
fn rendering_is_deterministic() {
    let mut config = RenderConfig::new("deterministic");
    config.style = ModuleStyle::Hexagon;
    config.effect = Effect::Glow;
    config.rotation = 30.0;
    config.frame = FrameKind::Shadow;
    assert_eq!(render_image(&config).unwrap(), render_image(&config).unwrap());
    assert_eq!(render_svg(&config).unwrap(), render_svg(&config).unwrap());
}

#[test]
fn forest_dots_fill_background() {
    let mut config = RenderConfig::new("https://example.com");
    config.style = ModuleStyle::Dots;
    config.scheme = ColorSchemeId::Forest;
    config.size = 400;
    config.margin = 20;
    let img = render_image(&config).unwrap();
    let matrix = ModuleMatrix::encode(&config.payload).unwrap();
    let layout = Layout::compute(matrix.size(), 400, 20, FrameKind::None).unwrap();
    let (width, height) = img.dimensions();
    assert_eq!((width, height), (layout.canvas_size, layout.canvas_size));
    assert_eq!(img.get_pixel(0, 0).0, [0xF0, 0xFD, 0xF4, 0xFF]);
    assert_eq!(img.get_pixel(width - 1, height - 1).0, [0xF0, 0xFD, 0xF4, 0xFF]);
}

#[test]
fn rainbow_modules_get_their_own_hues() {
    let mut config = RenderConfig::new("rainbow");
    config.scheme = ColorSchemeId::Rainbow;
    let svg = render_svg(&config).unwrap();
    let (first, second) = qrforge::color::rainbow_pair(0, 0);
    assert!(svg.contains(&first.to_hex()));
    assert!(svg.contains(&second.to_hex()));
    assert!(svg.matches("<linearGradient").count() > 1);
}

#[test]
fn opacity_applies_to_modules_only() {
    let mut config = RenderConfig::new("opacity");
    config.opacity = 50;
    config.frame = FrameKind::Simple;
    let svg = render_svg(&config).unwrap();
    let matrix = ModuleMatrix::encode("opacity").unwrap();
    assert_eq!(svg.matches("opacity=\"0.5\"").count(), matrix.dark_count());
}

#[test]
fn modern_frame_has_dashed_plate_and_label() {
    let mut config = RenderConfig::new("https://example.com");
    config.frame = FrameKind::Modern;
    config.frame_text = "SCAN ME".to_string();
    let svg = render_svg(&config).unwrap();
    assert!(svg.contains("stroke-dasharray=\"15 8 5 8\""));
    assert!(svg.contains("<polygon"));
    assert!(svg.contains(">SCAN ME</text>"));
}

#[test]
fn frame_label_is_escaped() {
    let mut config = RenderConfig::new("escape");
    config.frame = FrameKind::Simple;
    config.frame_text = "A & <B>".to_string();
    let svg = render_svg(&config).unwrap();
    assert!(svg.contains(">A &amp; &lt;B&gt;</text>"));
}

#[test]
fn circular_logo_is_clipped_on_its_plate() {
    let mut config = RenderConfig::new("https://example.com/logo");
    config.scheme = ColorSchemeId::Ocean;
    config.logo = Some(LogoSettings::new(red_logo()).with_size(30).with_shape(LogoShape::Circle));
    let img = render_image(&config).unwrap();

    let matrix = ModuleMatrix::encode(&config.payload).unwrap();
    let layout = Layout::compute(matrix.size(), 400, 20, FrameKind::None).unwrap();
    let settings = config.logo.as_ref().unwrap();
    let placement = logo_placement(&layout, layout.canvas_size, settings);
    let center = placement.target.center();
    let radius = placement.target.width / 2.0;

    let [r, g, b, _] = img.get_pixel(center.x as u32, center.y as u32).0;
    assert!(r > 200 && g < 40 && b < 40, "center was {r},{g},{b}");

    let ring = img.get_pixel((center.x - radius - 3.0) as u32, center.y as u32).0;
    assert_eq!(ring, [0xF0, 0xF9, 0xFF, 0xFF]);

    let svg = render_svg(&config).unwrap();
    assert!(svg.contains("data:image/png;base64,"));
    assert!(svg.contains("<clipPath"));
}

#[test]
fn broken_logo_is_skipped() {
    let mut config = RenderConfig::new("broken");
    config.logo = Some(LogoSettings::new(Arc::<[u8]>::from(&b"nope"[..])));
    let with_logo = render_image(&config).unwrap();
    config.logo = None;
    assert_eq!(with_logo, render_image(&config).unwrap());
}

#[test]
fn custom_scheme_uses_caller_colors() {
    let mut config = RenderConfig::new("custom");
    config.scheme = ColorSchemeId::Custom;
    config.custom_colors.background = Rgb::new(0x12, 0x34, 0x56);
    let img = render_image(&config).unwrap();
    assert_eq!(img.get_pixel(1, 1).0, [0x12, 0x34, 0x56, 0xFF]);
}

#[test]
fn empty_payload_is_rejected() {
    assert!(matches!(render_image(&RenderConfig::new("")), Err(QrError::EmptyPayload)));
    assert!(matches!(
        export(&RenderConfig::new(" "), ExportFormat::Svg),
        Err(QrError::EmptyPayload)
    ));
}

#[test]
fn oversized_payload_fails_to_encode() {
    let payload = "x".repeat(5000);
    assert!(matches!(
        render_image(&RenderConfig::new(payload)),
        Err(QrError::Encoding(_))
    ));
}

fn rasterize_svg(svg: &str) -> Vec<u8> {
    let tree = resvg::usvg::Tree::from_str(svg, &resvg::usvg::Options::default()).unwrap();
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height()).unwrap();
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    pixmap.data().to_vec()
}

fn mean_difference(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let total: u64 = a.iter().zip(b).map(|(x, y)| u64::from(x.abs_diff(*y))).sum();
    total as f64 / a.len() as f64
}

#[test]
fn svg_matches_raster_for_every_style_and_effect() {
    for &style in STYLES {
        for effect in [Effect::None, Effect::Shadow, Effect::Glow] {
            let mut config = RenderConfig::new("https://example.com");
            config.style = style;
            config.effect = effect;
            config.rotation = 30.0;
            config.opacity = 60;

            let raster = render_image(&config).unwrap();
            let vector = rasterize_svg(&render_svg(&config).unwrap());
            let diff = mean_difference(raster.as_raw(), &vector);
            assert!(diff < 4.0, "{style:?} {effect:?}: mean difference {diff:.2}");
        }
    }
}

#[test]
fn svg_matches_raster_for_rainbow_shadow() {
    let mut config = RenderConfig::new("rainbow shadow");
    config.style = ModuleStyle::Squares;
    config.scheme = ColorSchemeId::Rainbow;
    config.effect = Effect::Shadow;
    config.opacity = 60;
    let raster = render_image(&config).unwrap();
    let vector = rasterize_svg(&render_svg(&config).unwrap());
    let diff = mean_difference(raster.as_raw(), &vector);
    assert!(diff < 4.0, "mean difference {diff:.2}");
}
