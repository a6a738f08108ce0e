//! Decorative frames drawn around the matrix, each with a bottom label.

use crate::canvas::Canvas;
use crate::color::{ColorScheme, Rgb};
use crate::geometry::{label_hexagon_points, octagon_points, Outline, Point, Rect};
use crate::paint::{DrawStyle, Fill, GradientStop, Label, LabelFont, LinearGradient, Shadow, Stroke};
use crate::style::FrameKind;

const TEXT_PADDING: f32 = 12.0;
const FONT_SIZE: f32 = 16.0;

/// Approximate advance width of `text` in a bold face at `size` pixels.
///
/// Both canvases place label plates from this value, so it only has to be
/// stable, not exact for any particular font.
pub fn measure_text(text: &str, font: LabelFont, size: f32) -> f32 {
    let em: f32 = match font {
        LabelFont::Mono => text.chars().count() as f32 * 0.6,
        LabelFont::Sans => text.chars().map(sans_advance).sum(),
    };
    em * size
}

fn sans_advance(c: char) -> f32 {
    match c {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | '-' | '(' | ')' => 0.36,
        'm' | 'w' => 0.89,
        'M' | 'W' => 0.86,
        'A'..='Z' => 0.72,
        'a'..='z' | '0'..='9' => 0.56,
        _ => 0.62,
    }
}

/// Draws `kind` around a canvas of side `canvas_size`. Does nothing for
/// [`FrameKind::None`].
pub fn draw_frame<C: Canvas + ?Sized>(
    canvas: &mut C,
    canvas_size: u32,
    colors: &ColorScheme,
    text: &str,
    kind: FrameKind,
) {
    let size = canvas_size as f32;
    match kind {
        FrameKind::None => {}
        FrameKind::Simple => simple(canvas, size, colors, text),
        FrameKind::Rounded => rounded(canvas, size, colors, text),
        FrameKind::Circle => octagon(canvas, size, colors, text),
        FrameKind::Modern => modern(canvas, size, colors, text),
        FrameKind::Shadow => shadowed(canvas, size, colors, text),
    }
}

fn inset(size: f32, margin: f32) -> Rect {
    Rect::new(margin, margin, size - margin * 2.0, size - margin * 2.0)
}

fn label(text: &str, size: f32, baseline: f32, font: LabelFont, color: Rgb) -> Label {
    Label {
        text: text.to_string(),
        center_x: size / 2.0,
        baseline,
        font,
        size: FONT_SIZE,
        color,
    }
}

fn plate_width(text: &str, font: LabelFont) -> f32 {
    measure_text(text, font, FONT_SIZE) + TEXT_PADDING * 2.0
}

fn simple<C: Canvas + ?Sized>(canvas: &mut C, size: f32, colors: &ColorScheme, text: &str) {
    let margin = 15.0;
    let accent = 20.0;
    let plain = DrawStyle::default();
    canvas.stroke(
        &Outline::Rect(inset(size, margin)),
        &Stroke::solid(colors.primary, 4.0),
        &plain,
    );

    let (near, far) = (margin, size - margin);
    let corners = [
        [(near, near + accent), (near, near), (near + accent, near)],
        [(far - accent, near), (far, near), (far, near + accent)],
        [(near, far - accent), (near, far), (near + accent, far)],
        [(far - accent, far), (far, far), (far, far - accent)],
    ];
    let accent_stroke = Stroke::solid(colors.primary, 3.0);
    for corner in corners {
        let points = corner.iter().map(|&(x, y)| Point::new(x, y)).collect();
        canvas.stroke(&Outline::Polyline(points), &accent_stroke, &plain);
    }

    let width = plate_width(text, LabelFont::Sans);
    let text_y = size - 30.0;
    let plate = Rect::new(size / 2.0 - width / 2.0, text_y - 15.0, width, 25.0);
    let gradient = LinearGradient::between(
        Point::new(plate.x, plate.y),
        Point::new(plate.right(), text_y + 5.0),
        colors.primary,
        colors.secondary,
    );
    canvas.fill(&Outline::Rect(plate), &gradient.into(), &plain);
    canvas.text(&label(text, size, text_y - 2.0, LabelFont::Sans, colors.background));
}

/// The rounded pill used by the rounded and shadow frames.
fn pill_label<C: Canvas + ?Sized>(
    canvas: &mut C,
    size: f32,
    colors: &ColorScheme,
    text: &str,
    radius: f32,
) {
    let width = plate_width(text, LabelFont::Sans);
    let text_y = size - 30.0;
    let pill = Rect::new(size / 2.0 - width / 2.0, text_y - 12.0, width, 20.0);
    canvas.fill(
        &Outline::round_rect(pill, radius),
        &Fill::Solid(colors.primary),
        &DrawStyle::default(),
    );
    canvas.text(&label(text, size, text_y - 3.0, LabelFont::Sans, colors.background));
}

fn rounded<C: Canvas + ?Sized>(canvas: &mut C, size: f32, colors: &ColorScheme, text: &str) {
    canvas.stroke(
        &Outline::round_rect(inset(size, 15.0), 15.0),
        &Stroke::solid(colors.primary, 5.0),
        &DrawStyle::default(),
    );
    pill_label(canvas, size, colors, text, 10.0);
}

fn octagon<C: Canvas + ?Sized>(canvas: &mut C, size: f32, colors: &ColorScheme, text: &str) {
    let margin = 20.0;
    let cut = 25.0;
    let plain = DrawStyle::default();
    canvas.stroke(
        &Outline::Polygon(octagon_points(inset(size, margin), cut)),
        &Stroke::solid(colors.primary, 5.0),
        &plain,
    );

    let (near, far) = (margin + cut / 2.0, size - margin - cut / 2.0);
    for (x, y) in [(near, near), (far, near), (near, far), (far, far)] {
        let dot = Outline::Circle {
            center: Point::new(x, y),
            radius: 4.0,
        };
        canvas.fill(&dot, &Fill::Solid(colors.primary), &plain);
    }

    let width = plate_width(text, LabelFont::Sans);
    let text_y = size - 30.0;
    let plate = Rect::new(size / 2.0 - width / 2.0, text_y - 12.0, width, 20.0);
    canvas.fill(&Outline::Rect(plate), &Fill::Solid(colors.primary), &plain);
    canvas.text(&label(text, size, text_y - 3.0, LabelFont::Sans, colors.background));
}

fn modern<C: Canvas + ?Sized>(canvas: &mut C, size: f32, colors: &ColorScheme, text: &str) {
    let margin = 20.0;
    let corner = 15.0;
    let plain = DrawStyle::default();
    let gradient = Fill::Linear(LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(size, 0.0),
        stops: vec![
            GradientStop::new(0.0, colors.primary),
            GradientStop::new(0.3, colors.secondary),
            GradientStop::new(0.7, colors.primary),
            GradientStop::new(1.0, colors.secondary),
        ],
    });

    canvas.stroke(
        &Outline::Rect(inset(size, margin)),
        &Stroke {
            paint: gradient.clone(),
            width: 4.0,
            dash: Some(vec![15.0, 8.0, 5.0, 8.0]),
        },
        &plain,
    );

    let (near, far) = (margin, size - margin);
    let triangles = [
        [(near, near), (near + corner, near), (near, near + corner)],
        [(far, near), (far - corner, near), (far, near + corner)],
        [(near, far), (near + corner, far), (near, far - corner)],
        [(far, far), (far - corner, far), (far, far - corner)],
    ];
    for triangle in triangles {
        let points = triangle.iter().map(|&(x, y)| Point::new(x, y)).collect();
        canvas.fill(&Outline::Polygon(points), &gradient, &plain);
    }

    let width = plate_width(text, LabelFont::Mono);
    let text_y = size - 25.0;
    let plate = label_hexagon_points(Point::new(size / 2.0, text_y), width, 22.0, 8.0);
    canvas.fill(&Outline::Polygon(plate), &gradient, &plain);
    canvas.text(&label(text, size, text_y + 1.0, LabelFont::Mono, colors.background));
}

fn shadowed<C: Canvas + ?Sized>(canvas: &mut C, size: f32, colors: &ColorScheme, text: &str) {
    let shadow = Shadow {
        color: Rgb::BLACK,
        alpha: 0.2,
        blur: 8.0,
        offset: Point::new(3.0, 3.0),
    };
    canvas.stroke(
        &Outline::round_rect(inset(size, 20.0), 10.0),
        &Stroke::solid(colors.primary, 5.0),
        &DrawStyle::with_shadow(shadow),
    );
    pill_label(canvas, size, colors, text, 8.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::LogoImage;

    #[derive(Default)]
    struct Recorder {
        fills: Vec<(Outline, Fill, DrawStyle)>,
        strokes: Vec<(Outline, Stroke, DrawStyle)>,
        labels: Vec<Label>,
    }

    impl Canvas for Recorder {
        fn size(&self) -> u32 {
            480
        }
        fn clear(&mut self, _color: Rgb) {}
        fn fill(&mut self, outline: &Outline, fill: &Fill, style: &DrawStyle) {
            self.fills.push((outline.clone(), fill.clone(), *style));
        }
        fn stroke(&mut self, outline: &Outline, stroke: &Stroke, style: &DrawStyle) {
            self.strokes.push((outline.clone(), stroke.clone(), *style));
        }
        fn text(&mut self, label: &Label) {
            self.labels.push(label.clone());
        }
        fn image(&mut self, _image: &LogoImage, _target: Rect, _clip: &Outline) {}
    }

    fn draw(kind: FrameKind) -> Recorder {
        let mut canvas = Recorder::default();
        draw_frame(&mut canvas, 480, &ColorScheme::default(), "SCAN ME", kind);
        canvas
    }

    #[test]
    fn test_none_draws_nothing() {
        let canvas = draw(FrameKind::None);
        assert!(canvas.fills.is_empty() && canvas.strokes.is_empty() && canvas.labels.is_empty());
    }

    #[test]
    fn test_every_frame_has_centered_label() {
        for &kind in FrameKind::ALL.iter().filter(|k| !k.is_none()) {
            let canvas = draw(kind);
            assert_eq!(canvas.labels.len(), 1, "{}", kind.id());
            let label = &canvas.labels[0];
            assert_eq!(label.center_x, 240.0);
            assert!(label.baseline > 480.0 - 40.0, "{}", kind.id());
            assert_eq!(label.text, "SCAN ME");
        }
    }

    #[test]
    fn test_simple_frame_parts() {
        let canvas = draw(FrameKind::Simple);
        assert_eq!(canvas.strokes.len(), 5);
        assert_eq!(canvas.strokes[0].0, Outline::Rect(Rect::new(15.0, 15.0, 450.0, 450.0)));
        assert!(matches!(canvas.fills[0].1, Fill::Linear(_)));
    }

    #[test]
    fn test_modern_frame_is_dashed_with_hexagon_plate() {
        let canvas = draw(FrameKind::Modern);
        let (_, stroke, _) = &canvas.strokes[0];
        assert_eq!(stroke.dash.as_deref(), Some(&[15.0, 8.0, 5.0, 8.0][..]));
        let (plate, _, _) = canvas.fills.last().unwrap();
        let Outline::Polygon(points) = plate else {
            panic!("plate should be a polygon");
        };
        assert_eq!(points.len(), 6);
        let bounds = plate.bounds();
        let expected = measure_text("SCAN ME", LabelFont::Mono, FONT_SIZE) + 24.0;
        assert!((bounds.width - expected).abs() < 1e-3);
        assert!((bounds.center().x - 240.0).abs() < 1e-3);
        assert_eq!(canvas.labels[0].font, LabelFont::Mono);
    }

    #[test]
    fn test_circle_frame_is_octagon_with_dots() {
        let canvas = draw(FrameKind::Circle);
        assert!(matches!(&canvas.strokes[0].0, Outline::Polygon(p) if p.len() == 8));
        let dots = canvas
            .fills
            .iter()
            .filter(|(o, _, _)| matches!(o, Outline::Circle { .. }))
            .count();
        assert_eq!(dots, 4);
    }

    #[test]
    fn test_shadow_frame_casts_shadow() {
        let canvas = draw(FrameKind::Shadow);
        let shadow = canvas.strokes[0].2.shadow.unwrap();
        assert_eq!(shadow.offset, Point::new(3.0, 3.0));
        assert!(canvas.fills.iter().all(|(_, _, style)| style.shadow.is_none()));
    }

    #[test]
    fn test_measure_text_scales() {
        let narrow = measure_text("ii", LabelFont::Sans, 16.0);
        let wide = measure_text("MM", LabelFont::Sans, 16.0);
        assert!(narrow < wide);
        assert!((measure_text("abc", LabelFont::Mono, 10.0) - 18.0).abs() < 1e-3);
        assert_eq!(measure_text("", LabelFont::Sans, 16.0), 0.0);
    }
}
