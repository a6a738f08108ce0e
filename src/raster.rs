//! Pixel rendering onto a `tiny-skia` pixmap.

use std::sync::{Arc, OnceLock};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    self, Color, ColorU8, FillRule, IntSize, LineJoin, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, Shader, SpreadMode, StrokeDash, Transform,
};
use resvg::usvg::{self, fontdb};
use tracing::warn;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::error::{QrError, Result};
use crate::geometry::{Outline, Point, Rect};
use crate::logo::LogoImage;
use crate::paint::{DrawStyle, Fill, Label, Placement, Shadow, Stroke};
use crate::svg;

/// A square RGBA raster surface.
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// Allocates a transparent `size`×`size` surface.
    pub fn new(size: u32) -> Result<Self> {
        Pixmap::new(size, size)
            .map(|pixmap| Self { pixmap })
            .ok_or(QrError::Surface {
                width: size,
                height: size,
            })
    }

    /// The straight (non-premultiplied) RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    /// Draws a blurred, offset silhouette of `path` underneath where it will
    /// be painted. The silhouette is rendered on a scratch layer that only
    /// covers the path, so nothing else on the surface is blurred.
    fn cast_shadow(
        &mut self,
        path: &tiny_skia::Path,
        stroke: Option<&tiny_skia::Stroke>,
        transform: Transform,
        shadow: &Shadow,
        opacity: f32,
    ) {
        let sigma = shadow.sigma();
        let pad = (sigma * 3.0).ceil() + stroke.map_or(0.0, |s| s.width) + 2.0;
        let Some(device) = path.clone().transform(transform) else {
            return;
        };
        let bounds = device.bounds();
        let left = (bounds.left() - pad).floor();
        let top = (bounds.top() - pad).floor();
        let width = (bounds.width() + pad * 2.0).ceil() as u32 + 1;
        let height = (bounds.height() + pad * 2.0).ceil() as u32 + 1;
        let Some(mut layer) = Pixmap::new(width, height) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color(shadow.color, shadow.alpha * opacity));
        paint.anti_alias = true;
        let local = transform.post_translate(-left, -top);
        match stroke {
            Some(stroke) => layer.stroke_path(path, &paint, stroke, local, None),
            None => layer.fill_path(path, &paint, FillRule::Winding, local, None),
        }

        let layer = blur(layer, sigma);
        self.pixmap.draw_pixmap(
            (left + shadow.offset.x).round() as i32,
            (top + shadow.offset.y).round() as i32,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

impl Canvas for RasterSurface {
    fn size(&self) -> u32 {
        self.pixmap.width()
    }

    fn clear(&mut self, background: Rgb) {
        self.pixmap.fill(color(background, 1.0));
    }

    fn fill(&mut self, outline: &Outline, fill: &Fill, style: &DrawStyle) {
        let Some(path) = to_path(outline) else {
            return;
        };
        let transform = to_transform(&style.placement);
        if let Some(shadow) = &style.shadow {
            self.cast_shadow(&path, None, transform, shadow, style.opacity);
        }
        let paint = paint(fill, style.opacity);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    fn stroke(&mut self, outline: &Outline, stroke: &Stroke, style: &DrawStyle) {
        let Some(path) = to_path(outline) else {
            return;
        };
        let transform = to_transform(&style.placement);
        let sk_stroke = tiny_skia::Stroke {
            width: stroke.width,
            miter_limit: 10.0,
            line_join: LineJoin::Miter,
            dash: stroke
                .dash
                .as_ref()
                .and_then(|dash| StrokeDash::new(dash.clone(), 0.0)),
            ..tiny_skia::Stroke::default()
        };
        if let Some(shadow) = &style.shadow {
            self.cast_shadow(&path, Some(&sk_stroke), transform, shadow, style.opacity);
        }
        let paint = paint(&stroke.paint, style.opacity);
        self.pixmap
            .stroke_path(&path, &paint, &sk_stroke, transform, None);
    }

    /// Labels go through the same `<text>` markup the SVG output uses, laid
    /// out by `usvg` with the system fonts.
    fn text(&mut self, label: &Label) {
        if label.text.trim().is_empty() {
            return;
        }
        let size = self.size();
        let markup = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}">{}</svg>"#,
            svg::text_element(label)
        );
        let mut options = usvg::Options::default();
        options.fontdb = system_fonts();
        match usvg::Tree::from_str(&markup, &options) {
            Ok(tree) => resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut()),
            Err(err) => warn!(%err, text = %label.text, "failed to lay out label"),
        }
    }

    fn image(&mut self, image: &LogoImage, target: Rect, clip: &Outline) {
        let width = target.width.round() as u32;
        let height = target.height.round() as u32;
        if width == 0 || height == 0 {
            return;
        }
        let scaled = imageops::resize(image.pixels(), width, height, FilterType::Triangle);
        let Some(logo) = premultiplied(&scaled) else {
            return;
        };
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        if let Some(path) = to_path(clip) {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }
        self.pixmap.draw_pixmap(
            target.x.round() as i32,
            target.y.round() as i32,
            logo.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            Some(&mask),
        );
    }
}

fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            checked_fonts(db)
        })
        .clone()
}

/// Runs once per process. Without any face, labels rasterize to nothing.
fn checked_fonts(db: fontdb::Database) -> Arc<fontdb::Database> {
    if db.len() == 0 {
        warn!("no system fonts found; frame labels will be missing from raster output");
    }
    Arc::new(db)
}

fn color(rgb: Rgb, alpha: f32) -> Color {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, alpha)
}

fn sk_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x, p.y)
}

fn paint(fill: &Fill, opacity: f32) -> Paint<'static> {
    let shader = match fill {
        Fill::Solid(rgb) => Shader::SolidColor(color(*rgb, opacity)),
        Fill::Linear(gradient) => {
            let stops = gradient
                .stops
                .iter()
                .map(|stop| tiny_skia::GradientStop::new(stop.offset, color(stop.color, opacity)))
                .collect();
            tiny_skia::LinearGradient::new(
                sk_point(gradient.start),
                sk_point(gradient.end),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or_else(|| {
                let first = gradient.stops.first().map_or(Rgb::BLACK, |stop| stop.color);
                Shader::SolidColor(color(first, opacity))
            })
        }
    };
    Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    }
}

fn to_transform(placement: &Placement) -> Transform {
    let base = Transform::from_translate(placement.origin.x, placement.origin.y);
    if placement.is_rotated() {
        base.pre_concat(Transform::from_rotate_at(
            placement.rotation,
            placement.pivot.x,
            placement.pivot.y,
        ))
    } else {
        base
    }
}

fn to_path(outline: &Outline) -> Option<tiny_skia::Path> {
    if outline.is_degenerate() {
        return None;
    }
    match outline {
        Outline::Rect(rect) => {
            tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
                .map(PathBuilder::from_rect)
        }
        Outline::RoundRect { rect, radius } => round_rect_path(rect, *radius),
        Outline::Circle { center, radius } => PathBuilder::from_circle(center.x, center.y, *radius),
        Outline::Polygon(points) => points_path(points, true),
        Outline::Polyline(points) => points_path(points, false),
    }
}

fn points_path(points: &[Point], closed: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn round_rect_path(rect: &Rect, radius: f32) -> Option<tiny_skia::Path> {
    if radius <= 0.0 {
        return tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
            .map(PathBuilder::from_rect);
    }
    // Cubic approximation of a quarter circle.
    let k = 0.552_284_8 * radius;
    let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(l + radius, t);
    pb.line_to(r - radius, t);
    pb.cubic_to(r - radius + k, t, r, t + radius - k, r, t + radius);
    pb.line_to(r, b - radius);
    pb.cubic_to(r, b - radius + k, r - radius + k, b, r - radius, b);
    pb.line_to(l + radius, b);
    pb.cubic_to(l + radius - k, b, l, b - radius + k, l, b - radius);
    pb.line_to(l, t + radius);
    pb.cubic_to(l, t + radius - k, l + radius - k, t, l + radius, t);
    pb.close();
    pb.finish()
}

fn premultiplied(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

/// Gaussian-blurs a premultiplied layer.
fn blur(layer: Pixmap, sigma: f32) -> Pixmap {
    if sigma <= 0.0 {
        return layer;
    }
    let (width, height) = (layer.width(), layer.height());
    let Some(buffer) = RgbaImage::from_raw(width, height, layer.data().to_vec()) else {
        return layer;
    };
    let mut blurred = imageops::blur(&buffer, sigma);
    // Rounding can push a color channel past its alpha, which is not a valid
    // premultiplied value.
    for px in blurred.pixels_mut() {
        let alpha = px[3];
        for channel in &mut px.0[..3] {
            *channel = (*channel).min(alpha);
        }
    }
    IntSize::from_wh(width, height)
        .and_then(|size| Pixmap::from_vec(blurred.into_raw(), size))
        .unwrap_or(layer)
}
