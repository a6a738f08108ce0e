//! Vector rendering into a self-contained SVG document.
//!
//! [`SvgDocument`] receives exactly the same draw calls as the raster surface
//! and writes one primitive per call. Gradients, shadow filters and clip paths
//! are defined once in `<defs>` and shared by every element that uses them.

use std::collections::HashMap;

use base64::prelude::*;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::geometry::{Outline, Point, Rect};
use crate::logo::LogoImage;
use crate::paint::{DrawStyle, Fill, Label, LinearGradient, Placement, Shadow, Stroke};

/// An SVG document under construction.
#[derive(Debug, Default)]
pub struct SvgDocument {
    size: u32,
    defs: String,
    body: String,
    def_ids: HashMap<String, String>,
    clip_count: usize,
}

impl SvgDocument {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Returns the finished document. The string always uses Unix newlines.
    pub fn finish(self) -> String {
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        result += &format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">\n",
            self.size
        );
        if !self.defs.is_empty() {
            result += "\t<defs>\n";
            result += &self.defs;
            result += "\t</defs>\n";
        }
        result += &self.body;
        result += "</svg>\n";
        result
    }

    /// Registers a definition, reusing an earlier identical one. `build`
    /// receives the id and returns the markup.
    fn define(&mut self, prefix: &str, key: String, build: impl FnOnce(&str) -> String) -> String {
        if let Some(id) = self.def_ids.get(&key) {
            return id.clone();
        }
        let id = format!("{prefix}{}", self.def_ids.len());
        self.defs += "\t\t";
        self.defs += &build(&id);
        self.defs += "\n";
        self.def_ids.insert(key, id.clone());
        id
    }

    fn gradient(&mut self, gradient: &LinearGradient) -> String {
        let mut stops = String::new();
        for stop in &gradient.stops {
            stops += &format!(
                "<stop offset=\"{}\" stop-color=\"{}\"/>",
                num(stop.offset),
                stop.color
            );
        }
        let attrs = format!(
            "gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
            num(gradient.start.x),
            num(gradient.start.y),
            num(gradient.end.x),
            num(gradient.end.y)
        );
        let key = format!("gradient {attrs} {stops}");
        self.define("g", key, |id| {
            format!("<linearGradient id=\"{id}\" {attrs}>{stops}</linearGradient>")
        })
    }

    fn paint(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid(rgb) => rgb.to_hex(),
            Fill::Linear(gradient) => format!("url(#{})", self.gradient(gradient)),
        }
    }

    fn shadow_filter(&mut self, shadow: &Shadow) -> String {
        let attrs = format!(
            "dx=\"{}\" dy=\"{}\" stdDeviation=\"{}\" flood-color=\"{}\" flood-opacity=\"{}\"",
            num(shadow.offset.x),
            num(shadow.offset.y),
            num(shadow.sigma()),
            shadow.color,
            num(shadow.alpha)
        );
        let key = format!("filter {attrs}");
        self.define("f", key, |id| {
            format!(
                "<filter id=\"{id}\" x=\"-150%\" y=\"-150%\" width=\"400%\" height=\"400%\"><feDropShadow {attrs}/></filter>"
            )
        })
    }

    /// Attributes shared by fills and strokes: transform, opacity, filter.
    /// Opacity goes on the paint, so a drop shadow sees the faded source alpha.
    fn style_attrs(&mut self, style: &DrawStyle, opacity_attr: &str) -> String {
        let mut attrs = transform_attr(&style.placement);
        if style.opacity < 1.0 {
            attrs += &format!(" {opacity_attr}=\"{}\"", num(style.opacity));
        }
        if let Some(shadow) = &style.shadow {
            attrs += &format!(" filter=\"url(#{})\"", self.shadow_filter(shadow));
        }
        attrs
    }
}

impl Canvas for SvgDocument {
    fn size(&self) -> u32 {
        self.size
    }

    fn clear(&mut self, color: Rgb) {
        self.body += &format!("\t<rect width=\"100%\" height=\"100%\" fill=\"{color}\"/>\n");
    }

    fn fill(&mut self, outline: &Outline, fill: &Fill, style: &DrawStyle) {
        if outline.is_degenerate() {
            return;
        }
        let paint = self.paint(fill);
        let attrs = self.style_attrs(style, "fill-opacity");
        self.body += &format!(
            "\t{} fill=\"{paint}\"{attrs}/>\n",
            open_element(outline)
        );
    }

    fn stroke(&mut self, outline: &Outline, stroke: &Stroke, style: &DrawStyle) {
        if outline.is_degenerate() {
            return;
        }
        let paint = self.paint(&stroke.paint);
        let mut attrs = format!(
            " fill=\"none\" stroke=\"{paint}\" stroke-width=\"{}\" stroke-miterlimit=\"10\"",
            num(stroke.width)
        );
        if let Some(dash) = &stroke.dash {
            let pattern: Vec<String> = dash.iter().map(|d| num(*d)).collect();
            attrs += &format!(" stroke-dasharray=\"{}\"", pattern.join(" "));
        }
        attrs += &self.style_attrs(style, "stroke-opacity");
        self.body += &format!("\t{}{attrs}/>\n", open_element(outline));
    }

    fn text(&mut self, label: &Label) {
        if label.text.trim().is_empty() {
            return;
        }
        self.body += "\t";
        self.body += &text_element(label);
        self.body += "\n";
    }

    fn image(&mut self, image: &LogoImage, target: Rect, clip: &Outline) {
        let id = format!("c{}", self.clip_count);
        self.clip_count += 1;
        self.defs += &format!(
            "\t\t<clipPath id=\"{id}\">{}/></clipPath>\n",
            open_element(clip)
        );
        self.body += &format!(
            "\t<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"data:{};base64,{}\" clip-path=\"url(#{id})\"/>\n",
            num(target.x),
            num(target.y),
            num(target.width),
            num(target.height),
            image.mime(),
            BASE64_STANDARD.encode(image.source())
        );
    }
}

/// The `<text>` element for a label. The raster surface lays labels out from
/// this same markup.
pub fn text_element(label: &Label) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        num(label.center_x),
        num(label.baseline),
        label.font.family(),
        num(label.size),
        label.color,
        escape(&label.text)
    )
}

/// The element name and geometry attributes of an outline, without the
/// closing `/>`.
fn open_element(outline: &Outline) -> String {
    match outline {
        Outline::Rect(rect) => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        ),
        Outline::RoundRect { rect, radius } => {
            let radius = num(*radius);
            format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" ry=\"{radius}\"",
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height)
            )
        }
        Outline::Circle { center, radius } => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
            num(center.x),
            num(center.y),
            num(*radius)
        ),
        Outline::Polygon(points) => format!("<polygon points=\"{}\"", points_attr(points)),
        Outline::Polyline(points) => format!("<polyline points=\"{}\"", points_attr(points)),
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn transform_attr(placement: &Placement) -> String {
    let mut parts = Vec::new();
    if placement.origin != Point::default() {
        parts.push(format!(
            "translate({} {})",
            num(placement.origin.x),
            num(placement.origin.y)
        ));
    }
    if placement.is_rotated() {
        parts.push(format!(
            "rotate({} {} {})",
            num(placement.rotation),
            num(placement.pivot.x),
            num(placement.pivot.y)
        ));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" transform=\"{}\"", parts.join(" "))
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(value: f32) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out += "&amp;",
            '<' => out += "&lt;",
            '>' => out += "&gt;",
            '"' => out += "&quot;",
            '\'' => out += "&apos;",
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::LabelFont;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(1.0 / 3.0), "0.333");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn test_document_envelope() {
        let mut doc = SvgDocument::new(120);
        doc.clear(Rgb::WHITE);
        let svg = doc.finish();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 120 120\""));
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(!svg.contains("<defs>"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_identical_gradients_are_shared() {
        let mut doc = SvgDocument::new(50);
        let gradient: Fill = LinearGradient::between(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Rgb::BLACK,
            Rgb::WHITE,
        )
        .into();
        let square = Outline::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        for x in 0..3 {
            let style = DrawStyle {
                placement: Placement::at(Point::new(x as f32 * 10.0, 0.0)),
                ..DrawStyle::default()
            };
            doc.fill(&square, &gradient, &style);
        }
        let svg = doc.finish();
        assert_eq!(svg.matches("<linearGradient").count(), 1);
        assert_eq!(svg.matches("fill=\"url(#g0)\"").count(), 3);
        assert!(svg.contains("transform=\"translate(20 0)\""));
    }

    #[test]
    fn test_rotation_and_opacity_attributes() {
        let mut doc = SvgDocument::new(50);
        let style = DrawStyle {
            placement: Placement::at(Point::new(10.0, 20.0)).rotated(30.0, Point::new(5.0, 5.0)),
            opacity: 0.5,
            shadow: None,
        };
        doc.fill(
            &Outline::Circle {
                center: Point::new(5.0, 5.0),
                radius: 4.0,
            },
            &Fill::Solid(Rgb::BLACK),
            &style,
        );
        let svg = doc.finish();
        assert!(svg.contains("<circle cx=\"5\" cy=\"5\" r=\"4\" fill=\"#000000\" transform=\"translate(10 20) rotate(30 5 5)\" fill-opacity=\"0.5\"/>"));
    }

    #[test]
    fn test_opacity_fades_paint_not_shadow_group() {
        let mut doc = SvgDocument::new(50);
        let shadow = Shadow {
            color: Rgb::BLACK,
            alpha: 1.0,
            blur: 4.0,
            offset: Point::new(2.0, 2.0),
        };
        let style = DrawStyle {
            opacity: 0.6,
            ..DrawStyle::with_shadow(shadow)
        };
        let square = Outline::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.fill(&square, &Fill::Solid(Rgb::BLACK), &style);
        doc.stroke(&square, &Stroke::solid(Rgb::BLACK, 2.0), &style);
        let svg = doc.finish();
        assert!(svg.contains("fill-opacity=\"0.6\" filter=\"url(#f0)\""));
        assert!(svg.contains("stroke-opacity=\"0.6\" filter=\"url(#f0)\""));
        assert!(svg.contains("flood-opacity=\"1\""));
        assert!(!svg.contains(" opacity="));
    }

    #[test]
    fn test_round_rect_markup() {
        let element = open_element(&Outline::round_rect(Rect::new(1.0, 1.0, 8.0, 8.0), 3.0));
        assert_eq!(element, "<rect x=\"1\" y=\"1\" width=\"8\" height=\"8\" rx=\"3\" ry=\"3\"");
    }

    #[test]
    fn test_shadow_filter_is_shared() {
        let mut doc = SvgDocument::new(50);
        let shadow = Shadow {
            color: Rgb::new(0x16, 0x65, 0x34),
            alpha: 1.0,
            blur: 4.0,
            offset: Point::new(2.0, 2.0),
        };
        let square = Outline::Rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        doc.fill(&square, &Fill::Solid(Rgb::BLACK), &DrawStyle::with_shadow(shadow));
        doc.fill(&square, &Fill::Solid(Rgb::BLACK), &DrawStyle::with_shadow(shadow));
        let svg = doc.finish();
        assert_eq!(svg.matches("<feDropShadow").count(), 1);
        assert!(svg.contains("stdDeviation=\"2\""));
        assert_eq!(svg.matches("filter=\"url(#f0)\"").count(), 2);
    }

    #[test]
    fn test_text_is_escaped() {
        let label = Label {
            text: "A&B <C>".into(),
            center_x: 50.0,
            baseline: 90.0,
            font: LabelFont::Mono,
            size: 16.0,
            color: Rgb::WHITE,
        };
        let element = text_element(&label);
        assert!(element.contains(">A&amp;B &lt;C&gt;</text>"));
        assert!(element.contains("text-anchor=\"middle\""));
        assert!(element.contains("monospace"));
    }

    #[test]
    fn test_image_is_clipped_and_embedded() {
        let mut doc = SvgDocument::new(50);
        let logo = LogoImage::from_pixels(image::RgbaImage::new(2, 2)).unwrap();
        doc.image(
            &logo,
            Rect::new(15.0, 15.0, 20.0, 20.0),
            &Outline::Circle {
                center: Point::new(25.0, 25.0),
                radius: 10.0,
            },
        );
        let svg = doc.finish();
        assert!(svg.contains("<clipPath id=\"c0\"><circle cx=\"25\" cy=\"25\" r=\"10\"/></clipPath>"));
        assert!(svg.contains("href=\"data:image/png;base64,"));
        assert!(svg.contains("clip-path=\"url(#c0)\""));
    }
}
