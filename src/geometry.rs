//! Pure shape geometry shared by the raster and vector canvases.
//!
//! Nothing here draws. Each function returns an [`Outline`] that a
//! [`Canvas`](crate::canvas::Canvas) turns into pixels or markup, so both
//! outputs are built from the same numbers.

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use crate::style::ModuleStyle;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square of side `size` centered on `center`.
    pub fn centered_square(center: Point, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A closed (or, for [`Outline::Polyline`], open) shape in local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Rect(Rect),
    /// A rectangle whose corner radius is clamped to half the shorter side.
    RoundRect { rect: Rect, radius: f32 },
    Circle { center: Point, radius: f32 },
    Polygon(Vec<Point>),
    /// An open path; only meaningful when stroked.
    Polyline(Vec<Point>),
}

impl Outline {
    pub fn round_rect(rect: Rect, radius: f32) -> Self {
        let limit = rect.width.min(rect.height) / 2.0;
        Outline::RoundRect {
            rect,
            radius: radius.clamp(0.0, limit.max(0.0)),
        }
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        match self {
            Outline::Rect(rect) | Outline::RoundRect { rect, .. } => *rect,
            Outline::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
            Outline::Polygon(points) | Outline::Polyline(points) => points_bounds(points),
        }
    }

    /// Whether the outline encloses no area and has nothing to stroke.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Outline::Rect(rect) | Outline::RoundRect { rect, .. } => rect.is_empty(),
            Outline::Circle { radius, .. } => *radius <= 0.0,
            Outline::Polygon(points) => points.len() < 3,
            Outline::Polyline(points) => points.len() < 2,
        }
    }
}

fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Vertices of a regular hexagon, starting at angle 0 and turning in 60°
/// steps.
pub fn hexagon_points(center: Point, radius: f32) -> Vec<Point> {
    (0..6)
        .map(|i| {
            let angle = (i as f32 * 60.0) * PI / 180.0;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// A square of `side` rotated 45° about `center`: a rhombus whose vertices sit
/// `side / √2` from the center along each axis.
pub fn diamond_points(center: Point, side: f32) -> Vec<Point> {
    let d = side * FRAC_1_SQRT_2;
    vec![
        Point::new(center.x, center.y - d),
        Point::new(center.x + d, center.y),
        Point::new(center.x, center.y + d),
        Point::new(center.x - d, center.y),
    ]
}

/// A rectangle whose four corners are cut off diagonally by `cut` pixels.
pub fn octagon_points(rect: Rect, cut: f32) -> Vec<Point> {
    let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    vec![
        Point::new(l + cut, t),
        Point::new(r - cut, t),
        Point::new(r, t + cut),
        Point::new(r, b - cut),
        Point::new(r - cut, b),
        Point::new(l + cut, b),
        Point::new(l, b - cut),
        Point::new(l, t + cut),
    ]
}

/// A horizontally elongated hexagon: a `width` × `height` plate centered on
/// `center` whose left and right ends come to a point `inset` pixels deep.
pub fn label_hexagon_points(center: Point, width: f32, height: f32, inset: f32) -> Vec<Point> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        Point::new(center.x - hw + inset, center.y - hh),
        Point::new(center.x + hw - inset, center.y - hh),
        Point::new(center.x + hw, center.y),
        Point::new(center.x + hw - inset, center.y + hh),
        Point::new(center.x - hw + inset, center.y + hh),
        Point::new(center.x - hw, center.y),
    ]
}

impl ModuleStyle {
    /// The outline of one module of side `size`, in cell-local coordinates
    /// with the origin at the cell's top-left corner.
    pub fn outline(self, size: f32) -> Outline {
        match self {
            ModuleStyle::Squares => square_module(size),
            ModuleStyle::Rounded => rounded_module(size),
            ModuleStyle::Dots => dot_module(size),
            ModuleStyle::Diamond => diamond_module(size),
            ModuleStyle::Hexagon => hexagon_module(size),
        }
    }
}

fn square_module(size: f32) -> Outline {
    Outline::Rect(Rect::new(0.0, 0.0, size, size))
}

fn rounded_module(size: f32) -> Outline {
    let radius = (size * 0.3).min(4.0);
    Outline::round_rect(Rect::new(1.0, 1.0, size - 2.0, size - 2.0), radius)
}

fn dot_module(size: f32) -> Outline {
    Outline::Circle {
        center: Point::new(size / 2.0, size / 2.0),
        radius: size / 2.2,
    }
}

fn diamond_module(size: f32) -> Outline {
    Outline::Polygon(diamond_points(Point::new(size / 2.0, size / 2.0), size / 1.25))
}

fn hexagon_module(size: f32) -> Outline {
    Outline::Polygon(hexagon_points(Point::new(size / 2.0, size / 2.0), size / 2.5))
}
