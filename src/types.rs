//! Core types for spark-layout.
//!
//! Geometry (points, rectangles, four-sided thicknesses), colors and the
//! style-length value used by the editor. Everything the layout cache,
//! hit tester and painters exchange is defined here.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Self = Self::rgb(211, 211, 211);

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Alpha blend src over dst (Porter-Duff "over").
    #[inline]
    pub fn blend(src: Self, dst: Self) -> Self {
        if src.is_opaque() {
            return src;
        }
        if src.is_transparent() {
            return dst;
        }

        let sa = src.a as i32;
        let inv_sa = 255 - sa;
        let da = dst.a as i32;

        let out_a = sa + (da * inv_sa) / 255;
        if out_a == 0 {
            return Self::TRANSPARENT;
        }

        let channel = |s: u8, d: u8| -> u8 {
            let v = ((s as i32 * sa) + (d as i32 * da * inv_sa / 255)) / out_a;
            v.clamp(0, 255) as u8
        };

        Self {
            r: channel(src.r, dst.r),
            g: channel(src.g, dst.g),
            b: channel(src.b, dst.b),
            a: out_a.clamp(0, 255) as u8,
        }
    }
}

// =============================================================================
// Point
// =============================================================================

/// A position (or offset) in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// =============================================================================
// Thickness - four-sided edge values
// =============================================================================

/// Left/top/right/bottom thickness (margin, border or padding).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of left and right.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Add for Thickness {
    type Output = Thickness;

    fn add(self, rhs: Thickness) -> Thickness {
        Thickness::new(
            self.left + rhs.left,
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
        )
    }
}

// =============================================================================
// Rect
// =============================================================================

/// An axis-aligned rectangle: origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rect covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// The same rect shifted by `offset`.
    pub fn moved_by(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Grow every side outwards by the matching edge of `edges`.
    pub fn expanded_by(&self, edges: Thickness) -> Rect {
        Rect::new(
            self.x - edges.left,
            self.y - edges.top,
            self.width + edges.horizontal(),
            self.height + edges.vertical(),
        )
    }

    /// Pull every side inwards by the matching edge of `edges`.
    pub fn shrunk_by(&self, edges: Thickness) -> Rect {
        Rect::new(
            self.x + edges.left,
            self.y + edges.top,
            self.width - edges.horizontal(),
            self.height - edges.vertical(),
        )
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// The parts of `self` not covered by `hole`, as up to four bands
    /// (top, bottom, left, right).
    pub fn subtract(&self, hole: &Rect) -> Vec<Rect> {
        if self.is_empty() {
            return Vec::new();
        }
        let Some(hole) = self.intersect(hole) else {
            return vec![*self];
        };

        let bands = [
            Rect::new(self.x, self.y, self.width, hole.y - self.y),
            Rect::new(self.x, hole.bottom(), self.width, self.bottom() - hole.bottom()),
            Rect::new(self.x, hole.y, hole.x - self.x, hole.height),
            Rect::new(hole.right(), hole.y, self.right() - hole.right(), hole.height),
        ];

        bands.into_iter().filter(|band| !band.is_empty()).collect()
    }
}

// =============================================================================
// Dimension - style length as typed by a user
// =============================================================================

/// A style length value.
///
/// - `Undefined`: no value set (engine default for the property)
/// - `Auto`: content/engine determined
/// - `Points(n)`: absolute length
/// - `Percent(f)`: fraction of the containing block (0.5 = 50%)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Undefined,
    Auto,
    Points(f32),
    Percent(f32),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Undefined => Ok(()),
            Dimension::Auto => f.write_str("auto"),
            Dimension::Points(v) => write!(f, "{v:.2}"),
            Dimension::Percent(v) => write!(f, "{:.2}%", v * 100.0),
        }
    }
}

// =============================================================================
// Edge
// =============================================================================

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];
}
