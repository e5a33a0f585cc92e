//! Text Measurement
//!
//! Sizes wrapped text for the layout engine's measure protocol by replaying
//! glyph advances with a pen:
//!
//! - newline: reserve the closing line and the next one, return the pen to
//!   the left edge and move down a line
//! - space / tab: advance by the font's space width (no width contribution)
//! - anything else: extend the bounds by the glyph advance, then advance
//!
//! After every glyph the pen is checked against the maximum line width. A
//! glyph that overflows stays on the line it was placed on; the pen wraps
//! after it and the new line is reserved.

use std::fmt;

use taffy::Size;
use unicode_width::UnicodeWidthChar;

use crate::types::Point;

// =============================================================================
// GLYPH SOURCE
// =============================================================================

/// One shaped glyph: the code point and its horizontal advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub code_point: char,
    pub advance: f32,
}

impl Glyph {
    pub const fn new(code_point: char, advance: f32) -> Self {
        Self { code_point, advance }
    }
}

/// Font-wide metrics used by the pen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub line_height: f32,
    pub space_width: f32,
    pub ascent: f32,
}

/// Produces glyph runs and metrics for a font.
pub trait GlyphSource: fmt::Debug {
    /// Shape `text` into glyphs with advances.
    fn glyphs(&self, text: &str) -> Vec<Glyph>;

    /// Line height, space width and ascent.
    fn metrics(&self) -> FontMetrics;
}

/// A fixed-cell font for terminal output.
///
/// Advances come from the Unicode display width of each character:
/// - ASCII printable: 1 cell
/// - CJK / fullwidth / most emoji: 2 cells
/// - Control and zero-width characters: 0 cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFont {
    cell_width: f32,
    cell_height: f32,
}

impl CellFont {
    /// A font where one cell is `cell_width` x `cell_height` layout units.
    pub const fn new(cell_width: f32, cell_height: f32) -> Self {
        Self { cell_width, cell_height }
    }
}

impl Default for CellFont {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl GlyphSource for CellFont {
    fn glyphs(&self, text: &str) -> Vec<Glyph> {
        text.chars()
            .map(|c| Glyph::new(c, char_width(c) as f32 * self.cell_width))
            .collect()
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            line_height: self.cell_height,
            space_width: self.cell_width,
            ascent: self.cell_height,
        }
    }
}

/// Display width of a character in terminal cells.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// =============================================================================
// MEASURE PROTOCOL
// =============================================================================

/// How the engine constrains one axis of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureMode {
    /// No constraint; report the content size.
    Undefined,
    /// The size is fixed; report the constraint verbatim.
    Exactly,
    /// Report the content size, capped at the constraint.
    AtMost,
}

/// Both axes of a measurement request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeConstraints {
    pub width: f32,
    pub width_mode: MeasureMode,
    pub height: f32,
    pub height_mode: MeasureMode,
}

impl SizeConstraints {
    /// No constraint on either axis.
    pub const UNDEFINED: Self = Self {
        width: f32::INFINITY,
        width_mode: MeasureMode::Undefined,
        height: f32::INFINITY,
        height_mode: MeasureMode::Undefined,
    };

    /// The width at which text wraps.
    pub fn wrap_width(&self) -> f32 {
        match self.width_mode {
            MeasureMode::Undefined => f32::INFINITY,
            MeasureMode::Exactly | MeasureMode::AtMost => self.width,
        }
    }
}

/// Clamp one measured axis against its constraint.
fn resolve_axis(measured: f32, available: f32, mode: MeasureMode) -> f32 {
    match mode {
        MeasureMode::Undefined => measured,
        MeasureMode::Exactly => available,
        MeasureMode::AtMost => available.min(measured),
    }
}

/// Clamp a measured content size against the engine's constraints.
pub fn resolve_size(measured: Size<f32>, constraints: SizeConstraints) -> Size<f32> {
    Size {
        width: resolve_axis(measured.width, constraints.width, constraints.width_mode),
        height: resolve_axis(measured.height, constraints.height, constraints.height_mode),
    }
}

// =============================================================================
// PEN SIMULATION
// =============================================================================

/// A glyph placed by the pen, relative to the text origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub glyph: Glyph,
    pub position: Point,
}

/// Pen state while replaying a glyph run.
#[derive(Debug, Clone)]
struct Pen {
    metrics: FontMetrics,
    max_width: f32,
    position: Point,
    bounds: Point,
}

impl Pen {
    fn new(metrics: FontMetrics, max_width: f32) -> Self {
        Self {
            metrics,
            max_width,
            position: Point::ZERO,
            bounds: Point::ZERO,
        }
    }

    fn reserve_lines(&mut self, lines: f32) {
        let bottom = self.position.y + self.metrics.line_height * lines;
        self.bounds.y = self.bounds.y.max(bottom);
    }

    /// Advance over one glyph; returns where it was drawn, if it is visible.
    fn step(&mut self, glyph: Glyph) -> Option<Point> {
        let line_height = self.metrics.line_height;

        let placed = match glyph.code_point {
            '\n' => {
                self.reserve_lines(2.0);
                self.position.x = 0.0;
                self.position.y += line_height;
                None
            }
            ' ' | '\t' => {
                self.reserve_lines(1.0);
                self.position.x += self.metrics.space_width;
                None
            }
            _ => {
                let at = self.position;
                self.bounds.x = self.bounds.x.max(self.position.x + glyph.advance);
                self.reserve_lines(1.0);
                self.position.x += glyph.advance;
                Some(at)
            }
        };

        if self.position.x > self.max_width {
            self.position.x = 0.0;
            self.position.y += line_height;
            self.reserve_lines(1.0);
        }

        placed
    }

    fn size(&self) -> Size<f32> {
        Size {
            width: self.bounds.x,
            height: self.bounds.y,
        }
    }
}

/// Bounding size of a glyph run wrapped at `max_width`.
pub fn measure_glyphs(glyphs: &[Glyph], metrics: FontMetrics, max_width: f32) -> Size<f32> {
    let mut pen = Pen::new(metrics, max_width);
    for &glyph in glyphs {
        pen.step(glyph);
    }
    pen.size()
}

/// Positions of the visible glyphs of a run wrapped at `max_width`.
pub fn place_glyphs(glyphs: &[Glyph], metrics: FontMetrics, max_width: f32) -> Vec<PlacedGlyph> {
    let mut pen = Pen::new(metrics, max_width);
    glyphs
        .iter()
        .filter_map(|&glyph| {
            pen.step(glyph)
                .map(|position| PlacedGlyph { glyph, position })
        })
        .collect()
}

/// Answer a measure request for a glyph run.
///
/// When both axes are exact the content is irrelevant and the constraints
/// are returned without replaying the run.
pub fn measure_text(glyphs: &[Glyph], metrics: FontMetrics, constraints: SizeConstraints) -> Size<f32> {
    if constraints.width_mode == MeasureMode::Exactly && constraints.height_mode == MeasureMode::Exactly {
        return Size {
            width: constraints.width,
            height: constraints.height,
        };
    }

    let measured = measure_glyphs(glyphs, metrics, constraints.wrap_width());
    resolve_size(measured, constraints)
}

/// Baseline of a text run: the font ascent, or zero for empty text.
pub fn text_baseline(is_empty: bool, metrics: FontMetrics) -> f32 {
    if is_empty { 0.0 } else { metrics.ascent }
}
