//! Label - a text leaf.
//!
//! Labels size themselves from their glyph run: they install a measure and
//! a baseline hook on their layout node and never accept children.

use std::fmt;
use std::rc::Rc;

use taffy::Size;

use crate::layout::text_measure::{
    measure_text, text_baseline, FontMetrics, Glyph, GlyphSource, SizeConstraints,
};
use crate::layout::LayoutResult;
use crate::renderer::Painter;
use crate::types::Rgba;

use super::Widget;

/// Text content of a label widget.
pub struct Label {
    text: String,
    font: Rc<dyn GlyphSource>,
    color: Rgba,
    glyphs: Vec<Glyph>,
}

impl Label {
    pub fn new(text: impl Into<String>, color: Rgba, font: Rc<dyn GlyphSource>) -> Self {
        let text = text.into();
        let glyphs = font.glyphs(&text);
        Self { text, font, color, glyphs }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and reshape the glyph run.
    ///
    /// Returns false when the text is unchanged.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        self.glyphs = self.font.glyphs(&self.text);
        true
    }

    pub fn font(&self) -> &Rc<dyn GlyphSource> {
        &self.font
    }

    pub fn set_font(&mut self, font: Rc<dyn GlyphSource>) {
        self.glyphs = font.glyphs(&self.text);
        self.font = font;
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Paint-only; does not affect layout.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn metrics(&self) -> FontMetrics {
        self.font.metrics()
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("text", &self.text)
            .field("font", &self.font)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CAPABILITY HOOKS
// =============================================================================

pub(super) fn measure(widget: &Widget, constraints: SizeConstraints) -> Size<f32> {
    match widget.as_label() {
        Some(label) => measure_text(label.glyphs(), label.metrics(), constraints),
        None => Size { width: 0.0, height: 0.0 },
    }
}

pub(super) fn baseline(widget: &Widget, _width: f32, _height: f32) -> f32 {
    match widget.as_label() {
        Some(label) => text_baseline(label.text.is_empty(), label.metrics()),
        None => 0.0,
    }
}

pub(super) fn draw(widget: &Widget, layout: &LayoutResult, painter: &mut dyn Painter) {
    if let Some(label) = widget.as_label() {
        painter.draw_text(label.glyphs(), label.metrics(), layout.inner_rect(), label.color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text_measure::{CellFont, MeasureMode};

    fn font() -> Rc<dyn GlyphSource> {
        Rc::new(CellFont::new(1.0, 1.0))
    }

    #[test]
    fn test_set_text_reshapes() {
        let mut label = Label::new("ab", Rgba::BLACK, font());
        assert_eq!(label.glyphs().len(), 2);

        assert!(label.set_text("abcd"));
        assert_eq!(label.glyphs().len(), 4);
        assert!(!label.set_text("abcd"));
    }

    #[test]
    fn test_set_font_reshapes() {
        let mut label = Label::new("ab", Rgba::BLACK, font());
        label.set_font(Rc::new(CellFont::new(3.0, 2.0)));
        assert_eq!(label.glyphs()[0].advance, 3.0);
        assert_eq!(label.metrics().line_height, 2.0);
    }

    #[test]
    fn test_label_hooks() {
        let widget = Widget::label("hello", Rgba::BLACK, font());
        let size = measure(&widget, SizeConstraints::UNDEFINED);
        assert_eq!(size, Size { width: 5.0, height: 1.0 });

        let narrow = SizeConstraints {
            width: 3.0,
            width_mode: MeasureMode::AtMost,
            height: f32::INFINITY,
            height_mode: MeasureMode::Undefined,
        };
        assert_eq!(measure(&widget, narrow).width, 3.0);
        assert_eq!(baseline(&widget, 5.0, 1.0), 1.0);

        let empty = Widget::label("", Rgba::BLACK, font());
        assert_eq!(baseline(&empty, 0.0, 0.0), 0.0);
    }
}
