//! Renderer Module
//!
//! Painting of laid-out widget trees:
//! - [`Painter`] - the draw-call boundary (rects, frames, glyph runs)
//! - [`FrameBuffer`] - a terminal cell grid implementing `Painter`
//! - [`DiffRenderer`] - writes only changed cells to the terminal

mod buffer;
mod diff;

pub use buffer::{Cell, FrameBuffer};
pub use diff::DiffRenderer;

use crate::layout::text_measure::{FontMetrics, Glyph};
use crate::layout::LayoutResult;
use crate::types::{Rect, Rgba};
use crate::widget::Widget;

/// Draw calls a widget tree is painted with.
pub trait Painter {
    /// Fill `rect` with `color` (alpha blended).
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Outline `rect` with a thin frame.
    fn frame_rect(&mut self, rect: Rect, color: Rgba);

    /// Draw a glyph run wrapped to `area`, with the measurer's pen rules.
    fn draw_text(&mut self, glyphs: &[Glyph], metrics: FontMetrics, area: Rect, color: Rgba);
}

/// Paint `widget` and its subtree in child order (later siblings on top).
///
/// Widgets that have not been laid out paint nothing.
pub fn draw_tree(widget: &Widget, painter: &mut dyn Painter) {
    if let Some(layout) = widget.layout_result() {
        if let Some(color) = widget.border_color() {
            draw_border(&layout, color, painter);
        }
        widget.draw(&layout, painter);
    }

    for child in widget.children() {
        draw_tree(&child, painter);
    }
}

/// Fill the bands of `outer_rect` outside `rect_without_border`.
pub fn draw_border(layout: &LayoutResult, color: Rgba, painter: &mut dyn Painter) {
    for band in layout.outer_rect().subtract(&layout.rect_without_border()) {
        painter.fill_rect(band, color);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use taffy::style_helpers::length;
    use taffy::{LengthPercentage, Size, Style};

    use super::*;
    use crate::layout::text_measure::CellFont;
    use crate::layout::LayoutTree;
    use crate::types::Thickness;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Fill(Rect),
        Frame(Rect),
        Text(String, Rect),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Painter for Recorder {
        fn fill_rect(&mut self, rect: Rect, _color: Rgba) {
            self.ops.push(Op::Fill(rect));
        }

        fn frame_rect(&mut self, rect: Rect, _color: Rgba) {
            self.ops.push(Op::Frame(rect));
        }

        fn draw_text(&mut self, glyphs: &[Glyph], _metrics: FontMetrics, area: Rect, _color: Rgba) {
            self.ops.push(Op::Text(glyphs.iter().map(|g| g.code_point).collect(), area));
        }
    }

    #[test]
    fn test_draw_tree_paint_order() {
        let root = Widget::container()
            .with_style(Style {
                size: Size { width: length(20.0), height: length(4.0) },
                ..Default::default()
            })
            .into_ref();
        let label = Widget::label("ab", Rgba::BLACK, Rc::new(CellFont::default())).into_ref();
        root.append_child(label.clone()).unwrap();

        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(20.0, 4.0).unwrap();

        let mut recorder = Recorder::default();
        draw_tree(&root, &mut recorder);

        let label_rect = label.layout_result().unwrap().inner_rect();
        assert_eq!(
            recorder.ops,
            vec![
                Op::Frame(Rect::new(0.0, 0.0, 20.0, 4.0)),
                Op::Text("ab".to_string(), label_rect),
            ]
        );
    }

    #[test]
    fn test_border_bands_cover_margin_and_border() {
        let one = LengthPercentage::Length(1.0);
        let root = Widget::container()
            .with_style(Style {
                size: Size { width: length(10.0), height: length(6.0) },
                border: taffy::Rect { left: one, right: one, top: one, bottom: one },
                ..Default::default()
            })
            .with_border_color(Rgba::WHITE)
            .into_ref();

        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(10.0, 6.0).unwrap();

        let mut recorder = Recorder::default();
        draw_tree(&root, &mut recorder);

        let filled: f32 = recorder
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(rect) => Some(rect.width * rect.height),
                _ => None,
            })
            .sum();
        assert_eq!(filled, 60.0 - 8.0 * 4.0);

        let layout = root.layout_result().unwrap();
        assert_eq!(layout.border, Thickness::uniform(1.0));
    }

    #[test]
    fn test_unlaid_widget_paints_nothing() {
        let root = Widget::container().into_ref();
        let mut recorder = Recorder::default();
        draw_tree(&root, &mut recorder);
        assert!(recorder.ops.is_empty());
    }
}
