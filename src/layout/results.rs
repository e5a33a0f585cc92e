//! Layout Result Cache - absolute boxes derived from engine output.
//!
//! After each engine pass the tree is walked once, root first. A widget's
//! box metrics are copied from its node only when it has no cached result
//! yet or its node was flagged `HAS_NEW_LAYOUT`; the offset is rewritten on
//! every pass because ancestors may have moved.

use crate::error::LayoutError;
use crate::types::{Point, Rect, Thickness};
use crate::widget::WidgetRef;

use super::node::NodeFlags;
use super::taffy_bridge::BoxMetrics;
use super::tree::LayoutTree;

/// Cached layout of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutResult {
    /// Sum of all ancestors' local positions.
    pub offset: Point,
    /// Position relative to the parent, and size.
    pub local_rect: Rect,
    pub margin: Thickness,
    pub border: Thickness,
    pub padding: Thickness,
}

impl LayoutResult {
    fn from_box(metrics: BoxMetrics, offset: Point) -> Self {
        Self {
            offset,
            local_rect: metrics.local_rect,
            margin: metrics.margin,
            border: metrics.border,
            padding: metrics.padding,
        }
    }

    /// Border box in root coordinates.
    pub fn rect(&self) -> Rect {
        self.local_rect.moved_by(self.offset)
    }

    /// Margin box in root coordinates.
    pub fn outer_rect(&self) -> Rect {
        self.rect().expanded_by(self.margin)
    }

    /// Padding box in root coordinates.
    pub fn rect_without_border(&self) -> Rect {
        self.rect().shrunk_by(self.border)
    }

    /// Content box in root coordinates.
    pub fn inner_rect(&self) -> Rect {
        self.rect_without_border().shrunk_by(self.padding)
    }

    /// Origin handed to children as their offset.
    pub fn child_offset(&self) -> Point {
        self.offset + self.local_rect.origin()
    }
}

impl LayoutTree {
    /// Refresh cached results of `widget`'s subtree, with `offset` as the
    /// widget's accumulated ancestor offset. Returns how many widgets took
    /// new box metrics.
    pub(crate) fn refresh(&mut self, offset: Point, widget: &WidgetRef) -> Result<usize, LayoutError> {
        let Some(node) = widget.layout_node() else {
            return Ok(0);
        };

        let has_new_layout = match self.pool.engine_mut().get_node_context_mut(node) {
            Some(context) => {
                let flagged = context.flags.contains(NodeFlags::HAS_NEW_LAYOUT);
                context.flags.remove(NodeFlags::HAS_NEW_LAYOUT);
                flagged
            }
            None => false,
        };

        let mut updated = 0;
        let result = match widget.layout_result() {
            Some(cached) if !has_new_layout => LayoutResult { offset, ..cached },
            _ => {
                updated += 1;
                let metrics = BoxMetrics::from(self.pool.engine().layout(node)?);
                LayoutResult::from_box(metrics, offset)
            }
        };
        widget.set_layout_result(result);

        let child_offset = result.child_offset();
        for child in widget.children() {
            updated += self.refresh(child_offset, &child)?;
        }
        Ok(updated)
    }
}
