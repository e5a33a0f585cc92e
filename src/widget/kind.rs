//! Widget kinds and their capability table.
//!
//! Every behavior that differs between kinds (child policy, intrinsic
//! sizing, drawing) is looked up here instead of matched at call sites.

use std::cell::RefCell;

use taffy::Size;

use crate::layout::text_measure::SizeConstraints;
use crate::layout::LayoutResult;
use crate::renderer::Painter;
use crate::types::Rgba;

use super::label::{self, Label};
use super::Widget;

/// Intrinsic size of a leaf under the engine's constraints.
pub type MeasureFn = fn(&Widget, SizeConstraints) -> Size<f32>;

/// Baseline offset from the top of a `width` x `height` box.
pub type BaselineFn = fn(&Widget, f32, f32) -> f32;

/// Paint the widget's own content (children are painted by the caller).
pub type DrawFn = fn(&Widget, &LayoutResult, &mut dyn Painter);

/// What a widget kind can do.
#[derive(Clone, Copy)]
pub struct Capabilities {
    pub accepts_children: bool,
    pub measure: Option<MeasureFn>,
    pub baseline: Option<BaselineFn>,
    pub draw: DrawFn,
}

static CONTAINER: Capabilities = Capabilities {
    accepts_children: true,
    measure: None,
    baseline: None,
    draw: draw_container,
};

static LABEL: Capabilities = Capabilities {
    accepts_children: false,
    measure: Some(label::measure),
    baseline: Some(label::baseline),
    draw: label::draw,
};

/// The closed set of widget variants.
#[derive(Debug)]
pub enum WidgetKind {
    /// A box that lays out children.
    Container,
    /// A text leaf.
    Label(RefCell<Label>),
}

impl WidgetKind {
    pub fn capabilities(&self) -> &'static Capabilities {
        match self {
            WidgetKind::Container => &CONTAINER,
            WidgetKind::Label(_) => &LABEL,
        }
    }

    /// Short kind name for logs and editor display.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Container => "Widget",
            WidgetKind::Label(_) => "Label",
        }
    }
}

/// Containers draw a thin frame around their box.
fn draw_container(_widget: &Widget, layout: &LayoutResult, painter: &mut dyn Painter) {
    painter.frame_rect(layout.rect(), Rgba::BLACK);
}
