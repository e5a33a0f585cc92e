//! Shadow-node context.
//!
//! Every layout node bound to a widget carries a [`NodeContext`] inside the
//! engine arena. The context is the authoritative node-to-widget mapping;
//! widgets only hold the node handle.

use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;

use crate::widget::{BaselineFn, Capabilities, MeasureFn, Widget, WidgetId};

use super::taffy_bridge::BoxMetrics;

bitflags! {
    /// Layout state of a shadow node.
    ///
    /// `DIRTY` is set by structural edits, style writes and content changes,
    /// and cleared only by a successful engine pass. `HAS_NEW_LAYOUT` is set
    /// by that pass and cleared when the widget's cached result is refreshed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const DIRTY = 1 << 0;
        const HAS_NEW_LAYOUT = 1 << 1;
    }
}

/// Widget-specific engine hooks, installed on every bind.
#[derive(Clone, Copy, Default)]
pub struct LeafHooks {
    pub measure: Option<MeasureFn>,
    pub baseline: Option<BaselineFn>,
}

impl LeafHooks {
    pub fn from_capabilities(capabilities: &Capabilities) -> Self {
        Self {
            measure: capabilities.measure,
            baseline: capabilities.baseline,
        }
    }
}

impl fmt::Debug for LeafHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafHooks")
            .field("measure", &self.measure.is_some())
            .field("baseline", &self.baseline.is_some())
            .finish()
    }
}

/// Arena-side state of a bound layout node.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub(crate) widget_id: WidgetId,
    pub(crate) widget: Weak<Widget>,
    pub(crate) hooks: LeafHooks,
    pub(crate) flags: NodeFlags,
    /// Box metrics seen at the end of the previous engine pass.
    pub(crate) last_box: Option<BoxMetrics>,
}

impl NodeContext {
    /// A fresh binding; hooks are installed when the widget is attached.
    pub fn new(widget: &Rc<Widget>) -> Self {
        Self {
            widget_id: widget.id(),
            widget: Rc::downgrade(widget),
            hooks: LeafHooks::default(),
            flags: NodeFlags::DIRTY,
            last_box: None,
        }
    }

    pub fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    /// The bound widget, if it is still alive.
    pub fn widget(&self) -> Option<Rc<Widget>> {
        self.widget.upgrade()
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn hooks(&self) -> LeafHooks {
        self.hooks
    }
}
