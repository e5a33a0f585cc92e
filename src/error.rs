//! Error types.
//!
//! Reconciliation and layout-result refresh are pure tree surgery; they can
//! only fail when the engine is handed a handle it does not own. Editing
//! errors stay at the editor boundary and never reach the layout core.

use thiserror::Error;

use crate::widget::WidgetId;

/// Failures surfaced by the layout tree.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The flexbox engine rejected an operation (stale or foreign node handle).
    #[error("layout engine error: {0}")]
    Engine(#[from] taffy::TaffyError),

    /// The widget's style lives on its layout node; edit it through the tree.
    #[error("widget {0} is attached to a layout node; edit its style through the layout tree")]
    StyleOwnedByNode(WidgetId),

    /// The widget's node belongs to another layout tree, or was recycled.
    #[error("widget {0} is not bound to a node of this layout tree")]
    NotBound(WidgetId),
}

/// Rejected structural edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("widget {0} does not accept children")]
    ChildrenNotAllowed(WidgetId),

    #[error("no widget is selected")]
    NoSelection,

    #[error("widget {0} has no parent to remove it from")]
    NoParent(WidgetId),
}

/// A style length string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid length {input:?}")]
pub struct ParseLengthError {
    pub input: String,
}
