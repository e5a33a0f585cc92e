//! Widget tree.
//!
//! Widgets form the user-authored tree. A widget exclusively owns its
//! ordered child list (insertion order is paint order and layout order) and
//! is shared as [`WidgetRef`] with anything else that holds on to it, such as
//! the editor's selection.
//!
//! Style has exactly one authoritative home at a time:
//! - detached: cached on the widget
//! - attached: stored on the bound layout node, read and written through
//!   [`LayoutTree`](crate::layout::LayoutTree)
//!
//! A widget must appear at most once in a tree.

mod kind;
mod label;

pub use kind::{BaselineFn, Capabilities, DrawFn, MeasureFn, WidgetKind};
pub use label::Label;

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use taffy::{NodeId, Style};

use crate::error::{LayoutError, TreeError};
use crate::layout::text_measure::GlyphSource;
use crate::layout::LayoutResult;
use crate::renderer::Painter;
use crate::types::Rgba;

/// Shared handle to a widget.
pub type WidgetRef = Rc<Widget>;

// =============================================================================
// IDENTITY
// =============================================================================

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique widget identity, stable for the widget's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    fn next() -> Self {
        Self(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

// =============================================================================
// STYLE BINDING
// =============================================================================

/// Where a widget's style currently lives.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Detached(Style),
    Attached(NodeId),
}

// =============================================================================
// WIDGET
// =============================================================================

#[derive(Debug)]
pub struct Widget {
    id: WidgetId,
    name: RefCell<String>,
    kind: WidgetKind,
    children: RefCell<Vec<WidgetRef>>,
    binding: RefCell<Binding>,
    layout: Cell<Option<LayoutResult>>,
    content_changed: Cell<bool>,
    border_color: Cell<Option<Rgba>>,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            id: WidgetId::next(),
            name: RefCell::new(String::new()),
            kind,
            children: RefCell::new(Vec::new()),
            binding: RefCell::new(Binding::Detached(Style::default())),
            layout: Cell::new(None),
            content_changed: Cell::new(false),
            border_color: Cell::new(None),
        }
    }

    /// A plain box that lays out children.
    pub fn container() -> Self {
        Self::new(WidgetKind::Container)
    }

    /// A text leaf.
    pub fn label(text: impl Into<String>, color: Rgba, font: Rc<dyn GlyphSource>) -> Self {
        Self::new(WidgetKind::Label(RefCell::new(Label::new(text, color, font))))
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        *self.name.borrow_mut() = name.into();
        self
    }

    pub fn with_style(self, style: Style) -> Self {
        *self.binding.borrow_mut() = Binding::Detached(style);
        self
    }

    pub fn with_border_color(self, color: Rgba) -> Self {
        self.border_color.set(Some(color));
        self
    }

    pub fn into_ref(self) -> WidgetRef {
        Rc::new(self)
    }

    // -------------------------------------------------------------------------
    // Identity and kind
    // -------------------------------------------------------------------------

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        self.kind.capabilities()
    }

    pub fn accepts_children(&self) -> bool {
        self.capabilities().accepts_children
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// Snapshot of the child list.
    pub fn children(&self) -> Vec<WidgetRef> {
        self.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn child(&self, index: usize) -> Option<WidgetRef> {
        self.children.borrow().get(index).cloned()
    }

    pub fn append_child(&self, child: WidgetRef) -> Result<(), TreeError> {
        let index = self.child_count();
        self.insert_child(index, child)
    }

    /// Insert `child` at `index` (clamped to the child count).
    pub fn insert_child(&self, index: usize, child: WidgetRef) -> Result<(), TreeError> {
        if !self.accepts_children() {
            return Err(TreeError::ChildrenNotAllowed(self.id));
        }
        let mut children = self.children.borrow_mut();
        let index = index.min(children.len());
        children.insert(index, child);
        Ok(())
    }

    /// Remove `child` by identity. Returns the removed handle.
    pub fn remove_child(&self, child: &Widget) -> Option<WidgetRef> {
        let mut children = self.children.borrow_mut();
        let position = children.iter().position(|c| c.id == child.id)?;
        Some(children.remove(position))
    }

    pub fn clear_children(&self) -> Vec<WidgetRef> {
        std::mem::take(&mut *self.children.borrow_mut())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First widget named `name`, in depth-first children-before-self order.
    pub fn query(self: &Rc<Self>, name: &str) -> Option<WidgetRef> {
        self.query_all(name, 1).into_iter().next()
    }

    /// Up to `limit` widgets named `name`, depth-first, children before self.
    pub fn query_all(self: &Rc<Self>, name: &str, limit: usize) -> Vec<WidgetRef> {
        let mut found = Vec::new();
        self.collect_named(name, limit, &mut found);
        found
    }

    fn collect_named(self: &Rc<Self>, name: &str, limit: usize, found: &mut Vec<WidgetRef>) {
        for child in self.children.borrow().iter() {
            if found.len() >= limit {
                return;
            }
            child.collect_named(name, limit, found);
        }
        if found.len() < limit && *self.name.borrow() == name {
            found.push(Rc::clone(self));
        }
    }

    // -------------------------------------------------------------------------
    // Style binding
    // -------------------------------------------------------------------------

    /// The bound layout node, while attached.
    pub fn layout_node(&self) -> Option<NodeId> {
        match &*self.binding.borrow() {
            Binding::Attached(node) => Some(*node),
            Binding::Detached(_) => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.layout_node().is_some()
    }

    /// The cached style, while detached.
    pub fn style(&self) -> Option<Style> {
        match &*self.binding.borrow() {
            Binding::Detached(style) => Some(style.clone()),
            Binding::Attached(_) => None,
        }
    }

    /// Replace the cached style. Fails while attached.
    pub fn set_style(&self, style: Style) -> Result<(), LayoutError> {
        self.update_detached_style(|current| *current = style)
    }

    pub(crate) fn update_detached_style(&self, edit: impl FnOnce(&mut Style)) -> Result<(), LayoutError> {
        match &mut *self.binding.borrow_mut() {
            Binding::Detached(style) => {
                edit(style);
                Ok(())
            }
            Binding::Attached(_) => Err(LayoutError::StyleOwnedByNode(self.id)),
        }
    }

    /// Swap in a new binding, returning the previous one.
    pub(crate) fn rebind(&self, binding: Binding) -> Binding {
        self.binding.replace(binding)
    }

    // -------------------------------------------------------------------------
    // Layout results
    // -------------------------------------------------------------------------

    /// Cached layout result; `None` until the first layout pass reaches it.
    pub fn layout_result(&self) -> Option<LayoutResult> {
        self.layout.get()
    }

    pub(crate) fn set_layout_result(&self, result: LayoutResult) {
        self.layout.set(Some(result));
    }

    /// Flag a change that affects intrinsic size.
    pub fn mark_content_changed(&self) {
        self.content_changed.set(true);
    }

    pub(crate) fn take_content_changed(&self) -> bool {
        self.content_changed.replace(false)
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    pub fn border_color(&self) -> Option<Rgba> {
        self.border_color.get()
    }

    pub fn set_border_color(&self, color: Option<Rgba>) {
        self.border_color.set(color);
    }

    /// Paint this widget's content (not its children).
    pub fn draw(&self, layout: &LayoutResult, painter: &mut dyn Painter) {
        (self.capabilities().draw)(self, layout, painter);
    }

    // -------------------------------------------------------------------------
    // Label content
    // -------------------------------------------------------------------------

    pub fn as_label(&self) -> Option<Ref<'_, Label>> {
        match &self.kind {
            WidgetKind::Label(label) => Some(label.borrow()),
            WidgetKind::Container => None,
        }
    }

    /// Returns false if this is not a label or the text is unchanged.
    pub fn set_label_text(&self, text: &str) -> bool {
        let WidgetKind::Label(label) = &self.kind else {
            return false;
        };
        let changed = label.borrow_mut().set_text(text);
        if changed {
            self.mark_content_changed();
        }
        changed
    }

    pub fn set_label_font(&self, font: Rc<dyn GlyphSource>) -> bool {
        let WidgetKind::Label(label) = &self.kind else {
            return false;
        };
        label.borrow_mut().set_font(font);
        self.mark_content_changed();
        true
    }

    pub fn set_label_color(&self, color: Rgba) -> bool {
        let WidgetKind::Label(label) = &self.kind else {
            return false;
        };
        label.borrow_mut().set_color(color);
        true
    }
}
