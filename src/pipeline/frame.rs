//! Frame Driver - the single per-frame pass.
//!
//! ```text
//! pending edits → construct → engine layout → result refresh → hover → draw → overlay
//! ```
//!
//! Everything runs synchronously on the UI thread; edits made between
//! frames are picked up by the next `frame` call.

use std::rc::Rc;

use tracing::trace;

use crate::config::{EditorConfig, LayoutConfig};
use crate::editor::TreeEditor;
use crate::error::LayoutError;
use crate::layout::LayoutTree;
use crate::renderer::{draw_tree, Painter};
use crate::types::Point;
use crate::widget::WidgetRef;

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// The shadow tree was reconciled this frame.
    pub reconstructed: bool,
    /// The pointer is over a widget.
    pub hovering: bool,
}

pub struct FrameDriver {
    root: WidgetRef,
    tree: LayoutTree,
    editor: TreeEditor,
    structure_dirty: bool,
}

impl FrameDriver {
    pub fn new(root: WidgetRef) -> Result<Self, LayoutError> {
        Self::with_config(root, LayoutConfig::default(), EditorConfig::default())
    }

    pub fn with_config(
        root: WidgetRef,
        layout: LayoutConfig,
        editor: EditorConfig,
    ) -> Result<Self, LayoutError> {
        let mut tree = LayoutTree::with_config(layout)?;
        tree.construct(&root)?;
        let editor = TreeEditor::with_config(Rc::clone(&root), editor);
        Ok(Self {
            root,
            tree,
            editor,
            structure_dirty: false,
        })
    }

    pub fn root(&self) -> &WidgetRef {
        &self.root
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn editor(&self) -> &TreeEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TreeEditor {
        &mut self.editor
    }

    /// Split borrow for style edits, which need both.
    pub fn parts_mut(&mut self) -> (&mut LayoutTree, &mut TreeEditor) {
        (&mut self.tree, &mut self.editor)
    }

    /// Request a reconcile on the next frame after edits made outside the
    /// editor.
    pub fn invalidate_structure(&mut self) {
        self.structure_dirty = true;
    }

    /// Run one frame in a `viewport` of (width, height), painting into
    /// `painter`. `pointer` is `None` when the pointer is outside the tree.
    pub fn frame(
        &mut self,
        viewport: (f32, f32),
        pointer: Option<Point>,
        painter: &mut dyn Painter,
    ) -> Result<FrameReport, LayoutError> {
        let reconstructed = self.editor.take_tree_changed() | std::mem::take(&mut self.structure_dirty);
        if reconstructed {
            self.tree.construct(&self.root)?;
        }

        self.tree.calculate_layout(viewport.0, viewport.1)?;
        let hovering = self.editor.hover(pointer).is_some();

        draw_tree(&self.root, painter);
        self.editor.overlay(painter);

        trace!(reconstructed, hovering, "frame");
        Ok(FrameReport {
            reconstructed,
            hovering,
        })
    }
}
