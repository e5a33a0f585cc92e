//! Layout Tree - the shadow node tree of one widget tree.
//!
//! Owns the node pool (and with it the engine arena), the private viewport
//! node the root is laid out in, and the root slot. One pass per frame:
//!
//! 1. `construct` after structural edits (see `reconcile`)
//! 2. `calculate_layout` runs the engine and refreshes every widget's
//!    cached [`LayoutResult`](super::LayoutResult)

use taffy::{AvailableSpace, NodeId, Size, Style};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::types::Point;
use crate::widget::{Widget, WidgetId, WidgetRef};

use super::node::{LeafHooks, NodeFlags};
use super::pool::{NodePool, PoolStats};
use super::taffy_bridge::{measure_leaf, viewport_style, BoxMetrics};

pub struct LayoutTree {
    pub(super) pool: NodePool,
    viewport: NodeId,
    root_node: NodeId,
    root: Option<WidgetRef>,
}

impl LayoutTree {
    pub fn new() -> Result<Self, LayoutError> {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Result<Self, LayoutError> {
        let mut pool = NodePool::new(&config);
        let viewport = pool.engine_mut().new_leaf(viewport_style(0.0, 0.0))?;
        let root_node = pool.acquire()?;
        pool.engine_mut().add_child(viewport, root_node)?;

        Ok(Self {
            pool,
            viewport,
            root_node,
            root: None,
        })
    }

    /// Build a tree and reconcile `root` into it.
    pub fn with_root(root: &WidgetRef) -> Result<Self, LayoutError> {
        let mut tree = Self::new()?;
        tree.construct(root)?;
        Ok(tree)
    }

    // =========================================================================
    // Per-frame passes
    // =========================================================================

    /// Reconcile the shadow tree against `root`.
    ///
    /// Call after structural edits. A different root widget resets the root
    /// slot and rebuilds from the pool.
    pub fn construct(&mut self, root: &WidgetRef) -> Result<(), LayoutError> {
        let before = self.pool.stats();
        self.root = Some(WidgetRef::clone(root));
        self.reconcile(self.root_node, root)?;

        let after = self.pool.stats();
        debug!(
            root = %root.id(),
            acquired = after.acquired - before.acquired,
            created = after.created - before.created,
            released = after.released - before.released,
            pooled = self.pool.pooled(),
            "construct"
        );
        Ok(())
    }

    /// Lay the tree out in a `width` x `height` viewport and refresh every
    /// widget's cached layout result.
    ///
    /// Does nothing before the first `construct`.
    pub fn calculate_layout(&mut self, width: f32, height: f32) -> Result<(), LayoutError> {
        let Some(root) = self.root.clone() else {
            return Ok(());
        };

        self.dirty_changed_content(&root)?;

        let viewport = viewport_style(width, height);
        if self.pool.engine().style(self.viewport)? != &viewport {
            self.pool.engine_mut().set_style(self.viewport, viewport)?;
        }

        let available = Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::Definite(height),
        };
        self.pool.engine_mut().compute_layout_with_measure(
            self.viewport,
            available,
            |known, available, _node, context, _style| measure_leaf(known, available, context),
        )?;

        let relaid = self.settle(self.root_node)?;
        let refreshed = self.refresh(Point::ZERO, &root)?;
        debug!(width, height, relaid, refreshed, "layout pass");
        Ok(())
    }

    /// Destroy pooled nodes. Returns how many were removed.
    pub fn clean_cache(&mut self) -> Result<usize, LayoutError> {
        self.pool.drain()
    }

    /// Mark nodes of widgets whose content changed since the last pass.
    fn dirty_changed_content(&mut self, widget: &WidgetRef) -> Result<(), LayoutError> {
        if widget.take_content_changed() {
            if let Some(node) = widget.layout_node() {
                self.mark_node_dirty(node)?;
            }
        }
        for child in widget.children() {
            self.dirty_changed_content(&child)?;
        }
        Ok(())
    }

    /// After an engine pass: flag nodes that were dirty or whose box moved,
    /// then clear `DIRTY`. Returns the number of flagged nodes.
    fn settle(&mut self, node: NodeId) -> Result<usize, LayoutError> {
        let metrics = BoxMetrics::from(self.pool.engine().layout(node)?);
        let children = self.pool.engine().children(node)?;

        let mut flagged = 0;
        if let Some(context) = self.pool.engine_mut().get_node_context_mut(node) {
            if context.flags.contains(NodeFlags::DIRTY) || context.last_box != Some(metrics) {
                context.flags.insert(NodeFlags::HAS_NEW_LAYOUT);
                context.last_box = Some(metrics);
                flagged += 1;
            }
            context.flags.remove(NodeFlags::DIRTY);
        }

        for child in children {
            flagged += self.settle(child)?;
        }
        Ok(flagged)
    }

    // =========================================================================
    // Dirtiness
    // =========================================================================

    /// Flag `node` and every ancestor dirty, in the engine and in the
    /// node flags.
    pub(crate) fn mark_node_dirty(&mut self, node: NodeId) -> Result<(), LayoutError> {
        let engine = self.pool.engine_mut();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if let Some(context) = engine.get_node_context_mut(current) {
                context.flags.insert(NodeFlags::DIRTY);
            }
            cursor = engine.parent(current);
        }
        engine.mark_dirty(node)?;
        Ok(())
    }

    /// Force `widget`'s node to be laid out again on the next pass.
    pub fn mark_dirty(&mut self, widget: &Widget) -> Result<(), LayoutError> {
        if let Some(node) = self.node_of(widget)? {
            self.mark_node_dirty(node)?;
        }
        Ok(())
    }

    pub fn is_dirty(&self, widget: &Widget) -> Result<bool, LayoutError> {
        Ok(match self.node_of(widget)? {
            Some(node) => self.node_flags(node).contains(NodeFlags::DIRTY),
            None => false,
        })
    }

    // =========================================================================
    // Style access
    // =========================================================================

    /// The node `widget` is attached to, checked against this tree's arena.
    fn node_of(&self, widget: &Widget) -> Result<Option<NodeId>, LayoutError> {
        let Some(node) = widget.layout_node() else {
            return Ok(None);
        };
        if self.bound_widget(node) != Some(widget.id()) {
            return Err(LayoutError::NotBound(widget.id()));
        }
        Ok(Some(node))
    }

    /// Current style of `widget`, wherever it lives.
    pub fn style(&self, widget: &Widget) -> Result<Style, LayoutError> {
        match self.node_of(widget)? {
            Some(node) => Ok(self.pool.engine().style(node)?.clone()),
            None => Ok(widget.style().unwrap_or_default()),
        }
    }

    pub fn set_style(&mut self, widget: &Widget, style: Style) -> Result<(), LayoutError> {
        self.update_style(widget, |current| *current = style)
    }

    /// Edit `widget`'s style in place. Attached widgets get their node marked
    /// dirty.
    pub fn update_style(&mut self, widget: &Widget, edit: impl FnOnce(&mut Style)) -> Result<(), LayoutError> {
        let Some(node) = self.node_of(widget)? else {
            return widget.update_detached_style(edit);
        };

        let mut style = self.pool.engine().style(node)?.clone();
        edit(&mut style);
        self.pool.engine_mut().set_style(node, style)?;
        self.mark_node_dirty(node)
    }

    /// Baseline of `widget` from its installed hook, using its laid-out size.
    pub fn baseline(&self, widget: &Widget) -> Result<Option<f32>, LayoutError> {
        let Some(node) = self.node_of(widget)? else {
            return Ok(None);
        };
        let Some(baseline) = self.node_hooks(node).and_then(|hooks| hooks.baseline) else {
            return Ok(None);
        };
        let size = self.pool.engine().layout(node)?.size;
        Ok(Some(baseline(widget, size.width, size.height)))
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn root(&self) -> Option<&WidgetRef> {
        self.root.as_ref()
    }

    pub fn root_node(&self) -> NodeId {
        self.root_node
    }

    /// Child nodes of `node` in the shadow tree.
    pub fn shadow_children(&self, node: NodeId) -> Vec<NodeId> {
        self.pool.engine().children(node).unwrap_or_default()
    }

    /// Id of the widget bound to `node`, if any.
    pub fn bound_widget(&self, node: NodeId) -> Option<WidgetId> {
        self.pool.engine().get_node_context(node).map(|context| context.widget_id())
    }

    pub fn node_flags(&self, node: NodeId) -> NodeFlags {
        self.pool
            .engine()
            .get_node_context(node)
            .map(|context| context.flags())
            .unwrap_or_default()
    }

    pub fn node_hooks(&self, node: NodeId) -> Option<LeafHooks> {
        self.pool.engine().get_node_context(node).map(|context| context.hooks())
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.pooled()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use taffy::style_helpers::{length, percent};
    use taffy::{Dimension as TaffyDimension, FlexDirection, LengthPercentage};

    use super::*;
    use crate::layout::text_measure::CellFont;
    use crate::types::{Rect, Rgba};

    fn sized(width: f32, height: f32) -> Style {
        Style {
            size: Size {
                width: TaffyDimension::Length(width),
                height: TaffyDimension::Length(height),
            },
            ..Default::default()
        }
    }

    fn rect_of(widget: &Widget) -> Rect {
        widget.layout_result().unwrap().rect()
    }

    #[test]
    fn test_no_results_before_layout() {
        let root = Widget::container().into_ref();
        let mut tree = LayoutTree::with_root(&root).unwrap();
        assert!(root.layout_result().is_none());

        tree.calculate_layout(10.0, 10.0).unwrap();
        assert!(root.layout_result().is_some());
    }

    #[test]
    fn test_layout_before_construct_is_noop() {
        let mut tree = LayoutTree::new().unwrap();
        tree.calculate_layout(10.0, 10.0).unwrap();
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_auto_root_fills_viewport() {
        let root = Widget::container().into_ref();
        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(80.0, 24.0).unwrap();
        assert_eq!(rect_of(&root), Rect::new(0.0, 0.0, 80.0, 24.0));
    }

    #[test]
    fn test_sized_root_keeps_size() {
        let root = Widget::container().with_style(sized(30.0, 10.0)).into_ref();
        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(80.0, 24.0).unwrap();
        assert_eq!(rect_of(&root), Rect::new(0.0, 0.0, 30.0, 10.0));
    }

    #[test]
    fn test_row_of_children_and_nested_offsets() {
        let root = Widget::container()
            .with_style(Style {
                flex_direction: FlexDirection::Row,
                padding: taffy::Rect {
                    left: LengthPercentage::Length(2.0),
                    right: LengthPercentage::Length(0.0),
                    top: LengthPercentage::Length(1.0),
                    bottom: LengthPercentage::Length(0.0),
                },
                ..sized(100.0, 50.0)
            })
            .into_ref();
        let a = Widget::container().with_style(sized(10.0, 5.0)).into_ref();
        let b = Widget::container().with_style(sized(20.0, 5.0)).into_ref();
        let inner = Widget::container().with_style(sized(4.0, 2.0)).into_ref();
        b.append_child(inner.clone()).unwrap();
        root.append_child(a.clone()).unwrap();
        root.append_child(b.clone()).unwrap();

        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(200.0, 200.0).unwrap();

        assert_eq!(rect_of(&a), Rect::new(2.0, 1.0, 10.0, 5.0));
        assert_eq!(rect_of(&b), Rect::new(12.0, 1.0, 20.0, 5.0));
        assert_eq!(rect_of(&inner), Rect::new(12.0, 1.0, 4.0, 2.0));

        let result = b.layout_result().unwrap();
        assert_eq!(result.offset, Point::ZERO);
        assert_eq!(inner.layout_result().unwrap().offset, Point::new(12.0, 1.0));
    }

    #[test]
    fn test_label_measures_text() {
        let root = Widget::container()
            .with_style(Style {
                flex_direction: FlexDirection::Column,
                align_items: Some(taffy::AlignItems::FlexStart),
                ..sized(40.0, 10.0)
            })
            .into_ref();
        let label = Widget::label("hello", Rgba::BLACK, Rc::new(CellFont::default())).into_ref();
        root.append_child(label.clone()).unwrap();

        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(40.0, 10.0).unwrap();

        assert_eq!(rect_of(&label), Rect::new(0.0, 0.0, 5.0, 1.0));
        assert_eq!(tree.baseline(&label).unwrap(), Some(1.0));
        assert_eq!(tree.baseline(&root).unwrap(), None);
    }

    #[test]
    fn test_label_text_change_relayouts() {
        let root = Widget::container()
            .with_style(Style {
                flex_direction: FlexDirection::Column,
                align_items: Some(taffy::AlignItems::FlexStart),
                ..sized(40.0, 10.0)
            })
            .into_ref();
        let label = Widget::label("hi", Rgba::BLACK, Rc::new(CellFont::default())).into_ref();
        root.append_child(label.clone()).unwrap();

        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(40.0, 10.0).unwrap();
        assert_eq!(rect_of(&label).width, 2.0);

        label.set_label_text("longer");
        tree.calculate_layout(40.0, 10.0).unwrap();
        assert_eq!(rect_of(&label).width, 6.0);
    }

    #[test]
    fn test_update_style_marks_dirty() {
        let root = Widget::container().into_ref();
        let child = Widget::container().with_style(sized(10.0, 10.0)).into_ref();
        root.append_child(child.clone()).unwrap();
        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(100.0, 100.0).unwrap();
        assert!(!tree.is_dirty(&child).unwrap());

        tree.update_style(&child, |style| style.size.width = length(30.0)).unwrap();
        assert!(tree.is_dirty(&child).unwrap());
        assert!(tree.is_dirty(&root).unwrap());

        tree.calculate_layout(100.0, 100.0).unwrap();
        assert!(!tree.is_dirty(&child).unwrap());
        assert_eq!(rect_of(&child).width, 30.0);
    }

    #[test]
    fn test_percent_width() {
        let root = Widget::container().with_style(sized(50.0, 20.0)).into_ref();
        let child = Widget::container()
            .with_style(Style {
                size: Size {
                    width: percent(0.5),
                    height: length(4.0),
                },
                ..Default::default()
            })
            .into_ref();
        root.append_child(child.clone()).unwrap();

        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(100.0, 100.0).unwrap();
        assert_eq!(rect_of(&child).width, 25.0);
    }

    #[test]
    fn test_attached_widget_rejects_direct_style_write() {
        let root = Widget::container().into_ref();
        let _tree = LayoutTree::with_root(&root).unwrap();
        assert!(matches!(
            root.set_style(Style::default()),
            Err(LayoutError::StyleOwnedByNode(id)) if id == root.id()
        ));
    }

    #[test]
    fn test_foreign_tree_is_rejected() {
        let root = Widget::container().into_ref();
        let mut tree = LayoutTree::with_root(&root).unwrap();
        let other = LayoutTree::new().unwrap();

        assert!(matches!(other.style(&root), Err(LayoutError::NotBound(_))));
        assert!(tree.style(&root).is_ok());
        tree.mark_dirty(&root).unwrap();
    }

    #[test]
    fn test_clean_cache_drains_pool() {
        let root = Widget::container().into_ref();
        root.append_child(Widget::container().into_ref()).unwrap();
        root.append_child(Widget::container().into_ref()).unwrap();
        let mut tree = LayoutTree::with_root(&root).unwrap();

        root.clear_children();
        tree.construct(&root).unwrap();
        assert_eq!(tree.pooled_count(), 2);

        assert_eq!(tree.clean_cache().unwrap(), 2);
        assert_eq!(tree.pooled_count(), 0);

        tree.calculate_layout(10.0, 10.0).unwrap();
        assert_eq!(rect_of(&root), Rect::new(0.0, 0.0, 10.0, 10.0));
    }
}
