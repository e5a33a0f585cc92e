//! Layout-Node Pool - reuse of engine nodes across structural edits.
//!
//! Owns the engine arena and a LIFO free list of unbound nodes:
//! - `acquire` pops a pooled node or constructs a fresh one
//! - `release` returns a whole subtree, children first
//! - pooled nodes have no parent, no children, no context and default style
//!
//! Releasing a node that still holds its widget's style hands the style back
//! to the widget, so the widget stays usable after it leaves the tree.

use taffy::{NodeId, Style, TaffyTree, TraversePartialTree};
use tracing::trace;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::widget::Binding;

use super::node::NodeContext;

/// Allocation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Nodes handed out by `acquire`, fresh or pooled.
    pub acquired: usize,
    /// Nodes constructed because the free list was empty.
    pub created: usize,
    /// Nodes returned to the free list.
    pub released: usize,
    /// Pooled nodes destroyed by `drain`.
    pub drained: usize,
}

pub struct NodePool {
    engine: TaffyTree<NodeContext>,
    free: Vec<NodeId>,
    stats: PoolStats,
}

impl NodePool {
    pub fn new(config: &LayoutConfig) -> Self {
        let mut engine = TaffyTree::with_capacity(config.node_capacity);
        if config.rounding {
            engine.enable_rounding();
        } else {
            engine.disable_rounding();
        }
        Self {
            engine,
            free: Vec::new(),
            stats: PoolStats::default(),
        }
    }

    pub fn engine(&self) -> &TaffyTree<NodeContext> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TaffyTree<NodeContext> {
        &mut self.engine
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Number of nodes waiting on the free list.
    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    // =========================================================================
    // Acquire / Release
    // =========================================================================

    /// Hand out an unbound node: the most recently released one, or a new one.
    pub fn acquire(&mut self) -> Result<NodeId, LayoutError> {
        self.stats.acquired += 1;

        if let Some(node) = self.free.pop() {
            trace!(?node, pooled = self.free.len(), "reuse pooled node");
            return Ok(node);
        }

        let node = self.engine.new_leaf(Style::default())?;
        self.stats.created += 1;
        trace!(?node, "create node");
        Ok(node)
    }

    /// Return `node` and its whole subtree to the free list.
    ///
    /// Children are pooled before their parent. `node` is detached from its
    /// own parent.
    pub fn release(&mut self, node: NodeId) -> Result<(), LayoutError> {
        self.release_children(node)?;

        if let Some(parent) = self.engine.parent(node) {
            self.engine.remove_child(parent, node)?;
        }
        self.reset(node)?;

        self.free.push(node);
        self.stats.released += 1;
        trace!(?node, pooled = self.free.len(), "release node");
        Ok(())
    }

    /// Pool every child subtree of `node` and clear its child list.
    pub fn release_children(&mut self, node: NodeId) -> Result<(), LayoutError> {
        let children = self.engine.children(node)?;
        if children.is_empty() {
            return Ok(());
        }

        self.engine.set_children(node, &[])?;
        for child in children {
            self.release(child)?;
        }
        Ok(())
    }

    /// Release the last `count` children of `node`, last first.
    pub fn release_trailing(&mut self, node: NodeId, count: usize) -> Result<(), LayoutError> {
        for _ in 0..count {
            let len = self.engine.child_count(node);
            if len == 0 {
                break;
            }
            let child = self.engine.remove_child_at_index(node, len - 1)?;
            self.release(child)?;
        }
        Ok(())
    }

    /// Unbind `node` and restore engine defaults, keeping its parent link.
    ///
    /// If the bound widget still keeps its style on this node, the style is
    /// copied back to the widget's detached cache.
    pub fn reset(&mut self, node: NodeId) -> Result<(), LayoutError> {
        let bound = self.engine.get_node_context(node).and_then(NodeContext::widget);
        if let Some(widget) = bound {
            if widget.layout_node() == Some(node) {
                let style = self.engine.style(node)?.clone();
                widget.rebind(Binding::Detached(style));
            }
        }

        self.engine.set_node_context(node, None)?;
        self.engine.set_style(node, Style::default())?;
        Ok(())
    }

    /// Destroy every pooled node, returning how many were removed.
    pub fn drain(&mut self) -> Result<usize, LayoutError> {
        let count = self.free.len();
        for node in self.free.drain(..) {
            self.engine.remove(node)?;
        }
        self.stats.drained += count;
        trace!(count, "drain pool");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use taffy::Dimension as TaffyDimension;

    use super::*;
    use crate::widget::Widget;

    fn setup() -> NodePool {
        NodePool::new(&LayoutConfig::default())
    }

    #[test]
    fn test_acquire_creates_then_reuses() {
        let mut pool = setup();
        let a = pool.acquire().unwrap();
        assert_eq!(pool.stats().created, 1);

        pool.release(a).unwrap();
        assert_eq!(pool.pooled(), 1);

        let b = pool.acquire().unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.stats().acquired, 2);
        assert_eq!(pool.pooled(), 0);
    }

    #[test]
    fn test_release_is_recursive_children_first() {
        let mut pool = setup();
        let parent = pool.acquire().unwrap();
        let child = pool.acquire().unwrap();
        let grandchild = pool.acquire().unwrap();
        pool.engine_mut().add_child(parent, child).unwrap();
        pool.engine_mut().add_child(child, grandchild).unwrap();

        pool.release(parent).unwrap();
        assert_eq!(pool.pooled(), 3);

        // LIFO: the parent went in last, so it comes out first.
        assert_eq!(pool.acquire().unwrap(), parent);
        assert_eq!(pool.acquire().unwrap(), child);
        assert_eq!(pool.acquire().unwrap(), grandchild);

        let engine = pool.engine();
        for node in [parent, child, grandchild] {
            assert_eq!(engine.child_count(node), 0);
            assert!(engine.parent(node).is_none());
        }
    }

    #[test]
    fn test_release_detaches_from_parent() {
        let mut pool = setup();
        let parent = pool.acquire().unwrap();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.engine_mut().set_children(parent, &[a, b]).unwrap();

        pool.release(a).unwrap();
        assert_eq!(pool.engine().children(parent).unwrap(), vec![b]);
    }

    #[test]
    fn test_release_trailing() {
        let mut pool = setup();
        let parent = pool.acquire().unwrap();
        let kids: Vec<_> = (0..4).map(|_| pool.acquire().unwrap()).collect();
        pool.engine_mut().set_children(parent, &kids).unwrap();

        pool.release_trailing(parent, 3).unwrap();
        assert_eq!(pool.engine().children(parent).unwrap(), vec![kids[0]]);
        assert_eq!(pool.pooled(), 3);
    }

    #[test]
    fn test_release_trailing_stops_when_empty() {
        let mut pool = setup();
        let parent = pool.acquire().unwrap();
        let kids: Vec<_> = (0..2).map(|_| pool.acquire().unwrap()).collect();
        pool.engine_mut().set_children(parent, &kids).unwrap();

        pool.release_trailing(parent, 5).unwrap();
        assert_eq!(pool.engine().child_count(parent), 0);
        assert_eq!(pool.pooled(), 2);
        assert_eq!(pool.stats().released, 2);
    }

    #[test]
    fn test_reset_returns_style_to_widget() {
        let mut pool = setup();
        let node = pool.acquire().unwrap();
        let widget = Widget::container().into_ref();

        let mut style = Style::default();
        style.size.width = TaffyDimension::Length(42.0);
        pool.engine_mut().set_style(node, style.clone()).unwrap();
        pool.engine_mut()
            .set_node_context(node, Some(NodeContext::new(&widget)))
            .unwrap();
        widget.rebind(Binding::Attached(node));

        pool.release(node).unwrap();

        assert!(!widget.is_attached());
        assert_eq!(widget.style(), Some(style));
        assert!(pool.engine().get_node_context(node).is_none());
        assert_eq!(pool.engine().style(node).unwrap(), &Style::default());
        assert_eq!(Rc::strong_count(&widget), 1);
    }

    #[test]
    fn test_drain() {
        let mut pool = setup();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release(a).unwrap();
        pool.release(b).unwrap();

        assert_eq!(pool.drain().unwrap(), 2);
        assert_eq!(pool.pooled(), 0);
        assert_eq!(pool.engine().total_node_count(), 0);
        assert_eq!(pool.stats().drained, 2);
    }
}
