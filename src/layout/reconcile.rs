//! Reconciler - keeps the shadow node tree isomorphic to the widget tree.
//!
//! Nodes are matched to widgets by position and checked by widget id. A
//! node whose bound id differs from the widget now at its position is reset
//! (its subtree goes back to the pool) and rebound. Surplus trailing nodes
//! are released, missing ones are acquired from the pool. A reorder of
//! existing children therefore resets every slot whose id changed.

use taffy::{NodeId, TraversePartialTree};
use tracing::trace;

use crate::error::LayoutError;
use crate::widget::{Binding, WidgetRef};

use super::node::{LeafHooks, NodeContext};
use super::tree::LayoutTree;

impl LayoutTree {
    /// Make `node`'s subtree mirror `widget`'s subtree and bind every node.
    pub(crate) fn reconcile(&mut self, node: NodeId, widget: &WidgetRef) -> Result<(), LayoutError> {
        let bound = self.pool.engine().get_node_context(node).map(NodeContext::widget_id);
        if bound != Some(widget.id()) {
            trace!(?node, widget = %widget.id(), "rebind slot");
            self.pool.release_children(node)?;
            self.pool.reset(node)?;
            self.pool
                .engine_mut()
                .set_node_context(node, Some(NodeContext::new(widget)))?;
            self.mark_node_dirty(node)?;
        }

        let children = widget.children();
        if children.is_empty() {
            self.pool.release_children(node)?;
            self.mark_node_dirty(node)?;
            return self.attach(node, widget);
        }

        let existing = self.pool.engine().child_count(node);
        if existing > children.len() {
            self.pool.release_trailing(node, existing - children.len())?;
            self.mark_node_dirty(node)?;
        }

        if existing < children.len() {
            for (index, child) in children.iter().enumerate().skip(existing) {
                let child_node = self.pool.acquire()?;
                self.pool
                    .engine_mut()
                    .set_node_context(child_node, Some(NodeContext::new(child)))?;
                self.pool
                    .engine_mut()
                    .insert_child_at_index(node, index, child_node)?;
            }
            self.mark_node_dirty(node)?;
        }

        let child_nodes = self.pool.engine().children(node)?;
        for (child_node, child) in child_nodes.into_iter().zip(children.iter()) {
            self.reconcile(child_node, child)?;
        }

        self.attach(node, widget)
    }

    /// Bind `widget` to `node`: move its style onto the node and install the
    /// hooks its kind declares.
    fn attach(&mut self, node: NodeId, widget: &WidgetRef) -> Result<(), LayoutError> {
        let engine = self.pool.engine_mut();

        match widget.rebind(Binding::Attached(node)) {
            Binding::Detached(style) => engine.set_style(node, style)?,
            Binding::Attached(previous) if previous != node => {
                let style = engine.style(previous)?.clone();
                engine.set_style(node, style)?;
            }
            Binding::Attached(_) => {}
        }

        if let Some(context) = engine.get_node_context_mut(node) {
            context.hooks = LeafHooks::from_capabilities(widget.capabilities());
        }
        Ok(())
    }
}
