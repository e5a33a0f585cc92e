//! Layout Module
//!
//! Projects the widget tree onto [Taffy](https://github.com/DioxusLabs/taffy)
//! and caches the results on the widgets.
//!
//! # Architecture
//!
//! 1. The reconciler keeps a shadow tree of Taffy nodes isomorphic to the
//!    widget tree, reusing nodes through a pool
//! 2. Leaf widgets plug measure hooks into their nodes (text sizing)
//! 3. Taffy computes box metrics for the whole tree
//! 4. The result cache accumulates ancestor offsets into absolute rects
//!
//! # Example
//!
//! ```
//! use spark_layout::layout::LayoutTree;
//! use spark_layout::widget::Widget;
//!
//! let root = Widget::container().into_ref();
//! let mut tree = LayoutTree::with_root(&root).unwrap();
//! tree.calculate_layout(80.0, 24.0).unwrap();
//! assert_eq!(root.layout_result().unwrap().rect().width, 80.0);
//! ```

mod node;
mod pool;
mod reconcile;
mod results;
pub mod taffy_bridge;
pub mod text_measure;
mod tree;

pub use node::{LeafHooks, NodeContext, NodeFlags};
pub use pool::{NodePool, PoolStats};
pub use results::LayoutResult;
pub use tree::LayoutTree;
