//! # spark-layout
//!
//! Retained widget tree laid out with [Taffy](https://github.com/DioxusLabs/taffy).
//!
//! ## Architecture
//!
//! Widgets are a plain retained tree. A shadow tree of Taffy nodes mirrors
//! it; the reconciler keeps the two isomorphic with minimal edits, reusing
//! nodes through a pool. After each engine pass the absolute rectangles of
//! every widget are cached on the widget itself:
//! ```text
//! widget edits → construct (reconcile) → Taffy → result cache → hit test / paint
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry, colors, style lengths
//! - [`widget`] - Widget tree, kinds and capabilities, labels
//! - [`layout`] - Shadow tree, node pool, reconciler, result cache, text measurement
//! - [`pipeline`] - Hit testing and the per-frame driver
//! - [`renderer`] - Painter boundary, terminal frame buffer, diff output
//! - [`editor`] - Interactive structural and style editing

pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod types;
pub mod widget;

pub use types::*;

pub use config::{EditorColors, EditorConfig, LayoutConfig};
pub use error::{LayoutError, ParseLengthError, TreeError};

pub use widget::{Capabilities, Label, Widget, WidgetId, WidgetKind, WidgetRef};

pub use layout::text_measure::{CellFont, FontMetrics, Glyph, GlyphSource, MeasureMode};
pub use layout::{LayoutResult, LayoutTree, NodeFlags, PoolStats};

pub use pipeline::{hit_test, FrameDriver, FrameReport, Hit};

pub use renderer::{draw_tree, Cell, DiffRenderer, FrameBuffer, Painter};

pub use editor::{FloatField, LengthField, TreeEditor};
