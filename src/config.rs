//! Configuration for the layout tree and the editor.

use crate::types::Rgba;

/// Settings shared by every layout node the pool constructs.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Round computed boxes to whole units (the engine's pixel snapping).
    pub rounding: bool,

    /// Initial node capacity of the engine arena.
    pub node_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rounding: true,
            node_capacity: 64,
        }
    }
}

/// Overlay palette used when the editor paints layout results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorColors {
    pub margin: Rgba,
    pub border: Rgba,
    pub padding: Rgba,
    pub inner: Rgba,
    pub selection_frame: Rgba,
}

impl Default for EditorColors {
    fn default() -> Self {
        Self {
            margin: Rgba::new(176, 131, 84, 180),
            border: Rgba::new(228, 196, 130, 180),
            padding: Rgba::new(184, 196, 128, 180),
            inner: Rgba::new(136, 178, 189, 180),
            selection_frame: Rgba::new(86, 117, 9, 200),
        }
    }
}

/// Insertion defaults and palette for the tree editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Width and height (points) given to containers added by the editor.
    pub new_widget_size: (f32, f32),

    /// Text given to labels added by the editor.
    pub new_label_text: String,

    /// Text color given to labels added by the editor.
    pub new_label_color: Rgba,

    pub colors: EditorColors,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            new_widget_size: (100.0, 100.0),
            new_label_text: "Hoge".to_string(),
            new_label_color: Rgba::BLACK,
            colors: EditorColors::default(),
        }
    }
}
