//! Tree Editor - interactive structural and style editing.
//!
//! The editor hit-tests the pointer against cached layout results, keeps a
//! selection (with the selected widget's parent, needed for removal) and
//! turns user actions into widget-tree edits. Structural edits only touch
//! the widget tree; the caller reconciles when [`TreeEditor::take_tree_changed`]
//! reports a change.

mod style_input;

pub use style_input::{format_float, format_length, parse_float, parse_length, FloatField, LengthField};

use std::rc::Rc;

use taffy::style_helpers::length;
use taffy::{Size, Style};
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::error::{LayoutError, TreeError};
use crate::layout::text_measure::GlyphSource;
use crate::layout::LayoutTree;
use crate::pipeline::{hit_test, Hit};
use crate::renderer::Painter;
use crate::types::{Point, Rgba};
use crate::widget::{Widget, WidgetRef};

pub struct TreeEditor {
    root: WidgetRef,
    config: EditorConfig,
    hovered: Option<Hit>,
    selected: Option<WidgetRef>,
    selected_parent: Option<WidgetRef>,
    tree_changed: bool,
}

impl TreeEditor {
    pub fn new(root: WidgetRef) -> Self {
        Self::with_config(root, EditorConfig::default())
    }

    pub fn with_config(root: WidgetRef, config: EditorConfig) -> Self {
        Self {
            root,
            config,
            hovered: None,
            selected: None,
            selected_parent: None,
            tree_changed: false,
        }
    }

    pub fn root(&self) -> &WidgetRef {
        &self.root
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Hit-test `point` and remember the result. `None` clears the hover
    /// (pointer outside the tree or captured by other UI).
    pub fn hover(&mut self, point: Option<Point>) -> Option<&Hit> {
        self.hovered = point.and_then(|p| hit_test(p, &self.root));
        self.hovered.as_ref()
    }

    pub fn hovered(&self) -> Option<&Hit> {
        self.hovered.as_ref()
    }

    /// Click at `point`: selects the widget under it, or deselects it if it
    /// is already selected. Clicking empty space changes nothing.
    pub fn click(&mut self, point: Point) -> Option<&WidgetRef> {
        let Some(hit) = self.hover(Some(point)).cloned() else {
            return self.selected.as_ref();
        };

        let already_selected = self.selected.as_ref().is_some_and(|s| Rc::ptr_eq(s, &hit.widget));
        if already_selected {
            self.deselect();
        } else {
            debug!(widget = %hit.widget.id(), kind = hit.widget.kind().name(), "select");
            self.selected = Some(hit.widget);
            self.selected_parent = hit.parent;
        }
        self.selected.as_ref()
    }

    pub fn select(&mut self, widget: WidgetRef, parent: Option<WidgetRef>) {
        self.selected = Some(widget);
        self.selected_parent = parent;
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.selected_parent = None;
    }

    pub fn selected(&self) -> Option<&WidgetRef> {
        self.selected.as_ref()
    }

    pub fn selected_parent(&self) -> Option<&WidgetRef> {
        self.selected_parent.as_ref()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append a fixed-size container to the selection.
    pub fn add_child_widget(&mut self) -> Result<WidgetRef, TreeError> {
        let (width, height) = self.config.new_widget_size;
        let child = Widget::container()
            .with_style(Style {
                size: Size {
                    width: length(width),
                    height: length(height),
                },
                ..Default::default()
            })
            .into_ref();
        self.append_to_selection(child)
    }

    /// Append a label with the configured text and color to the selection.
    pub fn add_child_label(&mut self, font: Rc<dyn GlyphSource>) -> Result<WidgetRef, TreeError> {
        let child = Widget::label(self.config.new_label_text.clone(), self.config.new_label_color, font).into_ref();
        self.append_to_selection(child)
    }

    fn append_to_selection(&mut self, child: WidgetRef) -> Result<WidgetRef, TreeError> {
        let parent = self.selected.as_ref().ok_or(TreeError::NoSelection)?;
        if let Err(err) = parent.append_child(Rc::clone(&child)) {
            warn!(%err, "rejected insertion");
            return Err(err);
        }

        debug!(parent = %parent.id(), child = %child.id(), kind = child.kind().name(), "add child");
        self.tree_changed = true;
        Ok(child)
    }

    /// Remove the selection from its parent and clear the selection.
    pub fn remove_selected(&mut self) -> Result<WidgetRef, TreeError> {
        let selected = self.selected.as_ref().ok_or(TreeError::NoSelection)?;
        let parent = self
            .selected_parent
            .as_ref()
            .ok_or(TreeError::NoParent(selected.id()))?;
        let removed = parent
            .remove_child(selected)
            .ok_or(TreeError::NoParent(selected.id()))?;

        debug!(widget = %removed.id(), parent = %parent.id(), "remove child");
        self.deselect();
        self.hovered = None;
        self.tree_changed = true;
        Ok(removed)
    }

    /// Report and reset whether the tree structure changed.
    pub fn take_tree_changed(&mut self) -> bool {
        std::mem::take(&mut self.tree_changed)
    }

    pub fn is_tree_changed(&self) -> bool {
        self.tree_changed
    }

    // =========================================================================
    // Style
    // =========================================================================

    /// Set a length property of the selection from typed input.
    ///
    /// Returns false (and leaves the style untouched) when nothing is
    /// selected or the input is rejected.
    pub fn edit_length(&self, tree: &mut LayoutTree, field: LengthField, input: &str) -> Result<bool, LayoutError> {
        let value = match parse_length(input) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, ?field, "rejected style input");
                return Ok(false);
            }
        };
        self.edit_style(tree, |style| {
            let applied = field.write(style, value);
            if !applied {
                warn!(?field, %value, "property cannot hold value");
            }
            applied
        })
    }

    /// Set a float property of the selection from typed input.
    pub fn edit_float(&self, tree: &mut LayoutTree, field: FloatField, input: &str) -> Result<bool, LayoutError> {
        let value = match parse_float(input) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, ?field, "rejected style input");
                return Ok(false);
            }
        };
        self.edit_style(tree, |style| {
            field.write(style, value);
            true
        })
    }

    /// Apply `edit` to the selection's style. `edit` returns whether it
    /// changed anything; nothing is written back otherwise.
    pub fn edit_style(&self, tree: &mut LayoutTree, edit: impl FnOnce(&mut Style) -> bool) -> Result<bool, LayoutError> {
        let Some(widget) = &self.selected else {
            return Ok(false);
        };

        let mut style = tree.style(widget)?;
        if !edit(&mut style) {
            return Ok(false);
        }
        tree.set_style(widget, style)?;
        Ok(true)
    }

    /// Display form of a length property of the selection.
    pub fn current_length(&self, tree: &LayoutTree, field: LengthField) -> Result<Option<String>, LayoutError> {
        let Some(widget) = &self.selected else {
            return Ok(None);
        };
        Ok(Some(format_length(field.read(&tree.style(widget)?))))
    }

    /// Display form of a float property of the selection.
    pub fn current_float(&self, tree: &LayoutTree, field: FloatField) -> Result<Option<String>, LayoutError> {
        let Some(widget) = &self.selected else {
            return Ok(None);
        };
        Ok(Some(format_float(field.read(&tree.style(widget)?))))
    }

    // =========================================================================
    // Label properties
    // =========================================================================

    /// Returns false unless a label is selected and its text changed.
    pub fn set_label_text(&self, text: &str) -> bool {
        self.selected.as_ref().is_some_and(|w| w.set_label_text(text))
    }

    pub fn set_label_color(&self, color: Rgba) -> bool {
        self.selected.as_ref().is_some_and(|w| w.set_label_color(color))
    }

    // =========================================================================
    // Overlay
    // =========================================================================

    /// Paint the box model of the hovered (else selected) widget and frame
    /// the selection.
    pub fn overlay(&self, painter: &mut dyn Painter) {
        let colors = self.config.colors;

        let inspected = self
            .hovered
            .as_ref()
            .map(|hit| &hit.widget)
            .or(self.selected.as_ref())
            .and_then(|widget| widget.layout_result());
        if let Some(layout) = inspected {
            let bands = [
                (layout.outer_rect(), layout.rect(), colors.margin),
                (layout.rect(), layout.rect_without_border(), colors.border),
                (layout.rect_without_border(), layout.inner_rect(), colors.padding),
            ];
            for (outer, inner, color) in bands {
                for band in outer.subtract(&inner) {
                    painter.fill_rect(band, color);
                }
            }
            painter.fill_rect(layout.inner_rect(), colors.inner);
        }

        if let Some(layout) = self.selected.as_ref().and_then(|w| w.layout_result()) {
            painter.frame_rect(layout.rect(), colors.selection_frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use taffy::Dimension as TaffyDimension;

    use super::*;
    use crate::layout::text_measure::CellFont;
    use crate::types::Edge;

    fn setup() -> (LayoutTree, TreeEditor, WidgetRef) {
        let root = Widget::container().into_ref();
        let mut tree = LayoutTree::with_root(&root).unwrap();
        tree.calculate_layout(200.0, 200.0).unwrap();
        let editor = TreeEditor::new(Rc::clone(&root));
        (tree, editor, root)
    }

    fn font() -> Rc<dyn GlyphSource> {
        Rc::new(CellFont::default())
    }

    #[test]
    fn test_click_toggles_selection() {
        let (_tree, mut editor, root) = setup();

        let selected = editor.click(Point::new(5.0, 5.0)).cloned();
        assert!(Rc::ptr_eq(&selected.unwrap(), &root));
        assert!(editor.selected_parent().is_none());

        assert!(editor.click(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_click_outside_keeps_selection() {
        let (_tree, mut editor, root) = setup();
        editor.click(Point::new(5.0, 5.0));
        editor.click(Point::new(500.0, 5.0));
        assert!(Rc::ptr_eq(editor.selected().unwrap(), &root));
    }

    #[test]
    fn test_add_children_and_reconstruct() {
        let (mut tree, mut editor, root) = setup();
        editor.select(Rc::clone(&root), None);

        let child = editor.add_child_widget().unwrap();
        let label = editor.add_child_label(font()).unwrap();
        assert!(editor.take_tree_changed());
        assert!(!editor.take_tree_changed());

        tree.construct(&root).unwrap();
        tree.calculate_layout(200.0, 200.0).unwrap();

        let rect = child.layout_result().unwrap().rect();
        assert_eq!((rect.width, rect.height), (100.0, 100.0));
        assert_eq!(label.as_label().unwrap().text(), "Hoge");
        assert_eq!(label.as_label().unwrap().color(), Rgba::BLACK);
    }

    #[test]
    fn test_add_child_requires_accepting_selection() {
        let (_tree, mut editor, root) = setup();
        assert_eq!(editor.add_child_widget().unwrap_err(), TreeError::NoSelection);

        let label = Widget::label("x", Rgba::BLACK, font()).into_ref();
        root.append_child(Rc::clone(&label)).unwrap();
        editor.select(Rc::clone(&label), Some(Rc::clone(&root)));

        assert_eq!(
            editor.add_child_widget().unwrap_err(),
            TreeError::ChildrenNotAllowed(label.id())
        );
        assert_eq!(label.child_count(), 0);
        assert!(!editor.is_tree_changed());
    }

    #[test]
    fn test_remove_selected() {
        let (mut tree, mut editor, root) = setup();
        editor.select(Rc::clone(&root), None);
        let child = editor.add_child_widget().unwrap();
        tree.construct(&root).unwrap();
        tree.calculate_layout(200.0, 200.0).unwrap();
        editor.take_tree_changed();

        let hit_child = editor.click(Point::new(50.0, 50.0)).cloned().unwrap();
        assert!(Rc::ptr_eq(&hit_child, &child));

        let removed = editor.remove_selected().unwrap();
        assert!(Rc::ptr_eq(&removed, &child));
        assert!(editor.selected().is_none());
        assert!(editor.take_tree_changed());
        assert_eq!(root.child_count(), 0);

        editor.select(Rc::clone(&root), None);
        assert_eq!(editor.remove_selected().unwrap_err(), TreeError::NoParent(root.id()));
    }

    #[test]
    fn test_edit_length_through_tree() {
        let (mut tree, mut editor, root) = setup();
        editor.select(Rc::clone(&root), None);

        assert!(editor.edit_length(&mut tree, LengthField::Width, "40").unwrap());
        assert_eq!(tree.style(&root).unwrap().size.width, TaffyDimension::Length(40.0));
        assert_eq!(
            editor.current_length(&tree, LengthField::Width).unwrap().as_deref(),
            Some("40.00")
        );

        assert!(!editor.edit_length(&mut tree, LengthField::Width, "wide").unwrap());
        assert_eq!(tree.style(&root).unwrap().size.width, TaffyDimension::Length(40.0));

        assert!(!editor
            .edit_length(&mut tree, LengthField::Padding(Edge::Left), "auto")
            .unwrap());

        assert!(editor.edit_float(&mut tree, FloatField::FlexGrow, "2").unwrap());
        assert_eq!(
            editor.current_float(&tree, FloatField::FlexGrow).unwrap().as_deref(),
            Some("2.00")
        );

        tree.calculate_layout(200.0, 200.0).unwrap();
        assert_eq!(root.layout_result().unwrap().rect().width, 40.0);
    }

    #[test]
    fn test_edit_without_selection_is_noop() {
        let (mut tree, editor, _root) = setup();
        assert!(!editor.edit_length(&mut tree, LengthField::Width, "10").unwrap());
        assert_eq!(editor.current_length(&tree, LengthField::Width).unwrap(), None);
    }

    #[test]
    fn test_label_properties() {
        let (_tree, mut editor, root) = setup();
        let label = Widget::label("a", Rgba::BLACK, font()).into_ref();
        root.append_child(Rc::clone(&label)).unwrap();

        editor.select(Rc::clone(&root), None);
        assert!(!editor.set_label_text("b"));

        editor.select(Rc::clone(&label), Some(root));
        assert!(editor.set_label_text("b"));
        assert!(editor.set_label_color(Rgba::WHITE));
        assert_eq!(label.as_label().unwrap().text(), "b");
    }
}
