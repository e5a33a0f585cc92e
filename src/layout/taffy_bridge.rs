//! Taffy Bridge - Integration with the Taffy layout engine
//!
//! Converts style lengths between the crate's [`Dimension`] and Taffy's
//! length types, translates Taffy's sizing inputs into the three measure
//! modes leaf widgets understand, and snapshots Taffy's per-node output.

use taffy::style_helpers::fr;
use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display, LengthPercentage, LengthPercentageAuto,
    Size, Style,
};

use crate::types::{Dimension, Rect, Thickness};

use super::node::NodeContext;
use super::text_measure::{MeasureMode, SizeConstraints};

// =============================================================================
// DIMENSION CONVERSION
// =============================================================================

/// Convert our Dimension to Taffy's Dimension. Undefined means auto.
pub fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Undefined | Dimension::Auto => TaffyDimension::Auto,
        Dimension::Points(n) => TaffyDimension::Length(n),
        Dimension::Percent(p) => TaffyDimension::Percent(p),
    }
}

/// Convert our Dimension to Taffy's LengthPercentageAuto.
///
/// `undefined` is the property's own default (zero for margins, auto for
/// insets).
pub fn to_taffy_lpa(dim: Dimension, undefined: LengthPercentageAuto) -> LengthPercentageAuto {
    match dim {
        Dimension::Undefined => undefined,
        Dimension::Auto => LengthPercentageAuto::Auto,
        Dimension::Points(n) => LengthPercentageAuto::Length(n),
        Dimension::Percent(p) => LengthPercentageAuto::Percent(p),
    }
}

/// Convert our Dimension to Taffy's LengthPercentage (padding, border).
///
/// Returns `None` for auto, which these properties cannot hold.
pub fn to_taffy_lp(dim: Dimension) -> Option<LengthPercentage> {
    match dim {
        Dimension::Undefined => Some(LengthPercentage::Length(0.0)),
        Dimension::Auto => None,
        Dimension::Points(n) => Some(LengthPercentage::Length(n)),
        Dimension::Percent(p) => Some(LengthPercentage::Percent(p)),
    }
}

pub fn from_taffy_dimension(dim: TaffyDimension) -> Dimension {
    match dim {
        TaffyDimension::Auto => Dimension::Auto,
        TaffyDimension::Length(n) => Dimension::Points(n),
        TaffyDimension::Percent(p) => Dimension::Percent(p),
    }
}

pub fn from_taffy_lpa(dim: LengthPercentageAuto) -> Dimension {
    match dim {
        LengthPercentageAuto::Auto => Dimension::Auto,
        LengthPercentageAuto::Length(n) => Dimension::Points(n),
        LengthPercentageAuto::Percent(p) => Dimension::Percent(p),
    }
}

pub fn from_taffy_lp(dim: LengthPercentage) -> Dimension {
    match dim {
        LengthPercentage::Length(n) => Dimension::Points(n),
        LengthPercentage::Percent(p) => Dimension::Percent(p),
    }
}

// =============================================================================
// MEASUREMENT
// =============================================================================

fn axis_constraint(known: Option<f32>, available: AvailableSpace) -> (f32, MeasureMode) {
    if let Some(size) = known {
        return (size, MeasureMode::Exactly);
    }
    match available {
        AvailableSpace::Definite(size) => (size, MeasureMode::AtMost),
        AvailableSpace::MaxContent => (f32::INFINITY, MeasureMode::Undefined),
        // Zero automatic minimum: a flex item may shrink below its content.
        AvailableSpace::MinContent => (0.0, MeasureMode::AtMost),
    }
}

/// Map Taffy's sizing inputs onto measure modes.
///
/// | Taffy input        | mode      | value      |
/// |--------------------|-----------|------------|
/// | known dimension    | Exactly   | the known  |
/// | `Definite(n)`      | AtMost    | n          |
/// | `MaxContent`       | Undefined | infinity   |
/// | `MinContent`       | AtMost    | 0          |
pub fn sizing_constraints(known: Size<Option<f32>>, available: Size<AvailableSpace>) -> SizeConstraints {
    let (width, width_mode) = axis_constraint(known.width, available.width);
    let (height, height_mode) = axis_constraint(known.height, available.height);
    SizeConstraints {
        width,
        width_mode,
        height,
        height_mode,
    }
}

/// Measure function handed to Taffy for every leaf with a context.
///
/// Leaves without a measure hook (empty containers) size to their known
/// dimensions, or zero.
pub(crate) fn measure_leaf(
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
    context: Option<&mut NodeContext>,
) -> Size<f32> {
    let fallback = Size {
        width: known.width.unwrap_or(0.0),
        height: known.height.unwrap_or(0.0),
    };

    let Some(context) = context else {
        return fallback;
    };
    let Some(measure) = context.hooks.measure else {
        return fallback;
    };
    let Some(widget) = context.widget() else {
        return fallback;
    };

    let size = measure(&widget, sizing_constraints(known, available));
    Size {
        width: known.width.unwrap_or(size.width),
        height: known.height.unwrap_or(size.height),
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// One node's box metrics as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    /// Position relative to the parent's border-box origin, and size.
    pub local_rect: Rect,
    pub margin: Thickness,
    pub border: Thickness,
    pub padding: Thickness,
}

fn thickness(edges: taffy::Rect<f32>) -> Thickness {
    Thickness::new(edges.left, edges.top, edges.right, edges.bottom)
}

impl From<&taffy::Layout> for BoxMetrics {
    fn from(layout: &taffy::Layout) -> Self {
        Self {
            local_rect: Rect::new(
                layout.location.x,
                layout.location.y,
                layout.size.width,
                layout.size.height,
            ),
            margin: thickness(layout.margin),
            border: thickness(layout.border),
            padding: thickness(layout.padding),
        }
    }
}

// =============================================================================
// VIEWPORT
// =============================================================================

/// Style of the private node the root is laid out in.
///
/// A single `1fr` grid cell of the requested size: an auto-sized root
/// stretches to fill it, an explicitly sized root keeps its size.
pub(crate) fn viewport_style(width: f32, height: f32) -> Style {
    Style {
        display: Display::Grid,
        size: Size {
            width: TaffyDimension::Length(width),
            height: TaffyDimension::Length(height),
        },
        grid_template_columns: vec![fr(1.0)],
        grid_template_rows: vec![fr(1.0)],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_conversion() {
        assert_eq!(to_taffy_dimension(Dimension::Undefined), TaffyDimension::Auto);
        assert_eq!(to_taffy_dimension(Dimension::Points(4.0)), TaffyDimension::Length(4.0));
        assert_eq!(to_taffy_dimension(Dimension::Percent(0.5)), TaffyDimension::Percent(0.5));

        assert_eq!(from_taffy_dimension(TaffyDimension::Auto), Dimension::Auto);
        assert_eq!(from_taffy_dimension(TaffyDimension::Length(3.0)), Dimension::Points(3.0));
    }

    #[test]
    fn test_edge_conversion_defaults() {
        let zero = LengthPercentageAuto::Length(0.0);
        assert_eq!(to_taffy_lpa(Dimension::Undefined, zero), zero);
        assert_eq!(
            to_taffy_lpa(Dimension::Undefined, LengthPercentageAuto::Auto),
            LengthPercentageAuto::Auto
        );
        assert_eq!(to_taffy_lpa(Dimension::Auto, zero), LengthPercentageAuto::Auto);

        assert_eq!(to_taffy_lp(Dimension::Auto), None);
        assert_eq!(to_taffy_lp(Dimension::Undefined), Some(LengthPercentage::Length(0.0)));
        assert_eq!(from_taffy_lp(LengthPercentage::Percent(0.25)), Dimension::Percent(0.25));
    }

    #[test]
    fn test_sizing_constraints() {
        let constraints = sizing_constraints(
            Size { width: Some(10.0), height: None },
            Size {
                width: AvailableSpace::MaxContent,
                height: AvailableSpace::Definite(30.0),
            },
        );
        assert_eq!(constraints.width, 10.0);
        assert_eq!(constraints.width_mode, MeasureMode::Exactly);
        assert_eq!(constraints.height, 30.0);
        assert_eq!(constraints.height_mode, MeasureMode::AtMost);

        let constraints = sizing_constraints(
            Size { width: None, height: None },
            Size {
                width: AvailableSpace::MaxContent,
                height: AvailableSpace::MinContent,
            },
        );
        assert_eq!(constraints.width_mode, MeasureMode::Undefined);
        assert_eq!(constraints.wrap_width(), f32::INFINITY);
        assert_eq!(constraints.height, 0.0);
        assert_eq!(constraints.height_mode, MeasureMode::AtMost);
    }

    #[test]
    fn test_measure_leaf_without_context() {
        let size = measure_leaf(
            Size { width: Some(5.0), height: None },
            Size {
                width: AvailableSpace::MaxContent,
                height: AvailableSpace::MaxContent,
            },
            None,
        );
        assert_eq!(size, Size { width: 5.0, height: 0.0 });
    }
}
