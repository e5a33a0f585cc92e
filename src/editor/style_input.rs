//! Style input parsing and formatting.
//!
//! Lengths are typed as text:
//! - `""` or `undefined` - unset (the property's default)
//! - `auto`
//! - `N%` - percent of the containing block
//! - `N` - points
//!
//! Surrounding whitespace is ignored. Anything else is rejected.

use taffy::{LengthPercentageAuto, Style};

use crate::error::ParseLengthError;
use crate::layout::taffy_bridge::{
    from_taffy_dimension, from_taffy_lp, from_taffy_lpa, to_taffy_dimension, to_taffy_lp, to_taffy_lpa,
};
use crate::types::{Dimension, Edge};

fn parse_number(text: &str, input: &str) -> Result<f32, ParseLengthError> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseLengthError {
            input: input.to_string(),
        })
}

/// Parse a typed style length.
pub fn parse_length(input: &str) -> Result<Dimension, ParseLengthError> {
    let text = input.trim();
    match text {
        "" | "undefined" => Ok(Dimension::Undefined),
        "auto" => Ok(Dimension::Auto),
        _ => match text.strip_suffix('%') {
            Some(percent) => Ok(Dimension::Percent(parse_number(percent, input)? / 100.0)),
            None => Ok(Dimension::Points(parse_number(text, input)?)),
        },
    }
}

/// Parse a typed float; empty or `undefined` means unset.
pub fn parse_float(input: &str) -> Result<Option<f32>, ParseLengthError> {
    match input.trim() {
        "" | "undefined" => Ok(None),
        text => parse_number(text, input).map(Some),
    }
}

/// Display form of a length: `""`, `auto`, `12.00`, `50.00%`.
pub fn format_length(value: Dimension) -> String {
    value.to_string()
}

/// Display form of a float: `""` when unset, two decimals otherwise.
pub fn format_float(value: Option<f32>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

// =============================================================================
// FIELDS
// =============================================================================

/// Length-valued style properties the editor can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthField {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    FlexBasis,
    Margin(Edge),
    Padding(Edge),
    Border(Edge),
    Inset(Edge),
}

/// Float-valued style properties the editor can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatField {
    FlexGrow,
    FlexShrink,
    AspectRatio,
}

fn edge<T>(rect: &taffy::Rect<T>, edge: Edge) -> &T {
    match edge {
        Edge::Left => &rect.left,
        Edge::Top => &rect.top,
        Edge::Right => &rect.right,
        Edge::Bottom => &rect.bottom,
    }
}

fn edge_mut<T>(rect: &mut taffy::Rect<T>, edge: Edge) -> &mut T {
    match edge {
        Edge::Left => &mut rect.left,
        Edge::Top => &mut rect.top,
        Edge::Right => &mut rect.right,
        Edge::Bottom => &mut rect.bottom,
    }
}

impl LengthField {
    pub fn read(self, style: &Style) -> Dimension {
        match self {
            LengthField::Width => from_taffy_dimension(style.size.width),
            LengthField::Height => from_taffy_dimension(style.size.height),
            LengthField::MinWidth => from_taffy_dimension(style.min_size.width),
            LengthField::MinHeight => from_taffy_dimension(style.min_size.height),
            LengthField::MaxWidth => from_taffy_dimension(style.max_size.width),
            LengthField::MaxHeight => from_taffy_dimension(style.max_size.height),
            LengthField::FlexBasis => from_taffy_dimension(style.flex_basis),
            LengthField::Margin(e) => from_taffy_lpa(*edge(&style.margin, e)),
            LengthField::Padding(e) => from_taffy_lp(*edge(&style.padding, e)),
            LengthField::Border(e) => from_taffy_lp(*edge(&style.border, e)),
            LengthField::Inset(e) => from_taffy_lpa(*edge(&style.inset, e)),
        }
    }

    /// Store `value`; returns false if the property cannot hold it.
    pub fn write(self, style: &mut Style, value: Dimension) -> bool {
        let zero = LengthPercentageAuto::Length(0.0);
        match self {
            LengthField::Width => style.size.width = to_taffy_dimension(value),
            LengthField::Height => style.size.height = to_taffy_dimension(value),
            LengthField::MinWidth => style.min_size.width = to_taffy_dimension(value),
            LengthField::MinHeight => style.min_size.height = to_taffy_dimension(value),
            LengthField::MaxWidth => style.max_size.width = to_taffy_dimension(value),
            LengthField::MaxHeight => style.max_size.height = to_taffy_dimension(value),
            LengthField::FlexBasis => style.flex_basis = to_taffy_dimension(value),
            LengthField::Margin(e) => *edge_mut(&mut style.margin, e) = to_taffy_lpa(value, zero),
            LengthField::Inset(e) => {
                *edge_mut(&mut style.inset, e) = to_taffy_lpa(value, LengthPercentageAuto::Auto)
            }
            LengthField::Padding(e) => match to_taffy_lp(value) {
                Some(lp) => *edge_mut(&mut style.padding, e) = lp,
                None => return false,
            },
            LengthField::Border(e) => match to_taffy_lp(value) {
                Some(lp) => *edge_mut(&mut style.border, e) = lp,
                None => return false,
            },
        }
        true
    }
}

impl FloatField {
    pub fn read(self, style: &Style) -> Option<f32> {
        match self {
            FloatField::FlexGrow => Some(style.flex_grow),
            FloatField::FlexShrink => Some(style.flex_shrink),
            FloatField::AspectRatio => style.aspect_ratio,
        }
    }

    /// Store `value`; unset restores the property's default.
    pub fn write(self, style: &mut Style, value: Option<f32>) {
        match self {
            FloatField::FlexGrow => style.flex_grow = value.unwrap_or(0.0),
            FloatField::FlexShrink => style.flex_shrink = value.unwrap_or(1.0),
            FloatField::AspectRatio => style.aspect_ratio = value,
        }
    }
}
