//! Property classification
//!
//! Decides how a property name is read, interpolated and written back.

use glide_core::ScrollAxis;

/// Transform functions composed into the `transform` style
pub const TRANSFORM_PROPS: &[&str] = &[
    "translateX",
    "translateY",
    "translateZ",
    "rotate",
    "rotateX",
    "rotateY",
    "rotateZ",
    "scale",
    "scaleX",
    "scaleY",
    "scaleZ",
    "skew",
    "skewX",
    "skewY",
];

/// Unitless numeric properties
pub const NUMBER_PROPS: &[&str] = &["opacity", "zIndex"];

/// Properties written without integer truncation
pub const FLOAT_PROPS: &[&str] = &["opacity", "volume"];

/// Properties read and written through the scroll offset path
pub const SCROLL_PROPS: &[&str] = &["scrollLeft", "scrollTop"];

/// RGB color properties
pub const COLOR_PROPS: &[&str] = &["backgroundColor", "color"];

/// Properties whose start value flips when it equals the end value
pub const REVERSE_PROPS: &[&str] = &["opacity"];

/// How a property is interpolated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Plain style value; unitless lengths on elements become pixels
    Plain,
    /// Unitless number (opacity, stacking order)
    Number,
    /// One function of the composed transform
    Transform,
    /// RGB color, interpolated per channel
    Color,
}

impl PropertyKind {
    /// Classify a camel-cased property name
    pub fn of(name: &str) -> Self {
        if TRANSFORM_PROPS.contains(&name) {
            PropertyKind::Transform
        } else if NUMBER_PROPS.contains(&name) {
            PropertyKind::Number
        } else if COLOR_PROPS.contains(&name) {
            PropertyKind::Color
        } else {
            PropertyKind::Plain
        }
    }
}

/// Whether values are written unrounded
pub fn is_float(name: &str) -> bool {
    FLOAT_PROPS.contains(&name)
}

/// Scroll axis for `scrollLeft` / `scrollTop`
pub fn scroll_axis(name: &str) -> Option<ScrollAxis> {
    match name {
        "scrollLeft" => Some(ScrollAxis::Horizontal),
        "scrollTop" => Some(ScrollAxis::Vertical),
        _ => None,
    }
}

/// Start value for a same-value animation of a reverse-by-default property.
///
/// Only opacity is in the set: animating opacity from 1 to 1 starts at 0
/// instead, and from 0 to 0 starts at 1, so a fade is always visible. Other
/// properties keep their start value.
pub fn reverse_start(name: &str, from: f64, to: f64) -> f64 {
    if REVERSE_PROPS.contains(&name) && from == to {
        if to > 0.0 {
            0.0
        } else {
            1.0
        }
    } else {
        from
    }
}

/// Unit a transform function is written with
///
/// Rotations and skews default to degrees, scales are unitless and
/// translations are always pixels.
pub fn transform_unit<'a>(name: &str, unit: &'a str) -> &'a str {
    if name.contains("rotate") || name.contains("skew") {
        if unit.is_empty() {
            "deg"
        } else {
            unit
        }
    } else if name.contains("scale") {
        ""
    } else {
        "px"
    }
}
