//! Interpolation plans
//!
//! An [`AnimationMap`] is computed once per play step from a [`PropertyBag`]
//! and the target's current state. It holds `from`/`to`/`delta` for every
//! property, split into three groups that are written back differently:
//!
//! - plain styles, written as `value + unit`
//! - transform functions, composed into a single `transform` string
//! - colors, interpolated per RGB channel

use crate::color::Rgb;
use crate::property::{self, PropertyKind};
use crate::request::Direction;
use crate::units::{camel_case, format_number, parse_unit, resolve_relative, UnitValue};
use glide_core::Animatable;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// A single property value: a number or a string with an optional unit
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// The value as style text; numbers are written without a unit
    pub fn to_text(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    fn to_unit_value(&self) -> UnitValue {
        match self {
            Value::Number(n) => UnitValue::number(*n),
            Value::Text(s) => parse_unit(s),
        }
    }

    fn to_rgb(&self) -> Rgb {
        match self {
            Value::Number(n) if *n >= 0.0 && n.is_finite() => Rgb::from_packed(*n as u32),
            Value::Number(_) => Rgb::BLACK,
            Value::Text(s) => Rgb::parse_or_black(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Target of one property: an end value, or an explicit start and end
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Animate from the current value; `+=`, `-=` and `*=` are relative to it
    To(Value),
    /// Animate between two literal values
    Range(Value, Value),
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::To(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::To(n.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::To(n.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::To(s.into())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::To(s.into())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for PropertyValue {
    fn from((from, to): (A, B)) -> Self {
        PropertyValue::Range(from.into(), to.into())
    }
}

impl<T: Into<Value>> From<[T; 2]> for PropertyValue {
    fn from([from, to]: [T; 2]) -> Self {
        PropertyValue::Range(from.into(), to.into())
    }
}

/// A one-element list is the same as a single value
impl<T: Into<Value>> From<[T; 1]> for PropertyValue {
    fn from([to]: [T; 1]) -> Self {
        PropertyValue::To(to.into())
    }
}

/// Insertion-ordered property targets, keyed by camel-cased name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    entries: IndexMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a property (`"background-color"` is stored as `backgroundColor`)
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<PropertyValue>) {
        self.entries.insert(camel_case(name), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (name, value) in iter {
            bag.insert(name.as_ref(), value);
        }
        bag
    }
}

/// Plain style or scroll offset track
#[derive(Clone, Debug, PartialEq)]
pub struct PlainTrack {
    pub from: f64,
    pub to: f64,
    pub delta: f64,
    pub unit: String,
    /// Truncate toward zero before writing
    pub round: bool,
}

/// One transform function track
#[derive(Clone, Debug, PartialEq)]
pub struct TransformTrack {
    pub from: f64,
    pub to: f64,
    pub delta: f64,
    pub unit: String,
}

/// Per-channel color track
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTrack {
    pub from: Rgb,
    pub to: Rgb,
    pub delta: [f64; 3],
}

/// Interpolation plan for one play step
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationMap {
    pub props: IndexMap<String, PlainTrack>,
    pub transform: IndexMap<String, TransformTrack>,
    pub color: IndexMap<String, ColorTrack>,
}

fn transform_function() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\(([^)]*)\)").expect("Invalid transform pattern"))
}

/// Functions of a composed transform string, in order: `[("rotate", "45deg")]`
pub fn parse_transforms(transform: &str) -> Vec<(String, String)> {
    transform_function()
        .captures_iter(transform)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

impl AnimationMap {
    /// Compute the plan for `bag` against the target's current state
    pub fn build(target: &dyn Animatable, bag: &PropertyBag, direction: Direction) -> Self {
        let mut map = AnimationMap::default();
        let transforms = target
            .transform()
            .map(|t| parse_transforms(&t))
            .unwrap_or_default();

        for (name, value) in bag.iter() {
            let kind = PropertyKind::of(name);

            if kind == PropertyKind::Color {
                let (mut from, mut to) = match value {
                    PropertyValue::To(to) => {
                        let from = target
                            .computed_color(name)
                            .map_or(Rgb::BLACK, |c| Rgb::parse_or_black(&c));
                        (from, to.to_rgb())
                    }
                    PropertyValue::Range(from, to) => (from.to_rgb(), to.to_rgb()),
                };
                if direction == Direction::Reverse {
                    std::mem::swap(&mut from, &mut to);
                }
                let delta = from.delta(&to);
                map.color
                    .insert(name.to_string(), ColorTrack { from, to, delta });
                continue;
            }

            let (mut from, mut to) = match value {
                PropertyValue::To(to) => {
                    let from = current_value(target, name, kind, &transforms);
                    let to = parse_unit(&resolve_relative(&to.to_text(), from.value));
                    (from, to)
                }
                PropertyValue::Range(from, to) => (from.to_unit_value(), to.to_unit_value()),
            };

            from.value = property::reverse_start(name, from.value, to.value);

            if direction == Direction::Reverse {
                std::mem::swap(&mut from, &mut to);
            }

            let unit = if target.is_element() && to.unit.is_empty() && kind == PropertyKind::Plain
            {
                "px".to_string()
            } else {
                to.unit
            };
            let delta = to.value - from.value;

            if kind == PropertyKind::Transform {
                map.transform.insert(
                    name.to_string(),
                    TransformTrack {
                        from: from.value,
                        to: to.value,
                        delta,
                        unit,
                    },
                );
            } else {
                map.props.insert(
                    name.to_string(),
                    PlainTrack {
                        from: from.value,
                        to: to.value,
                        delta,
                        unit,
                        round: !property::is_float(name),
                    },
                );
            }
        }

        map
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.transform.is_empty() && self.color.is_empty()
    }

    /// Write every track at eased progress `p`
    pub fn apply(&self, target: &mut dyn Animatable, p: f64) {
        self.apply_props(target, p);
        if !self.transform.is_empty() {
            self.apply_transform(target, p);
        }
        self.apply_colors(target, p);
    }

    fn apply_props(&self, target: &mut dyn Animatable, p: f64) {
        for (name, track) in &self.props {
            let mut value = track.from + track.delta * p;
            if !value.is_finite() {
                trace!("Skipping non-finite value for `{}`", name);
                continue;
            }
            if track.round {
                value = value.trunc();
            }

            match property::scroll_axis(name) {
                Some(axis) => target.set_scroll_offset(axis, value),
                None => target.set_style(name, &format!("{}{}", format_number(value), track.unit)),
            }
        }
    }

    fn apply_transform(&self, target: &mut dyn Animatable, p: f64) {
        let existing = target
            .transform()
            .map(|t| parse_transforms(&t))
            .unwrap_or_default();
        let mut functions = Vec::with_capacity(self.transform.len() + existing.len());

        for (name, track) in &self.transform {
            let unit = property::transform_unit(name, &track.unit);
            let value = if unit == "turn" {
                track.to * p
            } else {
                track.from + track.delta * p
            };

            if value.is_finite() {
                functions.push(format!("{}({}{})", name, format_number(value), unit));
            } else if let Some((_, args)) = existing.iter().find(|(fname, _)| fname == name) {
                trace!("Keeping `{}` unchanged, value is not finite", name);
                functions.push(format!("{}({})", name, args));
            } else {
                trace!("Skipping non-finite transform `{}`", name);
            }
        }

        for (name, args) in &existing {
            if !self.transform.contains_key(name) {
                functions.push(format!("{}({})", name, args));
            }
        }

        target.set_transform(&functions.join(" "));
    }

    fn apply_colors(&self, target: &mut dyn Animatable, p: f64) {
        for (name, track) in &self.color {
            let rgb = track.from.step(&track.delta, p);
            target.set_style(name, &rgb.to_string());
        }
    }
}

/// Starting value of a non-color property on the target
fn current_value(
    target: &dyn Animatable,
    name: &str,
    kind: PropertyKind,
    transforms: &[(String, String)],
) -> UnitValue {
    if kind == PropertyKind::Transform {
        return transforms
            .iter()
            .find(|(fname, _)| fname == name)
            .map_or_else(|| UnitValue::number(0.0), |(_, args)| parse_unit(args));
    }
    if let Some(axis) = property::scroll_axis(name) {
        return UnitValue::number(target.scroll_offset(axis));
    }
    target
        .style(name)
        .map_or_else(|| UnitValue::number(0.0), |value| parse_unit(&value))
}
