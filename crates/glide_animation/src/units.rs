//! Value and unit parsing
//!
//! Style values arrive as numbers or strings such as `"10px"`, `"1.5em"`,
//! `"45deg"` or relative increments like `"+=50px"`. Parsing never fails:
//! anything without a leading number has a NaN magnitude, and the apply step
//! leaves such properties untouched.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Units recognized after a number when resolving relative increments
pub const UNITS: &[&str] = &[
    "%", "px", "pt", "em", "rem", "in", "cm", "mm", "ex", "ch", "pc", "vw", "vh", "vmin", "vmax",
    "deg", "rad", "turn",
];

/// A numeric magnitude with an optional unit suffix
#[derive(Clone, Debug, PartialEq)]
pub struct UnitValue {
    pub value: f64,
    pub unit: String,
}

impl UnitValue {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// A unitless magnitude
    pub fn number(value: f64) -> Self {
        Self::new(value, "")
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit)
    }
}

fn number_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("Invalid number pattern")
    })
}

fn unit_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^[\d.\-+]*\s*(.*)$").expect("Invalid unit pattern"))
}

fn unit_suffix_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"[+-]?\d*\.?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?({})?$",
            UNITS.join("|")
        );
        Regex::new(&pattern).expect("Invalid unit suffix pattern")
    })
}

/// Leading-number parse: `"12.5px"` is 12.5, `"px"` is NaN
pub fn parse_float(input: &str) -> f64 {
    number_prefix()
        .find(input)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Split a value into magnitude and unit: `"-20%"` is `(-20, "%")`
pub fn parse_unit(input: &str) -> UnitValue {
    let unit = unit_tail()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());
    UnitValue::new(parse_float(input), unit)
}

/// The recognized unit at the end of a numeric string, if any
pub fn unit_suffix(input: &str) -> Option<&str> {
    unit_suffix_pattern()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve `+=`, `-=` and `*=` increments against a reference magnitude.
///
/// `"+=50px"` against 10 becomes `"60px"`; `"*=2"` against 10 becomes
/// `"20"`. Values without an operator are returned unchanged.
pub fn resolve_relative(value: &str, from: f64) -> String {
    let Some(op) = ["+=", "-=", "*="]
        .into_iter()
        .find(|op| value.starts_with(op))
    else {
        return value.to_string();
    };

    let operand = parse_float(&value[op.len()..]);
    let unit = unit_suffix(value).unwrap_or("");
    let resolved = match op {
        "+=" => from + operand,
        "-=" => from - operand,
        _ => from * operand,
    };

    format!("{}{}", format_number(resolved), unit)
}

/// Format a magnitude the way style values are written (`1`, `0.5`, never `-0`)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// `background-color` to `backgroundColor`
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
