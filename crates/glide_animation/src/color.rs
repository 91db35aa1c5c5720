//! RGB colors for color property interpolation
//!
//! Start values come from computed styles (`rgb(12, 34, 56)`), end values
//! are usually hex strings (`#ff8800`, `#f80`) or packed `0xRRGGBB` numbers.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// An RGB color with unclamped channels so deltas can be negative
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

fn not_color_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d.,]").expect("Invalid color pattern"))
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create from a packed `0xRRGGBB` value
    pub fn from_packed(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as f64,
            ((hex >> 8) & 0xFF) as f64,
            (hex & 0xFF) as f64,
        )
    }

    /// Parse `#rrggbb`, `#rgb`, or a functional `rgb(..)`/`rgba(..)` string.
    ///
    /// The functional form keeps only digits, dots and commas before
    /// splitting, so alpha is dropped.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.contains('(') || input.contains(',') {
            Self::parse_functional(input)
        } else {
            Self::parse_hex(input)
        }
    }

    /// Parse, falling back to black for anything unreadable
    pub fn parse_or_black(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            debug!("Unparseable color `{}`, using black", input);
            Self::BLACK
        })
    }

    fn parse_functional(input: &str) -> Option<Self> {
        let digits = not_color_digits().replace_all(input, "");
        let mut channels = digits.split(',').map(|part| part.parse::<f64>().ok());
        let r = channels.next()??;
        let g = channels.next()??;
        let b = channels.next()??;
        Some(Self::new(r, g, b))
    }

    fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        u32::from_str_radix(&expanded, 16).ok().map(Self::from_packed)
    }

    /// Per-channel difference `to - self`
    pub fn delta(&self, to: &Rgb) -> [f64; 3] {
        [to.r - self.r, to.g - self.g, to.b - self.b]
    }

    /// Step from `self` by `delta * p`, flooring each channel
    pub fn step(&self, delta: &[f64; 3], p: f64) -> Rgb {
        Rgb::new(
            (self.r + delta[0] * p).floor(),
            (self.g + delta[1] * p).floor(),
            (self.b + delta[2] * p).floor(),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}
