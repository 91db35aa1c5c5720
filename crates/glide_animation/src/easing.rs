//! Easing functions for animations
//!
//! Every curve family is defined by its ease-in shape; the out and in-out
//! variants are derived from it:
//!
//! - `easeOut(t) = 1 - easeIn(1 - t)`
//! - `easeInOut(t) = easeIn(2t) / 2` below the midpoint, else
//!   `1 - easeIn(2 - 2t) / 2`
//!
//! Names follow the call-style form used in configs and requests, e.g.
//! `"easeOutCubic"` or `"easeInElastic(2, .3)"`.

use crate::error::{AnimationError, Result};
use crate::units::parse_float;
use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::warn;

/// Caller-supplied easing curve
pub type EasingFn = Rc<dyn Fn(f64) -> f64>;

/// Elastic amplitude used when none is given
pub const DEFAULT_ELASTIC_AMPLITUDE: f64 = 1.0;
/// Elastic period used when none is given
pub const DEFAULT_ELASTIC_PERIOD: f64 = 0.5;

/// Curve families, each described by its ease-in shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EaseFamily {
    Sine,
    Circ,
    Back,
    Bounce,
    /// Amplitude is clamped to `[1, 10]`, period to `[0.1, 2]`
    Elastic { amplitude: f64, period: f64 },
    Quad,
    Cubic,
    Quart,
    Quint,
    /// Sixth power
    Expo,
}

impl EaseFamily {
    /// Every family, elastic with its default parameters
    pub const ALL: [EaseFamily; 10] = [
        EaseFamily::Sine,
        EaseFamily::Circ,
        EaseFamily::Back,
        EaseFamily::Bounce,
        EaseFamily::Elastic {
            amplitude: DEFAULT_ELASTIC_AMPLITUDE,
            period: DEFAULT_ELASTIC_PERIOD,
        },
        EaseFamily::Quad,
        EaseFamily::Cubic,
        EaseFamily::Quart,
        EaseFamily::Quint,
        EaseFamily::Expo,
    ];

    /// Elastic family with default amplitude and period
    pub const fn elastic() -> Self {
        EaseFamily::Elastic {
            amplitude: DEFAULT_ELASTIC_AMPLITUDE,
            period: DEFAULT_ELASTIC_PERIOD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EaseFamily::Sine => "Sine",
            EaseFamily::Circ => "Circ",
            EaseFamily::Back => "Back",
            EaseFamily::Bounce => "Bounce",
            EaseFamily::Elastic { .. } => "Elastic",
            EaseFamily::Quad => "Quad",
            EaseFamily::Cubic => "Cubic",
            EaseFamily::Quart => "Quart",
            EaseFamily::Quint => "Quint",
            EaseFamily::Expo => "Expo",
        }
    }

    /// Look up a family by name; elastic takes up to two numeric arguments
    fn from_name(name: &str, args: &[f64]) -> Option<Self> {
        let family = match name {
            "Sine" => EaseFamily::Sine,
            "Circ" => EaseFamily::Circ,
            "Back" => EaseFamily::Back,
            "Bounce" => EaseFamily::Bounce,
            "Elastic" => {
                let arg = |i: usize, default: f64| {
                    args.get(i)
                        .copied()
                        .filter(|v| !v.is_nan())
                        .unwrap_or(default)
                };
                EaseFamily::Elastic {
                    amplitude: arg(0, DEFAULT_ELASTIC_AMPLITUDE),
                    period: arg(1, DEFAULT_ELASTIC_PERIOD),
                }
            }
            "Quad" => EaseFamily::Quad,
            "Cubic" => EaseFamily::Cubic,
            "Quart" => EaseFamily::Quart,
            "Quint" => EaseFamily::Quint,
            "Expo" => EaseFamily::Expo,
            _ => return None,
        };
        Some(family)
    }

    /// The ease-in curve of this family
    pub fn ease_in(&self, t: f64) -> f64 {
        match *self {
            EaseFamily::Sine => 1.0 - (t * PI / 2.0).cos(),
            EaseFamily::Circ => 1.0 - (1.0 - t * t).sqrt(),
            EaseFamily::Back => t * t * (3.0 * t - 2.0),
            EaseFamily::Bounce => bounce_in(t),
            EaseFamily::Elastic { amplitude, period } => elastic_in(t, amplitude, period),
            EaseFamily::Quad => t.powi(2),
            EaseFamily::Cubic => t.powi(3),
            EaseFamily::Quart => t.powi(4),
            EaseFamily::Quint => t.powi(5),
            EaseFamily::Expo => t.powi(6),
        }
    }
}

/// Piecewise parabola: pick the bounce segment, then its arc
fn bounce_in(t: f64) -> f64 {
    let mut b = 4;
    let mut pow2;
    loop {
        b -= 1;
        pow2 = 2f64.powi(b);
        if b <= 0 || t >= (pow2 - 1.0) / 11.0 {
            break;
        }
    }
    1.0 / 4f64.powi(3 - b) - 7.5625 * ((pow2 * 3.0 - 2.0) / 22.0 - t).powi(2)
}

fn elastic_in(t: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let a = amplitude.clamp(1.0, 10.0);
    let p = period.clamp(0.1, 2.0);
    let shift = p / (PI * 2.0) * (1.0 / a).asin();
    -a * 2f64.powf(10.0 * (t - 1.0)) * (((t - 1.0) - shift) * (PI * 2.0) / p).sin()
}

/// Easing curve applied to the elapsed time fraction
#[derive(Clone, Default)]
pub enum Easing {
    #[default]
    Linear,
    In(EaseFamily),
    Out(EaseFamily),
    InOut(EaseFamily),
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
    /// Caller-supplied curve
    Custom(EasingFn),
}

impl Easing {
    /// Apply the easing function to a time fraction (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::In(family) => family.ease_in(t),
            Easing::Out(family) => 1.0 - family.ease_in(1.0 - t),
            Easing::InOut(family) => {
                if t < 0.5 {
                    family.ease_in(t * 2.0) / 2.0
                } else {
                    1.0 - family.ease_in(t * -2.0 + 2.0) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }

    /// Wrap a closure as an easing curve
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    /// Parse a call-style easing name such as `easeOutElastic(2, .3)`.
    ///
    /// Returns `None` for names that are not registered.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (name, args) = match input.find('(') {
            Some(open) => {
                let inner = input[open + 1..].trim_end();
                let inner = inner.strip_suffix(')').unwrap_or(inner);
                let args: Vec<f64> = inner
                    .split(',')
                    .filter(|arg| !arg.trim().is_empty())
                    .map(parse_float)
                    .collect();
                (input[..open].trim(), args)
            }
            None => (input, Vec::new()),
        };

        match name {
            "linear" | "default" => return Some(Easing::Linear),
            "cubicBezier" => {
                return match args.as_slice() {
                    &[x1, y1, x2, y2] => Some(Easing::CubicBezier(x1, y1, x2, y2)),
                    _ => None,
                };
            }
            _ => {}
        }

        // `easeInOut` shares its prefix with `easeIn`
        if let Some(family) = name.strip_prefix("easeInOut") {
            EaseFamily::from_name(family, &args).map(Easing::InOut)
        } else if let Some(family) = name.strip_prefix("easeIn") {
            EaseFamily::from_name(family, &args).map(Easing::In)
        } else if let Some(family) = name.strip_prefix("easeOut") {
            EaseFamily::from_name(family, &args).map(Easing::Out)
        } else {
            None
        }
    }

    /// Look up an easing by name, falling back to linear with a warning
    pub fn named(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("Unknown easing `{}`, falling back to linear", name);
            Easing::Linear
        })
    }

    /// Every registered easing name
    pub fn names() -> Vec<String> {
        let mut names = vec!["linear".to_string(), "default".to_string()];
        for family in EaseFamily::ALL {
            for prefix in ["easeIn", "easeOut", "easeInOut"] {
                names.push(format!("{}{}", prefix, family.name()));
            }
        }
        names
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| AnimationError::UnknownEasing(s.to_string()))
    }
}

impl From<&str> for Easing {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<EasingFn> for Easing {
    fn from(f: EasingFn) -> Self {
        Easing::Custom(f)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => write!(f, "Linear"),
            Easing::In(family) => f.debug_tuple("In").field(family).finish(),
            Easing::Out(family) => f.debug_tuple("Out").field(family).finish(),
            Easing::InOut(family) => f.debug_tuple("InOut").field(family).finish(),
            Easing::CubicBezier(x1, y1, x2, y2) => f
                .debug_tuple("CubicBezier")
                .field(x1)
                .field(y1)
                .field(x2)
                .field(y2)
                .finish(),
            Easing::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Cubic bezier easing matching browser `cubic-bezier()` timing.
///
/// Newton-Raphson on the x curve, binary search when the slope is too flat.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    p = t;
    for _ in 0..20 {
        let x = bezier_sample(p, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
