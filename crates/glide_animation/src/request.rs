//! Animation requests
//!
//! An [`AnimationRequest`] describes one run: what to animate, how to draw
//! each frame, and how the run is timed and repeated.

use crate::easing::Easing;
use crate::map::PropertyBag;
use glide_core::{Animatable, ElementRef};
use std::fmt;
use std::rc::Rc;

/// Custom per-frame draw, called with `(target, t, p)`
pub type DrawFn = Rc<dyn Fn(&mut dyn Animatable, f64, f64)>;

/// Per-frame observer, called after each draw with `(target, t, p)`
pub type FrameFn = Rc<dyn Fn(&mut dyn Animatable, f64, f64)>;

/// Completion callback
pub type DoneFn = Rc<dyn Fn(&ElementRef)>;

/// What to animate
#[derive(Clone)]
pub enum Target {
    Element(ElementRef),
    /// Resolved through the animator's document when the run starts
    Selector(String),
}

impl From<ElementRef> for Target {
    fn from(element: ElementRef) -> Self {
        Target::Element(element)
    }
}

impl From<&ElementRef> for Target {
    fn from(element: &ElementRef) -> Self {
        Target::Element(element.clone())
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Element(_) => write!(f, "Element(..)"),
            Target::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
        }
    }
}

/// How each frame is drawn
#[derive(Clone)]
pub enum Draw {
    /// Interpolate a property bag
    Properties(PropertyBag),
    /// Call a function with the time fraction and eased progress
    Custom(DrawFn),
}

impl From<PropertyBag> for Draw {
    fn from(bag: PropertyBag) -> Self {
        Draw::Properties(bag)
    }
}

impl fmt::Debug for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Draw::Properties(bag) => f.debug_tuple("Properties").field(bag).finish(),
            Draw::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Repetition of a single run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    #[default]
    Off,
    Infinite,
    /// Total number of plays
    Count(u32),
}

impl LoopMode {
    pub fn is_off(&self) -> bool {
        matches!(self, LoopMode::Off)
    }
}

impl From<bool> for LoopMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            LoopMode::Infinite
        } else {
            LoopMode::Off
        }
    }
}

impl From<u32> for LoopMode {
    fn from(count: u32) -> Self {
        match count {
            0 => LoopMode::Off,
            n => LoopMode::Count(n),
        }
    }
}

/// Play direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    /// Normal then reverse; each loop counts one half-cycle
    Alternate,
}

impl Direction {
    /// Flip between normal and reverse
    pub fn toggled(self) -> Self {
        match self {
            Direction::Normal => Direction::Reverse,
            _ => Direction::Normal,
        }
    }
}

/// A single animation run
///
/// # Example
///
/// ```rust
/// use glide_animation::{AnimationRequest, Direction, LoopMode, PropertyBag};
///
/// let request = AnimationRequest::new("#ball")
///     .draw(PropertyBag::new().with("left", "+=100px"))
///     .duration(400.0)
///     .ease("easeOutCubic")
///     .direction(Direction::Alternate)
///     .loop_mode(LoopMode::Count(3));
/// assert_eq!(request.duration_ms, Some(400.0));
/// ```
#[derive(Clone)]
pub struct AnimationRequest {
    pub target: Target,
    pub draw: Option<Draw>,
    /// Falls back to the animator's configured duration
    pub duration_ms: Option<f64>,
    /// Falls back to the animator's configured easing
    pub ease: Option<Easing>,
    pub loop_mode: LoopMode,
    /// Wait between loops, in milliseconds
    pub loop_pause_ms: f64,
    pub direction: Direction,
    /// Wait before the first play, in milliseconds
    pub delay_ms: f64,
    pub name: Option<String>,
    pub on_frame: Option<FrameFn>,
    pub on_done: Option<DoneFn>,
}

impl fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callback = |set: bool| if set { Some("..") } else { None };
        f.debug_struct("AnimationRequest")
            .field("target", &self.target)
            .field("draw", &self.draw)
            .field("duration_ms", &self.duration_ms)
            .field("ease", &self.ease)
            .field("loop_mode", &self.loop_mode)
            .field("loop_pause_ms", &self.loop_pause_ms)
            .field("direction", &self.direction)
            .field("delay_ms", &self.delay_ms)
            .field("name", &self.name)
            .field("on_frame", &callback(self.on_frame.is_some()))
            .field("on_done", &callback(self.on_done.is_some()))
            .finish()
    }
}

impl AnimationRequest {
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            target: target.into(),
            draw: None,
            duration_ms: None,
            ease: None,
            loop_mode: LoopMode::Off,
            loop_pause_ms: 0.0,
            direction: Direction::Normal,
            delay_ms: 0.0,
            name: None,
            on_frame: None,
            on_done: None,
        }
    }

    /// Interpolate a property bag each frame
    pub fn draw(mut self, draw: impl Into<Draw>) -> Self {
        self.draw = Some(draw.into());
        self
    }

    /// Draw each frame with a function of `(target, t, p)`
    pub fn draw_fn(mut self, f: impl Fn(&mut dyn Animatable, f64, f64) + 'static) -> Self {
        self.draw = Some(Draw::Custom(Rc::new(f)));
        self
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn ease(mut self, ease: impl Into<Easing>) -> Self {
        self.ease = Some(ease.into());
        self
    }

    pub fn loop_mode(mut self, mode: impl Into<LoopMode>) -> Self {
        self.loop_mode = mode.into();
        self
    }

    pub fn loop_pause(mut self, ms: f64) -> Self {
        self.loop_pause_ms = ms;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn delay(mut self, ms: f64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Register under a caller-chosen name for control operations
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_frame(mut self, f: impl Fn(&mut dyn Animatable, f64, f64) + 'static) -> Self {
        self.on_frame = Some(Rc::new(f));
        self
    }

    pub fn on_done(mut self, f: impl Fn(&ElementRef) + 'static) -> Self {
        self.on_done = Some(Rc::new(f));
        self
    }
}
