//! Animatable targets
//!
//! The engine never inspects a concrete node type. Everything it reads or
//! writes goes through [`Animatable`], which keeps interpolation independent
//! of whatever renders the result.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, single-threaded handle to an animation target
pub type ElementRef = Rc<RefCell<dyn Animatable>>;

/// Axis for the dedicated scroll offset read/write path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    /// `scrollLeft`
    Horizontal,
    /// `scrollTop`
    Vertical,
}

/// Capabilities an animation target exposes to the engine
///
/// Only [`style`](Animatable::style) and [`set_style`](Animatable::set_style)
/// are required. The remaining methods default to routing through the style
/// table or to "not supported".
pub trait Animatable {
    /// Current value of a style property, inline value first then computed
    fn style(&self, name: &str) -> Option<String>;

    /// Write a style property
    fn set_style(&mut self, name: &str, value: &str);

    /// Composed transform string, e.g. `translateX(10px) rotate(45deg)`
    fn transform(&self) -> Option<String> {
        self.style("transform")
    }

    /// Replace the composed transform string
    fn set_transform(&mut self, value: &str) {
        self.set_style("transform", value);
    }

    /// Computed color of a color property as a CSS color string
    fn computed_color(&self, name: &str) -> Option<String> {
        self.style(name)
    }

    /// Current scroll offset in pixels
    fn scroll_offset(&self, _axis: ScrollAxis) -> f64 {
        0.0
    }

    /// Set the scroll offset in pixels
    fn set_scroll_offset(&mut self, _axis: ScrollAxis, _value: f64) {}

    /// Layout size as `(width, height)` in pixels
    fn offset_size(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// Read an attribute
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    /// Write an attribute
    fn set_attribute(&mut self, _name: &str, _value: &str) {}

    /// Whether this target is a rendered element.
    ///
    /// Plain data targets return `false`; unitless lengths on them stay
    /// unitless instead of being coerced to pixels.
    fn is_element(&self) -> bool {
        true
    }
}

/// Headless element backed by in-memory style tables
#[derive(Clone, Debug, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    /// Inline styles, written by the engine
    styles: FxHashMap<String, String>,
    /// Fallback values reported when no inline style is set
    computed: FxHashMap<String, String>,
    attributes: FxHashMap<String, String>,
    scroll: (f64, f64),
    size: (f64, f64),
    plain: bool,
}

impl Element {
    /// Create a rendered element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create a plain data target (not a rendered element)
    pub fn plain() -> Self {
        Self {
            plain: true,
            ..Default::default()
        }
    }

    /// Builder: set the element id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set an inline style
    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    /// Builder: set a computed (fallback) style
    pub fn with_computed_style(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.computed.insert(name.into(), value.into());
        self
    }

    /// Builder: set the layout size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = (width, height);
        self
    }

    /// Wrap into a shared handle the engine can animate
    pub fn into_ref(self) -> ElementRef {
        Rc::new(RefCell::new(self))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Remove an inline style, falling back to the computed value
    pub fn remove_style(&mut self, name: &str) -> Option<String> {
        self.styles.remove(name)
    }
}

impl Animatable for Element {
    fn style(&self, name: &str) -> Option<String> {
        self.styles
            .get(name)
            .filter(|value| !value.is_empty())
            .or_else(|| self.computed.get(name))
            .cloned()
    }

    fn set_style(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_string(), value.to_string());
    }

    fn scroll_offset(&self, axis: ScrollAxis) -> f64 {
        match axis {
            ScrollAxis::Horizontal => self.scroll.0,
            ScrollAxis::Vertical => self.scroll.1,
        }
    }

    fn set_scroll_offset(&mut self, axis: ScrollAxis, value: f64) {
        match axis {
            ScrollAxis::Horizontal => self.scroll.0 = value,
            ScrollAxis::Vertical => self.scroll.1 = value,
        }
    }

    fn offset_size(&self) -> (f64, f64) {
        self.size
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn is_element(&self) -> bool {
        !self.plain
    }
}
