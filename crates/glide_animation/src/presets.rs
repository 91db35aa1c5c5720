//! Effect presets for common enter/exit transitions
//!
//! Every effect is a thin wrapper over [`Animator::animate`]: in-effects seed
//! the element's starting styles, then animate towards its resting state;
//! out-effects animate away from it. Pair helpers run the out-effect on the
//! current element and the in-effect on the next one at the same time.

use crate::completion::{completion_pair, Completion};
use crate::easing::Easing;
use crate::error::Result;
use crate::map::PropertyBag;
use crate::request::{AnimationRequest, DoneFn};
use crate::scheduler::Animator;
use glide_core::ElementRef;
use std::rc::Rc;
use tracing::debug;

/// Stacking order given to elements entering the view
const Z_ENTER: &str = "2";
/// Stacking order given to elements leaving the view
const Z_EXIT: &str = "1";
/// Transform zoom and swirl effects start from or end at
const ZOOM_SCALE: &str = "scale(3)";

/// Options shared by all effects
#[derive(Clone)]
pub struct EffectOptions {
    pub duration_ms: f64,
    pub ease: Easing,
    /// Overrides the default stacking order
    pub z_index: Option<String>,
    /// Overrides the starting transform of zoom and swirl in-effects
    pub scale: Option<String>,
    /// Called before styles are seeded
    pub on_start: Option<DoneFn>,
    /// Called when the effect finishes
    pub on_done: Option<DoneFn>,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            ease: Easing::Linear,
            z_index: None,
            scale: None,
            on_start: None,
            on_done: None,
        }
    }
}

impl EffectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn ease(mut self, ease: impl Into<Easing>) -> Self {
        self.ease = ease.into();
        self
    }

    pub fn z_index(mut self, z_index: impl Into<String>) -> Self {
        self.z_index = Some(z_index.into());
        self
    }

    pub fn scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    pub fn on_start(mut self, f: impl Fn(&ElementRef) + 'static) -> Self {
        self.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_done(mut self, f: impl Fn(&ElementRef) + 'static) -> Self {
        self.on_done = Some(Rc::new(f));
        self
    }

    fn z_or(&self, default: &str) -> String {
        self.z_index.clone().unwrap_or_else(|| default.to_string())
    }
}

/// Completions of a pair effect: `(current, next)`
pub type EffectPair = (Completion<ElementRef>, Completion<ElementRef>);

/// Pre-built enter/exit effects
pub struct Effects;

impl Effects {
    fn begin(el: &ElementRef, options: &EffectOptions, styles: &[(&str, &str)]) {
        if let Some(on_start) = &options.on_start {
            on_start(el);
        }
        let mut target = el.borrow_mut();
        for (name, value) in styles {
            target.set_style(name, value);
        }
    }

    fn run(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
        draw: PropertyBag,
    ) -> Result<Completion<ElementRef>> {
        let mut request = AnimationRequest::new(el)
            .draw(draw)
            .duration(options.duration_ms)
            .ease(options.ease.clone());
        request.on_done = options.on_done.clone();
        animator.animate(request)
    }

    /// Offset size of the container an element slides within
    fn parent_size(parent: &ElementRef) -> (f64, f64) {
        parent.borrow().offset_size()
    }

    // ========================================================================
    // Fade
    // ========================================================================

    pub fn fade_in(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        Self::begin(el, options, &[("top", "0"), ("left", "0"), ("opacity", "0")]);
        Self::run(animator, el, options, PropertyBag::new().with("opacity", 1))
    }

    pub fn fade_out(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        Self::begin(el, options, &[]);
        Self::run(animator, el, options, PropertyBag::new().with("opacity", 0))
    }

    pub fn fade(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::fade_out(animator, current, options)?,
            Self::fade_in(animator, next, options)?,
        ))
    }

    // ========================================================================
    // Slide
    // ========================================================================

    /// Enter from below the parent
    pub fn slide_up_in(
        animator: &mut Animator,
        el: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (_, height) = Self::parent_size(parent);
        let top = format!("{}px", height);
        let z = options.z_or(Z_ENTER);
        Self::begin(el, options, &[("top", top.as_str()), ("left", "0"), ("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("top", 0).with("opacity", 1),
        )
    }

    /// Leave through the top edge
    pub fn slide_up_out(
        animator: &mut Animator,
        el: &ElementRef,
        _parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (_, height) = el.borrow().offset_size();
        let z = options.z_or(Z_EXIT);
        Self::begin(el, options, &[("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("top", -height).with("opacity", 0),
        )
    }

    pub fn slide_up(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::slide_up_out(animator, current, parent, options)?,
            Self::slide_up_in(animator, next, parent, options)?,
        ))
    }

    /// Enter from above the parent
    pub fn slide_down_in(
        animator: &mut Animator,
        el: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (_, height) = Self::parent_size(parent);
        let top = format!("-{}px", height);
        let z = options.z_or(Z_ENTER);
        Self::begin(el, options, &[("top", top.as_str()), ("left", "0"), ("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("top", 0).with("opacity", 1),
        )
    }

    /// Leave through the bottom edge
    pub fn slide_down_out(
        animator: &mut Animator,
        el: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (_, height) = Self::parent_size(parent);
        let z = options.z_or(Z_EXIT);
        Self::begin(el, options, &[("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("top", height).with("opacity", 0),
        )
    }

    pub fn slide_down(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::slide_down_out(animator, current, parent, options)?,
            Self::slide_down_in(animator, next, parent, options)?,
        ))
    }

    /// Enter from the right of the parent
    pub fn slide_left_in(
        animator: &mut Animator,
        el: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (width, _) = Self::parent_size(parent);
        let left = format!("{}px", width);
        let z = options.z_or(Z_ENTER);
        Self::begin(el, options, &[("left", left.as_str()), ("top", "0"), ("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("left", 0).with("opacity", 1),
        )
    }

    /// Leave through the left edge
    pub fn slide_left_out(
        animator: &mut Animator,
        el: &ElementRef,
        _parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (width, _) = el.borrow().offset_size();
        let z = options.z_or(Z_EXIT);
        Self::begin(el, options, &[("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("left", -width).with("opacity", 0),
        )
    }

    pub fn slide_left(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::slide_left_out(animator, current, parent, options)?,
            Self::slide_left_in(animator, next, parent, options)?,
        ))
    }

    /// Enter from the left of the parent
    pub fn slide_right_in(
        animator: &mut Animator,
        el: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (width, _) = Self::parent_size(parent);
        let left = format!("-{}px", width);
        let z = options.z_or(Z_ENTER);
        Self::begin(el, options, &[("left", left.as_str()), ("top", "0"), ("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("left", 0).with("opacity", 1),
        )
    }

    /// Leave through the right edge
    pub fn slide_right_out(
        animator: &mut Animator,
        el: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let (width, _) = Self::parent_size(parent);
        let z = options.z_or(Z_EXIT);
        Self::begin(el, options, &[("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("left", width).with("opacity", 0),
        )
    }

    pub fn slide_right(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        parent: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::slide_right_out(animator, current, parent, options)?,
            Self::slide_right_in(animator, next, parent, options)?,
        ))
    }

    // ========================================================================
    // Zoom and swirl
    // ========================================================================

    pub fn zoom_in(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let transform = options.scale.as_deref().unwrap_or(ZOOM_SCALE);
        let z = options.z_or(Z_ENTER);
        Self::begin(
            el,
            options,
            &[
                ("top", "0"),
                ("left", "0"),
                ("opacity", "0"),
                ("transform", transform),
                ("zIndex", z.as_str()),
            ],
        );
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("scale", 1).with("opacity", 1),
        )
    }

    pub fn zoom_out(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let z = options.z_or(Z_EXIT);
        Self::begin(el, options, &[("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new().with("scale", 3).with("opacity", 0),
        )
    }

    pub fn zoom(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::zoom_out(animator, current, options)?,
            Self::zoom_in(animator, next, options)?,
        ))
    }

    pub fn swirl_in(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let transform = format!(
            "{} rotate(180deg)",
            options.scale.as_deref().unwrap_or(ZOOM_SCALE)
        );
        let z = options.z_or(Z_ENTER);
        Self::begin(
            el,
            options,
            &[
                ("top", "0"),
                ("left", "0"),
                ("opacity", "0"),
                ("transform", transform.as_str()),
                ("zIndex", z.as_str()),
            ],
        );
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new()
                .with("scale", 1)
                .with("rotate", 0)
                .with("opacity", 1),
        )
    }

    pub fn swirl_out(
        animator: &mut Animator,
        el: &ElementRef,
        options: &EffectOptions,
    ) -> Result<Completion<ElementRef>> {
        let z = options.z_or(Z_EXIT);
        Self::begin(el, options, &[("zIndex", z.as_str())]);
        Self::run(
            animator,
            el,
            options,
            PropertyBag::new()
                .with("scale", 3)
                .with("rotate", "180deg")
                .with("opacity", 0),
        )
    }

    pub fn swirl(
        animator: &mut Animator,
        current: &ElementRef,
        next: &ElementRef,
        options: &EffectOptions,
    ) -> Result<EffectPair> {
        Ok((
            Self::swirl_out(animator, current, options)?,
            Self::swirl_in(animator, next, options)?,
        ))
    }

    // ========================================================================
    // Switch (no animation)
    // ========================================================================

    /// Show `el` at the origin immediately
    pub fn switch_in(el: &ElementRef, options: &EffectOptions) -> Completion<ElementRef> {
        Self::begin(el, options, &[("left", "0"), ("top", "0")]);
        el.borrow_mut().set_attribute("hidden", "false");
        Self::settle(el, options)
    }

    /// Hide `el` immediately
    pub fn switch_out(el: &ElementRef, options: &EffectOptions) -> Completion<ElementRef> {
        Self::begin(el, options, &[]);
        el.borrow_mut().set_attribute("hidden", "true");
        Self::settle(el, options)
    }

    pub fn switch(current: &ElementRef, next: &ElementRef, options: &EffectOptions) -> EffectPair {
        (
            Self::switch_out(current, options),
            Self::switch_in(next, options),
        )
    }

    fn settle(el: &ElementRef, options: &EffectOptions) -> Completion<ElementRef> {
        debug!("Switch effect applied");
        if let Some(on_done) = &options.on_done {
            on_done(el);
        }
        let (completer, completion) = completion_pair();
        completer.complete(Ok(el.clone()));
        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{Element, ManualClock};
    use std::cell::Cell;

    fn style(el: &ElementRef, name: &str) -> Option<String> {
        el.borrow().style(name)
    }

    #[test]
    fn test_default_options() {
        let options = EffectOptions::default();
        assert_eq!(options.duration_ms, 300.0);
        assert!(matches!(options.ease, Easing::Linear));
        assert!(options.z_index.is_none());
    }

    #[test]
    fn test_fade_in_seeds_and_animates() {
        let clock = ManualClock::new();
        let mut animator = Animator::with_clock(clock.clone());
        let el = Element::new("div").with_style("opacity", "1").into_ref();

        let mut done = Effects::fade_in(&mut animator, &el, &EffectOptions::new()).unwrap();
        assert_eq!(style(&el, "opacity").as_deref(), Some("0"));
        assert_eq!(style(&el, "top").as_deref(), Some("0"));

        clock.set(150.0);
        animator.tick();
        assert_eq!(style(&el, "opacity").as_deref(), Some("0.5"));

        clock.set(300.0);
        animator.tick();
        assert_eq!(style(&el, "opacity").as_deref(), Some("1"));
        assert!(matches!(done.try_take(), Some(Ok(_))));
    }

    #[test]
    fn test_slide_up_in_starts_below_parent() {
        let clock = ManualClock::new();
        let mut animator = Animator::with_clock(clock.clone());
        let parent = Element::new("section").with_size(400.0, 200.0).into_ref();
        let el = Element::new("div").into_ref();

        Effects::slide_up_in(&mut animator, &el, &parent, &EffectOptions::new()).unwrap();
        assert_eq!(style(&el, "top").as_deref(), Some("200px"));
        assert_eq!(style(&el, "zIndex").as_deref(), Some("2"));

        clock.set(150.0);
        animator.tick();
        assert_eq!(style(&el, "top").as_deref(), Some("100px"));
    }

    #[test]
    fn test_slide_left_out_uses_own_width() {
        let clock = ManualClock::new();
        let mut animator = Animator::with_clock(clock.clone());
        let parent = Element::new("section").with_size(400.0, 200.0).into_ref();
        let el = Element::new("div").with_size(100.0, 50.0).into_ref();

        let options = EffectOptions::new().z_index("7");
        Effects::slide_left_out(&mut animator, &el, &parent, &options).unwrap();
        assert_eq!(style(&el, "zIndex").as_deref(), Some("7"));

        clock.set(300.0);
        animator.tick();
        assert_eq!(style(&el, "left").as_deref(), Some("-100px"));
    }

    #[test]
    fn test_zoom_in_seeds_transform() {
        let clock = ManualClock::new();
        let mut animator = Animator::with_clock(clock.clone());
        let el = Element::new("div").into_ref();

        Effects::zoom_in(&mut animator, &el, &EffectOptions::new()).unwrap();
        assert_eq!(el.borrow().transform().as_deref(), Some("scale(3)"));

        clock.set(150.0);
        animator.tick();
        assert_eq!(el.borrow().transform().as_deref(), Some("scale(2)"));
    }

    #[test]
    fn test_swirl_in_custom_scale() {
        let clock = ManualClock::new();
        let mut animator = Animator::with_clock(clock.clone());
        let el = Element::new("div").into_ref();

        let options = EffectOptions::new().scale("scale(5)");
        Effects::swirl_in(&mut animator, &el, &options).unwrap();
        assert_eq!(
            el.borrow().transform().as_deref(),
            Some("scale(5) rotate(180deg)")
        );

        clock.set(300.0);
        animator.tick();
        assert_eq!(
            el.borrow().transform().as_deref(),
            Some("scale(1) rotate(0deg)")
        );
    }

    #[test]
    fn test_switch_is_immediate() {
        let current = Element::new("div").into_ref();
        let next = Element::new("div").with_style("left", "30px").into_ref();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let options = EffectOptions::new().on_done(move |_| counter.set(counter.get() + 1));

        let (mut out, mut into) = Effects::switch(&current, &next, &options);
        assert_eq!(current.borrow().attribute("hidden").as_deref(), Some("true"));
        assert_eq!(next.borrow().attribute("hidden").as_deref(), Some("false"));
        assert_eq!(style(&next, "left").as_deref(), Some("0"));
        assert!(matches!(out.try_take(), Some(Ok(_))));
        assert!(matches!(into.try_take(), Some(Ok(_))));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_on_start_runs_before_seeding() {
        let clock = ManualClock::new();
        let mut animator = Animator::with_clock(clock);
        let el = Element::new("div").with_style("opacity", "0.7").into_ref();
        let seen = Rc::new(Cell::new(0.0));
        let sink = seen.clone();
        let options = EffectOptions::new().on_start(move |el| {
            let opacity = el.borrow().style("opacity").unwrap_or_default();
            sink.set(opacity.parse().unwrap_or(-1.0));
        });

        Effects::fade_in(&mut animator, &el, &options).unwrap();
        assert_eq!(seen.get(), 0.7);
    }
}
