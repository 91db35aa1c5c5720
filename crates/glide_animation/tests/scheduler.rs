//! Integration tests for the frame scheduler
//!
//! These drive an `Animator` with a `ManualClock` against headless elements
//! and check what ends up in the element's styles.

use glide_animation::{
    AnimationError, AnimationRequest, Animator, AnimatorConfig, Direction, LoopMode, PropertyBag,
    StopMode,
};
use glide_core::{Document, Element, ElementRef, ManualClock};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn setup() -> (ManualClock, Animator) {
    let clock = ManualClock::new();
    let animator = Animator::with_clock(clock.clone());
    (clock, animator)
}

fn style(el: &ElementRef, name: &str) -> Option<String> {
    el.borrow().style(name)
}

fn tick_at(clock: &ManualClock, animator: &mut Animator, ms: f64) {
    clock.set(ms);
    animator.tick();
}

/// Tick in fixed steps until nothing is live, with an upper bound
fn run_until_idle(clock: &ManualClock, animator: &mut Animator, step_ms: f64) {
    for _ in 0..10_000 {
        if !animator.has_active_animations() && animator.active_chain_count() == 0 {
            return;
        }
        clock.advance(step_ms);
        animator.tick();
    }
    panic!("animations did not settle");
}

/// Records the value of `prop` every time a play reaches `t == 1`
fn pass_recorder(prop: &'static str) -> (Rc<RefCell<Vec<String>>>, AnimationRequest) {
    let ends = Rc::new(RefCell::new(Vec::new()));
    let sink = ends.clone();
    let el = Element::new("div").into_ref();
    let request = AnimationRequest::new(&el)
        .draw(PropertyBag::new().with(prop, (0, 100)))
        .duration(100.0)
        .on_frame(move |target, t, _| {
            if t >= 1.0 {
                sink.borrow_mut()
                    .push(target.style(prop).unwrap_or_default());
            }
        });
    (ends, request)
}

#[test]
fn test_opacity_end_to_end() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").with_style("opacity", "0").into_ref();

    let done = animator
        .animate(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("opacity", 1))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 500.0);
    assert_eq!(style(&el, "opacity").as_deref(), Some("0.5"));

    tick_at(&clock, &mut animator, 1000.0);
    assert_eq!(style(&el, "opacity").as_deref(), Some("1"));
    assert!(!animator.has_active_animations());

    let finished = pollster::block_on(done).unwrap();
    assert!(Rc::ptr_eq(&finished, &el));
}

#[test]
fn test_left_range_lands_on_end() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").with_style("left", "40px").into_ref();

    animator
        .animate(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", [0, 100]))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 250.0);
    assert_eq!(style(&el, "left").as_deref(), Some("25px"));

    run_until_idle(&clock, &mut animator, 16.0);
    assert_eq!(style(&el, "left").as_deref(), Some("100px"));
}

#[test]
fn test_relative_end_value() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").with_style("left", "10px").into_ref();

    animator
        .animate(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", "+=50px"))
                .duration(100.0),
        )
        .unwrap();

    run_until_idle(&clock, &mut animator, 10.0);
    assert_eq!(style(&el, "left").as_deref(), Some("60px"));
}

#[test]
fn test_color_midpoint() {
    let (clock, mut animator) = setup();
    let el = Element::new("div")
        .with_computed_style("color", "rgb(0, 0, 0)")
        .into_ref();

    animator
        .animate(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("color", "#ffffff"))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 500.0);
    assert_eq!(style(&el, "color").as_deref(), Some("rgb(127,127,127)"));
}

#[test]
fn test_loop_count_plays_n_times() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    let done = animator.animate(request.loop_mode(3u32)).unwrap();

    run_until_idle(&clock, &mut animator, 25.0);
    assert_eq!(ends.borrow().len(), 3);
    assert!(pollster::block_on(done).is_ok());
}

#[test]
fn test_alternate_loop_plays_half_cycles() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    animator
        .animate(
            request
                .direction(Direction::Alternate)
                .loop_mode(LoopMode::Count(2)),
        )
        .unwrap();

    run_until_idle(&clock, &mut animator, 25.0);
    assert_eq!(*ends.borrow(), ["100px", "0px", "100px", "0px"]);
}

#[test]
fn test_alternate_without_loop_plays_there_and_back() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    animator
        .animate(request.direction(Direction::Alternate))
        .unwrap();

    run_until_idle(&clock, &mut animator, 25.0);
    assert_eq!(*ends.borrow(), ["100px", "0px"]);
}

#[test]
fn test_alternate_with_zero_count_matches_no_loop() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    animator
        .animate(
            request
                .direction(Direction::Alternate)
                .loop_mode(LoopMode::Count(0)),
        )
        .unwrap();

    run_until_idle(&clock, &mut animator, 25.0);
    assert_eq!(*ends.borrow(), ["100px", "0px"]);
}

#[test]
fn test_zero_count_plays_once() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    let (id, _) = animator
        .start(request.loop_mode(LoopMode::Count(0)))
        .unwrap();

    run_until_idle(&clock, &mut animator, 25.0);
    assert_eq!(*ends.borrow(), ["100px"]);
    assert!(!animator.is_active(id));
}

#[test]
fn test_reverse_direction() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("top");
    animator
        .animate(request.direction(Direction::Reverse))
        .unwrap();

    run_until_idle(&clock, &mut animator, 25.0);
    assert_eq!(*ends.borrow(), ["0px"]);
}

#[test]
fn test_infinite_loop_until_stopped() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    let (id, done) = animator.start(request.loop_mode(true)).unwrap();

    for _ in 0..100 {
        clock.advance(25.0);
        animator.tick();
    }
    assert!(animator.is_active(id));
    assert!(ends.borrow().len() >= 20);
    assert!(animator.state(id).unwrap().loops >= 20);

    animator.stop(id, false);
    animator.tick();
    assert!(!animator.is_active(id));
    assert!(pollster::block_on(done).is_ok());
}

#[test]
fn test_loop_pause_waits_between_plays() {
    let (clock, mut animator) = setup();
    let (ends, request) = pass_recorder("left");
    let (id, _) = animator
        .start(request.loop_mode(2u32).loop_pause(50.0))
        .unwrap();

    tick_at(&clock, &mut animator, 100.0);
    assert_eq!(ends.borrow().len(), 1);

    tick_at(&clock, &mut animator, 140.0);
    assert_eq!(animator.state(id).unwrap().loops, 1);

    tick_at(&clock, &mut animator, 150.0);
    assert_eq!(animator.state(id).unwrap().loops, 2);

    tick_at(&clock, &mut animator, 250.0);
    assert_eq!(ends.borrow().len(), 2);
    assert!(!animator.is_active(id));
}

#[test]
fn test_stop_with_completion_snaps_to_end() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, done) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 200.0);
    assert_eq!(style(&el, "left").as_deref(), Some("20px"));

    assert!(animator.stop(id, true));
    assert_eq!(animator.state(id).unwrap().stop, StopMode::Complete);

    tick_at(&clock, &mut animator, 300.0);
    assert_eq!(style(&el, "left").as_deref(), Some("100px"));
    assert!(!animator.is_active(id));
    assert!(pollster::block_on(done).is_ok());
}

#[test]
fn test_stop_without_completion_stays_put() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, _) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 200.0);
    animator.stop(id, false);
    tick_at(&clock, &mut animator, 300.0);

    assert_eq!(style(&el, "left").as_deref(), Some("20px"));
    assert!(!animator.is_active(id));
}

#[test]
fn test_busy_target_delays_final_frame() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, _) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 400.0);
    {
        let _busy = el.borrow_mut();
        tick_at(&clock, &mut animator, 1000.0);
    }
    assert!(animator.is_active(id));
    assert_eq!(style(&el, "left").as_deref(), Some("40px"));

    tick_at(&clock, &mut animator, 1016.0);
    assert!(!animator.is_active(id));
    assert_eq!(style(&el, "left").as_deref(), Some("100px"));
}

#[test]
fn test_busy_target_delays_completing_stop() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, _) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 200.0);
    animator.stop(id, true);
    {
        let _busy = el.borrow_mut();
        tick_at(&clock, &mut animator, 216.0);
    }
    assert!(animator.is_active(id));
    assert_eq!(style(&el, "left").as_deref(), Some("20px"));

    tick_at(&clock, &mut animator, 232.0);
    assert!(!animator.is_active(id));
    assert_eq!(style(&el, "left").as_deref(), Some("100px"));
}

#[test]
fn test_pause_rebases_start() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, _) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(1000.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 200.0);
    assert!(animator.pause(id));

    tick_at(&clock, &mut animator, 500.0);
    tick_at(&clock, &mut animator, 900.0);
    let state = animator.state(id).unwrap();
    assert!(state.paused);
    assert_eq!(state.t, 0.2);
    assert_eq!(style(&el, "left").as_deref(), Some("20px"));

    assert!(animator.resume(id));
    tick_at(&clock, &mut animator, 1000.0);
    assert_eq!(style(&el, "left").as_deref(), Some("30px"));
}

#[test]
fn test_time_fraction_is_monotonic_and_clamped() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    animator
        .animate(
            AnimationRequest::new(&el)
                .draw_fn(|_, _, _| {})
                .duration(333.0)
                .ease("easeOutElastic")
                .on_frame(move |_, t, _| sink.borrow_mut().push(t)),
        )
        .unwrap();

    run_until_idle(&clock, &mut animator, 7.0);

    let seen = seen.borrow();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|t| (0.0..=1.0).contains(t)));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&1.0));
}

#[test]
fn test_custom_draw_gets_eased_progress() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();

    animator
        .animate(
            AnimationRequest::new(&el)
                .draw_fn(|target, t, p| {
                    target.set_style("width", &format!("{}:{}", t, p));
                })
                .duration(100.0)
                .ease("easeInCubic"),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 50.0);
    assert_eq!(style(&el, "width").as_deref(), Some("0.5:0.125"));
}

#[test]
fn test_disabled_animations_finish_in_one_tick() {
    let (clock, mut animator) = setup();
    animator.set_enabled(false);
    assert!(!animator.is_enabled());

    let el = Element::new("div").into_ref();
    let mut done = animator
        .animate(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(5000.0),
        )
        .unwrap();

    clock.step_frame();
    animator.tick();
    assert_eq!(style(&el, "left").as_deref(), Some("100px"));
    assert!(matches!(done.try_take(), Some(Ok(_))));
}

#[test]
fn test_disabled_by_config() {
    let clock = ManualClock::new();
    let config = AnimatorConfig::from_toml_str("enabled = false").unwrap();
    let mut animator = Animator::with_clock(clock.clone()).with_config(config);
    let el = Element::new("div").into_ref();

    animator
        .animate(AnimationRequest::new(&el).draw_fn(|_, _, _| {}))
        .unwrap();
    clock.step_frame();
    animator.tick();
    assert_eq!(animator.active_count(), 0);
}

#[test]
fn test_configured_default_duration() {
    let clock = ManualClock::new();
    let config = AnimatorConfig {
        duration_ms: 200.0,
        ..Default::default()
    };
    let mut animator = Animator::with_clock(clock.clone()).with_config(config);
    let el = Element::new("div").into_ref();

    animator
        .animate(
            AnimationRequest::new(&el).draw(PropertyBag::new().with("left", (0, 100))),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 100.0);
    assert_eq!(style(&el, "left").as_deref(), Some("50px"));
}

#[test]
fn test_delay_defers_first_play() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, _) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .duration(100.0)
                .delay(500.0),
        )
        .unwrap();

    tick_at(&clock, &mut animator, 400.0);
    assert_eq!(style(&el, "left"), None);
    assert_eq!(animator.state(id).unwrap().loops, 0);

    tick_at(&clock, &mut animator, 500.0);
    assert_eq!(animator.state(id).unwrap().loops, 1);

    tick_at(&clock, &mut animator, 550.0);
    assert_eq!(style(&el, "left").as_deref(), Some("50px"));
}

#[test]
fn test_stop_during_delay() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let (id, _) = animator
        .start(
            AnimationRequest::new(&el)
                .draw(PropertyBag::new().with("left", (0, 100)))
                .delay(1000.0),
        )
        .unwrap();

    animator.stop(id, true);
    tick_at(&clock, &mut animator, 10.0);
    assert!(!animator.is_active(id));
    assert_eq!(style(&el, "left").as_deref(), Some("100px"));
}

#[test]
fn test_selector_targets() {
    let clock = ManualClock::new();
    let mut document = Document::new();
    let ball = document.append(Element::new("div").with_id("ball"));
    let mut animator = Animator::with_clock(clock.clone()).with_document(Rc::new(document));

    animator
        .animate(
            AnimationRequest::new("#ball")
                .draw(PropertyBag::new().with("top", (0, 10)))
                .duration(10.0),
        )
        .unwrap();
    run_until_idle(&clock, &mut animator, 5.0);
    assert_eq!(style(&ball, "top").as_deref(), Some("10px"));

    let err = animator
        .animate(AnimationRequest::new("#nope").draw_fn(|_, _, _| {}))
        .unwrap_err();
    assert!(matches!(err, AnimationError::UnknownTarget(ref s) if s == "#nope"));
    assert_eq!(animator.active_count(), 0);
}

#[test]
fn test_selector_without_document_is_unknown() {
    let (_clock, mut animator) = setup();
    let result = animator.animate(AnimationRequest::new(".card").draw_fn(|_, _, _| {}));
    assert!(matches!(result, Err(AnimationError::UnknownTarget(_))));
}

#[test]
fn test_missing_draw_registers_nothing() {
    let (_clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let result = animator.animate(AnimationRequest::new(&el));
    assert!(matches!(result, Err(AnimationError::MissingDraw)));
    assert_eq!(animator.active_count(), 0);
}

#[test]
fn test_named_handles() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let request = AnimationRequest::new(&el)
        .draw_fn(|_, _, _| {})
        .duration(100.0)
        .name("spin");

    animator.animate(request.clone()).unwrap();
    assert!(animator.is_active("spin"));
    assert!(animator.id_of("spin").is_some());

    let err = animator.animate(request.clone()).unwrap_err();
    assert!(matches!(err, AnimationError::DuplicateName(ref name) if name == "spin"));
    assert_eq!(animator.active_count(), 1);

    assert!(animator.pause("spin"));
    assert!(animator.state("spin").unwrap().paused);
    assert!(animator.resume("spin"));

    tick_at(&clock, &mut animator, 100.0);
    assert!(!animator.is_active("spin"));
    assert!(!animator.pause("spin"));

    // The name is free again once the run finished
    assert!(animator.animate(request).is_ok());
}

#[test]
fn test_on_done_runs_once() {
    let (clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();

    animator
        .animate(
            AnimationRequest::new(&el)
                .draw_fn(|_, _, _| {})
                .duration(50.0)
                .loop_mode(2u32)
                .on_done(move |_| counter.set(counter.get() + 1)),
        )
        .unwrap();

    run_until_idle(&clock, &mut animator, 10.0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_bulk_controls() {
    let (clock, mut animator) = setup();
    let a = Element::new("div").into_ref();
    let b = Element::new("div").into_ref();
    for el in [&a, &b] {
        animator
            .animate(
                AnimationRequest::new(el)
                    .draw(PropertyBag::new().with("left", (0, 100)))
                    .duration(1000.0),
            )
            .unwrap();
    }

    animator.pause_all();
    assert!(animator.ids().all(|id| animator.state(id).unwrap().paused));

    animator.toggle_all();
    assert!(animator.ids().all(|id| !animator.state(id).unwrap().paused));

    animator.pause_all();
    animator.resume_all();
    tick_at(&clock, &mut animator, 100.0);
    assert_eq!(style(&a, "left").as_deref(), Some("10px"));

    animator.stop_all(true);
    tick_at(&clock, &mut animator, 150.0);
    assert_eq!(animator.active_count(), 0);
    assert_eq!(style(&a, "left").as_deref(), Some("100px"));
    assert_eq!(style(&b, "left").as_deref(), Some("100px"));
}

#[test]
fn test_dropping_animator_cancels_completion() {
    let (_clock, mut animator) = setup();
    let el = Element::new("div").into_ref();
    let done = animator
        .animate(AnimationRequest::new(&el).draw_fn(|_, _, _| {}))
        .unwrap();

    drop(animator);
    assert!(matches!(
        pollster::block_on(done),
        Err(AnimationError::Cancelled)
    ));
}
