//! Animation scheduler
//!
//! Owns every live run and advances them once per display refresh.
//!
//! Each run is a small state machine. A play step stamps the start time and
//! schedules frames; each frame computes the elapsed fraction `t`, eases it
//! to `p`, draws, and at `t == 1` decides whether to loop, replay in the
//! other direction, or finish. Timers (start delay, pause between loops) are
//! deadlines checked on [`Animator::tick`].

use crate::chain::Chain;
use crate::completion::{completion_pair, Completer, Completion};
use crate::config::AnimatorConfig;
use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::map::AnimationMap;
use crate::request::{AnimationRequest, Direction, DoneFn, Draw, FrameFn, LoopMode, Target};
use glide_core::{Clock, ElementQuery, ElementRef, SystemClock};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::{debug, trace};

new_key_type! {
    pub struct AnimationId;
    pub struct ChainId;
}

/// Requested stop behavior, observed on the next tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopMode {
    #[default]
    None,
    /// Stop where the run is
    Abrupt,
    /// Draw the final frame, then stop
    Complete,
}

/// Identifies a live run by id or by the name it was started with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationRef<'a> {
    Id(AnimationId),
    Name(&'a str),
}

impl From<AnimationId> for AnimationRef<'_> {
    fn from(id: AnimationId) -> Self {
        AnimationRef::Id(id)
    }
}

impl<'a> From<&'a str> for AnimationRef<'a> {
    fn from(name: &'a str) -> Self {
        AnimationRef::Name(name)
    }
}

impl<'a> From<&'a String> for AnimationRef<'a> {
    fn from(name: &'a String) -> Self {
        AnimationRef::Name(name)
    }
}

/// Snapshot of a live run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Last computed time fraction, in `[0, 1]`
    pub t: f64,
    /// Last eased progress
    pub p: f64,
    /// Play steps performed so far
    pub loops: u32,
    pub paused: bool,
    /// Direction of the current play
    pub direction: Direction,
    pub stop: StopMode,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    /// Waiting for a start delay or a pause between loops
    Waiting { until: f64 },
    /// Playing; the next tick runs a frame
    Frame,
}

enum Step {
    Continue,
    Finish,
}

/// A live run
struct Animation {
    element: ElementRef,
    draw: Draw,
    map: AnimationMap,
    ease: Easing,
    duration: f64,
    loop_mode: LoopMode,
    loop_pause: f64,
    /// Requested direction; `Alternate` flips `direction` between plays
    mode: Direction,
    direction: Direction,
    replayed: bool,
    phase: Phase,
    stop: StopMode,
    paused: bool,
    loops: u32,
    t: f64,
    p: f64,
    started: f64,
    name: Option<String>,
    on_frame: Option<FrameFn>,
    on_done: Option<DoneFn>,
    completer: Completer<ElementRef>,
}

impl Animation {
    /// Rebuild the plan, count the play and schedule frames from `now`
    fn play(&mut self, now: f64) {
        if let Draw::Properties(bag) = &self.draw {
            match self.element.try_borrow() {
                Ok(element) => self.map = AnimationMap::build(&*element, bag, self.direction),
                Err(_) => trace!("Target is borrowed, keeping the previous plan"),
            }
        }
        self.loops += 1;
        self.started = now;
        self.paused = false;
        self.phase = Phase::Frame;
    }

    fn frame(&mut self, now: f64) -> Step {
        if self.paused {
            self.started = now - self.t * self.duration;
        }

        match self.stop {
            StopMode::Complete => {
                self.t = 1.0;
                self.p = 1.0;
                if !self.render(1.0, 1.0, false) {
                    return Step::Continue;
                }
                return Step::Finish;
            }
            StopMode::Abrupt => return Step::Finish,
            StopMode::None => {}
        }

        if self.paused {
            return Step::Continue;
        }

        let t = ((now - self.started) / self.duration).clamp(0.0, 1.0);
        let p = self.ease.apply(t);
        self.t = t;
        self.p = p;
        let drawn = self.render(t, p, true);

        // The last frame must land before the run can end
        if t < 1.0 || !drawn {
            return Step::Continue;
        }

        match self.loop_mode {
            LoopMode::Off => {
                if self.mode == Direction::Alternate && !self.replayed {
                    self.direction = self.direction.toggled();
                    self.replayed = true;
                    self.play(now);
                    Step::Continue
                } else {
                    Step::Finish
                }
            }
            budget => {
                if self.mode == Direction::Alternate {
                    self.direction = self.direction.toggled();
                }
                let again = match budget {
                    LoopMode::Count(n) => n > self.loops,
                    _ => true,
                };
                if !again {
                    Step::Finish
                } else if self.loop_pause > 0.0 {
                    self.phase = Phase::Waiting {
                        until: now + self.loop_pause,
                    };
                    Step::Continue
                } else {
                    self.play(now);
                    Step::Continue
                }
            }
        }
    }

    /// Draw one frame. Returns false if the target was busy and nothing was written.
    fn render(&self, t: f64, p: f64, observe: bool) -> bool {
        let Ok(mut element) = self.element.try_borrow_mut() else {
            trace!("Target is borrowed, skipping frame at t={}", t);
            return false;
        };

        match &self.draw {
            Draw::Custom(draw) => draw(&mut *element, t, p),
            Draw::Properties(_) => self.map.apply(&mut *element, p),
        }

        if observe {
            if let Some(on_frame) = &self.on_frame {
                on_frame(&mut *element, t, p);
            }
        }
        true
    }

    fn state(&self) -> AnimationState {
        AnimationState {
            t: self.t,
            p: self.p,
            loops: self.loops,
            paused: self.paused,
            direction: self.direction,
            stop: self.stop,
        }
    }
}

/// Drives animation runs and chains
///
/// ```rust
/// use glide_animation::{AnimationRequest, Animator, PropertyBag};
/// use glide_core::{Element, ManualClock};
///
/// let clock = ManualClock::new();
/// let mut animator = Animator::with_clock(clock.clone());
/// let ball = Element::new("div").into_ref();
///
/// let done = animator
///     .animate(
///         AnimationRequest::new(&ball)
///             .draw(PropertyBag::new().with("left", (0, 100)))
///             .duration(1000.0),
///     )
///     .unwrap();
///
/// clock.set(500.0);
/// animator.tick();
/// assert_eq!(ball.borrow().style("left").as_deref(), Some("50px"));
///
/// clock.set(1000.0);
/// animator.tick();
/// assert!(pollster::block_on(done).is_ok());
/// ```
pub struct Animator {
    animations: SlotMap<AnimationId, Animation>,
    names: FxHashMap<String, AnimationId>,
    pub(crate) chains: SlotMap<ChainId, Chain>,
    clock: Box<dyn Clock>,
    document: Option<Rc<dyn ElementQuery>>,
    config: AnimatorConfig,
}

impl Animator {
    /// Create an animator driven by the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Create an animator driven by `clock`
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            animations: SlotMap::with_key(),
            names: FxHashMap::default(),
            chains: SlotMap::with_key(),
            clock: Box::new(clock),
            document: None,
            config: AnimatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve selector targets through `document`
    pub fn with_document(mut self, document: Rc<dyn ElementQuery>) -> Self {
        self.document = Some(document);
        self
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Global switch. While disabled, new runs use the minimal duration.
    pub fn set_enabled(&mut self, enabled: bool) {
        debug!("Animations {}", if enabled { "enabled" } else { "disabled" });
        self.config.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Current clock reading in milliseconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Start a run and return its completion signal
    pub fn animate(&mut self, request: AnimationRequest) -> Result<Completion<ElementRef>> {
        self.start(request).map(|(_, completion)| completion)
    }

    /// Start a run, returning its id along with the completion signal
    pub fn start(
        &mut self,
        request: AnimationRequest,
    ) -> Result<(AnimationId, Completion<ElementRef>)> {
        let AnimationRequest {
            target,
            draw,
            duration_ms,
            ease,
            loop_mode,
            loop_pause_ms,
            direction,
            delay_ms,
            name,
            on_frame,
            on_done,
        } = request;

        let element = self.resolve(target)?;
        let draw = draw.ok_or(AnimationError::MissingDraw)?;
        if let Some(name) = &name {
            if self.names.contains_key(name) {
                return Err(AnimationError::DuplicateName(name.clone()));
            }
        }

        let mut duration = duration_ms.unwrap_or(self.config.duration_ms);
        if !self.config.enabled || !duration.is_finite() || duration <= 0.0 {
            duration = self.min_duration();
        }

        let loop_mode = match (direction, loop_mode) {
            (_, LoopMode::Count(0)) => LoopMode::Off,
            (Direction::Alternate, LoopMode::Count(n)) => LoopMode::Count(n.saturating_mul(2)),
            (_, mode) => mode,
        };
        let current = match direction {
            Direction::Alternate => Direction::Normal,
            other => other,
        };

        let now = self.clock.now();
        let (completer, completion) = completion_pair();
        let mut animation = Animation {
            element,
            draw,
            map: AnimationMap::default(),
            ease: ease.unwrap_or_else(|| self.config.easing()),
            duration,
            loop_mode,
            loop_pause: loop_pause_ms.max(0.0),
            mode: direction,
            direction: current,
            replayed: false,
            phase: Phase::Waiting {
                until: now + delay_ms,
            },
            stop: StopMode::None,
            paused: false,
            loops: 0,
            t: 0.0,
            p: 0.0,
            started: now,
            name: name.clone(),
            on_frame,
            on_done,
            completer,
        };

        let delayed = delay_ms > 0.0;
        if !delayed {
            animation.play(now);
        }

        let id = self.animations.insert(animation);
        if let Some(name) = name {
            self.names.insert(name, id);
        }
        debug!(
            "Started animation {:?}: duration={}ms loop={:?} direction={:?} delay={}ms",
            id, duration, loop_mode, direction, delay_ms
        );

        Ok((id, completion))
    }

    fn resolve(&self, target: Target) -> Result<ElementRef> {
        match target {
            Target::Element(element) => Ok(element),
            Target::Selector(selector) => self
                .document
                .as_ref()
                .and_then(|document| document.query(&selector))
                .ok_or(AnimationError::UnknownTarget(selector)),
        }
    }

    fn min_duration(&self) -> f64 {
        if self.config.min_duration_ms > 0.0 {
            self.config.min_duration_ms
        } else {
            1.0
        }
    }

    /// Advance every live run by one display refresh, then every chain
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let ids: SmallVec<[AnimationId; 16]> = self.animations.keys().collect();

        for id in ids {
            let Some(animation) = self.animations.get_mut(id) else {
                continue;
            };

            let step = match animation.phase {
                Phase::Waiting { until } if animation.stop != StopMode::None || now >= until => {
                    animation.play(now);
                    if animation.stop != StopMode::None {
                        animation.frame(now)
                    } else {
                        Step::Continue
                    }
                }
                Phase::Waiting { .. } => Step::Continue,
                Phase::Frame => animation.frame(now),
            };

            if let Step::Finish = step {
                self.finish(id);
            }
        }

        self.advance_chains();
    }

    fn finish(&mut self, id: AnimationId) {
        let Some(animation) = self.animations.remove(id) else {
            return;
        };
        let Animation {
            element,
            name,
            on_done,
            completer,
            loops,
            stop,
            ..
        } = animation;

        if let Some(name) = &name {
            self.names.remove(name);
        }
        debug!(
            "Finished animation {:?} after {} play(s), stop={:?}",
            id, loops, stop
        );

        if let Some(on_done) = on_done {
            on_done(&element);
        }
        completer.complete(Ok(element));
    }

    fn lookup(&self, handle: AnimationRef<'_>) -> Option<AnimationId> {
        match handle {
            AnimationRef::Id(id) => self.animations.contains_key(id).then_some(id),
            AnimationRef::Name(name) => self.names.get(name).copied(),
        }
    }

    fn update<'a>(
        &mut self,
        handle: impl Into<AnimationRef<'a>>,
        f: impl FnOnce(&mut Animation),
    ) -> bool {
        let handle = handle.into();
        match self.lookup(handle).and_then(|id| self.animations.get_mut(id)) {
            Some(animation) => {
                f(animation);
                true
            }
            None => {
                trace!("No live animation for {:?}", handle);
                false
            }
        }
    }

    /// Freeze a run at its current progress. Returns false if it is not live.
    pub fn pause<'a>(&mut self, handle: impl Into<AnimationRef<'a>>) -> bool {
        self.update(handle, |animation| animation.paused = true)
    }

    /// Continue a paused run from where it stopped
    pub fn resume<'a>(&mut self, handle: impl Into<AnimationRef<'a>>) -> bool {
        self.update(handle, |animation| animation.paused = false)
    }

    pub fn toggle<'a>(&mut self, handle: impl Into<AnimationRef<'a>>) -> bool {
        self.update(handle, |animation| animation.paused = !animation.paused)
    }

    /// Request a stop on the next tick; `complete` draws the final frame first
    pub fn stop<'a>(&mut self, handle: impl Into<AnimationRef<'a>>, complete: bool) -> bool {
        let mode = if complete {
            StopMode::Complete
        } else {
            StopMode::Abrupt
        };
        self.update(handle, |animation| animation.stop = mode)
    }

    pub fn pause_all(&mut self) {
        for animation in self.animations.values_mut() {
            animation.paused = true;
        }
    }

    pub fn resume_all(&mut self) {
        for animation in self.animations.values_mut() {
            animation.paused = false;
        }
    }

    pub fn toggle_all(&mut self) {
        for animation in self.animations.values_mut() {
            animation.paused = !animation.paused;
        }
    }

    pub fn stop_all(&mut self, complete: bool) {
        let mode = if complete {
            StopMode::Complete
        } else {
            StopMode::Abrupt
        };
        for animation in self.animations.values_mut() {
            animation.stop = mode;
        }
    }

    /// Snapshot of a live run
    pub fn state<'a>(&self, handle: impl Into<AnimationRef<'a>>) -> Option<AnimationState> {
        self.lookup(handle.into())
            .and_then(|id| self.animations.get(id))
            .map(Animation::state)
    }

    /// Id of the live run started under `name`
    pub fn id_of(&self, name: &str) -> Option<AnimationId> {
        self.names.get(name).copied()
    }

    pub fn is_active<'a>(&self, handle: impl Into<AnimationRef<'a>>) -> bool {
        self.lookup(handle.into()).is_some()
    }

    /// Number of live runs
    pub fn active_count(&self) -> usize {
        self.animations.len()
    }

    /// Check if any runs are still live
    pub fn has_active_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Iterate over the ids of live runs
    pub fn ids(&self) -> impl Iterator<Item = AnimationId> + '_ {
        self.animations.keys()
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}
