//! Glide Animation System
//!
//! Time-based interpolation of element styles, transforms and colors.
//!
//! # Features
//!
//! - **Interpolation plans**: property bags are diffed against the target's
//!   current state into plain, transform and color tracks
//! - **Easing**: sine, circ, back, bounce, elastic and power families, each
//!   with in/out/in-out variants, plus cubic bezier and custom curves
//! - **Scheduler**: per-run state machine with delay, loops, alternate
//!   direction, pause/resume and stop-with-completion
//! - **Chains**: ordered, optionally repeating sequences of runs
//! - **Presets**: fade, slide, zoom, swirl and switch effects
//!
//! # Example
//!
//! ```rust
//! use glide_animation::{AnimationRequest, Animator, PropertyBag};
//! use glide_core::{Element, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut animator = Animator::with_clock(clock.clone());
//! let card = Element::new("div").with_style("opacity", "0").into_ref();
//!
//! animator
//!     .animate(
//!         AnimationRequest::new(&card)
//!             .draw(PropertyBag::new().with("opacity", 1).with("translateY", (20, 0)))
//!             .duration(250.0)
//!             .ease("easeOutCubic"),
//!     )
//!     .unwrap();
//!
//! while animator.has_active_animations() {
//!     clock.step_frame();
//!     animator.tick();
//! }
//! assert_eq!(card.borrow().style("opacity").as_deref(), Some("1"));
//! ```

pub mod chain;
pub mod color;
pub mod completion;
pub mod config;
pub mod easing;
pub mod error;
pub mod map;
pub mod presets;
pub mod property;
pub mod request;
pub mod scheduler;
pub mod units;

pub use chain::{ChainLoop, ChainOptions};
pub use color::Rgb;
pub use completion::Completion;
pub use config::AnimatorConfig;
pub use easing::{EaseFamily, Easing, EasingFn};
pub use error::{AnimationError, Result};
pub use map::{AnimationMap, PropertyBag, PropertyValue, Value};
pub use presets::{EffectOptions, Effects};
pub use property::PropertyKind;
pub use request::{AnimationRequest, Direction, Draw, LoopMode, Target};
pub use scheduler::{AnimationId, AnimationRef, AnimationState, Animator, StopMode};
pub use units::{parse_unit, UnitValue};
