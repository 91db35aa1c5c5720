//! Glide Core
//!
//! Host capabilities the animation engine is written against:
//!
//! - **Animatable targets**: the [`Animatable`] trait is the only way the
//!   engine reads or writes a target, so any node type can be animated
//! - **Headless elements**: [`Element`] keeps styles in memory for tests,
//!   servers and offscreen rendering
//! - **Selectors**: [`Document`] resolves `#id`, `.class` and tag selectors
//! - **Clocks**: [`SystemClock`] for real frames, [`ManualClock`] for
//!   deterministic driving
//!
//! # Example
//!
//! ```rust
//! use glide_core::{Animatable, Document, Element, ElementQuery};
//!
//! let mut document = Document::new();
//! let ball = document.append(Element::new("div").with_id("ball"));
//!
//! ball.borrow_mut().set_style("left", "10px");
//!
//! let found = document.query("#ball").unwrap();
//! assert_eq!(found.borrow().style("left").as_deref(), Some("10px"));
//! ```

pub mod clock;
pub mod document;
pub mod element;

pub use clock::{Clock, ManualClock, SystemClock, FRAME_MS};
pub use document::{Document, ElementQuery};
pub use element::{Animatable, Element, ElementRef, ScrollAxis};
