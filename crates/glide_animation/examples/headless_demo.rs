//! Headless Animation Demo
//!
//! Plays a short chain against in-memory elements and prints the styles
//! each frame produces. Set `RUST_LOG=glide_animation=debug` to follow the
//! scheduler.
//!
//! Run with: cargo run -p glide_animation --example headless_demo

use glide_animation::{
    AnimationRequest, Animator, ChainOptions, Direction, EffectOptions, Effects, PropertyBag,
};
use glide_core::{Document, Element, ManualClock};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() -> glide_animation::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = ManualClock::new();
    let mut document = Document::new();
    let card = document.append(Element::new("div").with_id("card").with_style("opacity", "0"));
    let badge = document.append(
        Element::new("span")
            .with_class("badge")
            .with_computed_style("backgroundColor", "#202020"),
    );
    let mut animator = Animator::with_clock(clock.clone()).with_document(Rc::new(document));

    let done = animator.chain(
        vec![
            AnimationRequest::new("#card")
                .draw(PropertyBag::new().with("opacity", 1).with("translateY", (24, 0)))
                .duration(240.0)
                .ease("easeOutCubic"),
            AnimationRequest::new(".badge")
                .draw(PropertyBag::new().with("backgroundColor", "#ff6600"))
                .duration(160.0)
                .direction(Direction::Alternate),
        ],
        ChainOptions::new()
            .on_item(|index, _| println!("-- item {}", index))
            .on_complete(|| println!("-- chain complete")),
    );

    while animator.active_chain_count() > 0 {
        clock.step_frame();
        animator.tick();
        println!(
            "{:>6.1}ms  card opacity={:<6} transform={:<18} badge={}",
            animator.now(),
            card.borrow().style("opacity").unwrap_or_default(),
            card.borrow().transform().unwrap_or_default(),
            badge.borrow().style("backgroundColor").unwrap_or_default(),
        );
    }
    pollster::block_on(done)?;

    let (out, _) = Effects::switch(&card, &badge, &EffectOptions::new());
    pollster::block_on(out)?;
    println!("card hidden={:?}", card.borrow().attribute("hidden"));

    Ok(())
}
