//! Sequenced runs
//!
//! A chain plays its requests one after another, never overlapping, and can
//! repeat the whole sequence. Chains are advanced at the end of every
//! [`Animator::tick`], so the next item starts on the same tick the previous
//! one finished.

use crate::completion::{completion_pair, Completer, Completion};
use crate::error::Result;
use crate::request::{AnimationRequest, LoopMode};
use crate::scheduler::{Animator, ChainId};
use glide_core::ElementRef;
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::{debug, warn};

/// Called with the item index and its request
pub type ChainItemFn = Rc<dyn Fn(usize, &AnimationRequest)>;

/// Repetition of a whole chain
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChainLoop {
    #[default]
    Once,
    Infinite,
    /// Total number of passes
    Count(u32),
}

impl From<bool> for ChainLoop {
    fn from(enabled: bool) -> Self {
        if enabled {
            ChainLoop::Infinite
        } else {
            ChainLoop::Once
        }
    }
}

impl From<u32> for ChainLoop {
    fn from(count: u32) -> Self {
        match count {
            0 => ChainLoop::Once,
            n => ChainLoop::Count(n),
        }
    }
}

/// Chain repetition and observers
#[derive(Clone, Default)]
pub struct ChainOptions {
    pub loop_mode: ChainLoop,
    /// Before each item starts
    pub on_item: Option<ChainItemFn>,
    /// After each item completes
    pub on_item_complete: Option<ChainItemFn>,
    /// After each full pass
    pub on_complete: Option<Rc<dyn Fn()>>,
}

impl ChainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loop_mode(mut self, mode: impl Into<ChainLoop>) -> Self {
        self.loop_mode = mode.into();
        self
    }

    pub fn on_item(mut self, f: impl Fn(usize, &AnimationRequest) + 'static) -> Self {
        self.on_item = Some(Rc::new(f));
        self
    }

    pub fn on_item_complete(mut self, f: impl Fn(usize, &AnimationRequest) + 'static) -> Self {
        self.on_item_complete = Some(Rc::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }
}

/// A live chain
pub(crate) struct Chain {
    items: Vec<AnimationRequest>,
    options: ChainOptions,
    index: usize,
    passes: u32,
    current: Option<Completion<ElementRef>>,
    completer: Completer<()>,
}

impl Chain {
    /// Whether another pass should start after `passes` finished ones
    fn repeats(&self) -> bool {
        match self.options.loop_mode {
            ChainLoop::Once => false,
            ChainLoop::Infinite => !self.items.is_empty(),
            ChainLoop::Count(n) => self.passes < n,
        }
    }
}

enum Next {
    /// Current item is still running
    Wait,
    /// Start the item at this index
    Start(AnimationRequest, usize),
    /// Resolve the chain
    Done(Result<()>),
}

impl Animator {
    /// Run `items` in order, each with its loop forced off
    ///
    /// The first item starts immediately. The returned completion resolves
    /// after the last pass, or with the error of the first item that could
    /// not be started.
    pub fn chain(
        &mut self,
        items: Vec<AnimationRequest>,
        options: ChainOptions,
    ) -> Completion<()> {
        let (completer, completion) = completion_pair();
        debug!(
            "Starting chain of {} item(s), loop={:?}",
            items.len(),
            options.loop_mode
        );
        let id = self.chains.insert(Chain {
            items,
            options,
            index: 0,
            passes: 0,
            current: None,
            completer,
        });
        self.drive_chain(id);
        completion
    }

    /// Number of chains still running
    pub fn active_chain_count(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn advance_chains(&mut self) {
        let ids: SmallVec<[ChainId; 4]> = self.chains.keys().collect();
        for id in ids {
            self.drive_chain(id);
        }
    }

    fn drive_chain(&mut self, id: ChainId) {
        let next = match self.chains.get_mut(id) {
            Some(chain) => Self::next_step(chain),
            None => return,
        };

        match next {
            Next::Wait => {}
            Next::Start(request, index) => match self.start(request) {
                Ok((_, completion)) => {
                    if let Some(chain) = self.chains.get_mut(id) {
                        chain.current = Some(completion);
                    }
                    debug!("Chain {:?} started item {}", id, index);
                }
                Err(err) => {
                    warn!("Chain {:?} item {} failed to start: {}", id, index, err);
                    self.close_chain(id, Err(err));
                }
            },
            Next::Done(result) => self.close_chain(id, result),
        }
    }

    /// Consume a finished item if any and decide what happens next
    fn next_step(chain: &mut Chain) -> Next {
        if let Some(current) = chain.current.as_mut() {
            match current.try_take() {
                None => return Next::Wait,
                Some(Err(err)) => return Next::Done(Err(err)),
                Some(Ok(_)) => {
                    chain.current = None;
                    if let Some(f) = &chain.options.on_item_complete {
                        f(chain.index, &chain.items[chain.index]);
                    }
                    chain.index += 1;
                }
            }
        }

        if chain.index >= chain.items.len() {
            chain.passes += 1;
            if let Some(f) = &chain.options.on_complete {
                f();
            }
            if !chain.repeats() {
                return Next::Done(Ok(()));
            }
            chain.index = 0;
        }

        let mut request = chain.items[chain.index].clone();
        request.loop_mode = LoopMode::Off;
        if let Some(f) = &chain.options.on_item {
            f(chain.index, &request);
        }
        Next::Start(request, chain.index)
    }

    fn close_chain(&mut self, id: ChainId, result: Result<()>) {
        let Some(chain) = self.chains.remove(id) else {
            return;
        };
        debug!("Chain {:?} finished after {} pass(es)", id, chain.passes);
        chain.completer.complete(result);
    }
}
