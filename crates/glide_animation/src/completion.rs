//! Completion signals
//!
//! Every run and every chain hands back a [`Completion`]. It is a plain
//! `Future`, so callers can `.await` it on any executor, and it can also be
//! polled without an executor through [`Completion::try_take`], which is how
//! the sequencer watches its current item from inside `tick`.

use crate::error::{AnimationError, Result};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Resolves once with the outcome of a run
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T>>,
}

/// Sending half of a [`Completion`]
pub struct Completer<T> {
    tx: oneshot::Sender<Result<T>>,
}

/// Create a connected completer/completion pair
pub fn completion_pair<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, Completion { rx })
}

impl<T> Completer<T> {
    /// Resolve the paired completion. A dropped receiver is ignored.
    pub fn complete(self, result: Result<T>) {
        let _ = self.tx.send(result);
    }
}

impl<T> Completion<T> {
    /// Take the result if it is ready.
    ///
    /// Returns `None` while the run is still in flight and
    /// `Some(Err(Cancelled))` once the sender is gone.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(AnimationError::Cancelled)),
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(AnimationError::Cancelled)))
    }
}
