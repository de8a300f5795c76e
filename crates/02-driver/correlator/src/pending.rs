//! Single-settlement state shared by the reply listener and the timer.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

/// Which trigger settled an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettledBy {
    /// The paired inbound event arrived first.
    Event,
    /// The reply window elapsed first.
    Timeout,
}

/// Value an operation settled with, tagged with the winning trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement<T> {
    /// Settled value.
    pub value: T,
    /// Winning trigger.
    pub via: SettledBy,
}

impl<T> Settlement<T> {
    /// Drops the trigger tag.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Whether the reply window elapsed before any reply.
    pub fn timed_out(&self) -> bool {
        self.via == SettledBy::Timeout
    }
}

/// Observable state of a [`PendingOperation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationState {
    /// No trigger has fired yet.
    Pending,
    /// A trigger fired; terminal.
    Settled,
}

/// Handle through which triggers settle an awaitable operation.
///
/// Clones share one settle slot. The slot is taken by the first
/// [`settle`](Self::settle) call; every later call is a no-op.
pub struct PendingOperation<T> {
    slot: Rc<RefCell<Option<oneshot::Sender<Settlement<T>>>>>,
}

impl<T> Clone for PendingOperation<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> PendingOperation<T> {
    /// Creates an operation in the `Pending` state and the future that
    /// observes its settlement.
    pub fn new() -> (Self, Completion<T>) {
        let (sender, receiver) = oneshot::channel();
        let pending = Self {
            slot: Rc::new(RefCell::new(Some(sender))),
        };
        (pending, Completion { receiver })
    }

    /// Current state.
    pub fn state(&self) -> OperationState {
        if self.slot.borrow().is_some() {
            OperationState::Pending
        } else {
            OperationState::Settled
        }
    }

    /// Whether a trigger already settled the operation.
    pub fn is_settled(&self) -> bool {
        self.state() == OperationState::Settled
    }

    /// Whether the operation is still pending but nobody awaits it anymore.
    pub fn is_abandoned(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(|sender| sender.is_canceled())
    }

    /// Settles with `value` if still pending. Returns whether this call
    /// performed the settlement.
    pub fn settle(&self, value: T, via: SettledBy) -> bool {
        let Some(sender) = self.slot.borrow_mut().take() else {
            return false;
        };
        // A dropped `Completion` still counts as settled.
        let _ = sender.send(Settlement { value, via });
        true
    }
}

/// Future resolving to the settlement of a [`PendingOperation`].
///
/// Yields `None` only if every handle was dropped without settling.
pub struct Completion<T> {
    receiver: oneshot::Receiver<Settlement<T>>,
}

impl<T> Future for Completion<T> {
    type Output = Option<Settlement<T>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(Result::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn first_settle_wins() {
        let (pending, completion) = PendingOperation::new();
        let timer_side = pending.clone();

        assert_eq!(pending.state(), OperationState::Pending);
        assert!(pending.settle("reply", SettledBy::Event));
        assert!(!timer_side.settle("timeout", SettledBy::Timeout));
        assert!(timer_side.is_settled());

        let settlement = block_on(completion).expect("settled");
        assert_eq!(settlement.value, "reply");
        assert_eq!(settlement.via, SettledBy::Event);
        assert!(!settlement.timed_out());
    }

    #[test]
    fn settling_after_completion_dropped_still_counts() {
        let (pending, completion) = PendingOperation::<u32>::new();
        drop(completion);
        assert!(pending.is_abandoned());
        assert!(pending.settle(7, SettledBy::Timeout));
        assert!(!pending.is_abandoned());
        assert!(!pending.settle(8, SettledBy::Event));
    }

    #[test]
    fn completion_yields_none_when_never_settled() {
        let (pending, completion) = PendingOperation::<()>::new();
        drop(pending);
        assert!(block_on(completion).is_none());
    }
}
