//! # Subscription token.
//!
//! A [`Token`] identifies one subscription of a producer. It owns the
//! producer's cancellation handle and a three-state flag:
//!
//! ```text
//!            terminate()
//!   LIVE ───────────────► TERMINATED
//!     │
//!     │ cancel()
//!     ▼
//!   CANCELLED
//! ```
//!
//! Both exits are compare-and-swap from `LIVE`, so exactly one of them wins and
//! each happens at most once. The handle slot is set at most once as well; a
//! handle that arrives after cancellation is cancelled on arrival.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use arc_swap::ArcSwapOption;

use crate::producers::Cancel;

const LIVE: u8 = 0;
const TERMINATED: u8 = 1;
const CANCELLED: u8 = 2;

struct HandleBox(Box<dyn Cancel>);

/// Result of [`Token::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attach {
    /// Stored while the token is live.
    Attached,
    /// Stored after the token left `LIVE`; cancelled immediately if the token was cancelled.
    Late,
    /// A handle was already stored; the new one was cancelled and discarded.
    Duplicate,
}

impl Attach {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            Attach::Attached => "attached",
            Attach::Late => "late",
            Attach::Duplicate => "duplicate",
        }
    }
}

/// Identity of one subscription.
pub(crate) struct Token {
    id: u64,
    state: AtomicU8,
    handle: ArcSwapOption<HandleBox>,
}

impl Token {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            state: AtomicU8::new(LIVE),
            handle: ArcSwapOption::empty(),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        self.state.load(Ordering::SeqCst) == LIVE
    }

    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == CANCELLED
    }

    #[cfg(test)]
    pub(crate) fn has_handle(&self) -> bool {
        self.handle.load().is_some()
    }

    /// Records the producer's cancellation handle.
    ///
    /// The handle is published before the state is read, and `cancel` flips the
    /// state before reading the handle, so a racing cancel either finds the
    /// handle or is seen here.
    pub(crate) fn attach(&self, handle: Box<dyn Cancel>) -> Attach {
        let new = Arc::new(HandleBox(handle));
        let prev = self
            .handle
            .compare_and_swap(&None::<Arc<HandleBox>>, Some(Arc::clone(&new)));
        if prev.is_some() {
            new.0.cancel();
            return Attach::Duplicate;
        }

        match self.state.load(Ordering::SeqCst) {
            LIVE => Attach::Attached,
            CANCELLED => {
                new.0.cancel();
                Attach::Late
            }
            _ => Attach::Late,
        }
    }

    /// Moves `LIVE → CANCELLED` and cancels the handle, if one is stored.
    ///
    /// Returns `false` when the token already left `LIVE`.
    pub(crate) fn cancel(&self) -> bool {
        if self
            .state
            .compare_exchange(LIVE, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        if let Some(handle) = self.handle.load_full() {
            handle.0.cancel();
        }
        true
    }

    /// Moves `LIVE → TERMINATED`. The winner delivers the terminal outcome.
    pub(crate) fn terminate(&self) -> bool {
        self.state
            .compare_exchange(LIVE, TERMINATED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::CountingCancel;

    #[test]
    fn test_cancel_reaches_handle_once() {
        let (handle, count) = CountingCancel::new();
        let token = Token::new(1);
        assert_eq!(token.attach(Box::new(handle)), Attach::Attached);

        assert!(token.cancel());
        assert!(!token.cancel());
        assert_eq!(count.get(), 1);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_late_handle_is_cancelled_on_arrival() {
        let (handle, count) = CountingCancel::new();
        let token = Token::new(1);
        assert!(token.cancel());

        assert_eq!(token.attach(Box::new(handle)), Attach::Late);
        assert_eq!(count.get(), 1);
        assert!(token.has_handle());
    }

    #[test]
    fn test_handle_after_terminate_is_kept_but_inert() {
        let (handle, count) = CountingCancel::new();
        let token = Token::new(1);
        assert!(token.terminate());

        assert_eq!(token.attach(Box::new(handle)), Attach::Late);
        assert!(!token.cancel());
        assert_eq!(count.get(), 0);
        assert!(token.has_handle());
    }

    #[test]
    fn test_second_handle_is_rejected() {
        let (first, first_count) = CountingCancel::new();
        let (second, second_count) = CountingCancel::new();
        let token = Token::new(1);

        assert_eq!(token.attach(Box::new(first)), Attach::Attached);
        assert_eq!(token.attach(Box::new(second)), Attach::Duplicate);
        assert_eq!(second_count.get(), 1);

        token.cancel();
        assert_eq!(first_count.get(), 1);
    }

    #[test]
    fn test_terminate_and_cancel_are_exclusive() {
        let token = Token::new(1);
        assert!(token.terminate());
        assert!(!token.terminate());
        assert!(!token.cancel());
        assert!(!token.is_live());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_racing_cancel_and_attach_cancel_the_handle() {
        for _ in 0..200 {
            let (handle, count) = CountingCancel::new();
            let token = Arc::new(Token::new(1));

            let t = Arc::clone(&token);
            let canceller = std::thread::spawn(move || t.cancel());
            token.attach(Box::new(handle));
            assert!(canceller.join().unwrap());

            assert!(count.get() >= 1, "handle must be cancelled at least once");
        }
    }
}
