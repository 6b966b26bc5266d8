//! Liveness flag shared between a session and its pending continuations.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Cooperative cancellation flag. Clones observe the same flag; cancelling
/// any clone cancels them all, and a cancelled token never becomes alive
/// again.
///
/// Single-threaded on purpose: every continuation of a sequencer runs on the
/// thread that owns it.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.cancelled.get()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Flip the flag. Returns `true` only for the call that actually
    /// cancelled.
    pub fn cancel(&self) -> bool {
        !self.cancelled.replace(true)
    }

    /// Whether two tokens share one flag.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("alive", &self.is_alive())
            .finish()
    }
}
