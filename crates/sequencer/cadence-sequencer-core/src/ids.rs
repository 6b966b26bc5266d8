//! Identifiers and the allocator handing them out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for one run of a scripted animation. Returned by `Sequencer::start`
/// and accepted by `Sequencer::cancel`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Monotonic allocator for session ids. Each sequencer owns its own, so ids
/// are only unique within one widget instance.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_session: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_session(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session = self.next_session.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_session(), SessionId(0));
        assert_eq!(alloc.alloc_session(), SessionId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_session(), SessionId(0));
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(SessionId(7).to_string(), "session#7");
    }
}
