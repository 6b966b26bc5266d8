//! Timer source: payloads scheduled against virtual deadlines.
//!
//! The queue stores data rather than closures. Whoever owns the queue pops
//! due payloads and dispatches them; that keeps every mutation on the
//! owner's `&mut self` and makes cancellation a plain removal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;

/// Cancels exactly one scheduled timer. Handles of fired or cancelled timers
/// are inert.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle {
    deadline: Millis,
    seq: u64,
}

impl TimerHandle {
    #[inline]
    pub fn deadline(&self) -> Millis {
        self.deadline
    }
}

/// Deadline-ordered queue. Timers sharing a deadline fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Millis, u64), T>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to come due at an absolute `deadline`.
    pub fn schedule_at(&mut self, deadline: Millis, payload: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.insert((deadline, seq), payload);
        TimerHandle { deadline, seq }
    }

    /// Schedule `payload` to come due `delay` after `from`.
    pub fn schedule_after(&mut self, from: Millis, delay: Millis, payload: T) -> TimerHandle {
        self.schedule_at(from.saturating_add(delay), payload)
    }

    /// Remove a pending timer, returning its payload. `None` when it already
    /// fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        self.entries.remove(&(handle.deadline, handle.seq))
    }

    /// Drop every pending timer whose payload matches `pred`. Returns how many
    /// were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, payload| !pred(payload));
        before - self.entries.len()
    }

    /// Pop the earliest timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerHandle, T)> {
        let (&(deadline, seq), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.entries
            .remove(&(deadline, seq))
            .map(|payload| (TimerHandle { deadline, seq }, payload))
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
