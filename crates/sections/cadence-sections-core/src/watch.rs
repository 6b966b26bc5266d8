//! Change notification on top of any tracker.

use serde::{Deserialize, Serialize};

use crate::tracker::{SectionTracker, Signal};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChange {
    pub previous: Option<String>,
    pub current: Option<String>,
}

type Listener = Box<dyn FnMut(&ActiveChange)>;

/// Wraps a tracker and tells listeners when the active section changes.
pub struct SectionWatch {
    tracker: Box<dyn SectionTracker>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for SectionWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionWatch")
            .field("active", &self.tracker.active())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SectionWatch {
    pub fn new(tracker: Box<dyn SectionTracker>) -> Self {
        Self {
            tracker,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ActiveChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply `signal`; returns the change, if any, after notifying listeners.
    pub fn observe(&mut self, signal: &Signal) -> Option<ActiveChange> {
        let previous = self.tracker.active().map(str::to_string);
        if !self.tracker.observe(signal) {
            return None;
        }
        self.emit(previous)
    }

    /// Clear the tracker. Listeners hear about it only if something was active.
    pub fn reset(&mut self) -> Option<ActiveChange> {
        let previous = self.tracker.active().map(str::to_string);
        self.tracker.reset();
        if previous.is_none() {
            return None;
        }
        self.emit(previous)
    }

    pub fn active(&self) -> Option<&str> {
        self.tracker.active()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tracker.active_index()
    }

    pub fn tracker(&self) -> &dyn SectionTracker {
        self.tracker.as_ref()
    }

    fn emit(&mut self, previous: Option<String>) -> Option<ActiveChange> {
        let change = ActiveChange {
            previous,
            current: self.tracker.active().map(str::to_string),
        };
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
        Some(change)
    }
}
