//! Phase state machine: a single forward path from an initial phase to a
//! terminal one.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// A closed, domain-specific set of stages. Implementors describe one linear
/// path: `initial()` followed by repeated `successor()` until `None`.
pub trait Phase: Copy + Eq + fmt::Debug + Serialize + DeserializeOwned + 'static {
    fn initial() -> Self;

    /// The only phase allowed to follow `self`; `None` for the terminal phase.
    fn successor(self) -> Option<Self>;

    /// Stable name used in logs and error messages.
    fn name(self) -> &'static str;

    fn is_terminal(self) -> bool {
        self.successor().is_none()
    }

    /// Every phase in path order.
    fn path() -> Vec<Self> {
        let mut out = vec![Self::initial()];
        while let Some(next) = out.last().and_then(|p| p.successor()) {
            // A successor that loops back would be a broken impl; stop there.
            if out.contains(&next) {
                break;
            }
            out.push(next);
        }
        out
    }
}

/// One observed phase change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: Phase"))]
pub struct Transition<P: Phase> {
    pub from: P,
    pub to: P,
}

impl<P: Phase> fmt::Display for Transition<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from.name(), self.to.name())
    }
}

/// Tracks the current phase and refuses anything but a step along the path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseMachine<P: Phase> {
    current: P,
}

impl<P: Phase> Default for PhaseMachine<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Phase> PhaseMachine<P> {
    pub fn new() -> Self {
        Self {
            current: P::initial(),
        }
    }

    #[inline]
    pub fn current(&self) -> P {
        self.current
    }

    /// Move to `to`. Re-entering the current phase is a no-op (`Ok(None)`);
    /// anything other than the direct successor is refused.
    pub fn advance(&mut self, to: P) -> Result<Option<Transition<P>>, TimelineError> {
        if to == self.current {
            return Ok(None);
        }
        if self.current.successor() != Some(to) {
            return Err(TimelineError::PhaseSkipped {
                from: self.current.name(),
                to: to.name(),
            });
        }
        let from = std::mem::replace(&mut self.current, to);
        Ok(Some(Transition { from, to }))
    }

    /// Return to the initial phase for a fresh iteration.
    pub fn reset(&mut self) -> Option<Transition<P>> {
        let initial = P::initial();
        if self.current == initial {
            return None;
        }
        let from = std::mem::replace(&mut self.current, initial);
        Some(Transition { from, to: initial })
    }
}
