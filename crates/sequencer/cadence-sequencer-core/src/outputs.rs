//! Output contracts of the sequencer.
//!
//! Changes carry state mutations in the order they were applied; events carry
//! session lifecycle signals. Adapters drain both from `Sequencer::update`.

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::ids::SessionId;
use crate::phase::Transition;
use crate::scene::Scene;

/// One applied mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Change<S: Scene> {
    pub session: SessionId,
    /// Virtual time at which the step ran.
    pub at: Millis,
    pub kind: ChangeKind<S>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", bound(serialize = "", deserialize = ""))]
pub enum ChangeKind<S: Scene> {
    Phase(Transition<S::Phase>),
    State(S::Patch),
    /// The scene went back to its default state.
    SceneReset,
    Reveal {
        slot: String,
        revealed: usize,
        total: usize,
        visible: String,
    },
}

/// Session lifecycle signals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
#[non_exhaustive]
pub enum CoreEvent {
    SessionStarted {
        session: SessionId,
        scenario: usize,
    },
    IterationStarted {
        session: SessionId,
        iteration: u64,
        scenario: usize,
    },
    SessionFinished {
        session: SessionId,
    },
    SessionCancelled {
        session: SessionId,
    },
    /// The next scenario of a rotation could not be built; the session stopped.
    Error {
        session: SessionId,
        message: String,
    },
}

/// Everything produced since the previous drain.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Outputs<S: Scene> {
    #[serde(default)]
    pub changes: Vec<Change<S>>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl<S: Scene> Default for Outputs<S> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl<S: Scene> Outputs<S> {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change<S>) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Changes belonging to one session.
    pub fn for_session(&self, session: SessionId) -> impl Iterator<Item = &Change<S>> {
        self.changes.iter().filter(move |c| c.session == session)
    }
}
