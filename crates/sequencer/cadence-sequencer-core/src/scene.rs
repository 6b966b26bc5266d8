//! The consumer-owned state a timeline mutates, and the snapshot handed to
//! renderers.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::phase::Phase;
use crate::reveal::RevealSet;
use crate::sequencer::SessionStatus;

/// State shape of one widget. `SetState` steps carry a `Patch` that
/// `apply` folds into the scene.
pub trait Scene: Clone + Default + PartialEq + fmt::Debug + Serialize + 'static {
    type Phase: Phase;
    type Patch: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned;

    fn apply(&mut self, patch: &Self::Patch);
}

/// Everything a renderer needs to draw the current frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "S: Scene", deserialize = "S: Scene + DeserializeOwned"))]
pub struct Snapshot<S: Scene> {
    pub session: Option<SessionId>,
    pub status: SessionStatus,
    pub phase: S::Phase,
    pub scene: S,
    pub reveals: RevealSet,
    /// Completed loop iterations of the current session.
    pub iteration: u64,
    /// Rotation index of the running scenario.
    pub scenario: usize,
}

impl<S: Scene> Default for Snapshot<S> {
    fn default() -> Self {
        Self {
            session: None,
            status: SessionStatus::Idle,
            phase: S::Phase::initial(),
            scene: S::default(),
            reveals: RevealSet::new(),
            iteration: 0,
            scenario: 0,
        }
    }
}

impl<S: Scene> Snapshot<S> {
    /// Visible text of a reveal slot (`""` when never opened).
    pub fn text(&self, slot: &str) -> &str {
        self.reveals.visible(slot)
    }
}
