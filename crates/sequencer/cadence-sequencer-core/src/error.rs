//! Construction-time errors. Running a timeline never fails; cancellation is
//! a silent stop and is not represented here.

use thiserror::Error;

/// Problems found while building or selecting a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("phase `{to}` cannot follow `{from}`")]
    PhaseSkipped {
        from: &'static str,
        to: &'static str,
    },
    #[error("step {index} uses reveal slot `{slot}` before it was opened")]
    UnknownSlot { index: usize, slot: String },
    #[error("looping timeline never waits and would spin forever")]
    ZeroDurationLoop,
    #[error("rotation has no scenarios")]
    EmptyRotation,
}

/// Errors from the JSON timeline loader.
#[derive(Debug, Error)]
pub enum StoredTimelineError {
    #[error("stored timeline parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("erase step on slot `{0}` which holds no typed text")]
    NothingToErase(String),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}
