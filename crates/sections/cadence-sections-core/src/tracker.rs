use serde::{Deserialize, Serialize};

/// One observation fed to a tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Signal {
    /// Document scroll position as a fraction, nominally in [0, 1].
    Progress { progress: f64 },
    /// An intersection observer entry for one section.
    Visibility {
        id: String,
        intersecting: bool,
        ratio: f64,
    },
}

impl Signal {
    pub fn progress(progress: f64) -> Self {
        Signal::Progress { progress }
    }

    pub fn visible(id: impl Into<String>, ratio: f64) -> Self {
        Signal::Visibility {
            id: id.into(),
            intersecting: true,
            ratio,
        }
    }

    pub fn hidden(id: impl Into<String>) -> Self {
        Signal::Visibility {
            id: id.into(),
            intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Maps signals to the active section. Feeding the same signal twice never
/// changes the result the second time.
pub trait SectionTracker {
    /// Apply a signal. Returns `true` when the active section changed.
    /// Signals of the other strategy are ignored.
    fn observe(&mut self, signal: &Signal) -> bool;

    fn active_index(&self) -> Option<usize>;

    fn sections(&self) -> &[String];

    /// Back to "nothing observed yet".
    fn reset(&mut self);

    fn active(&self) -> Option<&str> {
        self.active_index()
            .and_then(|i| self.sections().get(i))
            .map(String::as_str)
    }
}
