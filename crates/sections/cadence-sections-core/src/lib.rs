//! Cadence Sections Core (host-agnostic)
//!
//! Maps scroll progress or element visibility to the single section a sticky
//! navigation should highlight.

pub mod config;
pub mod error;
pub mod progress;
pub mod sections;
pub mod tracker;
pub mod visibility;
pub mod watch;

pub use config::{build_tracker, Strategy, TrackerConfig};
pub use error::SectionError;
pub use progress::{active_index_for, progress_from_scroll, ProgressTracker};
pub use sections::Sections;
pub use tracker::{SectionTracker, Signal};
pub use visibility::VisibilityTracker;
pub use watch::{ActiveChange, SectionWatch};
