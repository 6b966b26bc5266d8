//! Cadence Sequencer Core (host-agnostic)
//!
//! Drives scripted, timed and cancellable UI simulations: typed-text reveal,
//! phase transitions and looping demo rotations. The host owns one
//! [`Sequencer`] per widget instance and advances it with `update(dt_ms)`;
//! every continuation runs on that single logical thread.

pub mod cancel;
pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod phase;
pub mod reveal;
pub mod rotation;
pub mod scene;
pub mod scenes;
pub mod sequencer;
pub mod stored_timeline;
pub mod timeline;
pub mod timer;
pub mod typewriter;

// Re-exports for consumers (adapters)
pub use cancel::CancelToken;
pub use clock::{Clock, FrameClock, Millis};
pub use config::Config;
pub use error::{StoredTimelineError, TimelineError};
pub use ids::{IdAllocator, SessionId};
pub use outputs::{Change, ChangeKind, CoreEvent, Outputs};
pub use phase::{Phase, PhaseMachine, Transition};
pub use reveal::{RevealSet, RevealState};
pub use rotation::{Rotation, RotationCursor, ScenarioSource};
pub use scene::{Scene, Snapshot};
pub use sequencer::{Sequencer, SessionStatus, Subscriber};
pub use stored_timeline::{parse_stored_rotation_json, parse_stored_timeline_json};
pub use timeline::{LoopPolicy, Step, Timeline, TimelineBuilder};
pub use timer::{TimerHandle, TimerQueue};
pub use typewriter::{erase_text, retype, type_text, TypeStyle};
