//! Built-in scenes for the site's product mockups.

pub mod caption;
pub mod chat_draft;
pub mod code_rotation;

pub use caption::{Caption, CaptionPatch, CaptionPhase};
pub use chat_draft::{ChatDraft, ChatPatch, ChatPhase, ChatScript};
pub use code_rotation::{CodePatch, CodePhase, CodeScene, Snippet};
