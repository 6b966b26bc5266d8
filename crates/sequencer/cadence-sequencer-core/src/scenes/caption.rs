//! A single typed line with a blinking cursor. The smallest useful scene.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TimelineError;
use crate::phase::Phase;
use crate::scene::Scene;
use crate::timeline::Timeline;

pub const LINE: &str = "line";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPhase {
    Idle,
    Typing,
    Shown,
}

impl Phase for CaptionPhase {
    fn initial() -> Self {
        CaptionPhase::Idle
    }

    fn successor(self) -> Option<Self> {
        match self {
            CaptionPhase::Idle => Some(CaptionPhase::Typing),
            CaptionPhase::Typing => Some(CaptionPhase::Shown),
            CaptionPhase::Shown => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            CaptionPhase::Idle => "idle",
            CaptionPhase::Typing => "typing",
            CaptionPhase::Shown => "shown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPatch {
    Cursor(bool),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub cursor: bool,
}

impl Scene for Caption {
    type Phase = CaptionPhase;
    type Patch = CaptionPatch;

    fn apply(&mut self, patch: &CaptionPatch) {
        match patch {
            CaptionPatch::Cursor(on) => self.cursor = *on,
        }
    }
}

/// Type `text` once, then hold it.
pub fn caption_timeline(text: &str, cfg: &Config) -> Result<Timeline<Caption>, TimelineError> {
    Timeline::builder()
        .wait(cfg.lead_in_ms)
        .emit(CaptionPhase::Typing)
        .set(CaptionPatch::Cursor(true))
        .type_text(LINE, text, &cfg.type_style())
        .set(CaptionPatch::Cursor(false))
        .emit(CaptionPhase::Shown)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::{Sequencer, SessionStatus};

    #[test]
    fn types_and_settles() {
        let cfg = Config::default();
        let tl = caption_timeline("Ship it.", &cfg).unwrap();
        let mut seq = Sequencer::<Caption>::new(cfg);
        seq.start(tl);
        seq.update(10_000);
        let snap = seq.snapshot();
        assert_eq!(snap.text(LINE), "Ship it.");
        assert_eq!(snap.phase, CaptionPhase::Shown);
        assert!(!snap.scene.cursor);
        assert_eq!(seq.status(), SessionStatus::Finished);
    }

    #[test]
    fn patch_json_shape() {
        let v = serde_json::to_value(CaptionPatch::Cursor(false)).unwrap();
        assert_eq!(v, serde_json::json!({ "cursor": false }));
    }
}
