//! Code editor mockup: snippets in different languages are typed, held, then
//! erased to make room for the next one.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TimelineError;
use crate::phase::Phase;
use crate::rotation::{Rotation, RotationCursor};
use crate::scene::Scene;
use crate::timeline::Timeline;

pub const CODE: &str = "code";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePhase {
    Idle,
    Erasing,
    Typing,
    Holding,
}

impl Phase for CodePhase {
    fn initial() -> Self {
        CodePhase::Idle
    }

    fn successor(self) -> Option<Self> {
        match self {
            CodePhase::Idle => Some(CodePhase::Erasing),
            CodePhase::Erasing => Some(CodePhase::Typing),
            CodePhase::Typing => Some(CodePhase::Holding),
            CodePhase::Holding => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            CodePhase::Idle => "idle",
            CodePhase::Erasing => "erasing",
            CodePhase::Typing => "typing",
            CodePhase::Holding => "holding",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePatch {
    /// Label of the editor tab.
    Language(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeScene {
    pub language: Option<String>,
}

impl Scene for CodeScene {
    type Phase = CodePhase;
    type Patch = CodePatch;

    fn apply(&mut self, patch: &CodePatch) {
        match patch {
            CodePatch::Language(lang) => self.language = Some(lang.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub language: String,
    pub code: String,
}

impl Snippet {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
        }
    }
}

/// Timeline for `snippets[cursor.index]`, erasing the previous snippet first.
pub fn snippet_timeline(
    snippets: &[Snippet],
    cursor: RotationCursor,
    cfg: &Config,
) -> Result<Timeline<CodeScene>, TimelineError> {
    let current = snippets
        .get(cursor.index)
        .ok_or(TimelineError::EmptyRotation)?;
    let previous = cursor
        .previous
        .and_then(|i| snippets.get(i))
        .map(|s| s.code.as_str())
        .unwrap_or("");
    let style = cfg.type_style();
    Timeline::builder()
        .carry_slot(CODE)
        .emit(CodePhase::Erasing)
        .erase_text(CODE, previous, &style)
        .emit(CodePhase::Typing)
        .set(CodePatch::Language(current.language.clone()))
        .type_text(CODE, &current.code, &style)
        .emit(CodePhase::Holding)
        .wait(cfg.hold_ms)
        .advance_after(cfg.loop_pause_ms)
        .build()
}

pub fn code_rotation(
    snippets: Vec<Snippet>,
    cfg: &Config,
) -> Result<Rotation<CodeScene>, TimelineError> {
    let cfg = cfg.clone();
    let len = snippets.len();
    Rotation::from_fn(len, move |cursor| snippet_timeline(&snippets, cursor, &cfg))
}

pub fn default_snippets() -> Vec<Snippet> {
    vec![
        Snippet::new("rust", "let total: u32 = items.iter().sum();"),
        Snippet::new("python", "total = sum(items)"),
        Snippet::new("typescript", "const total = items.reduce((a, b) => a + b, 0);"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::ChangeKind;
    use crate::sequencer::Sequencer;

    fn fast() -> Config {
        Config {
            type_interval_ms: 1,
            erase_interval_ms: 1,
            punctuation_pause_ms: 0,
            lead_in_ms: 0,
            think_ms: 0,
            hold_ms: 10,
            loop_pause_ms: 5,
        }
    }

    #[test]
    fn first_run_has_nothing_to_erase() {
        let snippets = vec![Snippet::new("rust", "fn")];
        let tl = snippet_timeline(&snippets, RotationCursor::default(), &fast()).unwrap();
        assert!(tl
            .steps()
            .iter()
            .all(|s| !matches!(s, crate::timeline::Step::EraseChar(_))));
    }

    #[test]
    fn erases_previous_snippet_before_typing() {
        let cfg = fast();
        let snippets = vec![Snippet::new("rust", "ab"), Snippet::new("go", "xyz")];
        let mut seq = Sequencer::<CodeScene>::new(cfg.clone());
        seq.start_rotation(code_rotation(snippets, &cfg).unwrap())
            .unwrap();
        // "ab" typed (2ms), held (10ms), pause (5ms).
        let first = seq.update(17);
        assert_eq!(seq.snapshot().scenario, 1);
        assert!(first.changes.iter().any(|c| matches!(
            &c.kind,
            ChangeKind::Reveal { visible, .. } if visible == "ab"
        )));

        let out = seq.update(2 + 3);
        let visible: Vec<String> = out
            .changes
            .iter()
            .filter_map(|c| match &c.kind {
                ChangeKind::Reveal { visible, .. } => Some(visible.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(visible, vec!["a", "", "", "x", "xy", "xyz"]);
        assert_eq!(seq.snapshot().scene.language.as_deref(), Some("go"));
    }
}
