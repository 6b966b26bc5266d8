//! Chat assistant mockup: a question is typed, the assistant "thinks", then
//! the answer is typed out. Scripts rotate.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TimelineError;
use crate::phase::Phase;
use crate::rotation::Rotation;
use crate::scene::Scene;
use crate::timeline::Timeline;

pub const QUESTION: &str = "question";
pub const ANSWER: &str = "answer";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    Idle,
    TypingQuestion,
    Thinking,
    TypingAnswer,
    Complete,
}

impl Phase for ChatPhase {
    fn initial() -> Self {
        ChatPhase::Idle
    }

    fn successor(self) -> Option<Self> {
        match self {
            ChatPhase::Idle => Some(ChatPhase::TypingQuestion),
            ChatPhase::TypingQuestion => Some(ChatPhase::Thinking),
            ChatPhase::Thinking => Some(ChatPhase::TypingAnswer),
            ChatPhase::TypingAnswer => Some(ChatPhase::Complete),
            ChatPhase::Complete => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ChatPhase::Idle => "idle",
            ChatPhase::TypingQuestion => "typing_question",
            ChatPhase::Thinking => "thinking",
            ChatPhase::TypingAnswer => "typing_answer",
            ChatPhase::Complete => "complete",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPatch {
    /// The "assistant is typing" dots.
    TypingIndicator(bool),
    Cursor(bool),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDraft {
    pub typing_indicator: bool,
    pub cursor: bool,
}

impl Scene for ChatDraft {
    type Phase = ChatPhase;
    type Patch = ChatPatch;

    fn apply(&mut self, patch: &ChatPatch) {
        match *patch {
            ChatPatch::TypingIndicator(on) => self.typing_indicator = on,
            ChatPatch::Cursor(on) => self.cursor = on,
        }
    }
}

/// One question/answer exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatScript {
    pub question: String,
    pub answer: String,
}

impl ChatScript {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// The full exchange, followed by a hold and a pause before the next one.
    pub fn timeline(&self, cfg: &Config) -> Result<Timeline<ChatDraft>, TimelineError> {
        let style = cfg.type_style();
        Timeline::builder()
            .wait(cfg.lead_in_ms)
            .emit(ChatPhase::TypingQuestion)
            .set(ChatPatch::Cursor(true))
            .type_text(QUESTION, &self.question, &style)
            .set(ChatPatch::Cursor(false))
            .emit(ChatPhase::Thinking)
            .set(ChatPatch::TypingIndicator(true))
            .wait(cfg.think_ms)
            .set(ChatPatch::TypingIndicator(false))
            .emit(ChatPhase::TypingAnswer)
            .type_text(ANSWER, &self.answer, &style)
            .emit(ChatPhase::Complete)
            .wait(cfg.hold_ms)
            .advance_after(cfg.loop_pause_ms)
            .build()
    }
}

/// Cycle through `scripts`, building each timeline when its turn comes.
pub fn chat_rotation(
    scripts: Vec<ChatScript>,
    cfg: &Config,
) -> Result<Rotation<ChatDraft>, TimelineError> {
    let cfg = cfg.clone();
    let len = scripts.len();
    Rotation::from_fn(len, move |cursor| {
        scripts
            .get(cursor.index)
            .ok_or(TimelineError::EmptyRotation)?
            .timeline(&cfg)
    })
}

/// Scripts shown on the landing page when the host supplies none.
pub fn default_scripts() -> Vec<ChatScript> {
    vec![
        ChatScript::new(
            "Summarize this week's support tickets",
            "Most tickets were about login loops after the SSO change.",
        ),
        ChatScript::new(
            "Draft a reply to the billing question",
            "Thanks for reaching out! Your invoice was updated today.",
        ),
        ChatScript::new(
            "Which pages link to the old pricing?",
            "Three pages still do: /plans, /faq and /compare.",
        ),
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
            lead_in_ms: 10,
            think_ms: 20,
            hold_ms: 30,
            loop_pause_ms: 40,
        }
    }

    #[test]
    fn walks_every_phase_in_order() {
        let cfg = fast();
        let tl = ChatScript::new("hi?", "hello").timeline(&cfg).unwrap();
        let mut seq = Sequencer::<ChatDraft>::new(cfg);
        seq.start(tl);
        let out = seq.update(10 + 3 + 20 + 5);
        let phases: Vec<ChatPhase> = out
            .changes
            .iter()
            .filter_map(|c| match &c.kind {
                ChangeKind::Phase(t) => Some(t.to),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                ChatPhase::TypingQuestion,
                ChatPhase::Thinking,
                ChatPhase::TypingAnswer,
                ChatPhase::Complete
            ]
        );
        let snap = seq.snapshot();
        assert_eq!(snap.text(QUESTION), "hi?");
        assert_eq!(snap.text(ANSWER), "hello");
        assert!(!snap.scene.typing_indicator);
    }

    #[test]
    fn indicator_is_on_while_thinking() {
        let cfg = fast();
        let tl = ChatScript::new("q", "a").timeline(&cfg).unwrap();
        let mut seq = Sequencer::<ChatDraft>::new(cfg);
        seq.start(tl);
        seq.update(10 + 1 + 5);
        assert_eq!(seq.snapshot().phase, ChatPhase::Thinking);
        assert!(seq.snapshot().scene.typing_indicator);
    }

    #[test]
    fn rotation_moves_to_next_script() {
        let cfg = fast();
        let rot = chat_rotation(default_scripts(), &cfg).unwrap();
        assert_eq!(rot.len(), 3);
        let mut seq = Sequencer::<ChatDraft>::new(cfg);
        seq.start_rotation(rot).unwrap();
        // First exchange (154ms with its hold) plus the 40ms loop pause.
        seq.update(250);
        assert_eq!(seq.snapshot().iteration, 1);
        assert_eq!(seq.snapshot().scenario, 1);
    }
}
