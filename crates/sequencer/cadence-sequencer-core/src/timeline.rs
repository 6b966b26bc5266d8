//! Steps, loop policy and the immutable timeline they form.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::error::TimelineError;
use crate::phase::PhaseMachine;
use crate::scene::Scene;
use crate::typewriter::{self, TypeStyle};

/// One unit of work. Only `Wait` suspends; every other step applies and the
/// executor moves straight on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", bound(serialize = "", deserialize = ""))]
pub enum Step<S: Scene> {
    Wait(Millis),
    SetState(S::Patch),
    Emit(S::Phase),
    /// Open a reveal pass on `slot` with nothing shown yet.
    Reveal { slot: String, target: String },
    AppendChar(String),
    EraseChar(String),
}

/// What happens once the last step has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPolicy {
    #[default]
    Once,
    /// Run the same timeline again after a pause.
    RepeatAfter(Millis),
    /// Move the rotation to its next scenario after a pause.
    AdvanceToNext(Millis),
}

impl LoopPolicy {
    /// Pause before the next iteration, `None` for `Once`.
    pub fn pause(&self) -> Option<Millis> {
        match *self {
            LoopPolicy::Once => None,
            LoopPolicy::RepeatAfter(ms) | LoopPolicy::AdvanceToNext(ms) => Some(ms),
        }
    }
}

/// An ordered, validated script. Cloning shares the steps.
#[derive(Clone, Debug)]
pub struct Timeline<S: Scene> {
    steps: Arc<[Step<S>]>,
    policy: LoopPolicy,
    carried: Arc<[String]>,
}

impl<S: Scene> Timeline<S> {
    pub fn builder() -> TimelineBuilder<S> {
        TimelineBuilder::new()
    }

    /// A timeline with no steps. Running it finishes immediately.
    pub fn empty() -> Self {
        Self {
            steps: Arc::from(Vec::new()),
            policy: LoopPolicy::Once,
            carried: Arc::from(Vec::new()),
        }
    }

    #[inline]
    pub fn step(&self, index: usize) -> Option<&Step<S>> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    #[inline]
    pub fn policy(&self) -> LoopPolicy {
        self.policy
    }

    /// Slots this timeline expects to already hold text when it starts.
    pub fn carried_slots(&self) -> &[String] {
        &self.carried
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all `Wait` durations in one pass.
    pub fn total_wait(&self) -> Millis {
        self.steps
            .iter()
            .map(|s| match s {
                Step::Wait(ms) => *ms,
                _ => 0,
            })
            .fold(0, Millis::saturating_add)
    }

    /// Same steps under a different loop policy.
    pub fn with_policy(&self, policy: LoopPolicy) -> Result<Self, TimelineError> {
        let tl = Self {
            steps: Arc::clone(&self.steps),
            policy,
            carried: Arc::clone(&self.carried),
        };
        check_loop(&tl)?;
        Ok(tl)
    }
}

impl<S: Scene> Default for Timeline<S> {
    fn default() -> Self {
        Self::empty()
    }
}

fn check_loop<S: Scene>(tl: &Timeline<S>) -> Result<(), TimelineError> {
    match tl.policy.pause() {
        Some(pause) if !tl.is_empty() && tl.total_wait().saturating_add(pause) == 0 => {
            Err(TimelineError::ZeroDurationLoop)
        }
        _ => Ok(()),
    }
}

/// Accumulates steps and validates them on `build`.
#[derive(Clone, Debug)]
pub struct TimelineBuilder<S: Scene> {
    steps: Vec<Step<S>>,
    policy: LoopPolicy,
    carried: Vec<String>,
}

impl<S: Scene> Default for TimelineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scene> TimelineBuilder<S> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            policy: LoopPolicy::Once,
            carried: Vec::new(),
        }
    }

    pub fn step(mut self, step: Step<S>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step<S>>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn wait(self, ms: Millis) -> Self {
        self.step(Step::Wait(ms))
    }

    pub fn set(self, patch: S::Patch) -> Self {
        self.step(Step::SetState(patch))
    }

    pub fn emit(self, phase: S::Phase) -> Self {
        self.step(Step::Emit(phase))
    }

    pub fn reveal(self, slot: &str, target: &str) -> Self {
        self.step(Step::Reveal {
            slot: slot.to_string(),
            target: target.to_string(),
        })
    }

    pub fn type_text(self, slot: &str, target: &str, style: &TypeStyle) -> Self {
        self.steps(typewriter::type_text(slot, target, style))
    }

    pub fn erase_text(self, slot: &str, current: &str, style: &TypeStyle) -> Self {
        self.steps(typewriter::erase_text(slot, current, style))
    }

    /// Declare that `slot` already holds text from an earlier run, so erase
    /// steps may target it without a preceding `Reveal`.
    pub fn carry_slot(mut self, slot: &str) -> Self {
        if !self.carried.iter().any(|s| s == slot) {
            self.carried.push(slot.to_string());
        }
        self
    }

    pub fn policy(mut self, policy: LoopPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn repeat_after(self, pause: Millis) -> Self {
        self.policy(LoopPolicy::RepeatAfter(pause))
    }

    pub fn advance_after(self, pause: Millis) -> Self {
        self.policy(LoopPolicy::AdvanceToNext(pause))
    }

    /// Validate phase order and slot usage, then freeze the steps.
    pub fn build(self) -> Result<Timeline<S>, TimelineError> {
        let mut phases = PhaseMachine::<S::Phase>::new();
        let mut open: Vec<&str> = self.carried.iter().map(String::as_str).collect();
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Emit(phase) => {
                    phases.advance(*phase)?;
                }
                Step::Reveal { slot, .. } => {
                    if !open.contains(&slot.as_str()) {
                        open.push(slot.as_str());
                    }
                }
                Step::AppendChar(slot) | Step::EraseChar(slot) => {
                    if !open.contains(&slot.as_str()) {
                        return Err(TimelineError::UnknownSlot {
                            index,
                            slot: slot.clone(),
                        });
                    }
                }
                Step::Wait(_) | Step::SetState(_) => {}
            }
        }
        let timeline = Timeline {
            steps: Arc::from(self.steps),
            policy: self.policy,
            carried: Arc::from(self.carried),
        };
        check_loop(&timeline)?;
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::caption::{Caption, CaptionPatch, CaptionPhase};

    #[test]
    fn builds_and_totals_waits() {
        let tl = Timeline::<Caption>::builder()
            .wait(100)
            .emit(CaptionPhase::Typing)
            .type_text("line", "hey", &TypeStyle::with_interval(20))
            .emit(CaptionPhase::Shown)
            .repeat_after(500)
            .build()
            .unwrap();
        assert_eq!(tl.total_wait(), 160);
        assert_eq!(tl.policy(), LoopPolicy::RepeatAfter(500));
        assert_eq!(tl.len(), 1 + 1 + 7 + 1);
    }

    #[test]
    fn rejects_skipped_phase() {
        let err = Timeline::<Caption>::builder()
            .emit(CaptionPhase::Shown)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TimelineError::PhaseSkipped {
                from: "idle",
                to: "shown"
            }
        );
    }

    #[test]
    fn rejects_append_before_reveal() {
        let err = Timeline::<Caption>::builder()
            .wait(10)
            .step(Step::AppendChar("line".into()))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TimelineError::UnknownSlot {
                index: 1,
                slot: "line".into()
            }
        );
    }

    #[test]
    fn carried_slot_may_be_erased() {
        let tl = Timeline::<Caption>::builder()
            .carry_slot("line")
            .erase_text("line", "ab", &TypeStyle::with_interval(5))
            .build()
            .unwrap();
        assert_eq!(tl.carried_slots(), ["line".to_string()]);
    }

    #[test]
    fn rejects_loop_without_time() {
        let err = Timeline::<Caption>::builder()
            .set(CaptionPatch::Cursor(true))
            .repeat_after(0)
            .build()
            .unwrap_err();
        assert_eq!(err, TimelineError::ZeroDurationLoop);

        // An empty looping timeline is allowed: it never runs a step.
        assert!(Timeline::<Caption>::builder().repeat_after(0).build().is_ok());
    }

    #[test]
    fn steps_round_trip_through_json() {
        let steps: Vec<Step<Caption>> = serde_json::from_value(serde_json::json!([
            { "wait": 40 },
            { "emit": "typing" },
            { "reveal": { "slot": "line", "target": "ok" } },
            { "append_char": "line" },
            { "set_state": { "cursor": false } }
        ]))
        .unwrap();
        assert_eq!(steps[0], Step::Wait(40));
        assert_eq!(steps[1], Step::Emit(CaptionPhase::Typing));
        assert_eq!(steps[4], Step::SetState(CaptionPatch::Cursor(false)));
        assert_eq!(
            serde_json::to_value(&steps[3]).unwrap(),
            serde_json::json!({ "append_char": "line" })
        );
    }
}
