use serde::Deserialize;

use crate::clock::Millis;
use crate::error::StoredTimelineError;
use crate::rotation::Rotation;
use crate::scene::Scene;
use crate::timeline::{LoopPolicy, Step, Timeline, TimelineBuilder};
use crate::typewriter::TypeStyle;

/// Public API: parse a stored timeline document into a validated [`Timeline`].
///
/// Notes:
/// - `steps` accepts every primitive step in its serde form (`{"wait": 400}`,
///   `{"emit": "typing"}`, `{"set_state": <patch>}`, ...).
/// - Two shorthand steps expand into typewriter passes: `{"type": {"slot",
///   "text", "interval_ms"?}}` and `{"erase": {"slot", "text"?,
///   "interval_ms"?}}`. Without `text`, an erase removes whatever the document
///   last typed into that slot.
/// - Pacing not given per step comes from `style`.
/// - The result goes through the same validation as `TimelineBuilder::build`.
pub fn parse_stored_timeline_json<S: Scene>(
    s: &str,
    style: &TypeStyle,
) -> Result<Timeline<S>, StoredTimelineError> {
    let doc: StoredTimeline<S> = serde_json::from_str(s)?;
    expand(doc, style)
}

/// Parse `{"scenarios": [<timeline>, ...]}` into a rotation. Every scenario is
/// validated up front.
pub fn parse_stored_rotation_json<S: Scene>(
    s: &str,
    style: &TypeStyle,
) -> Result<Rotation<S>, StoredTimelineError> {
    let doc: StoredRotation<S> = serde_json::from_str(s)?;
    let timelines = doc
        .scenarios
        .into_iter()
        .map(|sc| expand(sc, style))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Rotation::new(timelines)?)
}

fn expand<S: Scene>(
    doc: StoredTimeline<S>,
    style: &TypeStyle,
) -> Result<Timeline<S>, StoredTimelineError> {
    if let Some(name) = &doc.name {
        log::trace!("expanding stored timeline `{name}` ({} steps)", doc.steps.len());
    }
    let mut builder = TimelineBuilder::<S>::new().policy(doc.r#loop);
    for slot in &doc.carry {
        builder = builder.carry_slot(slot);
    }
    // Text each slot holds after the steps so far, for text-less erase steps.
    let mut typed: Vec<(String, String)> = Vec::new();
    for step in doc.steps {
        builder = match step {
            StoredStep::Wait(ms) => builder.wait(ms),
            StoredStep::SetState(patch) => builder.set(patch),
            StoredStep::Emit(phase) => builder.emit(phase),
            StoredStep::Reveal { slot, target } => {
                remember(&mut typed, &slot, &target);
                builder.reveal(&slot, &target)
            }
            StoredStep::AppendChar(slot) => builder.step(Step::AppendChar(slot)),
            StoredStep::EraseChar(slot) => builder.step(Step::EraseChar(slot)),
            StoredStep::Type {
                slot,
                text,
                interval_ms,
            } => {
                let style = pace(style, interval_ms);
                remember(&mut typed, &slot, &text);
                builder.type_text(&slot, &text, &style)
            }
            StoredStep::Erase {
                slot,
                text,
                interval_ms,
            } => {
                let current = match text {
                    Some(text) => text,
                    None => typed
                        .iter()
                        .find(|(s, _)| *s == slot)
                        .map(|(_, t)| t.clone())
                        .ok_or_else(|| StoredTimelineError::NothingToErase(slot.clone()))?,
                };
                let mut style = *style;
                if let Some(ms) = interval_ms {
                    style.erase_interval_ms = ms;
                }
                remember(&mut typed, &slot, "");
                builder.erase_text(&slot, &current, &style)
            }
        };
    }
    builder.build().map_err(StoredTimelineError::from)
}

fn pace(style: &TypeStyle, interval_ms: Option<Millis>) -> TypeStyle {
    let mut style = *style;
    if let Some(ms) = interval_ms {
        style.interval_ms = ms;
    }
    style
}

fn remember(typed: &mut Vec<(String, String)>, slot: &str, text: &str) {
    match typed.iter_mut().find(|(s, _)| s == slot) {
        Some(entry) => entry.1 = text.to_string(),
        None => typed.push((slot.to_string(), text.to_string())),
    }
}

// ---------- Stored JSON schema (subset used by Cadence) ----------

#[derive(Deserialize)]
#[serde(bound(deserialize = ""))]
struct StoredTimeline<S: Scene> {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    r#loop: LoopPolicy,
    #[serde(default)]
    carry: Vec<String>,
    #[serde(default)]
    steps: Vec<StoredStep<S>>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = ""))]
struct StoredRotation<S: Scene> {
    scenarios: Vec<StoredTimeline<S>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case", bound(deserialize = ""))]
enum StoredStep<S: Scene> {
    Wait(Millis),
    SetState(S::Patch),
    Emit(S::Phase),
    Reveal {
        slot: String,
        target: String,
    },
    AppendChar(String),
    EraseChar(String),
    Type {
        slot: String,
        text: String,
        #[serde(default)]
        interval_ms: Option<Millis>,
    },
    Erase {
        slot: String,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        interval_ms: Option<Millis>,
    },
}
