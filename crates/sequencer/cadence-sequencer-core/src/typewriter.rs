//! Typewriter effect expressed as plain timeline steps.
//!
//! A forward pass opens the slot at length 0 and then alternates
//! `Wait(interval)` / `AppendChar`, so every prefix length from 0 to the full
//! length is observable exactly once. An erase pass mirrors it with
//! `EraseChar`.

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::scene::Scene;
use crate::timeline::Step;

/// Pacing of a reveal pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeStyle {
    pub interval_ms: Millis,
    pub erase_interval_ms: Millis,
    /// Added to the wait that follows `, . ! ? ; :`.
    pub punctuation_pause_ms: Millis,
}

impl Default for TypeStyle {
    fn default() -> Self {
        Self {
            interval_ms: 35,
            erase_interval_ms: 15,
            punctuation_pause_ms: 0,
        }
    }
}

impl TypeStyle {
    pub fn with_interval(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            erase_interval_ms: interval_ms,
            punctuation_pause_ms: 0,
        }
    }
}

fn is_pause_char(c: char) -> bool {
    matches!(c, ',' | '.' | '!' | '?' | ';' | ':')
}

/// Steps that type `target` into `slot`. An empty target needs no steps.
pub fn type_text<S: Scene>(slot: &str, target: &str, style: &TypeStyle) -> Vec<Step<S>> {
    if target.is_empty() {
        return Vec::new();
    }
    let mut steps = Vec::with_capacity(1 + 2 * target.len());
    steps.push(Step::Reveal {
        slot: slot.to_string(),
        target: target.to_string(),
    });
    let mut prev: Option<char> = None;
    for ch in target.chars() {
        let mut delay = style.interval_ms;
        if prev.is_some_and(is_pause_char) {
            delay = delay.saturating_add(style.punctuation_pause_ms);
        }
        steps.push(Step::Wait(delay));
        steps.push(Step::AppendChar(slot.to_string()));
        prev = Some(ch);
    }
    steps
}

/// Steps that erase `current` (the text `slot` is showing) one char at a time.
pub fn erase_text<S: Scene>(slot: &str, current: &str, style: &TypeStyle) -> Vec<Step<S>> {
    let count = current.chars().count();
    let mut steps = Vec::with_capacity(2 * count);
    for _ in 0..count {
        steps.push(Step::Wait(style.erase_interval_ms));
        steps.push(Step::EraseChar(slot.to_string()));
    }
    steps
}

/// Erase `from`, then type `to`.
pub fn retype<S: Scene>(slot: &str, from: &str, to: &str, style: &TypeStyle) -> Vec<Step<S>> {
    let mut steps = erase_text(slot, from, style);
    steps.extend(type_text(slot, to, style));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::caption::Caption;

    fn waits(steps: &[Step<Caption>]) -> Vec<Millis> {
        steps
            .iter()
            .filter_map(|s| match s {
                Step::Wait(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_target_needs_no_steps() {
        assert!(type_text::<Caption>("line", "", &TypeStyle::default()).is_empty());
        assert!(erase_text::<Caption>("line", "", &TypeStyle::default()).is_empty());
    }

    #[test]
    fn one_append_per_char() {
        let steps = type_text::<Caption>("line", "añb", &TypeStyle::with_interval(10));
        assert_eq!(steps.len(), 1 + 2 * 3);
        assert!(matches!(
            &steps[0],
            Step::Reveal { slot, target } if slot == "line" && target == "añb"
        ));
        let appends = steps
            .iter()
            .filter(|s| matches!(s, Step::AppendChar(slot) if slot == "line"))
            .count();
        assert_eq!(appends, 3);
        assert_eq!(waits(&steps), vec![10, 10, 10]);
    }

    #[test]
    fn punctuation_adds_a_pause_after_itself() {
        let style = TypeStyle {
            interval_ms: 10,
            erase_interval_ms: 5,
            punctuation_pause_ms: 100,
        };
        let steps = type_text::<Caption>("line", "a, b", &style);
        assert_eq!(waits(&steps), vec![10, 10, 110, 10]);
    }

    #[test]
    fn retype_erases_then_types() {
        let style = TypeStyle::with_interval(7);
        let steps = retype::<Caption>("code", "ab", "xyz", &style);
        let erases = steps
            .iter()
            .take_while(|s| !matches!(s, Step::Reveal { .. }))
            .filter(|s| matches!(s, Step::EraseChar(_)))
            .count();
        assert_eq!(erases, 2);
        assert_eq!(steps.len(), 4 + 1 + 6);
    }
}
