//! Timing defaults shared by the built-in demo scenes.

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::typewriter::TypeStyle;

/// Pacing used when scenes build their timelines. Hosts may override any
/// field from JSON; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay between revealed characters while typing.
    pub type_interval_ms: Millis,
    /// Delay between removed characters while erasing.
    pub erase_interval_ms: Millis,
    /// Extra pause after sentence punctuation while typing (0 disables).
    pub punctuation_pause_ms: Millis,
    /// Pause before the first step of a scene.
    pub lead_in_ms: Millis,
    /// "Thinking" pause between a question and its answer.
    pub think_ms: Millis,
    /// How long a finished scene stays on screen.
    pub hold_ms: Millis,
    /// Pause between loop iterations / rotation items.
    pub loop_pause_ms: Millis,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            type_interval_ms: 35,
            erase_interval_ms: 15,
            punctuation_pause_ms: 0,
            lead_in_ms: 400,
            think_ms: 900,
            hold_ms: 2_500,
            loop_pause_ms: 1_200,
        }
    }
}

impl Config {
    pub fn type_style(&self) -> TypeStyle {
        TypeStyle {
            interval_ms: self.type_interval_ms,
            erase_interval_ms: self.erase_interval_ms,
            punctuation_pause_ms: self.punctuation_pause_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "type_interval_ms": 10 }"#).unwrap();
        assert_eq!(cfg.type_interval_ms, 10);
        assert_eq!(cfg.hold_ms, Config::default().hold_ms);
        assert_eq!(cfg.type_style().interval_ms, 10);
    }
}
