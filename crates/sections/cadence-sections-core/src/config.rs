use serde::{Deserialize, Serialize};

use crate::error::SectionError;
use crate::progress::ProgressTracker;
use crate::sections::Sections;
use crate::tracker::SectionTracker;
use crate::visibility::{VisibilityTracker, DEFAULT_THRESHOLD};

/// Serializable description of a tracker, as hosts send it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub sections: Vec<String>,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Progress {
        #[serde(default)]
        hysteresis: f64,
    },
    Visibility {
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Progress { hysteresis: 0.0 }
    }
}

impl TrackerConfig {
    pub fn progress<I, T>(sections: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            strategy: Strategy::default(),
        }
    }

    pub fn visibility<I, T>(sections: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            strategy: Strategy::Visibility { threshold },
        }
    }
}

/// Validate `cfg` and build the tracker it describes.
pub fn build_tracker(cfg: &TrackerConfig) -> Result<Box<dyn SectionTracker>, SectionError> {
    let sections = Sections::new(cfg.sections.iter().cloned())?;
    Ok(match cfg.strategy {
        Strategy::Progress { hysteresis } => {
            Box::new(ProgressTracker::new(sections).with_hysteresis(hysteresis)?)
        }
        Strategy::Visibility { threshold } => {
            Box::new(VisibilityTracker::new(sections).with_threshold(threshold)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Signal;

    #[test]
    fn strategy_defaults_to_progress() {
        let cfg: TrackerConfig = serde_json::from_str(r#"{ "sections": ["a", "b"] }"#).unwrap();
        assert_eq!(cfg.strategy, Strategy::Progress { hysteresis: 0.0 });
        let mut t = build_tracker(&cfg).unwrap();
        assert!(t.observe(&Signal::progress(0.9)));
        assert_eq!(t.active(), Some("b"));
    }

    #[test]
    fn visibility_threshold_defaults() {
        let cfg: TrackerConfig =
            serde_json::from_str(r#"{ "sections": ["a"], "strategy": { "kind": "visibility" } }"#)
                .unwrap();
        assert_eq!(
            cfg.strategy,
            Strategy::Visibility {
                threshold: DEFAULT_THRESHOLD
            }
        );
    }

    #[test]
    fn invalid_configs_are_reported() {
        let dup = TrackerConfig::progress(["a", "a"]);
        assert_eq!(
            build_tracker(&dup).err(),
            Some(SectionError::DuplicateSection("a".into()))
        );
        let bad = TrackerConfig::visibility(["a"], -1.0);
        assert_eq!(
            build_tracker(&bad).err(),
            Some(SectionError::InvalidThreshold(-1.0))
        );
    }
}
