//! Visibility strategy: intersection observer entries, last qualifying entry
//! wins.

use crate::error::SectionError;
use crate::sections::Sections;
use crate::tracker::{SectionTracker, Signal};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct VisibilityTracker {
    sections: Sections,
    threshold: f64,
    active: Option<usize>,
}

impl VisibilityTracker {
    pub fn new(sections: Sections) -> Self {
        Self {
            sections,
            threshold: DEFAULT_THRESHOLD,
            active: None,
        }
    }

    /// Minimum intersection ratio for an entry to count.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, SectionError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SectionError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed one entry. Entries that are not intersecting or fall under the
    /// threshold leave the active section alone.
    pub fn update(&mut self, id: &str, intersecting: bool, ratio: f64) -> bool {
        let Some(index) = self.sections.position(id) else {
            log::trace!("ignoring visibility of undeclared section `{id}`");
            return false;
        };
        if !intersecting || ratio.is_nan() || ratio < self.threshold {
            return false;
        }
        if self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        true
    }
}

impl SectionTracker for VisibilityTracker {
    fn observe(&mut self, signal: &Signal) -> bool {
        match signal {
            Signal::Visibility {
                id,
                intersecting,
                ratio,
            } => self.update(id, *intersecting, *ratio),
            Signal::Progress { .. } => false,
        }
    }

    fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn sections(&self) -> &[String] {
        self.sections.ids()
    }

    fn reset(&mut self) {
        self.active = None;
    }
}
