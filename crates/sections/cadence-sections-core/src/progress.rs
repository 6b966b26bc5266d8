//! Progress-fraction strategy: the document is split into equal bands, one
//! per section.

use crate::error::SectionError;
use crate::sections::Sections;
use crate::tracker::{SectionTracker, Signal};

/// `clamp(floor(progress / (1/n)), 0, n-1)`. `None` for NaN or `n == 0`.
/// Negative progress and `-inf` map to 0, `+inf` and anything at or past 1
/// map to `n - 1`.
pub fn active_index_for(progress: f64, n: usize) -> Option<usize> {
    if n == 0 || progress.is_nan() {
        return None;
    }
    let last = n - 1;
    let band = progress / (1.0 / n as f64);
    if band <= 0.0 {
        return Some(0);
    }
    if band >= last as f64 {
        return Some(last);
    }
    // 0 < band < last, so the cast cannot overflow.
    Some((band.floor() as usize).min(last))
}

/// Scroll metrics (as read from the DOM) to a fraction in [0, 1]. A document
/// that cannot scroll reports 0.
pub fn progress_from_scroll(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let range = scroll_height - viewport_height;
    if !range.is_finite() || range <= 0.0 {
        return 0.0;
    }
    let p = scroll_top / range;
    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub struct ProgressTracker {
    sections: Sections,
    hysteresis: f64,
    active: Option<usize>,
}

impl ProgressTracker {
    pub fn new(sections: Sections) -> Self {
        Self {
            sections,
            hysteresis: 0.0,
            active: None,
        }
    }

    /// Require progress to pass a band edge by `band` before switching.
    pub fn with_hysteresis(mut self, band: f64) -> Result<Self, SectionError> {
        if !band.is_finite() || !(0.0..0.5).contains(&band) {
            return Err(SectionError::InvalidHysteresis(band));
        }
        self.hysteresis = band;
        Ok(self)
    }

    pub fn hysteresis(&self) -> f64 {
        self.hysteresis
    }

    /// Feed a raw fraction. Same as `observe(&Signal::progress(p))`.
    pub fn update(&mut self, progress: f64) -> bool {
        let Some(next) = active_index_for(progress, self.sections.len()) else {
            return false;
        };
        match self.active {
            Some(current) if current == next => false,
            Some(current) if self.hysteresis > 0.0 && !self.clears_band(current, next, progress) => {
                false
            }
            _ => {
                self.active = Some(next);
                true
            }
        }
    }

    fn clears_band(&self, current: usize, next: usize, progress: f64) -> bool {
        let width = 1.0 / self.sections.len() as f64;
        if next > current {
            progress >= (current + 1) as f64 * width + self.hysteresis
        } else {
            progress < current as f64 * width - self.hysteresis
        }
    }
}

impl SectionTracker for ProgressTracker {
    fn observe(&mut self, signal: &Signal) -> bool {
        match signal {
            Signal::Progress { progress } => self.update(*progress),
            Signal::Visibility { .. } => false,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(n: usize) -> ProgressTracker {
        ProgressTracker::new(Sections::new((0..n).map(|i| format!("s{i}"))).unwrap())
    }

    #[test]
    fn edges_and_specials() {
        assert_eq!(active_index_for(0.0, 4), Some(0));
        assert_eq!(active_index_for(0.25, 4), Some(1));
        assert_eq!(active_index_for(0.999, 4), Some(3));
        assert_eq!(active_index_for(1.0, 4), Some(3));
        assert_eq!(active_index_for(1.0 + f64::EPSILON, 4), Some(3));
        assert_eq!(active_index_for(-0.2, 4), Some(0));
        assert_eq!(active_index_for(f64::NEG_INFINITY, 4), Some(0));
        assert_eq!(active_index_for(f64::INFINITY, 4), Some(3));
        assert_eq!(active_index_for(f64::NAN, 4), None);
        assert_eq!(active_index_for(0.5, 0), None);
    }

    #[test]
    fn nan_keeps_previous() {
        let mut t = tracker(3);
        assert!(t.update(0.5));
        assert!(!t.update(f64::NAN));
        assert_eq!(t.active(), Some("s1"));
    }

    #[test]
    fn hysteresis_holds_near_edges() {
        let mut t = tracker(4).with_hysteresis(0.05).unwrap();
        assert!(t.update(0.2));
        assert_eq!(t.active_index(), Some(0));
        // Just past the 0.25 edge, inside the band.
        assert!(!t.update(0.27));
        assert_eq!(t.active_index(), Some(0));
        assert!(t.update(0.31));
        assert_eq!(t.active_index(), Some(1));
        // Back under the edge but within the band.
        assert!(!t.update(0.22));
        assert!(t.update(0.19));
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn hysteresis_is_validated() {
        assert_eq!(
            tracker(2).with_hysteresis(-0.1).unwrap_err(),
            SectionError::InvalidHysteresis(-0.1)
        );
        assert!(tracker(2).with_hysteresis(f64::NAN).is_err());
        assert!(tracker(2).with_hysteresis(0.5).is_err());
    }

    #[test]
    fn scroll_metrics() {
        assert_eq!(progress_from_scroll(0.0, 800.0, 800.0), 0.0);
        assert_eq!(progress_from_scroll(500.0, 1_800.0, 800.0), 0.5);
        assert_eq!(progress_from_scroll(2_000.0, 1_800.0, 800.0), 1.0);
        assert_eq!(progress_from_scroll(-40.0, 1_800.0, 800.0), 0.0);
        assert_eq!(progress_from_scroll(f64::NAN, 1_800.0, 800.0), 0.0);
    }
}
