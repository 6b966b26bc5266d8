//! Loop controller: which timeline runs next.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::scene::Scene;
use crate::timeline::Timeline;

/// Position within a rotation, handed to the scenario source when it builds
/// the next timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCursor {
    pub index: usize,
    /// Scenario that ran just before this one; `None` on the first run.
    pub previous: Option<usize>,
    /// Iterations completed so far in this session.
    pub iteration: u64,
}

/// Supplies one timeline per scenario. The number of scenarios is fixed for
/// the lifetime of a rotation.
pub trait ScenarioSource<S: Scene> {
    fn len(&self) -> usize;

    fn timeline(&self, cursor: RotationCursor) -> Result<Timeline<S>, TimelineError>;
}

impl<S: Scene> ScenarioSource<S> for Vec<Timeline<S>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn timeline(&self, cursor: RotationCursor) -> Result<Timeline<S>, TimelineError> {
        if self.is_empty() {
            return Err(TimelineError::EmptyRotation);
        }
        Ok(self[cursor.index % Vec::len(self)].clone())
    }
}

struct FnSource<F> {
    len: usize,
    build: F,
}

impl<S, F> ScenarioSource<S> for FnSource<F>
where
    S: Scene,
    F: Fn(RotationCursor) -> Result<Timeline<S>, TimelineError>,
{
    fn len(&self) -> usize {
        self.len
    }

    fn timeline(&self, cursor: RotationCursor) -> Result<Timeline<S>, TimelineError> {
        (self.build)(cursor)
    }
}

/// Round-robin over a non-empty list of scenarios.
pub struct Rotation<S: Scene> {
    source: Box<dyn ScenarioSource<S>>,
    cursor: RotationCursor,
}

impl<S: Scene> fmt::Debug for Rotation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rotation")
            .field("len", &self.source.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<S: Scene> Rotation<S> {
    pub fn new(source: impl ScenarioSource<S> + 'static) -> Result<Self, TimelineError> {
        if source.len() == 0 {
            return Err(TimelineError::EmptyRotation);
        }
        Ok(Self {
            source: Box::new(source),
            cursor: RotationCursor::default(),
        })
    }

    /// Rotation built lazily from a closure, one call per iteration.
    pub fn from_fn<F>(len: usize, build: F) -> Result<Self, TimelineError>
    where
        F: Fn(RotationCursor) -> Result<Timeline<S>, TimelineError> + 'static,
    {
        Self::new(FnSource { len, build })
    }

    /// A rotation of one: `AdvanceToNext` behaves like `RepeatAfter`.
    pub fn single(timeline: Timeline<S>) -> Self {
        Self {
            source: Box::new(vec![timeline]),
            cursor: RotationCursor::default(),
        }
    }

    /// Begin at `index` (wrapped into range) instead of 0.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.cursor.index = index % self.len();
        self
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.len() == 0
    }

    #[inline]
    pub fn cursor(&self) -> RotationCursor {
        self.cursor
    }

    /// Build the timeline for the current cursor.
    pub fn timeline(&self) -> Result<Timeline<S>, TimelineError> {
        self.source.timeline(self.cursor)
    }

    /// Stay on the current scenario for another iteration.
    pub fn repeat(&mut self) -> RotationCursor {
        self.cursor.previous = Some(self.cursor.index);
        self.cursor.iteration = self.cursor.iteration.wrapping_add(1);
        self.cursor
    }

    /// Move to the next scenario, wrapping to 0 after the last.
    pub fn advance(&mut self) -> RotationCursor {
        let len = self.source.len().max(1);
        self.cursor.previous = Some(self.cursor.index);
        self.cursor.index = (self.cursor.index + 1) % len;
        self.cursor.iteration = self.cursor.iteration.wrapping_add(1);
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::caption::Caption;

    #[test]
    fn advances_round_robin() {
        let mut rot = Rotation::<Caption>::new(vec![Timeline::empty(); 3]).unwrap();
        let seen: Vec<usize> = (0..7).map(|_| rot.advance().index).collect();
        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0, 1]);
        assert_eq!(rot.cursor().previous, Some(0));
        assert_eq!(rot.cursor().iteration, 7);
    }

    #[test]
    fn empty_rotation_is_refused() {
        let err = Rotation::<Caption>::new(Vec::new()).unwrap_err();
        assert_eq!(err, TimelineError::EmptyRotation);
        assert!(Rotation::<Caption>::from_fn(0, |_| Ok(Timeline::empty())).is_err());
    }

    #[test]
    fn single_repeats_in_place() {
        let mut rot = Rotation::<Caption>::single(Timeline::empty());
        assert_eq!(rot.advance().index, 0);
        assert_eq!(rot.repeat().index, 0);
        assert_eq!(rot.cursor().iteration, 2);
    }

    #[test]
    fn starting_at_wraps() {
        let rot = Rotation::<Caption>::new(vec![Timeline::empty(); 3])
            .unwrap()
            .starting_at(4);
        assert_eq!(rot.cursor().index, 1);
    }
}
