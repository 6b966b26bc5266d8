//! Sequencer: session ownership, the step executor and the loop controller.
//!
//! Methods:
//! - new, start, start_rotation, cancel, update (pop due timers → run steps), subscribe

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::clock::{Clock, FrameClock, Millis};
use crate::config::Config;
use crate::error::TimelineError;
use crate::ids::{IdAllocator, SessionId};
use crate::outputs::{Change, ChangeKind, CoreEvent, Outputs};
use crate::phase::{Phase, PhaseMachine, Transition};
use crate::reveal::RevealState;
use crate::rotation::Rotation;
use crate::scene::{Scene, Snapshot};
use crate::timeline::{LoopPolicy, Step, Timeline};
use crate::timer::{TimerHandle, TimerQueue};

/// Lifecycle of the most recent session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// Receives every applied change together with the state it produced.
pub trait Subscriber<S: Scene> {
    fn on_change(&mut self, change: &Change<S>, snapshot: &Snapshot<S>);
}

impl<S, F> Subscriber<S> for F
where
    S: Scene,
    F: FnMut(&Change<S>, &Snapshot<S>),
{
    fn on_change(&mut self, change: &Change<S>, snapshot: &Snapshot<S>) {
        self(change, snapshot)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    /// Continue the current timeline at this step index.
    Step(usize),
    /// The loop pause elapsed; start the next iteration.
    NextIteration,
}

/// Timer payload. Carries its own token so a continuation popped after a
/// cancel can tell it is stale without consulting the session.
#[derive(Clone, Debug)]
struct Continuation {
    session: SessionId,
    token: CancelToken,
    resume: Resume,
}

struct ActiveSession<S: Scene> {
    id: SessionId,
    token: CancelToken,
    rotation: Rotation<S>,
    timeline: Timeline<S>,
    phases: PhaseMachine<S::Phase>,
    /// The only timer this session may own.
    pending: Option<TimerHandle>,
}

/// One per widget instance. Owns at most one live session.
pub struct Sequencer<S: Scene> {
    cfg: Config,
    ids: IdAllocator,
    clock: Clock,
    frames: FrameClock,
    timers: TimerQueue<Continuation>,
    session: Option<ActiveSession<S>>,
    snapshot: Snapshot<S>,
    subscribers: Vec<Box<dyn Subscriber<S>>>,
    outputs: Outputs<S>,
}

impl<S: Scene> Default for Sequencer<S> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<S: Scene> Drop for Sequencer<S> {
    fn drop(&mut self) {
        if let Some(active) = &self.session {
            active.token.cancel();
        }
    }
}

impl<S: Scene> Sequencer<S> {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            clock: Clock::new(),
            frames: FrameClock::new(),
            timers: TimerQueue::new(),
            session: None,
            snapshot: Snapshot::default(),
            subscribers: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn snapshot(&self) -> &Snapshot<S> {
        &self.snapshot
    }

    #[inline]
    pub fn status(&self) -> SessionStatus {
        self.snapshot.status
    }

    /// Id of the live session, if any.
    pub fn session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|a| a.id)
    }

    /// Token of the live session. Cancelling it stops the session at its next
    /// step or the next `update`, whichever comes first; pending timers are
    /// dropped then, as with `cancel`.
    pub fn token(&self) -> Option<CancelToken> {
        self.session.as_ref().map(|a| a.token.clone())
    }

    /// Timers currently scheduled; never more than one.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deadline of the next scheduled continuation.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn subscribe(&mut self, subscriber: impl Subscriber<S> + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Closure form of `subscribe`.
    pub fn on_change<F>(&mut self, f: F)
    where
        F: FnMut(&Change<S>, &Snapshot<S>) + 'static,
    {
        self.subscribe(f);
    }

    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// Run `timeline` in a fresh session, cancelling any live one first.
    /// Steps up to the first `Wait` apply before this returns.
    pub fn start(&mut self, timeline: Timeline<S>) -> SessionId {
        self.begin(Rotation::single(timeline.clone()), timeline)
    }

    /// Run a rotation in a fresh session. Fails only when the first scenario
    /// cannot be built, in which case the live session is left untouched.
    pub fn start_rotation(&mut self, rotation: Rotation<S>) -> Result<SessionId, TimelineError> {
        let timeline = rotation.timeline()?;
        Ok(self.begin(rotation, timeline))
    }

    /// Stop `session`. Returns `false` when it is not the live session or was
    /// already cancelled. Pending work is dropped and no further change is
    /// produced under it.
    pub fn cancel(&mut self, session: SessionId) -> bool {
        let Some(active) = self.session.as_ref() else {
            return false;
        };
        if active.id != session {
            return false;
        }
        let cancelled = active.token.cancel();
        self.teardown(SessionStatus::Cancelled);
        cancelled
    }

    /// Cancel whatever session is live.
    pub fn cancel_current(&mut self) -> bool {
        match self.session() {
            Some(id) => self.cancel(id),
            None => false,
        }
    }

    /// Advance virtual time by `dt` and run every continuation that falls due,
    /// each at its own deadline. Returns everything produced since the
    /// previous call, including work done synchronously by `start`.
    pub fn update(&mut self, dt: Millis) -> Outputs<S> {
        self.reap();
        let target = self.clock.now().saturating_add(dt);
        while let Some((handle, cont)) = self.timers.pop_due(target) {
            let lag = handle.deadline().saturating_sub(self.clock.now());
            self.clock.advance(lag);
            self.resume(handle, cont);
        }
        let rest = target.saturating_sub(self.clock.now());
        self.clock.advance(rest);
        std::mem::take(&mut self.outputs)
    }

    /// `update` for fractional frame deltas; the sub-millisecond remainder is
    /// carried to the next frame.
    pub fn update_frame(&mut self, dt_ms: f64) -> Outputs<S> {
        let dt = self.frames.tick(dt_ms);
        self.update(dt)
    }

    fn begin(&mut self, rotation: Rotation<S>, timeline: Timeline<S>) -> SessionId {
        self.cancel_current();

        let id = self.ids.alloc_session();
        let cursor = rotation.cursor();
        let previous = std::mem::take(&mut self.snapshot);
        self.snapshot = Snapshot {
            session: Some(id),
            status: SessionStatus::Running,
            scenario: cursor.index,
            ..Snapshot::default()
        };
        self.session = Some(ActiveSession {
            id,
            token: CancelToken::new(),
            rotation,
            timeline,
            phases: PhaseMachine::new(),
            pending: None,
        });
        log::debug!("{id} started on scenario {}", cursor.index);
        self.outputs.push_event(CoreEvent::SessionStarted {
            session: id,
            scenario: cursor.index,
        });

        // Report what the fresh snapshot dropped so folded views match it.
        let initial = S::Phase::initial();
        if previous.phase != initial {
            self.record(ChangeKind::Phase(Transition {
                from: previous.phase,
                to: initial,
            }));
        }
        if previous.scene != S::default() {
            self.record(ChangeKind::SceneReset);
        }
        for entry in previous.reveals.iter() {
            if entry.state.revealed() > 0 {
                self.record(ChangeKind::Reveal {
                    slot: entry.slot.clone(),
                    revealed: 0,
                    total: 0,
                    visible: String::new(),
                });
            }
        }
        self.run(0);
        id
    }

    fn resume(&mut self, handle: TimerHandle, cont: Continuation) {
        if cont.token.is_cancelled() {
            log::trace!("dropping stale continuation of {}", cont.session);
            self.reap();
            return;
        }
        let Some(active) = self.session.as_mut() else {
            log::trace!("dropping orphan continuation of {}", cont.session);
            return;
        };
        if active.id != cont.session {
            log::trace!("dropping stale continuation of {}", cont.session);
            return;
        }
        if active.pending == Some(handle) {
            active.pending = None;
        }
        match cont.resume {
            Resume::Step(index) => self.run(index),
            Resume::NextIteration => self.next_iteration(),
        }
    }

    /// Execute steps from `index` until a `Wait` suspends or the timeline ends.
    fn run(&mut self, mut index: usize) {
        loop {
            let (timeline, alive) = match self.session.as_ref() {
                Some(active) => (active.timeline.clone(), active.token.is_alive()),
                None => return,
            };
            if !alive {
                self.reap();
                return;
            }
            let Some(step) = timeline.step(index) else {
                self.end_iteration();
                return;
            };
            index += 1;
            match step {
                Step::Wait(ms) => {
                    self.schedule(*ms, Resume::Step(index));
                    return;
                }
                other => self.apply(other),
            }
        }
    }

    fn apply(&mut self, step: &Step<S>) {
        match step {
            Step::Wait(_) => {}
            Step::SetState(patch) => {
                self.snapshot.scene.apply(patch);
                self.record(ChangeKind::State(patch.clone()));
            }
            Step::Emit(phase) => {
                let (id, result) = match self.session.as_mut() {
                    Some(active) => (active.id, active.phases.advance(*phase)),
                    None => return,
                };
                match result {
                    Ok(Some(transition)) => {
                        self.snapshot.phase = transition.to;
                        self.record(ChangeKind::Phase(transition));
                    }
                    Ok(None) => {}
                    Err(err) => log::warn!("{id}: {err}"),
                }
            }
            Step::Reveal { slot, target } => {
                let kind = reveal_change(slot, self.snapshot.reveals.open(slot, target));
                self.record(kind);
            }
            Step::AppendChar(slot) => {
                if let Some(state) = self.snapshot.reveals.append(slot) {
                    let kind = reveal_change(slot, state);
                    self.record(kind);
                }
            }
            Step::EraseChar(slot) => {
                if let Some(state) = self.snapshot.reveals.erase(slot) {
                    let kind = reveal_change(slot, state);
                    self.record(kind);
                }
            }
        }
    }

    fn schedule(&mut self, delay: Millis, resume: Resume) {
        let now = self.clock.now();
        let Some(active) = self.session.as_mut() else {
            return;
        };
        if let Some(old) = active.pending.take() {
            self.timers.cancel(old);
        }
        let handle = self.timers.schedule_after(
            now,
            delay,
            Continuation {
                session: active.id,
                token: active.token.clone(),
                resume,
            },
        );
        active.pending = Some(handle);
    }

    fn end_iteration(&mut self) {
        let Some(active) = self.session.as_ref() else {
            return;
        };
        if active.timeline.is_empty() {
            self.finish();
            return;
        }
        match active.timeline.policy().pause() {
            Some(pause) => self.schedule(pause, Resume::NextIteration),
            None => self.finish(),
        }
    }

    fn next_iteration(&mut self) {
        let Some(active) = self.session.as_mut() else {
            return;
        };
        let id = active.id;
        let cursor = match active.timeline.policy() {
            LoopPolicy::Once => {
                self.finish();
                return;
            }
            LoopPolicy::RepeatAfter(_) => active.rotation.repeat(),
            LoopPolicy::AdvanceToNext(_) => active.rotation.advance(),
        };
        match active.rotation.timeline() {
            Ok(timeline) => active.timeline = timeline,
            Err(err) => {
                log::warn!("{id}: scenario {} failed to build: {err}", cursor.index);
                self.outputs.push_event(CoreEvent::Error {
                    session: id,
                    message: err.to_string(),
                });
                self.finish();
                return;
            }
        }
        let reset = active.phases.reset();
        let carried: Vec<String> = active.timeline.carried_slots().to_vec();

        self.snapshot.iteration = cursor.iteration;
        self.snapshot.scenario = cursor.index;
        for slot in &carried {
            if self.snapshot.reveals.get(slot).is_none() {
                self.snapshot.reveals.put(slot, RevealState::default());
            }
        }
        if let Some(transition) = reset {
            self.snapshot.phase = transition.to;
            self.record(ChangeKind::Phase(transition));
        }
        log::debug!(
            "{id} iteration {} on scenario {}",
            cursor.iteration,
            cursor.index
        );
        self.outputs.push_event(CoreEvent::IterationStarted {
            session: id,
            iteration: cursor.iteration,
            scenario: cursor.index,
        });
        self.run(0);
    }

    fn finish(&mut self) {
        if let Some(active) = &self.session {
            active.token.cancel();
        }
        self.teardown(SessionStatus::Finished);
    }

    /// Tear down a session whose token was cancelled from outside.
    fn reap(&mut self) {
        let cancelled = self
            .session
            .as_ref()
            .is_some_and(|active| active.token.is_cancelled());
        if cancelled {
            self.teardown(SessionStatus::Cancelled);
        }
    }

    fn teardown(&mut self, status: SessionStatus) {
        let Some(active) = self.session.take() else {
            return;
        };
        let id = active.id;
        let dropped = self.timers.cancel_where(|c| c.session == id);
        self.snapshot.status = status;
        let event = match status {
            SessionStatus::Finished => CoreEvent::SessionFinished { session: id },
            _ => CoreEvent::SessionCancelled { session: id },
        };
        log::debug!("{id} {:?} ({dropped} timer(s) dropped)", status);
        self.outputs.push_event(event);
    }

    fn record(&mut self, kind: ChangeKind<S>) {
        let Some(session) = self.snapshot.session else {
            return;
        };
        let change = Change {
            session,
            at: self.clock.now(),
            kind,
        };
        for sub in self.subscribers.iter_mut() {
            sub.on_change(&change, &self.snapshot);
        }
        self.outputs.push_change(change);
    }
}

fn reveal_change<S: Scene>(slot: &str, state: &RevealState) -> ChangeKind<S> {
    ChangeKind::Reveal {
        slot: slot.to_string(),
        revealed: state.revealed(),
        total: state.total(),
        visible: state.visible().to_string(),
    }
}
