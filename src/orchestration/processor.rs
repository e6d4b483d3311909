//! # Unit Processors
//!
//! The extension point of a deployment pass. A [`UnitProcessor`] performs the
//! deployment step for one unit; the orchestrator only looks at whether it
//! succeeded, failed, or asked to be retried later.
//!
//! ## Waiting on other units
//!
//! There is no blocking wait between tasks. A processor that needs another
//! unit (a supertype, a referenced type) to be done first checks
//! [`PassContext::has_completed`] and returns [`UnitOutcome::Deferred`] when it
//! is not; the task is then re-queued behind every fresh task. Never block or
//! spin inside `process` waiting for a specific unit: with a bounded pool,
//! every worker could end up waiting on a unit that none of them will run.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::BoxError;
use crate::model::{CandidateSet, Context, WorkUnit};
use crate::orchestration::cancellation::CancellationFlag;
use crate::orchestration::cause_chain::TaskError;
use crate::orchestration::completion_tracker::CompletionTracker;

/// What a successful `process` call asks the orchestrator to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitOutcome {
    /// The unit is deployed; it is recorded as completed
    #[default]
    Completed,
    /// Dependencies are not ready; run the unit again later
    Deferred,
}

/// Caller-supplied deployment logic for one unit.
///
/// Side effects on the external model are the processor's responsibility. A
/// pass that fails part way does not roll back units that already completed.
pub trait UnitProcessor<U: WorkUnit>: Send + Sync + 'static {
    fn process(&self, unit: &U, pass: &PassContext<U>) -> Result<UnitOutcome, BoxError>;
}

impl<U, F> UnitProcessor<U> for F
where
    U: WorkUnit,
    F: Fn(&U, &PassContext<U>) -> Result<UnitOutcome, BoxError> + Send + Sync + 'static,
{
    fn process(&self, unit: &U, pass: &PassContext<U>) -> Result<UnitOutcome, BoxError> {
        self(unit, pass)
    }
}

/// State of one pass shared by every task: the candidate set, the completion
/// tracker, the cancellation flag and the first task failure.
#[derive(Debug)]
pub struct PassContext<U: WorkUnit> {
    name: String,
    context: Option<Context>,
    candidates: CandidateSet<U>,
    tracker: CompletionTracker<U>,
    cancellation: CancellationFlag,
    failure: Mutex<Option<TaskError>>,
}

impl<U: WorkUnit> PassContext<U> {
    pub(crate) fn new(
        name: impl Into<String>,
        candidates: CandidateSet<U>,
        cancellation: CancellationFlag,
    ) -> Arc<Self> {
        let tracker = CompletionTracker::with_capacity(candidates.len());
        Arc::new(Self {
            name: name.into(),
            context: candidates.context(),
            candidates,
            tracker,
            cancellation,
            failure: Mutex::new(None),
        })
    }

    /// Whether `unit` can be considered done.
    ///
    /// `true` for `None`, for untracked units (named queries) and for units
    /// outside this pass's candidate set; otherwise whether the unit has been
    /// marked completed.
    pub fn has_completed(&self, unit: Option<&U>) -> bool {
        match unit {
            None => true,
            Some(unit) if !unit.is_tracked() => true,
            Some(unit) if !self.candidates.contains(unit) => true,
            Some(unit) => self.tracker.contains(unit),
        }
    }

    /// Record `unit` as completed. No-op for untracked units (named queries).
    pub fn mark_completed(&self, unit: &U) {
        if unit.is_tracked() {
            self.tracker.mark(unit);
        }
    }

    /// Raised when the pass is torn down; long-running processors should stop
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Whether a task of this pass has failed
    pub fn has_failed(&self) -> bool {
        self.failure.lock().is_some()
    }

    /// Keep the first failure of the pass; later ones are dropped
    pub(crate) fn record_failure(&self, failure: &TaskError) {
        let mut slot = self.failure.lock();
        if slot.is_none() {
            *slot = Some(failure.clone());
        }
    }

    pub(crate) fn first_failure(&self) -> Option<TaskError> {
        self.failure.lock().clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> Option<Context> {
        self.context
    }

    pub fn candidates(&self) -> &CandidateSet<U> {
        &self.candidates
    }

    pub fn tracker(&self) -> &CompletionTracker<U> {
        &self.tracker
    }

    pub fn completed_count(&self) -> usize {
        self.tracker.len()
    }
}
