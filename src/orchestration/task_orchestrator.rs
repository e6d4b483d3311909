//! # Task Orchestrator
//!
//! Runs one deployment pass: one task per candidate unit on a dedicated
//! worker pool, completion tracking shared between the tasks, and fail-fast
//! error reporting.
//!
//! ## Pass lifecycle
//!
//! 1. Construction selects the candidate set and starts the worker pool
//!    (`threads_per_processor` x logical processors, fixed size).
//! 2. [`TaskOrchestrator::perform`] submits every unit, then waits for the
//!    task results in submission order.
//! 3. The first failure observed in that order ends the wait. It is
//!    normalized through [`unwrap_cause_chain`](super::unwrap_cause_chain)
//!    and returned; results of the remaining tasks are never looked at.
//! 4. Whatever the outcome, the pool is shut down before `perform` returns.
//!    Tasks still running see the pass cancelled; tasks still queued never
//!    start.
//!
//! A pool is never reused: `perform` can be called once per orchestrator.

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{DeploymentConfig, ExecutionConfig};
use crate::constants::events;
use crate::error::{DeploymentError, Result};
use crate::logging::{log_pass_operation, log_unit_operation};
use crate::model::{CandidateSet, Context, DeploymentUnit, ModelProvider, WorkUnit};
use crate::orchestration::cause_chain::TaskError;
use crate::orchestration::processor::{PassContext, UnitOutcome, UnitProcessor};
use crate::orchestration::worker_pool::{
    detect_processor_count, panic_message, pool_size, PoolSubmitter, TaskPriority, WorkerPool,
};

/// Orchestrator over the units of a [`ModelProvider`]
pub type ModelOrchestrator<P> =
    TaskOrchestrator<DeploymentUnit<<P as ModelProvider>::Type, <P as ModelProvider>::Query>>;

/// Result of a successful pass
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub pass_id: Uuid,
    pub name: String,
    pub context: Option<Context>,
    /// Units submitted
    pub units: usize,
    /// Units recorded as completed; named queries are never recorded
    pub completed: usize,
    /// Re-queues caused by `UnitOutcome::Deferred`
    pub deferrals: u64,
    pub elapsed: Duration,
}

pub struct TaskOrchestrator<U: WorkUnit> {
    name: String,
    pass: Arc<PassContext<U>>,
    pool: Mutex<Option<WorkerPool>>,
    pool_size: usize,
    thread_names: Vec<String>,
    execution: ExecutionConfig,
}

impl<T: WorkUnit, Q: WorkUnit> TaskOrchestrator<DeploymentUnit<T, Q>> {
    /// Build a pass over the population `context` selects from `provider`
    pub fn for_model<P>(
        name: impl Into<String>,
        context: Context,
        provider: &P,
        config: &DeploymentConfig,
    ) -> Result<Self>
    where
        P: ModelProvider<Type = T, Query = Q> + ?Sized,
    {
        Self::new(name, CandidateSet::select(context, provider), config)
    }
}

impl<U: WorkUnit> TaskOrchestrator<U> {
    pub fn new(
        name: impl Into<String>,
        candidates: CandidateSet<U>,
        config: &DeploymentConfig,
    ) -> Result<Self> {
        config.validate()?;

        let name = name.into();
        let processors = config
            .pool
            .processor_count
            .unwrap_or_else(detect_processor_count);
        let threads = pool_size(processors, config.pool.threads_per_processor);
        let pool_name = format!("{}-{}", config.pool.thread_name_prefix, name);
        let pool = WorkerPool::new(&pool_name, threads)?;

        info!(
            pass = %name,
            context = ?candidates.context(),
            units = candidates.len(),
            threads = pool.size(),
            "DEPLOY: Deployment pass prepared"
        );

        let pass = PassContext::new(name.clone(), candidates, pool.cancellation().clone());

        Ok(Self {
            name,
            pass,
            pool_size: pool.size(),
            thread_names: pool.thread_names().to_vec(),
            pool: Mutex::new(Some(pool)),
            execution: config.execution.clone(),
        })
    }

    /// See [`PassContext::has_completed`]
    pub fn has_completed(&self, unit: Option<&U>) -> bool {
        self.pass.has_completed(unit)
    }

    /// See [`PassContext::mark_completed`]
    pub fn mark_completed(&self, unit: &U) {
        self.pass.mark_completed(unit)
    }

    /// Run the pass: one task per candidate, fail-fast on the first failure
    /// observed in submission order. The worker pool is shut down on every
    /// exit path.
    pub fn perform<P>(&self, processor: P) -> Result<PassSummary>
    where
        P: UnitProcessor<U>,
    {
        let pool = self
            .pool
            .lock()
            .take()
            .ok_or_else(|| DeploymentError::PassAlreadyPerformed {
                name: self.name.clone(),
            })?;

        let pass_id = Uuid::new_v4();
        let start = Instant::now();
        let context = self.context_label();
        let units = self.pass.candidates().len();

        debug!(
            event = events::PASS_STARTED,
            pass_id = %pass_id,
            pass = %self.name,
            "DEPLOY: Submitting {} tasks",
            units
        );

        let deferrals = Arc::new(AtomicU64::new(0));
        let outcome = self
            .submit_all(&pool, Arc::new(processor), &deferrals)
            .and_then(|handles| self.await_all(handles));

        let abandoned = pool.shutdown_now();
        drop(pool);

        let elapsed = start.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(()) => {
                debug!(
                    event = events::PASS_COMPLETED,
                    pass_id = %pass_id,
                    "Deployment pass took {} msecs",
                    elapsed_ms
                );
                log_pass_operation(
                    "perform",
                    &self.name,
                    &context,
                    units,
                    "completed",
                    Some(elapsed_ms),
                );

                Ok(PassSummary {
                    pass_id,
                    name: self.name.clone(),
                    context: self.pass.context(),
                    units,
                    completed: self.pass.completed_count(),
                    deferrals: deferrals.load(Ordering::Relaxed),
                    elapsed,
                })
            }
            Err(e) => {
                error!(
                    event = events::PASS_FAILED,
                    pass_id = %pass_id,
                    pass = %self.name,
                    context = %context,
                    completed = self.pass.completed_count(),
                    abandoned = abandoned,
                    error = %e,
                    "DEPLOY: Deployment pass failed"
                );
                log_pass_operation(
                    "perform",
                    &self.name,
                    &context,
                    units,
                    "failed",
                    Some(elapsed_ms),
                );
                Err(e)
            }
        }
    }

    fn submit_all<P>(
        &self,
        pool: &WorkerPool,
        processor: Arc<P>,
        deferrals: &Arc<AtomicU64>,
    ) -> Result<Vec<TaskHandle>>
    where
        P: UnitProcessor<U>,
    {
        let settings = Arc::new(DeferralSettings::from(&self.execution));
        let submitter = pool.submitter();

        self.pass
            .candidates()
            .iter()
            .enumerate()
            .map(|(sequence, unit)| -> Result<TaskHandle> {
                let (sender, receiver) = channel::bounded(1);
                let task = UnitTask {
                    unit: unit.clone(),
                    label: unit.label(),
                    priority: TaskPriority::new(unit.hierarchy_depth(), sequence as u64),
                    processor: Arc::clone(&processor),
                    pass: Arc::clone(&self.pass),
                    submitter: submitter.clone(),
                    result: sender,
                    settings: Arc::clone(&settings),
                    deferrals: Arc::clone(deferrals),
                };
                let handle = TaskHandle {
                    unit: task.label.clone(),
                    receiver,
                };
                task.schedule()?;
                Ok(handle)
            })
            .collect()
    }

    /// Wait in submission order. A task that stood down because another one
    /// failed reports the failure that stopped it.
    fn await_all(&self, handles: Vec<TaskHandle>) -> Result<()> {
        for handle in handles {
            handle.wait().map_err(|failure| match failure {
                TaskError::Cancelled { .. } => self
                    .pass
                    .first_failure()
                    .unwrap_or(failure)
                    .into_deployment_error(),
                failure => failure.into_deployment_error(),
            })?;
        }
        Ok(())
    }

    fn context_label(&self) -> String {
        self.pass
            .context()
            .map(|context| context.to_string())
            .unwrap_or_else(|| "custom".to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> Option<Context> {
        self.pass.context()
    }

    pub fn candidates(&self) -> &CandidateSet<U> {
        self.pass.candidates()
    }

    /// Shared pass state, as handed to processors
    pub fn pass(&self) -> &Arc<PassContext<U>> {
        &self.pass
    }

    pub fn completed_count(&self) -> usize {
        self.pass.completed_count()
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn thread_names(&self) -> &[String] {
        &self.thread_names
    }

    pub fn is_performed(&self) -> bool {
        self.pool.lock().is_none()
    }
}

impl<U: WorkUnit> std::fmt::Debug for TaskOrchestrator<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskOrchestrator")
            .field("name", &self.name)
            .field("context", &self.pass.context())
            .field("units", &self.pass.candidates().len())
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

struct DeferralSettings {
    max_deferrals: Option<u32>,
    backoff: Duration,
}

impl From<&ExecutionConfig> for DeferralSettings {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            max_deferrals: config.max_deferrals,
            backoff: config.defer_backoff(),
        }
    }
}

/// Receiving end of one task's result
struct TaskHandle {
    unit: String,
    receiver: Receiver<std::result::Result<(), TaskError>>,
}

impl TaskHandle {
    /// Block until the task reports. A task dropped without reporting (pool
    /// shut down, pass cancelled) counts as cancelled.
    fn wait(self) -> std::result::Result<(), TaskError> {
        self.receiver
            .recv()
            .unwrap_or(Err(TaskError::Cancelled { unit: self.unit }))
    }
}

struct UnitTask<U: WorkUnit, P> {
    unit: U,
    label: String,
    priority: TaskPriority,
    processor: Arc<P>,
    pass: Arc<PassContext<U>>,
    submitter: PoolSubmitter,
    result: Sender<std::result::Result<(), TaskError>>,
    settings: Arc<DeferralSettings>,
    deferrals: Arc<AtomicU64>,
}

impl<U: WorkUnit, P: UnitProcessor<U>> UnitTask<U, P> {
    fn schedule(self) -> Result<()> {
        let submitter = self.submitter.clone();
        let priority = self.priority;
        submitter.submit(priority, move || self.run())
    }

    fn run(self) {
        if self.pass.is_cancelled() {
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.processor.process(&self.unit, &self.pass)
        }));

        match outcome {
            Ok(Ok(UnitOutcome::Completed)) => {
                self.pass.mark_completed(&self.unit);
                log_unit_operation(events::UNIT_COMPLETED, self.pass.name(), &self.label, None);
                self.report(Ok(()));
            }
            Ok(Ok(UnitOutcome::Deferred)) => self.defer(),
            Ok(Err(source)) => {
                warn!(
                    event = events::UNIT_FAILED,
                    pass = %self.pass.name(),
                    unit = %self.label,
                    error = %source,
                    "DEPLOY: Unit failed"
                );
                let failure = TaskError::Failed {
                    unit: self.label.clone(),
                    source: Arc::from(source),
                };
                self.fail(failure);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(
                    event = events::UNIT_FAILED,
                    pass = %self.pass.name(),
                    unit = %self.label,
                    panic = %message,
                    "DEPLOY: Unit processor panicked"
                );
                let failure = TaskError::Panicked {
                    unit: self.label.clone(),
                    message,
                };
                self.fail(failure);
            }
        }
    }

    fn defer(mut self) {
        // Whatever this unit waits on may be the task that failed.
        if self.pass.has_failed() {
            let unit = self.label.clone();
            self.report(Err(TaskError::Cancelled { unit }));
            return;
        }

        let attempts = self.priority.deferrals.saturating_add(1);
        if let Some(limit) = self.settings.max_deferrals {
            if attempts > limit {
                let failure = TaskError::DeferralLimitExceeded {
                    unit: self.label.clone(),
                    attempts,
                };
                self.fail(failure);
                return;
            }
        }

        self.deferrals.fetch_add(1, Ordering::Relaxed);
        log_unit_operation(
            events::UNIT_DEFERRED,
            self.pass.name(),
            &self.label,
            Some("dependencies not completed"),
        );

        if !self.settings.backoff.is_zero() {
            thread::sleep(self.settings.backoff);
        }

        self.priority = self.priority.deferred();
        // Fails only once the pool is shut down; the dropped task then reads
        // as cancelled to whoever waits on it.
        let _ = self.schedule();
    }

    fn fail(self, failure: TaskError) {
        self.pass.record_failure(&failure);
        self.report(Err(failure));
    }

    fn report(self, result: std::result::Result<(), TaskError>) {
        // The receiver is gone once the pass stopped waiting.
        let _ = self.result.send(result);
    }
}
