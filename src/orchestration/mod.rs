//! # Orchestration Engine
//!
//! Concurrent execution of one deployment pass over a set of work units.
//!
//! ## Core Components
//!
//! - **TaskOrchestrator**: Owns the pass; submits one task per unit and reports the first failure
//! - **WorkerPool**: Fixed-size pool of named threads draining a priority queue
//! - **PassContext**: Shared pass state handed to every processor
//! - **CompletionTracker**: Concurrent set of units recorded as done
//! - **UnitProcessor**: Caller-supplied deployment logic for one unit
//! - **cause_chain**: Normalizes task failures into a
//!   [`DeploymentError`](crate::error::DeploymentError)

pub mod cancellation;
pub mod cause_chain;
pub mod completion_tracker;
pub mod processor;
pub mod task_orchestrator;
pub mod worker_pool;

pub use cancellation::CancellationFlag;
pub use cause_chain::{unwrap_cause_chain, TaskError};
pub use completion_tracker::CompletionTracker;
pub use processor::{PassContext, UnitOutcome, UnitProcessor};
pub use task_orchestrator::{ModelOrchestrator, PassSummary, TaskOrchestrator};
pub use worker_pool::{
    detect_processor_count, pool_size, PoolSubmitter, TaskPriority, WorkerPool,
};
