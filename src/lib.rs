#![allow(clippy::doc_markdown)] // Allow technical terms like BinaryHeap, DashSet in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Deployment Core
//!
//! Concurrent deployment passes over the units of a persistence metamodel.
//!
//! ## Overview
//!
//! A metamodel is deployed in several passes: managed types, identifiable
//! types, entities, named queries. Each pass selects its units from a
//! [`ModelProvider`], runs one task per unit on a dedicated, fixed-size worker
//! pool, and fails fast on the first error. Tasks coordinate through the
//! pass's completion tracker: a unit whose supertype has not been deployed yet
//! defers itself and is picked up again later.
//!
//! ## Module Organization
//!
//! - [`model`] - Work units, deployment contexts and candidate selection
//! - [`orchestration`] - Worker pool, pass execution and failure normalization
//! - [`config`] - Configuration loading with environment overrides
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//! - [`constants`] - Defaults and event names
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deployment_core::{
//!     BoxError, CandidateSet, DeploymentConfig, PassContext, TaskOrchestrator, UnitOutcome,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DeploymentConfig::default();
//! let orchestrator = TaskOrchestrator::new(
//!     "managed-types",
//!     CandidateSet::from_units(["Person", "Customer", "Address"]),
//!     &config,
//! )?;
//!
//! let summary = orchestrator.perform(
//!     |unit: &&'static str, _pass: &PassContext<&'static str>| -> Result<UnitOutcome, BoxError> {
//!         println!("deploying {unit}");
//!         Ok(UnitOutcome::Completed)
//!     },
//! )?;
//! println!("{} units in {:?}", summary.completed, summary.elapsed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod model;
pub mod orchestration;

pub use config::{
    ConfigManager, ConfigurationError, DeploymentConfig, ExecutionConfig, LoggingConfig,
    PoolConfig,
};
pub use error::{BoxError, DeploymentError, Result, RootCause, SharedError};
pub use logging::init_structured_logging;
pub use model::{CandidateSet, Context, DeploymentUnit, ModelProvider, WorkUnit};
pub use orchestration::{
    detect_processor_count, pool_size, unwrap_cause_chain, CancellationFlag, CompletionTracker,
    ModelOrchestrator, PassContext, PassSummary, TaskError, TaskOrchestrator, TaskPriority,
    UnitOutcome, UnitProcessor, WorkerPool,
};
