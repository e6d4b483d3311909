//! # Task Failures and Cause-Chain Unwrapping
//!
//! A unit's failure reaches the orchestrator wrapped in a [`TaskError`], the
//! result layer of the worker pool. Before it is raised to the caller it is
//! normalized: the first [`DeploymentError`] found along the `source()` chain
//! is rethrown unchanged, otherwise the innermost cause is wrapped as
//! [`DeploymentError::Unknown`].

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::error::{DeploymentError, SharedError};

/// Outcome of a task that did not complete its unit
///
/// `Error` is implemented by hand: the source of `Failed` must be the
/// processor's error itself rather than the `Arc` holding it, so that
/// downcasts along the chain see the concrete type.
#[derive(Debug, Clone)]
pub enum TaskError {
    Failed { unit: String, source: SharedError },
    Panicked { unit: String, message: String },
    Cancelled { unit: String },
    DeferralLimitExceeded { unit: String, attempts: u32 },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { unit, source } => write!(f, "Task for {unit} failed: {source}"),
            Self::Panicked { unit, message } => write!(f, "Task for {unit} panicked: {message}"),
            Self::Cancelled { unit } => {
                write!(f, "Task for {unit} was cancelled before it completed")
            }
            Self::DeferralLimitExceeded { unit, attempts } => write!(
                f,
                "Task for {unit} was deferred {attempts} times without its dependencies completing"
            ),
        }
    }
}

impl StdError for TaskError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Failed { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

impl TaskError {
    pub fn unit(&self) -> &str {
        match self {
            Self::Failed { unit, .. }
            | Self::Panicked { unit, .. }
            | Self::Cancelled { unit }
            | Self::DeferralLimitExceeded { unit, .. } => unit,
        }
    }

    /// Normalize into the caller-facing error
    pub fn into_deployment_error(self) -> DeploymentError {
        unwrap_cause_chain(Arc::new(self))
    }
}

/// Normalize an arbitrarily wrapped failure into a single [`DeploymentError`].
///
/// Walks the `source()` chain iteratively. An existing `DeploymentError` at
/// any depth is returned as-is (cloned out of the chain); a chain that ends
/// without one becomes `DeploymentError::Unknown` carrying its last link.
pub fn unwrap_cause_chain(failure: SharedError) -> DeploymentError {
    let mut depth = 0;
    let mut current: &(dyn StdError + 'static) = &*failure;

    loop {
        if let Some(deployment_error) = current.downcast_ref::<DeploymentError>() {
            return deployment_error.clone();
        }

        match current.source() {
            Some(cause) => {
                current = cause;
                depth += 1;
            }
            None => break,
        }
    }

    DeploymentError::unknown(failure, depth)
}
