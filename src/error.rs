//! # Deployment Errors
//!
//! The single user-visible failure kind of a deployment pass. Every failure a
//! pass can surface is a [`DeploymentError`]; failures raised by processors are
//! normalized into one by [`crate::orchestration::unwrap_cause_chain`].

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigurationError;

/// Owned error returned by unit processors.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Shared error handle; lets a [`DeploymentError`] be cloned with its cause.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeploymentError {
    /// The cause chain bottomed out without reaching a `DeploymentError`.
    #[error("Unknown error occurred during deployment: {0}")]
    Unknown(#[source] RootCause),

    #[error("Deployment of {unit} failed: {reason}")]
    UnitFailed { unit: String, reason: String },

    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    #[error("Deployment pass {name} has already been performed")]
    PassAlreadyPerformed { name: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl DeploymentError {
    pub fn unit_failed(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnitFailed {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    pub fn worker_pool(message: impl Into<String>) -> Self {
        Self::WorkerPool {
            message: message.into(),
        }
    }

    /// Wrap `chain` as an unknown failure whose cause is the error found
    /// `depth` links down its `source()` chain.
    pub(crate) fn unknown(chain: SharedError, depth: usize) -> Self {
        Self::Unknown(RootCause { chain, depth })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Innermost cause of this error, if any.
    ///
    /// For [`DeploymentError::Unknown`] this is the original failure that ended
    /// the cause chain, so callers can `downcast_ref` it to their own type.
    pub fn root_cause(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Unknown(root) => Some(root.get()),
            other => {
                let mut current = other.source()?;
                while let Some(next) = current.source() {
                    current = next;
                }
                Some(current)
            }
        }
    }
}

/// Handle on the innermost error of a cause chain.
///
/// `source()` only lends out nested errors, so the whole chain is kept alive
/// together with the depth at which the root cause sits.
#[derive(Clone)]
pub struct RootCause {
    chain: SharedError,
    depth: usize,
}

impl RootCause {
    pub fn get(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = &*self.chain;
        for _ in 0..self.depth {
            match current.source() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// The outermost failure as it was observed by the orchestrator.
    pub fn observed(&self) -> &SharedError {
        &self.chain
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for RootCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCause")
            .field("cause", &self.get())
            .field("depth", &self.depth)
            .finish()
    }
}

impl fmt::Display for RootCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.get(), f)
    }
}

impl StdError for RootCause {}

pub type Result<T> = std::result::Result<T, DeploymentError>;
