//! # Deployment Model Contracts
//!
//! What the orchestrator knows about units of work: their identity, which
//! population they belong to, and where they come from. What a unit actually
//! represents (an object type, a query descriptor) stays opaque.

pub mod candidates;
pub mod context;
pub mod provider;
pub mod unit;

pub use candidates::CandidateSet;
pub use context::{Context, UnknownContext};
pub use provider::ModelProvider;
pub use unit::{DeploymentUnit, WorkUnit};
