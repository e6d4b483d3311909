//! Candidate population selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects which population of units a deployment pass operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    /// Every managed type of the model
    ManagedTypes,
    /// Types that carry an identity (entities and mapped superclasses)
    IdentifiableTypes,
    /// Entities only
    Entities,
    /// Named query descriptors
    NamedQueries,
}

impl Context {
    pub const ALL: [Context; 4] = [
        Context::ManagedTypes,
        Context::IdentifiableTypes,
        Context::Entities,
        Context::NamedQueries,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Context::ManagedTypes => "managed_types",
            Context::IdentifiableTypes => "identifiable_types",
            Context::Entities => "entities",
            Context::NamedQueries => "named_queries",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown deployment context: {0}")]
pub struct UnknownContext(pub String);

impl FromStr for Context {
    type Err = UnknownContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Context::ALL
            .into_iter()
            .find(|context| context.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownContext(s.to_string()))
    }
}
