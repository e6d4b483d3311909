//! # Completion Tracker
//!
//! Thread-safe record of the units that finished successfully during one pass.
//! Inserts and lookups go through `DashSet` shard locks, so no insert is lost
//! and a unit is never visible twice. Insertion order is not recorded.

use dashmap::DashSet;

use crate::model::WorkUnit;

#[derive(Debug)]
pub struct CompletionTracker<U: WorkUnit> {
    completed: DashSet<U>,
}

impl<U: WorkUnit> CompletionTracker<U> {
    pub fn new() -> Self {
        Self {
            completed: DashSet::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            completed: DashSet::with_capacity(capacity),
        }
    }

    /// Record `unit` as completed; returns `true` if it was not recorded yet
    pub fn mark(&self, unit: &U) -> bool {
        self.completed.insert(unit.clone())
    }

    pub fn contains(&self, unit: &U) -> bool {
        self.completed.contains(unit)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Point-in-time copy of the completed units, in no particular order
    pub fn snapshot(&self) -> Vec<U> {
        self.completed.iter().map(|unit| unit.key().clone()).collect()
    }
}

impl<U: WorkUnit> Default for CompletionTracker<U> {
    fn default() -> Self {
        Self::new()
    }
}
