//! Orchestration Integration Tests
//!
//! Deployment passes over the in-memory test model.

pub mod candidate_selection_test;
pub mod completion_tracking_test;
pub mod stress_test;
