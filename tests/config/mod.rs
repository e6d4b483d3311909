//! Configuration Integration Tests
