//! Incremental worker thread naming.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out `<prefix>-<n>` thread names with `n` strictly increasing from 1
#[derive(Debug)]
pub struct ThreadNamer {
    prefix: String,
    next: AtomicUsize,
}

impl ThreadNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(1),
        }
    }

    pub fn next_name(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Numeric suffix of a name produced by [`ThreadNamer`]
pub fn thread_suffix(name: &str) -> Option<usize> {
    name.rsplit_once('-').and_then(|(_, n)| n.parse().ok())
}
