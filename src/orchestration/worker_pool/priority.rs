//! Task ordering for the worker pool queue.

use std::cmp::Ordering;

/// Position of a task in the pool's queue.
///
/// Tasks are dequeued in ascending `(deferrals, depth, sequence)` order:
/// units that have been deferred less often go first, then shallower units
/// (supertypes before subtypes), then submission order. A deferred unit is
/// re-queued with `deferrals + 1`, which moves it behind every unit that has
/// not yet had a chance to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TaskPriority {
    pub deferrals: u32,
    pub depth: u32,
    pub sequence: u64,
}

impl TaskPriority {
    pub fn new(depth: u32, sequence: u64) -> Self {
        Self {
            deferrals: 0,
            depth,
            sequence,
        }
    }

    /// Priority of the same task after one more deferral
    pub fn deferred(self) -> Self {
        Self {
            deferrals: self.deferrals.saturating_add(1),
            ..self
        }
    }

    fn key(&self) -> (u32, u32, u64) {
        (self.deferrals, self.depth, self.sequence)
    }
}

// `BinaryHeap` pops the greatest element, so the natural key order is reversed.
impl Ord for TaskPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for TaskPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
