//! Unbounded, priority-ordered blocking queue feeding the worker threads.

use parking_lot::{Condvar, Mutex};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::priority::TaskPriority;

struct Entry<T> {
    priority: TaskPriority,
    job: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

struct QueueState<T> {
    heap: BinaryHeap<Entry<T>>,
    closed: bool,
}

pub struct PriorityTaskQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> PriorityTaskQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                heap: BinaryHeap::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Enqueue a job; hands it back if the queue has been closed
    pub fn push(&self, priority: TaskPriority, job: T) -> Result<(), T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(job);
        }
        state.heap.push(Entry { priority, job });
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Block until a job is available; `None` once the queue is closed
    pub fn pop(&self) -> Option<(TaskPriority, T)> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(entry) = state.heap.pop() {
                return Some((entry.priority, entry.job));
            }
            self.available.wait(&mut state);
        }
    }

    /// Close the queue, wake every waiting worker and return the jobs that never started
    pub fn close(&self) -> Vec<T> {
        let mut state = self.state.lock();
        state.closed = true;
        let abandoned = std::mem::take(&mut state.heap)
            .into_vec()
            .into_iter()
            .map(|entry| entry.job)
            .collect();
        drop(state);

        self.available.notify_all();
        abandoned
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for PriorityTaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
