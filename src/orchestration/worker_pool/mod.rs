//! # Worker Pool
//!
//! Fixed-size pool of named OS threads draining an unbounded, priority-ordered
//! queue. The pool never grows or shrinks after construction and is owned by a
//! single deployment pass.
//!
//! ## Shutdown
//!
//! [`WorkerPool::shutdown_now`] closes the queue, drops every job that has not
//! started and raises the pool's [`CancellationFlag`]. Running jobs are not
//! interrupted and not waited for; they observe the flag and wind down on
//! their own. [`WorkerPool::await_termination`] can be used when a caller does
//! need the threads gone.

pub mod priority;
pub mod queue;
pub mod thread_naming;

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::PoolConfig;
use crate::constants::events;
use crate::error::{DeploymentError, Result};
use crate::orchestration::cancellation::CancellationFlag;

pub use priority::TaskPriority;
pub use queue::PriorityTaskQueue;
pub use thread_naming::{thread_suffix, ThreadNamer};

/// Unit of work executed by a pool thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolShared {
    name: String,
    queue: PriorityTaskQueue<Job>,
    cancellation: CancellationFlag,
}

pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
    thread_names: Vec<String>,
}

/// Logical processors available to this process; 1 if detection fails
pub fn detect_processor_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Number of worker threads for `processors` logical processors
pub fn pool_size(processors: usize, threads_per_processor: usize) -> usize {
    processors.max(1).saturating_mul(threads_per_processor.max(1))
}

impl WorkerPool {
    /// Size the pool from configuration: `threads_per_processor` times the
    /// configured or detected processor count.
    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        let processors = config
            .processor_count
            .unwrap_or_else(detect_processor_count);
        let size = pool_size(processors, config.threads_per_processor);
        Self::new(&config.thread_name_prefix, size)
    }

    /// Start `size` worker threads named `<name>-1` .. `<name>-<size>`
    pub fn new(name: &str, size: usize) -> Result<Self> {
        let size = size.max(1);
        let shared = Arc::new(PoolShared {
            name: name.to_string(),
            queue: PriorityTaskQueue::new(),
            cancellation: CancellationFlag::new(),
        });

        let namer = ThreadNamer::new(name);
        let mut workers = Vec::with_capacity(size);
        let mut thread_names = Vec::with_capacity(size);

        for _ in 0..size {
            let thread_name = namer.next_name();
            let worker_shared = Arc::clone(&shared);

            let spawned = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || Self::worker_loop(&worker_shared));

            match spawned {
                Ok(handle) => {
                    workers.push(handle);
                    thread_names.push(thread_name);
                }
                Err(e) => {
                    error!(
                        pool = %name,
                        thread = %thread_name,
                        error = %e,
                        "POOL: Failed to start worker thread"
                    );
                    shared.queue.close();
                    shared.cancellation.cancel();
                    return Err(DeploymentError::worker_pool(format!(
                        "failed to start worker thread {thread_name}: {e}"
                    )));
                }
            }
        }

        debug!(pool = %name, threads = size, "POOL: Number of threads is {}", size);
        info!(
            event = events::POOL_STARTED,
            pool = %name,
            threads = size,
            "POOL: Worker pool started"
        );

        Ok(Self {
            shared,
            workers,
            thread_names,
        })
    }

    fn worker_loop(shared: &PoolShared) {
        while let Some((priority, job)) = shared.queue.pop() {
            // A panicking job must not take the worker down with it.
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                error!(
                    pool = %shared.name,
                    sequence = priority.sequence,
                    panic = %panic_message(payload.as_ref()),
                    "POOL: Job panicked"
                );
            }
        }

        debug!(pool = %shared.name, "POOL: Worker exiting");
    }

    /// Queue a job; fails once the pool has been shut down
    pub fn submit<F>(&self, priority: TaskPriority, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submitter().submit(priority, job)
    }

    /// Cloneable handle that jobs can use to re-queue work
    pub fn submitter(&self) -> PoolSubmitter {
        PoolSubmitter {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Close the queue and raise cancellation without waiting for running jobs.
    ///
    /// Returns the number of queued jobs that were dropped unstarted. Calling it
    /// again is a no-op returning 0.
    pub fn shutdown_now(&self) -> usize {
        if !self.shared.cancellation.cancel() {
            return 0;
        }

        let abandoned = self.shared.queue.close().len();
        info!(
            event = events::POOL_SHUTDOWN,
            pool = %self.shared.name,
            abandoned = abandoned,
            "POOL: Worker pool shut down"
        );
        abandoned
    }

    /// Wait up to `timeout` for every worker thread to exit after shutdown.
    /// Returns `true` if all of them did.
    pub fn await_termination(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            let (finished, running): (Vec<_>, Vec<_>) =
                self.workers.drain(..).partition(JoinHandle::is_finished);
            self.workers = running;

            for handle in finished {
                if handle.join().is_err() {
                    warn!(pool = %self.shared.name, "POOL: Worker thread ended with a panic");
                }
            }

            if self.workers.is_empty() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn size(&self) -> usize {
        self.thread_names.len()
    }

    pub fn thread_names(&self) -> &[String] {
        &self.thread_names
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.cancellation.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.shared.cancellation
    }

    /// Jobs waiting for a worker
    pub fn queued(&self) -> usize {
        self.shared.queue.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.shared.name)
            .field("size", &self.size())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

/// Submission handle shared with running jobs
#[derive(Clone)]
pub struct PoolSubmitter {
    shared: Arc<PoolShared>,
}

impl PoolSubmitter {
    pub fn submit<F>(&self, priority: TaskPriority, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared
            .queue
            .push(priority, Box::new(job))
            .map_err(|_| {
                DeploymentError::worker_pool(format!("pool {} is shut down", self.shared.name))
            })
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
