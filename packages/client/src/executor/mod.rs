//! Execution contexts for callback delivery.
//!
//! Callbacks never run on a dispatcher worker: delivery is handed to an
//! [`Executor`], by default a process-wide network thread pool created once
//! and shared for the life of the process. Requests may carry their own
//! executor override.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread;

use crossbeam_channel::{unbounded, Sender};

/// Unit of work handed to an executor.
pub type Job = Box<dyn FnOnce() + Send>;

/// Execution context for delivering callbacks.
pub trait Executor: Send + Sync {
    fn execute(&self, job: Job);
}

/// Bounded thread pool over an unbounded job channel. Panicking jobs are
/// logged; the pool keeps running.
pub struct ThreadPoolExecutor {
    sender: Sender<Job>,
}

impl ThreadPoolExecutor {
    /// Spawns `threads` named worker threads (at least one).
    pub fn new(name: &str, threads: usize) -> Self {
        let (sender, receiver) = unbounded::<Job>();
        for index in 0..threads.max(1) {
            let receiver = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("{name}-{index}"))
                .spawn(move || {
                    for job in receiver.iter() {
                        if catch_unwind(AssertUnwindSafe(job)).is_err() {
                            tracing::error!("executor job panicked");
                        }
                    }
                });
            if let Err(e) = spawned {
                tracing::error!("failed to spawn executor thread: {e}");
            }
        }
        Self { sender }
    }
}

impl Executor for ThreadPoolExecutor {
    fn execute(&self, job: Job) {
        if self.sender.send(job).is_err() {
            tracing::error!("executor channel closed; dropping job");
        }
    }
}

/// Runs jobs inline on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateExecutor;

impl Executor for ImmediateExecutor {
    fn execute(&self, job: Job) {
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("executor job panicked");
        }
    }
}

static NETWORK_EXECUTOR: OnceLock<Arc<ThreadPoolExecutor>> = OnceLock::new();

const DEFAULT_DELIVERY_THREADS: usize = 2;

/// Installs the process-wide network executor with the given thread count.
/// A second call keeps the existing pool.
pub fn init_network(threads: usize) {
    let pool = Arc::new(ThreadPoolExecutor::new("fetchq-delivery", threads));
    if NETWORK_EXECUTOR.set(pool).is_err() {
        tracing::warn!("network executor already initialized; keeping existing pool");
    }
}

/// Process-wide default network executor, created on first use.
pub fn default_network() -> Arc<dyn Executor> {
    NETWORK_EXECUTOR
        .get_or_init(|| {
            Arc::new(ThreadPoolExecutor::new(
                "fetchq-delivery",
                DEFAULT_DELIVERY_THREADS,
            ))
        })
        .clone()
}
