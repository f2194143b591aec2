//! Priority queue dispatcher and the process-wide default instance.

mod queue;
mod worker;

use std::sync::{Arc, OnceLock};

use crate::config::QueueConfig;
use crate::executor;
use crate::transport::Transport;

pub use queue::RequestQueue;

static GLOBAL_QUEUE: OnceLock<Arc<RequestQueue>> = OnceLock::new();

/// Starts the process-wide dispatcher over `transport` with default
/// configuration.
pub fn init(transport: Arc<dyn Transport>) {
    init_with_config(transport, QueueConfig::default());
}

/// Starts the process-wide dispatcher with an explicit configuration.
///
/// Invalid configuration is logged and replaced by defaults; a second call
/// keeps the running queue.
pub fn init_with_config(transport: Arc<dyn Transport>, config: QueueConfig) {
    if GLOBAL_QUEUE.get().is_some() {
        tracing::warn!("request queue already initialized; keeping the existing instance");
        return;
    }
    let config = match config.validate() {
        Ok(()) => config,
        Err(message) => {
            tracing::error!("invalid queue configuration: {message}; using defaults");
            QueueConfig::default()
        }
    };
    executor::init_network(config.delivery_threads);
    let queue = RequestQueue::start(transport, config);
    if GLOBAL_QUEUE.set(queue).is_err() {
        tracing::warn!("request queue already initialized; keeping the existing instance");
    }
}

/// The process-wide dispatcher, if initialized.
pub fn global() -> Option<Arc<RequestQueue>> {
    GLOBAL_QUEUE.get().cloned()
}
