//! # Fetchq request dispatcher
//!
//! Priority-queued HTTP request dispatch with exactly-once callback
//! delivery. An outbound request is modelled as a mutable, prioritizable
//! unit of work: a [`Request`] descriptor is assembled by a builder,
//! submitted to a priority-ordered queue, executed against a pluggable
//! [`Transport`], and its interpreted result — JSON object, JSON array or
//! text — is delivered exactly once to the caller's callback on a
//! controlled execution context.
//!
//! ## Features
//!
//! - **Priority scheduling** with FIFO ordering inside each priority level
//! - **Exactly-once delivery** under concurrent completion and cancellation
//! - **Typed interpretation** of responses as JSON objects, arrays or text
//! - **Cooperative cancellation** with a fixed sentinel error
//! - **Pluggable transport** plus per-request transport and executor
//!   overrides
//! - **Upload progress reporting** for multipart requests

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod http;
pub mod telemetry;
pub mod transport;

pub mod prelude;

pub use prelude::*;

use std::sync::Arc;

/// Starts the process-wide dispatcher over `transport` with default
/// configuration. The dispatcher lives for the rest of the process.
pub fn init(transport: Arc<dyn Transport>) {
    dispatch::init(transport);
}

/// Starts the process-wide dispatcher with an explicit configuration.
/// Invalid configuration is logged and replaced by defaults.
pub fn init_with_config(transport: Arc<dyn Transport>, config: QueueConfig) {
    dispatch::init_with_config(transport, config);
}

/// Cooperatively cancels every request tracked by the process-wide queue.
pub fn cancel_all() {
    if let Some(queue) = dispatch::global() {
        queue.cancel_all();
    }
}

/// Counters for the process-wide queue; all zeros when it was never
/// initialized.
#[must_use]
pub fn queue_stats() -> QueueStatsSnapshot {
    dispatch::global().map_or_else(QueueStatsSnapshot::default, |queue| queue.stats().snapshot())
}
