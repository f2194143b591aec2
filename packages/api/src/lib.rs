//! # Fetchq public API
//!
//! Fluent surface over the `fetchq_client` dispatcher: build a request,
//! pick a priority, and register a callback that is invoked exactly once
//! with either the typed result or a structured error.
//!
//! ```no_run
//! use fetchq::{Fetchq, Priority};
//!
//! Fetchq::get("https://api.example.com/users/{id}")
//!     .path_param("id", "42")
//!     .query_param("active", "true")
//!     .priority(Priority::High)
//!     .build()
//!     .as_object(|result| match result {
//!         Ok(user) => println!("user: {user}"),
//!         Err(error) => eprintln!("request failed: {error}"),
//!     });
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

mod typed;

use std::sync::Arc;

pub use fetchq_client::prelude::*;
pub use fetchq_client::{cancel_all, init, init_with_config, queue_stats};
pub use typed::FetchTyped;

/// Static entry points for building requests.
///
/// The dispatcher must be started once per process with
/// [`Fetchq::initialize`] before any terminal `as_*` call; a request
/// submitted earlier is delivered an error instead of executing.
pub struct Fetchq;

impl Fetchq {
    /// Starts the process-wide dispatcher over `transport`.
    pub fn initialize(transport: Arc<dyn Transport>) {
        fetchq_client::init(transport);
    }

    /// Starts the dispatcher with an explicit configuration.
    pub fn initialize_with(transport: Arc<dyn Transport>, config: QueueConfig) {
        fetchq_client::init_with_config(transport, config);
    }

    /// Builds a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> GetRequestBuilder {
        GetRequestBuilder::new(url)
    }

    /// Builds a HEAD request.
    #[must_use]
    pub fn head(url: impl Into<String>) -> GetRequestBuilder {
        GetRequestBuilder::head(url)
    }

    /// Builds an OPTIONS request.
    #[must_use]
    pub fn options(url: impl Into<String>) -> GetRequestBuilder {
        GetRequestBuilder::options(url)
    }

    /// Builds a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> BodyRequestBuilder {
        BodyRequestBuilder::post(url)
    }

    /// Builds a PUT request.
    #[must_use]
    pub fn put(url: impl Into<String>) -> BodyRequestBuilder {
        BodyRequestBuilder::put(url)
    }

    /// Builds a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> BodyRequestBuilder {
        BodyRequestBuilder::delete(url)
    }

    /// Builds a PATCH request.
    #[must_use]
    pub fn patch(url: impl Into<String>) -> BodyRequestBuilder {
        BodyRequestBuilder::patch(url)
    }

    /// Builds a multipart file upload.
    #[must_use]
    pub fn upload(url: impl Into<String>) -> MultipartRequestBuilder {
        MultipartRequestBuilder::new(url)
    }

    /// Cooperatively cancels every tracked request.
    pub fn cancel_all() {
        fetchq_client::cancel_all();
    }

    /// Counters for the process-wide queue.
    #[must_use]
    pub fn stats() -> QueueStatsSnapshot {
        fetchq_client::queue_stats()
    }
}
