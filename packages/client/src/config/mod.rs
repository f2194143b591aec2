//! Dispatcher configuration.

use std::thread;

/// Configuration for the request queue and its executors.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Worker threads pulling requests off the priority queue.
    pub workers: usize,
    /// Threads in the default delivery executor.
    pub delivery_threads: usize,
    /// `User-Agent` applied when a request does not carry its own.
    pub user_agent: Option<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            workers: (cores * 2).clamp(2, 16),
            delivery_threads: 2,
            user_agent: None,
        }
    }
}

impl QueueConfig {
    /// Bounds-checks the configuration before the queue starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("worker count must be greater than zero".to_string());
        }
        if self.workers > 128 {
            return Err("worker count must not exceed 128".to_string());
        }
        if self.delivery_threads == 0 {
            return Err("delivery thread count must be greater than zero".to_string());
        }
        if self.delivery_threads > 128 {
            return Err("delivery thread count must not exceed 128".to_string());
        }
        if let Some(agent) = &self.user_agent {
            if agent.is_empty() {
                return Err("user agent cannot be empty".to_string());
            }
            if agent.len() > 1000 {
                return Err("user agent must not exceed 1000 characters".to_string());
            }
        }
        Ok(())
    }
}
