//! Behavior before the process-wide dispatcher exists.
//!
//! These tests run in their own binary so the global queue is never
//! initialized here.

use std::sync::mpsc;
use std::time::Duration;

use fetchq_client::error::Kind;
use fetchq_client::prelude::*;

#[test]
fn terminal_call_delivers_an_error_synchronously() {
    let (tx, rx) = mpsc::channel();
    let handle = GetRequestBuilder::new("https://api.example.com/object")
        .build()
        .as_object(move |result| {
            let _ = tx.send(result);
        });

    let error = rx
        .recv_timeout(Duration::from_secs(1))
        .unwrap()
        .unwrap_err();
    assert_eq!(error.kind(), Kind::Transport);
    assert!(handle.is_delivered());
}

#[test]
fn stats_are_zero_without_a_queue() {
    assert_eq!(fetchq_client::queue_stats(), QueueStatsSnapshot::default());
}
