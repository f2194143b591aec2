//! Delivery state machine: exactly-once callback invocation.
//!
//! The `delivered` flag is claimed with an atomic compare-and-set; whoever
//! wins the claim owns the callback. Losing paths are no-ops, so success,
//! error and cancellation can race freely without double delivery.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};

use crate::error::{self, Error};
use crate::executor::{self, Executor};
use crate::http::request::{Callback, Payload, Request};

impl Request {
    /// Marks the request delivered. Returns `false` when delivery already
    /// happened; callers that lose the claim must not touch the callback.
    pub(crate) fn claim_delivery(&self) -> bool {
        self.delivered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Delivers a successful payload.
    ///
    /// The success callback runs on the per-request executor when one was
    /// set, otherwise on the default network executor. A request cancelled
    /// before this point receives the cancellation sentinel instead,
    /// synchronously on the calling thread, and is finalized immediately.
    pub fn deliver_payload(&self, payload: Payload) {
        if !self.claim_delivery() {
            return;
        }
        if self.cancelled.load(Ordering::Acquire) {
            self.run_callback(Err(error::cancelled()));
            self.finish();
            return;
        }
        let Some(callback) = self.take_callback() else {
            return;
        };
        let sequence = self.sequence();
        self.resolve_executor().execute(Box::new(move || {
            if catch_unwind(AssertUnwindSafe(|| callback(Ok(payload)))).is_err() {
                tracing::error!(sequence, "request callback panicked during delivery");
            }
        }));
    }

    /// Delivers an error synchronously on the calling thread. When the
    /// request was cancelled first, the error is rewritten to the
    /// cancellation sentinel before the callback sees it.
    pub fn deliver_error(&self, error: Error) {
        if !self.claim_delivery() {
            return;
        }
        let error = if self.cancelled.load(Ordering::Acquire) {
            error.into_cancelled()
        } else {
            error
        };
        self.run_callback(Err(error));
    }

    /// Sets the cancellation flag. Cancellation is cooperative: an
    /// in-flight transport call is not interrupted, but its result is
    /// discarded in favor of a cancellation delivery. The flag is frozen
    /// once delivery happened.
    pub fn cancel(&self) {
        if !self.delivered.load(Ordering::Acquire) {
            self.cancelled.store(true, Ordering::Release);
            tracing::debug!(sequence = self.sequence(), "request cancelled");
        }
    }

    /// Tells the dispatcher this descriptor's lifecycle is complete so it
    /// can drop its tracking entry. Idempotent.
    pub fn finish(&self) {
        if let Some(queue) = self.queue.get().and_then(Weak::upgrade) {
            queue.finish(self);
        }
    }

    pub(crate) fn resolve_executor(&self) -> Arc<dyn Executor> {
        self.executor.clone().unwrap_or_else(executor::default_network)
    }

    fn take_callback(&self) -> Option<Callback> {
        let mut slot = match self.callback.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.take()
    }

    fn run_callback(&self, result: Result<Payload, Error>) {
        let Some(callback) = self.take_callback() else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| callback(result))).is_err() {
            tracing::error!(
                sequence = self.sequence(),
                "request callback panicked during delivery"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    use super::*;
    use crate::builder::BodyRequestBuilder;
    use crate::error::{Kind, REQUEST_CANCELLED};
    use crate::executor::ImmediateExecutor;

    fn delivered_results() -> (Request, mpsc::Receiver<Result<Payload, Error>>) {
        let mut request = BodyRequestBuilder::post("https://api.example.com/items")
            .executor(Arc::new(ImmediateExecutor))
            .build();
        let (tx, rx) = mpsc::channel();
        request.register(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        (request, rx)
    }

    fn payload() -> Payload {
        Payload::Text("ok".to_string())
    }

    #[test]
    fn delivers_payload_exactly_once() {
        let (request, rx) = delivered_results();
        request.deliver_payload(payload());
        request.deliver_payload(payload());
        request.deliver_error(error::transport(std::io::Error::other("late")));

        assert!(rx.recv_timeout(Duration::from_secs(1)).unwrap().is_ok());
        assert!(rx.try_recv().is_err());
        assert!(request.is_delivered());
    }

    #[test]
    fn error_after_delivery_is_a_no_op() {
        let (request, rx) = delivered_results();
        request.deliver_error(error::transport(std::io::Error::other("down")));
        request.deliver_payload(payload());

        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(first.unwrap_err().kind(), Kind::Transport);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancellation_takes_precedence_over_success() {
        let (request, rx) = delivered_results();
        request.cancel();
        request.deliver_payload(payload());

        let error = rx.recv_timeout(Duration::from_secs(1)).unwrap().unwrap_err();
        assert!(error.is_cancelled());
        assert_eq!(error.code(), 0);
        assert_eq!(error.detail(), REQUEST_CANCELLED);
    }

    #[test]
    fn cancellation_overwrites_other_errors() {
        let (request, rx) = delivered_results();
        request.cancel();
        request.deliver_error(error::transport(std::io::Error::other("down")).with_code(503));

        let error = rx.recv_timeout(Duration::from_secs(1)).unwrap().unwrap_err();
        assert_eq!(error.kind(), Kind::Cancelled);
        assert_eq!(error.code(), 0);
        assert_eq!(error.detail(), REQUEST_CANCELLED);
    }

    #[test]
    fn cancel_after_delivery_leaves_the_flag_frozen() {
        let (request, rx) = delivered_results();
        request.deliver_payload(payload());
        let _ = rx.recv_timeout(Duration::from_secs(1)).unwrap();

        request.cancel();
        assert!(!request.is_cancelled());
    }

    #[test]
    fn callback_panic_is_contained() {
        let mut request = BodyRequestBuilder::post("https://api.example.com/items")
            .executor(Arc::new(ImmediateExecutor))
            .build();
        request.register(Box::new(|_result| panic!("handler bug")));

        request.deliver_payload(payload());
        assert!(request.is_delivered());
    }

    #[test]
    fn concurrent_success_and_error_deliver_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut request = BodyRequestBuilder::post("https://api.example.com/items")
            .executor(Arc::new(ImmediateExecutor))
            .build();
        let seen = Arc::clone(&counter);
        request.register(Box::new(move |_result| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        let request = Arc::new(request);

        let barrier = Arc::new(Barrier::new(2));
        let success = {
            let request = Arc::clone(&request);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                request.deliver_payload(Payload::Text("ok".to_string()));
            })
        };
        let failure = {
            let request = Arc::clone(&request);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                request.deliver_error(error::transport(std::io::Error::other("down")));
            })
        };
        success.join().unwrap();
        failure.join().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
