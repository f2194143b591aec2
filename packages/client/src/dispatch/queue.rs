//! Priority-ordered ready set and request tracking.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use crossbeam_channel::{unbounded, Sender};
use dashmap::DashMap;

use crate::config::QueueConfig;
use crate::dispatch::worker;
use crate::http::request::{Priority, Request};
use crate::telemetry::QueueStats;
use crate::transport::Transport;

/// Priority-ordered dispatcher: accepts descriptors, orders them by
/// descending priority then ascending sequence number, and hands them to a
/// bounded pool of worker threads.
pub struct RequestQueue {
    ready: Mutex<BinaryHeap<QueueEntry>>,
    tickets: Sender<()>,
    in_flight: DashMap<u64, Arc<Request>>,
    sequence: AtomicU64,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) config: QueueConfig,
    stats: QueueStats,
}

pub(crate) struct QueueEntry {
    priority: Priority,
    sequence: u64,
    pub(crate) request: Arc<Request>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Max-heap: highest priority first, then the oldest sequence number.
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl RequestQueue {
    /// Starts the queue with `config.workers` worker threads pulling from
    /// the ready set.
    pub fn start(transport: Arc<dyn Transport>, config: QueueConfig) -> Arc<Self> {
        let (tickets, ticket_rx) = unbounded();
        let queue = Arc::new(Self {
            ready: Mutex::new(BinaryHeap::new()),
            tickets,
            in_flight: DashMap::new(),
            sequence: AtomicU64::new(0),
            transport,
            config,
            stats: QueueStats::default(),
        });
        for index in 0..queue.config.workers {
            let queue = Arc::downgrade(&queue);
            let tickets = ticket_rx.clone();
            let spawned = thread::Builder::new()
                .name(format!("fetchq-worker-{index}"))
                .spawn(move || worker::run(&queue, &tickets));
            if let Err(e) = spawned {
                tracing::error!("failed to spawn queue worker: {e}");
            }
        }
        queue
    }

    /// Assigns the next sequence number and inserts the descriptor into
    /// the ready set. The descriptor is consumed, so a submitted request
    /// cannot be submitted again.
    pub fn submit(self: &Arc<Self>, request: Request) -> Arc<Request> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        request.sequence.store(sequence, Ordering::Relaxed);
        let _ = request.queue.set(Arc::downgrade(self));

        let request = Arc::new(request);
        self.in_flight.insert(sequence, Arc::clone(&request));
        self.stats.record_submitted();
        self.lock_ready().push(QueueEntry {
            priority: request.priority,
            sequence,
            request: Arc::clone(&request),
        });
        // Entry must be visible before the ticket, or a worker could burn
        // the wakeup on an empty heap.
        if self.tickets.send(()).is_err() {
            tracing::error!(sequence, "queue workers are gone; request will not execute");
        }
        tracing::debug!(sequence, priority = ?request.priority, "request submitted");
        request
    }

    pub(crate) fn pop_ready(&self) -> Option<QueueEntry> {
        self.lock_ready().pop()
    }

    fn lock_ready(&self) -> MutexGuard<'_, BinaryHeap<QueueEntry>> {
        match self.ready.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Drops a finished descriptor from tracking. Idempotent.
    pub fn finish(&self, request: &Request) {
        if self.in_flight.remove(&request.sequence()).is_some() {
            tracing::debug!(sequence = request.sequence(), "request finished");
        }
    }

    /// Cooperatively cancels every tracked request.
    pub fn cancel_all(&self) {
        for entry in self.in_flight.iter() {
            entry.value().cancel();
        }
    }

    /// Number of requests submitted but not yet finished.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GetRequestBuilder;
    use crate::transport::{PreparedCall, RawResponse, TransportFailure};

    struct IdleTransport;

    impl Transport for IdleTransport {
        fn perform(&self, _call: &PreparedCall) -> Result<RawResponse, TransportFailure> {
            Err(TransportFailure::new(std::io::Error::other("idle")))
        }
    }

    fn paused_queue() -> Arc<RequestQueue> {
        // Zero workers: entries stay queued so ordering can be observed.
        RequestQueue::start(
            Arc::new(IdleTransport),
            QueueConfig {
                workers: 0,
                delivery_threads: 1,
                user_agent: None,
            },
        )
    }

    fn submit_with_priority(queue: &Arc<RequestQueue>, priority: Priority) -> Arc<Request> {
        queue.submit(
            GetRequestBuilder::new("https://api.example.com/items")
                .priority(priority)
                .build(),
        )
    }

    #[test]
    fn pull_order_is_priority_then_fifo() {
        let queue = paused_queue();
        for priority in [
            Priority::Low,
            Priority::High,
            Priority::Medium,
            Priority::High,
        ] {
            submit_with_priority(&queue, priority);
        }

        let order: Vec<u64> = std::iter::from_fn(|| queue.pop_ready())
            .map(|entry| entry.request.sequence())
            .collect();
        assert_eq!(order, vec![2, 4, 3, 1]);
    }

    #[test]
    fn sequence_numbers_are_monotonic() {
        let queue = paused_queue();
        let first = submit_with_priority(&queue, Priority::Medium);
        let second = submit_with_priority(&queue, Priority::Medium);
        assert_eq!(first.sequence(), 1);
        assert_eq!(second.sequence(), 2);
        assert_eq!(queue.stats().snapshot().submitted, 2);
    }

    #[test]
    fn cancel_all_flags_every_tracked_request() {
        let queue = paused_queue();
        let first = submit_with_priority(&queue, Priority::Low);
        let second = submit_with_priority(&queue, Priority::High);
        assert_eq!(queue.pending(), 2);

        queue.cancel_all();
        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
    }

    #[test]
    fn finish_is_idempotent() {
        let queue = paused_queue();
        let request = submit_with_priority(&queue, Priority::Medium);
        assert_eq!(queue.pending(), 1);

        queue.finish(&request);
        queue.finish(&request);
        assert_eq!(queue.pending(), 0);
    }
}
