//! Bounded per-connection outbound queue.
//!
//! The bus pushes into the queue synchronously; the connection's forwarding
//! task pulls from it asynchronously. When the queue is full the oldest
//! pending event is dropped to make room for the newest. If a queue keeps
//! evicting without its reader ever taking anything out, the reader is
//! considered stuck and the queue reports [`Offer::Stalled`] so the bus
//! tears the subscription down.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::domain::events::Event;
use crate::ports::{EventSink, Offer};

/// Queue sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSettings {
    /// Maximum number of pending events.
    pub capacity: usize,
    /// Evictions in a row, with no read in between, before the reader is declared stuck.
    pub stall_threshold: usize,
}

impl QueueSettings {
    pub fn new(capacity: usize, stall_threshold: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            stall_threshold: stall_threshold.max(1),
        }
    }
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Arc<Event>>,
    closed: bool,
    evictions_since_read: usize,
    evicted_total: u64,
    last_offered: u64,
}

/// Bounded drop-oldest queue with async receive.
#[derive(Debug)]
pub struct EventQueue {
    settings: QueueSettings,
    state: Mutex<QueueState>,
    notify: Notify,
}

impl EventQueue {
    pub fn new(settings: QueueSettings) -> Self {
        Self {
            settings,
            state: Mutex::new(QueueState::default()),
            notify: Notify::new(),
        }
    }

    /// Wait for the next event. Returns `None` once the queue is closed;
    /// events still pending at close time are discarded.
    pub async fn recv(&self) -> Option<Arc<Event>> {
        loop {
            if let Some(next) = self.try_recv() {
                return next;
            }
            self.notify.notified().await;
        }
    }

    /// Non-blocking receive: `None` if nothing is pending yet,
    /// `Some(None)` if the queue is closed.
    pub fn try_recv(&self) -> Option<Option<Arc<Event>>> {
        let mut state = self.state();
        if state.closed {
            return Some(None);
        }
        let event = state.pending.pop_front()?;
        state.evictions_since_read = 0;
        Some(Some(event))
    }

    pub fn len(&self) -> usize {
        self.state().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Total events dropped by eviction over the queue's lifetime.
    pub fn evicted_total(&self) -> u64 {
        self.state().evicted_total
    }

    /// Sequence of the newest event offered to this queue, 0 if none.
    pub fn last_offered(&self) -> u64 {
        self.state().last_offered
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for EventQueue {
    fn offer(&self, event: Arc<Event>) -> Offer {
        let outcome = {
            let mut state = self.state();
            if state.closed {
                return Offer::Closed;
            }
            state.last_offered = event.sequence;

            if state.pending.len() < self.settings.capacity {
                state.pending.push_back(event);
                Offer::Queued
            } else {
                state.pending.pop_front();
                state.pending.push_back(event);
                state.evicted_total += 1;
                state.evictions_since_read += 1;
                if state.evictions_since_read >= self.settings.stall_threshold {
                    Offer::Stalled
                } else {
                    Offer::Evicted
                }
            }
        };
        self.notify.notify_one();
        outcome
    }

    fn close(&self) {
        {
            let mut state = self.state();
            if state.closed {
                return;
            }
            state.closed = true;
            state.pending.clear();
        }
        self.notify.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{DomainEvent, ProductDiscontinuedPayload};
    use crate::domain::foundation::{ProductId, Timestamp};
    use crate::domain::routing::Audience;
    use std::time::Duration;

    fn event(sequence: u64) -> Arc<Event> {
        Arc::new(Event {
            sequence,
            timestamp: Timestamp::now(),
            audience: Audience::default(),
            payload: DomainEvent::ProductDiscontinued(ProductDiscontinuedPayload {
                id: ProductId::new(1),
            }),
        })
    }

    fn drain(queue: &EventQueue) -> Vec<u64> {
        let mut out = Vec::new();
        while let Some(Some(e)) = queue.try_recv() {
            out.push(e.sequence);
        }
        out
    }

    #[test]
    fn full_queue_drops_oldest() {
        let queue = EventQueue::new(QueueSettings::new(3, 10));
        for seq in 1..=3 {
            assert_eq!(queue.offer(event(seq)), Offer::Queued);
        }
        assert_eq!(queue.offer(event(4)), Offer::Evicted);
        assert_eq!(queue.offer(event(5)), Offer::Evicted);

        assert_eq!(drain(&queue), vec![3, 4, 5]);
        assert_eq!(queue.evicted_total(), 2);
        assert_eq!(queue.last_offered(), 5);
    }

    #[test]
    fn reader_that_never_reads_is_reported_stalled() {
        let queue = EventQueue::new(QueueSettings::new(2, 3));
        queue.offer(event(1));
        queue.offer(event(2));
        assert_eq!(queue.offer(event(3)), Offer::Evicted);
        assert_eq!(queue.offer(event(4)), Offer::Evicted);
        assert_eq!(queue.offer(event(5)), Offer::Stalled);
    }

    #[test]
    fn reading_resets_stall_counter() {
        let queue = EventQueue::new(QueueSettings::new(1, 2));
        queue.offer(event(1));
        assert_eq!(queue.offer(event(2)), Offer::Evicted);
        assert!(matches!(queue.try_recv(), Some(Some(_))));
        queue.offer(event(3));
        assert_eq!(queue.offer(event(4)), Offer::Evicted);
    }

    #[test]
    fn closed_queue_refuses_offers_and_drops_pending() {
        let queue = EventQueue::new(QueueSettings::default());
        queue.offer(event(1));
        queue.close();
        queue.close();
        assert!(queue.is_closed());
        assert!(queue.is_empty());
        assert_eq!(queue.offer(event(2)), Offer::Closed);
        assert!(matches!(queue.try_recv(), Some(None)));
    }

    #[test]
    fn settings_never_go_below_one() {
        let settings = QueueSettings::new(0, 0);
        assert_eq!(settings.capacity, 1);
        assert_eq!(settings.stall_threshold, 1);
    }

    #[tokio::test]
    async fn recv_wakes_on_offer() {
        let queue = Arc::new(EventQueue::new(QueueSettings::default()));
        let reader = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.recv().await.map(|e| e.sequence) })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.offer(event(7));
        let got = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, Some(7));
    }

    #[tokio::test]
    async fn recv_returns_none_after_close() {
        let queue = Arc::new(EventQueue::new(QueueSettings::default()));
        let reader = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.recv().await.is_none() })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();
        let closed = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert!(closed);
    }
}
