//! Ordered event queue feeding the mute engine.
//!
//! Many producers (the player listener, unmute timers) and exactly one
//! consumer. Events are delivered in send order and never dropped while the
//! consumer is alive; senders wait when the queue is full.

use spotify_mute_detect::PlaybackNotification;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default queue capacity in events.
pub const DEFAULT_CAPACITY: usize = 64;

/// Identifies one scheduled unmute timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Something the engine has to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Player state changed.
    Playback(PlaybackNotification),
    /// A delayed unmute elapsed.
    UnmuteTimerElapsed(TimerId),
    /// The player quit. Finish a pending unmute, then stop.
    PlayerGone,
    /// Stop the engine loop, leaving audio as it is.
    Shutdown,
}

/// Event with its position in the queue.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Monotonic sequence number for ordering.
    pub seq: u64,
    /// Timestamp in milliseconds (wall clock when the event was sent).
    pub ts_ms: i64,
    pub event: Event,
}

/// Sender half of the event queue.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Envelope>,
    seq_counter: Arc<AtomicU64>,
}

impl EventSender {
    /// Send an event, waiting until space is available.
    ///
    /// Returns false if the consumer is gone.
    pub async fn send(&self, event: Event) -> bool {
        let seq = self.seq_counter.fetch_add(1, Ordering::Relaxed);
        let envelope = Envelope {
            seq,
            ts_ms: chrono::Utc::now().timestamp_millis(),
            event,
        };

        match self.tx.send(envelope).await {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!(seq, "event queue closed");
                false
            }
        }
    }

    /// Whether the consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Sender that does not keep the queue open.
    pub fn downgrade(&self) -> WeakEventSender {
        WeakEventSender {
            tx: self.tx.downgrade(),
            seq_counter: self.seq_counter.clone(),
        }
    }
}

/// Non-owning sender handle.
///
/// The receiver sees the end of the queue once every [`EventSender`] is
/// dropped, however many weak handles remain.
#[derive(Clone)]
pub struct WeakEventSender {
    tx: mpsc::WeakSender<Envelope>,
    seq_counter: Arc<AtomicU64>,
}

impl WeakEventSender {
    /// `None` once every [`EventSender`] is gone.
    pub fn upgrade(&self) -> Option<EventSender> {
        Some(EventSender {
            tx: self.tx.upgrade()?,
            seq_counter: self.seq_counter.clone(),
        })
    }
}

/// Receiver half of the event queue.
pub struct EventReceiver {
    rx: mpsc::Receiver<Envelope>,
    last_seq: Option<u64>,
    received: u64,
}

impl EventReceiver {
    /// Receive the next event. `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<Envelope> {
        let envelope = self.rx.recv().await?;

        if let Some(last) = self.last_seq {
            if envelope.seq <= last {
                tracing::warn!(
                    seq = envelope.seq,
                    last_seq = last,
                    "event received out of sequence"
                );
            }
        }
        self.last_seq = Some(envelope.seq);
        self.received += 1;

        Some(envelope)
    }

    /// Sequence number of the most recently received event.
    pub fn last_seq(&self) -> Option<u64> {
        self.last_seq
    }

    /// Number of events received so far.
    pub fn received(&self) -> u64 {
        self.received
    }
}

/// Create a queue with [`DEFAULT_CAPACITY`].
pub fn channel() -> (EventSender, EventReceiver) {
    channel_with_capacity(DEFAULT_CAPACITY)
}

/// Create a queue holding at most `capacity` pending events.
pub fn channel_with_capacity(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    tracing::debug!(capacity, "created event queue");

    (
        EventSender {
            tx,
            seq_counter: Arc::new(AtomicU64::new(0)),
        },
        EventReceiver {
            rx,
            last_seq: None,
            received: 0,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_recv() {
        let (sender, mut receiver) = channel();

        assert!(sender.send(Event::UnmuteTimerElapsed(TimerId(7))).await);

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(envelope.seq, 0);
        assert_eq!(envelope.event, Event::UnmuteTimerElapsed(TimerId(7)));
        assert_eq!(receiver.last_seq(), Some(0));
    }

    #[tokio::test]
    async fn test_order_is_preserved_across_senders() {
        let (sender, mut receiver) = channel();
        let other = sender.clone();

        sender
            .send(Event::Playback(PlaybackNotification::playing("a")))
            .await;
        other.send(Event::UnmuteTimerElapsed(TimerId(1))).await;
        sender
            .send(Event::Playback(PlaybackNotification::playing("b")))
            .await;

        let mut seqs = Vec::new();
        let mut events = Vec::new();
        for _ in 0..3 {
            let envelope = receiver.recv().await.unwrap();
            seqs.push(envelope.seq);
            events.push(envelope.event);
        }

        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(
            events,
            vec![
                Event::Playback(PlaybackNotification::playing("a")),
                Event::UnmuteTimerElapsed(TimerId(1)),
                Event::Playback(PlaybackNotification::playing("b")),
            ]
        );
        assert_eq!(receiver.received(), 3);
    }

    #[tokio::test]
    async fn test_full_queue_waits_instead_of_dropping() {
        let (sender, mut receiver) = channel_with_capacity(1);

        let producer = tokio::spawn({
            let sender = sender.clone();
            async move {
                for i in 0..5 {
                    sender.send(Event::UnmuteTimerElapsed(TimerId(i))).await;
                }
            }
        });

        for i in 0..5 {
            let envelope = receiver.recv().await.unwrap();
            assert_eq!(envelope.event, Event::UnmuteTimerElapsed(TimerId(i)));
        }
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (sender, receiver) = channel();
        drop(receiver);

        assert!(sender.is_closed());
        assert!(!sender.send(Event::Shutdown).await);
    }

    #[tokio::test]
    async fn test_weak_sender_does_not_keep_queue_open() {
        let (sender, mut receiver) = channel();
        let weak = sender.downgrade();

        let upgraded = weak.upgrade().unwrap();
        assert!(upgraded.send(Event::UnmuteTimerElapsed(TimerId(3))).await);
        drop(upgraded);
        drop(sender);

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(envelope.event, Event::UnmuteTimerElapsed(TimerId(3)));
        assert!(receiver.recv().await.is_none());
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_weak_sender_shares_sequence() {
        let (sender, mut receiver) = channel();
        let weak = sender.downgrade();

        sender.send(Event::Shutdown).await;
        weak.upgrade().unwrap().send(Event::PlayerGone).await;

        assert_eq!(receiver.recv().await.unwrap().seq, 0);
        assert_eq!(receiver.recv().await.unwrap().seq, 1);
    }

    #[tokio::test]
    async fn test_recv_ends_when_senders_dropped() {
        let (sender, mut receiver) = channel();
        drop(sender);
        assert!(receiver.recv().await.is_none());
    }
}
