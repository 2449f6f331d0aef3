//! Notification collaborator
//!
//! Fire-and-forget publication of [`LedgerEvent`]s. The services publish only
//! after the store writes have committed, so downstream consumers never see
//! an event for a write that did not happen. Publication failure surfaces to
//! the caller as an internal error; the core does not retry.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::LedgerEvent;

/// Publication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("Event queue is full")]
    QueueFull,

    #[error("Event queue is closed")]
    QueueClosed,
}

/// Outbound event sink the core services publish to.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: LedgerEvent) -> Result<(), PublishError>;
}

/// Publisher backed by a bounded in-process queue.
///
/// `try_send` keeps the write path non-blocking: a consumer that falls behind
/// fails the publish instead of stalling transaction posting.
#[derive(Debug, Clone)]
pub struct QueuePublisher {
    sender: mpsc::Sender<LedgerEvent>,
}

impl QueuePublisher {
    /// Create a publisher and the receiving half of its queue.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<LedgerEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventPublisher for QueuePublisher {
    async fn publish(&self, event: LedgerEvent) -> Result<(), PublishError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PublishError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => PublishError::QueueClosed,
        })
    }
}

/// Drain the queue, logging each event. Stands in for a real downstream bus
/// in the server binary; runs until every publisher handle is dropped.
pub async fn log_events(mut receiver: mpsc::Receiver<LedgerEvent>) {
    while let Some(event) = receiver.recv().await {
        tracing::info!(
            event_type = event.event_type(),
            account_id = %event.account_id(),
            "ledger event published"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, Currency};

    fn sample_event() -> LedgerEvent {
        LedgerEvent::account_created(&Account::new("cust-1", "ACC-1", vec![Currency::Gbp]))
    }

    #[tokio::test]
    async fn test_publish_delivers_to_receiver() {
        let (publisher, mut receiver) = QueuePublisher::bounded(4);

        publisher.publish(sample_event()).await.unwrap();

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.event_type(), "AccountCreated");
    }

    #[tokio::test]
    async fn test_full_queue_fails_without_blocking() {
        let (publisher, _receiver) = QueuePublisher::bounded(1);

        publisher.publish(sample_event()).await.unwrap();
        let result = publisher.publish(sample_event()).await;
        assert_eq!(result, Err(PublishError::QueueFull));
    }

    #[tokio::test]
    async fn test_closed_queue_fails() {
        let (publisher, receiver) = QueuePublisher::bounded(1);
        drop(receiver);

        let result = publisher.publish(sample_event()).await;
        assert_eq!(result, Err(PublishError::QueueClosed));
    }
}
