//! Notification sink trait and implementations.
//!
//! Delivery is fire-and-forget: the engine logs failures and never lets
//! them fail a lead operation that already committed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A lead was assigned to the recipient.
    Assigned,
    /// A lead of the recipient's was converted into a project.
    Converted,
}

/// A fire-and-forget event for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Staff member to inform.
    pub recipient_id: String,
    pub kind: NotificationKind,
    /// The lead (assigned) or project (converted) the event refers to.
    pub reference_id: String,
}

/// Delivery failure reported by a sink.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Trait for delivering notifications.
///
/// Abstracted to support different transports (email, push, tests, etc.)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification to its recipient.
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// A no-op sink for testing that discards all notifications.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl NotificationSink for NoOpSink {
    async fn deliver(&self, _notification: Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// A logging sink for debugging that logs all deliveries.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            "Notifying {} of {:?} ({})",
            notification.recipient_id,
            notification.kind,
            notification.reference_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            recipient_id: "staff-1".to_string(),
            kind: NotificationKind::Assigned,
            reference_id: "lead-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpSink;

        // Should not error
        sink.deliver(sample()).await.unwrap();
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingSink;

        // Should not error
        sink.deliver(sample()).await.unwrap();
    }

    #[test]
    fn notification_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["recipient_id"], "staff-1");
        assert_eq!(json["kind"], "assigned");
        assert_eq!(json["reference_id"], "lead-1");
    }
}
