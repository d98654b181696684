//! Notification sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::notifications_model::NewNotification;
use crate::errors::{Error, Result};

/// Trait for handing notifications to a delivery mechanism.
///
/// The dispatcher calls `send()` once per committed transition, after the
/// state write. An error is logged by the caller and never rolls back the
/// transition.
///
/// # Design Rules
///
/// - `send()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations should queue notifications and retry out of band
/// - `send()` returns an error only when the notification could not be queued
pub trait NotificationSink: Send + Sync {
    fn send(&self, notification: NewNotification) -> Result<()>;
}

/// No-op implementation for contexts that don't deliver notifications.
#[derive(Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn send(&self, _notification: NewNotification) -> Result<()> {
        Ok(())
    }
}

/// Mock sink for testing - collects sent notifications.
#[derive(Clone, Default)]
pub struct MockNotificationSink {
    sent: Arc<Mutex<Vec<NewNotification>>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected notifications.
    pub fn sent(&self) -> Vec<NewNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Clears collected notifications.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().unwrap().is_empty()
    }
}

impl NotificationSink for MockNotificationSink {
    fn send(&self, notification: NewNotification) -> Result<()> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// Sink that rejects every notification. Counts attempts.
#[derive(Clone, Default)]
pub struct FailingNotificationSink {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl NotificationSink for FailingNotificationSink {
    fn send(&self, _notification: NewNotification) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(Error::Notification("delivery unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(recipient: &str) -> NewNotification {
        NewNotification {
            recipient_id: recipient.to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
            related_investment_id: Some("inv-1".to_string()),
        }
    }

    #[test]
    fn test_noop_sink_accepts_everything() {
        let sink = NoOpNotificationSink;
        assert!(sink.send(notice("user-1")).is_ok());
    }

    #[test]
    fn test_mock_sink_collects_notifications() {
        let sink = MockNotificationSink::new();
        assert!(sink.is_empty());

        sink.send(notice("user-1")).unwrap();
        sink.send(notice("admin")).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.sent()[1].recipient_id, "admin");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_failing_sink_counts_attempts() {
        let sink = FailingNotificationSink::new();
        assert!(sink.send(notice("user-1")).is_err());
        assert!(sink.send(notice("user-1")).is_err());
        assert_eq!(sink.attempts(), 2);
    }
}
