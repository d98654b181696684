//! Notification queue worker.
//!
//! Receives notices from an mpsc channel and persists them one at a time, in
//! the order they were committed.

use std::sync::Arc;
use std::time::Duration;

use onboarding_core::notifications::{NewNotification, NotificationServiceTrait};
use tokio::sync::mpsc;

/// Longest wait between two delivery attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Retry policy for failed deliveries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, doubling after every failure.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Runs the notification queue worker until every sender is dropped.
pub async fn notification_queue_worker(
    mut rx: mpsc::UnboundedReceiver<NewNotification>,
    service: Arc<dyn NotificationServiceTrait + Send + Sync>,
    policy: RetryPolicy,
) {
    tracing::info!("Notification delivery worker started");

    while let Some(notification) = rx.recv().await {
        deliver_with_retry(service.as_ref(), notification, policy).await;
    }

    tracing::info!("Notification delivery worker shutting down");
}

/// Persists one notice, retrying with backoff. Returns whether it was delivered.
pub(crate) async fn deliver_with_retry(
    service: &(dyn NotificationServiceTrait + Send + Sync),
    notification: NewNotification,
    policy: RetryPolicy,
) -> bool {
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match service.deliver(notification.clone()).await {
            Ok(delivered) => {
                tracing::debug!(
                    "Delivered notification {} to {} (attempt {})",
                    delivered.id,
                    delivered.recipient_id,
                    attempt
                );
                return true;
            }
            Err(e) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "Delivery to {} failed (attempt {}/{}), retrying in {:?}: {}",
                    notification.recipient_id,
                    attempt,
                    max_attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(
                    "Dropping notification '{}' for {} after {} attempts: {}",
                    notification.subject,
                    notification.recipient_id,
                    max_attempts,
                    e
                );
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use onboarding_core::notifications::{Notification, NotificationService};
    use onboarding_core::{Error, InMemoryStore, Result};

    /// Fails the first `failures` deliveries, then persists into an in-memory store.
    struct FlakyNotificationService {
        inner: NotificationService,
        failures: usize,
        attempts: AtomicUsize,
    }

    impl FlakyNotificationService {
        fn new(failures: usize) -> Self {
            Self {
                inner: NotificationService::new(Arc::new(InMemoryStore::new())),
                failures,
                attempts: AtomicUsize::new(0),
            }
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationServiceTrait for FlakyNotificationService {
        async fn deliver(&self, notification: NewNotification) -> Result<Notification> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                return Err(Error::Notification("store unavailable".to_string()));
            }
            self.inner.deliver(notification).await
        }

        fn list_notifications(
            &self,
            recipient_id: &str,
            unread_only: bool,
        ) -> Result<Vec<Notification>> {
            self.inner.list_notifications(recipient_id, unread_only)
        }

        async fn mark_read(&self, notification_id: &str) -> Result<Notification> {
            self.inner.mark_read(notification_id).await
        }
    }

    fn notice(subject: &str) -> NewNotification {
        NewNotification {
            recipient_id: "investor-1".to_string(),
            subject: subject.to_string(),
            body: "Body".to_string(),
            related_investment_id: Some("inv-1".to_string()),
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(40), MAX_RETRY_DELAY);
    }

    #[tokio::test]
    async fn test_retries_until_delivered() {
        let service = FlakyNotificationService::new(2);
        let delivered = deliver_with_retry(&service, notice("Sign"), fast_policy(5)).await;
        assert!(delivered);
        assert_eq!(service.attempts(), 3);
        assert_eq!(
            service.list_notifications("investor-1", false).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_drops_after_max_attempts() {
        let service = FlakyNotificationService::new(usize::MAX);
        let delivered = deliver_with_retry(&service, notice("Sign"), fast_policy(3)).await;
        assert!(!delivered);
        assert_eq!(service.attempts(), 3);
        assert!(service
            .list_notifications("investor-1", false)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_worker_drains_queue_in_order() {
        let service = Arc::new(FlakyNotificationService::new(1));
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(notice("First")).unwrap();
        tx.send(notice("Second")).unwrap();
        drop(tx);

        notification_queue_worker(rx, service.clone(), fast_policy(3)).await;

        let stored = service.list_notifications("investor-1", false).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].subject, "Second");
        assert_eq!(stored[1].subject, "First");
    }
}
