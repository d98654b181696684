use async_trait::async_trait;

use super::notifications_model::{NewNotification, Notification};
use crate::errors::Result;

/// Persistence contract for notification records.
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    async fn insert(&self, notification: NewNotification) -> Result<Notification>;

    /// Notifications for a recipient, newest first.
    fn list_for_recipient(&self, recipient_id: &str, unread_only: bool)
        -> Result<Vec<Notification>>;

    async fn mark_read(&self, notification_id: &str) -> Result<Notification>;
}

#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Persists a notification. Used by the delivery worker.
    async fn deliver(&self, notification: NewNotification) -> Result<Notification>;

    fn list_notifications(&self, recipient_id: &str, unread_only: bool)
        -> Result<Vec<Notification>>;

    async fn mark_read(&self, notification_id: &str) -> Result<Notification>;
}
