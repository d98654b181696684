use log::debug;
use std::sync::Arc;

use super::notifications_model::{NewNotification, Notification};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::errors::{Error, Result, ValidationError};

/// Service for notification records.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn deliver(&self, notification: NewNotification) -> Result<Notification> {
        if notification.recipient_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "recipientId".to_string(),
            )));
        }
        debug!(
            "Delivering notification '{}' to {}",
            notification.subject, notification.recipient_id
        );
        self.repository.insert(notification).await
    }

    fn list_notifications(
        &self,
        recipient_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        self.repository.list_for_recipient(recipient_id, unread_only)
    }

    async fn mark_read(&self, notification_id: &str) -> Result<Notification> {
        self.repository.mark_read(notification_id).await
    }
}
