//! Queue-backed notification sink.

use std::sync::{Arc, Mutex};

use onboarding_core::notifications::{NewNotification, NotificationServiceTrait, NotificationSink};
use onboarding_core::{Error, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::queue_worker::{notification_queue_worker, RetryPolicy};

/// Notification sink that enqueues notices for the delivery worker.
///
/// `send` never blocks and never touches the database. Notices sent before
/// [`start_worker`](Self::start_worker) are buffered in the channel.
pub struct QueuedNotificationSink {
    tx: mpsc::UnboundedSender<NewNotification>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<NewNotification>>>,
}

impl QueuedNotificationSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Spawns the delivery worker.
    ///
    /// Returns `None` if the worker was already started.
    pub fn start_worker(
        &self,
        notification_service: Arc<dyn NotificationServiceTrait + Send + Sync>,
        policy: RetryPolicy,
    ) -> Option<JoinHandle<()>> {
        let rx = self.rx.lock().ok().and_then(|mut slot| slot.take());
        match rx {
            Some(rx) => Some(tokio::spawn(notification_queue_worker(
                rx,
                notification_service,
                policy,
            ))),
            None => {
                tracing::warn!("Notification delivery worker is already running");
                None
            }
        }
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<NewNotification>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for QueuedNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for QueuedNotificationSink {
    fn send(&self, notification: NewNotification) -> Result<()> {
        self.tx
            .send(notification)
            .map_err(|e| Error::Notification(format!("notification queue is closed: {}", e)))
    }
}
