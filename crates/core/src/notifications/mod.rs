//! Notifications module.
//!
//! Notifications are the output of a committed transition. They are pushed
//! through a [`NotificationSink`] after the state write and are never read
//! back by the workflow.

mod notification_templates;
mod notifications_model;
mod notifications_service;
mod notifications_traits;
mod sink;

pub use notification_templates::notice_for_transition;
pub use notifications_model::{NewNotification, Notification};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
pub use sink::*;
