//! Out-of-band notification delivery for the web server.
//!
//! The dispatcher hands each notice to [`QueuedNotificationSink`], which only
//! enqueues it. A background worker persists queued notices through the
//! notification service, retrying failures with exponential backoff and
//! dropping a notice once it has used up its attempts.

mod queue_worker;
mod sink;

pub use queue_worker::{notification_queue_worker, RetryPolicy};
pub use sink::QueuedNotificationSink;
