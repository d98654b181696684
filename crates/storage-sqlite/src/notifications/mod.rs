//! SQLite storage implementation for notifications.

mod model;
mod repository;

pub use model::NotificationDB;
pub use repository::NotificationRepository;
