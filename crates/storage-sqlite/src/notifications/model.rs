//! Database model for notifications.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use onboarding_core::notifications::Notification;

/// Database model for notifications
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NotificationDB {
    pub id: String,
    pub recipient_id: String,
    pub subject: String,
    pub body: String,
    pub related_investment_id: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        Self {
            id: db.id,
            recipient_id: db.recipient_id,
            subject: db.subject,
            body: db.body,
            related_investment_id: db.related_investment_id,
            is_read: db.is_read,
            created_at: db.created_at,
        }
    }
}

impl From<Notification> for NotificationDB {
    fn from(domain: Notification) -> Self {
        Self {
            id: domain.id,
            recipient_id: domain.recipient_id,
            subject: domain.subject,
            body: domain.body,
            related_investment_id: domain.related_investment_id,
            is_read: domain.is_read,
            created_at: domain.created_at,
        }
    }
}
