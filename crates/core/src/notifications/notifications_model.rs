//! Notification domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A persisted message to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub subject: String,
    pub body: String,
    pub related_investment_id: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

/// A message handed to the notification sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub recipient_id: String,
    pub subject: String,
    pub body: String,
    pub related_investment_id: Option<String>,
}
