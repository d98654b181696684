use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use onboarding_core::errors::DatabaseError;
use onboarding_core::notifications::{NewNotification, Notification, NotificationRepositoryTrait};
use onboarding_core::Result;

use super::model::NotificationDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::notifications;

pub struct NotificationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        NotificationRepository { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    async fn insert(&self, notification: NewNotification) -> Result<Notification> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Notification> {
                let row = NotificationDB {
                    id: Uuid::now_v7().to_string(),
                    recipient_id: notification.recipient_id,
                    subject: notification.subject,
                    body: notification.body,
                    related_investment_id: notification.related_investment_id,
                    is_read: false,
                    created_at: Utc::now().naive_utc(),
                };
                let stored = diesel::insert_into(notifications::table)
                    .values(&row)
                    .returning(NotificationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Notification::from(stored))
            })
            .await
    }

    fn list_for_recipient(
        &self,
        recipient_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = notifications::table
            .filter(notifications::recipient_id.eq(recipient_id.to_string()))
            .select(NotificationDB::as_select())
            .into_boxed();
        if unread_only {
            query = query.filter(notifications::is_read.eq(false));
        }
        let rows = query
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .load::<NotificationDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, notification_id: &str) -> Result<Notification> {
        let notification_id = notification_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Notification> {
                diesel::update(notifications::table.find(&notification_id))
                    .set(notifications::is_read.eq(true))
                    .returning(NotificationDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .map(Notification::from)
                    .ok_or_else(|| {
                        DatabaseError::NotFound(format!("notification {}", notification_id)).into()
                    })
            })
            .await
    }
}
