use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use onboarding_core::notifications::Notification;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationQuery {
    recipient_id: Option<String>,
    #[serde(default)]
    unread_only: bool,
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NotificationQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Notification>>> {
    let Query(query) = query?;
    let recipient_id = query
        .recipient_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("recipientId is required".to_string()))?;
    let notifications = state
        .notification_service
        .list_notifications(&recipient_id, query.unread_only)?;
    Ok(Json(notifications))
}

async fn mark_read(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Notification>> {
    let notification = state.notification_service.mark_read(&id).await?;
    Ok(Json(notification))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", put(mark_read))
}
