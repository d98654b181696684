use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use onboarding_core::investments::InvestmentApplication;
use onboarding_core::signatures::DocumentSignature;

async fn delete_application(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InvestmentApplication>> {
    let application = state.investment_service.delete_application(&id).await?;
    Ok(Json(application))
}

async fn signature_history(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DocumentSignature>>> {
    // 404 for an unknown application instead of an empty history
    state.investment_service.get_application(&id)?;
    let history = state.signature_service.history(&id)?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/applications/{id}", delete(delete_application))
        .route("/applications/{id}/signatures", get(signature_history))
}
