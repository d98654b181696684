use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use onboarding_core::investments::{
    Investment, InvestmentDetailsUpdate, InvestmentFilter, InvestmentView, NewInvestment,
};
use onboarding_core::{ActorRole, DispatchOutcome, WorkflowAction};
use serde::Deserialize;

/// Body of `POST /investments/{id}/actions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub actor_role: ActorRole,
    pub action: WorkflowAction,
}

async fn create_investment(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewInvestment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InvestmentView>)> {
    let Json(new_investment) = body?;
    let view = state
        .investment_service
        .create_investment(new_investment)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_investments(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<InvestmentFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Investment>>> {
    let Query(filter) = filter?;
    let investments = state.investment_service.list_investments(&filter)?;
    Ok(Json(investments))
}

async fn get_investment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InvestmentView>> {
    let view = state.investment_service.get_investment_view(&id)?;
    Ok(Json(view))
}

async fn update_details(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<InvestmentDetailsUpdate>, JsonRejection>,
) -> ApiResult<Json<InvestmentView>> {
    let Json(update) = body?;
    let view = state.investment_service.update_details(&id, update).await?;
    Ok(Json(view))
}

async fn dispatch_action(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> ApiResult<Json<DispatchOutcome>> {
    let Json(request) = body?;
    let outcome = state
        .dispatcher
        .dispatch(&id, request.actor_role, request.action)
        .await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/investments", get(list_investments).post(create_investment))
        .route("/investments/{id}", get(get_investment))
        .route("/investments/{id}/details", put(update_details))
        .route("/investments/{id}/actions", post(dispatch_action))
}
