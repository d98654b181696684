use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use onboarding_core::errors::{DatabaseError, Error as CoreError};
use onboarding_core::FailureKind;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    kind: &'static str,
    message: String,
}

fn status_for_kind(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::WrongActor => StatusCode::FORBIDDEN,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Conflict => StatusCode::CONFLICT,
        FailureKind::InvalidTransition
        | FailureKind::AlreadyTerminal
        | FailureKind::AlreadySigned
        | FailureKind::NotYetInvestorSigned => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Workflow(w) => {
                    let kind = w.kind();
                    (status_for_kind(kind), kind.as_str())
                }
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation"),
                CoreError::Database(DatabaseError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, FailureKind::NotFound.as_str())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Validation"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            kind,
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use onboarding_core::errors::ValidationError;
    use onboarding_core::signatures::{SignatureError, SignatureStatus};
    use onboarding_core::workflow::{ActorRole, TransitionRejection, WorkflowError};
    use onboarding_core::InvestmentStatus;

    fn status_of(err: impl Into<CoreError>) -> (StatusCode, &'static str) {
        ApiError::Core(err.into()).status_and_kind()
    }

    #[test]
    fn test_policy_failures_map_to_statuses() {
        assert_eq!(
            status_of(TransitionRejection::WrongActor {
                action: "activate",
                expected: ActorRole::Admin,
                actual: ActorRole::Investor,
            }),
            (StatusCode::FORBIDDEN, "WrongActor")
        );
        assert_eq!(
            status_of(WorkflowError::investment_not_found("inv-1")),
            (StatusCode::NOT_FOUND, "NotFound")
        );
        assert_eq!(
            status_of(WorkflowError::Conflict("stale".to_string())),
            (StatusCode::CONFLICT, "Conflict")
        );
        assert_eq!(
            status_of(TransitionRejection::AlreadyTerminal {
                status: InvestmentStatus::Active
            }),
            (StatusCode::UNPROCESSABLE_ENTITY, "AlreadyTerminal")
        );
        assert_eq!(
            status_of(SignatureError::AlreadySigned {
                signature_id: "sig-1".to_string(),
                status: SignatureStatus::Signed,
            }),
            (StatusCode::UNPROCESSABLE_ENTITY, "AlreadySigned")
        );
    }

    #[test]
    fn test_validation_and_infrastructure_errors() {
        assert_eq!(
            status_of(CoreError::Validation(ValidationError::MissingField(
                "userId".to_string()
            ))),
            (StatusCode::BAD_REQUEST, "Validation")
        );
        assert_eq!(
            status_of(CoreError::Unexpected("boom".to_string())),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal")
        );
        assert_eq!(
            status_of(CoreError::Database(DatabaseError::NotFound(
                "notification n-1".to_string()
            ))),
            (StatusCode::NOT_FOUND, "NotFound")
        );
    }
}
