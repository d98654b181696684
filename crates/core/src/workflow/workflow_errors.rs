//! Typed workflow failures.
//!
//! Every rejected dispatch maps to one [`FailureKind`] so callers can render an
//! actionable message without inspecting strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::workflow_model::{ActorRole, InvestmentStatus};
use crate::investments::ApplicationStatus;
use crate::signatures::SignatureError;

/// Machine-readable failure category returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    WrongActor,
    InvalidTransition,
    AlreadyTerminal,
    AlreadySigned,
    NotYetInvestorSigned,
    NotFound,
    Conflict,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::WrongActor => "WrongActor",
            FailureKind::InvalidTransition => "InvalidTransition",
            FailureKind::AlreadyTerminal => "AlreadyTerminal",
            FailureKind::AlreadySigned => "AlreadySigned",
            FailureKind::NotYetInvestorSigned => "NotYetInvestorSigned",
            FailureKind::NotFound => "NotFound",
            FailureKind::Conflict => "Conflict",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reasons the state machine refuses a transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionRejection {
    #[error("Only the {expected} can perform this step")]
    WrongActor {
        action: &'static str,
        expected: ActorRole,
        actual: ActorRole,
    },

    #[error("Action '{action}' is not available while the investment is {status}")]
    InvalidTransition {
        action: &'static str,
        status: InvestmentStatus,
    },

    #[error("This investment is already {status}; no further actions are possible")]
    AlreadyTerminal { status: InvestmentStatus },
}

impl TransitionRejection {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransitionRejection::WrongActor { .. } => FailureKind::WrongActor,
            TransitionRejection::InvalidTransition { .. } => FailureKind::InvalidTransition,
            TransitionRejection::AlreadyTerminal { .. } => FailureKind::AlreadyTerminal,
        }
    }
}

/// Policy and conflict failures raised while dispatching an action.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Transition(#[from] TransitionRejection),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("{entity} '{id}' was not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Application '{application_id}' is already {status}; no further actions are possible")]
    ApplicationClosed {
        application_id: String,
        status: ApplicationStatus,
    },

    #[error("The record was changed by another request ({0}); reload and try again")]
    Conflict(String),
}

impl WorkflowError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WorkflowError::Transition(rejection) => rejection.kind(),
            WorkflowError::Signature(err) => err.kind(),
            WorkflowError::NotFound { .. } => FailureKind::NotFound,
            WorkflowError::ApplicationClosed { .. } => FailureKind::AlreadyTerminal,
            WorkflowError::Conflict(_) => FailureKind::Conflict,
        }
    }

    pub fn investment_not_found(id: &str) -> Self {
        WorkflowError::NotFound {
            entity: "Investment",
            id: id.to_string(),
        }
    }

    pub fn application_not_found(id: &str) -> Self {
        WorkflowError::NotFound {
            entity: "Application",
            id: id.to_string(),
        }
    }
}
