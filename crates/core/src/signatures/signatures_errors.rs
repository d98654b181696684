use thiserror::Error;

use super::signatures_model::SignatureStatus;
use crate::workflow::FailureKind;

/// Errors raised by the document signature coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("This document was already signed")]
    AlreadySigned {
        signature_id: String,
        status: SignatureStatus,
    },

    #[error("The investor has not signed this document yet")]
    NotYetInvestorSigned { signature_id: String },

    #[error("Document signature not found: {0}")]
    NotFound(String),

    #[error("Document '{signature_id}' was replaced by a newer version; reload and try again")]
    Superseded { signature_id: String },
}

impl SignatureError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SignatureError::AlreadySigned { .. } => FailureKind::AlreadySigned,
            SignatureError::NotYetInvestorSigned { .. } => FailureKind::NotYetInvestorSigned,
            SignatureError::NotFound(_) => FailureKind::NotFound,
            SignatureError::Superseded { .. } => FailureKind::Conflict,
        }
    }
}
