//! Document signature domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two documents signed during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    SubscriptionAgreement,
    PromissoryNote,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::SubscriptionAgreement => "subscription_agreement",
            DocumentType::PromissoryNote => "promissory_note",
        }
    }

    /// Display name used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::SubscriptionAgreement => "subscription agreement",
            DocumentType::PromissoryNote => "promissory note",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "subscription_agreement" => Ok(DocumentType::SubscriptionAgreement),
            "promissory_note" => Ok(DocumentType::PromissoryNote),
            _ => Err(format!("Unknown document type: {}", s)),
        }
    }
}

/// Progress of one signature record.
///
/// `pending`/`sent` → `investor_signed` → `signed`. `admin_signed` is read as
/// an equivalent completed status. `superseded` marks a record replaced by a
/// newer one for the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    Pending,
    Sent,
    InvestorSigned,
    AdminSigned,
    Signed,
    Superseded,
}

impl SignatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureStatus::Pending => "pending",
            SignatureStatus::Sent => "sent",
            SignatureStatus::InvestorSigned => "investor_signed",
            SignatureStatus::AdminSigned => "admin_signed",
            SignatureStatus::Signed => "signed",
            SignatureStatus::Superseded => "superseded",
        }
    }

    /// Terminal records are never advanced again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SignatureStatus::AdminSigned | SignatureStatus::Signed | SignatureStatus::Superseded
        )
    }

    /// Waiting for the investor's signature.
    pub fn awaits_investor(&self) -> bool {
        matches!(self, SignatureStatus::Pending | SignatureStatus::Sent)
    }

    /// Both parties have signed.
    pub fn is_complete(&self) -> bool {
        matches!(self, SignatureStatus::AdminSigned | SignatureStatus::Signed)
    }
}

impl std::fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SignatureStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SignatureStatus::Pending),
            "sent" => Ok(SignatureStatus::Sent),
            "investor_signed" => Ok(SignatureStatus::InvestorSigned),
            "admin_signed" => Ok(SignatureStatus::AdminSigned),
            "signed" => Ok(SignatureStatus::Signed),
            "superseded" => Ok(SignatureStatus::Superseded),
            _ => Err(format!("Unknown signature status: {}", s)),
        }
    }
}

/// A tracked signing record for one document of one application.
///
/// Records are append-only per `(application_id, document_type)`; the record
/// with the highest `sequence` is the latest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSignature {
    pub id: String,
    pub application_id: String,
    pub document_type: DocumentType,
    pub status: SignatureStatus,
    pub sequence: i64,
    pub investor_signed_at: Option<NaiveDateTime>,
    pub admin_signed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A validated signature mutation, applied by the store with a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureChange {
    /// Insert a new latest record. `supersedes` names the record that must
    /// still be the latest for the key; it moves to `superseded` if it is not
    /// terminal yet. `None` requires that no record exists for the key.
    Create {
        signature: DocumentSignature,
        supersedes: Option<String>,
    },
    /// Move a record from `expected` to `status`. Fails with a conflict if the
    /// stored status is no longer `expected`.
    Advance {
        signature_id: String,
        expected: SignatureStatus,
        status: SignatureStatus,
        at: NaiveDateTime,
    },
}

impl SignatureChange {
    /// The record id this change writes.
    pub fn signature_id(&self) -> &str {
        match self {
            SignatureChange::Create { signature, .. } => &signature.id,
            SignatureChange::Advance { signature_id, .. } => signature_id,
        }
    }

    /// The record a `Create` inserts.
    pub fn created(&self) -> Option<&DocumentSignature> {
        match self {
            SignatureChange::Create { signature, .. } => Some(signature),
            SignatureChange::Advance { .. } => None,
        }
    }
}
