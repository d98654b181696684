use chrono::{NaiveDateTime, Utc};
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::signatures_errors::SignatureError;
use super::signatures_model::{DocumentSignature, DocumentType, SignatureChange, SignatureStatus};
use super::signatures_traits::{SignatureRepositoryTrait, SignatureServiceTrait};
use crate::errors::{Error, Result};

/// Plans a new latest record for `(application_id, document_type)`.
///
/// The previous latest record, if any, is superseded by the store when the
/// change is applied.
pub fn plan_create_or_replace(
    application_id: &str,
    document_type: DocumentType,
    latest: Option<&DocumentSignature>,
    status: SignatureStatus,
    now: NaiveDateTime,
) -> SignatureChange {
    let signature = DocumentSignature {
        id: Uuid::new_v4().to_string(),
        application_id: application_id.to_string(),
        document_type,
        status,
        sequence: latest.map(|s| s.sequence + 1).unwrap_or(1),
        investor_signed_at: None,
        admin_signed_at: None,
        created_at: now,
        updated_at: now,
    };
    SignatureChange::Create {
        signature,
        supersedes: latest.map(|s| s.id.clone()),
    }
}

/// Plans the investor's signature on `signature`.
pub fn plan_investor_signature(
    signature: &DocumentSignature,
    now: NaiveDateTime,
) -> std::result::Result<SignatureChange, SignatureError> {
    match signature.status {
        SignatureStatus::Pending | SignatureStatus::Sent => Ok(SignatureChange::Advance {
            signature_id: signature.id.clone(),
            expected: signature.status,
            status: SignatureStatus::InvestorSigned,
            at: now,
        }),
        SignatureStatus::InvestorSigned | SignatureStatus::AdminSigned | SignatureStatus::Signed => {
            Err(SignatureError::AlreadySigned {
                signature_id: signature.id.clone(),
                status: signature.status,
            })
        }
        SignatureStatus::Superseded => Err(SignatureError::Superseded {
            signature_id: signature.id.clone(),
        }),
    }
}

/// Plans the admin countersignature on `signature`.
///
/// Never creates a record: a document the investor has not signed is refused.
pub fn plan_admin_signature(
    signature: &DocumentSignature,
    now: NaiveDateTime,
) -> std::result::Result<SignatureChange, SignatureError> {
    match signature.status {
        SignatureStatus::InvestorSigned => Ok(SignatureChange::Advance {
            signature_id: signature.id.clone(),
            expected: SignatureStatus::InvestorSigned,
            status: SignatureStatus::Signed,
            at: now,
        }),
        SignatureStatus::Pending | SignatureStatus::Sent => {
            Err(SignatureError::NotYetInvestorSigned {
                signature_id: signature.id.clone(),
            })
        }
        SignatureStatus::AdminSigned | SignatureStatus::Signed => {
            Err(SignatureError::AlreadySigned {
                signature_id: signature.id.clone(),
                status: signature.status,
            })
        }
        SignatureStatus::Superseded => Err(SignatureError::Superseded {
            signature_id: signature.id.clone(),
        }),
    }
}

/// Document signature coordinator backed by a signature repository.
pub struct SignatureService {
    repository: Arc<dyn SignatureRepositoryTrait>,
}

impl SignatureService {
    pub fn new(repository: Arc<dyn SignatureRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn load(&self, signature_id: &str) -> Result<DocumentSignature> {
        self.repository
            .find_by_id(signature_id)?
            .ok_or_else(|| SignatureError::NotFound(signature_id.to_string()).into())
    }

    async fn apply_one(&self, change: SignatureChange) -> Result<DocumentSignature> {
        let id = change.signature_id().to_string();
        self.repository
            .apply_changes(vec![change])
            .await?
            .pop()
            .ok_or_else(|| Error::Unexpected(format!("No record written for signature {}", id)))
    }
}

#[async_trait::async_trait]
impl SignatureServiceTrait for SignatureService {
    async fn create_or_replace(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<DocumentSignature> {
        // Always resolve the latest record first so the store can reject a
        // concurrent replace of the same key.
        let latest = self.repository.latest_for(application_id, document_type)?;
        debug!(
            "Creating {} for application {} (superseding {:?})",
            document_type,
            application_id,
            latest.as_ref().map(|s| s.id.as_str())
        );
        let change = plan_create_or_replace(
            application_id,
            document_type,
            latest.as_ref(),
            SignatureStatus::Sent,
            Utc::now().naive_utc(),
        );
        self.apply_one(change).await
    }

    async fn record_investor_signature(&self, signature_id: &str) -> Result<DocumentSignature> {
        let signature = self.load(signature_id)?;
        let change = plan_investor_signature(&signature, Utc::now().naive_utc())?;
        debug!("Recording investor signature on {}", signature_id);
        self.apply_one(change).await
    }

    async fn record_admin_signature(&self, signature_id: &str) -> Result<DocumentSignature> {
        let signature = self.load(signature_id)?;
        let change = plan_admin_signature(&signature, Utc::now().naive_utc())?;
        debug!("Recording admin countersignature on {}", signature_id);
        self.apply_one(change).await
    }

    fn latest_for(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<Option<DocumentSignature>> {
        self.repository.latest_for(application_id, document_type)
    }

    fn history(&self, application_id: &str) -> Result<Vec<DocumentSignature>> {
        self.repository.list_for_application(application_id)
    }
}
