//! Signature repository and coordinator traits.

use async_trait::async_trait;

use super::signatures_model::{DocumentSignature, DocumentType, SignatureChange};
use crate::errors::Result;

/// Persistence contract for document signature records.
///
/// Implementations must apply every change of one `apply_changes` call in a
/// single transaction, honoring the conditional-write rules documented on
/// [`SignatureChange`].
#[async_trait]
pub trait SignatureRepositoryTrait: Send + Sync {
    /// Retrieves a record by its ID.
    fn find_by_id(&self, signature_id: &str) -> Result<Option<DocumentSignature>>;

    /// The record with the highest sequence for the key.
    fn latest_for(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<Option<DocumentSignature>>;

    /// Every record of the application, ordered by document type then sequence.
    fn list_for_application(&self, application_id: &str) -> Result<Vec<DocumentSignature>>;

    /// Applies the changes atomically and returns the written records.
    async fn apply_changes(&self, changes: Vec<SignatureChange>) -> Result<Vec<DocumentSignature>>;
}

/// The document signature coordinator.
#[async_trait]
pub trait SignatureServiceTrait: Send + Sync {
    /// Supersedes the live record for the key, if any, and creates a new one in `sent`.
    async fn create_or_replace(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<DocumentSignature>;

    /// `pending`/`sent` → `investor_signed`.
    async fn record_investor_signature(&self, signature_id: &str) -> Result<DocumentSignature>;

    /// `investor_signed` → `signed`.
    async fn record_admin_signature(&self, signature_id: &str) -> Result<DocumentSignature>;

    fn latest_for(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<Option<DocumentSignature>>;

    fn history(&self, application_id: &str) -> Result<Vec<DocumentSignature>>;
}
