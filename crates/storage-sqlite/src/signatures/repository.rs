use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use onboarding_core::signatures::{
    DocumentSignature, DocumentType, SignatureChange, SignatureError, SignatureRepositoryTrait,
    SignatureStatus,
};
use onboarding_core::workflow::WorkflowError;
use onboarding_core::{Error, Result};

use super::model::DocumentSignatureDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::document_signatures;

pub struct SignatureRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SignatureRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        SignatureRepository { pool, writer }
    }
}

fn to_domain(row: DocumentSignatureDB) -> Result<DocumentSignature> {
    DocumentSignature::try_from(row).map_err(Error::from)
}

fn load_signature(
    conn: &mut SqliteConnection,
    signature_id: &str,
) -> Result<Option<DocumentSignature>> {
    document_signatures::table
        .find(signature_id)
        .select(DocumentSignatureDB::as_select())
        .first::<DocumentSignatureDB>(conn)
        .optional()
        .into_core()?
        .map(to_domain)
        .transpose()
}

fn load_latest(
    conn: &mut SqliteConnection,
    application_id: &str,
    document_type: DocumentType,
) -> Result<Option<DocumentSignature>> {
    document_signatures::table
        .filter(document_signatures::application_id.eq(application_id))
        .filter(document_signatures::document_type.eq(document_type.as_str()))
        .order(document_signatures::sequence.desc())
        .select(DocumentSignatureDB::as_select())
        .first::<DocumentSignatureDB>(conn)
        .optional()
        .into_core()?
        .map(to_domain)
        .transpose()
}

/// Applies signature changes on `conn` with conditional writes.
///
/// Must run inside the caller's transaction; the first failing change aborts
/// the whole batch.
pub fn apply_signature_changes(
    conn: &mut SqliteConnection,
    changes: Vec<SignatureChange>,
) -> Result<Vec<DocumentSignature>> {
    let mut written = Vec::with_capacity(changes.len());

    for change in changes {
        match change {
            SignatureChange::Create {
                signature,
                supersedes,
            } => {
                let latest = load_latest(conn, &signature.application_id, signature.document_type)?;
                match (supersedes.as_deref(), latest) {
                    (None, None) => {}
                    (Some(expected), Some(latest)) if latest.id == expected => {
                        if !latest.status.is_terminal() {
                            diesel::update(
                                document_signatures::table
                                    .filter(document_signatures::id.eq(&latest.id))
                                    .filter(document_signatures::status.eq(latest.status.as_str())),
                            )
                            .set((
                                document_signatures::status
                                    .eq(SignatureStatus::Superseded.as_str()),
                                document_signatures::updated_at.eq(signature.created_at),
                            ))
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        }
                    }
                    (_, latest) => {
                        return Err(WorkflowError::Conflict(format!(
                            "{} of application {} was replaced (latest is {:?})",
                            signature.document_type,
                            signature.application_id,
                            latest.map(|s| s.id)
                        ))
                        .into())
                    }
                }

                diesel::insert_into(document_signatures::table)
                    .values(DocumentSignatureDB::from(&signature))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                written.push(signature);
            }
            SignatureChange::Advance {
                signature_id,
                expected,
                status,
                at,
            } => {
                let target = document_signatures::table
                    .filter(document_signatures::id.eq(&signature_id))
                    .filter(document_signatures::status.eq(expected.as_str()));
                let updated = match status {
                    SignatureStatus::InvestorSigned => diesel::update(target)
                        .set((
                            document_signatures::status.eq(status.as_str()),
                            document_signatures::investor_signed_at.eq(Some(at)),
                            document_signatures::updated_at.eq(at),
                        ))
                        .execute(conn),
                    SignatureStatus::Signed | SignatureStatus::AdminSigned => diesel::update(target)
                        .set((
                            document_signatures::status.eq(status.as_str()),
                            document_signatures::admin_signed_at.eq(Some(at)),
                            document_signatures::updated_at.eq(at),
                        ))
                        .execute(conn),
                    _ => diesel::update(target)
                        .set((
                            document_signatures::status.eq(status.as_str()),
                            document_signatures::updated_at.eq(at),
                        ))
                        .execute(conn),
                }
                .map_err(StorageError::from)?;

                let current = load_signature(conn, &signature_id)?
                    .ok_or_else(|| SignatureError::NotFound(signature_id.clone()))?;
                if updated == 0 {
                    return Err(WorkflowError::Conflict(format!(
                        "signature {} is {} (expected {})",
                        signature_id, current.status, expected
                    ))
                    .into());
                }
                written.push(current);
            }
        }
    }

    Ok(written)
}

#[async_trait]
impl SignatureRepositoryTrait for SignatureRepository {
    fn find_by_id(&self, signature_id: &str) -> Result<Option<DocumentSignature>> {
        let mut conn = get_connection(&self.pool)?;
        load_signature(&mut conn, signature_id)
    }

    fn latest_for(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<Option<DocumentSignature>> {
        let mut conn = get_connection(&self.pool)?;
        load_latest(&mut conn, application_id, document_type)
    }

    fn list_for_application(&self, application_id: &str) -> Result<Vec<DocumentSignature>> {
        let mut conn = get_connection(&self.pool)?;
        document_signatures::table
            .filter(document_signatures::application_id.eq(application_id))
            .order((
                document_signatures::document_type.asc(),
                document_signatures::sequence.asc(),
            ))
            .select(DocumentSignatureDB::as_select())
            .load::<DocumentSignatureDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn apply_changes(&self, changes: Vec<SignatureChange>) -> Result<Vec<DocumentSignature>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<DocumentSignature>> {
                apply_signature_changes(conn, changes)
            })
            .await
    }
}
