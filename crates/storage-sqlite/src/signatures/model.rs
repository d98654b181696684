//! Database model for document signatures.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use onboarding_core::signatures::DocumentSignature;

use crate::errors::StorageError;
use crate::utils::decode_enum;

/// Database model for document signatures
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::document_signatures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentSignatureDB {
    pub id: String,
    pub application_id: String,
    pub document_type: String,
    pub status: String,
    pub sequence: i64,
    pub investor_signed_at: Option<NaiveDateTime>,
    pub admin_signed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<DocumentSignatureDB> for DocumentSignature {
    type Error = StorageError;

    fn try_from(db: DocumentSignatureDB) -> Result<Self, Self::Error> {
        Ok(Self {
            document_type: decode_enum(&db.document_type, "document_signatures.document_type")?,
            status: decode_enum(&db.status, "document_signatures.status")?,
            id: db.id,
            application_id: db.application_id,
            sequence: db.sequence,
            investor_signed_at: db.investor_signed_at,
            admin_signed_at: db.admin_signed_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&DocumentSignature> for DocumentSignatureDB {
    fn from(domain: &DocumentSignature) -> Self {
        Self {
            id: domain.id.clone(),
            application_id: domain.application_id.clone(),
            document_type: domain.document_type.as_str().to_string(),
            status: domain.status.as_str().to_string(),
            sequence: domain.sequence,
            investor_signed_at: domain.investor_signed_at,
            admin_signed_at: domain.admin_signed_at,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
