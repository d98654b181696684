//! Database models for investments and their applications.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use onboarding_core::investments::{Investment, InvestmentApplication};

use crate::errors::StorageError;
use crate::utils::{decode_decimal, decode_enum};

/// Database model for investments
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
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentDB {
    pub id: String,
    pub application_id: String,
    pub user_id: String,
    pub amount: String,
    pub annual_percentage: String,
    pub payment_frequency: String,
    pub term_months: i32,
    pub status: String,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for investment applications
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
#[diesel(table_name = crate::schema::investment_applications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentApplicationDB {
    pub id: String,
    pub user_id: String,
    pub amount: String,
    pub annual_percentage: String,
    pub payment_frequency: String,
    pub term_months: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Commercial terms written by "edit details".
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::investments)]
pub struct InvestmentTermsDB {
    pub amount: String,
    pub annual_percentage: String,
    pub payment_frequency: String,
    pub term_months: i32,
    pub updated_at: NaiveDateTime,
}

/// Same terms, for the application row.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::investment_applications)]
pub struct ApplicationTermsDB {
    pub amount: String,
    pub annual_percentage: String,
    pub payment_frequency: String,
    pub term_months: i32,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<InvestmentDB> for Investment {
    type Error = StorageError;

    fn try_from(db: InvestmentDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: decode_decimal(&db.amount, "investments.amount")?,
            annual_percentage: decode_decimal(
                &db.annual_percentage,
                "investments.annual_percentage",
            )?,
            payment_frequency: decode_enum(&db.payment_frequency, "investments.payment_frequency")?,
            status: decode_enum(&db.status, "investments.status")?,
            id: db.id,
            application_id: db.application_id,
            user_id: db.user_id,
            term_months: db.term_months,
            version: db.version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&Investment> for InvestmentDB {
    fn from(domain: &Investment) -> Self {
        Self {
            id: domain.id.clone(),
            application_id: domain.application_id.clone(),
            user_id: domain.user_id.clone(),
            amount: domain.amount.to_string(),
            annual_percentage: domain.annual_percentage.to_string(),
            payment_frequency: domain.payment_frequency.as_str().to_string(),
            term_months: domain.term_months,
            status: domain.status.as_str().to_string(),
            version: domain.version,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl TryFrom<InvestmentApplicationDB> for InvestmentApplication {
    type Error = StorageError;

    fn try_from(db: InvestmentApplicationDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: decode_decimal(&db.amount, "investment_applications.amount")?,
            annual_percentage: decode_decimal(
                &db.annual_percentage,
                "investment_applications.annual_percentage",
            )?,
            payment_frequency: decode_enum(
                &db.payment_frequency,
                "investment_applications.payment_frequency",
            )?,
            status: decode_enum(&db.status, "investment_applications.status")?,
            id: db.id,
            user_id: db.user_id,
            term_months: db.term_months,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&InvestmentApplication> for InvestmentApplicationDB {
    fn from(domain: &InvestmentApplication) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            amount: domain.amount.to_string(),
            annual_percentage: domain.annual_percentage.to_string(),
            payment_frequency: domain.payment_frequency.as_str().to_string(),
            term_months: domain.term_months,
            status: domain.status.as_str().to_string(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
