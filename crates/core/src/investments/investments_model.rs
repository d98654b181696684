//! Investment domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::application_model::ApplicationStatus;
use crate::constants::MAX_ANNUAL_PERCENTAGE;
use crate::signatures::SignatureChange;
use crate::workflow::{awaiting_actor, required_next_action, ActorRole, InvestmentStatus};
use crate::{errors::ValidationError, Error, Result};

/// How often returns are paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
    AtMaturity,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::SemiAnnually => "semi_annually",
            PaymentFrequency::Annually => "annually",
            PaymentFrequency::AtMaturity => "at_maturity",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "semi_annually" => Ok(PaymentFrequency::SemiAnnually),
            "annually" => Ok(PaymentFrequency::Annually),
            "at_maturity" => Ok(PaymentFrequency::AtMaturity),
            _ => Err(format!("Unknown payment frequency: {}", s)),
        }
    }
}

/// Domain model representing an investment.
///
/// `status` is written only through a [`TransitionCommit`]. `version` is the
/// optimistic-concurrency token and increases on every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub application_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub annual_percentage: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub term_months: i32,
    pub status: InvestmentStatus,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new investment and its application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub user_id: String,
    pub amount: Decimal,
    pub annual_percentage: Decimal,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    pub term_months: i32,
}

impl NewInvestment {
    /// Validates the commercial terms.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        validate_terms(self.amount, self.annual_percentage, self.term_months)
    }
}

/// Input model for the admin "edit details" action.
///
/// Replaces the commercial terms; never touches `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDetailsUpdate {
    pub amount: Decimal,
    pub annual_percentage: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub term_months: i32,
}

impl InvestmentDetailsUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_terms(self.amount, self.annual_percentage, self.term_months)
    }
}

fn validate_terms(amount: Decimal, annual_percentage: Decimal, term_months: i32) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Amount must be greater than zero".to_string(),
        )));
    }
    if annual_percentage <= Decimal::ZERO || annual_percentage > MAX_ANNUAL_PERCENTAGE {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Annual percentage must be between 0 and 100".to_string(),
        )));
    }
    if term_months <= 0 {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Term must be at least one month".to_string(),
        )));
    }
    Ok(())
}

/// Filter for listing investments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentFilter {
    pub user_id: Option<String>,
    pub status: Option<InvestmentStatus>,
}

impl InvestmentFilter {
    pub fn matches(&self, investment: &Investment) -> bool {
        self.user_id
            .as_ref()
            .map_or(true, |user_id| &investment.user_id == user_id)
            && self.status.map_or(true, |status| investment.status == status)
    }
}

/// One logical workflow write: the investment status, the mirrored application
/// status and any signature changes, applied atomically.
///
/// The store rejects the commit with a conflict when the investment `version`
/// or the application status no longer match what the dispatcher loaded.
#[derive(Debug, Clone)]
pub struct TransitionCommit {
    pub investment_id: String,
    pub expected_version: i64,
    pub status: InvestmentStatus,
    pub application_id: String,
    pub expected_application_status: ApplicationStatus,
    pub application_status: ApplicationStatus,
    pub signature_changes: Vec<SignatureChange>,
    pub committed_at: NaiveDateTime,
}

/// Read model returned to callers: the investment plus labels derived from its status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub application_status: ApplicationStatus,
    /// Derived from status only; see [`awaiting_actor`] for the promissory note caveat.
    pub awaiting_actor: Option<ActorRole>,
    pub required_next_action: String,
}

impl InvestmentView {
    pub fn new(investment: Investment, application_status: ApplicationStatus) -> Self {
        let status = investment.status;
        Self {
            investment,
            application_status,
            awaiting_actor: awaiting_actor(status),
            required_next_action: required_next_action(status).to_string(),
        }
    }
}
