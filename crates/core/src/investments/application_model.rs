//! Investment application domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::investments_model::PaymentFrequency;
use crate::workflow::InvestmentStatus;

/// Status of an application. Mirrors the investment status during onboarding;
/// `deleted`, `rejected` and `active` are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    PendingApproval,
    PromissoryNotePending,
    BankDetailsPending,
    FundsPending,
    PlaidPending,
    InvestorOnboardingComplete,
    Active,
    Deleted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 10] = [
        ApplicationStatus::Pending,
        ApplicationStatus::PendingApproval,
        ApplicationStatus::PromissoryNotePending,
        ApplicationStatus::BankDetailsPending,
        ApplicationStatus::FundsPending,
        ApplicationStatus::PlaidPending,
        ApplicationStatus::InvestorOnboardingComplete,
        ApplicationStatus::Active,
        ApplicationStatus::Deleted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::PendingApproval => "pending_approval",
            ApplicationStatus::PromissoryNotePending => "promissory_note_pending",
            ApplicationStatus::BankDetailsPending => "bank_details_pending",
            ApplicationStatus::FundsPending => "funds_pending",
            ApplicationStatus::PlaidPending => "plaid_pending",
            ApplicationStatus::InvestorOnboardingComplete => "investor_onboarding_complete",
            ApplicationStatus::Active => "active",
            ApplicationStatus::Deleted => "deleted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Active | ApplicationStatus::Deleted | ApplicationStatus::Rejected
        )
    }

    /// The application status that accompanies an investment moving from
    /// `previous` to `next`.
    ///
    /// A decline before the admin approved the application rejects it; a
    /// later decline deletes it.
    pub fn mirror(previous: InvestmentStatus, next: InvestmentStatus) -> Self {
        match next {
            InvestmentStatus::Pending => ApplicationStatus::Pending,
            InvestmentStatus::PendingApproval => ApplicationStatus::PendingApproval,
            InvestmentStatus::PromissoryNotePending => ApplicationStatus::PromissoryNotePending,
            InvestmentStatus::BankDetailsPending => ApplicationStatus::BankDetailsPending,
            InvestmentStatus::FundsPending => ApplicationStatus::FundsPending,
            InvestmentStatus::PlaidPending => ApplicationStatus::PlaidPending,
            InvestmentStatus::InvestorOnboardingComplete => {
                ApplicationStatus::InvestorOnboardingComplete
            }
            InvestmentStatus::Active => ApplicationStatus::Active,
            InvestmentStatus::Cancelled if previous.is_pre_approval() => ApplicationStatus::Rejected,
            InvestmentStatus::Cancelled => ApplicationStatus::Deleted,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown application status: {}", s))
    }
}

/// The application an investment was created from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentApplication {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub annual_percentage: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub term_months: i32,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
