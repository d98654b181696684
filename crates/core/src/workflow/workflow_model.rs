//! Workflow domain models: lifecycle states, actors and actions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::signatures::DocumentType;

/// The party performing an action.
///
/// Always passed explicitly to the dispatcher; never inferred from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Investor,
    Admin,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Investor => "investor",
            ActorRole::Admin => "admin",
        }
    }

    /// The other party.
    pub fn counterparty(&self) -> ActorRole {
        match self {
            ActorRole::Investor => ActorRole::Admin,
            ActorRole::Admin => ActorRole::Investor,
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "investor" => Ok(ActorRole::Investor),
            "admin" => Ok(ActorRole::Admin),
            _ => Err(format!("Unknown actor role: {}", s)),
        }
    }
}

/// Lifecycle status of an investment.
///
/// Ordered from the initial state to the success terminal; `Cancelled` is the
/// failure terminal reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    #[default]
    Pending,
    PendingApproval,
    PromissoryNotePending,
    BankDetailsPending,
    FundsPending,
    PlaidPending,
    InvestorOnboardingComplete,
    Active,
    Cancelled,
}

impl InvestmentStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [InvestmentStatus; 9] = [
        InvestmentStatus::Pending,
        InvestmentStatus::PendingApproval,
        InvestmentStatus::PromissoryNotePending,
        InvestmentStatus::BankDetailsPending,
        InvestmentStatus::FundsPending,
        InvestmentStatus::PlaidPending,
        InvestmentStatus::InvestorOnboardingComplete,
        InvestmentStatus::Active,
        InvestmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Pending => "pending",
            InvestmentStatus::PendingApproval => "pending_approval",
            InvestmentStatus::PromissoryNotePending => "promissory_note_pending",
            InvestmentStatus::BankDetailsPending => "bank_details_pending",
            InvestmentStatus::FundsPending => "funds_pending",
            InvestmentStatus::PlaidPending => "plaid_pending",
            InvestmentStatus::InvestorOnboardingComplete => "investor_onboarding_complete",
            InvestmentStatus::Active => "active",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }

    /// `Active` and `Cancelled` accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvestmentStatus::Active | InvestmentStatus::Cancelled)
    }

    /// True while the admin has not yet approved the application.
    pub fn is_pre_approval(&self) -> bool {
        matches!(
            self,
            InvestmentStatus::Pending | InvestmentStatus::PendingApproval
        )
    }
}

impl std::fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvestmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InvestmentStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown investment status: {}", s))
    }
}

/// An action requested by one of the parties.
///
/// One case per row of the transition table. The action payload travels in
/// the variant, so an unknown action name fails at deserialization instead of
/// falling through to a default branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Investor signs the subscription agreement.
    #[serde(rename = "sign_subscription")]
    SignSubscription,
    /// Admin approves the application and sends the promissory note.
    SendPromissoryNote,
    /// Investor signs the promissory note.
    #[serde(rename = "sign_promissory_investor")]
    SignPromissoryInvestor,
    /// Admin countersigns the promissory note.
    #[serde(rename = "sign_promissory_admin")]
    SignPromissoryAdmin,
    /// Investor confirms the wire transfer details.
    ConfirmWireDetails,
    /// Admin confirms the funds were received.
    VerifyFunds,
    /// Investor links the bank account used for payouts.
    LinkBankAccount,
    /// Admin activates the investment.
    Activate,
    /// Admin declines the investment.
    Decline {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl WorkflowAction {
    /// One instance of every action, with empty payloads.
    pub fn all() -> Vec<WorkflowAction> {
        vec![
            WorkflowAction::SignSubscription,
            WorkflowAction::SendPromissoryNote,
            WorkflowAction::SignPromissoryInvestor,
            WorkflowAction::SignPromissoryAdmin,
            WorkflowAction::ConfirmWireDetails,
            WorkflowAction::VerifyFunds,
            WorkflowAction::LinkBankAccount,
            WorkflowAction::Activate,
            WorkflowAction::Decline { reason: None },
        ]
    }

    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowAction::SignSubscription => "sign_subscription",
            WorkflowAction::SendPromissoryNote => "send_promissory_note",
            WorkflowAction::SignPromissoryInvestor => "sign_promissory_investor",
            WorkflowAction::SignPromissoryAdmin => "sign_promissory_admin",
            WorkflowAction::ConfirmWireDetails => "confirm_wire_details",
            WorkflowAction::VerifyFunds => "verify_funds",
            WorkflowAction::LinkBankAccount => "link_bank_account",
            WorkflowAction::Activate => "activate",
            WorkflowAction::Decline { .. } => "decline",
        }
    }

    /// The only party allowed to perform this action.
    pub fn authorized_actor(&self) -> ActorRole {
        match self {
            WorkflowAction::SignSubscription
            | WorkflowAction::SignPromissoryInvestor
            | WorkflowAction::ConfirmWireDetails
            | WorkflowAction::LinkBankAccount => ActorRole::Investor,
            WorkflowAction::SendPromissoryNote
            | WorkflowAction::SignPromissoryAdmin
            | WorkflowAction::VerifyFunds
            | WorkflowAction::Activate
            | WorkflowAction::Decline { .. } => ActorRole::Admin,
        }
    }

    /// The document whose signature record this action touches, if any.
    pub fn document_type(&self) -> Option<DocumentType> {
        match self {
            WorkflowAction::SignSubscription => Some(DocumentType::SubscriptionAgreement),
            WorkflowAction::SendPromissoryNote
            | WorkflowAction::SignPromissoryInvestor
            | WorkflowAction::SignPromissoryAdmin => Some(DocumentType::PromissoryNote),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
