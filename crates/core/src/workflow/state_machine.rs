//! The investment lifecycle state machine.
//!
//! Pure functions only: no store, no clock, no notifications. The dispatcher
//! performs every side effect after [`transition`] has accepted an action.

use super::workflow_errors::TransitionRejection;
use super::workflow_model::{ActorRole, InvestmentStatus, WorkflowAction};

/// Looks up the next status for `action` taken by `actor` from `current`.
///
/// Checks run in a fixed order: terminal states reject everything, then the
/// actor must match the action's authorized party, then the `(state, action)`
/// pair must be in the table.
pub fn transition(
    current: InvestmentStatus,
    action: &WorkflowAction,
    actor: ActorRole,
) -> Result<InvestmentStatus, TransitionRejection> {
    if current.is_terminal() {
        return Err(TransitionRejection::AlreadyTerminal { status: current });
    }

    let expected = action.authorized_actor();
    if actor != expected {
        return Err(TransitionRejection::WrongActor {
            action: action.name(),
            expected,
            actual: actor,
        });
    }

    next_status(current, action).ok_or(TransitionRejection::InvalidTransition {
        action: action.name(),
        status: current,
    })
}

fn next_status(current: InvestmentStatus, action: &WorkflowAction) -> Option<InvestmentStatus> {
    use InvestmentStatus::*;

    match (current, action) {
        (_, WorkflowAction::Decline { .. }) => Some(Cancelled),
        (Pending, WorkflowAction::SignSubscription) => Some(PendingApproval),
        (PendingApproval, WorkflowAction::SendPromissoryNote) => Some(PromissoryNotePending),
        // The investor's signature only advances the document; the investment
        // waits for the admin countersignature.
        (PromissoryNotePending, WorkflowAction::SignPromissoryInvestor) => {
            Some(PromissoryNotePending)
        }
        (PromissoryNotePending, WorkflowAction::SignPromissoryAdmin) => Some(BankDetailsPending),
        (BankDetailsPending, WorkflowAction::ConfirmWireDetails) => Some(FundsPending),
        (FundsPending, WorkflowAction::VerifyFunds) => Some(PlaidPending),
        (PlaidPending, WorkflowAction::LinkBankAccount) => Some(InvestorOnboardingComplete),
        (InvestorOnboardingComplete, WorkflowAction::Activate) => Some(Active),
        _ => None,
    }
}

/// Actions `actor` may legally take from `status`.
///
/// `Decline` is listed with an empty reason.
pub fn available_actions(status: InvestmentStatus, actor: ActorRole) -> Vec<WorkflowAction> {
    WorkflowAction::all()
        .into_iter()
        .filter(|action| transition(status, action, actor).is_ok())
        .collect()
}

/// The party whose move it is, or `None` once the investment is terminal.
///
/// This is a function of status alone, so it is coarse in
/// `PromissoryNotePending`: it keeps reporting the investor after the investor
/// has signed. The admin countersign is due once the note's latest signature
/// (`SignatureServiceTrait::latest_for`) is `investor_signed`.
pub fn awaiting_actor(status: InvestmentStatus) -> Option<ActorRole> {
    match status {
        InvestmentStatus::Pending
        | InvestmentStatus::PromissoryNotePending
        | InvestmentStatus::BankDetailsPending
        | InvestmentStatus::PlaidPending => Some(ActorRole::Investor),
        InvestmentStatus::PendingApproval
        | InvestmentStatus::FundsPending
        | InvestmentStatus::InvestorOnboardingComplete => Some(ActorRole::Admin),
        InvestmentStatus::Active | InvestmentStatus::Cancelled => None,
    }
}

/// Human-readable label for what has to happen next.
pub fn required_next_action(status: InvestmentStatus) -> &'static str {
    match status {
        InvestmentStatus::Pending => "Investor must sign the subscription agreement",
        InvestmentStatus::PendingApproval => {
            "Admin must review the application and send the promissory note"
        }
        InvestmentStatus::PromissoryNotePending => {
            "Promissory note must be signed by the investor and countersigned by the admin"
        }
        InvestmentStatus::BankDetailsPending => "Investor must confirm the wire transfer details",
        InvestmentStatus::FundsPending => "Admin must verify that the funds were received",
        InvestmentStatus::PlaidPending => "Investor must link a bank account",
        InvestmentStatus::InvestorOnboardingComplete => "Admin must activate the investment",
        InvestmentStatus::Active => "No action required; the investment is active",
        InvestmentStatus::Cancelled => "No action possible; the investment was cancelled",
    }
}
