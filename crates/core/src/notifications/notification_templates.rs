//! Messages sent to the counterparty after a transition.

use super::notifications_model::NewNotification;
use crate::investments::Investment;
use crate::workflow::{ActorRole, WorkflowAction};

/// Builds the single notification for a committed transition.
///
/// The recipient is the party that did not act: the investor's user id, or
/// `admin_recipient_id` when the investor acted.
pub fn notice_for_transition(
    investment: &Investment,
    action: &WorkflowAction,
    actor: ActorRole,
    admin_recipient_id: &str,
) -> NewNotification {
    let recipient_id = match actor.counterparty() {
        ActorRole::Investor => investment.user_id.clone(),
        ActorRole::Admin => admin_recipient_id.to_string(),
    };
    let amount = investment.amount;

    let (subject, body) = match action {
        WorkflowAction::SignSubscription => (
            "Subscription agreement signed".to_string(),
            format!(
                "The investor signed the subscription agreement for an investment of {}. \
                 Review the application and send the promissory note.",
                amount
            ),
        ),
        WorkflowAction::SendPromissoryNote => (
            "Promissory note ready to sign".to_string(),
            format!(
                "Your application was approved. Please sign the promissory note for your \
                 investment of {}.",
                amount
            ),
        ),
        WorkflowAction::SignPromissoryInvestor => (
            "Promissory note signed by investor".to_string(),
            format!(
                "The investor signed the promissory note for an investment of {}. \
                 Countersign the note to continue.",
                amount
            ),
        ),
        WorkflowAction::SignPromissoryAdmin => (
            "Wire details now required".to_string(),
            "Your promissory note is fully signed. Please confirm the wire transfer details."
                .to_string(),
        ),
        WorkflowAction::ConfirmWireDetails => (
            "Wire details confirmed".to_string(),
            format!(
                "The investor confirmed the wire details for {}. Verify that the funds were \
                 received.",
                amount
            ),
        ),
        WorkflowAction::VerifyFunds => (
            "Funds received".to_string(),
            "We received your funds. Please link the bank account that will receive your \
             payments."
                .to_string(),
        ),
        WorkflowAction::LinkBankAccount => (
            "Investor onboarding complete".to_string(),
            format!(
                "The investor linked a bank account. The investment of {} is ready to be \
                 activated.",
                amount
            ),
        ),
        WorkflowAction::Activate => (
            "Your investment is active".to_string(),
            format!(
                "Your investment of {} at {}% per year is now active.",
                amount, investment.annual_percentage
            ),
        ),
        WorkflowAction::Decline { reason } => {
            let mut body = format!("Your investment of {} was declined.", amount);
            if let Some(reason) = reason.as_deref().filter(|r| !r.trim().is_empty()) {
                body.push_str(&format!(" Reason: {}", reason.trim()));
            }
            ("Your investment was declined".to_string(), body)
        }
    };

    NewNotification {
        recipient_id,
        subject,
        body,
        related_investment_id: Some(investment.id.clone()),
    }
}
