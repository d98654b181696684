use chrono::{NaiveDateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

use super::dispatch_model::{DispatchOutcome, WorkflowSettings};
use super::dispatch_traits::ActionDispatcherTrait;
use crate::errors::Result;
use crate::investments::{
    ApplicationStatus, InvestmentRepositoryTrait, InvestmentView, TransitionCommit,
};
use crate::notifications::{notice_for_transition, NotificationSink};
use crate::signatures::{
    plan_admin_signature, plan_create_or_replace, plan_investor_signature, DocumentSignature,
    DocumentType, SignatureChange, SignatureError, SignatureRepositoryTrait, SignatureStatus,
};
use crate::workflow::{transition, ActorRole, WorkflowAction, WorkflowError};

/// Dispatches actor actions through the state machine and the signature coordinator.
pub struct ActionDispatcher {
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    signature_repository: Arc<dyn SignatureRepositoryTrait>,
    notification_sink: Arc<dyn NotificationSink>,
    settings: WorkflowSettings,
}

impl ActionDispatcher {
    pub fn new(
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        signature_repository: Arc<dyn SignatureRepositoryTrait>,
        notification_sink: Arc<dyn NotificationSink>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            investment_repository,
            signature_repository,
            notification_sink,
            settings,
        }
    }

    fn require_latest(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<DocumentSignature> {
        self.signature_repository
            .latest_for(application_id, document_type)?
            .ok_or_else(|| {
                SignatureError::NotFound(format!(
                    "{} for application {}",
                    document_type, application_id
                ))
                .into()
            })
    }

    /// Validated signature changes for a document-bearing action.
    ///
    /// Nothing is written here; the changes ride along in the transition commit.
    fn plan_signature_changes(
        &self,
        application_id: &str,
        action: &WorkflowAction,
        now: NaiveDateTime,
    ) -> Result<Vec<SignatureChange>> {
        match action {
            WorkflowAction::SignSubscription => {
                let latest = self
                    .signature_repository
                    .latest_for(application_id, DocumentType::SubscriptionAgreement)?;
                match latest {
                    Some(agreement) => Ok(vec![plan_investor_signature(&agreement, now)?]),
                    None => {
                        // No agreement was issued; create it and sign in one step.
                        let create = plan_create_or_replace(
                            application_id,
                            DocumentType::SubscriptionAgreement,
                            None,
                            SignatureStatus::Pending,
                            now,
                        );
                        let sign = create
                            .created()
                            .map(|agreement| plan_investor_signature(agreement, now))
                            .transpose()?;
                        Ok(std::iter::once(create).chain(sign).collect())
                    }
                }
            }
            WorkflowAction::SendPromissoryNote => {
                let agreement =
                    self.require_latest(application_id, DocumentType::SubscriptionAgreement)?;
                let mut changes = Vec::with_capacity(2);
                if !agreement.status.is_complete() {
                    changes.push(plan_admin_signature(&agreement, now)?);
                }
                let note = self
                    .signature_repository
                    .latest_for(application_id, DocumentType::PromissoryNote)?;
                changes.push(plan_create_or_replace(
                    application_id,
                    DocumentType::PromissoryNote,
                    note.as_ref(),
                    SignatureStatus::Sent,
                    now,
                ));
                Ok(changes)
            }
            WorkflowAction::SignPromissoryInvestor => {
                let note = self.require_latest(application_id, DocumentType::PromissoryNote)?;
                Ok(vec![plan_investor_signature(&note, now)?])
            }
            WorkflowAction::SignPromissoryAdmin => {
                let note = self.require_latest(application_id, DocumentType::PromissoryNote)?;
                Ok(vec![plan_admin_signature(&note, now)?])
            }
            WorkflowAction::ConfirmWireDetails
            | WorkflowAction::VerifyFunds
            | WorkflowAction::LinkBankAccount
            | WorkflowAction::Activate
            | WorkflowAction::Decline { .. } => Ok(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ActionDispatcherTrait for ActionDispatcher {
    async fn dispatch(
        &self,
        investment_id: &str,
        actor: ActorRole,
        action: WorkflowAction,
    ) -> Result<DispatchOutcome> {
        debug!(
            "Dispatching {} by {} on investment {}",
            action, actor, investment_id
        );

        let investment = self
            .investment_repository
            .find_by_id(investment_id)?
            .ok_or_else(|| WorkflowError::investment_not_found(investment_id))?;
        let application = self
            .investment_repository
            .find_application(&investment.application_id)?
            .ok_or_else(|| WorkflowError::application_not_found(&investment.application_id))?;

        if !investment.status.is_terminal() && application.status.is_terminal() {
            return Err(WorkflowError::ApplicationClosed {
                application_id: application.id,
                status: application.status,
            }
            .into());
        }

        // Policy checks first: nothing below runs for a rejected action.
        let previous = investment.status;
        let next = transition(previous, &action, actor)?;

        let now = Utc::now().naive_utc();
        let signature_changes = self.plan_signature_changes(&application.id, &action, now)?;
        let application_status = ApplicationStatus::mirror(previous, next);

        let commit = TransitionCommit {
            investment_id: investment.id.clone(),
            expected_version: investment.version,
            status: next,
            application_id: application.id.clone(),
            expected_application_status: application.status,
            application_status,
            signature_changes,
            committed_at: now,
        };
        let updated = self.investment_repository.commit_transition(commit).await?;
        info!(
            "Investment {} moved {} -> {} ({} by {})",
            updated.id, previous, updated.status, action, actor
        );

        // Post-commit: a failed hand-off is logged, never rolled back.
        let notice = notice_for_transition(
            &updated,
            &action,
            actor,
            &self.settings.admin_recipient_id,
        );
        let recipient = notice.recipient_id.clone();
        if let Err(e) = self.notification_sink.send(notice) {
            warn!(
                "Failed to queue notification to {} for investment {}: {}",
                recipient, updated.id, e
            );
        }

        let view = InvestmentView::new(updated, application_status);
        Ok(DispatchOutcome {
            required_next_action: view.required_next_action.clone(),
            investment: view,
        })
    }
}
