//! In-memory implementation of the repository traits.
//!
//! Applies the same conditional-write rules as the SQLite store: transition
//! commits are guarded by the investment version and the application status,
//! and signature changes by the latest sequence or the expected status. All
//! records touched by one call are written together or not at all.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::errors::{DatabaseError, Error, Result};
use crate::investments::{
    ApplicationStatus, Investment, InvestmentApplication, InvestmentDetailsUpdate, InvestmentFilter,
    InvestmentRepositoryTrait, TransitionCommit,
};
use crate::notifications::{NewNotification, Notification, NotificationRepositoryTrait};
use crate::signatures::{
    DocumentSignature, DocumentType, SignatureChange, SignatureError, SignatureRepositoryTrait,
    SignatureStatus,
};
use crate::workflow::WorkflowError;

#[derive(Default)]
struct StoreState {
    investments: HashMap<String, Investment>,
    applications: HashMap<String, InvestmentApplication>,
    signatures: HashMap<String, DocumentSignature>,
    notifications: Vec<Notification>,
}

/// Thread-safe store keeping every record behind one lock.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| Error::Unexpected("In-memory store lock poisoned".to_string()))
    }
}

fn latest_in<'a>(
    signatures: &'a HashMap<String, DocumentSignature>,
    application_id: &str,
    document_type: DocumentType,
) -> Option<&'a DocumentSignature> {
    signatures
        .values()
        .filter(|s| s.application_id == application_id && s.document_type == document_type)
        .max_by_key(|s| s.sequence)
}

fn conflict(message: String) -> Error {
    WorkflowError::Conflict(message).into()
}

/// Applies `changes` to a working copy and swaps it in only if every change holds.
fn apply_signature_changes(
    signatures: &mut HashMap<String, DocumentSignature>,
    changes: Vec<SignatureChange>,
) -> Result<Vec<DocumentSignature>> {
    let mut working = signatures.clone();
    let mut written = Vec::with_capacity(changes.len());

    for change in changes {
        match change {
            SignatureChange::Create {
                signature,
                supersedes,
            } => {
                let latest = latest_in(&working, &signature.application_id, signature.document_type)
                    .cloned();
                match (supersedes.as_deref(), latest) {
                    (None, None) => {}
                    (Some(expected), Some(mut latest)) if latest.id == expected => {
                        if !latest.status.is_terminal() {
                            latest.status = SignatureStatus::Superseded;
                            latest.updated_at = signature.created_at;
                            working.insert(latest.id.clone(), latest);
                        }
                    }
                    (_, latest) => {
                        return Err(conflict(format!(
                            "{} of application {} was replaced (latest is {:?})",
                            signature.document_type,
                            signature.application_id,
                            latest.map(|s| s.id)
                        )))
                    }
                }
                if working.contains_key(&signature.id) {
                    return Err(DatabaseError::UniqueViolation(format!(
                        "signature {} already exists",
                        signature.id
                    ))
                    .into());
                }
                working.insert(signature.id.clone(), signature.clone());
                written.push(signature);
            }
            SignatureChange::Advance {
                signature_id,
                expected,
                status,
                at,
            } => {
                let record = working
                    .get_mut(&signature_id)
                    .ok_or_else(|| Error::from(SignatureError::NotFound(signature_id.clone())))?;
                if record.status != expected {
                    return Err(conflict(format!(
                        "signature {} is {} (expected {})",
                        signature_id, record.status, expected
                    )));
                }
                record.status = status;
                match status {
                    SignatureStatus::InvestorSigned => record.investor_signed_at = Some(at),
                    SignatureStatus::Signed | SignatureStatus::AdminSigned => {
                        record.admin_signed_at = Some(at)
                    }
                    _ => {}
                }
                record.updated_at = at;
                written.push(record.clone());
            }
        }
    }

    *signatures = working;
    Ok(written)
}

#[async_trait]
impl InvestmentRepositoryTrait for InMemoryStore {
    async fn create(
        &self,
        investment: Investment,
        application: InvestmentApplication,
        documents: Vec<SignatureChange>,
    ) -> Result<(Investment, InvestmentApplication)> {
        let mut state = self.state()?;
        if state.investments.contains_key(&investment.id)
            || state.applications.contains_key(&application.id)
        {
            return Err(DatabaseError::UniqueViolation(format!(
                "investment {} or application {} already exists",
                investment.id, application.id
            ))
            .into());
        }
        apply_signature_changes(&mut state.signatures, documents)?;
        state
            .applications
            .insert(application.id.clone(), application.clone());
        state
            .investments
            .insert(investment.id.clone(), investment.clone());
        Ok((investment, application))
    }

    fn find_by_id(&self, investment_id: &str) -> Result<Option<Investment>> {
        Ok(self.state()?.investments.get(investment_id).cloned())
    }

    fn find_application(&self, application_id: &str) -> Result<Option<InvestmentApplication>> {
        Ok(self.state()?.applications.get(application_id).cloned())
    }

    fn list(&self, filter: &InvestmentFilter) -> Result<Vec<Investment>> {
        let state = self.state()?;
        let mut investments: Vec<Investment> = state
            .investments
            .values()
            .filter(|investment| filter.matches(investment))
            .cloned()
            .collect();
        investments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(investments)
    }

    async fn update_details(
        &self,
        investment_id: &str,
        expected_version: i64,
        update: InvestmentDetailsUpdate,
    ) -> Result<Investment> {
        let mut state = self.state()?;
        let mut investment = state
            .investments
            .get(investment_id)
            .cloned()
            .ok_or_else(|| WorkflowError::investment_not_found(investment_id))?;
        if investment.version != expected_version {
            return Err(conflict(format!(
                "investment {} is at version {}",
                investment_id, investment.version
            )));
        }

        let now = Utc::now().naive_utc();
        investment.amount = update.amount;
        investment.annual_percentage = update.annual_percentage;
        investment.payment_frequency = update.payment_frequency;
        investment.term_months = update.term_months;
        investment.version += 1;
        investment.updated_at = now;

        if let Some(application) = state.applications.get_mut(&investment.application_id) {
            application.amount = update.amount;
            application.annual_percentage = update.annual_percentage;
            application.payment_frequency = update.payment_frequency;
            application.term_months = update.term_months;
            application.updated_at = now;
        }
        state
            .investments
            .insert(investment.id.clone(), investment.clone());
        Ok(investment)
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> Result<Investment> {
        let mut state = self.state()?;
        let mut investment = state
            .investments
            .get(&commit.investment_id)
            .cloned()
            .ok_or_else(|| WorkflowError::investment_not_found(&commit.investment_id))?;
        if investment.version != commit.expected_version {
            return Err(conflict(format!(
                "investment {} is at version {}",
                commit.investment_id, investment.version
            )));
        }
        let mut application = state
            .applications
            .get(&commit.application_id)
            .cloned()
            .ok_or_else(|| WorkflowError::application_not_found(&commit.application_id))?;
        if application.status != commit.expected_application_status {
            return Err(conflict(format!(
                "application {} is {}",
                commit.application_id, application.status
            )));
        }

        apply_signature_changes(&mut state.signatures, commit.signature_changes)?;

        investment.status = commit.status;
        investment.version += 1;
        investment.updated_at = commit.committed_at;
        application.status = commit.application_status;
        application.updated_at = commit.committed_at;

        state
            .applications
            .insert(application.id.clone(), application);
        state
            .investments
            .insert(investment.id.clone(), investment.clone());
        Ok(investment)
    }

    async fn delete_application(&self, application_id: &str) -> Result<InvestmentApplication> {
        let mut state = self.state()?;
        let application = state
            .applications
            .get_mut(application_id)
            .ok_or_else(|| WorkflowError::application_not_found(application_id))?;
        if application.status.is_terminal() {
            return Err(WorkflowError::ApplicationClosed {
                application_id: application.id.clone(),
                status: application.status,
            }
            .into());
        }
        application.status = ApplicationStatus::Deleted;
        application.updated_at = Utc::now().naive_utc();
        Ok(application.clone())
    }
}

#[async_trait]
impl SignatureRepositoryTrait for InMemoryStore {
    fn find_by_id(&self, signature_id: &str) -> Result<Option<DocumentSignature>> {
        Ok(self.state()?.signatures.get(signature_id).cloned())
    }

    fn latest_for(
        &self,
        application_id: &str,
        document_type: DocumentType,
    ) -> Result<Option<DocumentSignature>> {
        let state = self.state()?;
        Ok(latest_in(&state.signatures, application_id, document_type).cloned())
    }

    fn list_for_application(&self, application_id: &str) -> Result<Vec<DocumentSignature>> {
        let state = self.state()?;
        let mut records: Vec<DocumentSignature> = state
            .signatures
            .values()
            .filter(|s| s.application_id == application_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.document_type
                .as_str()
                .cmp(b.document_type.as_str())
                .then(a.sequence.cmp(&b.sequence))
        });
        Ok(records)
    }

    async fn apply_changes(&self, changes: Vec<SignatureChange>) -> Result<Vec<DocumentSignature>> {
        let mut state = self.state()?;
        apply_signature_changes(&mut state.signatures, changes)
    }
}

#[async_trait]
impl NotificationRepositoryTrait for InMemoryStore {
    async fn insert(&self, notification: NewNotification) -> Result<Notification> {
        let record = Notification {
            id: Uuid::now_v7().to_string(),
            recipient_id: notification.recipient_id,
            subject: notification.subject,
            body: notification.body,
            related_investment_id: notification.related_investment_id,
            is_read: false,
            created_at: Utc::now().naive_utc(),
        };
        self.state()?.notifications.push(record.clone());
        Ok(record)
    }

    fn list_for_recipient(
        &self,
        recipient_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let state = self.state()?;
        // Insertion order is creation order; newest first.
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id && (!unread_only || !n.is_read))
            .cloned()
            .collect())
    }

    async fn mark_read(&self, notification_id: &str) -> Result<Notification> {
        let mut state = self.state()?;
        let record = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| {
                Error::from(DatabaseError::NotFound(format!(
                    "notification {}",
                    notification_id
                )))
            })?;
        record.is_read = true;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::plan_create_or_replace;
    use crate::workflow::{FailureKind, InvestmentStatus};

    fn signature_key_changes(store: &InMemoryStore) -> (DocumentSignature, DocumentSignature) {
        let now = Utc::now().naive_utc();
        let first = plan_create_or_replace(
            "app-1",
            DocumentType::PromissoryNote,
            None,
            SignatureStatus::Sent,
            now,
        );
        let first = futures::executor::block_on(store.apply_changes(vec![first]))
            .unwrap()
            .remove(0);
        let second = plan_create_or_replace(
            "app-1",
            DocumentType::PromissoryNote,
            Some(&first),
            SignatureStatus::Sent,
            now,
        );
        let second = futures::executor::block_on(store.apply_changes(vec![second]))
            .unwrap()
            .remove(0);
        (first, second)
    }

    #[test]
    fn test_replace_supersedes_previous_record() {
        let store = InMemoryStore::new();
        let (first, second) = signature_key_changes(&store);

        let stored_first = SignatureRepositoryTrait::find_by_id(&store, &first.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored_first.status, SignatureStatus::Superseded);
        assert_eq!(second.sequence, 2);
        let latest = store
            .latest_for("app-1", DocumentType::PromissoryNote)
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[test]
    fn test_stale_supersede_is_a_conflict() {
        let store = InMemoryStore::new();
        let (first, _) = signature_key_changes(&store);

        let stale = plan_create_or_replace(
            "app-1",
            DocumentType::PromissoryNote,
            Some(&first),
            SignatureStatus::Sent,
            Utc::now().naive_utc(),
        );
        let err = futures::executor::block_on(store.apply_changes(vec![stale])).unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Conflict));
        assert_eq!(store.list_for_application("app-1").unwrap().len(), 2);
    }

    #[test]
    fn test_failed_batch_leaves_no_partial_write() {
        let store = InMemoryStore::new();
        let now = Utc::now().naive_utc();
        let create = plan_create_or_replace(
            "app-1",
            DocumentType::SubscriptionAgreement,
            None,
            SignatureStatus::Sent,
            now,
        );
        let bad_advance = SignatureChange::Advance {
            signature_id: "missing".to_string(),
            expected: SignatureStatus::Sent,
            status: SignatureStatus::InvestorSigned,
            at: now,
        };
        assert!(futures::executor::block_on(store.apply_changes(vec![create, bad_advance])).is_err());
        assert!(store.list_for_application("app-1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notifications_unread_filter_and_mark_read() {
        let store = InMemoryStore::new();
        let first = store
            .insert(NewNotification {
                recipient_id: "user-1".to_string(),
                subject: "One".to_string(),
                body: "Body".to_string(),
                related_investment_id: None,
            })
            .await
            .unwrap();
        store
            .insert(NewNotification {
                recipient_id: "user-1".to_string(),
                subject: "Two".to_string(),
                body: "Body".to_string(),
                related_investment_id: None,
            })
            .await
            .unwrap();

        NotificationRepositoryTrait::mark_read(&store, &first.id)
            .await
            .unwrap();
        let unread = store.list_for_recipient("user-1", true).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].subject, "Two");
        let all = store.list_for_recipient("user-1", false).unwrap();
        assert_eq!(all[0].subject, "Two");
        assert!(store.list_for_recipient("user-2", false).unwrap().is_empty());
    }

    fn records() -> (Investment, InvestmentApplication) {
        let now = Utc::now().naive_utc();
        let application = InvestmentApplication {
            id: "app-1".to_string(),
            user_id: "user-1".to_string(),
            amount: rust_decimal::Decimal::from(1000),
            annual_percentage: rust_decimal::Decimal::from(8),
            payment_frequency: Default::default(),
            term_months: 12,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let investment = Investment {
            id: "inv-1".to_string(),
            application_id: "app-1".to_string(),
            user_id: "user-1".to_string(),
            amount: application.amount,
            annual_percentage: application.annual_percentage,
            payment_frequency: Default::default(),
            term_months: 12,
            status: InvestmentStatus::Pending,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        (investment, application)
    }

    #[tokio::test]
    async fn test_create_with_agreement() {
        let store = InMemoryStore::new();
        let (investment, application) = records();
        let agreement = plan_create_or_replace(
            "app-1",
            DocumentType::SubscriptionAgreement,
            None,
            SignatureStatus::Sent,
            Utc::now().naive_utc(),
        );
        store
            .create(investment, application, vec![agreement])
            .await
            .unwrap();

        assert!(InvestmentRepositoryTrait::find_by_id(&store, "inv-1")
            .unwrap()
            .is_some());
        let latest = store
            .latest_for("app-1", DocumentType::SubscriptionAgreement)
            .unwrap()
            .unwrap();
        assert_eq!(latest.status, SignatureStatus::Sent);
    }

    #[tokio::test]
    async fn test_failed_document_leaves_no_investment() {
        let store = InMemoryStore::new();
        let (investment, application) = records();
        let orphan_replace = SignatureChange::Create {
            signature: plan_create_or_replace(
                "app-1",
                DocumentType::SubscriptionAgreement,
                None,
                SignatureStatus::Sent,
                Utc::now().naive_utc(),
            )
            .created()
            .cloned()
            .unwrap(),
            supersedes: Some("never-issued".to_string()),
        };

        let err = store
            .create(investment, application, vec![orphan_replace])
            .await
            .unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Conflict));
        assert!(InvestmentRepositoryTrait::find_by_id(&store, "inv-1")
            .unwrap()
            .is_none());
        assert!(store.find_application("app-1").unwrap().is_none());
        assert!(store.list_for_application("app-1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_application_twice_is_refused() {
        let store = InMemoryStore::new();
        let (investment, application) = records();
        store.create(investment, application, vec![]).await.unwrap();

        let deleted = store.delete_application("app-1").await.unwrap();
        assert_eq!(deleted.status, ApplicationStatus::Deleted);
        let err = store.delete_application("app-1").await.unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::AlreadyTerminal));
    }
}
