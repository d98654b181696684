//! End-to-end workflow tests against a temporary SQLite database.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tempfile::tempdir;

use onboarding_core::investments::{
    ApplicationStatus, InvestmentService, InvestmentServiceTrait, NewInvestment, PaymentFrequency,
};
use onboarding_core::notifications::{
    MockNotificationSink, NewNotification, NotificationService, NotificationServiceTrait,
};
use onboarding_core::signatures::{
    DocumentType, SignatureService, SignatureServiceTrait, SignatureStatus,
};
use onboarding_core::{
    ActionDispatcher, ActionDispatcherTrait, ActorRole, FailureKind, InvestmentStatus,
    WorkflowAction, WorkflowSettings,
};
use onboarding_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, InvestmentRepository,
    NotificationRepository, SignatureRepository,
};

struct App {
    dispatcher: ActionDispatcher,
    investments: InvestmentService,
    signatures: Arc<SignatureService>,
    notifications: NotificationService,
    sink: MockNotificationSink,
    _dir: tempfile::TempDir,
}

async fn app() -> App {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("nested").join("onboarding.db");
    let db_path = init(&db_path.to_string_lossy()).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    let investment_repository = Arc::new(InvestmentRepository::new(pool.clone(), writer.clone()));
    let signature_repository = Arc::new(SignatureRepository::new(pool.clone(), writer.clone()));
    let notification_repository = Arc::new(NotificationRepository::new(pool, writer));

    let sink = MockNotificationSink::new();
    let signatures = Arc::new(SignatureService::new(signature_repository.clone()));
    App {
        dispatcher: ActionDispatcher::new(
            investment_repository.clone(),
            signature_repository,
            Arc::new(sink.clone()),
            WorkflowSettings::default(),
        ),
        investments: InvestmentService::new(investment_repository),
        signatures,
        notifications: NotificationService::new(notification_repository),
        sink,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_onboarding_over_sqlite() {
    let app = app().await;
    let created = app
        .investments
        .create_investment(NewInvestment {
            user_id: "investor-7".to_string(),
            amount: dec!(500000),
            annual_percentage: dec!(7.5),
            payment_frequency: PaymentFrequency::Monthly,
            term_months: 36,
        })
        .await
        .unwrap();
    let id = created.investment.id.clone();
    let application_id = created.investment.application_id.clone();

    let steps = [
        (ActorRole::Investor, WorkflowAction::SignSubscription),
        (ActorRole::Admin, WorkflowAction::SendPromissoryNote),
        (ActorRole::Investor, WorkflowAction::SignPromissoryInvestor),
        (ActorRole::Admin, WorkflowAction::SignPromissoryAdmin),
        (ActorRole::Investor, WorkflowAction::ConfirmWireDetails),
        (ActorRole::Admin, WorkflowAction::VerifyFunds),
        (ActorRole::Investor, WorkflowAction::LinkBankAccount),
        (ActorRole::Admin, WorkflowAction::Activate),
    ];
    for (actor, action) in steps {
        app.dispatcher.dispatch(&id, actor, action).await.unwrap();
    }

    let view = app.investments.get_investment_view(&id).unwrap();
    assert_eq!(view.investment.status, InvestmentStatus::Active);
    assert_eq!(view.application_status, ApplicationStatus::Active);
    assert_eq!(app.sink.len(), 8);

    let history = app.signatures.history(&application_id).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|s| s.status == SignatureStatus::Signed));
    let note = app
        .signatures
        .latest_for(&application_id, DocumentType::PromissoryNote)
        .unwrap()
        .unwrap();
    assert!(note.investor_signed_at.is_some());
    assert!(note.admin_signed_at.is_some());

    let err = app
        .dispatcher
        .dispatch(&id, ActorRole::Admin, WorkflowAction::Decline { reason: None })
        .await
        .unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::AlreadyTerminal));
}

#[tokio::test]
async fn test_rejected_countersign_leaves_database_untouched() {
    let app = app().await;
    let created = app
        .investments
        .create_investment(NewInvestment {
            user_id: "investor-8".to_string(),
            amount: dec!(25000),
            annual_percentage: dec!(6),
            payment_frequency: PaymentFrequency::Quarterly,
            term_months: 12,
        })
        .await
        .unwrap();
    let id = created.investment.id.clone();

    app.dispatcher
        .dispatch(&id, ActorRole::Investor, WorkflowAction::SignSubscription)
        .await
        .unwrap();
    app.dispatcher
        .dispatch(&id, ActorRole::Admin, WorkflowAction::SendPromissoryNote)
        .await
        .unwrap();
    let before = app.investments.get_investment(&id).unwrap();

    let err = app
        .dispatcher
        .dispatch(&id, ActorRole::Admin, WorkflowAction::SignPromissoryAdmin)
        .await
        .unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::NotYetInvestorSigned));
    assert_eq!(app.investments.get_investment(&id).unwrap(), before);
}

#[tokio::test]
async fn test_notification_records() {
    let app = app().await;
    let first = app
        .notifications
        .deliver(NewNotification {
            recipient_id: "investor-9".to_string(),
            subject: "Promissory note ready to sign".to_string(),
            body: "Please sign.".to_string(),
            related_investment_id: Some("inv-9".to_string()),
        })
        .await
        .unwrap();
    app.notifications
        .deliver(NewNotification {
            recipient_id: "investor-9".to_string(),
            subject: "Funds received".to_string(),
            body: "Thanks.".to_string(),
            related_investment_id: Some("inv-9".to_string()),
        })
        .await
        .unwrap();

    let read = app.notifications.mark_read(&first.id).await.unwrap();
    assert!(read.is_read);

    let unread = app
        .notifications
        .list_notifications("investor-9", true)
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].subject, "Funds received");
    assert_eq!(
        app.notifications
            .list_notifications("investor-9", false)
            .unwrap()
            .len(),
        2
    );

    let missing = app.notifications.mark_read("nope").await;
    assert!(missing.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_dispatches_commit_once_over_sqlite() {
    let app = Arc::new(app().await);
    let created = app
        .investments
        .create_investment(NewInvestment {
            user_id: "investor-10".to_string(),
            amount: dec!(100000),
            annual_percentage: dec!(7),
            payment_frequency: PaymentFrequency::Annually,
            term_months: 24,
        })
        .await
        .unwrap();
    let id = created.investment.id.clone();
    let application_id = created.investment.application_id.clone();
    app.dispatcher
        .dispatch(&id, ActorRole::Investor, WorkflowAction::SignSubscription)
        .await
        .unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let app = app.clone();
            let id = id.clone();
            tokio::spawn(async move {
                app.dispatcher
                    .dispatch(&id, ActorRole::Admin, WorkflowAction::SendPromissoryNote)
                    .await
            })
        })
        .collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.into_iter().find_map(|r| r.err()).unwrap();
    assert!(matches!(
        loser.failure_kind(),
        Some(FailureKind::Conflict) | Some(FailureKind::InvalidTransition)
    ));

    let investment = app.investments.get_investment(&id).unwrap();
    assert_eq!(investment.version, 3);
    assert_eq!(investment.status, InvestmentStatus::PromissoryNotePending);
    let notes = app
        .signatures
        .history(&application_id)
        .unwrap()
        .into_iter()
        .filter(|s| s.document_type == DocumentType::PromissoryNote)
        .count();
    assert_eq!(notes, 1);
}
