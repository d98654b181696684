use std::sync::Arc;

use crate::config::Config;
use crate::notifications::{QueuedNotificationSink, RetryPolicy};
use onboarding_core::{
    investments::{InvestmentService, InvestmentServiceTrait},
    notifications::{NotificationService, NotificationServiceTrait},
    signatures::{SignatureService, SignatureServiceTrait},
    ActionDispatcher, ActionDispatcherTrait, WorkflowSettings,
};
use onboarding_storage_sqlite::{
    db::{self, write_actor},
    InvestmentRepository, NotificationRepository, SignatureRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub investment_service: Arc<dyn InvestmentServiceTrait + Send + Sync>,
    pub signature_service: Arc<dyn SignatureServiceTrait + Send + Sync>,
    pub notification_service: Arc<dyn NotificationServiceTrait + Send + Sync>,
    pub dispatcher: Arc<dyn ActionDispatcherTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("ONB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Using database at {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let investment_repository = Arc::new(InvestmentRepository::new(pool.clone(), writer.clone()));
    let signature_repository = Arc::new(SignatureRepository::new(pool.clone(), writer.clone()));
    let notification_repository = Arc::new(NotificationRepository::new(pool, writer));

    let signature_service: Arc<dyn SignatureServiceTrait + Send + Sync> =
        Arc::new(SignatureService::new(signature_repository.clone()));
    let investment_service: Arc<dyn InvestmentServiceTrait + Send + Sync> =
        Arc::new(InvestmentService::new(investment_repository.clone()));
    let notification_service: Arc<dyn NotificationServiceTrait + Send + Sync> =
        Arc::new(NotificationService::new(notification_repository));

    // Notices are queued here and persisted by the worker out of band
    let notification_sink = Arc::new(QueuedNotificationSink::new());
    notification_sink.start_worker(
        notification_service.clone(),
        RetryPolicy {
            max_attempts: config.notify_max_attempts,
            base_delay: config.notify_retry_base,
        },
    );

    let dispatcher: Arc<dyn ActionDispatcherTrait + Send + Sync> = Arc::new(ActionDispatcher::new(
        investment_repository,
        signature_repository,
        notification_sink,
        WorkflowSettings {
            admin_recipient_id: config.admin_recipient_id.clone(),
        },
    ));

    Ok(Arc::new(AppState {
        investment_service,
        signature_service,
        notification_service,
        dispatcher,
    }))
}
