use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use super::application_model::{ApplicationStatus, InvestmentApplication};
use super::investments_model::{
    Investment, InvestmentDetailsUpdate, InvestmentFilter, InvestmentView, NewInvestment,
};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use crate::constants::INITIAL_INVESTMENT_VERSION;
use crate::errors::Result;
use crate::signatures::{plan_create_or_replace, DocumentType, SignatureStatus};
use crate::workflow::{InvestmentStatus, TransitionRejection, WorkflowError};

/// Service for investment records and their applications.
pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
}

impl InvestmentService {
    pub fn new(repository: Arc<dyn InvestmentRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<InvestmentView> {
        new_investment.validate()?;

        let now = Utc::now().naive_utc();
        let application = InvestmentApplication {
            id: Uuid::new_v4().to_string(),
            user_id: new_investment.user_id.clone(),
            amount: new_investment.amount,
            annual_percentage: new_investment.annual_percentage,
            payment_frequency: new_investment.payment_frequency,
            term_months: new_investment.term_months,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let investment = Investment {
            id: Uuid::new_v4().to_string(),
            application_id: application.id.clone(),
            user_id: new_investment.user_id,
            amount: new_investment.amount,
            annual_percentage: new_investment.annual_percentage,
            payment_frequency: new_investment.payment_frequency,
            term_months: new_investment.term_months,
            status: InvestmentStatus::Pending,
            version: INITIAL_INVESTMENT_VERSION,
            created_at: now,
            updated_at: now,
        };

        let agreement = plan_create_or_replace(
            &application.id,
            DocumentType::SubscriptionAgreement,
            None,
            SignatureStatus::Sent,
            now,
        );
        let (investment, application) = self
            .repository
            .create(investment, application, vec![agreement])
            .await?;

        info!(
            "Created investment {} for user {} (application {})",
            investment.id, investment.user_id, application.id
        );
        Ok(InvestmentView::new(investment, application.status))
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.repository
            .find_by_id(investment_id)?
            .ok_or_else(|| WorkflowError::investment_not_found(investment_id).into())
    }

    fn get_investment_view(&self, investment_id: &str) -> Result<InvestmentView> {
        let investment = self.get_investment(investment_id)?;
        let application = self.get_application(&investment.application_id)?;
        Ok(InvestmentView::new(investment, application.status))
    }

    fn get_application(&self, application_id: &str) -> Result<InvestmentApplication> {
        self.repository
            .find_application(application_id)?
            .ok_or_else(|| WorkflowError::application_not_found(application_id).into())
    }

    fn list_investments(&self, filter: &InvestmentFilter) -> Result<Vec<Investment>> {
        self.repository.list(filter)
    }

    async fn update_details(
        &self,
        investment_id: &str,
        update: InvestmentDetailsUpdate,
    ) -> Result<InvestmentView> {
        update.validate()?;
        let investment = self.get_investment(investment_id)?;
        if investment.status.is_terminal() {
            return Err(TransitionRejection::AlreadyTerminal {
                status: investment.status,
            }
            .into());
        }

        debug!(
            "Updating details of investment {} at version {}",
            investment_id, investment.version
        );
        let updated = self
            .repository
            .update_details(investment_id, investment.version, update)
            .await?;
        let application = self.get_application(&updated.application_id)?;
        Ok(InvestmentView::new(updated, application.status))
    }

    async fn delete_application(&self, application_id: &str) -> Result<InvestmentApplication> {
        let application = self.get_application(application_id)?;
        if application.status.is_terminal() {
            return Err(WorkflowError::ApplicationClosed {
                application_id: application.id,
                status: application.status,
            }
            .into());
        }
        let deleted = self.repository.delete_application(application_id).await?;
        info!("Deleted application {}", application_id);
        Ok(deleted)
    }
}
