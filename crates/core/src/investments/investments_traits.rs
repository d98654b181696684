//! Investment repository and service traits.
//!
//! These traits define the contract for investment records without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::application_model::InvestmentApplication;
use super::investments_model::{
    Investment, InvestmentDetailsUpdate, InvestmentFilter, InvestmentView, NewInvestment,
    TransitionCommit,
};
use crate::errors::Result;
use crate::signatures::SignatureChange;

/// Trait defining the contract for investment and application persistence.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Inserts an investment, its application and their first documents in one write.
    ///
    /// Nothing is persisted if any of `documents` fails to apply.
    async fn create(
        &self,
        investment: Investment,
        application: InvestmentApplication,
        documents: Vec<SignatureChange>,
    ) -> Result<(Investment, InvestmentApplication)>;

    /// Retrieves an investment by its ID.
    fn find_by_id(&self, investment_id: &str) -> Result<Option<Investment>>;

    /// Retrieves an application by its ID.
    fn find_application(&self, application_id: &str) -> Result<Option<InvestmentApplication>>;

    /// Lists investments matching the filter, newest first.
    fn list(&self, filter: &InvestmentFilter) -> Result<Vec<Investment>>;

    /// Replaces the commercial terms of an investment and its application.
    ///
    /// Conditional on `expected_version`; bumps the version.
    async fn update_details(
        &self,
        investment_id: &str,
        expected_version: i64,
        update: InvestmentDetailsUpdate,
    ) -> Result<Investment>;

    /// Applies a workflow transition atomically.
    ///
    /// Either every record in the commit is written or none is. A stale
    /// `expected_version` or `expected_application_status` fails with a
    /// conflict.
    async fn commit_transition(&self, commit: TransitionCommit) -> Result<Investment>;

    /// Moves a non-terminal application to `deleted`.
    async fn delete_application(&self, application_id: &str) -> Result<InvestmentApplication>;
}

/// Trait defining the contract for investment record operations outside the
/// state machine.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    /// Creates the investment and its application, both `pending`, together
    /// with the subscription agreement in `sent`.
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<InvestmentView>;

    fn get_investment(&self, investment_id: &str) -> Result<Investment>;

    fn get_investment_view(&self, investment_id: &str) -> Result<InvestmentView>;

    fn get_application(&self, application_id: &str) -> Result<InvestmentApplication>;

    fn list_investments(&self, filter: &InvestmentFilter) -> Result<Vec<Investment>>;

    /// Admin "edit details". Refused once the investment is terminal.
    async fn update_details(
        &self,
        investment_id: &str,
        update: InvestmentDetailsUpdate,
    ) -> Result<InvestmentView>;

    /// Deletes the application independently of its investment.
    async fn delete_application(&self, application_id: &str) -> Result<InvestmentApplication>;
}
