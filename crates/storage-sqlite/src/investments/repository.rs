use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use onboarding_core::investments::{
    ApplicationStatus, Investment, InvestmentApplication, InvestmentDetailsUpdate,
    InvestmentFilter, InvestmentRepositoryTrait, TransitionCommit,
};
use onboarding_core::signatures::SignatureChange;
use onboarding_core::workflow::WorkflowError;
use onboarding_core::{Error, Result};

use super::model::{ApplicationTermsDB, InvestmentApplicationDB, InvestmentDB, InvestmentTermsDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{investment_applications, investments};
use crate::signatures::apply_signature_changes;

pub struct InvestmentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        InvestmentRepository { pool, writer }
    }
}

fn load_investment(conn: &mut SqliteConnection, investment_id: &str) -> Result<Option<Investment>> {
    investments::table
        .find(investment_id)
        .select(InvestmentDB::as_select())
        .first::<InvestmentDB>(conn)
        .optional()
        .into_core()?
        .map(|row| Investment::try_from(row).map_err(Error::from))
        .transpose()
}

fn load_application(
    conn: &mut SqliteConnection,
    application_id: &str,
) -> Result<Option<InvestmentApplication>> {
    investment_applications::table
        .find(application_id)
        .select(InvestmentApplicationDB::as_select())
        .first::<InvestmentApplicationDB>(conn)
        .optional()
        .into_core()?
        .map(|row| InvestmentApplication::try_from(row).map_err(Error::from))
        .transpose()
}

/// Distinguishes a missing row from a lost version check after a 0-row update.
fn version_mismatch(conn: &mut SqliteConnection, investment_id: &str) -> Error {
    match load_investment(conn, investment_id) {
        Ok(Some(current)) => WorkflowError::Conflict(format!(
            "investment {} is at version {}",
            investment_id, current.version
        ))
        .into(),
        Ok(None) => WorkflowError::investment_not_found(investment_id).into(),
        Err(e) => e,
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    async fn create(
        &self,
        investment: Investment,
        application: InvestmentApplication,
        documents: Vec<SignatureChange>,
    ) -> Result<(Investment, InvestmentApplication)> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<(Investment, InvestmentApplication)> {
                diesel::insert_into(investment_applications::table)
                    .values(InvestmentApplicationDB::from(&application))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::insert_into(investments::table)
                    .values(InvestmentDB::from(&investment))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                apply_signature_changes(conn, documents)?;
                Ok((investment, application))
            })
            .await
    }

    fn find_by_id(&self, investment_id: &str) -> Result<Option<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        load_investment(&mut conn, investment_id)
    }

    fn find_application(&self, application_id: &str) -> Result<Option<InvestmentApplication>> {
        let mut conn = get_connection(&self.pool)?;
        load_application(&mut conn, application_id)
    }

    fn list(&self, filter: &InvestmentFilter) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = investments::table
            .select(InvestmentDB::as_select())
            .into_boxed();
        if let Some(user_id) = &filter.user_id {
            query = query.filter(investments::user_id.eq(user_id.clone()));
        }
        if let Some(status) = filter.status {
            query = query.filter(investments::status.eq(status.as_str()));
        }
        let rows = query
            .order((investments::created_at.desc(), investments::id.desc()))
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| Investment::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn update_details(
        &self,
        investment_id: &str,
        expected_version: i64,
        update: InvestmentDetailsUpdate,
    ) -> Result<Investment> {
        let investment_id = investment_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Investment> {
                let now = Utc::now().naive_utc();
                let terms = InvestmentTermsDB {
                    amount: update.amount.to_string(),
                    annual_percentage: update.annual_percentage.to_string(),
                    payment_frequency: update.payment_frequency.as_str().to_string(),
                    term_months: update.term_months,
                    updated_at: now,
                };
                let updated = diesel::update(
                    investments::table
                        .filter(investments::id.eq(&investment_id))
                        .filter(investments::version.eq(expected_version)),
                )
                .set((&terms, investments::version.eq(expected_version + 1)))
                .execute(conn)
                .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(version_mismatch(conn, &investment_id));
                }

                let investment = load_investment(conn, &investment_id)?
                    .ok_or_else(|| WorkflowError::investment_not_found(&investment_id))?;
                diesel::update(investment_applications::table.find(&investment.application_id))
                    .set(ApplicationTermsDB {
                        amount: terms.amount,
                        annual_percentage: terms.annual_percentage,
                        payment_frequency: terms.payment_frequency,
                        term_months: terms.term_months,
                        updated_at: now,
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(investment)
            })
            .await
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> Result<Investment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Investment> {
                let updated = diesel::update(
                    investments::table
                        .filter(investments::id.eq(&commit.investment_id))
                        .filter(investments::version.eq(commit.expected_version)),
                )
                .set((
                    investments::status.eq(commit.status.as_str()),
                    investments::version.eq(commit.expected_version + 1),
                    investments::updated_at.eq(commit.committed_at),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(version_mismatch(conn, &commit.investment_id));
                }

                let updated = diesel::update(
                    investment_applications::table
                        .filter(investment_applications::id.eq(&commit.application_id))
                        .filter(
                            investment_applications::status
                                .eq(commit.expected_application_status.as_str()),
                        ),
                )
                .set((
                    investment_applications::status.eq(commit.application_status.as_str()),
                    investment_applications::updated_at.eq(commit.committed_at),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(match load_application(conn, &commit.application_id)? {
                        Some(current) => WorkflowError::Conflict(format!(
                            "application {} is {}",
                            current.id, current.status
                        ))
                        .into(),
                        None => WorkflowError::application_not_found(&commit.application_id).into(),
                    });
                }

                apply_signature_changes(conn, commit.signature_changes)?;

                load_investment(conn, &commit.investment_id)?
                    .ok_or_else(|| WorkflowError::investment_not_found(&commit.investment_id).into())
            })
            .await
    }

    async fn delete_application(&self, application_id: &str) -> Result<InvestmentApplication> {
        let application_id = application_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<InvestmentApplication> {
                let mut application = load_application(conn, &application_id)?
                    .ok_or_else(|| WorkflowError::application_not_found(&application_id))?;
                if application.status.is_terminal() {
                    return Err(WorkflowError::ApplicationClosed {
                        application_id: application.id,
                        status: application.status,
                    }
                    .into());
                }

                application.status = ApplicationStatus::Deleted;
                application.updated_at = Utc::now().naive_utc();
                diesel::update(investment_applications::table.find(&application_id))
                    .set((
                        investment_applications::status.eq(application.status.as_str()),
                        investment_applications::updated_at.eq(application.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(application)
            })
            .await
    }
}
