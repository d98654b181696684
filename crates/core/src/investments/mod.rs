//! Investments module - investment and application records.

mod application_model;
mod investments_model;
mod investments_service;
mod investments_traits;


pub use application_model::{ApplicationStatus, InvestmentApplication};
pub use investments_model::{
    Investment, InvestmentDetailsUpdate, InvestmentFilter, InvestmentView, NewInvestment,
    PaymentFrequency, TransitionCommit,
};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
