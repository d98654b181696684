//! SQLite storage implementation for investments and applications.

mod model;
mod repository;

pub use model::{ApplicationTermsDB, InvestmentApplicationDB, InvestmentDB, InvestmentTermsDB};
pub use repository::InvestmentRepository;
