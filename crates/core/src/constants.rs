/// Recipient id for notifications addressed to the admin team.
pub const DEFAULT_ADMIN_RECIPIENT_ID: &str = "admin";

/// First version of a newly created investment.
pub const INITIAL_INVESTMENT_VERSION: i64 = 1;

/// Upper bound for `annual_percentage`.
pub const MAX_ANNUAL_PERCENTAGE: rust_decimal::Decimal = rust_decimal::Decimal::ONE_HUNDRED;
