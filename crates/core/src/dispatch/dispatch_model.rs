//! Dispatch input/output models.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ADMIN_RECIPIENT_ID;
use crate::investments::InvestmentView;

/// Settings the dispatcher needs beyond its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    /// Recipient id for notifications addressed to the back office.
    pub admin_recipient_id: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            admin_recipient_id: DEFAULT_ADMIN_RECIPIENT_ID.to_string(),
        }
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub investment: InvestmentView,
    pub required_next_action: String,
}
