use async_trait::async_trait;

use super::dispatch_model::DispatchOutcome;
use crate::errors::Result;
use crate::workflow::{ActorRole, WorkflowAction};

/// Trait for the action dispatcher.
#[async_trait]
pub trait ActionDispatcherTrait: Send + Sync {
    /// Validates `action` by `actor` against the investment's current state,
    /// commits the transition and notifies the counterparty.
    ///
    /// Policy and conflict failures surface as `Error::Workflow` and leave
    /// every record unchanged.
    async fn dispatch(
        &self,
        investment_id: &str,
        actor: ActorRole,
        action: WorkflowAction,
    ) -> Result<DispatchOutcome>;
}
