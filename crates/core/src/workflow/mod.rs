//! Workflow module - investment lifecycle states, actions and the pure state machine.

mod state_machine;
mod workflow_errors;
mod workflow_model;

#[cfg(test)]
mod state_machine_tests;

pub use state_machine::{awaiting_actor, available_actions, required_next_action, transition};
pub use workflow_errors::{FailureKind, TransitionRejection, WorkflowError};
pub use workflow_model::{ActorRole, InvestmentStatus, WorkflowAction};
