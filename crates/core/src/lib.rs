//! Onboarding Core - Domain entities, services, and traits.
//!
//! This crate contains the investment onboarding workflow: the pure
//! investment-lifecycle state machine, the document signature coordinator
//! and the action dispatcher that ties them to a record store.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod dispatch;
pub mod errors;
pub mod in_memory;
pub mod investments;
pub mod notifications;
pub mod signatures;
pub mod workflow;

pub use dispatch::{ActionDispatcher, ActionDispatcherTrait, DispatchOutcome, WorkflowSettings};
pub use in_memory::InMemoryStore;
pub use workflow::{ActorRole, FailureKind, InvestmentStatus, WorkflowAction, WorkflowError};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
