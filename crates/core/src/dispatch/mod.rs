//! Dispatch module - the single entry point for actor actions.

mod dispatch_model;
mod dispatch_service;
mod dispatch_traits;


pub use dispatch_model::{DispatchOutcome, WorkflowSettings};
pub use dispatch_service::ActionDispatcher;
pub use dispatch_traits::ActionDispatcherTrait;
