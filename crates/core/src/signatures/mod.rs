//! Signatures module - document signature records and their coordinator.

mod signatures_errors;
mod signatures_model;
mod signatures_service;
mod signatures_traits;


pub use signatures_errors::SignatureError;
pub use signatures_model::{DocumentSignature, DocumentType, SignatureChange, SignatureStatus};
pub use signatures_service::{
    plan_admin_signature, plan_create_or_replace, plan_investor_signature, SignatureService,
};
pub use signatures_traits::{SignatureRepositoryTrait, SignatureServiceTrait};
