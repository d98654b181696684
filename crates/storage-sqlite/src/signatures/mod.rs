//! SQLite storage implementation for document signatures.

mod model;
mod repository;

pub use model::DocumentSignatureDB;
pub use repository::{apply_signature_changes, SignatureRepository};
