//! SQLite storage implementation for the onboarding workflow engine.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `onboarding-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for investments, signatures and notifications
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain, workflow)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Every write goes through the single writer actor, which runs each job in
//! one immediate transaction. A workflow transition (investment, application
//! and signature rows) is one such job.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod investments;
pub mod notifications;
pub mod signatures;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use investments::InvestmentRepository;
pub use notifications::NotificationRepository;
pub use signatures::SignatureRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from onboarding-core for convenience
pub use onboarding_core::errors::{DatabaseError, Error, Result};
