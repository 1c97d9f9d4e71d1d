//! BuildLedger Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for construction work pack budgeting:
//! cost codes, work packs with planned line items and recorded expenses, and the
//! budget reconciliation engine that compares the two per cost code.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod budget;
pub mod constants;
pub mod context;
pub mod cost_codes;
pub mod errors;
pub mod utils;
pub mod work_packs;

pub use context::OrgContext;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
