//! SQLite storage implementation for BuildLedger.
//!
//! This crate holds every Diesel dependency of the application. It implements
//! the repository and budget source traits defined in `buildledger-core`:
//! - connection pooling and the single writer actor
//! - embedded Diesel migrations
//! - repositories for cost codes and work packs
//! - database model types with their conversions to domain models

pub mod cost_codes;
pub mod db;
pub mod errors;
pub mod schema;
pub mod work_packs;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use buildledger_core::errors::{DatabaseError, Error, Result};
