//! SQLite storage implementation for cost codes.

mod model;
mod repository;

pub use model::{CostCodeDB, NewCostCodeDB};
pub use repository::CostCodeRepository;
