//! SQLite storage implementation for work packs, their line items and expenses.
//!
//! `WorkPackRepository` also serves as the budget source: it reads a work
//! pack's items and expenses joined with their cost codes.

mod budget_source;
mod model;
mod repository;

pub use model::{NewWorkPackDB, WorkPackDB, WorkPackExpenseDB, WorkPackItemDB};
pub use repository::WorkPackRepository;
