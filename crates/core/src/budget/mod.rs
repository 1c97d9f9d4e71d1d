//! Work pack budget module - reconciliation engine, rollups, filtering and services.

mod budget_aggregator;
mod budget_errors;
mod budget_filter;
mod budget_model;
mod budget_refresh;
mod budget_rollup;
mod budget_service;
mod budget_traits;

pub use budget_aggregator::{aggregate, variance_percentage};
pub use budget_errors::BudgetError;
pub use budget_filter::filter_summaries;
pub use budget_model::*;
pub use budget_refresh::{BudgetRefresher, LOAD_FAILED_MESSAGE};
pub use budget_rollup::{rollup_by_category, rollup_by_vendor};
pub use budget_service::{load_work_pack_budget, BudgetService};
pub use budget_traits::{BudgetServiceTrait, BudgetSourceTrait};
