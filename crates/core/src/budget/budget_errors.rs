use thiserror::Error;

/// Errors raised while loading or assembling a work pack budget.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Could not load budget {source_name}: {message}")]
    FetchFailed {
        source_name: String,
        message: String,
    },

    #[error("Work pack not found: {0}")]
    WorkPackNotFound(String),
}
