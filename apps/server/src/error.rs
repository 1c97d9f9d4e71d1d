use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use buildledger_core::budget::BudgetError;
use buildledger_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Database(DatabaseError::UniqueViolation(_))
        | CoreError::Database(DatabaseError::ForeignKeyViolation(_)) => StatusCode::CONFLICT,
        CoreError::Budget(BudgetError::FetchFailed { .. }) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use buildledger_core::errors::ValidationError;

    #[test]
    fn test_core_errors_map_to_status_codes() {
        let cases = [
            (
                CoreError::Database(DatabaseError::NotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                CoreError::Budget(BudgetError::WorkPackNotFound("wp".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                CoreError::Validation(ValidationError::MissingField("name".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Database(DatabaseError::UniqueViolation("code".into())),
                StatusCode::CONFLICT,
            ),
            (
                CoreError::Budget(BudgetError::FetchFailed {
                    source_name: "expenses".into(),
                    message: "timeout".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CoreError::Database(DatabaseError::QueryFailed("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }
}
