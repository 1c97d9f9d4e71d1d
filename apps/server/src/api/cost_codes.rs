use std::sync::Arc;

use crate::{
    api::Org,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use buildledger_core::cost_codes::{CostCode, NewCostCode};

async fn list_cost_codes(
    Org(ctx): Org,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CostCode>>> {
    let cost_codes = state.cost_code_service.get_cost_codes(&ctx)?;
    Ok(Json(cost_codes))
}

async fn create_cost_code(
    Org(ctx): Org,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCostCode>,
) -> ApiResult<(StatusCode, Json<CostCode>)> {
    let created = state.cost_code_service.create_cost_code(&ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_cost_code(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCostCode>,
) -> ApiResult<Json<CostCode>> {
    let updated = state
        .cost_code_service
        .update_cost_code(&ctx, &id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_cost_code(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    match state.cost_code_service.delete_cost_code(&ctx, &id).await? {
        0 => Err(ApiError::NotFound),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cost-codes", get(list_cost_codes).post(create_cost_code))
        .route(
            "/cost-codes/{id}",
            put(update_cost_code).delete(delete_cost_code),
        )
}
