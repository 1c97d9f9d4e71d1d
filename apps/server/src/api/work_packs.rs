use std::sync::Arc;

use crate::{
    api::Org,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use buildledger_core::work_packs::{
    NewWorkPack, NewWorkPackExpense, NewWorkPackItem, WorkPack, WorkPackExpense, WorkPackItem,
};

fn deleted(count: usize) -> ApiResult<StatusCode> {
    if count == 0 {
        Err(ApiError::NotFound)
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

async fn list_work_packs(
    Org(ctx): Org,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WorkPack>>> {
    let work_packs = state.work_pack_service.get_work_packs(&ctx)?;
    Ok(Json(work_packs))
}

async fn get_work_pack(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WorkPack>> {
    let work_pack = state.work_pack_service.get_work_pack(&ctx, &id)?;
    Ok(Json(work_pack))
}

async fn create_work_pack(
    Org(ctx): Org,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWorkPack>,
) -> ApiResult<(StatusCode, Json<WorkPack>)> {
    let created = state.work_pack_service.create_work_pack(&ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_work_pack(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWorkPack>,
) -> ApiResult<Json<WorkPack>> {
    let updated = state
        .work_pack_service
        .update_work_pack(&ctx, &id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_work_pack(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let count = state.work_pack_service.delete_work_pack(&ctx, &id).await?;
    if count > 0 {
        state.budget_service.forget_budget(&ctx, &id);
    }
    deleted(count)
}

async fn add_line_item(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWorkPackItem>,
) -> ApiResult<(StatusCode, Json<WorkPackItem>)> {
    let item = state
        .work_pack_service
        .add_line_item(&ctx, &id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_line_item(
    Org(ctx): Org,
    Path((id, item_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    deleted(
        state
            .work_pack_service
            .remove_line_item(&ctx, &id, &item_id)
            .await?,
    )
}

async fn record_expense(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWorkPackExpense>,
) -> ApiResult<(StatusCode, Json<WorkPackExpense>)> {
    let expense = state
        .work_pack_service
        .record_expense(&ctx, &id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn remove_expense(
    Org(ctx): Org,
    Path((id, expense_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    deleted(
        state
            .work_pack_service
            .remove_expense(&ctx, &id, &expense_id)
            .await?,
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/work-packs", get(list_work_packs).post(create_work_pack))
        .route(
            "/work-packs/{id}",
            get(get_work_pack)
                .put(update_work_pack)
                .delete(delete_work_pack),
        )
        .route("/work-packs/{id}/items", post(add_line_item))
        .route("/work-packs/{id}/items/{item_id}", delete(remove_line_item))
        .route("/work-packs/{id}/expenses", post(record_expense))
        .route(
            "/work-packs/{id}/expenses/{expense_id}",
            delete(remove_expense),
        )
}
