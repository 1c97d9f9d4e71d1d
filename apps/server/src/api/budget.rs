use std::sync::Arc;

use crate::{api::Org, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use buildledger_core::budget::{BudgetFilter, BudgetView, BudgetViewState};
use buildledger_core::utils::money::{format_currency, format_percentage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
struct BudgetQuery {
    search: Option<String>,
    category: Option<String>,
}

/// Totals of the unfiltered summary, rendered in the configured currency. The
/// variance percentage is rounded here; the summary itself keeps full precision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedTotals {
    total_budget: String,
    total_actual: String,
    variance: String,
    variance_percentage: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetViewResponse {
    #[serde(flatten)]
    view: BudgetView,
    currency: String,
    formatted: FormattedTotals,
}

async fn get_budget(
    Org(ctx): Org,
    Path(id): Path<String>,
    Query(query): Query<BudgetQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BudgetViewResponse>> {
    let filter = BudgetFilter::new(query.search, query.category);
    let view = state
        .budget_service
        .get_budget_view(&ctx, &id, &filter)
        .await?;

    let currency = state.default_currency.clone();
    let formatted = FormattedTotals {
        total_budget: format_currency(view.summary.total_budget, &currency),
        total_actual: format_currency(view.summary.total_actual, &currency),
        variance: format_currency(view.summary.variance, &currency),
        variance_percentage: format_percentage(view.summary.variance_percentage),
    };
    Ok(Json(BudgetViewResponse {
        view,
        currency,
        formatted,
    }))
}

async fn refresh_budget(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<BudgetViewState> {
    Json(state.budget_service.refresh_budget(&ctx, &id).await)
}

async fn get_budget_state(
    Org(ctx): Org,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<BudgetViewState> {
    Json(state.budget_service.get_budget_state(&ctx, &id))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/work-packs/{id}/budget", get(get_budget))
        .route("/work-packs/{id}/budget/refresh", post(refresh_budget))
        .route("/work-packs/{id}/budget/state", get(get_budget_state))
}
