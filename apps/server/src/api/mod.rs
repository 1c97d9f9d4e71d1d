use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
    routing::get,
    Router,
};
use buildledger_core::OrgContext;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiError, main_lib::AppState};

mod budget;
mod cost_codes;
mod work_packs;

/// Header carrying the caller's organization.
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// Organization of the current request, read from `X-Organization-Id`.
pub struct Org(pub OrgContext);

impl<S> FromRequestParts<S> for Org
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ORGANIZATION_HEADER)
            .ok_or_else(|| ApiError::BadRequest("Missing X-Organization-Id header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::BadRequest("Invalid X-Organization-Id header".to_string()))?;
        Ok(Org(OrgContext::new(value)?))
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin {}", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(cost_codes::router())
        .merge(work_packs::router())
        .merge(budget::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
