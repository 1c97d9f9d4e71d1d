use std::sync::Arc;

use crate::config::Config;
use buildledger_core::{
    budget::{BudgetService, BudgetServiceTrait},
    cost_codes::{CostCodeService, CostCodeServiceTrait},
    work_packs::{WorkPackService, WorkPackServiceTrait},
};
use buildledger_storage_sqlite::{
    cost_codes::CostCodeRepository,
    db::{self, write_actor},
    work_packs::WorkPackRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub cost_code_service: Arc<dyn CostCodeServiceTrait>,
    pub work_pack_service: Arc<dyn WorkPackServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub default_currency: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("BL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let cost_code_repository = Arc::new(CostCodeRepository::new(pool.clone(), writer.clone()));
    let work_pack_repository = Arc::new(WorkPackRepository::new(pool.clone(), writer));

    let cost_code_service = Arc::new(CostCodeService::new(cost_code_repository.clone()));
    let work_pack_service = Arc::new(WorkPackService::new(
        work_pack_repository.clone(),
        cost_code_repository,
    ));
    let budget_service = Arc::new(BudgetService::new(work_pack_repository));

    Ok(Arc::new(AppState {
        cost_code_service,
        work_pack_service,
        budget_service,
        default_currency: config.default_currency.clone(),
    }))
}
