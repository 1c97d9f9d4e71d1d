use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::budget::budget_aggregator::aggregate;
use crate::budget::budget_errors::BudgetError;
use crate::budget::budget_filter::filter_summaries;
use crate::budget::budget_model::{BudgetFilter, BudgetView, BudgetViewState, WorkPackBudget};
use crate::budget::budget_refresh::BudgetRefresher;
use crate::budget::budget_rollup::{rollup_by_category, rollup_by_vendor};
use crate::budget::budget_traits::{BudgetServiceTrait, BudgetSourceTrait};
use crate::context::OrgContext;
use crate::errors::{Error, Result};

fn fetch_failure(source_name: &str, err: Error) -> Error {
    if err.is_not_found() {
        return err;
    }
    BudgetError::FetchFailed {
        source_name: source_name.to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Fetches both inputs concurrently and aggregates them.
///
/// The aggregator only runs when both fetches succeed.
pub async fn load_work_pack_budget(
    source: &dyn BudgetSourceTrait,
    ctx: &OrgContext,
    work_pack_id: &str,
) -> Result<WorkPackBudget> {
    let line_items = async {
        source
            .fetch_budget_line_items(ctx, work_pack_id)
            .await
            .map_err(|e| fetch_failure("line items", e))
    };
    let expenses = async {
        source
            .fetch_budget_expenses(ctx, work_pack_id)
            .await
            .map_err(|e| fetch_failure("expenses", e))
    };
    let (line_items, expenses) = futures::try_join!(line_items, expenses)?;

    Ok(aggregate(&line_items, &expenses))
}

pub struct BudgetService {
    source: Arc<dyn BudgetSourceTrait>,
    refresher: BudgetRefresher,
}

impl BudgetService {
    pub fn new(source: Arc<dyn BudgetSourceTrait>) -> Self {
        BudgetService {
            refresher: BudgetRefresher::new(source.clone()),
            source,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn get_work_pack_budget(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<WorkPackBudget> {
        load_work_pack_budget(self.source.as_ref(), ctx, work_pack_id).await
    }

    async fn get_budget_view(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        filter: &BudgetFilter,
    ) -> Result<BudgetView> {
        debug!("Building budget view for work pack {}", work_pack_id);
        let budget = load_work_pack_budget(self.source.as_ref(), ctx, work_pack_id).await?;

        Ok(BudgetView {
            work_pack_id: work_pack_id.to_string(),
            cost_codes: filter_summaries(&budget.cost_codes, filter),
            categories: rollup_by_category(&budget.cost_codes),
            vendors: rollup_by_vendor(&budget.cost_codes),
            summary: budget.summary,
            adjustments: budget.adjustments,
        })
    }

    async fn refresh_budget(&self, ctx: &OrgContext, work_pack_id: &str) -> BudgetViewState {
        self.refresher.refresh(ctx, work_pack_id).await
    }

    fn get_budget_state(&self, ctx: &OrgContext, work_pack_id: &str) -> BudgetViewState {
        self.refresher.state(ctx, work_pack_id)
    }

    fn forget_budget(&self, ctx: &OrgContext, work_pack_id: &str) {
        self.refresher.forget(ctx, work_pack_id);
    }
}
