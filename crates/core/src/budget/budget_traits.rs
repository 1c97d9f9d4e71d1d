use crate::budget::budget_model::{
    ActualExpense, BudgetFilter, BudgetLineItem, BudgetView, BudgetViewState, WorkPackBudget,
};
use crate::context::OrgContext;
use crate::errors::Result;
use async_trait::async_trait;

/// Read side of a work pack's budget inputs.
#[async_trait]
pub trait BudgetSourceTrait: Send + Sync {
    /// Planned line items of a work pack, joined with their cost codes.
    async fn fetch_budget_line_items(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<Vec<BudgetLineItem>>;

    /// Recorded expenses of a work pack, joined with their cost codes.
    async fn fetch_budget_expenses(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<Vec<ActualExpense>>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn get_work_pack_budget(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<WorkPackBudget>;

    async fn get_budget_view(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        filter: &BudgetFilter,
    ) -> Result<BudgetView>;

    async fn refresh_budget(&self, ctx: &OrgContext, work_pack_id: &str) -> BudgetViewState;

    fn get_budget_state(&self, ctx: &OrgContext, work_pack_id: &str) -> BudgetViewState;

    /// Discards refresh state kept for a work pack that no longer exists.
    fn forget_budget(&self, ctx: &OrgContext, work_pack_id: &str);
}
