use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::MAX_INPUT_VALUE;
use crate::context::OrgContext;
use crate::cost_codes::CostCodeRepositoryTrait;
use crate::errors::{Result, ValidationError};

use super::work_packs_model::{
    NewWorkPack, NewWorkPackExpense, NewWorkPackItem, WorkPack, WorkPackExpense, WorkPackItem,
};
use super::work_packs_traits::{WorkPackRepositoryTrait, WorkPackServiceTrait};

pub struct WorkPackService {
    repository: Arc<dyn WorkPackRepositoryTrait>,
    cost_code_repository: Arc<dyn CostCodeRepositoryTrait>,
}

fn required(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(trimmed)
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn bounded(value: Decimal, field: &str) -> Result<Decimal> {
    if value < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "{} must not be negative (got {})",
            field, value
        ))
        .into());
    }
    if value > Decimal::from(MAX_INPUT_VALUE) {
        return Err(ValidationError::InvalidInput(format!(
            "{} must not exceed {} (got {})",
            field, MAX_INPUT_VALUE, value
        ))
        .into());
    }
    Ok(value)
}

impl WorkPackService {
    pub fn new(
        repository: Arc<dyn WorkPackRepositoryTrait>,
        cost_code_repository: Arc<dyn CostCodeRepositoryTrait>,
    ) -> Self {
        WorkPackService {
            repository,
            cost_code_repository,
        }
    }

    fn normalize_work_pack(new_work_pack: NewWorkPack) -> Result<NewWorkPack> {
        Ok(NewWorkPack {
            name: required(new_work_pack.name, "name")?,
            description: optional(new_work_pack.description),
        })
    }

    /// Blank ids mean "no cost code"; anything else must name a cost code of the
    /// same organization.
    fn resolve_cost_code(
        &self,
        ctx: &OrgContext,
        cost_code_id: Option<String>,
    ) -> Result<Option<String>> {
        let Some(cost_code_id) = optional(cost_code_id) else {
            return Ok(None);
        };
        match self.cost_code_repository.get_cost_code(ctx, &cost_code_id) {
            Ok(cost_code) => Ok(Some(cost_code.id)),
            Err(e) if e.is_not_found() => {
                warn!(
                    "Rejecting unknown cost code {} for organization {}",
                    cost_code_id,
                    ctx.organization_id()
                );
                Err(ValidationError::InvalidInput(format!("Unknown cost code {}", cost_code_id)).into())
            }
            Err(e) => Err(e),
        }
    }

    /// Fails unless the work pack exists within the caller's organization.
    fn ensure_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<()> {
        self.repository.get_work_pack(ctx, work_pack_id).map(|_| ())
    }
}

#[async_trait]
impl WorkPackServiceTrait for WorkPackService {
    fn get_work_packs(&self, ctx: &OrgContext) -> Result<Vec<WorkPack>> {
        self.repository.list_work_packs(ctx)
    }

    fn get_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<WorkPack> {
        self.repository.get_work_pack(ctx, work_pack_id)
    }

    async fn create_work_pack(
        &self,
        ctx: &OrgContext,
        new_work_pack: NewWorkPack,
    ) -> Result<WorkPack> {
        let new_work_pack = Self::normalize_work_pack(new_work_pack)?;
        self.repository.create_work_pack(ctx, new_work_pack).await
    }

    async fn update_work_pack(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        update: NewWorkPack,
    ) -> Result<WorkPack> {
        let update = Self::normalize_work_pack(update)?;
        self.repository
            .update_work_pack(ctx, work_pack_id, update)
            .await
    }

    async fn delete_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<usize> {
        debug!("Deleting work pack {}", work_pack_id);
        self.repository.delete_work_pack(ctx, work_pack_id).await
    }

    async fn add_line_item(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        new_item: NewWorkPackItem,
    ) -> Result<WorkPackItem> {
        self.ensure_work_pack(ctx, work_pack_id)?;
        let new_item = NewWorkPackItem {
            cost_code_id: self.resolve_cost_code(ctx, new_item.cost_code_id)?,
            line_item_name: required(new_item.line_item_name, "lineItemName")?,
            quantity: bounded(new_item.quantity, "quantity")?,
            unit_price: bounded(new_item.unit_price, "unitPrice")?,
            unit: optional(new_item.unit),
        };
        self.repository.insert_item(work_pack_id, new_item).await
    }

    async fn remove_line_item(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        item_id: &str,
    ) -> Result<usize> {
        self.ensure_work_pack(ctx, work_pack_id)?;
        self.repository.delete_item(work_pack_id, item_id).await
    }

    async fn record_expense(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        new_expense: NewWorkPackExpense,
    ) -> Result<WorkPackExpense> {
        self.ensure_work_pack(ctx, work_pack_id)?;
        let new_expense = NewWorkPackExpense {
            cost_code_id: self.resolve_cost_code(ctx, new_expense.cost_code_id)?,
            description: required(new_expense.description, "description")?,
            amount: bounded(new_expense.amount, "amount")?,
            category: required(new_expense.category, "category")?,
            vendor: optional(new_expense.vendor),
            expense_date: new_expense.expense_date,
        };
        self.repository
            .insert_expense(work_pack_id, new_expense)
            .await
    }

    async fn remove_expense(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        expense_id: &str,
    ) -> Result<usize> {
        self.ensure_work_pack(ctx, work_pack_id)?;
        self.repository
            .delete_expense(work_pack_id, expense_id)
            .await
    }
}
