use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use buildledger_core::budget::{ActualExpense, BudgetError, BudgetLineItem, BudgetSourceTrait};
use buildledger_core::{OrgContext, Result};

use super::model::{parse_optional_decimal, WorkPackExpenseDB, WorkPackItemDB};
use super::repository::WorkPackRepository;
use crate::errors::IntoCore;
use crate::schema::{cost_codes, work_pack_expenses, work_pack_items};

/// Cost code columns carried next to each item or expense: name, code, category.
type CostCodeColumns = (Option<String>, Option<String>, Option<String>);

impl WorkPackRepository {
    fn ensure_in_organization(
        conn: &mut SqliteConnection,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<()> {
        match Self::find_work_pack(conn, ctx, work_pack_id)? {
            Some(_) => Ok(()),
            None => Err(BudgetError::WorkPackNotFound(work_pack_id.to_string()).into()),
        }
    }
}

#[async_trait]
impl BudgetSourceTrait for WorkPackRepository {
    async fn fetch_budget_line_items(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<Vec<BudgetLineItem>> {
        let mut conn = self.connection()?;
        Self::ensure_in_organization(&mut conn, ctx, work_pack_id)?;

        let rows = work_pack_items::table
            .left_join(cost_codes::table)
            .filter(work_pack_items::work_pack_id.eq(work_pack_id))
            .order((work_pack_items::created_at.asc(), work_pack_items::id.asc()))
            .select((
                WorkPackItemDB::as_select(),
                cost_codes::name.nullable(),
                cost_codes::code.nullable(),
                cost_codes::category.nullable(),
            ))
            .load::<(WorkPackItemDB, Option<String>, Option<String>, Option<String>)>(&mut conn)
            .into_core()?;

        Ok(rows
            .into_iter()
            .map(|(item, name, code, category)| line_item_from_row(item, (name, code, category)))
            .collect())
    }

    async fn fetch_budget_expenses(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<Vec<ActualExpense>> {
        let mut conn = self.connection()?;
        Self::ensure_in_organization(&mut conn, ctx, work_pack_id)?;

        let rows = work_pack_expenses::table
            .left_join(cost_codes::table)
            .filter(work_pack_expenses::work_pack_id.eq(work_pack_id))
            .order((
                work_pack_expenses::created_at.asc(),
                work_pack_expenses::id.asc(),
            ))
            .select((
                WorkPackExpenseDB::as_select(),
                cost_codes::name.nullable(),
                cost_codes::code.nullable(),
                cost_codes::category.nullable(),
            ))
            .load::<(WorkPackExpenseDB, Option<String>, Option<String>, Option<String>)>(
                &mut conn,
            )
            .into_core()?;

        Ok(rows
            .into_iter()
            .map(|(expense, name, code, category)| {
                expense_from_row(expense, (name, code, category))
            })
            .collect())
    }
}

/// Parses a nullable stored decimal. Unreadable text yields `None` and records
/// `field` in `unreadable`, so the aggregator can tell it apart from a missing value.
fn read_decimal(
    raw: Option<&str>,
    field: &str,
    record_id: &str,
    unreadable: &mut Vec<String>,
) -> Option<Decimal> {
    let value = parse_optional_decimal(raw, field, record_id);
    if raw.is_some() && value.is_none() {
        unreadable.push(field.to_string());
    }
    value
}

fn line_item_from_row(item: WorkPackItemDB, cost_code: CostCodeColumns) -> BudgetLineItem {
    let (cost_code_name, cost_code_number, cost_code_category) = cost_code;
    let mut unreadable_fields = Vec::new();
    let quantity = read_decimal(
        item.quantity.as_deref(),
        "quantity",
        &item.id,
        &mut unreadable_fields,
    );
    let price = read_decimal(
        item.unit_price.as_deref(),
        "price",
        &item.id,
        &mut unreadable_fields,
    );
    BudgetLineItem {
        quantity,
        price,
        unreadable_fields,
        id: item.id,
        cost_code_id: item.cost_code_id,
        cost_code_name,
        cost_code_number,
        cost_code_category,
        line_item_name: item.line_item_name,
        unit: item.unit,
    }
}

fn expense_from_row(expense: WorkPackExpenseDB, cost_code: CostCodeColumns) -> ActualExpense {
    let (cost_code_name, cost_code_number, cost_code_category) = cost_code;
    let mut unreadable_fields = Vec::new();
    let amount = read_decimal(
        Some(expense.amount.as_str()),
        "amount",
        &expense.id,
        &mut unreadable_fields,
    );
    ActualExpense {
        amount: amount.unwrap_or_default(),
        unreadable_fields,
        id: expense.id,
        cost_code_id: expense.cost_code_id,
        cost_code_name,
        cost_code_number,
        cost_code_category,
        description: expense.description,
        category: expense.category,
        vendor: expense.vendor,
    }
}
