//! Budget reconciliation: planned line items versus recorded expenses, per cost code.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, warn};
use num_traits::Zero;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{
    DEFAULT_COST_CODE_CATEGORY, NO_COST_CODE_CATEGORY, NO_COST_CODE_ID, NO_COST_CODE_NAME,
};

use super::budget_model::{
    ActualExpense, AdjustmentReason, AdjustmentSource, BudgetAdjustment, BudgetLineItem,
    BudgetSummary, CostCodeBudgetSummary, PricedLineItem, WorkPackBudget,
};

/// Bucket identity. `Unassigned` never collides with a real cost code id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BucketKey {
    CostCode(String),
    Unassigned,
}

impl BucketKey {
    fn from_cost_code_id(cost_code_id: Option<&str>) -> Self {
        match cost_code_id.map(str::trim) {
            Some(id) if !id.is_empty() => BucketKey::CostCode(id.to_string()),
            _ => BucketKey::Unassigned,
        }
    }
}

/// Cost-code attributes carried on an input record.
struct CostCodeSeed<'a> {
    name: Option<&'a str>,
    number: Option<&'a str>,
    category: Option<&'a str>,
}

impl<'a> From<&'a BudgetLineItem> for CostCodeSeed<'a> {
    fn from(item: &'a BudgetLineItem) -> Self {
        Self {
            name: item.cost_code_name.as_deref(),
            number: item.cost_code_number.as_deref(),
            category: item.cost_code_category.as_deref(),
        }
    }
}

impl<'a> From<&'a ActualExpense> for CostCodeSeed<'a> {
    fn from(expense: &'a ActualExpense) -> Self {
        Self {
            name: expense.cost_code_name.as_deref(),
            number: expense.cost_code_number.as_deref(),
            category: expense.cost_code_category.as_deref(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn empty_bucket(key: &BucketKey, seed: CostCodeSeed<'_>) -> CostCodeBudgetSummary {
    let (cost_code_id, cost_code_name, cost_code_number, category) = match key {
        BucketKey::Unassigned => (
            NO_COST_CODE_ID.to_string(),
            NO_COST_CODE_NAME.to_string(),
            String::new(),
            NO_COST_CODE_CATEGORY.to_string(),
        ),
        BucketKey::CostCode(id) => {
            let number = non_blank(seed.number).unwrap_or_default().to_string();
            let name = non_blank(seed.name)
                .map(str::to_string)
                .unwrap_or_else(|| id.clone());
            let category = non_blank(seed.category)
                .unwrap_or(DEFAULT_COST_CODE_CATEGORY)
                .to_string();
            (id.clone(), name, number, category)
        }
    };

    CostCodeBudgetSummary {
        cost_code_id,
        cost_code_name,
        cost_code_number,
        category,
        budget_amount: Decimal::ZERO,
        actual_amount: Decimal::ZERO,
        variance: Decimal::ZERO,
        variance_percentage: Decimal::ZERO,
        is_over_budget: false,
        item_count: 0,
        expense_count: 0,
        items: Vec::new(),
        expenses: Vec::new(),
    }
}

/// Returns the value usable in a sum. Negative values clamp to zero; missing
/// and unreadable values count as zero. Each case is recorded in `adjustments`.
fn sanitize(
    value: Option<Decimal>,
    unreadable: bool,
    record_id: &str,
    source: AdjustmentSource,
    field: &str,
    adjustments: &mut Vec<BudgetAdjustment>,
) -> Decimal {
    let mut flag = |original: Option<Decimal>, reason: AdjustmentReason| {
        adjustments.push(BudgetAdjustment {
            record_id: record_id.to_string(),
            source,
            field: field.to_string(),
            original,
            reason,
        });
        Decimal::ZERO
    };

    match value {
        _ if unreadable => flag(None, AdjustmentReason::Unreadable),
        Some(v) if v >= Decimal::ZERO => v,
        Some(v) => {
            warn!(
                "Clamping negative {} {} on {:?} {} to zero",
                field, v, source, record_id
            );
            flag(Some(v), AdjustmentReason::Negative)
        }
        None => flag(None, AdjustmentReason::Missing),
    }
}

/// Adds `value` to `total`, capping at `Decimal::MAX`. A capped sum is recorded
/// against the record whose value pushed it over.
fn accumulate(
    total: &mut Decimal,
    value: Decimal,
    record_id: &str,
    source: AdjustmentSource,
    field: &str,
    adjustments: &mut Vec<BudgetAdjustment>,
) {
    *total = match total.checked_add(value) {
        Some(sum) => sum,
        None => {
            warn!(
                "{} overflowed adding {} from {:?} {}; capping at maximum",
                field, value, source, record_id
            );
            adjustments.push(BudgetAdjustment {
                record_id: record_id.to_string(),
                source,
                field: field.to_string(),
                original: Some(value),
                reason: AdjustmentReason::Overflow,
            });
            Decimal::MAX
        }
    };
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Variance as a percentage of `budget`, zero when there is no budget.
///
/// Kept at full precision; callers round for display. A ratio too large to
/// represent is capped at `Decimal::MAX` (or `MIN` for a negative variance).
pub fn variance_percentage(variance: Decimal, budget: Decimal) -> Decimal {
    if budget <= Decimal::zero() {
        return Decimal::zero();
    }
    variance
        .checked_div(budget)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(if variance.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Ascending cost-code number; rows without a number after numbered rows,
/// the unassigned bucket last, ties broken by id.
fn compare_buckets(
    (key_a, a): &(BucketKey, CostCodeBudgetSummary),
    (key_b, b): &(BucketKey, CostCodeBudgetSummary),
) -> Ordering {
    let rank = |key: &BucketKey, s: &CostCodeBudgetSummary| match key {
        BucketKey::Unassigned => 2,
        BucketKey::CostCode(_) if s.cost_code_number.is_empty() => 1,
        BucketKey::CostCode(_) => 0,
    };
    rank(key_a, a)
        .cmp(&rank(key_b, b))
        .then_with(|| a.cost_code_number.cmp(&b.cost_code_number))
        .then_with(|| a.cost_code_id.cmp(&b.cost_code_id))
}

/// Groups line items and expenses by cost code and annotates each bucket and the
/// whole work pack with variance figures.
///
/// Pure: inputs are only read, and repeated calls with the same inputs yield
/// identical output.
pub fn aggregate(line_items: &[BudgetLineItem], expenses: &[ActualExpense]) -> WorkPackBudget {
    let mut buckets: HashMap<BucketKey, CostCodeBudgetSummary> = HashMap::new();
    let mut adjustments = Vec::new();

    for item in line_items {
        let unreadable = |field: &str| item.unreadable_fields.iter().any(|f| f == field);
        let quantity = sanitize(
            item.quantity,
            unreadable("quantity"),
            &item.id,
            AdjustmentSource::LineItem,
            "quantity",
            &mut adjustments,
        );
        let price = sanitize(
            item.price,
            unreadable("price"),
            &item.id,
            AdjustmentSource::LineItem,
            "price",
            &mut adjustments,
        );
        let total = quantity.checked_mul(price).unwrap_or_else(|| {
            warn!(
                "Line total of {} x {} on line item {} overflowed; capping at maximum",
                quantity, price, item.id
            );
            adjustments.push(BudgetAdjustment {
                record_id: item.id.clone(),
                source: AdjustmentSource::LineItem,
                field: "total".to_string(),
                original: None,
                reason: AdjustmentReason::Overflow,
            });
            Decimal::MAX
        });

        let key = BucketKey::from_cost_code_id(item.cost_code_id.as_deref());
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| empty_bucket(&key, CostCodeSeed::from(item)));

        accumulate(
            &mut bucket.budget_amount,
            total,
            &item.id,
            AdjustmentSource::LineItem,
            "budgetAmount",
            &mut adjustments,
        );
        bucket.item_count += 1;
        bucket.items.push(PricedLineItem {
            id: item.id.clone(),
            line_item_name: item.line_item_name.clone(),
            quantity,
            price,
            unit: item.unit_or_default().to_string(),
            total,
        });
    }

    for expense in expenses {
        let amount = sanitize(
            Some(expense.amount),
            expense.unreadable_fields.iter().any(|f| f == "amount"),
            &expense.id,
            AdjustmentSource::Expense,
            "amount",
            &mut adjustments,
        );

        let key = BucketKey::from_cost_code_id(expense.cost_code_id.as_deref());
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| empty_bucket(&key, CostCodeSeed::from(expense)));

        accumulate(
            &mut bucket.actual_amount,
            amount,
            &expense.id,
            AdjustmentSource::Expense,
            "actualAmount",
            &mut adjustments,
        );
        bucket.expense_count += 1;
        bucket.expenses.push(ActualExpense {
            amount,
            ..expense.clone()
        });
    }

    let mut rows: Vec<(BucketKey, CostCodeBudgetSummary)> = buckets.into_iter().collect();
    rows.sort_by(compare_buckets);

    let cost_codes: Vec<CostCodeBudgetSummary> = rows
        .into_iter()
        .map(|(_, mut bucket)| {
            bucket.variance = bucket.actual_amount - bucket.budget_amount;
            bucket.variance_percentage = variance_percentage(bucket.variance, bucket.budget_amount);
            bucket.is_over_budget = bucket.actual_amount > bucket.budget_amount;
            bucket
        })
        .collect();

    let total_budget = saturating_sum(cost_codes.iter().map(|c| c.budget_amount));
    let total_actual = saturating_sum(cost_codes.iter().map(|c| c.actual_amount));
    let variance = total_actual - total_budget;

    let summary = BudgetSummary {
        total_budget,
        total_actual,
        variance,
        variance_percentage: variance_percentage(variance, total_budget),
        items_count: line_items.len(),
        cost_codes_count: cost_codes.len(),
    };

    debug!(
        "Aggregated {} line items and {} expenses into {} cost code buckets",
        line_items.len(),
        expenses.len(),
        cost_codes.len()
    );

    WorkPackBudget {
        cost_codes,
        summary,
        adjustments,
    }
}
