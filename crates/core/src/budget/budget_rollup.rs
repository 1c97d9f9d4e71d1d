//! Display rollups over aggregated cost-code rows.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;

use crate::constants::UNSPECIFIED_VENDOR;

use super::budget_model::{CategoryRollup, CostCodeBudgetSummary, VendorRollup};

/// Sums budget and spend per cost-code category, sorted by category name. Sums
/// cap at `Decimal::MAX`, like the aggregator's.
pub fn rollup_by_category(summaries: &[CostCodeBudgetSummary]) -> Vec<CategoryRollup> {
    let mut by_category: BTreeMap<&str, (CategoryRollup, HashSet<&str>)> = BTreeMap::new();

    for summary in summaries {
        let (rollup, cost_code_ids) = by_category
            .entry(summary.category.as_str())
            .or_insert_with(|| {
                (
                    CategoryRollup {
                        category: summary.category.clone(),
                        budget_amount: Decimal::ZERO,
                        actual_amount: Decimal::ZERO,
                        variance: Decimal::ZERO,
                        cost_code_count: 0,
                    },
                    HashSet::new(),
                )
            });
        rollup.budget_amount = rollup.budget_amount.saturating_add(summary.budget_amount);
        rollup.actual_amount = rollup.actual_amount.saturating_add(summary.actual_amount);
        cost_code_ids.insert(summary.cost_code_id.as_str());
    }

    by_category
        .into_values()
        .map(|(mut rollup, cost_code_ids)| {
            rollup.variance = rollup.actual_amount - rollup.budget_amount;
            rollup.cost_code_count = cost_code_ids.len();
            rollup
        })
        .collect()
}

/// Sums actual spend per vendor across every bucket, largest spend first.
pub fn rollup_by_vendor(summaries: &[CostCodeBudgetSummary]) -> Vec<VendorRollup> {
    let mut by_vendor: BTreeMap<&str, VendorRollup> = BTreeMap::new();

    for expense in summaries.iter().flat_map(|s| s.expenses.iter()) {
        let vendor = expense
            .vendor
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNSPECIFIED_VENDOR);
        let entry = by_vendor.entry(vendor).or_insert_with(|| VendorRollup {
            vendor: vendor.to_string(),
            actual_amount: Decimal::ZERO,
            expense_count: 0,
        });
        entry.actual_amount = entry.actual_amount.saturating_add(expense.amount);
        entry.expense_count += 1;
    }

    let mut vendors: Vec<VendorRollup> = by_vendor.into_values().collect();
    // Stable sort keeps vendor-name order among equal amounts.
    vendors.sort_by(|a, b| b.actual_amount.cmp(&a.actual_amount));
    vendors
}
