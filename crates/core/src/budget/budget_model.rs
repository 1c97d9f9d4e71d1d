//! Budget domain models.
//!
//! Inputs (`BudgetLineItem`, `ActualExpense`) are read-only snapshots delivered by a
//! [`BudgetSourceTrait`](super::BudgetSourceTrait). Everything else here is derived
//! on each aggregation pass and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_UNIT;

/// A planned component of a work pack, joined with its cost code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineItem {
    pub id: String,
    pub cost_code_id: Option<String>,
    pub cost_code_name: Option<String>,
    pub cost_code_number: Option<String>,
    pub cost_code_category: Option<String>,
    pub line_item_name: String,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub unit: Option<String>,
    /// Fields whose stored value could not be read (`quantity`, `price`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable_fields: Vec<String>,
}

impl BudgetLineItem {
    pub fn unit_or_default(&self) -> &str {
        self.unit
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_UNIT)
    }

    /// Quantity times price, treating a missing value as zero and capping at
    /// `Decimal::MAX`.
    pub fn line_total(&self) -> Decimal {
        self.quantity
            .unwrap_or(Decimal::ZERO)
            .saturating_mul(self.price.unwrap_or(Decimal::ZERO))
    }
}

/// A recorded cost against a work pack, joined with its cost code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualExpense {
    pub id: String,
    pub cost_code_id: Option<String>,
    pub cost_code_name: Option<String>,
    pub cost_code_number: Option<String>,
    pub cost_code_category: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub vendor: Option<String>,
    /// Fields whose stored value could not be read (`amount`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable_fields: Vec<String>,
}

/// A line item as it contributed to a bucket, with sanitized figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLineItem {
    pub id: String,
    pub line_item_name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub unit: String,
    pub total: Decimal,
}

/// Per-cost-code output row of the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCodeBudgetSummary {
    pub cost_code_id: String,
    pub cost_code_name: String,
    pub cost_code_number: String,
    pub category: String,
    pub budget_amount: Decimal,
    pub actual_amount: Decimal,
    pub variance: Decimal,
    pub variance_percentage: Decimal,
    pub is_over_budget: bool,
    pub item_count: usize,
    pub expense_count: usize,
    pub items: Vec<PricedLineItem>,
    pub expenses: Vec<ActualExpense>,
}

/// Global rollup across every bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: Decimal,
    pub total_actual: Decimal,
    pub variance: Decimal,
    pub variance_percentage: Decimal,
    pub items_count: usize,
    pub cost_codes_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentSource {
    LineItem,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentReason {
    /// The value was below zero and was clamped.
    Negative,
    /// The value was absent and counted as zero.
    Missing,
    /// The stored value could not be read and counted as zero.
    Unreadable,
    /// The result did not fit in a `Decimal` and was capped at the maximum.
    Overflow,
}

/// Records an input value the aggregator did not use as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAdjustment {
    pub record_id: String,
    pub source: AdjustmentSource,
    pub field: String,
    pub original: Option<Decimal>,
    pub reason: AdjustmentReason,
}

/// Complete output of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackBudget {
    pub cost_codes: Vec<CostCodeBudgetSummary>,
    pub summary: BudgetSummary,
    pub adjustments: Vec<BudgetAdjustment>,
}

/// Budget and spend grouped by the free-form cost-code category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRollup {
    pub category: String,
    pub budget_amount: Decimal,
    pub actual_amount: Decimal,
    pub variance: Decimal,
    pub cost_code_count: usize,
}

/// Actual spend grouped by vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRollup {
    pub vendor: String,
    pub actual_amount: Decimal,
    pub expense_count: usize,
}

/// Search and category selection applied to budget rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// What the budget screen renders: filtered rows plus unfiltered rollups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    pub work_pack_id: String,
    pub cost_codes: Vec<CostCodeBudgetSummary>,
    pub summary: BudgetSummary,
    pub categories: Vec<CategoryRollup>,
    pub vendors: Vec<VendorRollup>,
    pub adjustments: Vec<BudgetAdjustment>,
}

/// Latest known state of a budget screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BudgetViewState {
    Idle,
    #[serde(rename_all = "camelCase")]
    Loading { request_id: u64 },
    #[serde(rename_all = "camelCase")]
    Loaded {
        request_id: u64,
        budget: WorkPackBudget,
    },
    #[serde(rename_all = "camelCase")]
    LoadFailed { request_id: u64, message: String },
}

impl BudgetViewState {
    pub fn request_id(&self) -> Option<u64> {
        match self {
            BudgetViewState::Idle => None,
            BudgetViewState::Loading { request_id }
            | BudgetViewState::Loaded { request_id, .. }
            | BudgetViewState::LoadFailed { request_id, .. } => Some(*request_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, BudgetViewState::Loading { .. })
    }
}
