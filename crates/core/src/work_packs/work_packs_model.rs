//! Work pack domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model representing a work pack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkPack {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating or updating a work pack
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkPack {
    pub name: String,
    pub description: Option<String>,
}

/// A planned product or line item of a work pack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackItem {
    pub id: String,
    pub work_pack_id: String,
    pub cost_code_id: Option<String>,
    pub line_item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkPackItem {
    pub cost_code_id: Option<String>,
    pub line_item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit: Option<String>,
}

/// A real cost recorded against a work pack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackExpense {
    pub id: String,
    pub work_pack_id: String,
    pub cost_code_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub vendor: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkPackExpense {
    pub cost_code_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub vendor: Option<String>,
    pub expense_date: Option<NaiveDate>,
}
