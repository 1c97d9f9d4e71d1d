//! Database models for work packs.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;

use buildledger_core::constants::DEFAULT_UNIT;
use buildledger_core::work_packs::{WorkPack, WorkPackExpense, WorkPackItem};

/// Database model for work packs
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::work_packs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkPackDB {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::work_packs)]
pub struct NewWorkPackDB {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for work pack line items. Decimals are stored as TEXT.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::work_pack_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkPackItemDB {
    pub id: String,
    pub work_pack_id: String,
    pub cost_code_id: Option<String>,
    pub line_item_name: String,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub unit: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Database model for work pack expenses
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::work_pack_expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkPackExpenseDB {
    pub id: String,
    pub work_pack_id: String,
    pub cost_code_id: Option<String>,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub vendor: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

/// Parses a stored decimal, or `None` when the text is unreadable.
pub(crate) fn parse_decimal(raw: &str, field: &str, record_id: &str) -> Option<Decimal> {
    match Decimal::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Unreadable {} '{}' on record {}: {}",
                field, raw, record_id, e
            );
            None
        }
    }
}

pub(crate) fn parse_optional_decimal(
    raw: Option<&str>,
    field: &str,
    record_id: &str,
) -> Option<Decimal> {
    raw.and_then(|value| parse_decimal(value, field, record_id))
}

impl From<WorkPackDB> for WorkPack {
    fn from(db: WorkPackDB) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            name: db.name,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<WorkPackItemDB> for WorkPackItem {
    fn from(db: WorkPackItemDB) -> Self {
        let quantity = parse_optional_decimal(db.quantity.as_deref(), "quantity", &db.id);
        let unit_price = parse_optional_decimal(db.unit_price.as_deref(), "price", &db.id);
        Self {
            quantity: quantity.unwrap_or_default(),
            unit_price: unit_price.unwrap_or_default(),
            unit: db.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            id: db.id,
            work_pack_id: db.work_pack_id,
            cost_code_id: db.cost_code_id,
            line_item_name: db.line_item_name,
            created_at: db.created_at,
        }
    }
}

impl From<WorkPackExpenseDB> for WorkPackExpense {
    fn from(db: WorkPackExpenseDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount", &db.id).unwrap_or_default(),
            id: db.id,
            work_pack_id: db.work_pack_id,
            cost_code_id: db.cost_code_id,
            description: db.description,
            category: db.category,
            vendor: db.vendor,
            expense_date: db.expense_date,
            created_at: db.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_keeps_precision() {
        assert_eq!(parse_decimal("12.345", "amount", "exp-1"), Some(dec!(12.345)));
        assert_eq!(parse_decimal(" 7 ", "amount", "exp-1"), Some(dec!(7)));
    }

    #[test]
    fn test_parse_decimal_rejects_unreadable_text() {
        assert_eq!(parse_decimal("twelve", "amount", "exp-1"), None);
        assert_eq!(parse_optional_decimal(Some("1,5"), "quantity", "item-1"), None);
        assert_eq!(parse_optional_decimal(None, "quantity", "item-1"), None);
    }

    #[test]
    fn test_unreadable_expense_amount_converts_to_zero() {
        let expense = WorkPackExpense::from(WorkPackExpenseDB {
            id: "exp-1".to_string(),
            work_pack_id: "wp-1".to_string(),
            cost_code_id: None,
            description: "Legacy".to_string(),
            amount: "n/a".to_string(),
            category: "materials".to_string(),
            vendor: None,
            expense_date: None,
            created_at: chrono::Utc::now().naive_utc(),
        });
        assert_eq!(expense.amount, Decimal::ZERO);
    }
}
