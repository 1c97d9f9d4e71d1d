//! Database models for cost codes.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use buildledger_core::cost_codes::CostCode;

/// Database model for cost codes
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::cost_codes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CostCodeDB {
    pub id: String,
    pub organization_id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for inserting a cost code
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::cost_codes)]
pub struct NewCostCodeDB {
    pub id: String,
    pub organization_id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CostCodeDB> for CostCode {
    fn from(db: CostCodeDB) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            code: db.code,
            name: db.name,
            category: db.category,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
