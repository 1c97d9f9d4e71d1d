//! Cost code domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Domain model representing a cost code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostCode {
    pub id: String,
    pub organization_id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating or updating a cost code
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCostCode {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
}

impl NewCostCode {
    /// Trims every field and rejects blank code or name.
    pub fn normalized(self) -> Result<Self> {
        let code = self.code.trim().to_string();
        let name = self.name.trim().to_string();
        if code.is_empty() {
            return Err(ValidationError::MissingField("code".to_string()).into());
        }
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(Self {
            code,
            name,
            category,
        })
    }
}
