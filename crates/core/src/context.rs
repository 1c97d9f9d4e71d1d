//! Explicit request context.
//!
//! Every service and repository call receives the organization it acts on
//! instead of reading a "currently selected" organization from shared state.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgContext {
    organization_id: String,
}

impl OrgContext {
    pub fn new(organization_id: impl Into<String>) -> Result<Self> {
        let organization_id = organization_id.into().trim().to_string();
        if organization_id.is_empty() {
            return Err(ValidationError::MissingField("organization_id".to_string()).into());
        }
        Ok(Self { organization_id })
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }
}
