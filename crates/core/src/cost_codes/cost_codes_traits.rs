use crate::context::OrgContext;
use crate::cost_codes::cost_codes_model::{CostCode, NewCostCode};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for cost code repository operations
#[async_trait]
pub trait CostCodeRepositoryTrait: Send + Sync {
    fn list_cost_codes(&self, ctx: &OrgContext) -> Result<Vec<CostCode>>;
    fn get_cost_code(&self, ctx: &OrgContext, cost_code_id: &str) -> Result<CostCode>;
    async fn create_cost_code(&self, ctx: &OrgContext, new_cost_code: NewCostCode)
        -> Result<CostCode>;
    async fn update_cost_code(
        &self,
        ctx: &OrgContext,
        cost_code_id: &str,
        update: NewCostCode,
    ) -> Result<CostCode>;
    async fn delete_cost_code(&self, ctx: &OrgContext, cost_code_id: &str) -> Result<usize>;
}

/// Trait for cost code service operations
#[async_trait]
pub trait CostCodeServiceTrait: Send + Sync {
    fn get_cost_codes(&self, ctx: &OrgContext) -> Result<Vec<CostCode>>;
    async fn create_cost_code(&self, ctx: &OrgContext, new_cost_code: NewCostCode)
        -> Result<CostCode>;
    async fn update_cost_code(
        &self,
        ctx: &OrgContext,
        cost_code_id: &str,
        update: NewCostCode,
    ) -> Result<CostCode>;
    async fn delete_cost_code(&self, ctx: &OrgContext, cost_code_id: &str) -> Result<usize>;
}
