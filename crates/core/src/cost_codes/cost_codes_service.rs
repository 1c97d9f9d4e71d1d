use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::context::OrgContext;
use crate::errors::Result;

use super::cost_codes_model::{CostCode, NewCostCode};
use super::cost_codes_traits::{CostCodeRepositoryTrait, CostCodeServiceTrait};

pub struct CostCodeService {
    repository: Arc<dyn CostCodeRepositoryTrait>,
}

impl CostCodeService {
    pub fn new(repository: Arc<dyn CostCodeRepositoryTrait>) -> Self {
        CostCodeService { repository }
    }
}

#[async_trait]
impl CostCodeServiceTrait for CostCodeService {
    fn get_cost_codes(&self, ctx: &OrgContext) -> Result<Vec<CostCode>> {
        let mut cost_codes = self.repository.list_cost_codes(ctx)?;
        cost_codes.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(cost_codes)
    }

    async fn create_cost_code(
        &self,
        ctx: &OrgContext,
        new_cost_code: NewCostCode,
    ) -> Result<CostCode> {
        let new_cost_code = new_cost_code.normalized()?;
        debug!(
            "Creating cost code {} for organization {}",
            new_cost_code.code,
            ctx.organization_id()
        );
        self.repository.create_cost_code(ctx, new_cost_code).await
    }

    async fn update_cost_code(
        &self,
        ctx: &OrgContext,
        cost_code_id: &str,
        update: NewCostCode,
    ) -> Result<CostCode> {
        let update = update.normalized()?;
        self.repository
            .update_cost_code(ctx, cost_code_id, update)
            .await
    }

    async fn delete_cost_code(&self, ctx: &OrgContext, cost_code_id: &str) -> Result<usize> {
        self.repository.delete_cost_code(ctx, cost_code_id).await
    }
}
