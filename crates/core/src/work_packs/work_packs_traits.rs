use crate::context::OrgContext;
use crate::errors::Result;
use crate::work_packs::work_packs_model::{
    NewWorkPack, NewWorkPackExpense, NewWorkPackItem, WorkPack, WorkPackExpense, WorkPackItem,
};
use async_trait::async_trait;

/// Trait for work pack repository operations
#[async_trait]
pub trait WorkPackRepositoryTrait: Send + Sync {
    fn list_work_packs(&self, ctx: &OrgContext) -> Result<Vec<WorkPack>>;
    fn get_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<WorkPack>;
    async fn create_work_pack(&self, ctx: &OrgContext, new_work_pack: NewWorkPack)
        -> Result<WorkPack>;
    async fn update_work_pack(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        update: NewWorkPack,
    ) -> Result<WorkPack>;
    /// Deletes the work pack together with its items and expenses.
    async fn delete_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<usize>;

    async fn insert_item(
        &self,
        work_pack_id: &str,
        new_item: NewWorkPackItem,
    ) -> Result<WorkPackItem>;
    async fn delete_item(&self, work_pack_id: &str, item_id: &str) -> Result<usize>;
    async fn insert_expense(
        &self,
        work_pack_id: &str,
        new_expense: NewWorkPackExpense,
    ) -> Result<WorkPackExpense>;
    async fn delete_expense(&self, work_pack_id: &str, expense_id: &str) -> Result<usize>;
}

/// Trait for work pack service operations
#[async_trait]
pub trait WorkPackServiceTrait: Send + Sync {
    fn get_work_packs(&self, ctx: &OrgContext) -> Result<Vec<WorkPack>>;
    fn get_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<WorkPack>;
    async fn create_work_pack(&self, ctx: &OrgContext, new_work_pack: NewWorkPack)
        -> Result<WorkPack>;
    async fn update_work_pack(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        update: NewWorkPack,
    ) -> Result<WorkPack>;
    async fn delete_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<usize>;

    async fn add_line_item(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        new_item: NewWorkPackItem,
    ) -> Result<WorkPackItem>;
    async fn remove_line_item(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        item_id: &str,
    ) -> Result<usize>;
    async fn record_expense(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        new_expense: NewWorkPackExpense,
    ) -> Result<WorkPackExpense>;
    async fn remove_expense(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        expense_id: &str,
    ) -> Result<usize>;
}
