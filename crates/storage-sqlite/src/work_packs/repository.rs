use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use buildledger_core::constants::DEFAULT_UNIT;
use buildledger_core::errors::DatabaseError;
use buildledger_core::work_packs::{
    NewWorkPack, NewWorkPackExpense, NewWorkPackItem, WorkPack, WorkPackExpense, WorkPackItem,
    WorkPackRepositoryTrait,
};
use buildledger_core::{OrgContext, Result};

use super::model::{NewWorkPackDB, WorkPackDB, WorkPackExpenseDB, WorkPackItemDB};
use crate::db::{get_connection, DbConnection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{work_pack_expenses, work_pack_items, work_packs};

pub struct WorkPackRepository {
    pub(super) pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

fn work_pack_not_found(work_pack_id: &str) -> buildledger_core::Error {
    DatabaseError::NotFound(format!("Work pack {}", work_pack_id)).into()
}

impl WorkPackRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        WorkPackRepository { pool, writer }
    }

    pub(super) fn connection(&self) -> Result<DbConnection> {
        get_connection(&self.pool)
    }

    /// Looks up a work pack within the organization, `None` when absent.
    pub(super) fn find_work_pack(
        conn: &mut SqliteConnection,
        ctx: &OrgContext,
        work_pack_id: &str,
    ) -> Result<Option<WorkPackDB>> {
        work_packs::table
            .filter(work_packs::id.eq(work_pack_id))
            .filter(work_packs::organization_id.eq(ctx.organization_id()))
            .select(WorkPackDB::as_select())
            .first::<WorkPackDB>(conn)
            .optional()
            .into_core()
    }
}

#[async_trait]
impl WorkPackRepositoryTrait for WorkPackRepository {
    fn list_work_packs(&self, ctx: &OrgContext) -> Result<Vec<WorkPack>> {
        let mut conn = self.connection()?;
        let rows = work_packs::table
            .filter(work_packs::organization_id.eq(ctx.organization_id()))
            .order((work_packs::name.asc(), work_packs::id.asc()))
            .select(WorkPackDB::as_select())
            .load::<WorkPackDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(WorkPack::from).collect())
    }

    fn get_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<WorkPack> {
        let mut conn = self.connection()?;
        Self::find_work_pack(&mut conn, ctx, work_pack_id)?
            .map(WorkPack::from)
            .ok_or_else(|| work_pack_not_found(work_pack_id))
    }

    async fn create_work_pack(
        &self,
        ctx: &OrgContext,
        new_work_pack: NewWorkPack,
    ) -> Result<WorkPack> {
        let now = Utc::now().naive_utc();
        let row = NewWorkPackDB {
            id: Uuid::now_v7().to_string(),
            organization_id: ctx.organization_id().to_string(),
            name: new_work_pack.name,
            description: new_work_pack.description,
            created_at: now,
            updated_at: now,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WorkPack> {
                let created = diesel::insert_into(work_packs::table)
                    .values(&row)
                    .returning(WorkPackDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(WorkPack::from(created))
            })
            .await
    }

    async fn update_work_pack(
        &self,
        ctx: &OrgContext,
        work_pack_id: &str,
        update: NewWorkPack,
    ) -> Result<WorkPack> {
        let organization_id = ctx.organization_id().to_string();
        let work_pack_id = work_pack_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WorkPack> {
                diesel::update(
                    work_packs::table
                        .filter(work_packs::id.eq(&work_pack_id))
                        .filter(work_packs::organization_id.eq(&organization_id)),
                )
                .set((
                    work_packs::name.eq(update.name),
                    work_packs::description.eq(update.description),
                    work_packs::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(WorkPackDB::as_returning())
                .get_result(conn)
                .optional()
                .into_core()?
                .map(WorkPack::from)
                .ok_or_else(|| work_pack_not_found(&work_pack_id))
            })
            .await
    }

    async fn delete_work_pack(&self, ctx: &OrgContext, work_pack_id: &str) -> Result<usize> {
        let organization_id = ctx.organization_id().to_string();
        let work_pack_id = work_pack_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Items and expenses go with it through ON DELETE CASCADE.
                let deleted = diesel::delete(
                    work_packs::table
                        .filter(work_packs::id.eq(&work_pack_id))
                        .filter(work_packs::organization_id.eq(&organization_id)),
                )
                .execute(conn)
                .into_core()?;
                debug!("Deleted {} work pack(s) with id {}", deleted, work_pack_id);
                Ok(deleted)
            })
            .await
    }

    async fn insert_item(
        &self,
        work_pack_id: &str,
        new_item: NewWorkPackItem,
    ) -> Result<WorkPackItem> {
        let row = WorkPackItemDB {
            id: Uuid::now_v7().to_string(),
            work_pack_id: work_pack_id.to_string(),
            cost_code_id: new_item.cost_code_id,
            line_item_name: new_item.line_item_name,
            quantity: Some(new_item.quantity.to_string()),
            unit_price: Some(new_item.unit_price.to_string()),
            unit: Some(new_item.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string())),
            created_at: Utc::now().naive_utc(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WorkPackItem> {
                let created = diesel::insert_into(work_pack_items::table)
                    .values(&row)
                    .returning(WorkPackItemDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(WorkPackItem::from(created))
            })
            .await
    }

    async fn delete_item(&self, work_pack_id: &str, item_id: &str) -> Result<usize> {
        let work_pack_id = work_pack_id.to_string();
        let item_id = item_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    work_pack_items::table
                        .filter(work_pack_items::id.eq(item_id))
                        .filter(work_pack_items::work_pack_id.eq(work_pack_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn insert_expense(
        &self,
        work_pack_id: &str,
        new_expense: NewWorkPackExpense,
    ) -> Result<WorkPackExpense> {
        let row = WorkPackExpenseDB {
            id: Uuid::now_v7().to_string(),
            work_pack_id: work_pack_id.to_string(),
            cost_code_id: new_expense.cost_code_id,
            description: new_expense.description,
            amount: new_expense.amount.to_string(),
            category: new_expense.category,
            vendor: new_expense.vendor,
            expense_date: new_expense.expense_date,
            created_at: Utc::now().naive_utc(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WorkPackExpense> {
                let created = diesel::insert_into(work_pack_expenses::table)
                    .values(&row)
                    .returning(WorkPackExpenseDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(WorkPackExpense::from(created))
            })
            .await
    }

    async fn delete_expense(&self, work_pack_id: &str, expense_id: &str) -> Result<usize> {
        let work_pack_id = work_pack_id.to_string();
        let expense_id = expense_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    work_pack_expenses::table
                        .filter(work_pack_expenses::id.eq(expense_id))
                        .filter(work_pack_expenses::work_pack_id.eq(work_pack_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_codes::CostCodeRepository;
    use crate::db::{create_pool, run_migrations, spawn_writer, DbPool};
    use buildledger_core::budget::{
        load_work_pack_budget, AdjustmentReason, BudgetError, BudgetSourceTrait,
    };
    use buildledger_core::cost_codes::{CostCodeRepositoryTrait, NewCostCode};
    use buildledger_core::constants::NO_COST_CODE_ID;
    use buildledger_core::Error;
    use diesel::dsl::count_star;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    struct TestStore {
        work_packs: WorkPackRepository,
        cost_codes: CostCodeRepository,
        pool: Arc<DbPool>,
        _temp_dir: tempfile::TempDir,
    }

    async fn create_test_store() -> TestStore {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        TestStore {
            work_packs: WorkPackRepository::new(Arc::clone(&pool), writer.clone()),
            cost_codes: CostCodeRepository::new(Arc::clone(&pool), writer),
            pool,
            _temp_dir: temp_dir,
        }
    }

    fn org(id: &str) -> OrgContext {
        OrgContext::new(id).unwrap()
    }

    async fn create_work_pack(store: &TestStore, ctx: &OrgContext, name: &str) -> WorkPack {
        store
            .work_packs
            .create_work_pack(
                ctx,
                NewWorkPack {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .expect("Failed to create work pack")
    }

    fn new_item(cost_code_id: Option<&str>, quantity: Decimal, price: Decimal) -> NewWorkPackItem {
        NewWorkPackItem {
            cost_code_id: cost_code_id.map(str::to_string),
            line_item_name: "Formwork".to_string(),
            quantity,
            unit_price: price,
            unit: None,
        }
    }

    fn new_expense(cost_code_id: Option<&str>, amount: Decimal) -> NewWorkPackExpense {
        NewWorkPackExpense {
            cost_code_id: cost_code_id.map(str::to_string),
            description: "Concrete delivery".to_string(),
            amount,
            category: "materials".to_string(),
            vendor: Some("Ready Mix Co".to_string()),
            expense_date: None,
        }
    }

    #[tokio::test]
    async fn test_work_packs_are_scoped_by_organization() {
        let store = create_test_store().await;
        let work_pack = create_work_pack(&store, &org("org-1"), "Foundation").await;

        assert_eq!(store.work_packs.list_work_packs(&org("org-1")).unwrap().len(), 1);
        assert!(store.work_packs.list_work_packs(&org("org-2")).unwrap().is_empty());

        let err = store
            .work_packs
            .get_work_pack(&org("org-2"), &work_pack.id)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_work_pack_in_other_organization_is_not_found() {
        let store = create_test_store().await;
        let work_pack = create_work_pack(&store, &org("org-1"), "Foundation").await;

        let err = store
            .work_packs
            .update_work_pack(
                &org("org-2"),
                &work_pack.id,
                NewWorkPack {
                    name: "Hijacked".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let unchanged = store
            .work_packs
            .get_work_pack(&org("org-1"), &work_pack.id)
            .unwrap();
        assert_eq!(unchanged.name, "Foundation");
    }

    #[tokio::test]
    async fn test_item_decimals_survive_storage() {
        let store = create_test_store().await;
        let ctx = org("org-1");
        let work_pack = create_work_pack(&store, &ctx, "Foundation").await;

        let item = store
            .work_packs
            .insert_item(&work_pack.id, new_item(None, dec!(0.1), dec!(0.2)))
            .await
            .unwrap();
        assert_eq!(item.quantity, dec!(0.1));
        assert_eq!(item.unit, "ea");

        let line_items = store
            .work_packs
            .fetch_budget_line_items(&ctx, &work_pack.id)
            .await
            .unwrap();
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0].quantity, Some(dec!(0.1)));
        assert_eq!(line_items[0].price, Some(dec!(0.2)));
        assert_eq!(line_items[0].line_total(), dec!(0.02));
    }

    #[tokio::test]
    async fn test_budget_source_joins_cost_codes() {
        let store = create_test_store().await;
        let ctx = org("org-1");
        let work_pack = create_work_pack(&store, &ctx, "Foundation").await;
        let cost_code = store
            .cost_codes
            .create_cost_code(
                &ctx,
                NewCostCode {
                    code: "03-300".to_string(),
                    name: "Concrete".to_string(),
                    category: Some("Structure".to_string()),
                },
            )
            .await
            .unwrap();

        store
            .work_packs
            .insert_item(&work_pack.id, new_item(Some(&cost_code.id), dec!(2), dec!(100)))
            .await
            .unwrap();
        store
            .work_packs
            .insert_expense(&work_pack.id, new_expense(Some(&cost_code.id), dec!(180)))
            .await
            .unwrap();
        store
            .work_packs
            .insert_expense(&work_pack.id, new_expense(None, dec!(20)))
            .await
            .unwrap();

        let expenses = store
            .work_packs
            .fetch_budget_expenses(&ctx, &work_pack.id)
            .await
            .unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].cost_code_number.as_deref(), Some("03-300"));
        assert_eq!(expenses[0].cost_code_name.as_deref(), Some("Concrete"));
        assert_eq!(expenses[1].cost_code_id, None);
        assert_eq!(expenses[1].cost_code_name, None);

        let budget = load_work_pack_budget(&store.work_packs, &ctx, &work_pack.id)
            .await
            .unwrap();
        assert_eq!(budget.summary.total_budget, dec!(200));
        assert_eq!(budget.summary.total_actual, dec!(200));
        assert_eq!(budget.cost_codes.len(), 2);
        assert_eq!(budget.cost_codes[0].category, "Structure");
        assert_eq!(budget.cost_codes[1].cost_code_id, NO_COST_CODE_ID);
    }

    #[tokio::test]
    async fn test_budget_source_rejects_foreign_work_pack() {
        let store = create_test_store().await;
        let work_pack = create_work_pack(&store, &org("org-1"), "Foundation").await;

        let err = store
            .work_packs
            .fetch_budget_line_items(&org("org-2"), &work_pack.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Budget(BudgetError::WorkPackNotFound(_))));

        let err = store
            .work_packs
            .fetch_budget_expenses(&org("org-1"), "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_work_pack_cascades() {
        let store = create_test_store().await;
        let ctx = org("org-1");
        let work_pack = create_work_pack(&store, &ctx, "Foundation").await;
        store
            .work_packs
            .insert_item(&work_pack.id, new_item(None, dec!(1), dec!(10)))
            .await
            .unwrap();
        store
            .work_packs
            .insert_expense(&work_pack.id, new_expense(None, dec!(5)))
            .await
            .unwrap();

        let deleted = store
            .work_packs
            .delete_work_pack(&ctx, &work_pack.id)
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let mut conn = get_connection(&store.pool).unwrap();
        let items: i64 = work_pack_items::table
            .select(count_star())
            .first(&mut conn)
            .unwrap();
        let expenses: i64 = work_pack_expenses::table
            .select(count_star())
            .first(&mut conn)
            .unwrap();
        assert_eq!(items, 0);
        assert_eq!(expenses, 0);
    }

    #[tokio::test]
    async fn test_deleting_cost_code_unassigns_items() {
        let store = create_test_store().await;
        let ctx = org("org-1");
        let work_pack = create_work_pack(&store, &ctx, "Foundation").await;
        let cost_code = store
            .cost_codes
            .create_cost_code(
                &ctx,
                NewCostCode {
                    code: "01-100".to_string(),
                    name: "Site prep".to_string(),
                    category: None,
                },
            )
            .await
            .unwrap();
        store
            .work_packs
            .insert_item(&work_pack.id, new_item(Some(&cost_code.id), dec!(1), dec!(10)))
            .await
            .unwrap();

        store
            .cost_codes
            .delete_cost_code(&ctx, &cost_code.id)
            .await
            .unwrap();

        let line_items = store
            .work_packs
            .fetch_budget_line_items(&ctx, &work_pack.id)
            .await
            .unwrap();
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0].cost_code_id, None);
    }

    #[tokio::test]
    async fn test_unreadable_stored_values_are_flagged() {
        let store = create_test_store().await;
        let ctx = org("org-1");
        let work_pack = create_work_pack(&store, &ctx, "Foundation").await;

        let mut conn = get_connection(&store.pool).unwrap();
        diesel::insert_into(work_pack_items::table)
            .values(&WorkPackItemDB {
                id: "item-bad".to_string(),
                work_pack_id: work_pack.id.clone(),
                cost_code_id: None,
                line_item_name: "Legacy row".to_string(),
                quantity: Some("lots".to_string()),
                unit_price: None,
                unit: None,
                created_at: Utc::now().naive_utc(),
            })
            .execute(&mut conn)
            .unwrap();
        diesel::insert_into(work_pack_expenses::table)
            .values(&WorkPackExpenseDB {
                id: "exp-bad".to_string(),
                work_pack_id: work_pack.id.clone(),
                cost_code_id: None,
                description: "Legacy expense".to_string(),
                amount: "$12".to_string(),
                category: "materials".to_string(),
                vendor: None,
                expense_date: None,
                created_at: Utc::now().naive_utc(),
            })
            .execute(&mut conn)
            .unwrap();

        let line_items = store
            .work_packs
            .fetch_budget_line_items(&ctx, &work_pack.id)
            .await
            .unwrap();
        assert_eq!(line_items[0].quantity, None);
        assert_eq!(line_items[0].price, None);
        assert_eq!(line_items[0].unreadable_fields, vec!["quantity".to_string()]);
        assert_eq!(line_items[0].unit, None);

        let budget = load_work_pack_budget(&store.work_packs, &ctx, &work_pack.id)
            .await
            .unwrap();
        let reasons: Vec<(&str, &str, AdjustmentReason)> = budget
            .adjustments
            .iter()
            .map(|a| (a.record_id.as_str(), a.field.as_str(), a.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("item-bad", "quantity", AdjustmentReason::Unreadable),
                ("item-bad", "price", AdjustmentReason::Missing),
                ("exp-bad", "amount", AdjustmentReason::Unreadable),
            ]
        );
        assert_eq!(budget.summary.total_actual, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_remove_item_and_expense() {
        let store = create_test_store().await;
        let work_pack = create_work_pack(&store, &org("org-1"), "Foundation").await;
        let item = store
            .work_packs
            .insert_item(&work_pack.id, new_item(None, dec!(1), dec!(10)))
            .await
            .unwrap();
        let expense = store
            .work_packs
            .insert_expense(&work_pack.id, new_expense(None, dec!(5)))
            .await
            .unwrap();

        assert_eq!(store.work_packs.delete_item(&work_pack.id, &item.id).await.unwrap(), 1);
        assert_eq!(store.work_packs.delete_item(&work_pack.id, &item.id).await.unwrap(), 0);
        assert_eq!(
            store
                .work_packs
                .delete_expense("other-work-pack", &expense.id)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .work_packs
                .delete_expense(&work_pack.id, &expense.id)
                .await
                .unwrap(),
            1
        );
    }
}
