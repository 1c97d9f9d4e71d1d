use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use buildledger_core::cost_codes::{CostCode, CostCodeRepositoryTrait, NewCostCode};
use buildledger_core::errors::DatabaseError;
use buildledger_core::{OrgContext, Result};

use super::model::{CostCodeDB, NewCostCodeDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::cost_codes;

pub struct CostCodeRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

fn cost_code_not_found(cost_code_id: &str) -> buildledger_core::Error {
    DatabaseError::NotFound(format!("Cost code {}", cost_code_id)).into()
}

impl CostCodeRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CostCodeRepository { pool, writer }
    }
}

#[async_trait]
impl CostCodeRepositoryTrait for CostCodeRepository {
    fn list_cost_codes(&self, ctx: &OrgContext) -> Result<Vec<CostCode>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = cost_codes::table
            .filter(cost_codes::organization_id.eq(ctx.organization_id()))
            .order(cost_codes::code.asc())
            .select(CostCodeDB::as_select())
            .load::<CostCodeDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(CostCode::from).collect())
    }

    fn get_cost_code(&self, ctx: &OrgContext, cost_code_id: &str) -> Result<CostCode> {
        let mut conn = get_connection(&self.pool)?;
        cost_codes::table
            .filter(cost_codes::id.eq(cost_code_id))
            .filter(cost_codes::organization_id.eq(ctx.organization_id()))
            .select(CostCodeDB::as_select())
            .first::<CostCodeDB>(&mut conn)
            .optional()
            .into_core()?
            .map(CostCode::from)
            .ok_or_else(|| cost_code_not_found(cost_code_id))
    }

    async fn create_cost_code(
        &self,
        ctx: &OrgContext,
        new_cost_code: NewCostCode,
    ) -> Result<CostCode> {
        let now = Utc::now().naive_utc();
        let row = NewCostCodeDB {
            id: Uuid::now_v7().to_string(),
            organization_id: ctx.organization_id().to_string(),
            code: new_cost_code.code,
            name: new_cost_code.name,
            category: new_cost_code.category,
            created_at: now,
            updated_at: now,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CostCode> {
                let created = diesel::insert_into(cost_codes::table)
                    .values(&row)
                    .returning(CostCodeDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(CostCode::from(created))
            })
            .await
    }

    async fn update_cost_code(
        &self,
        ctx: &OrgContext,
        cost_code_id: &str,
        update: NewCostCode,
    ) -> Result<CostCode> {
        let organization_id = ctx.organization_id().to_string();
        let cost_code_id = cost_code_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CostCode> {
                let updated = diesel::update(
                    cost_codes::table
                        .filter(cost_codes::id.eq(&cost_code_id))
                        .filter(cost_codes::organization_id.eq(&organization_id)),
                )
                .set((
                    cost_codes::code.eq(update.code),
                    cost_codes::name.eq(update.name),
                    cost_codes::category.eq(update.category),
                    cost_codes::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(CostCodeDB::as_returning())
                .get_result(conn)
                .optional()
                .into_core()?;
                updated
                    .map(CostCode::from)
                    .ok_or_else(|| cost_code_not_found(&cost_code_id))
            })
            .await
    }

    async fn delete_cost_code(&self, ctx: &OrgContext, cost_code_id: &str) -> Result<usize> {
        let organization_id = ctx.organization_id().to_string();
        let cost_code_id = cost_code_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    cost_codes::table
                        .filter(cost_codes::id.eq(&cost_code_id))
                        .filter(cost_codes::organization_id.eq(&organization_id)),
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
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use buildledger_core::Error;
    use tempfile::tempdir;

    async fn create_test_repository() -> (CostCodeRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (CostCodeRepository::new(pool, writer), temp_dir)
    }

    fn org(id: &str) -> OrgContext {
        OrgContext::new(id).unwrap()
    }

    fn concrete() -> NewCostCode {
        NewCostCode {
            code: "03-300".to_string(),
            name: "Concrete".to_string(),
            category: Some("Structure".to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_is_unique_violation() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.create_cost_code(&org("org-1"), concrete()).await.unwrap();

        let err = repo
            .create_cost_code(&org("org-1"), concrete())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));

        // The same code is free in another organization.
        repo.create_cost_code(&org("org-2"), concrete()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_and_lookup_stay_within_organization() {
        let (repo, _temp_dir) = create_test_repository().await;
        let created = repo.create_cost_code(&org("org-1"), concrete()).await.unwrap();

        assert!(repo
            .get_cost_code(&org("org-2"), &created.id)
            .unwrap_err()
            .is_not_found());
        assert!(repo
            .update_cost_code(&org("org-2"), &created.id, concrete())
            .await
            .unwrap_err()
            .is_not_found());

        let updated = repo
            .update_cost_code(
                &org("org-1"),
                &created.id,
                NewCostCode {
                    code: "03-310".to_string(),
                    name: "Concrete forming".to_string(),
                    category: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.code, "03-310");
        assert_eq!(updated.category, None);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_code() {
        let (repo, _temp_dir) = create_test_repository().await;
        for code in ["05-100", "01-100", "03-300"] {
            repo.create_cost_code(
                &org("org-1"),
                NewCostCode {
                    code: code.to_string(),
                    name: format!("Code {}", code),
                    category: None,
                },
            )
            .await
            .unwrap();
        }

        let codes: Vec<String> = repo
            .list_cost_codes(&org("org-1"))
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["01-100", "03-300", "05-100"]);
    }
}
