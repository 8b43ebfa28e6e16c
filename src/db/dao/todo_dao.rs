use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use super::{DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Todo, todo};

const ENTITY: &str = "Todo";

/// Partial update of a todo. `None` means the field was absent from the
/// request and the stored value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn apply(self, current: todo::Model) -> todo::Model {
        todo::Model {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            completed: self.completed.unwrap_or(current.completed),
        }
    }
}

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl TodoDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    /// Single INSERT; the response is built from the generated key and the
    /// values that were written.
    pub async fn create(&self, title: &str, completed: bool) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            title: Set(title.to_string()),
            completed: Set(completed),
            ..Default::default()
        };
        let result = Todo::insert(model).exec(&self.db).await?;
        Ok(todo::Model {
            id: result.last_insert_id,
            title: title.to_string(),
            completed,
        })
    }

    pub async fn list(&self) -> DaoResult<Vec<todo::Model>> {
        Ok(Todo::find().all(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> DaoResult<todo::Model> {
        Todo::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Fetch, merge and conditional UPDATE inside one transaction so a
    /// concurrent writer cannot slip between the read and the write.
    pub async fn update(&self, id: i32, patch: TodoPatch) -> DaoResult<todo::Model> {
        let txn = self.db.begin().await?;

        let Some(current) = Todo::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Err(not_found(id));
        };

        let merged = patch.apply(current);
        let changes = todo::ActiveModel {
            title: Set(merged.title.clone()),
            completed: Set(merged.completed),
            ..Default::default()
        };
        let result = Todo::update_many()
            .set(changes)
            .filter(todo::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(not_found(id));
        }

        txn.commit().await?;
        Ok(merged)
    }

    pub async fn delete(&self, id: i32) -> DaoResult<i32> {
        let result = Todo::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(not_found(id));
        }
        Ok(id)
    }
}

fn not_found(id: i32) -> DaoLayerError {
    DaoLayerError::NotFound { entity: ENTITY, id }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use super::{TodoDao, TodoPatch};
    use crate::db::{dao::DaoLayerError, entities::todo};

    fn todo_model(id: i32, title: &str, completed: bool) -> todo::Model {
        todo::Model {
            id,
            title: title.to_string(),
            completed,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn patch_keeps_stored_values_for_absent_fields() {
        let current = todo_model(3, "buy milk", false);

        let only_completed = TodoPatch {
            title: None,
            completed: Some(true),
        };
        assert_eq!(
            only_completed.apply(current.clone()),
            todo_model(3, "buy milk", true)
        );

        let only_title = TodoPatch {
            title: Some("buy oat milk".to_string()),
            completed: None,
        };
        assert_eq!(
            only_title.apply(current.clone()),
            todo_model(3, "buy oat milk", false)
        );

        assert_eq!(TodoPatch::default().apply(current.clone()), current);
    }

    #[tokio::test]
    async fn create_returns_generated_id_and_written_values() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 15,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = TodoDao::new(&db);

        let created = dao
            .create("buy milk", false)
            .await
            .expect("insert should succeed");
        assert_eq!(created, todo_model(15, "buy milk", false));
    }

    #[tokio::test]
    async fn list_returns_every_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                todo_model(1, "one", false),
                todo_model(2, "two", true),
            ]])
            .into_connection();
        let dao = TodoDao::new(&db);

        let todos = dao.list().await.expect("query should succeed");
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].title, "two");
    }

    #[tokio::test]
    async fn find_by_id_reports_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.find_by_id(42).await.expect_err("row should be missing");
        assert!(matches!(err, DaoLayerError::NotFound { id: 42, .. }));
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[tokio::test]
    async fn update_returns_not_found_when_row_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao
            .update(9, TodoPatch::default())
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 9, .. }));
    }

    #[tokio::test]
    async fn update_merges_patch_over_stored_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[todo_model(4, "walk dog", false)]])
            .append_exec_results([exec(1)])
            .into_connection();
        let dao = TodoDao::new(&db);

        let updated = dao
            .update(
                4,
                TodoPatch {
                    title: None,
                    completed: Some(true),
                },
            )
            .await
            .expect("update should succeed");
        assert_eq!(updated, todo_model(4, "walk dog", true));
    }

    #[tokio::test]
    async fn update_reports_not_found_when_no_row_was_changed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[todo_model(4, "walk dog", false)]])
            .append_exec_results([exec(0)])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao
            .update(4, TodoPatch::default())
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 4, .. }));
    }

    #[tokio::test]
    async fn delete_reports_not_found_when_nothing_was_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let dao = TodoDao::new(&db);

        assert_eq!(dao.delete(8).await.expect("first delete succeeds"), 8);
        let err = dao.delete(8).await.expect_err("second delete should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id: 8, .. }));
    }

    #[tokio::test]
    async fn database_errors_are_wrapped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("relation \"todos\" does not exist".to_string())])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.list().await.expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
        assert!(err.to_string().contains("relation \"todos\" does not exist"));
    }
}
