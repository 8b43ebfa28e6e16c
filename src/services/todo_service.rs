use crate::{
    db::{
        dao::{TodoDao, TodoPatch},
        entities::todo,
    },
    error::AppError,
};

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn create(&self, title: &str, completed: bool) -> Result<todo::Model, AppError> {
        Ok(self.todo_dao.create(title, completed).await?)
    }

    pub async fn list(&self) -> Result<Vec<todo::Model>, AppError> {
        Ok(self.todo_dao.list().await?)
    }

    pub async fn get(&self, id: i32) -> Result<todo::Model, AppError> {
        Ok(self.todo_dao.find_by_id(id).await?)
    }

    pub async fn update(&self, id: i32, patch: TodoPatch) -> Result<todo::Model, AppError> {
        Ok(self.todo_dao.update(id, patch).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.todo_dao.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use super::TodoService;
    use crate::{
        db::{
            dao::{TodoDao, TodoPatch},
            entities::todo,
        },
        error::AppError,
    };

    fn service(db: &sea_orm::DatabaseConnection) -> TodoService {
        TodoService::new(TodoDao::new(db))
    }

    #[tokio::test]
    async fn get_missing_todo_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();

        let err = service(&db).get(1).await.expect_err("todo should be missing");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Todo not found");
    }

    #[tokio::test]
    async fn delete_missing_todo_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = service(&db).delete(1).await.expect_err("todo should be missing");
        assert_eq!(err.message(), "Todo not found");
    }

    #[tokio::test]
    async fn update_missing_todo_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();

        let patch = TodoPatch {
            title: Some("renamed".to_string()),
            completed: None,
        };
        let err = service(&db)
            .update(1, patch)
            .await
            .expect_err("todo should be missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn storage_failures_are_internal_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("disk I/O error".to_string())])
            .into_connection();

        let err = service(&db).list().await.expect_err("list should fail");
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.message().contains("disk I/O error"));
    }
}
