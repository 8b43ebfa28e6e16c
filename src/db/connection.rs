use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{info, warn};

use super::providers;
use crate::config::DatabaseConfig;

/// Builds the pool for the configured backend.
///
/// Only an unusable URL is fatal here. A schema sync against an unreachable
/// server is logged and left for the startup health check and individual
/// requests to report.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let registry = providers::default_registry()?;
    let provider = registry.provider_for_url(&cfg.url)?;
    info!(provider = provider.id().as_str(), "opening database pool");

    let db = provider.connect(cfg).await?;

    if cfg.sync_schema {
        if let Err(err) = sync_schema(&db).await {
            warn!(error = %err, "database schema sync failed");
        }
    }
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    info!("syncing database schema from entities");
    db.get_schema_registry("todos_api::db::entities::*")
        .sync(db)
        .await
}

/// Round-trips a no-op statement through the pool.
pub async fn ping(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

    use super::ping;

    #[tokio::test]
    async fn ping_succeeds_when_statement_executes() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        ping(&db).await.expect("ping should succeed");
    }

    #[tokio::test]
    async fn ping_surfaces_connection_errors() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_errors([DbErr::Conn(RuntimeErr::Internal(
                "connection refused".to_string(),
            ))])
            .into_connection();

        let err = ping(&db).await.expect_err("ping should fail");
        assert!(err.to_string().contains("connection refused"));
    }
}
