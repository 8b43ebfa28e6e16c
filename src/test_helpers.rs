use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    state::AppState,
};

/// Full middleware stack over an arbitrary connection, typically a `MockDatabase`.
pub fn test_app(db: DatabaseConnection) -> Router {
    app(AppState::new(AppConfig::default(), db))
}

/// Full middleware stack over a private in-memory SQLite database with the
/// `todos` table in place. One pooled connection keeps the database alive.
pub async fn sqlite_app() -> anyhow::Result<Router> {
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
        sync_schema: false,
        ..DatabaseConfig::default()
    };

    let db = connection::connect(&cfg.database).await?;
    connection::sync_schema(&db).await?;
    Ok(app(AppState::new(cfg, db)))
}
