use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::db::connection;

/// Startup-only connectivity probe. Logs the outcome and never retries;
/// the server keeps serving either way.
pub async fn check_database_connection(db: &DatabaseConnection) -> bool {
    match connection::ping(db).await {
        Ok(()) => {
            info!("database connected successfully");
            true
        }
        Err(err) => {
            error!(error = %err, "failed to connect to the database");
            false
        }
    }
}
