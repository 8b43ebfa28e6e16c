use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{
    pool_options,
    registry::{DbProvider, DbProviderId},
};
use crate::config::DatabaseConfig;

const MARIADB_SCHEME: &str = "mariadb://";
const MYSQL_SCHEME: &str = "mysql://";

pub struct MySqlDbProvider;

#[async_trait]
impl DbProvider for MySqlDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::MySql
    }

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        normalized.starts_with(MYSQL_SCHEME) || normalized.starts_with(MARIADB_SCHEME)
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let cfg = DatabaseConfig {
            url: mysql_url(&cfg.url),
            ..cfg.clone()
        };
        let db = Database::connect(pool_options(&cfg)).await?;
        Ok(db)
    }
}

/// MariaDB speaks the MySQL protocol; the driver only knows the `mysql` scheme.
fn mysql_url(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.get(..MARIADB_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(MARIADB_SCHEME) => {
            format!("{MYSQL_SCHEME}{}", &trimmed[MARIADB_SCHEME.len()..])
        }
        _ => trimmed.to_string(),
    }
}
