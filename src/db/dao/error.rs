use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    /// Driver or engine failure.
    #[error("{0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: i32 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
