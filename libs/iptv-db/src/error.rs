use thiserror::Error;

/// Failure of a single store operation.
///
/// Constraint violations keep the SQLite message verbatim so callers can hand
/// it straight back to the client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Constraint(String),

    #[error("{0}")]
    Database(sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid database url: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::Constraint(db_err.message().to_string()),
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
