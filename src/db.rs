use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let constraint = db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string());
                StoreError::Conflict(constraint)
            }
            _ => StoreError::Other(anyhow::Error::from(err)),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
