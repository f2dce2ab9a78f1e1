//! Postgres-backed stores.
//!
//! ## Error mapping
//!
//! SQLx errors are mapped to `StorageError` as follows:
//!
//! | SQLx error | StorageError | Scenario |
//! |------------|--------------|----------|
//! | `PoolTimedOut`, `Io` | `Unavailable` | Timeout / outcome unknown; surfaced as retryable |
//! | anything else | `Backend` | The database rejected the call |
//!
//! An `Unavailable` on the stock adjustment means the outcome is unknown
//! (the commit may have landed). The workflow never blindly retries the
//! decrement in that case; a retrying caller goes back through the full
//! placement, whose item lookup re-reads actual stock.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

use scoopshop_core::StorageError;

mod catalog;
mod orders;

pub use catalog::PostgresCatalog;
pub use orders::PostgresOrderStore;

/// Connect with a bounded acquire timeout so no storage call blocks
/// indefinitely.
pub async fn connect(database_url: &str) -> Result<PgPool, StorageError> {
    PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(map_sqlx)
}

pub(crate) fn map_sqlx(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StorageError::unavailable(err.to_string()),
        other => StorageError::backend(other.to_string()),
    }
}

/// `try_get` with the column name folded into the error.
pub(crate) fn get_column<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StorageError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StorageError::backend(format!("column {column}: {e}")))
}
