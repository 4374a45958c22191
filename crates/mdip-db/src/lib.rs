//! # mdip-db
//!
//! libSQL persistence for mdip: the store handle, one repository per entity
//! kind, and the CSV bulk loader.
//!
//! The store is a single local database file. Every logical operation opens
//! its own connection through [`Store::connection`] and drops it on return;
//! nothing holds a connection between calls. Busy/locked conditions are
//! retried per statement according to the store's [`RetryConfig`].

pub mod error;
pub mod helpers;
pub mod import;
mod migrations;
pub mod repos;
pub mod retry;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use retry::{RetryConfig, with_retry};
use tracing::debug;

/// Central handle for the mdip store.
///
/// Cheap to borrow; repositories hold `&Store` and open connections on demand.
pub struct Store {
    db: libsql::Database,
    path: String,
    retry: RetryConfig,
}

impl Store {
    /// Open a local database file with the default retry policy.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_with(path, RetryConfig::default()).await
    }

    /// Open a local database file with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_with(path: &str, retry: RetryConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let store = Self {
            db,
            path: path.to_string(),
            retry,
        };
        store.run_migrations().await?;
        debug!(path, "store opened");
        Ok(store)
    }

    /// Path the store was opened from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Open a connection scoped to one logical operation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if libSQL cannot open a connection.
    pub fn connection(&self) -> Result<StoreConn<'_>, DatabaseError> {
        Ok(StoreConn {
            conn: self.db.connect()?,
            retry: &self.retry,
        })
    }
}

/// A connection borrowed for the duration of one operation.
///
/// All statements go through the busy-retry wrapper and bind their values
/// as parameters.
pub struct StoreConn<'a> {
    conn: libsql::Connection,
    retry: &'a RetryConfig,
}

impl StoreConn<'_> {
    /// Execute a statement, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Busy` after exhausting retries, or the
    /// underlying libSQL error.
    pub async fn execute_with(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<u64, DatabaseError> {
        with_retry(self.retry, || {
            self.conn
                .execute(sql, libsql::params_from_iter(params.clone()))
        })
        .await
    }

    /// Execute an INSERT and return the new row id.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConn::execute_with`].
    pub async fn insert_with(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<i64, DatabaseError> {
        self.execute_with(sql, params).await?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Run a query, returning its row cursor.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConn::execute_with`].
    pub async fn query_with(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<libsql::Rows, DatabaseError> {
        with_retry(self.retry, || {
            self.conn.query(sql, libsql::params_from_iter(params.clone()))
        })
        .await
    }

    /// Run a query expected to produce one row with one integer column.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the query produced no row.
    pub async fn query_scalar(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self.query_with(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Run a multi-statement script.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConn::execute_with`].
    pub async fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        with_retry(self.retry, || self.conn.execute_batch(sql)).await?;
        Ok(())
    }

    /// Open a write transaction. The write lock is taken up front so a
    /// busy store fails here, before any statement runs.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConn::execute_with`].
    pub async fn begin(&self) -> Result<(), DatabaseError> {
        self.execute_batch("BEGIN IMMEDIATE").await
    }

    /// # Errors
    ///
    /// Same as [`StoreConn::execute_with`].
    pub async fn commit(&self) -> Result<(), DatabaseError> {
        self.execute_batch("COMMIT").await
    }

    /// # Errors
    ///
    /// Same as [`StoreConn::execute_with`].
    pub async fn rollback(&self) -> Result<(), DatabaseError> {
        self.execute_batch("ROLLBACK").await
    }
}
