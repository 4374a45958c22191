//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! store open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::Store;
use crate::error::DatabaseError;

/// Initial schema: 4 tables, 7 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl Store {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let conn = self.connection()?;
        conn.execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_store;

    #[tokio::test]
    async fn initial_schema_has_seven_indexes() {
        let (_dir, store) = test_store().await;
        let conn = store.connection().unwrap();
        let n = conn
            .query_scalar(
                "SELECT count(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                Vec::new(),
            )
            .await
            .unwrap();
        assert_eq!(n, 7);
    }
}
