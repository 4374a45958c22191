//! Busy/locked store retry logic.
//!
//! A second process (or a leftover connection) holding the write lock makes
//! `SQLite` report `database is locked`. Those statements are retried with
//! capped exponential backoff; once the attempts are spent the caller gets
//! [`DatabaseError::Busy`] with the last underlying error attached.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::DatabaseError;

/// Configuration for retry behavior on busy or locked stores.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), doubling each time.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Detect busy/locked errors.
///
/// The predicate is narrow: constraint violations and SQL errors are never
/// retried.
pub fn is_busy_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("database is busy")
        || msg.contains("SQLITE_BUSY")
}

/// Detect a UNIQUE constraint violation.
pub fn is_unique_violation(e: &DatabaseError) -> bool {
    matches!(e, DatabaseError::LibSql(inner) if inner.to_string().contains("UNIQUE constraint failed"))
}

/// Run `op` until it succeeds, fails with a non-busy error, or the attempts
/// run out.
///
/// # Errors
///
/// Returns [`DatabaseError::Busy`] once `config.max_attempts` busy failures
/// have been seen, or the first non-busy error unchanged.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, libsql::Error>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_busy_error(&e) => {
                if attempt >= config.max_attempts {
                    warn!(attempts = attempt, "store still busy, giving up");
                    return Err(DatabaseError::Busy {
                        attempts: attempt,
                        source: e,
                    });
                }
                let delay = config.delay_for(attempt);
                debug!(attempt, delay_ms = delay.as_millis(), "store busy, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(DatabaseError::LibSql(e)),
        }
    }
}
