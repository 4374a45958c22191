//! Repositories: the only readers and writers of the store.
//!
//! One struct per entity kind, each borrowing the [`Store`] and implementing
//! [`Repository`]. Every statement binds its values as parameters.

pub mod dataset;
pub mod incident;
pub mod stats;
pub mod ticket;
pub mod user;

pub use dataset::{DatasetFilter, DatasetRepo};
pub use incident::{IncidentFilter, IncidentRepo};
pub use ticket::{TicketFilter, TicketRepo};
pub use user::{UserFilter, UserRepo};

use mdip_core::enums::EntityKind;
use tracing::debug;

use crate::error::DatabaseError;
use crate::{Store, StoreConn};
use crate::helpers::{entity_table, to_count};

/// Common contract for every entity kind.
#[allow(async_fn_in_trait)]
pub trait Repository {
    type Entity;
    type Patch;
    type Filter: Default;

    const KIND: EntityKind;

    fn store(&self) -> &Store;

    /// Persist a new entity on `conn` and return the id the store assigned.
    ///
    /// Runs inside whatever transaction `conn` has open.
    ///
    /// # Errors
    ///
    /// `AlreadyPersisted` if the entity carries an id; `Conflict` on a
    /// duplicate unique field.
    async fn create_in(
        &self,
        conn: &StoreConn<'_>,
        entity: &Self::Entity,
    ) -> Result<i64, DatabaseError>;

    /// [`Repository::create_in`] on a fresh connection.
    ///
    /// # Errors
    ///
    /// Same as [`Repository::create_in`].
    async fn create(&self, entity: &Self::Entity) -> Result<i64, DatabaseError> {
        let conn = self.store().connection()?;
        self.create_in(&conn, entity).await
    }

    /// # Errors
    ///
    /// `NotFound` if no row has this id.
    async fn get(&self, id: i64) -> Result<Self::Entity, DatabaseError>;

    /// Matching entities in ascending id order.
    ///
    /// # Errors
    ///
    /// Store failures only.
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Entity>, DatabaseError>;

    /// Merge `patch` into the stored entity, re-validate, and write it back.
    ///
    /// # Errors
    ///
    /// `NotFound` if no row has this id; `Validation` if the merged entity
    /// breaks a rule.
    async fn update(&self, id: i64, patch: Self::Patch) -> Result<Self::Entity, DatabaseError>;

    /// # Errors
    ///
    /// `NotFound` if no row has this id.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let table = entity_table(Self::KIND);
        let conn = self.store().connection()?;
        let affected = conn
            .execute_with(&format!("DELETE FROM {table} WHERE id = ?1"), vec![id.into()])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity: Self::KIND,
                id,
            });
        }
        debug!(entity = %Self::KIND, id, "deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Store failures only.
    async fn count(&self) -> Result<u64, DatabaseError> {
        let table = entity_table(Self::KIND);
        let conn = self.store().connection()?;
        to_count(
            conn.query_scalar(&format!("SELECT count(*) FROM {table}"), Vec::new())
                .await?,
        )
    }

    /// Delete every row of this kind, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Store failures only.
    async fn clear(&self) -> Result<u64, DatabaseError> {
        let conn = self.store().connection()?;
        self.clear_in(&conn).await
    }

    /// [`Repository::clear`] on `conn`, inside its open transaction.
    ///
    /// # Errors
    ///
    /// Store failures only.
    async fn clear_in(&self, conn: &StoreConn<'_>) -> Result<u64, DatabaseError> {
        let table = entity_table(Self::KIND);
        let removed = conn
            .execute_with(&format!("DELETE FROM {table}"), Vec::new())
            .await?;
        debug!(entity = %Self::KIND, removed, "cleared");
        Ok(removed)
    }
}

/// Accumulates `WHERE` conditions with positional parameters.
#[derive(Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    params: Vec<libsql::Value>,
}

impl Conditions {
    /// Add a condition. `?` in `clause` is replaced by the next parameter index.
    pub(crate) fn push(&mut self, clause: &str, value: impl Into<libsql::Value>) {
        self.params.push(value.into());
        let idx = self.params.len();
        self.clauses.push(clause.replace('?', &format!("?{idx}")));
    }

    /// Render `WHERE ... ORDER BY id [LIMIT ?n]` and hand back the parameters.
    pub(crate) fn finish(mut self, limit: Option<u32>) -> (String, Vec<libsql::Value>) {
        let mut sql = if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        };
        sql.push_str(" ORDER BY id ASC");
        if let Some(limit) = limit {
            self.params.push(i64::from(limit).into());
            sql.push_str(&format!(" LIMIT ?{}", self.params.len()));
        }
        (sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn conditions_number_parameters_in_order() {
        let mut c = Conditions::default();
        c.push("severity = ?", "High");
        c.push("(lower(title) LIKE ? ESCAPE '\\')", "%vpn%");
        let (sql, params) = c.finish(Some(10));
        assert_eq!(
            sql,
            "WHERE severity = ?1 AND (lower(title) LIKE ?2 ESCAPE '\\') ORDER BY id ASC LIMIT ?3"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn empty_conditions_still_order() {
        let (sql, params) = Conditions::default().finish(None);
        assert_eq!(sql, " ORDER BY id ASC");
        assert!(params.is_empty());
    }
}
