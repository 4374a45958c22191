//! Incident repository: CRUD and filtered listing.

use mdip_core::entities::{NewIncident, SecurityIncident};
use mdip_core::enums::{EntityKind, IncidentStatus, Severity};
use tracing::debug;

use super::{Conditions, Repository};
use crate::{Store, StoreConn};
use crate::error::DatabaseError;
use crate::helpers::{contains_pattern, get_opt_string, opt_integer, opt_text, parse_datetime, parse_label};
use crate::updates::incident::IncidentPatch;

const SELECT_COLS: &str =
    "id, source_id, title, description, severity, category, status, timestamp, reported_by";

fn row_to_incident(row: &libsql::Row) -> Result<SecurityIncident, DatabaseError> {
    let incident = SecurityIncident::new(NewIncident {
        source_id: get_opt_string(row, 1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        severity: parse_label("severity", &row.get::<String>(4)?)?,
        category: row.get(5)?,
        status: parse_label("status", &row.get::<String>(6)?)?,
        timestamp: parse_datetime(&row.get::<String>(7)?)?,
        reported_by: row.get::<Option<i64>>(8)?,
    })?;
    Ok(incident.with_id(row.get(0)?)?)
}

fn column_values(incident: &SecurityIncident) -> Vec<libsql::Value> {
    vec![
        opt_text(incident.source_id()),
        incident.title().into(),
        opt_text(incident.description()),
        incident.severity().as_str().into(),
        incident.category().into(),
        incident.status().as_str().into(),
        incident.timestamp().to_rfc3339().into(),
        opt_integer(incident.reported_by()),
    ]
}

/// Listing filter. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    pub severity: Option<Severity>,
    pub status: Option<IncidentStatus>,
    pub category: Option<String>,
    pub reported_by: Option<i64>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    pub limit: Option<u32>,
}

pub struct IncidentRepo<'a> {
    store: &'a Store,
}

impl<'a> IncidentRepo<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl Repository for IncidentRepo<'_> {
    type Entity = SecurityIncident;
    type Patch = IncidentPatch;
    type Filter = IncidentFilter;

    const KIND: EntityKind = EntityKind::Incident;

    fn store(&self) -> &Store {
        self.store
    }

    async fn create_in(
        &self,
        conn: &StoreConn<'_>,
        incident: &SecurityIncident,
    ) -> Result<i64, DatabaseError> {
        if let Some(id) = incident.id() {
            return Err(DatabaseError::AlreadyPersisted {
                entity: Self::KIND,
                id,
            });
        }
        let id = conn
            .insert_with(
                "INSERT INTO incidents (source_id, title, description, severity, category, status, timestamp, reported_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                column_values(incident),
            )
            .await?;
        debug!(id, severity = %incident.severity(), "incident created");
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<SecurityIncident, DatabaseError> {
        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM incidents WHERE id = ?1"),
                vec![id.into()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: Self::KIND,
            id,
        })?;
        row_to_incident(&row)
    }

    async fn list(&self, filter: &IncidentFilter) -> Result<Vec<SecurityIncident>, DatabaseError> {
        let mut conditions = Conditions::default();
        if let Some(severity) = filter.severity {
            conditions.push("severity = ?", severity.as_str());
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?", status.as_str());
        }
        if let Some(ref category) = filter.category {
            conditions.push("category = ?", category.clone());
        }
        if let Some(reported_by) = filter.reported_by {
            conditions.push("reported_by = ?", reported_by);
        }
        if let Some(ref search) = filter.search {
            conditions.push(
                "(lower(title) LIKE ? ESCAPE '\\' OR lower(coalesce(description, '')) LIKE ? ESCAPE '\\')",
                contains_pattern(search),
            );
        }
        let (tail, params) = conditions.finish(filter.limit);

        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(&format!("SELECT {SELECT_COLS} FROM incidents {tail}"), params)
            .await?;
        let mut incidents = Vec::new();
        while let Some(row) = rows.next().await? {
            incidents.push(row_to_incident(&row)?);
        }
        Ok(incidents)
    }

    async fn update(&self, id: i64, patch: IncidentPatch) -> Result<SecurityIncident, DatabaseError> {
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = SecurityIncident::new(patch.apply(current.to_new()))?;

        let mut params = column_values(&merged);
        params.push(id.into());
        let conn = self.store.connection()?;
        conn.execute_with(
            "UPDATE incidents SET source_id = ?1, title = ?2, description = ?3, severity = ?4,
                 category = ?5, status = ?6, timestamp = ?7, reported_by = ?8
             WHERE id = ?9",
            params,
        )
        .await?;
        debug!(id, "incident updated");
        Ok(merged.with_id(id)?)
    }
}
