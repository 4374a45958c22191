//! Ticket repository covers CRUD, filtered listing and the assign/resolve
//! workflow.

use mdip_core::entities::{ItTicket, NewTicket};
use mdip_core::enums::{EntityKind, TicketPriority, TicketStatus};
use mdip_core::errors::{Rule, ValidationError};
use tracing::{debug, info};

use super::{Conditions, Repository};
use crate::{Store, StoreConn};
use crate::error::DatabaseError;
use crate::helpers::{
    contains_pattern, get_opt_string, opt_integer, opt_real, opt_text, parse_datetime, parse_label,
};
use crate::updates::ticket::{TicketPatch, TicketPatchBuilder};

const SELECT_COLS: &str = "id, source_id, priority, description, status, assigned_to, created_at, \
                           resolution_time_hours, opened_by";

fn row_to_ticket(row: &libsql::Row) -> Result<ItTicket, DatabaseError> {
    let ticket = ItTicket::new(NewTicket {
        source_id: get_opt_string(row, 1)?,
        priority: parse_label("priority", &row.get::<String>(2)?)?,
        description: row.get(3)?,
        status: parse_label("status", &row.get::<String>(4)?)?,
        assigned_to: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        resolution_time_hours: row.get::<Option<f64>>(7)?,
        opened_by: row.get::<Option<i64>>(8)?,
    })?;
    Ok(ticket.with_id(row.get(0)?)?)
}

fn column_values(ticket: &ItTicket) -> Vec<libsql::Value> {
    vec![
        opt_text(ticket.source_id()),
        ticket.priority().as_str().into(),
        ticket.description().into(),
        ticket.status().as_str().into(),
        opt_text(ticket.assigned_to()),
        ticket.created_at().to_rfc3339().into(),
        opt_real(ticket.resolution_time_hours()),
        opt_integer(ticket.opened_by()),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<String>,
    pub opened_by: Option<i64>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub limit: Option<u32>,
}

pub struct TicketRepo<'a> {
    store: &'a Store,
}

impl<'a> TicketRepo<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Hand a ticket to `assignee`. An Open ticket moves to In Progress;
    /// other statuses are kept.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing id; `Validation` for a blank assignee.
    pub async fn assign(&self, id: i64, assignee: &str) -> Result<ItTicket, DatabaseError> {
        if assignee.trim().is_empty() {
            return Err(ValidationError::new("assigned_to", Rule::Required).into());
        }
        let current = self.get(id).await?;
        let mut patch = TicketPatchBuilder::new().assigned_to(Some(assignee.to_string()));
        if current.status() == TicketStatus::Open {
            patch = patch.status(TicketStatus::InProgress);
        }
        let ticket = self.update(id, patch.build()).await?;
        info!(id, assignee, status = %ticket.status(), "ticket assigned");
        Ok(ticket)
    }

    /// Mark a ticket Resolved with the time it took.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing id; `Validation` for negative hours.
    pub async fn resolve(&self, id: i64, hours: f64) -> Result<ItTicket, DatabaseError> {
        let patch = TicketPatchBuilder::new()
            .status(TicketStatus::Resolved)
            .resolution_time_hours(Some(hours))
            .build();
        let ticket = self.update(id, patch).await?;
        info!(id, hours, "ticket resolved");
        Ok(ticket)
    }
}

impl Repository for TicketRepo<'_> {
    type Entity = ItTicket;
    type Patch = TicketPatch;
    type Filter = TicketFilter;

    const KIND: EntityKind = EntityKind::Ticket;

    fn store(&self) -> &Store {
        self.store
    }

    async fn create_in(
        &self,
        conn: &StoreConn<'_>,
        ticket: &ItTicket,
    ) -> Result<i64, DatabaseError> {
        if let Some(id) = ticket.id() {
            return Err(DatabaseError::AlreadyPersisted {
                entity: Self::KIND,
                id,
            });
        }
        let id = conn
            .insert_with(
                "INSERT INTO tickets (source_id, priority, description, status, assigned_to, created_at,
                     resolution_time_hours, opened_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                column_values(ticket),
            )
            .await?;
        debug!(id, priority = %ticket.priority(), "ticket created");
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<ItTicket, DatabaseError> {
        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM tickets WHERE id = ?1"),
                vec![id.into()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: Self::KIND,
            id,
        })?;
        row_to_ticket(&row)
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<ItTicket>, DatabaseError> {
        let mut conditions = Conditions::default();
        if let Some(priority) = filter.priority {
            conditions.push("priority = ?", priority.as_str());
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?", status.as_str());
        }
        if let Some(ref assigned_to) = filter.assigned_to {
            conditions.push("assigned_to = ?", assigned_to.clone());
        }
        if let Some(opened_by) = filter.opened_by {
            conditions.push("opened_by = ?", opened_by);
        }
        if let Some(ref search) = filter.search {
            conditions.push("lower(description) LIKE ? ESCAPE '\\'", contains_pattern(search));
        }
        let (tail, params) = conditions.finish(filter.limit);

        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(&format!("SELECT {SELECT_COLS} FROM tickets {tail}"), params)
            .await?;
        let mut tickets = Vec::new();
        while let Some(row) = rows.next().await? {
            tickets.push(row_to_ticket(&row)?);
        }
        Ok(tickets)
    }

    async fn update(&self, id: i64, patch: TicketPatch) -> Result<ItTicket, DatabaseError> {
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = ItTicket::new(patch.apply(current.to_new()))?;

        let mut params = column_values(&merged);
        params.push(id.into());
        let conn = self.store.connection()?;
        conn.execute_with(
            "UPDATE tickets SET source_id = ?1, priority = ?2, description = ?3, status = ?4,
                 assigned_to = ?5, created_at = ?6, resolution_time_hours = ?7, opened_by = ?8
             WHERE id = ?9",
            params,
        )
        .await?;
        debug!(id, "ticket updated");
        Ok(merged.with_id(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_store, ticket};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_get_round_trips_every_field() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        let original = ItTicket::new(NewTicket {
            status: TicketStatus::Closed,
            assigned_to: Some("IT_Support_B".into()),
            resolution_time_hours: Some(12.75),
            opened_by: Some(4),
            source_id: Some("T-1".into()),
            ..ticket("Printer jam", TicketPriority::Low).to_new()
        })
        .unwrap();

        let id = repo.create(&original).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap(), original.with_id(id).unwrap());
    }

    #[tokio::test]
    async fn assign_moves_open_ticket_to_in_progress() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        let id = repo.create(&ticket("Reset MFA", TicketPriority::High)).await.unwrap();

        let assigned = repo.assign(id, "helpdesk").await.unwrap();
        assert_eq!(assigned.status(), TicketStatus::InProgress);
        assert_eq!(assigned.assigned_to(), Some("helpdesk"));

        let err = repo.assign(id, " ").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn resolve_sets_status_and_hours() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        let id = repo.create(&ticket("Disk full", TicketPriority::Medium)).await.unwrap();

        let resolved = repo.resolve(id, 6.5).await.unwrap();
        assert!(resolved.is_resolved());
        assert_eq!(resolved.resolution_time_hours(), Some(6.5));

        let err = repo.resolve(id, -1.0).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ref v) if v.field == "resolution_time_hours"
        ));
        assert!(matches!(
            repo.resolve(999, 1.0).await,
            Err(DatabaseError::NotFound { entity: EntityKind::Ticket, id: 999 })
        ));
    }

    #[tokio::test]
    async fn reopening_with_hours_is_rejected() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        let id = repo.create(&ticket("Disk full", TicketPriority::Medium)).await.unwrap();
        repo.resolve(id, 2.0).await.unwrap();

        let err = repo
            .update(id, TicketPatchBuilder::new().status(TicketStatus::Open).build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));

        let reopened = repo
            .update(
                id,
                TicketPatchBuilder::new()
                    .status(TicketStatus::Open)
                    .resolution_time_hours(None)
                    .build(),
            )
            .await
            .unwrap();
        assert!(reopened.is_open());
    }

    #[tokio::test]
    async fn list_filters_by_priority_and_search() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        repo.create(&ticket("Outlook crashes", TicketPriority::High)).await.unwrap();
        repo.create(&ticket("New monitor", TicketPriority::Low)).await.unwrap();
        repo.create(&ticket("outlook password", TicketPriority::Low)).await.unwrap();

        let outlook = repo
            .list(&TicketFilter {
                search: Some("OUTLOOK".into()),
                ..TicketFilter::default()
            })
            .await
            .unwrap();
        let descriptions: Vec<_> = outlook.iter().map(ItTicket::description).collect();
        assert_eq!(descriptions, ["Outlook crashes", "outlook password"]);

        let low = repo
            .list(&TicketFilter {
                priority: Some(TicketPriority::Low),
                ..TicketFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(low.len(), 2);
    }
}
