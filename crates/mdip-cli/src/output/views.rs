//! Table layouts for the domain responses.
//!
//! List views keep to the columns that fit on one line; a single record
//! shows every field.

use chrono::{DateTime, Utc};
use mdip_auth::SeedReport;
use mdip_core::entities::{Dataset, ItTicket, SecurityIncident, User};
use mdip_db::repos::stats::{DatasetStats, IncidentStats, TicketStats};

use super::{Cell, Render, Row, Table};
use crate::commands::Deleted;

fn id(id: Option<i64>) -> Cell {
    id.map_or_else(|| Cell::text("-"), Cell::number)
}

fn when(at: DateTime<Utc>) -> Cell {
    Cell::text(at.format("%Y-%m-%d %H:%M").to_string())
}

impl Row for SecurityIncident {
    const HEADERS: &'static [&'static str] = &["id", "severity", "status", "category", "title"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            id(self.id()),
            self.severity().into(),
            self.status().into(),
            Cell::text(self.category()),
            Cell::text(self.title()),
        ]
    }
}

impl Render for SecurityIncident {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("id", id(self.id()));
        table.field("title", Cell::text(self.title()));
        table.field("severity", self.severity().into());
        table.field("status", self.status().into());
        table.field("category", Cell::text(self.category()));
        table.field("timestamp", when(self.timestamp()));
        table.field("reported_by", Cell::optional(self.reported_by()));
        table.field("source_id", Cell::optional(self.source_id()));
        table.field("description", Cell::optional(self.description()));
        table
    }
}

impl Row for Dataset {
    const HEADERS: &'static [&'static str] = &["id", "rows", "columns", "uploaded_by", "name"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            id(self.id()),
            Cell::number(self.rows()),
            Cell::number(self.columns()),
            Cell::optional(self.uploaded_by()),
            Cell::text(self.name()),
        ]
    }
}

impl Render for Dataset {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("id", id(self.id()));
        table.field("name", Cell::text(self.name()));
        table.field("rows", Cell::number(self.rows()));
        table.field("columns", Cell::number(self.columns()));
        table.field("cells", Cell::number(self.cell_count()));
        table.field("uploaded_by", Cell::optional(self.uploaded_by()));
        table.field("owner_id", Cell::optional(self.owner_id()));
        table.field("upload_date", when(self.upload_date()));
        table.field("source_id", Cell::optional(self.source_id()));
        table
    }
}

impl Row for ItTicket {
    const HEADERS: &'static [&'static str] =
        &["id", "priority", "status", "assigned_to", "hours", "description"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            id(self.id()),
            self.priority().into(),
            self.status().into(),
            Cell::optional(self.assigned_to()),
            Cell::hours(self.resolution_time_hours()),
            Cell::text(self.description()),
        ]
    }
}

impl Render for ItTicket {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("id", id(self.id()));
        table.field("priority", self.priority().into());
        table.field("status", self.status().into());
        table.field("assigned_to", Cell::optional(self.assigned_to()));
        table.field("created_at", when(self.created_at()));
        table.field("sla_hours", Cell::number(self.sla_hours()));
        table.field("resolution_hours", Cell::hours(self.resolution_time_hours()));
        table.field("opened_by", Cell::optional(self.opened_by()));
        table.field("source_id", Cell::optional(self.source_id()));
        table.field("description", Cell::text(self.description()));
        table
    }
}

impl Row for User {
    const HEADERS: &'static [&'static str] = &["id", "role", "created_at", "username"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            id(self.id()),
            Cell::text(self.role().as_str()),
            when(self.created_at()),
            Cell::text(self.username()),
        ]
    }
}

impl Render for User {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("id", id(self.id()));
        table.field("username", Cell::text(self.username()));
        table.field("role", Cell::text(self.role().as_str()));
        table.field("created_at", when(self.created_at()));
        table
    }
}

/// `group | member | count` rows, one per enumeration member.
fn breakdown<E: Into<Cell> + Copy>(table: &mut Table, group: &str, counts: &[(E, u64)]) {
    for (member, n) in counts {
        table.push(vec![Cell::text(group), (*member).into(), Cell::number(n)]);
    }
}

impl Render for IncidentStats {
    fn to_table(&self) -> Table {
        let mut table = Table::new(&["group", "member", "count"]);
        table.push(vec![Cell::text("total"), Cell::text("-"), Cell::number(self.total)]);
        table.push(vec![Cell::text("open"), Cell::text("-"), Cell::number(self.open)]);
        breakdown(&mut table, "severity", &self.by_severity);
        breakdown(&mut table, "status", &self.by_status);
        table
    }
}

impl Render for TicketStats {
    fn to_table(&self) -> Table {
        let mut table = Table::new(&["group", "member", "count"]);
        table.push(vec![Cell::text("total"), Cell::text("-"), Cell::number(self.total)]);
        table.push(vec![
            Cell::text("sla_breached"),
            Cell::text("-"),
            Cell::number(self.sla_breached),
        ]);
        table.push(vec![
            Cell::text("avg_resolution_hours"),
            Cell::text("-"),
            Cell::hours(self.avg_resolution_hours),
        ]);
        breakdown(&mut table, "status", &self.by_status);
        breakdown(&mut table, "priority", &self.by_priority);
        table
    }
}

impl Render for DatasetStats {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("count", Cell::number(self.count));
        table.field("total_rows", Cell::number(self.total_rows));
        table.field("largest", Cell::optional(self.largest.as_ref().map(Dataset::name)));
        table
    }
}

impl Render for SeedReport {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("created", Cell::number(self.created));
        table.field("skipped_existing", Cell::number(self.skipped_existing));
        for failure in &self.failures {
            table.field(&format!("line {}", failure.line), Cell::text(&failure.reason));
        }
        table
    }
}

impl Render for Deleted {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("deleted", Cell::number(self.deleted));
        table
    }
}
