//! One-shot import of the three CSV sources.

use std::path::PathBuf;

use mdip_core::entities::{DatasetDraft, IncidentDraft, TicketDraft};
use mdip_core::enums::EntityKind;

use super::{ImportError, ImportReport, load_file};
use crate::Store;
use crate::repos::{DatasetRepo, IncidentRepo, TicketRepo};

/// Which sources to load and from where.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub data_dir: PathBuf,
    pub incidents_file: String,
    pub datasets_file: String,
    pub tickets_file: String,
    /// Clear each target table before loading it.
    pub replace: bool,
    /// Load a single kind instead of all three.
    pub only: Option<EntityKind>,
}

impl ImportPlan {
    /// The kinds this plan covers, in load order, with their source paths.
    #[must_use]
    pub fn steps(&self) -> Vec<(EntityKind, PathBuf)> {
        [
            (EntityKind::Incident, &self.incidents_file),
            (EntityKind::Dataset, &self.datasets_file),
            (EntityKind::Ticket, &self.tickets_file),
        ]
        .into_iter()
        .filter(|(kind, _)| self.only.is_none_or(|only| only == *kind))
        .map(|(kind, file)| (kind, self.data_dir.join(file)))
        .collect()
    }
}

/// Result of one step. A failed step never stops the others.
#[derive(Debug)]
pub struct ImportOutcome {
    pub entity: EntityKind,
    pub source: PathBuf,
    pub result: Result<ImportReport, ImportError>,
}

/// Run every step of `plan` against `store`.
pub async fn import_all(store: &Store, plan: &ImportPlan) -> Vec<ImportOutcome> {
    let mut outcomes = Vec::new();
    for (entity, source) in plan.steps() {
        let result = match entity {
            EntityKind::Incident => {
                load_file::<IncidentDraft, _>(&IncidentRepo::new(store), &source, plan.replace).await
            }
            EntityKind::Dataset => {
                load_file::<DatasetDraft, _>(&DatasetRepo::new(store), &source, plan.replace).await
            }
            EntityKind::Ticket => {
                load_file::<TicketDraft, _>(&TicketRepo::new(store), &source, plan.replace).await
            }
            EntityKind::User => continue,
        };
        if let Err(ref e) = result {
            tracing::error!(%entity, source = %source.display(), error = %e, "import step failed");
        }
        outcomes.push(ImportOutcome {
            entity,
            source,
            result,
        });
    }
    outcomes
}
