use std::path::PathBuf;

use mdip_core::enums::EntityKind;
use mdip_db::import::{ImportPlan, ImportReport, import_all};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::{Cell, Row, output};

#[derive(Debug, Serialize)]
struct StepSummary {
    entity: EntityKind,
    source: String,
    report: Option<ImportReport>,
    error: Option<String>,
}

impl Row for StepSummary {
    const HEADERS: &'static [&'static str] =
        &["entity", "attempted", "loaded", "failed", "cleared", "source", "error"];

    fn cells(&self) -> Vec<Cell> {
        let report = self.report.as_ref();
        vec![
            Cell::text(self.entity.as_str()),
            Cell::optional(report.map(|r| r.attempted)),
            Cell::optional(report.map(|r| r.succeeded)),
            Cell::optional(report.map(ImportReport::failed)),
            Cell::optional(report.map(|r| r.cleared)),
            Cell::text(&self.source),
            Cell::optional(self.error.as_deref()),
        ]
    }
}

/// Handle `mdip import`.
///
/// Every step runs even if an earlier one fails; the command exits non-zero
/// afterwards if any step failed.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let plan = build_plan(args, ctx)?;
    let outcomes = import_all(&ctx.store, &plan).await;

    let failed_steps = outcomes.iter().filter(|o| o.result.is_err()).count();
    let summary: Vec<StepSummary> = outcomes
        .into_iter()
        .map(|outcome| {
            let (report, error) = match outcome.result {
                Ok(report) => (Some(report), None),
                Err(e) => (None, Some(e.to_string())),
            };
            StepSummary {
                entity: outcome.entity,
                source: outcome.source.display().to_string(),
                report,
                error,
            }
        })
        .collect();
    output(&summary, flags.format)?;

    if failed_steps > 0 {
        anyhow::bail!("{failed_steps} import step(s) failed");
    }
    Ok(())
}

fn build_plan(args: &ImportArgs, ctx: &AppContext) -> anyhow::Result<ImportPlan> {
    let import = &ctx.config.import;
    let only = match args.only.as_deref() {
        None => None,
        // Accepts `ticket` or `tickets`.
        Some(raw) => match parse_enum::<EntityKind>(raw.strip_suffix('s').unwrap_or(raw), "--only")? {
            EntityKind::User => anyhow::bail!("users are seeded with `mdip user seed`, not imported"),
            kind => Some(kind),
        },
    };
    Ok(ImportPlan {
        data_dir: args
            .data_dir
            .as_deref()
            .map_or_else(|| import.data_dir(), PathBuf::from),
        incidents_file: import.incidents_file.clone(),
        datasets_file: import.datasets_file.clone(),
        tickets_file: import.tickets_file.clone(),
        replace: args.replace,
        only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdip_config::MdipConfig;
    use pretty_assertions::assert_eq;

    async fn ctx(dir: &tempfile::TempDir) -> AppContext {
        let mut config = MdipConfig::default();
        config.store.path = dir.path().join("cli.db").display().to_string();
        AppContext::init(config).await.unwrap()
    }

    #[tokio::test]
    async fn flags_override_configured_sources() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(&dir).await;
        let args = ImportArgs {
            data_dir: Some("fixtures".into()),
            replace: true,
            only: Some("tickets".into()),
        };
        let plan = build_plan(&args, &ctx).unwrap();
        assert_eq!(plan.data_dir, PathBuf::from("fixtures"));
        assert!(plan.replace);
        assert_eq!(plan.only, Some(EntityKind::Ticket));
        assert_eq!(plan.tickets_file, "it_tickets.csv");
    }

    #[tokio::test]
    async fn users_cannot_be_imported() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(&dir).await;
        let args = ImportArgs {
            data_dir: None,
            replace: false,
            only: Some("user".into()),
        };
        assert!(build_plan(&args, &ctx).is_err());
    }

    #[test]
    fn failed_step_row_shows_error_and_no_counts() {
        let step = StepSummary {
            entity: EntityKind::Dataset,
            source: "DATA/datasets.csv".into(),
            report: None,
            error: Some("source file not found: DATA/datasets.csv".into()),
        };
        let cells = step.cells();
        assert_eq!(cells.len(), StepSummary::HEADERS.len());
        assert_eq!(cells[0], Cell::text("dataset"));
        assert_eq!(cells[1], Cell::text("-"));
        assert_eq!(cells[6], Cell::text("source file not found: DATA/datasets.csv"));
    }
}
