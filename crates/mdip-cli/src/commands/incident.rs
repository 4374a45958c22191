use mdip_core::entities::{NewIncident, SecurityIncident};
use mdip_db::repos::stats::incident_stats;
use mdip_db::repos::{IncidentFilter, IncidentRepo, Repository};
use mdip_db::updates::incident::IncidentPatchBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::IncidentCommands;
use crate::commands::shared::parse::{parse_enum, parse_when};
use crate::commands::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mdip incident`.
pub async fn handle(
    action: &IncidentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let repo = IncidentRepo::new(&ctx.store);
    match action {
        IncidentCommands::Create {
            title,
            severity,
            category,
            status,
            description,
            timestamp,
            reported_by,
        } => {
            let incident = SecurityIncident::new(NewIncident {
                title: title.clone(),
                description: description.clone(),
                severity: parse_enum(severity, "severity")?,
                category: category.clone(),
                status: parse_enum(status, "status")?,
                timestamp: parse_when(timestamp.as_deref(), "timestamp")?,
                reported_by: *reported_by,
                source_id: None,
            })?;
            let id = repo.create(&incident).await?;
            output(&repo.get(id).await?, flags.format)
        }
        IncidentCommands::Get { id } => output(&repo.get(*id).await?, flags.format),
        IncidentCommands::List {
            severity,
            status,
            category,
            search,
            limit,
        } => {
            let filter = IncidentFilter {
                severity: severity
                    .as_deref()
                    .map(|s| parse_enum(s, "severity"))
                    .transpose()?,
                status: status
                    .as_deref()
                    .map(|s| parse_enum(s, "status"))
                    .transpose()?,
                category: category.clone(),
                reported_by: None,
                search: search.clone(),
                limit: Some(ctx.limit(*limit, flags)),
            };
            output(&repo.list(&filter).await?, flags.format)
        }
        IncidentCommands::Update {
            id,
            title,
            severity,
            category,
            status,
            description,
        } => {
            let mut builder = IncidentPatchBuilder::new();
            if let Some(title) = title {
                builder = builder.title(title);
            }
            if let Some(severity) = severity.as_deref() {
                builder = builder.severity(parse_enum(severity, "severity")?);
            }
            if let Some(category) = category {
                builder = builder.category(category);
            }
            if let Some(status) = status.as_deref() {
                builder = builder.status(parse_enum(status, "status")?);
            }
            if let Some(description) = description {
                builder = builder.description(Some(description.clone()));
            }
            let patch = builder.build();
            if patch.is_empty() {
                anyhow::bail!(
                    "At least one of --title, --severity, --category, --status or --description must be provided"
                );
            }
            output(&repo.update(*id, patch).await?, flags.format)
        }
        IncidentCommands::Delete { id } => {
            repo.delete(*id).await?;
            output(&Deleted::new(*id), flags.format)
        }
        IncidentCommands::Stats => output(&incident_stats(&ctx.store).await?, flags.format),
    }
}
