use chrono::Utc;
use mdip_core::entities::{ItTicket, NewTicket};
use mdip_db::repos::stats::ticket_stats;
use mdip_db::repos::{Repository, TicketFilter, TicketRepo};
use mdip_db::updates::ticket::TicketPatchBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TicketCommands;
use crate::commands::Deleted;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mdip ticket`.
pub async fn handle(
    action: &TicketCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let repo = TicketRepo::new(&ctx.store);
    match action {
        TicketCommands::Create {
            description,
            priority,
            status,
            assigned_to,
            opened_by,
        } => {
            let ticket = ItTicket::new(NewTicket {
                priority: parse_enum(priority, "priority")?,
                description: description.clone(),
                status: parse_enum(status, "status")?,
                assigned_to: assigned_to.clone(),
                created_at: Utc::now(),
                resolution_time_hours: None,
                opened_by: *opened_by,
                source_id: None,
            })?;
            let id = repo.create(&ticket).await?;
            output(&repo.get(id).await?, flags.format)
        }
        TicketCommands::Get { id } => output(&repo.get(*id).await?, flags.format),
        TicketCommands::List {
            priority,
            status,
            assigned_to,
            search,
            limit,
        } => {
            let filter = TicketFilter {
                priority: priority
                    .as_deref()
                    .map(|p| parse_enum(p, "priority"))
                    .transpose()?,
                status: status
                    .as_deref()
                    .map(|s| parse_enum(s, "status"))
                    .transpose()?,
                assigned_to: assigned_to.clone(),
                opened_by: None,
                search: search.clone(),
                limit: Some(ctx.limit(*limit, flags)),
            };
            output(&repo.list(&filter).await?, flags.format)
        }
        TicketCommands::Update {
            id,
            description,
            priority,
            status,
        } => {
            let mut builder = TicketPatchBuilder::new();
            if let Some(description) = description {
                builder = builder.description(description);
            }
            if let Some(priority) = priority.as_deref() {
                builder = builder.priority(parse_enum(priority, "priority")?);
            }
            if let Some(status) = status.as_deref() {
                builder = builder.status(parse_enum(status, "status")?);
            }
            let patch = builder.build();
            if patch.is_empty() {
                anyhow::bail!("At least one of --description, --priority or --status must be provided");
            }
            output(&repo.update(*id, patch).await?, flags.format)
        }
        TicketCommands::Assign { id, assignee } => {
            output(&repo.assign(*id, assignee).await?, flags.format)
        }
        TicketCommands::Resolve { id, hours } => {
            output(&repo.resolve(*id, *hours).await?, flags.format)
        }
        TicketCommands::Delete { id } => {
            repo.delete(*id).await?;
            output(&Deleted::new(*id), flags.format)
        }
        TicketCommands::Stats => output(&ticket_stats(&ctx.store, Utc::now()).await?, flags.format),
    }
}
