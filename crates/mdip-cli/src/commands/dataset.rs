use mdip_core::entities::{Dataset, NewDataset};
use mdip_db::repos::stats::dataset_stats;
use mdip_db::repos::{DatasetFilter, DatasetRepo, Repository};
use mdip_db::updates::dataset::DatasetPatchBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DatasetCommands;
use crate::commands::Deleted;
use crate::commands::shared::parse::parse_when;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mdip dataset`.
pub async fn handle(
    action: &DatasetCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let repo = DatasetRepo::new(&ctx.store);
    match action {
        DatasetCommands::Create {
            name,
            rows,
            columns,
            uploaded_by,
            owner_id,
            upload_date,
        } => {
            let dataset = Dataset::new(NewDataset {
                name: name.clone(),
                rows: *rows,
                columns: *columns,
                uploaded_by: uploaded_by.clone(),
                owner_id: *owner_id,
                upload_date: parse_when(upload_date.as_deref(), "upload_date")?,
                source_id: None,
            })?;
            let id = repo.create(&dataset).await?;
            output(&repo.get(id).await?, flags.format)
        }
        DatasetCommands::Get { id } => output(&repo.get(*id).await?, flags.format),
        DatasetCommands::List {
            uploaded_by,
            owner_id,
            min_rows,
            limit,
        } => {
            let filter = DatasetFilter {
                owner_id: *owner_id,
                uploaded_by: uploaded_by.clone(),
                min_rows: *min_rows,
                limit: Some(ctx.limit(*limit, flags)),
            };
            output(&repo.list(&filter).await?, flags.format)
        }
        DatasetCommands::Update {
            id,
            name,
            rows,
            columns,
            uploaded_by,
        } => {
            let mut builder = DatasetPatchBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(rows) = rows {
                builder = builder.rows(*rows);
            }
            if let Some(columns) = columns {
                builder = builder.columns(*columns);
            }
            if let Some(uploaded_by) = uploaded_by {
                builder = builder.uploaded_by(Some(uploaded_by.clone()));
            }
            let patch = builder.build();
            if patch.is_empty() {
                anyhow::bail!(
                    "At least one of --name, --rows, --columns or --uploaded-by must be provided"
                );
            }
            output(&repo.update(*id, patch).await?, flags.format)
        }
        DatasetCommands::Delete { id } => {
            repo.delete(*id).await?;
            output(&Deleted::new(*id), flags.format)
        }
        DatasetCommands::Stats => output(&dataset_stats(&ctx.store).await?, flags.format),
    }
}
