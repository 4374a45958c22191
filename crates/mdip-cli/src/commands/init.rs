use mdip_auth::SeedReport;
use mdip_auth::seed_from_file;
use serde::Serialize;
use tracing::info;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::{Cell, Render, Table, output};

#[derive(Debug, Serialize)]
struct InitResponse {
    store: String,
    seeded: Option<SeedReport>,
}

impl Render for InitResponse {
    fn to_table(&self) -> Table {
        let mut table = Table::record();
        table.field("store", Cell::text(&self.store));
        match &self.seeded {
            Some(report) => {
                table.field("accounts_created", Cell::number(report.created));
                table.field("accounts_skipped", Cell::number(report.skipped_existing));
                table.field("bad_lines", Cell::number(report.failures.len()));
            }
            None => table.field("accounts", Cell::text("not seeded")),
        }
        table
    }
}

/// Handle `mdip init`.
///
/// Opening the store runs the migrations. Accounts are seeded only when the
/// configured users file exists.
pub async fn handle(args: &InitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let users_file = ctx.config.auth.users_file();
    let seeded = if !args.no_seed && users_file.is_file() {
        Some(seed_from_file(&ctx.store, &users_file).await?)
    } else {
        info!(path = %users_file.display(), "no users file; skipping account seeding");
        None
    };
    output(
        &InitResponse {
            store: ctx.store.path().to_string(),
            seeded,
        },
        flags.format,
    )
}
