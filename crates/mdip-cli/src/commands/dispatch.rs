use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: &Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => commands::init::handle(args, ctx, flags).await,
        Commands::Import(args) => commands::import::handle(args, ctx, flags).await,
        Commands::Incident { action } => commands::incident::handle(action, ctx, flags).await,
        Commands::Dataset { action } => commands::dataset::handle(action, ctx, flags).await,
        Commands::Ticket { action } => commands::ticket::handle(action, ctx, flags).await,
        Commands::User { action } => commands::user::handle(action, ctx, flags).await,
    }
}
