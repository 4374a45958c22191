use clap::{Args, Subcommand};

use super::subcommands::{DatasetCommands, IncidentCommands, TicketCommands, UserCommands};

/// Root command tree for the `mdip` binary.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the store and seed accounts from the users file.
    Init(InitArgs),
    /// Bulk-load the CSV sources.
    Import(ImportArgs),
    /// Security incident records.
    Incident {
        #[command(subcommand)]
        action: IncidentCommands,
    },
    /// Dataset metadata records.
    Dataset {
        #[command(subcommand)]
        action: DatasetCommands,
    },
    /// IT support tickets.
    Ticket {
        #[command(subcommand)]
        action: TicketCommands,
    },
    /// Accounts.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Skip seeding accounts even if the users file exists.
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Directory holding the CSV files (overrides `import.data_dir`).
    #[arg(long)]
    pub data_dir: Option<String>,
    /// Clear each target table before loading it.
    #[arg(long)]
    pub replace: bool,
    /// Load only one kind: incidents, datasets or tickets.
    #[arg(long)]
    pub only: Option<String>,
}
