use clap::Subcommand;

/// Security incident commands.
#[derive(Clone, Debug, Subcommand)]
pub enum IncidentCommands {
    /// Record an incident.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        severity: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "Open")]
        status: String,
        #[arg(long)]
        description: Option<String>,
        /// Defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long)]
        reported_by: Option<i64>,
    },
    /// Get an incident by id.
    Get { id: i64 },
    /// List incidents.
    List {
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Substring match on title or description.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update an incident.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an incident.
    Delete { id: i64 },
    /// Counts by severity and status.
    Stats,
}
