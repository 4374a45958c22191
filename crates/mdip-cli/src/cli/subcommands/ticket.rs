use clap::Subcommand;

/// IT ticket commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TicketCommands {
    /// Open a ticket.
    Create {
        #[arg(long)]
        description: String,
        #[arg(long)]
        priority: String,
        #[arg(long, default_value = "Open")]
        status: String,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        opened_by: Option<i64>,
    },
    /// Get a ticket by id.
    Get { id: i64 },
    /// List tickets.
    List {
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update a ticket.
    Update {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Assign a ticket; an open ticket moves to In Progress.
    Assign {
        id: i64,
        #[arg(long = "to")]
        assignee: String,
    },
    /// Mark a ticket resolved with its resolution time.
    Resolve {
        id: i64,
        #[arg(long)]
        hours: f64,
    },
    /// Delete a ticket.
    Delete { id: i64 },
    /// Counts, SLA breaches and mean resolution time.
    Stats,
}
