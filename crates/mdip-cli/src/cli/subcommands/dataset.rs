use clap::Subcommand;

/// Dataset metadata commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DatasetCommands {
    /// Register a dataset.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rows: i64,
        #[arg(long)]
        columns: i64,
        #[arg(long)]
        uploaded_by: Option<String>,
        #[arg(long)]
        owner_id: Option<i64>,
        /// Defaults to now.
        #[arg(long)]
        upload_date: Option<String>,
    },
    /// Get a dataset by id.
    Get { id: i64 },
    /// List datasets.
    List {
        #[arg(long)]
        uploaded_by: Option<String>,
        #[arg(long)]
        owner_id: Option<i64>,
        #[arg(long)]
        min_rows: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update a dataset.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rows: Option<i64>,
        #[arg(long)]
        columns: Option<i64>,
        #[arg(long)]
        uploaded_by: Option<String>,
    },
    /// Delete a dataset.
    Delete { id: i64 },
    /// Count, total rows and the largest dataset.
    Stats,
}
