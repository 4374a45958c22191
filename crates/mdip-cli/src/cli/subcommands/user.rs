use clap::Subcommand;

/// Account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create an account. The password is read from `MDIP_PASSWORD` when not given.
    Register {
        username: String,
        #[arg(long, env = "MDIP_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Check a username and password.
    Login {
        username: String,
        #[arg(long, env = "MDIP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List accounts (hashes are never shown).
    List {
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Create accounts from a users file (defaults to `auth.users_file`).
    Seed {
        #[arg(long)]
        file: Option<String>,
    },
}
