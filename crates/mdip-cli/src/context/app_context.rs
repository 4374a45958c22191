use anyhow::Context;
use mdip_config::MdipConfig;
use mdip_db::Store;
use tracing::debug;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: MdipConfig,
    pub store: Store,
}

impl AppContext {
    /// Open (and migrate) the store named by the config.
    pub async fn init(config: MdipConfig) -> anyhow::Result<Self> {
        let store = Store::open_with(&config.store.path, config.store.retry_config())
            .await
            .with_context(|| format!("failed to open store at {}", config.store.path))?;
        debug!(path = %config.store.path, "store opened");
        Ok(Self { config, store })
    }

    /// Result cap for list commands: local arg, then `--limit`, then config.
    #[must_use]
    pub fn limit(&self, local: Option<u32>, flags: &GlobalFlags) -> u32 {
        crate::commands::shared::limit::effective_limit(
            local,
            flags.limit,
            self.config.general.default_limit,
        )
    }
}

/// Load layered config (with `.env`) and apply the `--db` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<MdipConfig> {
    let mut config = MdipConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(db) = &flags.db {
        config.store.path.clone_from(db);
    }
    Ok(config)
}
