use crate::config::Config;
use crate::db::Store;

/// Process-wide state shared by the web handlers and the CLI commands.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self { config, store })
    }
}
