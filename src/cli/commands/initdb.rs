//! Initdb command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_initdb(config: &Config, drop: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if drop {
        store.reset().await?;
    }

    println!("Initialized db");
    Ok(())
}
