//! Admin account command handler

use crate::config::Config;
use crate::db::Store;

/// Create or update the single admin account. Safe to run repeatedly:
/// a second invocation overwrites the credentials of the existing row
/// instead of inserting another one.
pub async fn cmd_admin(config: &Config, username: &str, passwd: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let created = store
        .upsert_admin(username, passwd, &config.security)
        .await?;

    if created {
        println!("Create the admin account");
    } else {
        println!("Update the admin account");
    }

    println!("Done");
    Ok(())
}
