pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod state;
pub mod web;

pub use config::Config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let args = cli::Cli::parse();

    match args.command.unwrap_or(cli::Commands::Serve) {
        cli::Commands::Serve => cli::cmd_serve(config).await,

        cli::Commands::Initdb { drop } => cli::cmd_initdb(&config, drop).await,

        cli::Commands::Admin { username, passwd } => {
            cli::cmd_admin(&config, &username, &passwd).await
        }

        cli::Commands::Forge => cli::cmd_forge(&config).await,

        cli::Commands::Init => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }
    }
}
