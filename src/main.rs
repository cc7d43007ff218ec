//! opscat - inspect remote command executions and their outputs
//!
//! `opscat ls` lists commands issued inside a time window; `opscat cat`
//! prints the per-instance output of one command, pulling mirrored files
//! through a local object cache.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opscat::app;
use opscat::cache::{CacheManager, ObjectCache};
use opscat::cli::{Cli, Commands};
use opscat::config::Config;
use opscat::data::{CommandServiceClient, HttpInventoryClient, HttpObjectStore, InstanceDirectory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so piped stdout stays clean command output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opscat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    let service = CommandServiceClient::new(&config.endpoint);

    match &cli.command {
        Commands::Ls {
            after,
            before,
            delta,
        } => {
            app::list_commands(&service, after.as_deref(), before.as_deref(), delta).await?;
        }
        Commands::Cat { command_id } => {
            let inventory = HttpInventoryClient::new(&config.endpoint);
            let directory =
                InstanceDirectory::new(inventory, CacheManager::new(config.meta_cache_root));
            let store = HttpObjectStore::new(&config.endpoint);
            let cache = ObjectCache::new(config.object_cache_root, store);
            app::show_command(&service, &directory, &cache, command_id).await?;
        }
    }

    Ok(())
}
