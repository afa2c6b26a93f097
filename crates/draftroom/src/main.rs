use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use draftroom::{
    cache::MemoryCache,
    cli::{build_access, execute, Cli},
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "draftroom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let resolver = cli.resolver();

    let mut config = Config::from_env();
    if let Some(db) = &cli.db {
        config.sqlite_path = db.clone();
    }

    #[cfg(feature = "sqlite")]
    let repository = Arc::new(
        draftroom::storage::SqliteRepository::new(&config.sqlite_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.sqlite_path))?,
    );
    #[cfg(not(feature = "sqlite"))]
    let repository = Arc::new(draftroom::storage::InMemoryRepository::new());

    #[cfg(feature = "redis")]
    if let Some(url) = &config.redis_url {
        let cache = Arc::new(
            draftroom::cache::RedisCache::new(url)
                .await
                .context("Failed to connect to Redis")?,
        );
        tracing::info!("Using Redis cache");
        let access = build_access(repository, cache, resolver, &config);
        return print_output(execute(cli, &access).await?);
    }

    let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
    tracing::info!(
        max_entries = config.cache_max_entries,
        "Using in-memory cache"
    );
    let access = build_access(repository, cache, resolver, &config);
    print_output(execute(cli, &access).await?)
}

fn print_output(value: serde_json::Value) -> anyhow::Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
