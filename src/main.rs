mod config;
mod executor;
mod pipeline;
mod protocol;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use config::Config;
use executor::RedisExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = Config::parse();

    info!(
        "Replaying monitor feed to {} (db {})",
        config.addr(),
        config.db
    );

    // An unreachable destination is fatal; nothing has been read from
    // the feed yet.
    let executor = RedisExecutor::connect(&config)
        .await
        .with_context(|| format!("redis connection error ({})", config.addr()))?;

    let input = BufReader::new(tokio::io::stdin());
    pipeline::run(input, Box::new(executor), config.log_commands).await;

    info!("Monitor feed closed, replication complete");
    Ok(())
}
