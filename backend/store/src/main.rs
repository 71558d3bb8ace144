//! Flock — entry point.
//!
//! Opens the database (running any pending migrations) and prints a JSON
//! report on the current campaign.

use tracing::info;
use tracing_subscriber::EnvFilter;

use flock_store::config::Config;
use flock_store::{db, report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url, config.max_connections).await?;

    match report::current_report(&pool).await? {
        Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
        None => info!("No active project"),
    }

    pool.close().await;
    Ok(())
}
