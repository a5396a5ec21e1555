//! Apply versioned schema migrations to the configured database
//!
//! Usage: `DATABASE_URL=sqlite:student.db cargo run --bin migrate`

use anyhow::Context;
use student_records::records::SqliteRecordStore;
use student_records::Config;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("Migrating database at {}", config.database.url);

    let store = SqliteRecordStore::connect(&config.database.url, 1)
        .await
        .context("Failed to open database")?;
    store.migrate().await.context("Failed to apply migrations")?;

    store.pool().close().await;
    info!("Database is up to date");
    Ok(())
}
