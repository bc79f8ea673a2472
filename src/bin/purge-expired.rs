//! Delete announcements that expired more than N days ago.
//! Run daily (e.g., via cron job: 0 2 * * * /app/purge-expired)
//!
//! Usage: purge-expired [--older-than-days N] [--dry-run]

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;

use school_announcements_api::db::{self, AnnouncementStore, PgStore};

#[derive(Parser)]
#[command(name = "purge-expired", about = "Purge long-expired announcements")]
struct Args {
    /// Keep announcements that expired less than this many days ago
    #[arg(long, default_value_t = 30)]
    older_than_days: i64,

    /// Only report how many announcements would be removed
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.older_than_days >= 0, "--older-than-days must not be negative");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let pool = db::create_pool(&database_url, 5).await?;
    let store = PgStore::new(pool);

    let cutoff = Utc::now() - Duration::days(args.older_than_days);
    tracing::info!("Purging announcements expired on or before {}", cutoff.to_rfc3339());

    if args.dry_run {
        let count = store.count_expired(cutoff).await?;
        tracing::info!("Dry run: {} announcement(s) would be removed", count);
    } else {
        let removed = store.purge_expired(cutoff).await?;
        tracing::info!("Removed {} announcement(s)", removed);
    }

    Ok(())
}
