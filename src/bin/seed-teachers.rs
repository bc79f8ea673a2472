//! Teacher seed script
//!
//! Registers the usernames allowed to manage announcements. Re-running it is
//! harmless: existing teachers are kept, only their display name is refreshed.
//!
//! Usage:
//!   DATABASE_URL=... ./seed-teachers mrodriguez mchen --display-name "Staff"

use anyhow::{Context, Result};
use clap::Parser;

use school_announcements_api::db::{self, PgStore};

#[derive(Parser)]
#[command(name = "seed-teachers", about = "Register teacher usernames")]
struct Args {
    /// Usernames to register
    #[arg(required = true)]
    usernames: Vec<String>,

    /// Display name applied to every username in this run
    #[arg(long)]
    display_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;

    println!("=== Seed Teachers ===");

    let pool = db::create_pool(&database_url, 5)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await?;
    let store = PgStore::new(pool);

    for username in args.usernames.iter().filter(|u| !u.trim().is_empty()) {
        let teacher = store
            .upsert_teacher(username.trim(), args.display_name.as_deref())
            .await
            .with_context(|| format!("Failed to register teacher {username}"))?;
        println!("  {} (since {})", teacher.username, teacher.created_at.to_rfc3339());
    }

    println!("Done.");
    Ok(())
}
