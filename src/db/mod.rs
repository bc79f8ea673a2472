pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    announcement::{Announcement, AnnouncementFields},
    teacher::Teacher,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence for announcement records. Each call touches at most one
/// record except the list and purge operations.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// Every record, newest `created_at` first.
    async fn list_all(&self) -> anyhow::Result<Vec<Announcement>>;

    /// Records active at `now`, newest `created_at` first.
    async fn list_active(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Announcement>>;

    async fn insert(
        &self,
        fields: &AnnouncementFields,
        created_by: &str,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Announcement>;

    /// Overwrites the mutable fields. Returns `false` when no record has `id`.
    async fn update(&self, id: Uuid, fields: &AnnouncementFields) -> anyhow::Result<bool>;

    /// Returns `false` when nothing was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Number of records whose expiration date is at or before `cutoff`.
    async fn count_expired(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64>;

    /// Physically removes records whose expiration date is at or before `cutoff`.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64>;
}

/// Read-only lookup of teacher identity records.
#[async_trait]
pub trait TeacherDirectory: Send + Sync {
    async fn find(&self, username: &str) -> anyhow::Result<Option<Teacher>>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded in ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
