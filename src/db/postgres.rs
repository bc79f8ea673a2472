use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AnnouncementStore, TeacherDirectory};
use crate::models::{
    announcement::{Announcement, AnnouncementFields},
    teacher::Teacher,
};

const COLUMNS: &str = "id, message, start_date, expiration_date, created_by, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a teacher, or refresh the display name if the username exists.
    pub async fn upsert_teacher(
        &self,
        username: &str,
        display_name: Option<&str>,
    ) -> anyhow::Result<Teacher> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "INSERT INTO teachers (username, display_name)
             VALUES ($1, $2)
             ON CONFLICT (username) DO UPDATE SET
                 display_name = COALESCE(EXCLUDED.display_name, teachers.display_name)
             RETURNING username, display_name, created_at",
        )
        .bind(username)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(teacher)
    }
}

#[async_trait]
impl AnnouncementStore for PgStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {COLUMNS} FROM announcements ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {COLUMNS} FROM announcements
             WHERE expiration_date > $1
               AND (start_date IS NULL OR start_date <= $1)
             ORDER BY created_at DESC"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(
        &self,
        fields: &AnnouncementFields,
        created_by: &str,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Announcement> {
        let row = sqlx::query_as::<_, Announcement>(&format!(
            "INSERT INTO announcements (message, start_date, expiration_date, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(&fields.message)
        .bind(fields.start_date)
        .bind(fields.expiration_date)
        .bind(created_by)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: &AnnouncementFields) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE announcements
             SET message = $1, start_date = $2, expiration_date = $3
             WHERE id = $4",
        )
        .bind(&fields.message)
        .bind(fields.start_date)
        .bind(fields.expiration_date)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_expired(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM announcements WHERE expiration_date <= $1",
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM announcements WHERE expiration_date <= $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TeacherDirectory for PgStore {
    async fn find(&self, username: &str) -> anyhow::Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "SELECT username, display_name, created_at FROM teachers WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(teacher)
    }
}
