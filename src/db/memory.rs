use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnnouncementStore, TeacherDirectory};
use crate::models::{
    announcement::{Announcement, AnnouncementFields},
    teacher::Teacher,
};

/// Process-local store used when no DATABASE_URL is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    announcements: RwLock<Vec<Announcement>>,
    teachers: RwLock<HashMap<String, Teacher>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teachers<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let teachers = usernames
            .into_iter()
            .map(|u| {
                let username = u.into();
                let teacher = Teacher {
                    username: username.clone(),
                    display_name: None,
                    created_at: now,
                };
                (username, teacher)
            })
            .collect();
        Self {
            announcements: RwLock::default(),
            teachers: RwLock::new(teachers),
        }
    }

    pub async fn add_teacher(&self, username: &str, display_name: Option<&str>) {
        self.teachers.write().await.insert(
            username.to_string(),
            Teacher {
                username: username.to_string(),
                display_name: display_name.map(str::to_string),
                created_at: Utc::now(),
            },
        );
    }
}

/// Rows are kept newest-inserted first, so the stable sort breaks ties the same way.
fn newest_first(mut rows: Vec<Announcement>) -> Vec<Announcement> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[async_trait]
impl AnnouncementStore for MemoryStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Announcement>> {
        Ok(newest_first(self.announcements.read().await.clone()))
    }

    async fn list_active(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Announcement>> {
        let rows = self
            .announcements
            .read()
            .await
            .iter()
            .filter(|a| a.is_active_at(now))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn insert(
        &self,
        fields: &AnnouncementFields,
        created_by: &str,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Announcement> {
        let record = Announcement {
            id: Uuid::new_v4(),
            message: fields.message.clone(),
            start_date: fields.start_date,
            expiration_date: fields.expiration_date,
            created_by: created_by.to_string(),
            created_at,
        };
        self.announcements.write().await.insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, fields: &AnnouncementFields) -> anyhow::Result<bool> {
        let mut rows = self.announcements.write().await;
        match rows.iter_mut().find(|a| a.id == id) {
            Some(existing) => {
                existing.message = fields.message.clone();
                existing.start_date = fields.start_date;
                existing.expiration_date = fields.expiration_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.announcements.write().await;
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() < before)
    }

    async fn count_expired(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let rows = self.announcements.read().await;
        Ok(rows.iter().filter(|a| a.expiration_date <= cutoff).count() as u64)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut rows = self.announcements.write().await;
        let before = rows.len();
        rows.retain(|a| a.expiration_date > cutoff);
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl TeacherDirectory for MemoryStore {
    async fn find(&self, username: &str) -> anyhow::Result<Option<Teacher>> {
        Ok(self.teachers.read().await.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fields(expires_in_hours: i64) -> AnnouncementFields {
        AnnouncementFields {
            message: "Picture day".into(),
            start_date: None,
            expiration_date: Utc::now() + Duration::hours(expires_in_hours),
        }
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_records() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(!store.update(id, &fields(1)).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn update_keeps_creation_stamp() {
        let store = MemoryStore::new();
        let created_at = Utc::now() - Duration::days(1);
        let record = store.insert(&fields(1), "t1", created_at).await.unwrap();

        let mut changed = fields(5);
        changed.message = "Picture day moved".into();
        assert!(store.update(record.id, &changed).await.unwrap());

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, record.id);
        assert_eq!(rows[0].message, "Picture day moved");
        assert_eq!(rows[0].created_by, "t1");
        assert_eq!(rows[0].created_at, created_at);
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert(&fields(-48), "t1", now).await.unwrap();
        store.insert(&fields(48), "t1", now).await.unwrap();

        assert_eq!(store.count_expired(now).await.unwrap(), 1);
        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn teacher_lookup_is_exact() {
        let store = MemoryStore::with_teachers(["mrodriguez"]);
        assert!(store.find("mrodriguez").await.unwrap().is_some());
        assert!(store.find("MRodriguez").await.unwrap().is_none());

        store.add_teacher("mchen", Some("Ms. Chen")).await;
        let teacher = store.find("mchen").await.unwrap().unwrap();
        assert_eq!(teacher.display_name.as_deref(), Some("Ms. Chen"));
    }
}
