// Library exports for binary tools and tests
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use db::{AnnouncementStore, MemoryStore, PgStore, TeacherDirectory};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub announcements: Arc<dyn AnnouncementStore>,
    pub teachers: Arc<dyn TeacherDirectory>,
    /// Present only when backed by PostgreSQL; used by the health check.
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        Self {
            announcements: store.clone(),
            teachers: store,
            db: Some(pool),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            announcements: store.clone(),
            teachers: store,
            db: None,
        }
    }
}
