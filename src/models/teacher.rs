use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identity record whose existence authorizes announcement writes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query string carried by every write endpoint.
#[derive(Debug, Deserialize)]
pub struct TeacherQuery {
    pub teacher_username: Option<String>,
}
