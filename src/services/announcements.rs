use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::{AnnouncementStore, TeacherDirectory},
    error::{AppError, AppResult},
    models::{
        announcement::{
            parse_timestamp, Announcement, AnnouncementFields, AnnouncementRequest,
            MESSAGE_MAX_CHARS,
        },
        teacher::Teacher,
    },
    services::metrics,
};

pub const INVALID_ID: &str = "Invalid announcement ID";
pub const NOT_FOUND: &str = "Announcement not found";

/// Fails with `Unauthorized` unless `username` names a known teacher.
pub async fn require_teacher(
    teachers: &dyn TeacherDirectory,
    username: Option<&str>,
) -> AppResult<Teacher> {
    let username = username.filter(|u| !u.is_empty()).ok_or(AppError::Unauthorized)?;
    teachers.find(username).await?.ok_or(AppError::Unauthorized)
}

/// Parse both dates and check that the start (when given) precedes expiration.
/// An empty start string counts as no start.
pub fn validate_dates(
    start_date: Option<&str>,
    expiration_date: &str,
) -> AppResult<(Option<DateTime<Utc>>, DateTime<Utc>)> {
    let expiration = parse_timestamp(expiration_date)
        .ok_or(AppError::Validation("Invalid expiration date format"))?;

    let start = match start_date.filter(|s| !s.is_empty()) {
        Some(raw) => {
            let start =
                parse_timestamp(raw).ok_or(AppError::Validation("Invalid start date format"))?;
            if start >= expiration {
                return Err(AppError::Validation(
                    "Start date must be before expiration date",
                ));
            }
            Some(start)
        }
        None => None,
    };

    Ok((start, expiration))
}

pub fn validate_request(req: &AnnouncementRequest) -> AppResult<AnnouncementFields> {
    let len = req.message.chars().count();
    if len == 0 || len > MESSAGE_MAX_CHARS {
        return Err(AppError::InvalidBody(
            "Message must be between 1 and 500 characters",
        ));
    }
    let (start_date, expiration_date) =
        validate_dates(req.start_date.as_deref(), &req.expiration_date)?;
    Ok(AnnouncementFields {
        message: req.message.clone(),
        start_date,
        expiration_date,
    })
}

pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(INVALID_ID))
}

pub struct AnnouncementService;

impl AnnouncementService {
    pub async fn list_all(store: &dyn AnnouncementStore) -> AppResult<Vec<Announcement>> {
        Ok(store.list_all().await?)
    }

    pub async fn list_active(
        store: &dyn AnnouncementStore,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Announcement>> {
        let rows = store.list_active(now).await?;
        metrics::ACTIVE_ANNOUNCEMENTS_GAUGE.set(rows.len() as f64);
        Ok(rows)
    }

    pub async fn create(
        store: &dyn AnnouncementStore,
        teacher: &Teacher,
        req: &AnnouncementRequest,
    ) -> AppResult<Announcement> {
        let result = Self::create_inner(store, teacher, req).await;
        metrics::record_write("create", &result);
        result
    }

    async fn create_inner(
        store: &dyn AnnouncementStore,
        teacher: &Teacher,
        req: &AnnouncementRequest,
    ) -> AppResult<Announcement> {
        let fields = validate_request(req)?;
        let record = store.insert(&fields, &teacher.username, Utc::now()).await?;
        info!("Announcement {} created by {}", record.id, teacher.username);
        Ok(record)
    }

    pub async fn update(
        store: &dyn AnnouncementStore,
        teacher: &Teacher,
        raw_id: &str,
        req: &AnnouncementRequest,
    ) -> AppResult<()> {
        let result = Self::update_inner(store, teacher, raw_id, req).await;
        metrics::record_write("update", &result);
        result
    }

    async fn update_inner(
        store: &dyn AnnouncementStore,
        teacher: &Teacher,
        raw_id: &str,
        req: &AnnouncementRequest,
    ) -> AppResult<()> {
        let fields = validate_request(req)?;
        let id = parse_id(raw_id)?;
        if !store.update(id, &fields).await? {
            return Err(AppError::NotFound(NOT_FOUND));
        }
        info!("Announcement {} updated by {}", id, teacher.username);
        Ok(())
    }

    pub async fn delete(
        store: &dyn AnnouncementStore,
        teacher: &Teacher,
        raw_id: &str,
    ) -> AppResult<()> {
        let result = Self::delete_inner(store, teacher, raw_id).await;
        metrics::record_write("delete", &result);
        result
    }

    async fn delete_inner(
        store: &dyn AnnouncementStore,
        teacher: &Teacher,
        raw_id: &str,
    ) -> AppResult<()> {
        let id = parse_id(raw_id)?;
        if !store.delete(id).await? {
            return Err(AppError::NotFound(NOT_FOUND));
        }
        info!("Announcement {} deleted by {}", id, teacher.username);
        Ok(())
    }
}
