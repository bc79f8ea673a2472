use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::{json::JsonBody, teacher::AuthorizedTeacher},
    models::announcement::{Announcement, AnnouncementRequest},
    services::announcements::AnnouncementService,
    AppState,
};

/// GET /announcements — every announcement, newest first.
pub async fn list_announcements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Announcement>>> {
    AnnouncementService::list_all(state.announcements.as_ref())
        .await
        .map(Json)
}

/// GET /announcements/active — public, only those inside their display window.
pub async fn list_active_announcements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Announcement>>> {
    AnnouncementService::list_active(state.announcements.as_ref(), Utc::now())
        .await
        .map(Json)
}

/// POST /announcements?teacher_username=...
pub async fn create_announcement(
    State(state): State<AppState>,
    AuthorizedTeacher(teacher): AuthorizedTeacher,
    JsonBody(body): JsonBody<AnnouncementRequest>,
) -> AppResult<Json<Announcement>> {
    AnnouncementService::create(state.announcements.as_ref(), &teacher, &body)
        .await
        .map(Json)
}

/// PUT /announcements/{id}?teacher_username=...
pub async fn update_announcement(
    State(state): State<AppState>,
    AuthorizedTeacher(teacher): AuthorizedTeacher,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AnnouncementRequest>,
) -> AppResult<Json<Value>> {
    AnnouncementService::update(state.announcements.as_ref(), &teacher, &id, &body).await?;
    Ok(Json(json!({ "message": "Announcement updated successfully" })))
}

/// DELETE /announcements/{id}?teacher_username=...
pub async fn delete_announcement(
    State(state): State<AppState>,
    AuthorizedTeacher(teacher): AuthorizedTeacher,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    AnnouncementService::delete(state.announcements.as_ref(), &teacher, &id).await?;
    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}
