use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::{
    error::AppError,
    models::teacher::{Teacher, TeacherQuery},
    services::announcements::require_teacher,
    AppState,
};

/// Extractor that resolves the `teacher_username` query parameter against the
/// teacher directory. Only existence is checked; there is no credential.
pub struct AuthorizedTeacher(pub Teacher);

impl FromRequestParts<AppState> for AuthorizedTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let username = Query::<TeacherQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.teacher_username);

        let teacher = require_teacher(state.teachers.as_ref(), username.as_deref()).await?;
        Ok(AuthorizedTeacher(teacher))
    }
}
