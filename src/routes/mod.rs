pub mod announcements;
pub mod health;
pub mod metrics;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Every route of the API, without CORS (added by the binary from config).
pub fn router(state: AppState) -> Router {
    let collection = get(announcements::list_announcements)
        .post(announcements::create_announcement);
    let item = put(announcements::update_announcement)
        .delete(announcements::delete_announcement);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/announcements", collection.clone())
        .route("/announcements/", collection)
        .route("/announcements/active", get(announcements::list_active_announcements))
        .route("/announcements/{id}", item)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
