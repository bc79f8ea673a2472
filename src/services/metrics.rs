use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};

use crate::error::AppError;

lazy_static! {
    pub static ref ANNOUNCEMENT_WRITES_COUNTER: CounterVec = register_counter_vec!(
        "announcements_writes_total",
        "Announcement writes by operation and outcome",
        &["operation", "status"]
    ).unwrap();

    pub static ref ACTIVE_ANNOUNCEMENTS_GAUGE: Gauge = register_gauge!(
        "announcements_active",
        "Announcements active at the last /announcements/active request"
    ).unwrap();
}

pub fn record_write<T>(operation: &str, result: &Result<T, AppError>) {
    let status = match result {
        Ok(_) => "ok",
        Err(AppError::Unauthorized) => "unauthorized",
        Err(AppError::Validation(_) | AppError::InvalidBody(_) | AppError::Body(_)) => "invalid",
        Err(AppError::NotFound(_)) => "not_found",
        Err(AppError::Store(_)) => "error",
    };
    ANNOUNCEMENT_WRITES_COUNTER
        .with_label_values(&[operation, status])
        .inc();
}
