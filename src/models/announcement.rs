use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MESSAGE_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub message: String,
    pub start_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    /// Active means started (or no start set) and not yet expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date > now && self.start_date.map_or(true, |start| start <= now)
    }
}

/// Body of both POST /announcements and PUT /announcements/{id}.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementRequest {
    pub message: String,
    #[serde(default)]
    pub start_date: Option<String>,
    pub expiration_date: String,
}

/// Validated fields ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementFields {
    pub message: String,
    pub start_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
}

/// Parse an ISO-8601 timestamp, normalizing to UTC.
///
/// Accepts extended and basic forms (`2999-01-01T00:00:00`, `29990101T000000`),
/// ISO week dates, `T` or space separators, hour/minute/second precision with
/// an optional `.` or `,` fraction, and `Z` or `±HH[:MM[:SS]]` offsets.
/// Values carrying an offset are converted; naive date-times and bare dates
/// are taken to already be UTC. Surrounding whitespace is rejected.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    // chrono skips leading whitespace before numeric fields
    if raw.trim() != raw {
        return None;
    }
    let Some(sep) = raw.find(['T', ' ']) else {
        return parse_date(raw)?.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    };
    let date = parse_date(&raw[..sep])?;
    let (time, offset) = split_offset(&raw[sep + 1..]);
    let naive = date.and_time(parse_time(time)?);

    match offset {
        None => Some(naive.and_utc()),
        Some(offset) => parse_offset(offset)?
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%G-W%V-%u", "%GW%V%u"];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.replace(',', ".");
    if raw.len() == 2 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveTime::from_hms_opt(raw.parse().ok()?, 0, 0);
    }
    const TIME_FORMATS: [&str; 4] = ["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&raw, fmt).ok())
}

/// Split `HH:MM:SS+02:00` into the clock part and its offset suffix.
fn split_offset(time: &str) -> (&str, Option<&str>) {
    if let Some(body) = time.strip_suffix(['Z', 'z']) {
        return (body, Some("Z"));
    }
    match time.rfind(['+', '-']) {
        Some(idx) => (&time[..idx], Some(&time[idx..])),
        None => (time, None),
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = match raw.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) || !matches!(digits.len(), 2 | 4 | 6) {
        return None;
    }
    let field = |i: usize| digits.get(i..i + 2).map_or(Some(0), |d| d.parse::<i32>().ok());
    let (hours, minutes, seconds) = (field(0)?, field(2)?, field(4)?);
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60 + seconds))
}
