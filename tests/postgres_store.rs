//! Runs against a real PostgreSQL when TEST_DATABASE_URL is set, e.g.
//!   TEST_DATABASE_URL=postgres://localhost/announcements_test cargo test --test postgres_store
//! Without it the tests return early.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use school_announcements_api::{
    db::{self, AnnouncementStore, PgStore, TeacherDirectory},
    models::announcement::{Announcement, AnnouncementFields},
};

async fn store() -> Option<PgStore> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL store test");
        return None;
    };
    let pool = db::create_pool(&url, 2).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    Some(PgStore::new(pool))
}

fn fields(message: &str, start: Option<DateTime<Utc>>, expiration: DateTime<Utc>) -> AnnouncementFields {
    AnnouncementFields {
        message: message.into(),
        start_date: start,
        expiration_date: expiration,
    }
}

fn authored_by<'a>(rows: &'a [Announcement], author: &str) -> Vec<&'a str> {
    rows.iter()
        .filter(|a| a.created_by == author)
        .map(|a| a.message.as_str())
        .collect()
}

#[tokio::test]
async fn active_window_matches_in_sql() {
    let Some(store) = store().await else { return };
    // rows from other runs are filtered out by author
    let author = format!("pg-{}", Uuid::new_v4());
    let now = Utc::now();
    let created = |minutes: i64| now - Duration::minutes(minutes);

    let rows = [
        store
            .insert(&fields("no start", None, now + Duration::days(1)), &author, created(4))
            .await
            .unwrap(),
        store
            .insert(&fields("starts now", Some(now), now + Duration::days(1)), &author, created(3))
            .await
            .unwrap(),
        store
            .insert(
                &fields("upcoming", Some(now + Duration::seconds(1)), now + Duration::days(1)),
                &author,
                created(2),
            )
            .await
            .unwrap(),
        store
            .insert(&fields("expires now", None, now), &author, created(1))
            .await
            .unwrap(),
    ];

    let active = store.list_active(now).await.unwrap();
    assert_eq!(authored_by(&active, &author), ["starts now", "no start"]);

    let all = store.list_all().await.unwrap();
    assert_eq!(
        authored_by(&all, &author),
        ["expires now", "upcoming", "starts now", "no start"]
    );

    for row in &rows {
        assert!(store.delete(row.id).await.unwrap());
    }
    assert!(!store.delete(rows[0].id).await.unwrap());
}

#[tokio::test]
async fn update_preserves_author_and_reports_missing_rows() {
    let Some(store) = store().await else { return };
    let author = format!("pg-{}", Uuid::new_v4());
    let now = Utc::now();

    let row = store
        .insert(&fields("Bake sale", None, now + Duration::days(1)), &author, now)
        .await
        .unwrap();
    let changed = fields("Bake sale moved", Some(now), now + Duration::days(2));
    assert!(store.update(row.id, &changed).await.unwrap());
    assert!(!store.update(Uuid::new_v4(), &changed).await.unwrap());

    let all = store.list_all().await.unwrap();
    let updated = all.iter().find(|a| a.id == row.id).unwrap();
    assert_eq!(updated.message, "Bake sale moved");
    assert_eq!(updated.created_by, author);
    assert_eq!(updated.created_at, row.created_at);

    assert!(store.delete(row.id).await.unwrap());
    assert!(store.find(&author).await.unwrap().is_none());
}
