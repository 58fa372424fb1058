//! Demo data for local development.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use uuid::Uuid;

use super::{insert_activity, insert_user, Activity, Database, User};

const DEMO_HANDLE: &str = "demo";

/// Messages seeded newest first, one hour apart.
pub const DEMO_MESSAGES: &[&str] = &[
    "Cloud is very fun!",
    "Shipped the new feed endpoint today.",
    "Reading about SQLite query planning.",
    "Morning run: 5k in the rain.",
    "Hello, world!",
];

/// Insert a demo user and a set of activities in one transaction.
///
/// Returns the number of activities inserted. The user row is reused when
/// the demo handle already exists, so seeding twice doubles the activities.
pub fn seed_demo_activities(db: &Database) -> Result<usize, rusqlite::Error> {
    let now = Utc::now();
    let mut conn = db.conn();
    let tx = conn.transaction()?;

    let user_uuid = insert_user(
        &tx,
        &User {
            uuid: Uuid::new_v4().to_string(),
            display_name: "Demo User".to_string(),
            handle: DEMO_HANDLE.to_string(),
            email: Some("demo@example.com".to_string()),
            cognito_user_id: None,
            created_at: timestamp(now),
        },
    )?;

    for (age_hours, message) in DEMO_MESSAGES.iter().enumerate() {
        insert_activity(
            &tx,
            &Activity {
                uuid: Uuid::new_v4().to_string(),
                user_uuid: user_uuid.clone(),
                message: (*message).to_string(),
                replies_count: 0,
                reposts_count: 0,
                likes_count: 0,
                reply_to_activity_uuid: None,
                expires_at: Some(timestamp(now + Duration::days(10))),
                created_at: timestamp(now - Duration::hours(age_hours as i64)),
            },
        )?;
    }

    tx.commit()?;
    tracing::info!(count = DEMO_MESSAGES.len(), handle = DEMO_HANDLE, "Seeded demo activities");
    Ok(DEMO_MESSAGES.len())
}

/// Same layout as the schema's `strftime('%Y-%m-%dT%H:%M:%fZ')` default.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
