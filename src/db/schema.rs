//! Database schema and row types.

use rusqlite::{params, Connection};

const SCHEMA_SQL: &str = include_str!("../../db/schema.sql");

/// Apply the schema. Every statement is `IF NOT EXISTS`.
pub(crate) fn apply_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

/// A stored user.
#[derive(Debug, Clone)]
pub struct User {
    pub uuid: String,
    pub display_name: String,
    pub handle: String,
    pub email: Option<String>,
    pub cognito_user_id: Option<String>,
    pub created_at: String,
}

/// A stored activity (a post on someone's feed).
#[derive(Debug, Clone)]
pub struct Activity {
    pub uuid: String,
    pub user_uuid: String,
    pub message: String,
    pub replies_count: i64,
    pub reposts_count: i64,
    pub likes_count: i64,
    pub reply_to_activity_uuid: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: String,
}

/// Insert a user, keeping the existing row when the handle is taken.
///
/// Returns the uuid of the row that owns the handle.
pub fn insert_user(conn: &Connection, user: &User) -> Result<String, rusqlite::Error> {
    conn.execute(
        "INSERT INTO users (uuid, display_name, handle, email, cognito_user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(handle) DO NOTHING",
        params![
            user.uuid,
            user.display_name,
            user.handle,
            user.email,
            user.cognito_user_id,
            user.created_at
        ],
    )?;

    conn.query_row(
        "SELECT uuid FROM users WHERE handle = ?1",
        [&user.handle],
        |row| row.get(0),
    )
}

/// Insert an activity.
pub fn insert_activity(conn: &Connection, activity: &Activity) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO activities (
            uuid,
            user_uuid,
            message,
            replies_count,
            reposts_count,
            likes_count,
            reply_to_activity_uuid,
            expires_at,
            created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            activity.uuid,
            activity.user_uuid,
            activity.message,
            activity.replies_count,
            activity.reposts_count,
            activity.likes_count,
            activity.reply_to_activity_uuid,
            activity.expires_at,
            activity.created_at
        ],
    )?;
    Ok(())
}
