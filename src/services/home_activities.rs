//! The home timeline: every activity the `activities/home` template selects.

use thiserror::Error;

use crate::db::{QueryError, QueryExecutor, Record, TemplateError, TemplateResolver};

/// Template namespace for the home feed query.
pub const HOME_TEMPLATE_NAMESPACE: &str = "activities";
/// Template name for the home feed query.
pub const HOME_TEMPLATE_NAME: &str = "home";

/// Errors returned by [`fetch_home_activities`].
#[derive(Debug, Error)]
pub enum HomeActivitiesError {
    #[error("Home activities template unavailable: {0}")]
    TemplateNotFound(#[from] TemplateError),

    #[error("Home activities query failed: {0}")]
    QueryExecution(#[from] QueryError),
}

/// Fetch the home feed.
///
/// `identity_token` identifies the requesting user. It is accepted so the
/// HTTP layer can pass it through, but it neither changes the template nor
/// becomes a bind parameter.
///
/// Rows come back exactly as the executor returned them.
#[tracing::instrument(
    name = "home_activities",
    skip_all,
    fields(authenticated = identity_token.is_some())
)]
pub async fn fetch_home_activities<R, E>(
    resolver: &R,
    executor: &E,
    identity_token: Option<&str>,
) -> Result<Vec<Record>, HomeActivitiesError>
where
    R: TemplateResolver + ?Sized,
    E: QueryExecutor + ?Sized,
{
    let sql = resolver.template(HOME_TEMPLATE_NAMESPACE, HOME_TEMPLATE_NAME)?;
    let activities = executor.query_array_json(&sql, &[]).await?;

    tracing::debug!(count = activities.len(), "Fetched home activities");
    Ok(activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    const HOME_SQL: &str = "SELECT * FROM activities WHERE type='home'";

    #[derive(Default)]
    struct RecordingResolver {
        missing: bool,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl TemplateResolver for RecordingResolver {
        fn template(&self, namespace: &str, name: &str) -> Result<String, TemplateError> {
            self.calls
                .lock()
                .push((namespace.to_string(), name.to_string()));
            if self.missing {
                Err(TemplateError::NotFound {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            } else {
                Ok(HOME_SQL.to_string())
            }
        }
    }

    struct RecordingExecutor {
        rows: Option<Vec<Record>>,
        calls: Mutex<Vec<(String, Vec<Value>)>>,
    }

    impl RecordingExecutor {
        fn returning(rows: Vec<Record>) -> Self {
            Self {
                rows: Some(rows),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                rows: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QueryExecutor for RecordingExecutor {
        async fn query_array_json(
            &self,
            sql: &str,
            params: &[Value],
        ) -> Result<Vec<Record>, QueryError> {
            self.calls.lock().push((sql.to_string(), params.to_vec()));
            match &self.rows {
                Some(rows) => Ok(rows.clone()),
                None => Err(QueryError::Sqlite(rusqlite::Error::InvalidQuery)),
            }
        }
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn sample_rows() -> Vec<Record> {
        vec![
            record(json!({"id": 1, "title": "ran 5k"})),
            record(json!({"id": 2, "title": "read a book"})),
        ]
    }

    #[tokio::test]
    async fn test_returns_executor_rows_unchanged() {
        let resolver = RecordingResolver::default();
        let executor = RecordingExecutor::returning(sample_rows());

        let rows = fetch_home_activities(&resolver, &executor, None)
            .await
            .unwrap();

        assert_eq!(rows, sample_rows());
        assert_eq!(executor.calls.lock()[0].0, HOME_SQL);
    }

    #[tokio::test]
    async fn test_order_is_not_touched() {
        let resolver = RecordingResolver::default();
        let mut reversed = sample_rows();
        reversed.reverse();
        let executor = RecordingExecutor::returning(reversed.clone());

        let rows = fetch_home_activities(&resolver, &executor, None)
            .await
            .unwrap();
        assert_eq!(rows, reversed);
    }

    #[tokio::test]
    async fn test_always_resolves_activities_home() {
        let resolver = RecordingResolver::default();
        let executor = RecordingExecutor::returning(Vec::new());

        for token in [None, Some("user-A"), Some(""), Some("another-user")] {
            fetch_home_activities(&resolver, &executor, token)
                .await
                .unwrap();
        }

        let calls = resolver.calls.lock();
        assert_eq!(calls.len(), 4);
        assert!(calls
            .iter()
            .all(|(namespace, name)| namespace == "activities" && name == "home"));
    }

    #[tokio::test]
    async fn test_identity_token_is_inert() {
        let anonymous = (
            RecordingResolver::default(),
            RecordingExecutor::returning(sample_rows()),
        );
        let signed_in = (
            RecordingResolver::default(),
            RecordingExecutor::returning(sample_rows()),
        );

        let a = fetch_home_activities(&anonymous.0, &anonymous.1, None)
            .await
            .unwrap();
        let b = fetch_home_activities(&signed_in.0, &signed_in.1, Some("user-A"))
            .await
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(*anonymous.0.calls.lock(), *signed_in.0.calls.lock());
        assert_eq!(*anonymous.1.calls.lock(), *signed_in.1.calls.lock());
        assert!(signed_in.1.calls.lock()[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_missing_template_skips_executor() {
        let resolver = RecordingResolver {
            missing: true,
            ..Default::default()
        };
        let executor = RecordingExecutor::returning(sample_rows());

        let err = fetch_home_activities(&resolver, &executor, Some("user-A"))
            .await
            .unwrap_err();

        assert!(matches!(err, HomeActivitiesError::TemplateNotFound(_)));
        assert!(executor.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_executor_failure_is_query_execution() {
        let resolver = RecordingResolver::default();
        let executor = RecordingExecutor::failing();

        let err = fetch_home_activities(&resolver, &executor, None)
            .await
            .unwrap_err();

        assert!(matches!(err, HomeActivitiesError::QueryExecution(_)));
        assert_eq!(executor.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_ok() {
        let resolver = RecordingResolver::default();
        let executor = RecordingExecutor::returning(Vec::new());

        let rows = fetch_home_activities(&resolver, &executor, None)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_against_seeded_database() {
        let db = crate::db::Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        crate::db::seed::seed_demo_activities(&db).unwrap();
        let templates = crate::db::TemplateStore::in_memory().with_builtin_templates();

        let rows = fetch_home_activities(&templates, &db, None).await.unwrap();

        let messages: Vec<&str> = rows
            .iter()
            .map(|r| r["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, crate::db::seed::DEMO_MESSAGES.to_vec());
        assert_eq!(rows[0]["handle"], json!("demo"));
    }

    #[tokio::test]
    async fn test_writing_template_is_rejected_and_rows_survive() {
        let db = crate::db::Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        crate::db::seed::seed_demo_activities(&db).unwrap();
        let templates = crate::db::TemplateStore::in_memory().with_template(
            "activities",
            "home",
            "DELETE FROM activities RETURNING message",
        );

        let err = fetch_home_activities(&templates, &db, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HomeActivitiesError::QueryExecution(QueryError::NotReadOnly(_))
        ));

        let remaining: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM activities", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining as usize, crate::db::seed::DEMO_MESSAGES.len());
    }
}
