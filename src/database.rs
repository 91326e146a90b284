// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Task Storage
//!
//! SQLite storage for tasks and recurring templates. Implements
//! [`TaskBackend`] so the recurring task generator can run against a local
//! database with the same guarantees as the hosted procedure.

use crate::backends::{BackendError, TaskBackend};
use crate::constants::scheduling::TASKS_TABLE;
use crate::dates::{checked_weekday_index, format_local_date};
use crate::models::{RecurringPattern, RecurringTaskTemplate, TaskRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

/// SQLite-backed task store
#[derive(Clone)]
pub struct TaskStore {
    pool: Pool<Sqlite>,
}

impl TaskStore {
    /// Open (creating if needed) the database and run migrations
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options).await?;
        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {TASKS_TABLE} (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                is_recurring BOOLEAN NOT NULL DEFAULT 0,
                recurring_pattern TEXT,
                recurring_weekday INTEGER,
                due_date TEXT,
                parent_task_id TEXT REFERENCES {TASKS_TABLE}(id) ON DELETE CASCADE,
                completed BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_tasks_user ON {TASKS_TABLE}(user_id, is_recurring)"
        ))
        .execute(&self.pool)
        .await?;

        // One occurrence per template per day
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_parent_due ON {TASKS_TABLE}(parent_task_id, due_date)"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a task row as given
    pub async fn create_task(&self, task: &TaskRecord) -> Result<String> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {TASKS_TABLE} (id, user_id, title, description, is_recurring, recurring_pattern,
                recurring_weekday, due_date, parent_task_id, completed, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#
        ))
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_recurring)
        .bind(task.recurring_pattern.map(|p| p.as_str()))
        .bind(task.recurring_weekday.map(i64::from))
        .bind(&task.due_date)
        .bind(&task.parent_task_id)
        .bind(task.completed)
        .bind(&task.created_at)
        .execute(&self.pool)
        .await?;

        Ok(task.id.clone())
    }

    /// Get task by ID
    pub async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        let row = sqlx::query(&format!("SELECT * FROM {TASKS_TABLE} WHERE id = ?1"))
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    /// All tasks owned by a user, oldest first
    pub async fn list_tasks_for_user(&self, user_id: &str) -> Result<Vec<TaskRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {TASKS_TABLE} WHERE user_id = ?1 ORDER BY created_at, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row_to_task(row).map_err(anyhow::Error::from))
            .collect()
    }

    async fn parent_exists(&self, parent_id: &str) -> Result<bool, BackendError> {
        let row = sqlx::query(&format!("SELECT 1 FROM {TASKS_TABLE} WHERE id = ?1"))
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl TaskBackend for TaskStore {
    async fn fetch_recurring_templates(&self, user_id: &str) -> Result<Vec<RecurringTaskTemplate>, BackendError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT * FROM {TASKS_TABLE}
            WHERE user_id = ?1 AND is_recurring = 1 AND parent_task_id IS NULL
            ORDER BY created_at, id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows(&rows)
            .iter()
            .filter_map(TaskRecord::as_template)
            .collect())
    }

    async fn fetch_child_tasks(&self, parent_id: &str) -> Result<Vec<TaskRecord>, BackendError> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {TASKS_TABLE} WHERE parent_task_id = ?1 ORDER BY due_date"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows(&rows))
    }

    async fn create_recurring_child(&self, parent_id: &str, due: NaiveDate) -> Result<bool, BackendError> {
        let due = format_local_date(due);

        // Child inherits owner, title and description; the unique index
        // makes concurrent callers race safely
        let result = sqlx::query(&format!(
            r#"
            INSERT OR IGNORE INTO {TASKS_TABLE} (id, user_id, title, description, is_recurring,
                recurring_pattern, recurring_weekday, due_date, parent_task_id, completed, created_at)
            SELECT ?1, p.user_id, p.title, p.description, 0, NULL, NULL, ?3, p.id, 0, ?4
            FROM {TASKS_TABLE} p
            WHERE p.id = ?2
              AND NOT EXISTS (
                  SELECT 1 FROM {TASKS_TABLE} c WHERE c.parent_task_id = ?2 AND c.due_date = ?3
              )
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(parent_id)
        .bind(&due)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        if !self.parent_exists(parent_id).await? {
            return Err(BackendError::NotFound(parent_id.to_string()));
        }

        debug!(template.id = %parent_id, %due, "Occurrence already stored");
        Ok(false)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

/// Decode a row set, skipping rows that cannot be read
fn decode_rows(rows: &[SqliteRow]) -> Vec<TaskRecord> {
    rows.iter()
        .filter_map(|row| match row_to_task(row) {
            Ok(task) => Some(task),
            Err(e) => {
                let id: Option<String> = row.try_get("id").ok();
                warn!(task.id = id.as_deref().unwrap_or("unknown"), error = %e, "Skipping unreadable task row");
                None
            }
        })
        .collect()
}

/// Convert database row to task model
fn row_to_task(row: &SqliteRow) -> Result<TaskRecord, BackendError> {
    let pattern: Option<String> = row.try_get("recurring_pattern")?;
    // Malformed weekdays fall through to the date fallbacks
    let recurring_weekday = row
        .try_get::<Option<i64>, _>("recurring_weekday")
        .ok()
        .flatten()
        .and_then(checked_weekday_index);

    Ok(TaskRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        is_recurring: row.try_get("is_recurring")?,
        recurring_pattern: pattern.as_deref().map(RecurringPattern::from_column),
        recurring_weekday,
        due_date: row.try_get("due_date")?,
        parent_task_id: row.try_get("parent_task_id")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn create_test_store() -> TaskStore {
        TaskStore::new("sqlite::memory:").await.unwrap()
    }

    fn template(id: &str, pattern: &str, weekday: Option<u8>) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            title: "Read Surah Al-Kahf".to_string(),
            description: Some("Every Friday".to_string()),
            is_recurring: true,
            recurring_pattern: Some(RecurringPattern::from_column(pattern)),
            recurring_weekday: weekday,
            due_date: None,
            parent_task_id: None,
            completed: false,
            created_at: "2024-06-01T08:00:00Z".to_string(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_task() {
        let store = create_test_store().await;
        let task = template("t1", "weekly", Some(5));

        store.create_task(&task).await.unwrap();

        let fetched = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(fetched, task);
        assert!(store.get_task("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_templates_exclude_children_and_plain_tasks() {
        let store = create_test_store().await;
        store.create_task(&template("t1", "daily", None)).await.unwrap();

        let mut plain = template("plain", "daily", None);
        plain.is_recurring = false;
        plain.recurring_pattern = None;
        store.create_task(&plain).await.unwrap();

        store.create_recurring_child("t1", ymd(2024, 6, 7)).await.unwrap();

        let templates = store.fetch_recurring_templates("user-1").await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "t1");
        assert_eq!(templates[0].recurring_pattern, RecurringPattern::Daily);

        assert!(store.fetch_recurring_templates("someone-else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_child_is_idempotent() {
        let store = create_test_store().await;
        store.create_task(&template("t1", "daily", None)).await.unwrap();

        assert!(store.create_recurring_child("t1", ymd(2024, 6, 7)).await.unwrap());
        assert!(!store.create_recurring_child("t1", ymd(2024, 6, 7)).await.unwrap());
        assert!(store.create_recurring_child("t1", ymd(2024, 6, 8)).await.unwrap());

        let children = store.fetch_child_tasks("t1").await.unwrap();
        assert_eq!(children.len(), 2);

        let first = &children[0];
        assert_eq!(first.due_date.as_deref(), Some("2024-06-07"));
        assert_eq!(first.title, "Read Surah Al-Kahf");
        assert_eq!(first.description.as_deref(), Some("Every Friday"));
        assert_eq!(first.user_id, "user-1");
        assert!(!first.is_recurring);
        assert!(!first.completed);
    }

    #[tokio::test]
    async fn test_create_child_for_missing_parent() {
        let store = create_test_store().await;
        let result = store.create_recurring_child("ghost", ymd(2024, 6, 7)).await;
        assert!(matches!(result, Err(BackendError::NotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_unknown_pattern_column_maps_to_unsupported() {
        let store = create_test_store().await;
        store.create_task(&template("t1", "monthly", None)).await.unwrap();

        let templates = store.fetch_recurring_templates("user-1").await.unwrap();
        assert_eq!(templates[0].recurring_pattern, RecurringPattern::Unsupported);
    }

    #[tokio::test]
    async fn test_out_of_range_weekday_row_falls_through() {
        let store = create_test_store().await;
        store.create_task(&template("daily", "daily", None)).await.unwrap();

        for (id, weekday) in [("negative", -1_i64), ("huge", 300)] {
            sqlx::query(
                "INSERT INTO tasks (id, user_id, title, is_recurring, recurring_pattern, recurring_weekday, due_date, created_at)
                 VALUES (?1, 'user-1', 'Broken weekday', 1, 'weekly', ?2, '2024-06-07', '2024-06-01T08:00:00Z')",
            )
            .bind(id)
            .bind(weekday)
            .execute(&store.pool)
            .await
            .unwrap();
        }

        let templates = store.fetch_recurring_templates("user-1").await.unwrap();
        assert_eq!(templates.len(), 3);
        for template in templates.iter().filter(|t| t.id != "daily") {
            assert_eq!(template.recurring_weekday, None);
            assert_eq!(template.due_date.as_deref(), Some("2024-06-07"));
        }
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("tasks.db").display());

        {
            let store = TaskStore::new(&url).await.unwrap();
            store.create_task(&template("t1", "daily", None)).await.unwrap();
        }

        let reopened = TaskStore::new(&url).await.unwrap();
        assert_eq!(reopened.list_tasks_for_user("user-1").await.unwrap().len(), 1);
    }
}
