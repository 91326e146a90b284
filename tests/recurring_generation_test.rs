// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recurring task generation against the SQLite task store

use anyhow::Result;
use barakah_engine::backends::TaskBackend;
use barakah_engine::database::TaskStore;
use barakah_engine::models::{RecurringPattern, TaskRecord};
use barakah_engine::recurrence::{GeneratorConfig, RecurringTaskGenerator, RecurringTaskScheduler};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

const USER: &str = "user-1";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn recurring(id: &str, pattern: RecurringPattern, weekday: Option<u8>, created_at: &str) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        user_id: USER.to_string(),
        title: format!("Recurring {id}"),
        description: None,
        is_recurring: true,
        recurring_pattern: Some(pattern),
        recurring_weekday: weekday,
        due_date: None,
        parent_task_id: None,
        completed: false,
        created_at: created_at.to_string(),
    }
}

async fn seeded_store() -> Result<Arc<TaskStore>> {
    seeded_store_at("sqlite::memory:").await
}

async fn seeded_store_at(database_url: &str) -> Result<Arc<TaskStore>> {
    let store = TaskStore::new(database_url).await?;

    store
        .create_task(&recurring("daily-adhkar", RecurringPattern::Daily, None, "2024-06-01T05:00:00Z"))
        .await?;
    // Friday by explicit weekday
    store
        .create_task(&recurring("kahf", RecurringPattern::Weekly, Some(5), "2024-06-03T05:00:00Z"))
        .await?;
    // Monday by creation date
    store
        .create_task(&recurring("halaqa", RecurringPattern::Weekly, None, "2024-06-03T18:00:00Z"))
        .await?;

    Ok(Arc::new(store))
}

#[tokio::test]
async fn test_friday_run_creates_daily_and_friday_occurrences() -> Result<()> {
    let store = seeded_store().await?;
    let generator = RecurringTaskGenerator::new(store.clone(), GeneratorConfig::default());

    let report = generator.run_once(USER, ymd(2024, 6, 7)).await?;

    assert_eq!(report.scanned, 3);
    assert_eq!(report.created, 2);
    assert_eq!(report.skipped_not_due, 1);
    assert_eq!(report.failed, 0);

    let kahf = store.fetch_child_tasks("kahf").await?;
    assert_eq!(kahf.len(), 1);
    assert_eq!(kahf[0].due_date.as_deref(), Some("2024-06-07"));
    assert_eq!(kahf[0].title, "Recurring kahf");

    assert!(store.fetch_child_tasks("halaqa").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() -> Result<()> {
    let store = seeded_store().await?;
    let today = ymd(2024, 6, 10); // Monday

    for client_side_dedup in [true, false] {
        let generator = RecurringTaskGenerator::new(store.clone(), GeneratorConfig { client_side_dedup });
        generator.run_once(USER, today).await?;
        generator.run_once(USER, today).await?;
    }

    assert_eq!(store.fetch_child_tasks("daily-adhkar").await?.len(), 1);
    assert_eq!(store.fetch_child_tasks("halaqa").await?.len(), 1);
    assert!(store.fetch_child_tasks("kahf").await?.is_empty());

    // Children are never scanned as templates
    let templates = store.fetch_recurring_templates(USER).await?;
    assert_eq!(templates.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_backend_dedup_reported_as_existing() -> Result<()> {
    let store = seeded_store().await?;
    let today = ymd(2024, 6, 7);

    let generator = RecurringTaskGenerator::new(store.clone(), GeneratorConfig { client_side_dedup: false });
    generator.run_once(USER, today).await?;
    let second = generator.run_once(USER, today).await?;

    assert_eq!(second.created, 0);
    assert_eq!(second.skipped_existing, 2);

    Ok(())
}

#[tokio::test]
async fn test_consecutive_days_each_get_an_occurrence() -> Result<()> {
    let store = seeded_store().await?;
    let generator = RecurringTaskGenerator::new(store.clone(), GeneratorConfig::default());

    for day in 1..=7 {
        generator.run_once(USER, ymd(2024, 6, day)).await?;
    }

    assert_eq!(store.fetch_child_tasks("daily-adhkar").await?.len(), 7);
    assert_eq!(store.fetch_child_tasks("kahf").await?.len(), 1);
    assert_eq!(store.fetch_child_tasks("halaqa").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_scheduler_runs_immediately_and_stops() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store_at(&format!("sqlite:{}", dir.path().join("tasks.db").display())).await?;
    let generator = Arc::new(RecurringTaskGenerator::new(store.clone(), GeneratorConfig::default()));

    let handle = RecurringTaskScheduler::new(generator, USER)
        .with_interval(Duration::from_millis(25))
        .with_clock(Arc::new(|| NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()))
        .spawn();

    for _ in 0..100 {
        if !store.fetch_child_tasks("kahf").await?.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Let several ticks pass on the same day
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(handle.is_running());
    handle.stop().await;

    assert_eq!(store.fetch_child_tasks("kahf").await?.len(), 1);
    assert_eq!(store.fetch_child_tasks("daily-adhkar").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_malformed_weekday_does_not_block_other_templates() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite:{}", dir.path().join("tasks.db").display());
    let store = Arc::new(TaskStore::new(&url).await?);
    store
        .create_task(&recurring("daily-adhkar", RecurringPattern::Daily, None, "2024-06-01T05:00:00Z"))
        .await?;

    // Rows written by another client, bypassing the typed model
    let pool = sqlx::SqlitePool::connect(&url).await?;
    for (id, weekday) in [("negative-weekday", "-1"), ("text-weekday", "'fri'")] {
        sqlx::query(&format!(
            "INSERT INTO tasks (id, user_id, title, is_recurring, recurring_pattern, recurring_weekday, due_date, created_at)
             VALUES (?1, ?2, 'Jumuah prep', 1, 'weekly', {weekday}, '2024-06-07', '2024-06-03T05:00:00Z')"
        ))
        .bind(id)
        .bind(USER)
        .execute(&pool)
        .await?;
    }
    pool.close().await;

    let generator = RecurringTaskGenerator::new(store.clone(), GeneratorConfig::default());
    let report = generator.run_once(USER, ymd(2024, 6, 7)).await?;

    assert_eq!(report.scanned, 3);
    assert_eq!(report.created, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(store.fetch_child_tasks("daily-adhkar").await?.len(), 1);
    assert_eq!(store.fetch_child_tasks("negative-weekday").await?.len(), 1);
    assert_eq!(store.fetch_child_tasks("text-weekday").await?.len(), 1);

    // Falls back to the stored due date, so Saturday is not a match
    let saturday = generator.run_once(USER, ymd(2024, 6, 8)).await?;
    assert_eq!(saturday.created, 1);
    assert_eq!(saturday.skipped_not_due, 2);

    Ok(())
}
