// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Task backends used by the recurring task generator

use crate::config::{BackendConfig, BackendKind};
use crate::database::TaskStore;
use crate::models::{RecurringTaskTemplate, TaskRecord};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

pub mod rest;

/// Storage and procedure calls the generator depends on.
///
/// `create_recurring_child` must be idempotent: calling it twice for the same
/// parent and due date creates at most one child. The generator may still
/// pre-filter with a client-side check, but correctness never depends on it.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// All of the user's recurring templates (`is_recurring` and no parent), unpaginated
    async fn fetch_recurring_templates(&self, user_id: &str) -> Result<Vec<RecurringTaskTemplate>, BackendError>;

    /// Children materialised from one template
    async fn fetch_child_tasks(&self, parent_id: &str) -> Result<Vec<TaskRecord>, BackendError>;

    /// Materialise the occurrence due on `due`. Returns whether a row was inserted.
    async fn create_recurring_child(&self, parent_id: &str, due: NaiveDate) -> Result<bool, BackendError>;

    fn backend_name(&self) -> &'static str;
}

/// Task backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Remote procedure failed with status {status}: {message}")]
    Rpc { status: u16, message: String },

    #[error("Invalid task row: {0}")]
    InvalidRow(String),

    #[error("Task not found: {0}")]
    NotFound(String),
}

/// Build the backend selected by configuration
pub async fn create_backend(config: &BackendConfig) -> anyhow::Result<Arc<dyn TaskBackend>> {
    info!(backend = ?config.kind, "Creating task backend");

    match config.kind {
        BackendKind::Sqlite => {
            let store = TaskStore::new(&config.database_url)
                .await
                .with_context(|| format!("Failed to open task store at {}", config.database_url))?;
            Ok(Arc::new(store))
        }
        BackendKind::Rest => {
            let backend = rest::RestTaskBackend::from_config(&config.rest)?;
            Ok(Arc::new(backend))
        }
    }
}
