// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! PostgREST-style hosted task backend

use super::{BackendError, TaskBackend};
use crate::config::RestBackendConfig;
use crate::constants::scheduling::{CREATE_CHILD_PROCEDURE, TASKS_TABLE};
use crate::dates::format_local_date;
use crate::models::{RecurringTaskTemplate, TaskRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

const REST_PATH: &str = "rest/v1/";

#[derive(Serialize)]
struct CreateChildParams<'a> {
    parent: &'a str,
    due: String,
}

pub struct RestTaskBackend {
    client: Client,
    tasks_url: Url,
    create_child_url: Url,
    api_key: String,
    access_token: String,
}

impl RestTaskBackend {
    /// `access_token` defaults to the API key when the caller has no user session
    pub fn new(base_url: &str, api_key: impl Into<String>, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        // Url::join drops the last path segment unless it ends with a slash
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).with_context(|| format!("Invalid REST base URL: {base_url}"))?;
        let rest_url = base_url
            .join(REST_PATH)
            .with_context(|| format!("REST base URL cannot hold a path: {base_url}"))?;
        let tasks_url = rest_url
            .join(TASKS_TABLE)
            .context("Failed to build task table URL")?;
        let create_child_url = rest_url
            .join(&format!("rpc/{CREATE_CHILD_PROCEDURE}"))
            .context("Failed to build creation procedure URL")?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let api_key = api_key.into();
        let access_token = access_token.unwrap_or_else(|| api_key.clone());

        Ok(Self {
            client,
            tasks_url,
            create_child_url,
            api_key,
            access_token,
        })
    }

    pub fn from_config(config: &RestBackendConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().context("REST_BASE_URL not configured")?;
        let api_key = config.api_key.as_deref().context("REST_API_KEY not configured")?;

        Self::new(
            base_url,
            api_key,
            config.access_token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
    }

    async fn fetch_tasks(&self, query: &[(&str, String)]) -> Result<Vec<TaskRecord>, BackendError> {
        let response = self
            .authorized(self.client.get(self.tasks_url.clone()))
            .query(&[("select", "*".to_string())])
            .query(query)
            .send()
            .await?;

        let response = check_status(response).await?;
        let rows: Vec<Value> = response.json().await?;
        Ok(decode_rows(rows))
    }
}

/// Decode rows one at a time so a single bad row does not hide the rest
fn decode_rows(rows: Vec<Value>) -> Vec<TaskRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").and_then(Value::as_str).unwrap_or("unknown").to_string();
            match serde_json::from_value::<TaskRecord>(row) {
                Ok(task) => Some(task),
                Err(e) => {
                    let error = BackendError::InvalidRow(e.to_string());
                    warn!(task.id = %id, error = %error, "Skipping unreadable task row");
                    None
                }
            }
        })
        .collect()
}

/// Map non-2xx responses to `BackendError::Rpc`
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(BackendError::Rpc {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TaskBackend for RestTaskBackend {
    async fn fetch_recurring_templates(&self, user_id: &str) -> Result<Vec<RecurringTaskTemplate>, BackendError> {
        let tasks = self
            .fetch_tasks(&[
                ("user_id", format!("eq.{user_id}")),
                ("is_recurring", "eq.true".to_string()),
                ("parent_task_id", "is.null".to_string()),
            ])
            .await?;

        Ok(tasks.iter().filter_map(TaskRecord::as_template).collect())
    }

    async fn fetch_child_tasks(&self, parent_id: &str) -> Result<Vec<TaskRecord>, BackendError> {
        self.fetch_tasks(&[("parent_task_id", format!("eq.{parent_id}"))]).await
    }

    async fn create_recurring_child(&self, parent_id: &str, due: NaiveDate) -> Result<bool, BackendError> {
        let params = CreateChildParams {
            parent: parent_id,
            due: format_local_date(due),
        };

        let response = self.authorized(self.client.post(self.create_child_url.clone())).json(&params).send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;

        debug!(template.id = %parent_id, %due, body = %body, "Creation procedure returned");

        // A procedure returning `false` reports an existing child; void
        // procedures return an empty body
        Ok(!matches!(body.trim(), "false"))
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> RestTaskBackend {
        RestTaskBackend::new(base, "anon-key", None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let backend = backend("https://example.test/project");
        assert_eq!(backend.tasks_url.as_str(), "https://example.test/project/rest/v1/tasks");
        assert_eq!(
            backend.create_child_url.as_str(),
            "https://example.test/project/rest/v1/rpc/create_recurring_child"
        );
    }

    #[test]
    fn test_access_token_defaults_to_api_key() {
        let backend = backend("https://example.test");
        assert_eq!(backend.access_token, "anon-key");
    }

    #[test]
    fn test_from_config_requires_base_url_and_key() {
        let mut config = RestBackendConfig {
            base_url: None,
            api_key: Some("key".to_string()),
            access_token: None,
            timeout_seconds: 30,
        };
        assert!(RestTaskBackend::from_config(&config).is_err());

        config.base_url = Some("https://example.test".to_string());
        assert!(RestTaskBackend::from_config(&config).is_ok());

        config.api_key = None;
        assert!(RestTaskBackend::from_config(&config).is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(RestTaskBackend::new("not a url", "key", None, Duration::from_secs(5)).is_err());
        // Parses, but has no path to join onto
        assert!(RestTaskBackend::new("mailto:team@example.test", "key", None, Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let rows = vec![
            serde_json::json!({ "id": "ok", "user_id": "u1", "title": "Adhkar", "created_at": "2024-06-01T05:00:00Z" }),
            serde_json::json!({ "id": "bad", "user_id": "u1", "completed": "maybe" }),
            serde_json::json!({ "title": "no id" }),
        ];

        let tasks = decode_rows(rows);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "ok");
    }
}
