// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recurring task generation for one user

use super::{evaluate_occurrence, should_create_recurring_task, OccurrenceDecision};
use crate::backends::{BackendError, TaskBackend};
use crate::logging::AppLogger;
use crate::models::RecurringTaskTemplate;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Look up existing children before calling the creation procedure
    pub client_side_dedup: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            client_side_dedup: true,
        }
    }
}

/// Counts from one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub user_id: String,
    pub date: Option<NaiveDate>,
    pub scanned: usize,
    pub created: usize,
    pub skipped_not_due: usize,
    /// Child already existed, found either client-side or by the backend
    pub skipped_existing: usize,
    pub failed: usize,
}

enum TemplateOutcome {
    NotDue,
    Existing,
    Created,
}

/// Materialises today's occurrences of a user's recurring templates
pub struct RecurringTaskGenerator {
    backend: Arc<dyn TaskBackend>,
    config: GeneratorConfig,
}

impl RecurringTaskGenerator {
    pub fn new(backend: Arc<dyn TaskBackend>, config: GeneratorConfig) -> Self {
        Self { backend, config }
    }

    /// Scan every top-level recurring template of `user_id` once.
    ///
    /// Templates are processed one at a time. A failure on one template is
    /// logged and counted, and the scan moves on. Only a failure to list the
    /// templates fails the run.
    pub async fn run_once(&self, user_id: &str, today: NaiveDate) -> Result<GenerationReport> {
        let started = Instant::now();

        let templates = self
            .backend
            .fetch_recurring_templates(user_id)
            .await
            .with_context(|| format!("Failed to fetch recurring templates for user {}", user_id))?;

        debug!(
            user.id = %user_id,
            backend = self.backend.backend_name(),
            templates = templates.len(),
            "Scanning recurring templates"
        );

        let mut report = GenerationReport {
            user_id: user_id.to_string(),
            date: Some(today),
            scanned: templates.len(),
            ..GenerationReport::default()
        };

        for template in &templates {
            match self.process_template(template, today).await {
                Ok(TemplateOutcome::NotDue) => report.skipped_not_due += 1,
                Ok(TemplateOutcome::Existing) => report.skipped_existing += 1,
                Ok(TemplateOutcome::Created) => report.created += 1,
                Err(e) => {
                    report.failed += 1;
                    AppLogger::log_template_failure(user_id, &template.id, &e.to_string());
                }
            }
        }

        AppLogger::log_generation_run(&report, started.elapsed().as_millis() as u64);
        Ok(report)
    }

    async fn process_template(
        &self,
        template: &RecurringTaskTemplate,
        today: NaiveDate,
    ) -> Result<TemplateOutcome, BackendError> {
        let due = match evaluate_occurrence(template, today) {
            OccurrenceDecision::NoOccurrenceToday => return Ok(TemplateOutcome::NotDue),
            OccurrenceDecision::OccurrenceDue { due } => due,
        };

        if self.config.client_side_dedup {
            let children = self.backend.fetch_child_tasks(&template.id).await?;
            if !should_create_recurring_task(&children, due) {
                debug!(template.id = %template.id, %due, "Occurrence already exists");
                return Ok(TemplateOutcome::Existing);
            }
        }

        if self.backend.create_recurring_child(&template.id, due).await? {
            info!(template.id = %template.id, %due, "Created recurring task occurrence");
            Ok(TemplateOutcome::Created)
        } else {
            debug!(template.id = %template.id, %due, "Backend reported existing occurrence");
            Ok(TemplateOutcome::Existing)
        }
    }
}
