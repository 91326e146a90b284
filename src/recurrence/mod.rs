// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Recurrence Module
//!
//! Decides whether a recurring template owes an occurrence today, and runs
//! that decision for every template on an hourly schedule.
//!
//! - [`determine_recurring_weekday`] and [`evaluate_occurrence`] are pure
//! - [`generator::RecurringTaskGenerator`] scans one user's templates once
//! - [`scheduler::RecurringTaskScheduler`] repeats the scan until stopped

use crate::dates::{format_local_date, parse_local_date, weekday_index};
use crate::models::{RecurringPattern, RecurringTaskTemplate, TaskRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod generator;
pub mod scheduler;

pub use generator::{GenerationReport, GeneratorConfig, RecurringTaskGenerator};
pub use scheduler::{RecurringTaskScheduler, SchedulerHandle};

/// Outcome of evaluating one template for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OccurrenceDecision {
    NoOccurrenceToday,
    OccurrenceDue { due: NaiveDate },
}

/// Resolve the weekday a weekly template fires on (Sunday = 0).
///
/// Tries the explicit weekday, then the weekday of `due_date`, then the
/// weekday of `created_at`. Out-of-range or unparseable values fall through.
pub fn determine_recurring_weekday(template: &RecurringTaskTemplate) -> Option<u8> {
    if let Some(weekday) = template.recurring_weekday.filter(|d| *d <= 6) {
        return Some(weekday);
    }

    template
        .due_date
        .as_deref()
        .and_then(parse_local_date)
        .or_else(|| parse_local_date(&template.created_at))
        .map(weekday_index)
}

/// Decide whether `template` owes an occurrence on `today`
pub fn evaluate_occurrence(template: &RecurringTaskTemplate, today: NaiveDate) -> OccurrenceDecision {
    let due = match template.recurring_pattern {
        RecurringPattern::Daily => true,
        RecurringPattern::Weekly => {
            determine_recurring_weekday(template) == Some(weekday_index(today))
        }
        RecurringPattern::Unsupported => false,
    };

    if due {
        OccurrenceDecision::OccurrenceDue { due: today }
    } else {
        OccurrenceDecision::NoOccurrenceToday
    }
}

/// Client-side duplicate check: false when an existing task is already due on `date`.
///
/// Compares the stored `due_date` string exactly against `YYYY-MM-DD`.
pub fn should_create_recurring_task(existing: &[TaskRecord], date: NaiveDate) -> bool {
    let target = format_local_date(date);
    !existing
        .iter()
        .any(|task| task.due_date.as_deref() == Some(target.as_str()))
}
