// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures shared by the scoring engine and the recurring task
//! generator.
//!
//! ## Design Principles
//!
//! - **Local days**: every activity is bucketed by a [`NaiveDate`] in the user's
//!   local calendar, never by a timestamp
//! - **Caller assembled**: activity arrays are built by the caller from stored
//!   completion rows; the engine never mutates them
//! - **Tolerant rows**: task rows keep raw date strings so malformed values can
//!   fall through weekday resolution instead of failing deserialization
//!
//! ## Core Models
//!
//! - [`ActivityRecord`]: one observed action on one day
//! - [`UserActivityLog`]: everything needed for a progress report
//! - [`RecurringTaskTemplate`]: a parent task marked recurring
//! - [`TaskRecord`]: a stored task row (template or child)

use crate::dates::checked_weekday_index;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of tracked activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Prayer,
    Task,
    Dhikr,
    Quran,
}

/// One observed user action on one calendar day
///
/// # Examples
///
/// ```rust
/// use barakah_engine::models::{ActivityRecord, ActivityType};
/// use chrono::NaiveDate;
///
/// let record = ActivityRecord {
///     date: NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(),
///     completed: true,
///     activity_type: ActivityType::Dhikr,
///     value: Some(33.0), // repetitions
/// };
/// assert!(record.is_completed_of(ActivityType::Dhikr));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Local calendar day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Whether the activity was completed
    pub completed: bool,
    /// Kind of activity
    pub activity_type: ActivityType,
    /// Magnitude such as dhikr repetitions or Quran minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl ActivityRecord {
    /// True when this record is a completed activity of the given kind
    pub fn is_completed_of(&self, activity_type: ActivityType) -> bool {
        self.completed && self.activity_type == activity_type
    }
}

/// The five daily prayers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// All prayers in daily order
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];
}

/// A tracked prayer slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerCompletion {
    pub date: NaiveDate,
    pub prayer: PrayerName,
    pub completed: bool,
    /// Prayed within its time window
    #[serde(default)]
    pub on_time: bool,
}

impl PrayerCompletion {
    /// Completed and on time; an uncompleted prayer is never on time
    pub fn is_timely(&self) -> bool {
        self.completed && self.on_time
    }
}

/// A tracked task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub date: NaiveDate,
    pub completed: bool,
    /// Task belongs to an Islamic category and earns the bonus weight
    #[serde(default)]
    pub is_islamic_task: bool,
}

/// A dhikr session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DhikrSession {
    pub date: NaiveDate,
    /// Repetitions recited
    pub count: u32,
}

/// A Quran reading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuranSession {
    pub date: NaiveDate,
    pub minutes_read: f64,
}

/// Everything the caller fetched for one user's progress report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserActivityLog {
    /// Local day the user registered
    pub registration_date: NaiveDate,
    #[serde(default)]
    pub prayers: Vec<PrayerCompletion>,
    #[serde(default)]
    pub tasks: Vec<TaskCompletion>,
    #[serde(default)]
    pub dhikr: Vec<DhikrSession>,
    #[serde(default)]
    pub quran: Vec<QuranSession>,
}

impl UserActivityLog {
    /// Create an empty log for a user registered on `registration_date`
    pub fn new(registration_date: NaiveDate) -> Self {
        Self {
            registration_date,
            ..Self::default()
        }
    }

    /// Flatten the typed arrays into activity records.
    ///
    /// Dhikr and Quran sessions count as completed only when they carry a
    /// positive magnitude.
    pub fn activity_records(&self) -> Vec<ActivityRecord> {
        let prayers = self.prayers.iter().map(|p| ActivityRecord {
            date: p.date,
            completed: p.completed,
            activity_type: ActivityType::Prayer,
            value: None,
        });
        let tasks = self.tasks.iter().map(|t| ActivityRecord {
            date: t.date,
            completed: t.completed,
            activity_type: ActivityType::Task,
            value: None,
        });
        let dhikr = self.dhikr.iter().map(|d| ActivityRecord {
            date: d.date,
            completed: d.count > 0,
            activity_type: ActivityType::Dhikr,
            value: Some(f64::from(d.count)),
        });
        let quran = self.quran.iter().map(|q| ActivityRecord {
            date: q.date,
            completed: q.minutes_read > 0.0,
            activity_type: ActivityType::Quran,
            value: Some(q.minutes_read),
        });

        prayers.chain(tasks).chain(dhikr).chain(quran).collect()
    }
}

/// How often a recurring template fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringPattern {
    Daily,
    Weekly,
    /// Any stored pattern this engine does not schedule
    #[serde(other)]
    Unsupported,
}

impl RecurringPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringPattern::Daily => "daily",
            RecurringPattern::Weekly => "weekly",
            RecurringPattern::Unsupported => "unsupported",
        }
    }

    /// Parse a stored pattern column
    pub fn from_column(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "daily" => RecurringPattern::Daily,
            "weekly" => RecurringPattern::Weekly,
            _ => RecurringPattern::Unsupported,
        }
    }
}

/// A parent task marked recurring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTaskTemplate {
    pub id: String,
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub recurring_pattern: RecurringPattern,
    /// Explicit weekday, Sunday = 0
    #[serde(default, deserialize_with = "lenient_weekday")]
    pub recurring_weekday: Option<u8>,
    /// Raw due date; first weekday fallback
    #[serde(default)]
    pub due_date: Option<String>,
    /// Raw creation timestamp; last weekday fallback
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// A stored task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_pattern: Option<RecurringPattern>,
    #[serde(default, deserialize_with = "lenient_weekday")]
    pub recurring_weekday: Option<u8>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub parent_task_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl TaskRecord {
    /// View this row as a recurring template, if it is one
    pub fn as_template(&self) -> Option<RecurringTaskTemplate> {
        if !self.is_recurring || self.parent_task_id.is_some() {
            return None;
        }

        Some(RecurringTaskTemplate {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            recurring_pattern: self.recurring_pattern.unwrap_or(RecurringPattern::Unsupported),
            recurring_weekday: self.recurring_weekday,
            due_date: self.due_date.clone(),
            created_at: self.created_at.clone(),
        })
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept any stored weekday shape; out-of-range or non-numeric values become `None`
fn lenient_weekday<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(raw.and_then(checked_weekday_index))
}
