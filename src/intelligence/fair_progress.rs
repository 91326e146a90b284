// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fair progress calculation
//!
//! Progress is normalized to the number of days since the user registered
//! instead of a calendar month, so a user who joined yesterday is not measured
//! against thirty empty days.

use crate::constants::tracking::{DAILY_PRAYER_COUNT, FAIR_TRACKING_WINDOW_DAYS, STREAK_LOOKBACK_DAYS};
use crate::dates::whole_days_between;
use crate::models::{ActivityRecord, ActivityType};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Input to the fair progress calculator
#[derive(Debug, Clone, Copy)]
pub struct FairProgressInput<'a> {
    pub registration_date: NaiveDate,
    pub current_date: NaiveDate,
    pub activities: &'a [ActivityRecord],
}

/// Progress normalized to days since registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairProgressResult {
    /// 0-100, capped
    pub fair_percentage: f64,
    /// Consecutive qualifying days ending today, at most 30
    pub streak_count: u32,
    /// Unscaled completed/possible ratio
    pub consistency: f64,
    pub total_possible_days: i64,
    /// Distinct days with at least one completed activity
    pub total_completed_days: usize,
    /// Raw number of completed activities
    pub completed_activities: usize,
    pub is_fair_tracking_active: bool,
    pub days_since_registration: i64,
}

/// Days since registration, counting the registration day as day 1.
/// Never less than 1.
pub fn days_since_registration(registration_date: NaiveDate, current_date: NaiveDate) -> i64 {
    (whole_days_between(registration_date, current_date) + 1).max(1)
}

/// Whether a user this many days in is still inside the fair tracking window
pub fn is_fair_tracking_active(days_since_registration: i64) -> bool {
    days_since_registration <= FAIR_TRACKING_WINDOW_DAYS
}

/// Compute fair progress for one user
pub fn calculate_fair_progress(input: &FairProgressInput<'_>) -> FairProgressResult {
    let days = days_since_registration(input.registration_date, input.current_date);

    let completed: Vec<&ActivityRecord> = input.activities.iter().filter(|a| a.completed).collect();
    let completed_days: HashSet<NaiveDate> = completed.iter().map(|a| a.date).collect();

    let ratio = completed_days.len() as f64 / days as f64;

    FairProgressResult {
        fair_percentage: (ratio * 100.0).min(100.0),
        streak_count: calculate_streak(input.activities, input.current_date),
        // Left uncapped: a value above 1.0 means the caller sent inconsistent data
        consistency: ratio,
        total_possible_days: days,
        total_completed_days: completed_days.len(),
        completed_activities: completed.len(),
        is_fair_tracking_active: is_fair_tracking_active(days),
        days_since_registration: days,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTally {
    prayers: usize,
    others: usize,
}

impl DayTally {
    /// All five prayers, or no prayers but some other completed activity
    fn qualifies(&self) -> bool {
        if self.prayers > 0 {
            self.prayers == DAILY_PRAYER_COUNT
        } else {
            self.others > 0
        }
    }
}

/// Count consecutive qualifying days walking back from `current_date`.
///
/// Looks back at most [`STREAK_LOOKBACK_DAYS`] days and stops at the first
/// day that does not qualify. A day with some but not all prayers breaks the
/// streak even if other activities were completed.
pub fn calculate_streak(activities: &[ActivityRecord], current_date: NaiveDate) -> u32 {
    let mut tallies: HashMap<NaiveDate, DayTally> = HashMap::new();
    for activity in activities.iter().filter(|a| a.completed) {
        let tally = tallies.entry(activity.date).or_default();
        if activity.activity_type == ActivityType::Prayer {
            tally.prayers += 1;
        } else {
            tally.others += 1;
        }
    }

    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let day = current_date - Duration::days(i64::from(offset));
        let qualifies = tallies.get(&day).is_some_and(DayTally::qualifies);
        if !qualifies {
            break;
        }
        streak += 1;
    }

    streak
}
