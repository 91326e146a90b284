// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed domain constants for fair tracking and Barakah scoring, plus
//! environment-backed defaults for the recurring task scheduler.

use std::env;

/// Fair tracking and streak constants
pub mod tracking {
    /// Users within this many days of registration are in the fair tracking window.
    /// Shared by the progress calculator and the status message helper.
    pub const FAIR_TRACKING_WINDOW_DAYS: i64 = 7;

    /// Maximum number of days the streak walk looks back
    pub const STREAK_LOOKBACK_DAYS: u32 = 30;

    /// Obligatory prayers per day
    pub const DAILY_PRAYER_COUNT: usize = 5;
}

/// Default Barakah weights
pub mod barakah {
    pub const COMPLETED_PRAYER_WEIGHT: f64 = 3.0;
    pub const ON_TIME_PRAYER_WEIGHT: f64 = 2.0;
    pub const DHIKR_COUNT_WEIGHT: f64 = 0.1;
    pub const QURAN_MINUTE_WEIGHT: f64 = 0.5;
    pub const COMPLETED_TASK_WEIGHT: f64 = 1.0;
    /// Added on top of `COMPLETED_TASK_WEIGHT` for completed Islamic tasks
    pub const ISLAMIC_TASK_BONUS_WEIGHT: f64 = 1.5;
    pub const STREAK_DAY_WEIGHT: f64 = 2.0;

    /// Level band lower bounds (inclusive)
    pub const COMMITTED_MIN: f64 = 50.0;
    pub const DEVOTED_MIN: f64 = 150.0;
    pub const EXEMPLARY_MIN: f64 = 300.0;
    pub const EXCEPTIONAL_MIN: f64 = 500.0;
}

/// Islamic metrics blend
pub mod spirituality {
    pub const PRAYER_CONSISTENCY_SHARE: f64 = 0.4;
    pub const PRAYERS_ON_TIME_SHARE: f64 = 0.3;
    pub const DHIKR_SHARE: f64 = 0.2;
    pub const QURAN_SHARE: f64 = 0.1;

    /// Sessions per day are scaled by this before capping at 100
    pub const DHIKR_FREQUENCY_SCALE: f64 = 20.0;
    /// Minutes per day are scaled by this before capping at 100
    pub const QURAN_ENGAGEMENT_SCALE: f64 = 5.0;
}

/// Motivational message and insight thresholds
pub mod thresholds {
    pub const NEW_USER_MAX_DAYS: i64 = 3;
    pub const LONG_STREAK_DAYS: u32 = 14;
    pub const WEEK_STREAK_DAYS: u32 = 7;
    pub const EXCELLENT_PRAYER_CONSISTENCY: f64 = 90.0;
    pub const STRONG_PRAYER_CONSISTENCY: f64 = 70.0;
    pub const BALANCED_SPIRITUALITY: f64 = 60.0;

    pub const GOOD_PRAYER_CONSISTENCY: f64 = 80.0;
    pub const LOW_PRAYER_CONSISTENCY: f64 = 50.0;
    pub const GOOD_STREAK_DAYS: u32 = 7;
}

/// Recurring task scheduling
pub mod scheduling {
    /// One check per hour
    pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;

    /// Name of the remote procedure that materialises a child occurrence
    pub const CREATE_CHILD_PROCEDURE: &str = "create_recurring_child";

    /// Table holding templates and their children
    pub const TASKS_TABLE: &str = "tasks";
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get database URL from environment or default
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./tasks.db".to_string())
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}

/// Service identity
pub mod service {
    pub const SERVICE_NAME: &str = "barakah-engine";
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
