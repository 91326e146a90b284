// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Fair tracking and Barakah scoring over a user's activity history.
//!
//! This module includes:
//! - Fair progress normalized to days since registration, with streaks
//! - Weighted Barakah scoring and level bands
//! - Islamic practice metrics
//! - Motivational messages and insights
//!
//! Every calculator is a pure synchronous function of the arrays it is given.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod analyzer;
pub mod barakah;
pub mod fair_progress;
pub mod insights;
pub mod metrics;

pub use analyzer::ProgressAnalyzer;
pub use barakah::{BarakahLevel, BarakahScore, BarakahScorer};
pub use fair_progress::{calculate_fair_progress, FairProgressInput, FairProgressResult};
pub use insights::{Insight, InsightSeverity, MotivationalMessage};
pub use metrics::{IslamicMetrics, MetricsCalculator};

/// Complete progress report for one user on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Day the report describes
    pub as_of: NaiveDate,

    pub fair_progress: FairProgressResult,

    pub barakah: BarakahScore,

    pub metrics: IslamicMetrics,

    /// Single winning motivational message
    pub message: MotivationalMessage,

    /// Zero or more independent insights
    pub insights: Vec<Insight>,

    pub fair_tracking_status: String,

    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,
}

impl ProgressReport {
    /// Create a new progress report
    pub fn new(
        as_of: NaiveDate,
        fair_progress: FairProgressResult,
        barakah: BarakahScore,
        metrics: IslamicMetrics,
        message: MotivationalMessage,
        insights: Vec<Insight>,
        fair_tracking_status: String,
    ) -> Self {
        Self {
            as_of,
            fair_progress,
            barakah,
            metrics,
            message,
            insights,
            fair_tracking_status,
            generated_at: Utc::now(),
        }
    }
}
