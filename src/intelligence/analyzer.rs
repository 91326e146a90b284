// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Progress analyzer running the full scoring pipeline

use super::{
    barakah::{BarakahInput, BarakahScorer},
    fair_progress::{calculate_fair_progress, FairProgressInput},
    insights::{
        fair_tracking_status_message, InsightContext, InsightGenerator, MessageContext,
        MotivationalMessageGenerator,
    },
    metrics::MetricsCalculator,
    ProgressReport,
};
use crate::config::ScoringConfig;
use crate::models::UserActivityLog;
use chrono::NaiveDate;
use tracing::debug;

/// Main analyzer for generating progress reports
pub struct ProgressAnalyzer {
    scorer: BarakahScorer,
    insight_generator: InsightGenerator,
}

impl ProgressAnalyzer {
    /// Create a new analyzer with default weights and thresholds
    pub fn new() -> Self {
        Self {
            scorer: BarakahScorer::new(),
            insight_generator: InsightGenerator::new(),
        }
    }

    /// Create an analyzer from a scoring configuration
    pub fn with_config(config: &ScoringConfig) -> Self {
        Self {
            scorer: BarakahScorer::with_weights(config.barakah.clone()),
            insight_generator: InsightGenerator::with_thresholds(config.insights.clone()),
        }
    }

    /// Analyze one user's activity as of `current_date`.
    ///
    /// Stages run leaves first: records, fair progress, Barakah (using the
    /// fair streak), Islamic metrics over the days since registration, then
    /// the message and insights.
    pub fn analyze(&self, log: &UserActivityLog, current_date: NaiveDate) -> ProgressReport {
        let records = log.activity_records();

        let fair_progress = calculate_fair_progress(&FairProgressInput {
            registration_date: log.registration_date,
            current_date,
            activities: &records,
        });

        let barakah = self.scorer.score(&BarakahInput {
            prayers: &log.prayers,
            tasks: &log.tasks,
            dhikr: &log.dhikr,
            quran: &log.quran,
            streak_days: fair_progress.streak_count,
        });

        let metrics = MetricsCalculator::calculate(
            &log.prayers,
            &log.dhikr,
            &log.quran,
            fair_progress.days_since_registration,
        );

        let message = MotivationalMessageGenerator::generate(&MessageContext {
            days_since_registration: fair_progress.days_since_registration,
            streak_count: fair_progress.streak_count,
            barakah_level: barakah.level,
            prayer_consistency: metrics.prayer_consistency,
            overall_spirituality: metrics.overall_spirituality,
        });

        let insights = self.insight_generator.generate(&InsightContext {
            days_since_registration: fair_progress.days_since_registration,
            is_fair_tracking_active: fair_progress.is_fair_tracking_active,
            prayer_consistency: metrics.prayer_consistency,
            streak_count: fair_progress.streak_count,
        });

        let fair_tracking_status = fair_tracking_status_message(fair_progress.days_since_registration);

        debug!(
            days = fair_progress.days_since_registration,
            fair_percentage = fair_progress.fair_percentage,
            streak = fair_progress.streak_count,
            barakah = barakah.total_barakah,
            level = %barakah.level,
            insights = insights.len(),
            "Progress report computed"
        );

        ProgressReport::new(
            current_date,
            fair_progress,
            barakah,
            metrics,
            message,
            insights,
            fair_tracking_status,
        )
    }
}

impl Default for ProgressAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
