// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Islamic practice metrics

use crate::constants::spirituality::{
    DHIKR_FREQUENCY_SCALE, DHIKR_SHARE, PRAYERS_ON_TIME_SHARE, PRAYER_CONSISTENCY_SHARE,
    QURAN_ENGAGEMENT_SCALE, QURAN_SHARE,
};
use crate::constants::tracking::DAILY_PRAYER_COUNT;
use crate::models::{DhikrSession, PrayerCompletion, QuranSession};
use serde::{Deserialize, Serialize};

/// Practice metrics over a window of days
///
/// `dhikr_frequency` and `quran_engagement` are raw per-day rates and are not
/// bounded to 0-100; only their contribution to `overall_spirituality` is capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IslamicMetrics {
    /// Completed prayers as a share of all obligatory prayers (0-100)
    pub prayer_consistency: f64,
    /// On-time prayers as a share of all obligatory prayers (0-100)
    pub prayers_on_time: f64,
    /// Dhikr sessions per day
    pub dhikr_frequency: f64,
    /// Quran minutes per day
    pub quran_engagement: f64,
    /// Weighted blend (0-100)
    pub overall_spirituality: f64,
}

/// Metrics calculator for prayer, dhikr and Quran activity
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Calculate metrics over `days` days (clamped to at least 1)
    pub fn calculate(
        prayers: &[PrayerCompletion],
        dhikr: &[DhikrSession],
        quran: &[QuranSession],
        days: i64,
    ) -> IslamicMetrics {
        let days = days.max(1) as f64;
        let expected_prayers = days * DAILY_PRAYER_COUNT as f64;

        let completed = prayers.iter().filter(|p| p.completed).count() as f64;
        let on_time = prayers.iter().filter(|p| p.is_timely()).count() as f64;

        let prayer_consistency = (completed / expected_prayers * 100.0).min(100.0);
        let prayers_on_time = (on_time / expected_prayers * 100.0).min(100.0);
        let dhikr_frequency = dhikr.len() as f64 / days;
        let quran_engagement = quran.iter().map(|q| q.minutes_read).sum::<f64>() / days;

        IslamicMetrics {
            prayer_consistency,
            prayers_on_time,
            dhikr_frequency,
            quran_engagement,
            overall_spirituality: Self::overall_spirituality(
                prayer_consistency,
                prayers_on_time,
                dhikr_frequency,
                quran_engagement,
            ),
        }
    }

    /// Blend the four components, capping the two raw rates
    fn overall_spirituality(
        prayer_consistency: f64,
        prayers_on_time: f64,
        dhikr_frequency: f64,
        quran_engagement: f64,
    ) -> f64 {
        let dhikr_component = (dhikr_frequency * DHIKR_FREQUENCY_SCALE).min(100.0);
        let quran_component = (quran_engagement * QURAN_ENGAGEMENT_SCALE).min(100.0);

        prayer_consistency * PRAYER_CONSISTENCY_SHARE
            + prayers_on_time * PRAYERS_ON_TIME_SHARE
            + dhikr_component * DHIKR_SHARE
            + quran_component * QURAN_SHARE
    }
}
