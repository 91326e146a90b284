// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scoring configuration for Barakah weights and insight thresholds

use crate::constants::{barakah, thresholds};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main scoring configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub barakah: BarakahWeights,
    pub insights: InsightThresholds,
}

/// Weights of each activity in the Barakah score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarakahWeights {
    pub completed_prayer: f64,
    pub on_time_prayer: f64,
    pub dhikr_count: f64,
    pub quran_minute: f64,
    pub completed_task: f64,
    /// Extra weight for completed Islamic tasks, on top of `completed_task`
    pub islamic_task_bonus: f64,
    pub streak_day: f64,
}

/// Thresholds for the non-exclusive insight checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    pub good_prayer_consistency: f64,
    pub low_prayer_consistency: f64,
    pub good_streak_days: u32,
}

impl ScoringConfig {
    /// Reject weights and thresholds that would break the score's meaning
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("completed_prayer", self.barakah.completed_prayer),
            ("on_time_prayer", self.barakah.on_time_prayer),
            ("dhikr_count", self.barakah.dhikr_count),
            ("quran_minute", self.barakah.quran_minute),
            ("completed_task", self.barakah.completed_task),
            ("islamic_task_bonus", self.barakah.islamic_task_bonus),
            ("streak_day", self.barakah.streak_day),
        ];

        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("Barakah weight '{}' must be a non-negative number, got {}", name, value);
            }
        }

        if self.insights.low_prayer_consistency > self.insights.good_prayer_consistency {
            anyhow::bail!(
                "low_prayer_consistency ({}) cannot exceed good_prayer_consistency ({})",
                self.insights.low_prayer_consistency,
                self.insights.good_prayer_consistency
            );
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            barakah: BarakahWeights::default(),
            insights: InsightThresholds::default(),
        }
    }
}

impl Default for BarakahWeights {
    fn default() -> Self {
        Self {
            completed_prayer: barakah::COMPLETED_PRAYER_WEIGHT,
            on_time_prayer: barakah::ON_TIME_PRAYER_WEIGHT,
            dhikr_count: barakah::DHIKR_COUNT_WEIGHT,
            quran_minute: barakah::QURAN_MINUTE_WEIGHT,
            completed_task: barakah::COMPLETED_TASK_WEIGHT,
            islamic_task_bonus: barakah::ISLAMIC_TASK_BONUS_WEIGHT,
            streak_day: barakah::STREAK_DAY_WEIGHT,
        }
    }
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            good_prayer_consistency: thresholds::GOOD_PRAYER_CONSISTENCY,
            low_prayer_consistency: thresholds::LOW_PRAYER_CONSISTENCY,
            good_streak_days: thresholds::GOOD_STREAK_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let config = ScoringConfig::default();

        assert_eq!(config.barakah.completed_prayer, 3.0);
        assert_eq!(config.barakah.on_time_prayer, 2.0);
        assert_eq!(config.barakah.dhikr_count, 0.1);
        assert_eq!(config.barakah.quran_minute, 0.5);
        assert_eq!(config.barakah.completed_task, 1.0);
        assert_eq!(config.barakah.islamic_task_bonus, 1.5);
        assert_eq!(config.barakah.streak_day, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let config: ScoringConfig = toml::from_str(
            r#"
[barakah]
quran_minute = 1.0

[insights]
good_streak_days = 10
        "#,
        )?;
        config.validate()?;

        assert_eq!(config.barakah.quran_minute, 1.0);
        assert_eq!(config.barakah.completed_prayer, 3.0);
        assert_eq!(config.insights.good_streak_days, 10);
        assert_eq!(config.insights.good_prayer_consistency, 80.0);

        Ok(())
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = ScoringConfig::default();
        config.barakah.streak_day = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_prayer_thresholds_rejected() {
        let mut config = ScoringConfig::default();
        config.insights.low_prayer_consistency = 95.0;
        assert!(config.validate().is_err());
    }
}
