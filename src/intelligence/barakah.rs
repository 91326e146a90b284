// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Barakah scoring across prayer, task, dhikr and Quran activity

use crate::config::scoring_config::BarakahWeights;
use crate::constants::barakah::{COMMITTED_MIN, DEVOTED_MIN, EXCEPTIONAL_MIN, EXEMPLARY_MIN};
use crate::models::{DhikrSession, PrayerCompletion, QuranSession, TaskCompletion};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Band derived from the total Barakah score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BarakahLevel {
    Novice,
    Committed,
    Devoted,
    Exemplary,
    Exceptional,
}

impl BarakahLevel {
    /// Map a score onto its band. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= EXCEPTIONAL_MIN => BarakahLevel::Exceptional,
            s if s >= EXEMPLARY_MIN => BarakahLevel::Exemplary,
            s if s >= DEVOTED_MIN => BarakahLevel::Devoted,
            s if s >= COMMITTED_MIN => BarakahLevel::Committed,
            _ => BarakahLevel::Novice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BarakahLevel::Novice => "Novice",
            BarakahLevel::Committed => "Committed",
            BarakahLevel::Devoted => "Devoted",
            BarakahLevel::Exemplary => "Exemplary",
            BarakahLevel::Exceptional => "Exceptional",
        }
    }
}

impl fmt::Display for BarakahLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted Barakah score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarakahScore {
    pub spiritual_activities: f64,
    pub productive_activities: f64,
    pub consistency_bonus: f64,
    /// On-time share of completed prayers (0-1). Not part of the total.
    pub timely_prayers: f64,
    pub total_barakah: f64,
    pub level: BarakahLevel,
}

/// Activity arrays fed to the scorer
#[derive(Debug, Clone, Copy)]
pub struct BarakahInput<'a> {
    pub prayers: &'a [PrayerCompletion],
    pub tasks: &'a [TaskCompletion],
    pub dhikr: &'a [DhikrSession],
    pub quran: &'a [QuranSession],
    pub streak_days: u32,
}

/// Barakah scorer with configurable weights
#[derive(Debug, Clone, Default)]
pub struct BarakahScorer {
    weights: BarakahWeights,
}

impl BarakahScorer {
    /// Create a scorer with the default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom weights
    pub fn with_weights(weights: BarakahWeights) -> Self {
        Self { weights }
    }

    /// Score one user's activity
    pub fn score(&self, input: &BarakahInput<'_>) -> BarakahScore {
        let w = &self.weights;

        let completed_prayers = input.prayers.iter().filter(|p| p.completed).count() as f64;
        let on_time_prayers = input.prayers.iter().filter(|p| p.is_timely()).count() as f64;
        let total_dhikr: f64 = input.dhikr.iter().map(|d| f64::from(d.count)).sum();
        let total_quran_minutes: f64 = input.quran.iter().map(|q| q.minutes_read).sum();

        let spiritual_activities = completed_prayers * w.completed_prayer
            + on_time_prayers * w.on_time_prayer
            + total_dhikr * w.dhikr_count
            + total_quran_minutes * w.quran_minute;

        // A completed Islamic task earns both the base and the bonus weight
        let completed_tasks = input.tasks.iter().filter(|t| t.completed).count() as f64;
        let islamic_completed_tasks = input
            .tasks
            .iter()
            .filter(|t| t.completed && t.is_islamic_task)
            .count() as f64;
        let productive_activities =
            completed_tasks * w.completed_task + islamic_completed_tasks * w.islamic_task_bonus;

        let consistency_bonus = f64::from(input.streak_days) * w.streak_day;

        let timely_prayers = if completed_prayers > 0.0 {
            on_time_prayers / completed_prayers
        } else {
            0.0
        };

        let total_barakah = spiritual_activities + productive_activities + consistency_bonus;

        BarakahScore {
            spiritual_activities,
            productive_activities,
            consistency_bonus,
            timely_prayers,
            total_barakah,
            level: BarakahLevel::from_score(total_barakah),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()
    }

    fn prayer(completed: bool, on_time: bool) -> PrayerCompletion {
        PrayerCompletion {
            date: day(),
            prayer: PrayerName::Fajr,
            completed,
            on_time,
        }
    }

    fn task(completed: bool, is_islamic_task: bool) -> TaskCompletion {
        TaskCompletion {
            date: day(),
            completed,
            is_islamic_task,
        }
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(BarakahLevel::from_score(49.9), BarakahLevel::Novice);
        assert_eq!(BarakahLevel::from_score(50.0), BarakahLevel::Committed);
        assert_eq!(BarakahLevel::from_score(149.99), BarakahLevel::Committed);
        assert_eq!(BarakahLevel::from_score(150.0), BarakahLevel::Devoted);
        assert_eq!(BarakahLevel::from_score(300.0), BarakahLevel::Exemplary);
        assert_eq!(BarakahLevel::from_score(500.0), BarakahLevel::Exceptional);
        assert_eq!(BarakahLevel::from_score(0.0), BarakahLevel::Novice);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(BarakahLevel::Novice < BarakahLevel::Committed);
        assert!(BarakahLevel::Exemplary < BarakahLevel::Exceptional);
        assert_eq!(BarakahLevel::Devoted.to_string(), "Devoted");
    }

    #[test]
    fn test_weighted_components() {
        let prayers = vec![prayer(true, true), prayer(true, false), prayer(false, true)];
        let tasks = vec![task(true, false), task(true, true), task(false, true)];
        let dhikr = vec![DhikrSession { date: day(), count: 100 }];
        let quran = vec![QuranSession { date: day(), minutes_read: 20.0 }];

        let score = BarakahScorer::new().score(&BarakahInput {
            prayers: &prayers,
            tasks: &tasks,
            dhikr: &dhikr,
            quran: &quran,
            streak_days: 4,
        });

        // 2 completed * 3 + 1 on time * 2 + 100 * 0.1 + 20 * 0.5
        assert!((score.spiritual_activities - 28.0).abs() < 1e-9);
        // 2 completed * 1 + 1 islamic * 1.5
        assert!((score.productive_activities - 3.5).abs() < 1e-9);
        assert_eq!(score.consistency_bonus, 8.0);
        assert!((score.total_barakah - 39.5).abs() < 1e-9);
        assert_eq!(score.timely_prayers, 0.5);
        assert_eq!(score.level, BarakahLevel::Novice);
    }

    #[test]
    fn test_timely_ratio_excluded_from_total() {
        let prayers = vec![prayer(true, true)];
        let score = BarakahScorer::new().score(&BarakahInput {
            prayers: &prayers,
            tasks: &[],
            dhikr: &[],
            quran: &[],
            streak_days: 0,
        });

        assert_eq!(score.timely_prayers, 1.0);
        assert_eq!(score.total_barakah, 5.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let score = BarakahScorer::new().score(&BarakahInput {
            prayers: &[],
            tasks: &[],
            dhikr: &[],
            quran: &[],
            streak_days: 0,
        });

        assert_eq!(score.total_barakah, 0.0);
        assert_eq!(score.timely_prayers, 0.0);
        assert_eq!(score.level, BarakahLevel::Novice);
    }

    #[test]
    fn test_custom_weights() {
        let weights = BarakahWeights {
            streak_day: 10.0,
            ..BarakahWeights::default()
        };
        let score = BarakahScorer::with_weights(weights).score(&BarakahInput {
            prayers: &[],
            tasks: &[],
            dhikr: &[],
            quran: &[],
            streak_days: 5,
        });

        assert_eq!(score.total_barakah, 50.0);
        assert_eq!(score.level, BarakahLevel::Committed);
    }
}
