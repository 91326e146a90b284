// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Motivational messages and progress insights
//!
//! Messages come from an ordered decision list where the first matching rule
//! wins. Insights are independent checks and any number may fire at once.

use super::barakah::BarakahLevel;
use super::fair_progress::is_fair_tracking_active;
use crate::config::scoring_config::InsightThresholds;
use crate::constants::thresholds::{
    BALANCED_SPIRITUALITY, EXCELLENT_PRAYER_CONSISTENCY, LONG_STREAK_DAYS, NEW_USER_MAX_DAYS,
    STRONG_PRAYER_CONSISTENCY, WEEK_STREAK_DAYS,
};
use crate::constants::tracking::FAIR_TRACKING_WINDOW_DAYS;
use serde::{Deserialize, Serialize};

/// Inputs to the motivational message cascade
#[derive(Debug, Clone, Copy)]
pub struct MessageContext {
    pub days_since_registration: i64,
    pub streak_count: u32,
    pub barakah_level: BarakahLevel,
    pub prayer_consistency: f64,
    pub overall_spirituality: f64,
}

/// Which rule produced a message, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRule {
    FirstDay,
    EarlyDays,
    LongStreak,
    WeekStreak,
    ExcellentPrayer,
    StrongPrayer,
    HighBarakah,
    Balanced,
    Encouragement,
}

/// Selected motivational message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotivationalMessage {
    pub rule: MessageRule,
    pub text: String,
}

type Predicate = fn(&MessageContext) -> bool;

/// Decision list evaluated top to bottom. Order is significant.
const MESSAGE_RULES: &[(MessageRule, Predicate)] = &[
    (MessageRule::FirstDay, |c: &MessageContext| c.days_since_registration <= 1),
    (MessageRule::EarlyDays, |c: &MessageContext| c.days_since_registration <= NEW_USER_MAX_DAYS),
    (MessageRule::LongStreak, |c: &MessageContext| c.streak_count >= LONG_STREAK_DAYS),
    (MessageRule::WeekStreak, |c: &MessageContext| c.streak_count >= WEEK_STREAK_DAYS),
    (MessageRule::ExcellentPrayer, |c: &MessageContext| {
        c.prayer_consistency >= EXCELLENT_PRAYER_CONSISTENCY
    }),
    (MessageRule::StrongPrayer, |c: &MessageContext| c.prayer_consistency >= STRONG_PRAYER_CONSISTENCY),
    (MessageRule::HighBarakah, |c: &MessageContext| c.barakah_level >= BarakahLevel::Exemplary),
    (MessageRule::Balanced, |c: &MessageContext| c.overall_spirituality >= BALANCED_SPIRITUALITY),
    (MessageRule::Encouragement, |_: &MessageContext| true),
];

/// Picks one motivational message per context
pub struct MotivationalMessageGenerator;

impl MotivationalMessageGenerator {
    /// First matching rule wins
    pub fn generate(context: &MessageContext) -> MotivationalMessage {
        let rule = MESSAGE_RULES
            .iter()
            .find(|(_, matches)| matches(context))
            .map(|(rule, _)| *rule)
            .unwrap_or(MessageRule::Encouragement);

        MotivationalMessage {
            rule,
            text: Self::render(rule, context),
        }
    }

    fn render(rule: MessageRule, context: &MessageContext) -> String {
        match rule {
            MessageRule::FirstDay => {
                "Bismillah! Welcome to your first day. Every journey begins with a single step.".to_string()
            }
            MessageRule::EarlyDays => format!(
                "Day {} of your journey. You're building the foundation, keep going!",
                context.days_since_registration
            ),
            MessageRule::LongStreak => format!(
                "MashaAllah! {} days in a row. Your consistency is truly inspiring.",
                context.streak_count
            ),
            MessageRule::WeekStreak => format!(
                "A {}-day streak! Small consistent deeds are most beloved to Allah.",
                context.streak_count
            ),
            MessageRule::ExcellentPrayer => format!(
                "Your prayers are {:.0}% consistent. Excellent dedication to salah!",
                context.prayer_consistency
            ),
            MessageRule::StrongPrayer => format!(
                "Strong prayer habit at {:.0}%. You're close to praying every salah on time.",
                context.prayer_consistency
            ),
            MessageRule::HighBarakah => format!(
                "Your Barakah level is {}. May Allah bless your efforts.",
                context.barakah_level
            ),
            MessageRule::Balanced => {
                "You're keeping a balanced spiritual routine. Keep nurturing it.".to_string()
            }
            MessageRule::Encouragement => {
                "Every good deed counts. Start with your next prayer and build from there.".to_string()
            }
        }
    }
}

/// Status line for the fair tracking window
pub fn fair_tracking_status_message(days_since_registration: i64) -> String {
    if is_fair_tracking_active(days_since_registration) {
        format!(
            "Fair tracking active: day {} of {}. Progress is measured from your registration date.",
            days_since_registration.max(1),
            FAIR_TRACKING_WINDOW_DAYS
        )
    } else {
        format!(
            "Tracking {} days since registration.",
            days_since_registration
        )
    }
}

/// Insight severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Success,
    Warning,
}

/// An insight about the user's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub severity: InsightSeverity,
}

/// Inputs to the insight checks
#[derive(Debug, Clone, Copy)]
pub struct InsightContext {
    pub days_since_registration: i64,
    pub is_fair_tracking_active: bool,
    pub prayer_consistency: f64,
    pub streak_count: u32,
}

/// Insight generator for non-exclusive progress checks
pub struct InsightGenerator {
    thresholds: InsightThresholds,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator {
    /// Create a new insight generator with default thresholds
    pub fn new() -> Self {
        Self {
            thresholds: InsightThresholds::default(),
        }
    }

    /// Create a new insight generator with custom thresholds
    pub fn with_thresholds(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    /// Run every check; zero or more may fire
    pub fn generate(&self, context: &InsightContext) -> Vec<Insight> {
        let mut insights = Vec::new();

        if context.is_fair_tracking_active {
            insights.push(Insight {
                title: "Fair tracking active".to_string(),
                description: format!(
                    "Day {} since you joined. Your progress is measured against days since registration rather than the whole month.",
                    context.days_since_registration
                ),
                severity: InsightSeverity::Info,
            });
        }

        if context.prayer_consistency >= self.thresholds.good_prayer_consistency {
            insights.push(Insight {
                title: "Strong prayer consistency".to_string(),
                description: format!(
                    "You've completed {:.0}% of your prayers. Keep it up!",
                    context.prayer_consistency
                ),
                severity: InsightSeverity::Success,
            });
        } else if context.prayer_consistency < self.thresholds.low_prayer_consistency {
            insights.push(Insight {
                title: "Prayer consistency needs attention".to_string(),
                description: format!(
                    "Only {:.0}% of prayers completed. Try setting reminders for each salah.",
                    context.prayer_consistency
                ),
                severity: InsightSeverity::Warning,
            });
        }

        if context.streak_count >= self.thresholds.good_streak_days {
            insights.push(Insight {
                title: "Great streak".to_string(),
                description: format!(
                    "{} consecutive days of activity. Consistency brings Barakah.",
                    context.streak_count
                ),
                severity: InsightSeverity::Success,
            });
        }

        insights
    }
}
