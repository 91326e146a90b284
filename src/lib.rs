// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Barakah Engine
//!
//! Progress scoring and recurring task generation for an Islamic
//! productivity app.
//!
//! ## Features
//!
//! - **Fair tracking**: progress is normalised to the days since a user
//!   registered, so a new user is never measured against a 30-day window
//! - **Barakah scoring**: weighted score over prayers, dhikr, Quran reading
//!   and tasks, banded into five levels
//! - **Islamic metrics**: prayer consistency, punctuality, dhikr and Quran
//!   engagement
//! - **Recurring tasks**: an owned, cancellable scheduler that materialises
//!   today's occurrence of every daily or weekly template exactly once
//!
//! ## Architecture
//!
//! - **Models**: activity records and task rows
//! - **Intelligence**: pure calculators and the report aggregator
//! - **Recurrence**: occurrence decisions, the generator and its scheduler
//! - **Backends**: SQLite and PostgREST task storage behind one trait
//! - **Config**: environment settings plus TOML scoring weights
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use barakah_engine::intelligence::ProgressAnalyzer;
//! use barakah_engine::models::{PrayerCompletion, PrayerName, UserActivityLog};
//! use chrono::NaiveDate;
//!
//! let registered = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let mut log = UserActivityLog::new(registered);
//! log.prayers.push(PrayerCompletion {
//!     date: registered,
//!     prayer: PrayerName::Fajr,
//!     completed: true,
//!     on_time: true,
//! });
//!
//! let report = ProgressAnalyzer::new().analyze(&log, registered);
//! println!("{}: {}", report.barakah.level, report.message.text);
//! ```

/// Common data models for activity and task data
pub mod models;

/// Calendar-day helpers shared by scoring and scheduling
pub mod dates;

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Fair progress, Barakah scoring, metrics and insights
pub mod intelligence;

/// Recurring task decisions, generation and scheduling
pub mod recurrence;

/// Task storage and remote procedure backends
pub mod backends;

/// SQLite task store
pub mod database;

/// Production logging and structured output
pub mod logging;
