// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Owned, cancellable schedule for the recurring task generator
//!
//! The scheduler runs in a single tokio task. Each tick awaits the whole scan
//! before the next tick is polled, so two scans never run at once. The caller
//! owns the returned [`SchedulerHandle`] and must stop it on shutdown.

use super::generator::RecurringTaskGenerator;
use crate::constants::scheduling::DEFAULT_CHECK_INTERVAL_SECS;
use crate::dates::today_local;
use chrono::NaiveDate;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

/// Source of "today" for each run
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Periodic driver for one user's recurring templates
pub struct RecurringTaskScheduler {
    generator: Arc<RecurringTaskGenerator>,
    user_id: String,
    interval: Duration,
    clock: Clock,
}

impl RecurringTaskScheduler {
    /// Hourly scheduler using the local calendar day
    pub fn new(generator: Arc<RecurringTaskGenerator>, user_id: impl Into<String>) -> Self {
        Self {
            generator,
            user_id: user_id.into(),
            interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            clock: Arc::new(today_local),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Start the schedule. The first scan runs immediately.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(shutdown_rx));

        SchedulerHandle {
            shutdown: shutdown_tx,
            join,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            user.id = %self.user_id,
            interval_secs = self.interval.as_secs(),
            "Recurring task scheduler started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        warn!(user.id = %self.user_id, "Scheduler handle dropped without stop");
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let today = (self.clock)();
                    if let Err(e) = self.generator.run_once(&self.user_id, today).await {
                        error!(user.id = %self.user_id, error = %e, "Recurring task scan failed");
                    }
                }
            }
        }

        info!(user.id = %self.user_id, "Recurring task scheduler stopped");
    }
}

/// Cancellation handle for a running scheduler
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the task to finish. A scan in progress
    /// completes first.
    pub async fn stop(self) {
        // The receiver only disappears once the task has already exited
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            error!(error = %e, "Scheduler task ended abnormally");
        }
    }

    /// Run until `signal` resolves, then stop. The schedule is stopped
    /// whether the signal fired or its listener failed.
    pub async fn stop_on<F>(self, signal: F) -> io::Result<()>
    where
        F: Future<Output = io::Result<()>>,
    {
        let outcome = signal.await;
        info!("Shutdown requested, stopping scheduler");
        self.stop().await;
        outcome
    }

    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }
}
