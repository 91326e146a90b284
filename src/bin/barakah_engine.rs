// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Barakah Engine Binary
//!
//! Produces progress reports from an activity log and runs the recurring
//! task generator once or on a schedule.

use anyhow::{Context, Result};
use barakah_engine::{
    backends::create_backend,
    config::{Config, EngineConfig},
    dates::today_local,
    intelligence::ProgressAnalyzer,
    logging::{self, AppLogger},
    models::UserActivityLog,
    recurrence::{GeneratorConfig, RecurringTaskGenerator, RecurringTaskScheduler},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "barakah-engine")]
#[command(author, version, about = "Fair progress scoring and recurring task generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a progress report for an activity log
    Report {
        /// JSON file holding the user's activity log
        #[arg(short, long)]
        input: PathBuf,

        /// Report date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<NaiveDate>,

        /// Scoring configuration file (TOML)
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Run the recurring task generator once
    Generate {
        /// User whose templates are scanned, defaults to ENGINE_USER_ID
        #[arg(short, long)]
        user_id: Option<String>,

        /// Day to generate for (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<NaiveDate>,
    },
    /// Run the recurring task generator until interrupted
    Schedule {
        /// User whose templates are scanned, defaults to ENGINE_USER_ID
        #[arg(short, long)]
        user_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up RUST_LOG and friends from .env before the subscriber reads them
    dotenv::dotenv().ok();
    logging::init_from_env()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { input, today, config } => run_report(input, today, config),
        Commands::Generate { user_id, today } => run_generate(user_id, today).await,
        Commands::Schedule { user_id } => run_schedule(user_id).await,
    }
}

fn run_report(input: PathBuf, today: Option<NaiveDate>, config: Option<String>) -> Result<()> {
    let config = Config::load(config)?;

    let content = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read activity log: {}", input.display()))?;
    let log: UserActivityLog = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse activity log: {}", input.display()))?;

    let report = ProgressAnalyzer::with_config(&config.scoring).analyze(&log, today.unwrap_or_else(today_local));
    AppLogger::log_report(&report);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn resolve_user(user_id: Option<String>, engine: &EngineConfig) -> Result<String> {
    user_id
        .or_else(|| engine.scheduler.user_id.clone())
        .context("No user given: pass --user-id or set ENGINE_USER_ID")
}

async fn build_generator(engine: &EngineConfig) -> Result<Arc<RecurringTaskGenerator>> {
    let backend = create_backend(&engine.backend).await?;
    Ok(Arc::new(RecurringTaskGenerator::new(
        backend,
        GeneratorConfig {
            client_side_dedup: engine.scheduler.client_side_dedup,
        },
    )))
}

async fn run_generate(user_id: Option<String>, today: Option<NaiveDate>) -> Result<()> {
    let engine = EngineConfig::from_env()?;
    let user_id = resolve_user(user_id, &engine)?;
    let generator = build_generator(&engine).await?;

    let report = generator.run_once(&user_id, today.unwrap_or_else(today_local)).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_schedule(user_id: Option<String>) -> Result<()> {
    let engine = EngineConfig::from_env()?;
    info!("{}", engine.summary());

    let user_id = resolve_user(user_id, &engine)?;
    let generator = build_generator(&engine).await?;

    let handle = RecurringTaskScheduler::new(generator, user_id)
        .with_interval(Duration::from_secs(engine.scheduler.check_interval_secs))
        .spawn();

    handle
        .stop_on(tokio::signal::ctrl_c())
        .await
        .context("Failed to listen for shutdown signal")?;

    Ok(())
}
