//! `cadence` CLI: list event occurrences and find common free slots from a JSON store.
//!
//! ## Usage
//!
//! ```sh
//! # Every occurrence for kek in the first ten days of 2023
//! cadence list --store events.json --user kek --since 2023-01-01 --till 2023-01-10
//!
//! # First 30-minute slot free for both kek and lol within a week of since
//! cadence gap --store events.json --user kek --user lol --since 2023-01-01T09:00:00 --minutes 30
//!
//! # Look two weeks ahead instead of one
//! cadence gap --store events.json --user kek --since 2023-01-01 --minutes 60 --horizon-days 14
//!
//! # Validate every definition in a store file
//! cadence check --store events.json
//! ```
//!
//! The store file is a JSON array of event definitions. Timestamps are naive
//! civil date-times (`2023-01-01T09:00:00`) or bare dates (midnight).

use std::collections::BTreeSet;
use std::process;

use anyhow::{Context, Result};
use cadence_engine::{InMemoryStore, Scheduler, SchedulerConfig};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when a gap search finds nothing inside the horizon.
const EXIT_NOT_FOUND: i32 = 2;

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Recurring event listing and free-slot search"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (e.g. "debug", "cadence_engine=trace"); defaults to RUST_LOG or "warn"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// JSON file with scheduler settings (horizon_days, max_gap_minutes)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every occurrence in a window for the given users
    List {
        /// JSON file holding an array of event definitions
        #[arg(short, long)]
        store: String,
        /// User to include (repeatable)
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,
        /// Window start
        #[arg(long, value_parser = parse_timestamp)]
        since: NaiveDateTime,
        /// Window end
        #[arg(long, value_parser = parse_timestamp)]
        till: NaiveDateTime,
    },
    /// Find the earliest slot free for all given users
    Gap {
        /// JSON file holding an array of event definitions
        #[arg(short, long)]
        store: String,
        /// User to include (repeatable)
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,
        /// Earliest allowed slot start
        #[arg(long, value_parser = parse_timestamp)]
        since: NaiveDateTime,
        /// Slot length in minutes
        #[arg(short, long)]
        minutes: i64,
        /// Override the search horizon in days
        #[arg(long)]
        horizon_days: Option<u32>,
    },
    /// Validate every definition in a store file
    Check {
        /// JSON file holding an array of event definitions
        #[arg(short, long)]
        store: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let mut config = match cli.config.as_deref() {
        Some(path) => SchedulerConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => SchedulerConfig::default(),
    };

    match cli.command {
        Commands::List {
            store,
            users,
            since,
            till,
        } => {
            let scheduler = Scheduler::with_config(load_store(&store)?, config)?;
            let users: BTreeSet<String> = users.into_iter().collect();
            let occurrences = scheduler
                .list_occurrences(&users, since, till)
                .context("Failed to list occurrences")?;
            debug!(count = occurrences.len(), "listed occurrences");
            println!("{}", serde_json::to_string_pretty(&occurrences)?);
        }
        Commands::Gap {
            store,
            users,
            since,
            minutes,
            horizon_days,
        } => {
            if let Some(days) = horizon_days {
                config.horizon_days = days;
            }
            let scheduler = Scheduler::with_config(load_store(&store)?, config)?;
            let users: BTreeSet<String> = users.into_iter().collect();
            let duration = Duration::try_minutes(minutes)
                .with_context(|| format!("Slot length out of range: {} minutes", minutes))?;
            let found = scheduler
                .find_gap(&users, since, duration)
                .context("Failed to search for a free slot")?;
            match found {
                Some(interval) => println!("{}", serde_json::to_string_pretty(&interval)?),
                None => {
                    eprintln!(
                        "no free slot of {} minutes within {} days of {}",
                        minutes,
                        scheduler.config().horizon_days,
                        since
                    );
                    process::exit(EXIT_NOT_FOUND);
                }
            }
        }
        Commands::Check { store } => {
            let store = load_store(&store)?;
            for definition in store.definitions() {
                definition
                    .validate()
                    .with_context(|| format!("Invalid definition: {}", definition.id))?;
            }
            println!("{} definitions OK", store.len());
        }
    }

    Ok(())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log filter: {}", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_store(path: &str) -> Result<InMemoryStore> {
    InMemoryStore::from_path(path).with_context(|| format!("Failed to load store: {}", path))
}

/// Accept `2023-01-01T09:30:00`, `2023-01-01T09:30`, or a bare `2023-01-01` (midnight).
fn parse_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    let raw = raw.trim();
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    raw.parse::<NaiveDate>()
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| format!("expected YYYY-MM-DD[THH:MM[:SS]], got '{}'", raw))
}
