//! `slots` CLI: search, rank, and check appointment slots against busy calendars.
//!
//! Busy time is read from a JSON file mapping calendar ids to busy intervals:
//!
//! ```json
//! { "leader-1": [ { "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T10:00:00Z" } ] }
//! ```
//!
//! ## Usage
//!
//! ```sh
//! # Every open 30-minute slot for one leader in a window
//! slots --busy busy.json find leader-1 --duration 30 \
//!   --from 2026-03-02T00:00:00Z --to 2026-03-06T23:59:00Z
//!
//! # The same search across several leaders at once
//! slots --busy busy.json find leader-1 leader-2 --duration 30 --from ... --to ...
//!
//! # Top ten ranked slots over the next two weeks
//! slots --busy busy.json --prefs prefs.json suggest leader-1 --duration 60
//!
//! # Is one slot free?
//! slots --busy busy.json check leader-1 --start 2026-03-02T14:00:00Z --duration 30
//!
//! # Earliest open slot in the next 30 days
//! slots --busy busy.json --timezone Europe/London next leader-1 --duration 45
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `-v` (repeatable) for more.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use slot_engine::{
    AvailabilityEngine, BusyInterval, DateRange, EngineConfig, FixedClock, SchedulingPreferences,
    StaticBusySource,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Appointment slot finder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file mapping calendar ids to busy intervals
    #[arg(long)]
    busy: String,

    /// JSON engine configuration file
    #[arg(long)]
    config: Option<String>,

    /// JSON scheduling preferences file (overrides the config's defaults)
    #[arg(long)]
    prefs: Option<String>,

    /// IANA timezone for working hours and scoring
    #[arg(long)]
    timezone: Option<String>,

    /// Minutes of idle time required around each appointment
    #[arg(long)]
    buffer: Option<u32>,

    /// Treat this instant as "now" (RFC 3339)
    #[arg(long)]
    now: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List every open slot in a window, chronologically
    Find {
        /// One or more calendar ids
        #[arg(required = true)]
        calendars: Vec<String>,
        /// Appointment length in minutes
        #[arg(long)]
        duration: i64,
        /// Window start (RFC 3339)
        #[arg(long)]
        from: String,
        /// Window end (RFC 3339)
        #[arg(long)]
        to: String,
    },
    /// Rank the best slots over the suggestion horizon
    Suggest {
        calendar: String,
        #[arg(long)]
        duration: i64,
    },
    /// Report whether a single slot is free
    Check {
        calendar: String,
        /// Slot start (RFC 3339)
        #[arg(long)]
        start: String,
        #[arg(long)]
        duration: i64,
    },
    /// Show the earliest open slot within the next-slot horizon
    Next {
        calendar: String,
        #[arg(long)]
        duration: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let prefs = resolve_preferences(&cli, &config)?;
    let source = load_busy(&cli.busy)?;

    let mut engine = AvailabilityEngine::new(source).with_config(config);
    if let Some(now) = cli.now.as_deref() {
        engine = engine.with_clock(FixedClock(parse_datetime(now)?));
    }

    match cli.command {
        Commands::Find {
            calendars,
            duration,
            from,
            to,
        } => {
            let range = DateRange::new(parse_datetime(&from)?, parse_datetime(&to)?)?;
            if let [calendar] = calendars.as_slice() {
                let slots = engine
                    .find_available_slots(calendar, duration, range, Some(&prefs))
                    .await
                    .with_context(|| lookup_context("search", calendar, engine.source()))?;
                info!(calendar = %calendar, found = slots.len(), "search complete");
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                let ids: Vec<&str> = calendars.iter().map(String::as_str).collect();
                let results = engine
                    .find_available_slots_across(&ids, duration, range, Some(&prefs))
                    .await;
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        Commands::Suggest { calendar, duration } => {
            let slots = engine
                .suggest_optimal_times(&calendar, duration, Some(&prefs))
                .await
                .with_context(|| lookup_context("rank slots in", &calendar, engine.source()))?;
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        Commands::Check {
            calendar,
            start,
            duration,
        } => {
            let start = parse_datetime(&start)?;
            let open = engine
                .is_slot_available(&calendar, start, duration, Some(prefs.buffer_minutes))
                .await
                .with_context(|| lookup_context("check", &calendar, engine.source()))?;
            println!("{}", if open { "available" } else { "busy" });
        }
        Commands::Next { calendar, duration } => {
            let next = engine
                .next_available_slot(&calendar, duration, Some(&prefs))
                .await
                .with_context(|| lookup_context("search", &calendar, engine.source()))?;
            match next {
                Some(slot) => println!("{}", serde_json::to_string_pretty(&slot)?),
                None => println!("no slot found"),
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = read_file(path)?;
            EngineConfig::from_json(&raw).with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Preferences file (or the config's defaults), then individual flag overrides.
fn resolve_preferences(cli: &Cli, config: &EngineConfig) -> Result<SchedulingPreferences> {
    let mut prefs = match cli.prefs.as_deref() {
        Some(path) => serde_json::from_str(&read_file(path)?)
            .with_context(|| format!("Invalid preferences file: {}", path))?,
        None => config.default_preferences.clone(),
    };
    if let Some(tz) = cli.timezone.as_deref() {
        prefs = prefs.with_timezone(tz);
    }
    if let Some(buffer) = cli.buffer {
        prefs = prefs.with_buffer(buffer);
    }
    prefs.validate()?;
    Ok(prefs)
}

fn load_busy(path: &str) -> Result<StaticBusySource> {
    let calendars: HashMap<String, Vec<BusyInterval>> = serde_json::from_str(&read_file(path)?)
        .with_context(|| format!("Invalid busy file: {}", path))?;
    Ok(StaticBusySource::from(calendars))
}

/// Error context for a failed operation, listing the calendars the busy file defines.
fn lookup_context(action: &str, calendar: &str, source: &StaticBusySource) -> String {
    let mut known: Vec<&str> = source.calendar_ids().collect();
    known.sort_unstable();
    format!(
        "Failed to {} calendar '{}' (known calendars: {})",
        action,
        calendar,
        known.join(", ")
    )
}

/// Parse RFC 3339, or a bare `YYYY-MM-DDTHH:MM:SS` taken as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Invalid datetime '{}'", s))
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}
