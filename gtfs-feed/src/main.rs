use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gtfs_feed::config::Config;
use gtfs_feed::realtime::{EntityKind, decode_feed_with};
use gtfs_feed::schedule::load_feed;
use gtfs_feed::source;

/// Violations printed before the listing is cut short.
const MAX_LISTED_VIOLATIONS: usize = 50;

#[derive(Parser)]
#[command(name = "gtfs-feed")]
#[command(about = "Decode GTFS-realtime buffers and validate static GTFS feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a GTFS-realtime protocol buffer file
    Realtime {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a directory of static GTFS tables
    Schedule {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let ok = match &cli.command {
        Commands::Realtime { file, config } => {
            load_config(config.as_deref()).is_some_and(|c| realtime(file, &c))
        }
        Commands::Schedule { dir, config } => {
            load_config(config.as_deref()).is_some_and(|c| schedule(dir, &c))
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&Path>) -> Option<Config> {
    let Some(path) = path else {
        return Some(Config::default());
    };
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            error!(path = %path.display(), "{e}");
            None
        }
    }
}

fn realtime(path: &Path, config: &Config) -> bool {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path = %path.display(), "cannot read feed: {e}");
            return false;
        }
    };

    let outcome = match decode_feed_with(&bytes, &config.realtime) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(path = %path.display(), "decode failed: {e}");
            return false;
        }
    };

    for warning in &outcome.warnings {
        warn!("{warning}");
    }

    let message = &outcome.message;
    info!(
        version = %message.header.gtfs_realtime_version,
        bytes = bytes.len(),
        "decoded feed"
    );
    if let Some(timestamp) = message.header.timestamp_utc() {
        println!("Feed timestamp: {timestamp}");
    }
    println!("Entities: {}", message.entities.len());
    println!(
        "  trip updates:      {}",
        message.entities_of_kind(EntityKind::TripUpdate).count()
    );
    println!(
        "  vehicle positions: {}",
        message.entities_of_kind(EntityKind::VehiclePosition).count()
    );
    println!(
        "  alerts:            {}",
        message.entities_of_kind(EntityKind::Alert).count()
    );
    println!(
        "  without payload:   {}",
        message.entities_without_payload().count()
    );
    println!("Warnings: {}", outcome.warnings.len());
    true
}

fn schedule(dir: &Path, config: &Config) -> bool {
    let tables = match source::read_dir(dir) {
        Ok(tables) => tables,
        Err(e) => {
            error!("{e}");
            return false;
        }
    };

    match load_feed(&tables, &config.schedule) {
        Ok(feed) => {
            println!("Agencies:  {}", feed.agencies().len());
            println!("Stops:     {}", feed.stops().len());
            println!("Routes:    {}", feed.routes().len());
            println!("Trips:     {}", feed.trips().len());
            println!("Calendars: {}", feed.calendars().len());
            true
        }
        Err(report) => {
            println!("{report}");
            for violation in report.violations().iter().take(MAX_LISTED_VIOLATIONS) {
                println!("  {violation}");
            }
            if report.len() > MAX_LISTED_VIOLATIONS {
                println!("  ... and {} more", report.len() - MAX_LISTED_VIOLATIONS);
            }
            false
        }
    }
}
