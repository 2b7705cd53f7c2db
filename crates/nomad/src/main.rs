// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nomad - travel ledger and Schengen 90/180 compliance tracker.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use nomad_config::NomadConfig;
use nomad_core::types::parse_date;
use nomad_core::{CountryCode, NomadError};

/// Nomad - travel ledger and Schengen 90/180 compliance tracker.
#[derive(Parser, Debug)]
#[command(name = "nomad", version, about, long_about = None)]
struct Cli {
    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the ledger in memory for this invocation only.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a new stay.
    Add(SegmentArgs),
    /// Replace an existing stay.
    Edit {
        /// Id of the stay to replace.
        id: String,
        #[command(flatten)]
        segment: SegmentArgs,
    },
    /// Delete a stay.
    Remove {
        /// Id of the stay to delete.
        id: String,
    },
    /// List stays, most recent first.
    List,
    /// Check whether a stay would be accepted, without recording it.
    Check {
        #[command(flatten)]
        segment: SegmentArgs,
        /// Check as an edit of this existing stay.
        #[arg(long)]
        id: Option<String>,
    },
    /// Show Schengen days used and remaining.
    Status {
        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Show where you are (or last were) on a date.
    Where {
        /// Date to look up (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Print the effective configuration.
    Config,
}

/// Date range and country of a stay.
#[derive(Args, Debug, Clone)]
pub struct SegmentArgs {
    /// First day of the stay (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    pub start: NaiveDate,

    /// Last day of the stay (YYYY-MM-DD), inclusive.
    #[arg(long, value_parser = parse_date_arg)]
    pub end: NaiveDate,

    /// Two-letter country code.
    #[arg(long, value_parser = parse_country_arg)]
    pub country: CountryCode,

    /// Free-form notes.
    #[arg(long)]
    pub notes: Option<String>,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn parse_country_arg(value: &str) -> Result<CountryCode, String> {
    CountryCode::parse(value).map_err(|e| e.to_string())
}

/// Exit status for a rejected segment.
const EXIT_REJECTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nomad_config::load_and_validate_path(path),
        None => nomad_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nomad_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.traveler.log_level);

    let out = output::Output::new(cli.json, cli.plain);
    match run(cli, config, &out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(NomadError::Rejected(rejection)) => {
            out.rejection(&rejection);
            ExitCode::from(EXIT_REJECTED)
        }
        Err(err) => {
            out.error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: NomadConfig, out: &output::Output) -> Result<(), NomadError> {
    if let Commands::Config = cli.command {
        return commands::show_config(&config, out);
    }

    let engine = commands::open_engine(&config, cli.ephemeral).await?;
    let result = match cli.command {
        Commands::Add(segment) => commands::add(&engine, segment, out).await,
        Commands::Edit { id, segment } => commands::edit(&engine, id, segment, out).await,
        Commands::Remove { id } => commands::remove(&engine, id, out).await,
        Commands::List => commands::list(&engine, out).await,
        Commands::Check { segment, id } => commands::check(&engine, segment, id, out).await,
        Commands::Status { date } => commands::status(&engine, &config, date, out).await,
        Commands::Where { date } => commands::where_am_i(&engine, date, out).await,
        Commands::Config => Ok(()),
    };
    let closed = engine.store().close().await;
    result.and(closed)
}

/// Install the fmt subscriber on stderr so stdout stays clean for `--json`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "nomad={log_level},nomad_engine={log_level},nomad_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_arguments_are_parsed_and_normalized() {
        let cli = Cli::try_parse_from([
            "nomad", "add", "--start", "2024-01-01", "--end", "2024-01-05", "--country", "fr",
        ])
        .unwrap();
        let Commands::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.country.as_str(), "FR");
        assert_eq!(args.start, parse_date("2024-01-01").unwrap());
    }

    #[test]
    fn malformed_arguments_are_refused() {
        assert!(
            Cli::try_parse_from([
                "nomad", "add", "--start", "2024-02-30", "--end", "2024-03-01", "--country", "FR",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "nomad", "add", "--start", "2024-02-01", "--end", "2024-03-01", "--country", "FRA",
            ])
            .is_err()
        );
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["nomad", "status", "--json", "--ephemeral"]).unwrap();
        assert!(cli.json);
        assert!(cli.ephemeral);
    }
}
