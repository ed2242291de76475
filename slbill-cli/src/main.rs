// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! slbill CLI - SoftLayer billing reports from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Every ordered resource and its cost
//! sl billing list
//!
//! # iSCSI storage ordered in March 2014
//! sl billing list --from-date 2014-03-01 --to-date 2014-04-01 --group-by "iscsi SAN storage"
//!
//! # Accumulated cost
//! sl billing total --from-date 2014-04-01
//!
//! # JSON output
//! sl --format json --pretty billing list
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use slbill_fetch::FetchError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{billing, config};

// ============================================================================
// CLI Definition
// ============================================================================

/// slbill CLI - SoftLayer billing reports.
#[derive(Parser)]
#[command(name = "sl")]
#[command(about = "Shows cost incurred due to created resources")]
#[command(long_about = r#"
Shows cost incurred due to created resources.

Commands:
  billing list     Lists all ordered resources and their cost up to this time
  billing total    Accumulated cost of all resources

Example:
  # All iSCSI SAN storage ordered between 2014-03-01 and 2014-04-01
  sl billing list --from-date 2014-03-01 --to-date 2014-04-01 --group-by "iscsi SAN storage"
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, no error text).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show cost incurred due to created resources.
    #[command(visible_alias = "b")]
    Billing(billing::BillingArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Any error.
    Error = 1,
}

/// Extra guidance printed after an error, if any.
fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<FetchError>()? {
        e if e.is_input_error() => Some("Dates use YYYY-MM-DD and endpoints must be http(s) URLs."),
        FetchError::MissingCredentials(_) | FetchError::AuthenticationFailed(_) => {
            Some("Check `sl config show` or set SL_USERNAME and SL_API_KEY.")
        }
        _ => None,
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("slbill=debug,info")
    } else {
        EnvFilter::new("slbill=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result: Result<()> = match &cli.command {
        Commands::Billing(args) => billing::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
                if let Some(hint) = error_hint(&e) {
                    eprintln!("{hint}");
                }
            }
            ExitCode::Error
        }
    };

    std::process::exit(code as i32);
}
