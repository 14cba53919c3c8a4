//! tickfill CLI - Backfill historical crypto trade archives.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::{FetchArgs, SourceArgs};

#[derive(Parser)]
#[command(name = "tickfill")]
#[command(about = "Backfill historical crypto trade archives", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a market's trade history as ticks or OHLCV bars
    Fetch(FetchArgs),

    /// Find the first day a market published a trade archive
    Locate {
        /// Market symbol (e.g., BTC, ETH, BTC_JPY)
        market: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    init_tracing(cli.verbose);

    match command {
        Commands::Fetch(args) => commands::fetch::fetch(args, cli.quiet).await,
        Commands::Locate { market, source } => commands::locate::locate(&market, &source).await,
    }
}
