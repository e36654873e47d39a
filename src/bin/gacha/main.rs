//! gacha - command-line front end for the gift-exchange draw ledger.
//!
//! # Usage
//!
//! ```bash
//! # Join the exchange
//! gacha join "Frosty Snowman" "Magic Hat" --pin 4821
//!
//! # Draw once, then reveal again later
//! gacha draw <participant-id> --pin 4821
//! gacha reveal <participant-id> --pin 4821
//!
//! # JSON output for scripting
//! gacha --json stats | jq '.remaining'
//! ```

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Initialize tracing subscriber with environment-based filtering.
///
/// - `quiet`: Suppress all logging output (for scripting)
/// - `verbose`: Enable debug-level logging
fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.global.is_quiet, cli.global.is_verbose);

    cli.run().await
}
