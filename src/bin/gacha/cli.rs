//! CLI argument parsing and command dispatch.
//!
//! Uses clap derive macros for declarative argument definition with
//! support for environment variables and global options.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use gacha_ledger::storage::build_store;
use gacha_ledger::AppConfig;
use gacha_ledger::AssignmentLedger;

use crate::commands::draw;
use crate::commands::draw::AuthArgs;
use crate::commands::draw::CandidatesArgs;
use crate::commands::event::EventCommand;
use crate::commands::participant;
use crate::commands::participant::IdArgs;
use crate::commands::participant::JoinArgs;

/// Command-line interface for the gift-exchange gacha machine.
#[derive(Parser)]
#[command(name = "gacha")]
#[command(version)]
#[command(about = "Gift-exchange draw ledger")]
#[command(long_about = "Join the gift exchange, draw a recipient once, and reveal it again later \
    with your PIN.")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global options available to all commands.
#[derive(Args, Clone)]
pub struct GlobalOptions {
    /// TOML configuration file.
    ///
    /// Falls back to GACHA_* environment variables when the file does not exist.
    #[arg(long, env = "GACHA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output JSON instead of human-readable format.
    #[arg(long = "json", global = true)]
    pub is_json: bool,

    /// Enable verbose logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub is_verbose: bool,

    /// Suppress all logging output.
    #[arg(short = 'q', long = "quiet", global = true)]
    pub is_quiet: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Register a new participant.
    Join(JoinArgs),

    /// List all participants (PINs are never shown).
    List,

    /// Remove a participant and unwind draws involving them.
    Remove(IdArgs),

    /// Mark a participant as claimed.
    Claim(IdArgs),

    /// Release a manual claim.
    ///
    /// Refused while someone's recorded draw points at the participant.
    Unclaim(IdArgs),

    /// List who a participant could still draw.
    Candidates(CandidatesArgs),

    /// Draw a recipient (once per participant).
    Draw(AuthArgs),

    /// Show a previously drawn recipient.
    Reveal(AuthArgs),

    /// Preview a draw over the whole pool without saving anything.
    Simulate,

    /// Pool statistics and draw gate.
    Stats,

    /// Claimed participants that no recorded draw points at.
    Orphans,

    /// Event settings.
    #[command(subcommand)]
    Event(EventCommand),
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let config = AppConfig::load_with_optional_file(self.global.config.as_ref())
            .context("failed to load configuration")?;
        let store = build_store(&config.storage, config.event.to_event_config())
            .context("failed to open participant store")?;
        let ledger = AssignmentLedger::from_config(store, &config.draw);
        let json = self.global.is_json;

        match self.command {
            Commands::Join(args) => participant::join(&ledger, args, json).await,
            Commands::List => participant::list(&ledger, json).await,
            Commands::Remove(args) => participant::remove(&ledger, args, json).await,
            Commands::Claim(args) => participant::set_claimed(&ledger, args, true, json).await,
            Commands::Unclaim(args) => participant::set_claimed(&ledger, args, false, json).await,
            Commands::Candidates(args) => draw::candidates(&ledger, args, json).await,
            Commands::Draw(args) => draw::draw(&ledger, args, json).await,
            Commands::Reveal(args) => draw::reveal(&ledger, args, json).await,
            Commands::Simulate => draw::simulate(&ledger, json).await,
            Commands::Stats => participant::stats(&ledger, json).await,
            Commands::Orphans => participant::orphans(&ledger, json).await,
            Commands::Event(cmd) => cmd.run(&ledger, json).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_help_does_not_panic() {
        // --help causes clap to return an error with exit code 0
        let result = Cli::try_parse_from(["gacha", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_candidates_requires_id() {
        let result = Cli::try_parse_from(["gacha", "candidates"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_draw_parses_with_global_flags() {
        let cli = Cli::try_parse_from(["gacha", "draw", "p-1", "--pin", "4821", "--json", "-q"]).unwrap();
        assert!(cli.global.is_json);
        assert!(cli.global.is_quiet);
        match cli.command {
            Commands::Draw(args) => {
                assert_eq!(args.id, "p-1");
                assert_eq!(args.pin, "4821");
            }
            _ => panic!("expected draw command"),
        }
    }

    #[test]
    fn test_event_set_parses_partial_update() {
        let cli = Cli::try_parse_from(["gacha", "event", "set", "--target", "3"]).unwrap();
        match cli.command {
            Commands::Event(EventCommand::Set(args)) => {
                assert_eq!(args.target, Some(3));
                assert!(args.summary.is_none());
            }
            _ => panic!("expected event set"),
        }
    }
}
