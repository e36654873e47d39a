//! Event settings commands.

use anyhow::Result;
use clap::Args;
use clap::Subcommand;

use gacha_ledger::domain::EventConfig;
use gacha_ledger::AssignmentLedger;

use crate::output::print_output;
use crate::output::EventOutput;

/// Event settings operations.
#[derive(Subcommand)]
pub enum EventCommand {
    /// Show the target count and event summary.
    Show,

    /// Change the target count and/or the event summary.
    Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
    /// Participants required before drawing unlocks.
    #[arg(long)]
    pub target: Option<u32>,

    /// Welcome text shown to participants.
    #[arg(long)]
    pub summary: Option<String>,
}

impl EventCommand {
    /// Execute the event command.
    pub async fn run(self, ledger: &AssignmentLedger, json: bool) -> Result<()> {
        match self {
            EventCommand::Show => event_show(ledger, json).await,
            EventCommand::Set(args) => event_set(ledger, args, json).await,
        }
    }
}

async fn event_show(ledger: &AssignmentLedger, json: bool) -> Result<()> {
    print_output(&EventOutput(ledger.event_config().await?), json);
    Ok(())
}

async fn event_set(ledger: &AssignmentLedger, args: SetArgs, json: bool) -> Result<()> {
    let current = ledger.event_config().await?;
    let updated = EventConfig::new(
        args.target.unwrap_or(current.target_count),
        args.summary.unwrap_or(current.event_summary),
    )?;
    ledger.update_event_config(updated.clone()).await?;
    print_output(&EventOutput(updated), json);
    Ok(())
}
