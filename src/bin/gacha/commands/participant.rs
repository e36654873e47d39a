//! Participant commands.
//!
//! Registration, listing, and the administrative claim and removal
//! operations.

use anyhow::Result;
use clap::Args;

use gacha_ledger::domain::NewParticipant;
use gacha_ledger::AssignmentLedger;

use crate::output::print_output;
use crate::output::print_success;
use crate::output::ParticipantListOutput;
use crate::output::ParticipantOutput;
use crate::output::StatsOutput;

#[derive(Args)]
pub struct JoinArgs {
    /// Display name.
    pub name: String,

    /// What you would like to receive.
    pub wishlist: String,

    /// 4-digit PIN used to reveal your draw later.
    #[arg(long, env = "GACHA_PIN", hide_env_values = true)]
    pub pin: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Participant ID.
    pub id: String,
}

pub async fn join(ledger: &AssignmentLedger, args: JoinArgs, json: bool) -> Result<()> {
    let new = NewParticipant::new(&args.name, &args.wishlist, &args.pin)?;
    let created = ledger.register(new).await?;
    print_output(&ParticipantOutput(created), json);
    Ok(())
}

pub async fn list(ledger: &AssignmentLedger, json: bool) -> Result<()> {
    let output = ParticipantListOutput {
        title: "Participants",
        participants: ledger.participants().await?,
    };
    print_output(&output, json);
    Ok(())
}

pub async fn remove(ledger: &AssignmentLedger, args: IdArgs, json: bool) -> Result<()> {
    ledger.remove_participant(&args.id).await?;
    print_success(&format!("Removed participant {}", args.id), json);
    Ok(())
}

pub async fn set_claimed(ledger: &AssignmentLedger, args: IdArgs, claimed: bool, json: bool) -> Result<()> {
    let updated = ledger.set_claimed(&args.id, claimed).await?;
    print_output(&ParticipantOutput(updated), json);
    Ok(())
}

pub async fn stats(ledger: &AssignmentLedger, json: bool) -> Result<()> {
    let output = StatsOutput {
        stats: ledger.stats().await?,
        gate: ledger.draw_gate().await?,
    };
    print_output(&output, json);
    Ok(())
}

pub async fn orphans(ledger: &AssignmentLedger, json: bool) -> Result<()> {
    let output = ParticipantListOutput {
        title: "Claimed without a recorded draw",
        participants: ledger.find_orphaned_claims().await?,
    };
    print_output(&output, json);
    Ok(())
}
