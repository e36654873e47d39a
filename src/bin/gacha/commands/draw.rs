//! Draw commands.
//!
//! `draw` and `reveal` require the participant's PIN. `candidates` and
//! `simulate` never write.

use anyhow::Result;
use clap::Args;

use gacha_ledger::domain::DrawError;
use gacha_ledger::domain::DrawEvent;
use gacha_ledger::domain::DrawSession;
use gacha_ledger::domain::LedgerResult;
use gacha_ledger::AssignmentLedger;

use crate::output::print_output;
use crate::output::CandidatesOutput;
use crate::output::SessionOutput;
use crate::output::SimulationOutput;

#[derive(Args)]
pub struct AuthArgs {
    /// Participant ID.
    pub id: String,

    /// The participant's 4-digit PIN.
    #[arg(long, env = "GACHA_PIN", hide_env_values = true)]
    pub pin: String,
}

#[derive(Args)]
pub struct CandidatesArgs {
    /// Drawer ID.
    pub id: String,
}

pub async fn candidates(ledger: &AssignmentLedger, args: CandidatesArgs, json: bool) -> Result<()> {
    let candidates = ledger.list_eligible_candidates(&args.id).await?;
    print_output(
        &CandidatesOutput {
            drawer_id: args.id,
            candidates,
        },
        json,
    );
    Ok(())
}

/// Draw once, or show the recorded result to a drawer who already drew
async fn draw_or_reveal(ledger: &AssignmentLedger, id: &str, pin: &str) -> LedgerResult<DrawSession> {
    match ledger.start_draw(id, pin).await {
        Ok(dropped @ DrawSession::Dropped(_)) => Ok(dropped.apply(DrawEvent::Open)?),
        Ok(other) => Ok(other),
        Err(DrawError::AlreadyDrawn { .. }) => ledger.open_session(id, pin).await,
        Err(e) => Err(e),
    }
}

pub async fn draw(ledger: &AssignmentLedger, args: AuthArgs, json: bool) -> Result<()> {
    let session = draw_or_reveal(ledger, &args.id, &args.pin).await?;
    let exhausted = session == DrawSession::Empty;

    print_output(
        &SessionOutput {
            participant_id: args.id,
            session,
        },
        json,
    );
    if exhausted {
        std::process::exit(1);
    }
    Ok(())
}

pub async fn reveal(ledger: &AssignmentLedger, args: AuthArgs, json: bool) -> Result<()> {
    let session = ledger.open_session(&args.id, &args.pin).await?;
    print_output(
        &SessionOutput {
            participant_id: args.id,
            session,
        },
        json,
    );
    Ok(())
}

pub async fn simulate(ledger: &AssignmentLedger, json: bool) -> Result<()> {
    let pick = ledger.simulate_draw().await?;
    print_output(&SimulationOutput(pick), json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gacha_ledger::domain::EventConfig;
    use gacha_ledger::domain::NewParticipant;
    use gacha_ledger::random_source::ThreadRandomSource;
    use gacha_ledger::storage::InMemoryParticipantStore;

    use super::*;

    async fn two_person_ledger() -> (AssignmentLedger, String, String) {
        let store = Arc::new(InMemoryParticipantStore::with_config(EventConfig::new(2, "test").unwrap()));
        let ledger = AssignmentLedger::new(store, Arc::new(ThreadRandomSource));
        let a = ledger
            .register(NewParticipant::new("Alice", "Tea", "4821").unwrap())
            .await
            .unwrap();
        let b = ledger
            .register(NewParticipant::new("Bob", "Socks", "1234").unwrap())
            .await
            .unwrap();
        (ledger, a.id, b.id)
    }

    #[tokio::test]
    async fn test_repeat_draw_reveals_recorded_match() {
        let (ledger, alice, bob) = two_person_ledger().await;

        let first = draw_or_reveal(&ledger, &alice, "4821").await.unwrap();
        assert!(matches!(first, DrawSession::Revealed(ref m) if m.id == bob));

        let again = draw_or_reveal(&ledger, &alice, "4821").await.unwrap();
        assert_eq!(again, first);
    }

    #[tokio::test]
    async fn test_repeat_draw_still_checks_pin() {
        let (ledger, alice, _) = two_person_ledger().await;
        draw_or_reveal(&ledger, &alice, "4821").await.unwrap();

        assert!(matches!(
            draw_or_reveal(&ledger, &alice, "0000").await,
            Err(DrawError::AuthFailure { .. })
        ));
    }
}
