//! Integration tests for the draw protocol.
//!
//! These tests drive the public API end to end over the in-memory and JSON
//! file stores:
//! - Three-person draw rounds with every branch of the first pick
//! - A lone participant with nobody to draw
//! - PIN-gated reveal after the draw
//! - Draw state surviving a restart on the JSON file store

use std::sync::Arc;

use gacha_ledger::domain::{DrawError, DrawSession, EventConfig, NewParticipant, Participant};
use gacha_ledger::random_source::{ScriptedRandomSource, ThreadRandomSource};
use gacha_ledger::storage::{InMemoryParticipantStore, JsonFileParticipantStore};
use gacha_ledger::{AssignmentLedger, ParticipantStore};
use tempfile::TempDir;

/// Register `names` (all with PIN 4821) and return them in order.
async fn register_all(ledger: &AssignmentLedger, names: &[&str]) -> Vec<Participant> {
    let mut out = Vec::new();
    for name in names {
        let joined = ledger
            .register(NewParticipant::new(name, &format!("something for {}", name), "4821").unwrap())
            .await
            .unwrap();
        out.push(joined);
    }
    out
}

fn memory_ledger(target: u32) -> AssignmentLedger {
    let store = Arc::new(InMemoryParticipantStore::with_config(EventConfig::new(target, "test party").unwrap()));
    AssignmentLedger::new(store, Arc::new(ThreadRandomSource))
}

// ============================================================================
// Test: Three-Person Pool
// ============================================================================

/// A draws from {B, C}; B's options then depend on what A drew.
#[tokio::test]
async fn test_three_person_pool_follows_first_pick() {
    for _ in 0..20 {
        let ledger = memory_ledger(3);
        let pool = register_all(&ledger, &["Alice", "Bob", "Carol"]).await;
        let (a, b, c) = (&pool[0].id, &pool[1].id, &pool[2].id);

        let a_match = ledger.commit_draw(a).await.unwrap();
        assert!(&a_match.id == b || &a_match.id == c);
        assert!(a_match.is_claimed);

        let mut b_candidates: Vec<String> = ledger
            .list_eligible_candidates(b)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        b_candidates.sort();

        let mut expected = if &a_match.id == c {
            vec![a.clone()]
        } else {
            vec![a.clone(), c.clone()]
        };
        expected.sort();
        assert_eq!(b_candidates, expected);

        let b_match = ledger.commit_draw(b).await.unwrap();
        assert_ne!(&b_match.id, b);
        assert_ne!(b_match.id, a_match.id);

        // C draws whatever is left, or nothing
        match ledger.commit_draw(c).await {
            Ok(c_match) => {
                assert_ne!(&c_match.id, c);
                assert_ne!(c_match.id, a_match.id);
                assert_ne!(c_match.id, b_match.id);
            }
            Err(DrawError::Exhausted { drawer_id }) => assert_eq!(&drawer_id, c),
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
}

/// A repeated commit never changes the recorded match.
#[tokio::test]
async fn test_match_is_fixed_after_first_commit() {
    let ledger = memory_ledger(3);
    let pool = register_all(&ledger, &["Alice", "Bob", "Carol"]).await;
    let drawer = &pool[0].id;

    let first = ledger.commit_draw(drawer).await.unwrap();
    for _ in 0..3 {
        assert!(matches!(ledger.commit_draw(drawer).await, Err(DrawError::AlreadyDrawn { .. })));
        let prior = ledger.get_prior_result(drawer).await.unwrap().unwrap();
        assert_eq!(prior.id, first.id);
    }
}

// ============================================================================
// Test: Exhaustion
// ============================================================================

/// A pool of one has nobody to draw and nothing changes.
#[tokio::test]
async fn test_lone_participant_is_exhausted() {
    let ledger = memory_ledger(1);
    let pool = register_all(&ledger, &["Dave"]).await;
    let d = &pool[0].id;

    assert!(ledger.list_eligible_candidates(d).await.unwrap().is_empty());
    assert!(matches!(ledger.commit_draw(d).await, Err(DrawError::Exhausted { .. })));
    assert_eq!(ledger.participants().await.unwrap(), pool);
    assert_eq!(ledger.start_draw(d, "4821").await.unwrap(), DrawSession::Empty);
}

// ============================================================================
// Test: PIN Gate
// ============================================================================

#[tokio::test]
async fn test_pin_gates_draw_and_reveal() {
    let ledger = memory_ledger(2);
    let pool = register_all(&ledger, &["Erin", "Frank"]).await;
    let erin = &pool[0].id;

    assert!(ledger.authenticate(erin, "4821").await.unwrap());
    assert!(!ledger.authenticate(erin, "0000").await.unwrap());

    assert!(matches!(ledger.start_draw(erin, "0000").await, Err(DrawError::AuthFailure { .. })));
    assert_eq!(ledger.stats().await.unwrap().claimed, 0);

    let dropped = ledger.start_draw(erin, "4821").await.unwrap();
    let recipient = dropped.result().cloned().unwrap();
    assert_eq!(recipient.id, pool[1].id);

    assert!(matches!(ledger.open_session(erin, "1111").await, Err(DrawError::AuthFailure { .. })));
    assert_eq!(ledger.open_session(erin, "4821").await.unwrap(), DrawSession::Revealed(recipient));
}

/// The draw stays locked until enough participants have joined.
#[tokio::test]
async fn test_draw_gate_opens_at_target() {
    let ledger = memory_ledger(3);
    let pool = register_all(&ledger, &["Gina", "Hal"]).await;

    let gate = ledger.draw_gate().await.unwrap();
    assert!(!gate.unlocked);
    assert_eq!(gate.missing(), 1);
    assert!(matches!(ledger.commit_draw(&pool[0].id).await, Err(DrawError::Locked { .. })));

    register_all(&ledger, &["Ivy"]).await;
    assert!(ledger.draw_gate().await.unwrap().unlocked);
    ledger.commit_draw(&pool[0].id).await.unwrap();
}

// ============================================================================
// Test: JSON File Persistence
// ============================================================================

/// Draw results survive reopening the state file with a fresh ledger.
#[tokio::test]
async fn test_json_file_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gacha-state.json");
    let config = EventConfig::new(2, "file party").unwrap();

    let first = AssignmentLedger::new(
        Arc::new(JsonFileParticipantStore::new(&path).with_default_config(config.clone())),
        Arc::new(ScriptedRandomSource::new([0])),
    );
    let pool = register_all(&first, &["Jo", "Kim"]).await;
    let drawn = first.commit_draw(&pool[0].id).await.unwrap();
    drop(first);

    let store = Arc::new(JsonFileParticipantStore::new(&path).with_default_config(config));
    let reopened = AssignmentLedger::new(store.clone(), Arc::new(ThreadRandomSource));

    let prior = reopened.get_prior_result(&pool[0].id).await.unwrap().unwrap();
    assert_eq!(prior.id, drawn.id);
    assert!(matches!(reopened.commit_draw(&pool[0].id).await, Err(DrawError::AlreadyDrawn { .. })));

    // Kim was claimed by Jo's draw; Jo is the only one Kim can draw
    assert_eq!(drawn.id, pool[1].id);
    assert_eq!(reopened.commit_draw(&pool[1].id).await.unwrap().id, pool[0].id);

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(raw.contains("\"drawnMatchId\""));
    assert_eq!(store.fetch_all_participants().await.unwrap().len(), 2);
}
