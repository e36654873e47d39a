//! Assignment Ledger - Draw Rules over a Participant Store
//!
//! Owns the rules for who may draw, whom they may draw, how a draw is
//! committed exactly once, and how a drawer re-views a prior result:
//!
//! - `list_eligible_candidates`: unclaimed participants other than the drawer
//! - `commit_draw`: pick one candidate uniformly, claim it, record the match
//! - `get_prior_result`: read-only replay of a recorded match
//! - `authenticate`: PIN check gating access to the two above
//!
//! Commits are serialized inside one ledger by a mutex, and every claim is a
//! conditional store write ("claim only if still unclaimed"). A lost claim
//! race drops that candidate and re-selects from the rest. How far the
//! conditional write protects against *other processes* depends on the
//! store; see each adapter.
//!
//! The two commit writes (claim recipient, then record match on the drawer)
//! are not rolled back as a unit. If the second fails, the recipient stays
//! claimed with no drawer pointing at it; [`AssignmentLedger::find_orphaned_claims`]
//! lists such records for manual repair.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::DrawConfig;
use crate::constants::DEFAULT_MAX_CLAIM_ATTEMPTS;
use crate::domain::{
    DrawError, DrawEvent, DrawGate, DrawSession, EventConfig, LedgerResult, NewParticipant, Participant,
    ParticipantPatch, ParticipantSummary, PoolStats,
};
use crate::persistent_store::ParticipantStore;
use crate::random_source::{self, RandomSource, SeededRandomSource, ThreadRandomSource};

/// Stand-in pool for simulated draws when nobody has joined yet
const DEMO_PARTICIPANTS: [(&str, &str, &str); 3] = [
    ("sim-1", "Rudolph Rednose", "Nose Polish"),
    ("sim-2", "Frosty Snowman", "Magic Hat"),
    ("sim-3", "Buddy The Elf", "Maple Syrup"),
];

/// Participants `drawer_id` may draw: unclaimed and not the drawer
pub fn eligible_candidates(pool: &[Participant], drawer_id: &str) -> Vec<Participant> {
    pool.iter().filter(|p| p.is_candidate_for(drawer_id)).cloned().collect()
}

fn find<'a>(pool: &'a [Participant], id: &str) -> LedgerResult<&'a Participant> {
    pool.iter()
        .find(|p| p.id == id)
        .ok_or_else(|| DrawError::NotFound { id: id.to_string() })
}

/// Draw rules bound to a store and a randomness source
pub struct AssignmentLedger {
    store: Arc<dyn ParticipantStore>,
    random: Arc<dyn RandomSource>,
    max_claim_attempts: u32,
    /// Serializes read-candidates → pick → claim within this ledger
    commit_lock: Mutex<()>,
}

impl std::fmt::Debug for AssignmentLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentLedger")
            .field("store", &"<dyn ParticipantStore>")
            .field("random", &"<dyn RandomSource>")
            .field("max_claim_attempts", &self.max_claim_attempts)
            .finish()
    }
}

impl AssignmentLedger {
    pub fn new(store: Arc<dyn ParticipantStore>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            store,
            random,
            max_claim_attempts: DEFAULT_MAX_CLAIM_ATTEMPTS,
            commit_lock: Mutex::new(()),
        }
    }

    /// Build from draw configuration: seeded RNG when a seed is set
    pub fn from_config(store: Arc<dyn ParticipantStore>, config: &DrawConfig) -> Self {
        let random: Arc<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Arc::new(SeededRandomSource::new(seed)),
            None => Arc::new(ThreadRandomSource),
        };
        Self::new(store, random).with_max_claim_attempts(config.max_claim_attempts)
    }

    /// Cap conditional claim attempts per commit (at least one)
    pub fn with_max_claim_attempts(mut self, attempts: u32) -> Self {
        self.max_claim_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn ParticipantStore> {
        &self.store
    }

    async fn load_pool(&self) -> LedgerResult<Vec<Participant>> {
        Ok(self.store.fetch_all_participants().await?)
    }

    // =========================================================================
    // Draw protocol
    // =========================================================================

    /// All unclaimed participants other than `drawer_id`. No side effects.
    pub async fn list_eligible_candidates(&self, drawer_id: &str) -> LedgerResult<Vec<Participant>> {
        let pool = self.load_pool().await?;
        Ok(eligible_candidates(&pool, drawer_id))
    }

    /// Draw a recipient for `drawer_id` and persist the outcome.
    ///
    /// Rejects a drawer who already has a recorded match, and a pool that has
    /// not reached the event's target count. Returns
    /// [`DrawError::Exhausted`] without writing anything when no candidate
    /// is left.
    pub async fn commit_draw(&self, drawer_id: &str) -> LedgerResult<Participant> {
        let _guard = self.commit_lock.lock().await;

        let pool = self.load_pool().await?;
        let drawer = find(&pool, drawer_id)?;
        if let Some(match_id) = &drawer.drawn_match_id {
            debug!(drawer_id, match_id = %match_id, "Rejecting second draw");
            return Err(DrawError::AlreadyDrawn {
                drawer_id: drawer_id.to_string(),
                match_id: match_id.clone(),
            });
        }

        let gate = self.store.fetch_event_config().await?.gate(pool.len());
        if !gate.unlocked {
            return Err(DrawError::Locked {
                joined: gate.joined,
                target: gate.target,
            });
        }

        let mut candidates = eligible_candidates(&pool, drawer_id);
        if candidates.is_empty() {
            info!(drawer_id, pool = pool.len(), "No eligible recipients left");
            return Err(DrawError::Exhausted {
                drawer_id: drawer_id.to_string(),
            });
        }

        let chosen = self.claim_one(drawer_id, &mut candidates).await?;

        if let Err(e) = self
            .store
            .update_participant(drawer_id, ParticipantPatch::drawn_match(chosen.id.clone()))
            .await
        {
            error!(
                drawer_id,
                match_id = %chosen.id,
                error = %e,
                "Recipient claimed but draw not recorded; claim left in place"
            );
            return Err(e.into());
        }

        info!(drawer_id, match_id = %chosen.id, "Draw committed");
        Ok(Participant {
            is_claimed: true,
            ..chosen
        })
    }

    /// Pick and conditionally claim until one claim lands.
    ///
    /// Each lost race removes that candidate from the local set.
    async fn claim_one(&self, drawer_id: &str, candidates: &mut Vec<Participant>) -> LedgerResult<Participant> {
        for attempt in 1..=self.max_claim_attempts {
            let Some(index) = random_source::pick_index(self.random.as_ref(), candidates.len()) else {
                info!(drawer_id, attempt, "Every candidate was claimed concurrently");
                return Err(DrawError::Exhausted {
                    drawer_id: drawer_id.to_string(),
                });
            };
            let candidate = candidates.swap_remove(index);

            if self.store.claim_participant(&candidate.id).await? == 1 {
                return Ok(candidate);
            }
            debug!(
                drawer_id,
                candidate_id = %candidate.id,
                attempt,
                "Claim race lost - candidate already claimed"
            );
        }

        warn!(
            drawer_id,
            attempts = self.max_claim_attempts,
            "Gave up claiming under contention"
        );
        Err(DrawError::PersistenceFailure(anyhow!(
            "claim contention: {} conditional claims lost for drawer {}",
            self.max_claim_attempts,
            drawer_id
        )))
    }

    /// Replay a recorded match. Never selects and never writes.
    pub async fn get_prior_result(&self, drawer_id: &str) -> LedgerResult<Option<ParticipantSummary>> {
        let pool = self.load_pool().await?;
        let drawer = find(&pool, drawer_id)?;
        match &drawer.drawn_match_id {
            Some(match_id) => Ok(Some(find(&pool, match_id)?.summary())),
            None => Ok(None),
        }
    }

    /// Check `pin` against the stored PIN for `participant_id`
    pub async fn authenticate(&self, participant_id: &str, pin: &str) -> LedgerResult<bool> {
        let pool = self.load_pool().await?;
        Ok(find(&pool, participant_id)?.pin.matches(pin))
    }

    async fn require_pin(&self, participant_id: &str, pin: &str) -> LedgerResult<()> {
        if self.authenticate(participant_id, pin).await? {
            Ok(())
        } else {
            debug!(participant_id, "PIN mismatch");
            Err(DrawError::AuthFailure {
                id: participant_id.to_string(),
            })
        }
    }

    // =========================================================================
    // Authenticated session flows
    // =========================================================================

    /// Authenticate and resume: `Revealed` with the prior match, else `Idle`
    pub async fn open_session(&self, participant_id: &str, pin: &str) -> LedgerResult<DrawSession> {
        self.require_pin(participant_id, pin).await?;
        match self.get_prior_result(participant_id).await? {
            Some(prior) => Ok(DrawSession::Idle.apply(DrawEvent::Resume(prior))?),
            None => Ok(DrawSession::Idle),
        }
    }

    /// Authenticate and run one draw from `Idle`.
    ///
    /// Lands in `Dropped(match)` or `Empty`. Any other failure is returned as
    /// an error and leaves the caller's session in `Idle`.
    pub async fn start_draw(&self, participant_id: &str, pin: &str) -> LedgerResult<DrawSession> {
        self.require_pin(participant_id, pin).await?;
        let drawing = DrawSession::Idle.apply(DrawEvent::Start)?;

        match self.commit_draw(participant_id).await {
            Ok(chosen) => Ok(drawing.apply(DrawEvent::Committed(chosen.summary()))?),
            Err(DrawError::Exhausted { .. }) => Ok(drawing.apply(DrawEvent::Exhausted)?),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Registration and event settings
    // =========================================================================

    pub async fn register(&self, participant: NewParticipant) -> LedgerResult<Participant> {
        let created = self.store.insert_participant(participant).await?;
        info!(participant_id = %created.id, "Participant registered");
        Ok(created)
    }

    pub async fn participants(&self) -> LedgerResult<Vec<Participant>> {
        self.load_pool().await
    }

    pub async fn event_config(&self) -> LedgerResult<EventConfig> {
        Ok(self.store.fetch_event_config().await?)
    }

    pub async fn update_event_config(&self, config: EventConfig) -> LedgerResult<()> {
        config.validate()?;
        self.store.update_event_config(config).await?;
        Ok(())
    }

    /// Current joined count against the event target
    pub async fn draw_gate(&self) -> LedgerResult<DrawGate> {
        let pool = self.load_pool().await?;
        Ok(self.event_config().await?.gate(pool.len()))
    }

    pub async fn stats(&self) -> LedgerResult<PoolStats> {
        Ok(PoolStats::from_participants(&self.load_pool().await?))
    }

    // =========================================================================
    // Administrative operations
    // =========================================================================

    /// Manually set or clear a claim.
    ///
    /// Clearing is refused while a recorded draw points at the participant.
    pub async fn set_claimed(&self, id: &str, claimed: bool) -> LedgerResult<Participant> {
        let _guard = self.commit_lock.lock().await;

        let pool = self.load_pool().await?;
        let target = find(&pool, id)?;

        if !claimed {
            if let Some(drawer) = pool.iter().find(|p| p.drawn_match_id.as_deref() == Some(id)) {
                return Err(DrawError::MatchReferenced {
                    id: id.to_string(),
                    drawer_id: drawer.id.clone(),
                });
            }
        }
        if target.is_claimed == claimed {
            return Ok(target.clone());
        }

        warn!(participant_id = id, claimed, "Administrative claim override");
        Ok(self.store.update_participant(id, ParticipantPatch::claimed(claimed)).await?)
    }

    /// Delete a participant and unwind draws that involve them.
    ///
    /// Drawers whose match was the removed participant get their match
    /// cleared and may draw again. A recipient the removed participant had
    /// drawn is released. The record itself is deleted last, so a failed
    /// follow-up write leaves it in place and the removal can be retried.
    pub async fn remove_participant(&self, id: &str) -> LedgerResult<()> {
        let _guard = self.commit_lock.lock().await;

        let pool = self.load_pool().await?;
        let removed = find(&pool, id)?;

        for drawer in pool.iter().filter(|p| p.drawn_match_id.as_deref() == Some(id)) {
            warn!(drawer_id = %drawer.id, removed_id = id, "Clearing draw of removed participant");
            self.store
                .update_participant(&drawer.id, ParticipantPatch::clear_drawn_match())
                .await?;
        }

        if let Some(match_id) = &removed.drawn_match_id {
            if pool.iter().any(|p| &p.id == match_id && p.is_claimed) {
                warn!(participant_id = %match_id, removed_id = id, "Releasing recipient of removed drawer");
                self.store
                    .update_participant(match_id, ParticipantPatch::claimed(false))
                    .await?;
            }
        }

        self.store.delete_participant(id).await?;
        info!(participant_id = id, "Participant removed");
        Ok(())
    }

    /// Claimed participants that no recorded draw points at
    pub async fn find_orphaned_claims(&self) -> LedgerResult<Vec<Participant>> {
        let pool = self.load_pool().await?;
        Ok(pool
            .iter()
            .filter(|p| p.is_claimed)
            .filter(|p| !pool.iter().any(|d| d.drawn_match_id.as_deref() == Some(p.id.as_str())))
            .cloned()
            .collect())
    }

    /// Drawers whose recorded match no longer exists in the pool
    pub async fn find_dangling_matches(&self) -> LedgerResult<Vec<Participant>> {
        let pool = self.load_pool().await?;
        Ok(pool
            .iter()
            .filter(|d| {
                d.drawn_match_id
                    .as_deref()
                    .is_some_and(|match_id| !pool.iter().any(|p| p.id == match_id))
            })
            .cloned()
            .collect())
    }

    /// Clear a drawer's match when it points at a missing participant.
    ///
    /// Returns `true` when a dangling match was cleared. A match that still
    /// resolves is left alone.
    pub async fn clear_dangling_match(&self, drawer_id: &str) -> LedgerResult<bool> {
        let _guard = self.commit_lock.lock().await;

        let pool = self.load_pool().await?;
        let drawer = find(&pool, drawer_id)?;
        let Some(match_id) = &drawer.drawn_match_id else {
            return Ok(false);
        };
        if pool.iter().any(|p| &p.id == match_id) {
            return Ok(false);
        }

        warn!(drawer_id, match_id = %match_id, "Clearing dangling draw");
        self.store
            .update_participant(drawer_id, ParticipantPatch::clear_drawn_match())
            .await?;
        Ok(true)
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Preview a draw over the whole pool without writing anything.
    ///
    /// Claimed participants are included. An empty pool draws from a fixed
    /// demo roster.
    pub async fn simulate_draw(&self) -> LedgerResult<ParticipantSummary> {
        let mut pool: Vec<ParticipantSummary> =
            self.load_pool().await?.iter().map(Participant::summary).collect();
        if pool.is_empty() {
            pool = DEMO_PARTICIPANTS
                .iter()
                .map(|(id, name, wishlist)| ParticipantSummary {
                    id: id.to_string(),
                    name: name.to_string(),
                    wishlist: wishlist.to_string(),
                })
                .collect();
        }

        let index = random_source::pick_index(self.random.as_ref(), pool.len()).unwrap_or(0);
        Ok(pool.swap_remove(index))
    }
}
