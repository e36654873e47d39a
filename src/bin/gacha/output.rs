//! Output formatting for CLI responses.
//!
//! Supports both human-readable and JSON output formats. Participant
//! outputs are built field by field so a PIN never reaches the terminal.

use gacha_ledger::domain::{DrawGate, DrawSession, EventConfig, Participant, ParticipantSummary, PoolStats};

/// Trait for types that can be output in multiple formats.
pub trait Outputable {
    /// Convert to JSON value for structured output.
    fn to_json(&self) -> serde_json::Value;

    /// Convert to human-readable string.
    fn to_human(&self) -> String;
}

/// Print a value in the appropriate format.
pub fn print_output<T: Outputable>(value: &T, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&value.to_json())
                .unwrap_or_else(|e| { format!("{{\"error\": \"failed to serialize: {}\"}}", e) })
        );
    } else {
        println!("{}", value.to_human());
    }
}

/// Print a success message.
pub fn print_success(message: &str, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "success",
                "message": message
            })
        );
    } else {
        println!("{}", message);
    }
}

fn participant_json(p: &Participant) -> serde_json::Value {
    serde_json::json!({
        "id": p.id,
        "name": p.name,
        "wishlist": p.wishlist,
        "isClaimed": p.is_claimed,
        "drawnMatchId": p.drawn_match_id
    })
}

fn summary_json(s: &ParticipantSummary) -> serde_json::Value {
    serde_json::json!({
        "id": s.id,
        "name": s.name,
        "wishlist": s.wishlist
    })
}

/// Single participant record.
pub struct ParticipantOutput(pub Participant);

impl Outputable for ParticipantOutput {
    fn to_json(&self) -> serde_json::Value {
        participant_json(&self.0)
    }

    fn to_human(&self) -> String {
        let p = &self.0;
        format!(
            "Participant\n\
             ===========\n\
             ID:         {}\n\
             Name:       {}\n\
             Wishlist:   {}\n\
             Claimed:    {}\n\
             Has drawn:  {}",
            p.id,
            p.name,
            p.wishlist,
            if p.is_claimed { "yes" } else { "no" },
            if p.has_drawn() { "yes" } else { "no" }
        )
    }
}

/// Participant table.
pub struct ParticipantListOutput {
    pub title: &'static str,
    pub participants: Vec<Participant>,
}

impl Outputable for ParticipantListOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "count": self.participants.len(),
            "participants": self.participants.iter().map(participant_json).collect::<Vec<_>>()
        })
    }

    fn to_human(&self) -> String {
        if self.participants.is_empty() {
            return format!("{}: none", self.title);
        }

        let mut output = format!("{} ({})\n", self.title, self.participants.len());
        output.push_str("ID                                   | Claimed | Drawn | Name\n");
        output.push_str("-------------------------------------+---------+-------+---------------------\n");
        for p in &self.participants {
            output.push_str(&format!(
                "{:36} | {:7} | {:5} | {}\n",
                p.id,
                if p.is_claimed { "yes" } else { "no" },
                if p.has_drawn() { "yes" } else { "no" },
                p.name
            ));
        }
        output.trim_end().to_string()
    }
}

/// Candidate list for one drawer.
pub struct CandidatesOutput {
    pub drawer_id: String,
    pub candidates: Vec<Participant>,
}

impl Outputable for CandidatesOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "drawer_id": self.drawer_id,
            "count": self.candidates.len(),
            "candidates": self
                .candidates
                .iter()
                .map(|p| summary_json(&p.summary()))
                .collect::<Vec<_>>()
        })
    }

    fn to_human(&self) -> String {
        if self.candidates.is_empty() {
            return format!("No eligible recipients left for {}", self.drawer_id);
        }
        let mut output = format!("Eligible recipients for {} ({})\n", self.drawer_id, self.candidates.len());
        for p in &self.candidates {
            output.push_str(&format!("  {} ({})\n", p.name, p.id));
        }
        output.trim_end().to_string()
    }
}

/// Outcome of an authenticated draw or reveal.
pub struct SessionOutput {
    pub participant_id: String,
    pub session: DrawSession,
}

impl Outputable for SessionOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "participant_id": self.participant_id,
            "state": self.session.name(),
            "match": self.session.result().map(summary_json)
        })
    }

    fn to_human(&self) -> String {
        match self.session.result() {
            Some(m) => format!(
                "Your recipient: {}\n\
                 Wishlist:       {}",
                m.name, m.wishlist
            ),
            None if self.session == DrawSession::Empty => "No matches left in the machine.".to_string(),
            None => "No draw recorded yet. Run `gacha draw` to pull a capsule.".to_string(),
        }
    }
}

/// Simulated pick.
pub struct SimulationOutput(pub ParticipantSummary);

impl Outputable for SimulationOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "simulated": true,
            "match": summary_json(&self.0)
        })
    }

    fn to_human(&self) -> String {
        format!(
            "Simulated draw (nothing saved)\n\
             Recipient: {}\n\
             Wishlist:  {}",
            self.0.name, self.0.wishlist
        )
    }
}

/// Pool statistics with the draw gate.
pub struct StatsOutput {
    pub stats: PoolStats,
    pub gate: DrawGate,
}

impl Outputable for StatsOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total": self.stats.total,
            "claimed": self.stats.claimed,
            "remaining": self.stats.remaining,
            "drawn": self.stats.drawn,
            "target": self.gate.target,
            "unlocked": self.gate.unlocked
        })
    }

    fn to_human(&self) -> String {
        let gate = if self.gate.unlocked {
            "unlocked".to_string()
        } else {
            format!("locked ({} more needed)", self.gate.missing())
        };
        format!(
            "Pool Statistics\n\
             ===============\n\
             Joined:     {} / {}\n\
             Claimed:    {}\n\
             Remaining:  {}\n\
             Drawn:      {}\n\
             Draw:       {}",
            self.stats.total, self.gate.target, self.stats.claimed, self.stats.remaining, self.stats.drawn, gate
        )
    }
}

/// Event settings.
pub struct EventOutput(pub EventConfig);

impl Outputable for EventOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "targetCount": self.0.target_count,
            "eventSummary": self.0.event_summary
        })
    }

    fn to_human(&self) -> String {
        format!(
            "Event Settings\n\
             ==============\n\
             Target count: {}\n\
             Summary:      {}",
            self.0.target_count, self.0.event_summary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gacha_ledger::domain::NewParticipant;

    fn sample() -> Participant {
        NewParticipant::new("Frosty Snowman", "Magic Hat", "4821")
            .unwrap()
            .into_participant("p-1".to_string())
    }

    #[test]
    fn test_participant_output_never_contains_pin() {
        let output = ParticipantListOutput {
            title: "Participants",
            participants: vec![sample()],
        };
        assert!(!output.to_json().to_string().contains("4821"));
        assert!(!output.to_human().contains("4821"));
        assert!(!ParticipantOutput(sample()).to_json().to_string().contains("4821"));
    }

    #[test]
    fn test_session_output_states() {
        let revealed = SessionOutput {
            participant_id: "p-2".to_string(),
            session: DrawSession::Revealed(sample().summary()),
        };
        assert!(revealed.to_human().contains("Frosty Snowman"));
        assert_eq!(revealed.to_json()["state"], "revealed");

        let empty = SessionOutput {
            participant_id: "p-2".to_string(),
            session: DrawSession::Empty,
        };
        assert!(empty.to_human().contains("No matches left"));
        assert!(empty.to_json()["match"].is_null());
    }
}
