use serde::{Deserialize, Serialize};

use crate::types::{Opening, RoundOutcome, Side};

/// Fire-and-forget notifications for presentation and audio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DuelEvent {
    GoSignal { opening: Opening, go_ts: f64 },
    EarlyInput { side: Side },
    RoundResolved { round_index: u32, outcome: RoundOutcome, clash: bool },
    ClashTriggered { opening: Opening },
    RoundTransition { next_round: u32 },
    MatchEnded(MatchResult),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player_wins: u32,
    pub ai_wins: u32,
    pub rounds_played: u32,
}

impl MatchResult {
    /// `None` on a level score when the round budget ran out.
    pub fn winner(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.player_wins.cmp(&self.ai_wins) {
            Greater => Some(Side::Player),
            Less => Some(Side::Ai),
            Equal => None,
        }
    }
}
