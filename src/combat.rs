use serde::{Deserialize, Serialize};

use crate::types::{Direction, Opening, RoundOutcome, SwipeEvent};

/// The single direction that answers an opening.
pub fn correct_direction_for(opening: Opening) -> Direction {
    match opening {
        Opening::HighGuard => Direction::Down,
        Opening::LowGuard => Direction::Up,
        Opening::LeftGuard => Direction::Right,
        Opening::RightGuard => Direction::Left,
    }
}

/// Lookup by raw opening tag; unknown tags answer `Direction::None`.
pub fn correct_direction_for_tag(tag: u8) -> Direction {
    Opening::try_from(tag).map(correct_direction_for).unwrap_or(Direction::None)
}

pub fn is_correct(opening: Opening, dir: Direction) -> bool {
    correct_direction_for(opening) == dir
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: RoundOutcome,
    pub is_clash: bool,
}

impl Resolution {
    fn decided(outcome: RoundOutcome) -> Self { Self { outcome, is_clash: false } }
}

/// Resolves a round where both sides produced input.
///
/// A wrong answer loses outright regardless of speed. Two wrong answers
/// count as `Timeout`. Two right answers are compared on reaction time and
/// anything within `tolerance_ms` either way is a clash.
pub fn resolve(
    opening: Opening,
    player_dir: Direction,
    ai_dir: Direction,
    player_reaction_ms: i32,
    ai_reaction_ms: i32,
    tolerance_ms: i32,
) -> Resolution {
    let player_ok = is_correct(opening, player_dir);
    let ai_ok = is_correct(opening, ai_dir);

    match (player_ok, ai_ok) {
        (false, true) => Resolution::decided(RoundOutcome::AiWin),
        (true, false) => Resolution::decided(RoundOutcome::PlayerWin),
        (false, false) => Resolution::decided(RoundOutcome::Timeout),
        (true, true) => {
            let diff = player_reaction_ms.saturating_sub(ai_reaction_ms);
            if diff > tolerance_ms {
                Resolution::decided(RoundOutcome::AiWin)
            } else if diff < tolerance_ms.saturating_neg() {
                Resolution::decided(RoundOutcome::PlayerWin)
            } else {
                Resolution { outcome: RoundOutcome::Clash, is_clash: true }
            }
        }
    }
}

/// Combines whatever each side produced inside the input window.
///
/// Absent input on one side hands the round to the other side outright;
/// with both present the reaction times are taken relative to `go_ts`.
pub fn judge_round(
    opening: Opening,
    player: Option<SwipeEvent>,
    ai: Option<SwipeEvent>,
    go_ts: f64,
    tolerance_ms: i32,
) -> Resolution {
    match (player, ai) {
        (None, None) => Resolution::decided(RoundOutcome::Timeout),
        (None, Some(_)) => Resolution::decided(RoundOutcome::AiWin),
        (Some(_), None) => Resolution::decided(RoundOutcome::PlayerWin),
        (Some(p), Some(a)) => resolve(
            opening,
            p.dir,
            a.dir,
            p.reaction_ms(go_ts),
            a.reaction_ms(go_ts),
            tolerance_ms,
        ),
    }
}
