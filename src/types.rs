use core::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Quantized swipe direction. `None` means "not committed yet" and is never a valid answer.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four real answers, in enumeration order.
    pub const CARDINAL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn is_none(self) -> bool { self == Direction::None }

    /// Unit vector in pointer space (y up).
    pub fn unit_vector(self) -> Vec2 {
        match self {
            Direction::None => Vec2::ZERO,
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Guard stance shown to both sides.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Opening { HighGuard, LowGuard, LeftGuard, RightGuard }

impl Opening {
    pub const ALL: [Opening; 4] = [Opening::HighGuard, Opening::LowGuard, Opening::LeftGuard, Opening::RightGuard];
}

impl TryFrom<u8> for Opening {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Opening::ALL.get(tag as usize).copied().ok_or(tag)
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side { Player, Ai }

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    PlayerWin,
    AiWin,
    Clash,
    EarlyPlayerLoss,
    EarlyAiLoss,
    Timeout,
}

impl RoundOutcome {
    /// Side whose round counter this outcome increments, if any.
    pub fn point_to(self) -> Option<Side> {
        match self {
            RoundOutcome::PlayerWin | RoundOutcome::EarlyAiLoss => Some(Side::Player),
            RoundOutcome::AiWin | RoundOutcome::EarlyPlayerLoss => Some(Side::Ai),
            RoundOutcome::Clash | RoundOutcome::Timeout => None,
        }
    }

    pub fn is_early(self) -> bool {
        matches!(self, RoundOutcome::EarlyPlayerLoss | RoundOutcome::EarlyAiLoss)
    }
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DuelPhase {
    #[default]
    Reset,
    Standoff,
    RandomDelay,
    GoSignal,
    InputWindow,
    Resolution,
    ResultFlash,
    NextRound,
    MatchEnd,
}

/// A committed input: direction plus absolute timestamp in seconds.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SwipeEvent { pub dir: Direction, pub ts: f64 }

impl SwipeEvent {
    /// Go-relative reaction time in whole milliseconds, truncated toward zero.
    pub fn reaction_ms(&self, go_ts: f64) -> i32 { ((self.ts - go_ts) * 1000.0) as i32 }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::None => "NONE",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Opening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Opening::HighGuard => "HIGH GUARD",
            Opening::LowGuard => "LOW GUARD",
            Opening::LeftGuard => "LEFT GUARD",
            Opening::RightGuard => "RIGHT GUARD",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoundOutcome::PlayerWin => "PLAYER WIN",
            RoundOutcome::AiWin => "AI WIN",
            RoundOutcome::Clash => "CLASH",
            RoundOutcome::EarlyPlayerLoss => "PLAYER FALSE START",
            RoundOutcome::EarlyAiLoss => "AI FALSE START",
            RoundOutcome::Timeout => "TIMEOUT",
        };
        write!(f, "{}", s)
    }
}

pub fn ms_to_secs(ms: u64) -> f64 { ms as f64 / 1000.0 }
