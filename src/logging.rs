use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::judge_round;
use crate::error::{ReplayError, Result};
use crate::types::*;

/// Everything needed to re-judge one round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundLog {
    pub round_index: u32,
    /// Absent when a false start ended the round before an opening was drawn.
    pub opening: Option<Opening>,
    pub go_ts: Option<f64>,
    pub player: Option<SwipeEvent>,
    pub ai: Option<SwipeEvent>,
    pub outcome: RoundOutcome,
    pub clash: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchLog {
    pub seed: u64,
    pub rounds: Vec<RoundLog>,
}

impl MatchLog {
    pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }
    pub fn from_json(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }
}

/// Logging collaborator: one record per round, one flush per match.
pub trait RoundSink {
    fn append(&mut self, log: RoundLog);
    fn flush(&mut self) -> Result<()>;
}

/// Keeps the match log in memory; optionally writes JSON on flush.
#[derive(Debug, Default)]
pub struct DuelLogger {
    log: MatchLog,
    out: Option<std::path::PathBuf>,
    flushed: bool,
}

impl DuelLogger {
    pub fn new(seed: u64) -> Self {
        Self { log: MatchLog { seed, rounds: Vec::with_capacity(8) }, out: None, flushed: false }
    }

    pub fn with_output(seed: u64, path: impl AsRef<Path>) -> Self {
        Self { out: Some(path.as_ref().to_path_buf()), ..Self::new(seed) }
    }

    pub fn match_log(&self) -> &MatchLog { &self.log }

    pub fn rounds(&self) -> &[RoundLog] { &self.log.rounds }

    pub fn last_round(&self) -> Option<&RoundLog> { self.log.rounds.last() }

    pub fn is_flushed(&self) -> bool { self.flushed }

    pub fn clear(&mut self) {
        self.log.rounds.clear();
        self.flushed = false;
    }
}

impl RoundSink for DuelLogger {
    fn append(&mut self, log: RoundLog) {
        self.log.rounds.push(log);
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(path) = &self.out {
            let mut file = fs::File::create(path)?;
            file.write_all(self.log.to_json()?.as_bytes())?;
            tracing::info!(path = %path.display(), rounds = self.log.rounds.len(), "duel log written");
        }
        self.flushed = true;
        Ok(())
    }
}

pub fn load_log(path: impl AsRef<Path>) -> Result<MatchLog> {
    let content = fs::read_to_string(path)?;
    MatchLog::from_json(&content)
}

/// Re-judges a logged round from its recorded inputs.
///
/// False starts are decided before the go signal and carry nothing to
/// re-judge, so they pass as logged.
pub fn verify_round(log: &RoundLog, tolerance_ms: i32) -> std::result::Result<(), ReplayError> {
    if log.outcome.is_early() {
        return Ok(());
    }
    let round = log.round_index;
    if log.clash != (log.outcome == RoundOutcome::Clash) {
        return Err(ReplayError::ClashFlagMismatch { round, logged: log.clash });
    }
    let (Some(opening), Some(go_ts)) = (log.opening, log.go_ts) else {
        return Err(ReplayError::MissingRoundData { round });
    };
    let replayed = judge_round(opening, log.player, log.ai, go_ts, tolerance_ms).outcome;
    if replayed != log.outcome {
        return Err(ReplayError::OutcomeMismatch { round, logged: log.outcome, replayed });
    }
    Ok(())
}

pub fn verify_match(log: &MatchLog, tolerance_ms: i32) -> std::result::Result<(), ReplayError> {
    log.rounds.iter().try_for_each(|r| verify_round(r, tolerance_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clash_round() -> RoundLog {
        RoundLog {
            round_index: 1,
            opening: Some(Opening::RightGuard),
            go_ts: Some(1.0),
            player: Some(SwipeEvent { dir: Direction::Left, ts: 1.1005 }),
            ai: Some(SwipeEvent { dir: Direction::Left, ts: 1.1035 }),
            outcome: RoundOutcome::Clash,
            clash: true,
        }
    }

    #[test]
    fn json_keeps_every_field() {
        let log = MatchLog { seed: 42, rounds: vec![clash_round()] };
        let back = MatchLog::from_json(&log.to_json().unwrap()).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn verify_accepts_consistent_rounds() {
        assert!(verify_round(&clash_round(), 5).is_ok());

        let early = RoundLog {
            round_index: 2,
            opening: None,
            go_ts: None,
            player: Some(SwipeEvent { dir: Direction::Right, ts: 0.4 }),
            ai: None,
            outcome: RoundOutcome::EarlyPlayerLoss,
            clash: false,
        };
        assert!(verify_round(&early, 5).is_ok());
    }

    #[test]
    fn verify_catches_tampered_outcome() {
        let mut log = clash_round();
        log.outcome = RoundOutcome::PlayerWin;
        log.clash = false;
        assert_eq!(
            verify_round(&log, 5),
            Err(ReplayError::OutcomeMismatch { round: 1, logged: RoundOutcome::PlayerWin, replayed: RoundOutcome::Clash })
        );

        let mut log = clash_round();
        log.clash = false;
        assert!(matches!(verify_round(&log, 5), Err(ReplayError::ClashFlagMismatch { .. })));
    }

    #[test]
    fn verify_needs_opening_for_judged_rounds() {
        let mut log = clash_round();
        log.opening = None;
        assert_eq!(verify_round(&log, 5), Err(ReplayError::MissingRoundData { round: 1 }));
    }

    #[test]
    fn flush_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duel.json");
        let mut logger = DuelLogger::with_output(9, &path);
        logger.append(clash_round());
        logger.flush().unwrap();
        assert!(logger.is_flushed());
        let loaded = load_log(&path).unwrap();
        assert_eq!(loaded.seed, 9);
        assert_eq!(loaded.rounds.len(), 1);
        assert!(verify_match(&loaded, 5).is_ok());
    }
}
