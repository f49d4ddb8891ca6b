use thiserror::Error;

use crate::types::RoundOutcome;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid timing config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Replay failed: {0}")]
    Replay(#[from] ReplayError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    #[error("round {round}: logged {logged:?} but inputs resolve to {replayed:?}")]
    OutcomeMismatch { round: u32, logged: RoundOutcome, replayed: RoundOutcome },

    #[error("round {round}: clash flag {logged} disagrees with outcome")]
    ClashFlagMismatch { round: u32, logged: bool },

    #[error("round {round}: no opening or go timestamp recorded")]
    MissingRoundData { round: u32 },
}

pub type Result<T> = std::result::Result<T, DuelError>;
