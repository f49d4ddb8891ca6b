use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DuelError, Result};

/// Mean reaction time and mistake rate of one opponent skill level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentProfile {
    pub mean_reaction_ms: i32,
    pub wrong_probability: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SkillProfile {
    Novice,
    #[default]
    Skilled,
    Master,
}

/// Timing of a duel. Read once per match, never mutated by the engine.
///
/// Values are not checked by the engine: zero or inverted durations give
/// degenerate but well-defined rounds. Call [`TimingConfig::validate`] at
/// load time if that matters to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub clash_delay_min_ms: u64,
    pub clash_delay_max_ms: u64,
    pub input_window_ms: u64,
    pub clash_input_window_ms: u64,
    pub result_flash_ms: u64,
    pub next_round_ms: u64,
    /// 6-8 mm feels right on phones.
    pub min_swipe_distance_mm: f32,
    pub direction_lock_ms: u64,
    pub equal_tolerance_ms: i32,

    pub novice: OpponentProfile,
    pub skilled: OpponentProfile,
    pub master: OpponentProfile,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            delay_min_ms: 600,
            delay_max_ms: 1400,
            clash_delay_min_ms: 300,
            clash_delay_max_ms: 600,
            input_window_ms: 120,
            clash_input_window_ms: 80,
            result_flash_ms: 300,
            next_round_ms: 500,
            min_swipe_distance_mm: 7.0,
            direction_lock_ms: 20,
            equal_tolerance_ms: 5,
            novice: OpponentProfile { mean_reaction_ms: 280, wrong_probability: 0.15 },
            skilled: OpponentProfile { mean_reaction_ms: 190, wrong_probability: 0.05 },
            master: OpponentProfile { mean_reaction_ms: 140, wrong_probability: 0.0 },
        }
    }
}

impl TimingConfig {
    pub fn profile(&self, skill: SkillProfile) -> OpponentProfile {
        match skill {
            SkillProfile::Novice => self.novice,
            SkillProfile::Skilled => self.skilled,
            SkillProfile::Master => self.master,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let cfg = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded timing config");
        Ok(cfg)
    }

    /// Rejects values that would make every round degenerate.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(DuelError::InvalidConfig(msg.to_string()));
        if self.delay_max_ms < self.delay_min_ms {
            return bad("delay_max_ms is below delay_min_ms");
        }
        if self.clash_delay_max_ms < self.clash_delay_min_ms {
            return bad("clash_delay_max_ms is below clash_delay_min_ms");
        }
        if self.input_window_ms == 0 || self.clash_input_window_ms == 0 {
            return bad("input windows must be non-zero");
        }
        if self.min_swipe_distance_mm.is_nan() || self.min_swipe_distance_mm <= 0.0 {
            return bad("min_swipe_distance_mm must be positive");
        }
        if self.equal_tolerance_ms < 0 {
            return bad("equal_tolerance_ms must not be negative");
        }
        for (name, p) in [("novice", self.novice), ("skilled", self.skilled), ("master", self.master)] {
            if p.mean_reaction_ms < 0 {
                return Err(DuelError::InvalidConfig(format!("{name}: mean_reaction_ms is negative")));
            }
            if !(0.0..=1.0).contains(&p.wrong_probability) {
                return Err(DuelError::InvalidConfig(format!("{name}: wrong_probability outside [0, 1]")));
            }
        }
        Ok(())
    }
}

/// Per-match settings that are not timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub best_of: u32,
    pub metrics: DeviceMetrics,
}

impl Default for MatchConfig {
    fn default() -> Self { Self { best_of: 3, metrics: DeviceMetrics::default() } }
}

impl MatchConfig {
    pub fn wins_needed(&self) -> u32 { self.best_of / 2 + 1 }
}

// Device metrics used to convert mm to px
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub ppi: f32, // 160 when the platform does not report one
}

impl Default for DeviceMetrics {
    fn default() -> Self {
        Self { ppi: 160.0 }
    }
}

impl DeviceMetrics {
    pub fn mm_to_px(&self, mm: f32) -> f32 {
        let ppi = if self.ppi > 0.0 { self.ppi } else { 160.0 };
        // 1 inch = 25.4 mm
        (mm * ppi) / 25.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = TimingConfig::from_toml_str(
            r#"
            input_window_ms = 200
            [master]
            mean_reaction_ms = 120
            wrong_probability = 0.01
            "#,
        )
        .unwrap();
        assert_eq!(cfg.input_window_ms, 200);
        assert_eq!(cfg.delay_min_ms, 600);
        assert_eq!(cfg.profile(SkillProfile::Master).mean_reaction_ms, 120);
        assert_eq!(cfg.profile(SkillProfile::Novice), TimingConfig::default().novice);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "equal_tolerance_ms = 8").unwrap();
        let cfg = TimingConfig::load(file.path()).unwrap();
        assert_eq!(cfg.equal_tolerance_ms, 8);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            TimingConfig::from_toml_str("input_window_ms = \"soon\""),
            Err(DuelError::ConfigParse(_))
        ));
    }

    #[test]
    fn validate_flags_degenerate_values() {
        assert!(TimingConfig::default().validate().is_ok());

        let cfg = TimingConfig { input_window_ms: 0, ..TimingConfig::default() };
        assert!(cfg.validate().is_err());

        let mut cfg = TimingConfig::default();
        cfg.novice.wrong_probability = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn majority_threshold() {
        assert_eq!(MatchConfig { best_of: 3, ..MatchConfig::default() }.wins_needed(), 2);
        assert_eq!(MatchConfig { best_of: 5, ..MatchConfig::default() }.wins_needed(), 3);
        assert_eq!(MatchConfig { best_of: 4, ..MatchConfig::default() }.wins_needed(), 3);
    }

    #[test]
    fn mm_to_px_at_default_density() {
        let px = DeviceMetrics::default().mm_to_px(25.4);
        assert!((px - 160.0).abs() < 1e-4);
    }
}
