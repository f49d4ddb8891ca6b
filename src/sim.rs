//! Headless opponents: bot-vs-bot bouts and a scripted pointer for full matches.

use glam::Vec2;
use rand::prelude::*;
use serde::Serialize;

use crate::ai::OpponentModel;
use crate::combat::resolve;
use crate::config::{SkillProfile, TimingConfig};
use crate::events::DuelEvent;
use crate::input::PointerSample;
use crate::types::{Direction, Opening, RoundOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoutSummary {
    pub rounds: u32,
    pub a_wins: u32,
    pub b_wins: u32,
    pub clashes: u32,
    pub timeouts: u32,
}

/// Pits two opponent profiles against each other straight through the
/// resolver, with no timing window. `a` plays the player side.
pub fn simulate_bouts(cfg: &TimingConfig, a: SkillProfile, b: SkillProfile, rounds: u32, seed: u64) -> BoutSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bot_a = OpponentModel::new(seed ^ 0x1234, cfg.profile(a));
    let mut bot_b = OpponentModel::new(seed ^ 0x5678, cfg.profile(b));
    let mut summary = BoutSummary { rounds, ..BoutSummary::default() };

    for _ in 0..rounds {
        let opening = Opening::ALL[rng.gen_range(0..Opening::ALL.len())];
        let a_rt = bot_a.sample_reaction_ms();
        let b_rt = bot_b.sample_reaction_ms();
        let a_dir = bot_a.decide_direction(opening);
        let b_dir = bot_b.decide_direction(opening);

        match resolve(opening, a_dir, b_dir, a_rt, b_rt, cfg.equal_tolerance_ms).outcome {
            RoundOutcome::PlayerWin => summary.a_wins += 1,
            RoundOutcome::AiWin => summary.b_wins += 1,
            RoundOutcome::Clash => summary.clashes += 1,
            _ => summary.timeouts += 1,
        }
    }
    tracing::debug!(?a, ?b, ?summary, "bouts done");
    summary
}

/// Synthetic pointer that swipes like an opponent model would.
///
/// Feed it the engine's events; on each go signal it plans one swipe at the
/// model's sampled reaction time and performs it on the first frame at or
/// after that instant.
#[derive(Debug, Clone)]
pub struct BotPilot {
    model: OpponentModel,
    swipe_px: f32,
    position: Vec2,
    last: Vec2,
    plan: Option<(f64, Direction)>,
}

impl BotPilot {
    pub fn new(model: OpponentModel, swipe_px: f32) -> Self {
        Self { model, swipe_px, position: Vec2::ZERO, last: Vec2::ZERO, plan: None }
    }

    pub fn on_event(&mut self, ev: &DuelEvent) {
        match *ev {
            DuelEvent::GoSignal { opening, go_ts } => {
                let rt_ms = self.model.sample_reaction_ms();
                let dir = self.model.decide_direction(opening);
                self.plan = Some((go_ts + rt_ms as f64 / 1000.0, dir));
            }
            DuelEvent::RoundResolved { .. } => self.plan = None,
            _ => {}
        }
    }

    pub fn sample(&mut self, now: f64) -> PointerSample {
        if let Some((at, dir)) = self.plan {
            if now >= at {
                self.position += dir.unit_vector() * self.swipe_px;
                self.plan = None;
            }
        }
        let motion = self.position - self.last;
        self.last = self.position;
        PointerSample { position: self.position, motion }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpponentProfile;

    #[test]
    fn bouts_are_reproducible_and_add_up() {
        let cfg = TimingConfig::default();
        let a = simulate_bouts(&cfg, SkillProfile::Skilled, SkillProfile::Master, 200, 99);
        let b = simulate_bouts(&cfg, SkillProfile::Skilled, SkillProfile::Master, 200, 99);
        assert_eq!(a, b);
        assert_eq!(a.a_wins + a.b_wins + a.clashes + a.timeouts, 200);
        // 140 ms and flawless against 190 ms: the master takes most rounds.
        assert!(a.b_wins > a.a_wins);
    }

    #[test]
    fn pilot_swipes_once_after_go() {
        let model = OpponentModel::new(1, OpponentProfile { mean_reaction_ms: 100, wrong_probability: 0.0 });
        let mut pilot = BotPilot::new(model, 80.0);
        assert!(!pilot.sample(0.0).is_moving());

        pilot.on_event(&DuelEvent::GoSignal { opening: Opening::LowGuard, go_ts: 1.0 });
        assert!(!pilot.sample(1.01).is_moving());

        let swiped = pilot.sample(1.2);
        assert!(swiped.is_moving());
        assert_eq!(swiped.position, Vec2::new(0.0, 80.0));

        let after = pilot.sample(1.21);
        assert!(!after.is_moving());
        assert_eq!(after.position, Vec2::new(0.0, 80.0));
    }
}
