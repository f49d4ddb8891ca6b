use rand::prelude::*;

use crate::combat::correct_direction_for;
use crate::config::OpponentProfile;
use crate::types::{Direction, Opening};

/// Half-width of the triangular reaction-time noise.
pub const REACTION_JITTER_MS: f64 = 40.0;

/// Computer opponent. Owns its generator, so a fixed seed and a fixed call
/// order (reaction time, then direction) reproduce the same duel.
#[derive(Debug, Clone)]
pub struct OpponentModel {
    rng: StdRng,
    profile: OpponentProfile,
}

impl OpponentModel {
    pub fn new(seed: u64, profile: OpponentProfile) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), profile }
    }

    pub fn profile(&self) -> OpponentProfile { self.profile }

    pub fn sample_reaction_ms(&mut self) -> i32 {
        // Triangle on [-1, 1)
        let tri = self.rng.gen::<f64>() - self.rng.gen::<f64>();
        let jitter = (tri * REACTION_JITTER_MS) as i32;
        self.profile.mean_reaction_ms.saturating_add(jitter).max(0)
    }

    pub fn decide_direction(&mut self, opening: Opening) -> Direction {
        let correct = correct_direction_for(opening);
        let roll: f64 = self.rng.gen();
        if roll >= self.profile.wrong_probability {
            return correct;
        }
        let idx = self.rng.gen_range(0..3);
        Direction::CARDINAL
            .into_iter()
            .filter(|d| *d != correct)
            .nth(idx)
            .unwrap_or(Direction::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILLED: OpponentProfile = OpponentProfile { mean_reaction_ms: 190, wrong_probability: 0.05 };

    #[test]
    fn same_seed_same_duel() {
        let run = |seed| {
            let mut ai = OpponentModel::new(seed, SKILLED);
            (0..64)
                .map(|i| {
                    let rt = ai.sample_reaction_ms();
                    (rt, ai.decide_direction(Opening::ALL[i % 4]))
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(0xA11CE), run(0xA11CE));
        assert_ne!(run(0xA11CE), run(0xC0FFEE));
    }

    #[test]
    fn reaction_time_stays_in_jitter_band() {
        let mut ai = OpponentModel::new(7, SKILLED);
        for _ in 0..1000 {
            let rt = ai.sample_reaction_ms();
            assert!((150..=230).contains(&rt), "rt {rt}");
        }
    }

    #[test]
    fn reaction_time_is_clamped_at_zero() {
        let mut ai = OpponentModel::new(3, OpponentProfile { mean_reaction_ms: 5, wrong_probability: 0.0 });
        for _ in 0..1000 {
            assert!(ai.sample_reaction_ms() >= 0);
        }
    }

    #[test]
    fn huge_mean_saturates() {
        let mut ai = OpponentModel::new(3, OpponentProfile { mean_reaction_ms: i32::MAX, wrong_probability: 0.0 });
        for _ in 0..1000 {
            assert!(ai.sample_reaction_ms() > i32::MAX - 40);
        }
    }

    #[test]
    fn flawless_profile_never_misses() {
        let mut ai = OpponentModel::new(11, OpponentProfile { mean_reaction_ms: 140, wrong_probability: 0.0 });
        for o in Opening::ALL.iter().cycle().take(200) {
            assert_eq!(ai.decide_direction(*o), correct_direction_for(*o));
        }
    }

    #[test]
    fn hopeless_profile_always_misses_with_every_wrong_direction() {
        let mut ai = OpponentModel::new(11, OpponentProfile { mean_reaction_ms: 140, wrong_probability: 1.0 });
        let mut seen = Vec::new();
        for _ in 0..300 {
            let d = ai.decide_direction(Opening::HighGuard);
            assert_ne!(d, Direction::Down);
            assert_ne!(d, Direction::None);
            if !seen.contains(&d) { seen.push(d); }
        }
        assert_eq!(seen.len(), 3);
    }
}
