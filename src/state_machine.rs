use rand::prelude::*;

use crate::ai::OpponentModel;
use crate::clock::Clock;
use crate::combat::{judge_round, Resolution};
use crate::config::{MatchConfig, SkillProfile, TimingConfig};
use crate::events::{DuelEvent, MatchResult};
use crate::input::{classify, PointerSample, PointerSource, SwipeConfig, SwipeDetector};
use crate::logging::{DuelLogger, RoundLog, RoundSink};
use crate::types::*;

const OPPONENT_SEED_SALT: u64 = 0xA11CE;
const MATCH_SEED_SALT: u64 = 0xC0FFEE;

#[derive(Clone, Debug, Default)]
pub struct MatchState {
    pub phase: DuelPhase,
    pub player_wins: u32,
    pub ai_wins: u32,
    pub round_index: u32,
    pub in_clash: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RoundState {
    /// Survives into the next round only after a clash.
    pub opening: Option<Opening>,
    pub go_ts: Option<f64>,
    pub window_end: f64,
    /// End of whichever wait the current phase is in.
    pub deadline: f64,
    pub player: Option<SwipeEvent>,
    pub ai: Option<SwipeEvent>,
    pub resolution: Option<Resolution>,
}

impl RoundState {
    fn clear_inputs(&mut self) {
        self.go_ts = None;
        self.player = None;
        self.ai = None;
        self.resolution = None;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickResult {
    /// Still running; the phase the engine is waiting in.
    Continue(DuelPhase),
    MatchEnded(MatchResult),
}

/// One best-of-N match, advanced by externally driven ticks.
///
/// Every wait is a deadline compared against the `now` passed to
/// [`DuelEngine::tick`]; nothing sleeps. Instant phases (standoff, go
/// signal, resolution) complete within the tick that reaches them.
pub struct DuelEngine<L: RoundSink = DuelLogger> {
    cfg: TimingConfig,
    match_cfg: MatchConfig,
    rng: StdRng,
    opponent: OpponentModel,
    swipe: SwipeDetector,
    logger: L,
    m: MatchState,
    r: RoundState,
    preset: Option<Opening>,
    events: Vec<DuelEvent>,
}

impl DuelEngine<DuelLogger> {
    pub fn seeded(cfg: TimingConfig, match_cfg: MatchConfig, skill: SkillProfile, seed: u64) -> Self {
        Self::seeded_with(cfg, match_cfg, skill, seed, DuelLogger::new(seed))
    }
}

impl<L: RoundSink> DuelEngine<L> {
    pub fn new(cfg: TimingConfig, match_cfg: MatchConfig, seed: u64, opponent: OpponentModel, logger: L) -> Self {
        let swipe = SwipeDetector::new(SwipeConfig::from_timing(&cfg, &match_cfg.metrics));
        Self {
            cfg,
            match_cfg,
            rng: StdRng::seed_from_u64(seed),
            opponent,
            swipe,
            logger,
            m: MatchState::default(),
            r: RoundState::default(),
            preset: None,
            events: Vec::with_capacity(8),
        }
    }

    /// Engine and opponent generators both derived from one match seed.
    pub fn seeded_with(cfg: TimingConfig, match_cfg: MatchConfig, skill: SkillProfile, seed: u64, logger: L) -> Self {
        let opponent = OpponentModel::new(seed ^ OPPONENT_SEED_SALT, cfg.profile(skill));
        Self::new(cfg, match_cfg, seed ^ MATCH_SEED_SALT, opponent, logger)
    }

    pub fn config(&self) -> &TimingConfig { &self.cfg }
    pub fn match_config(&self) -> &MatchConfig { &self.match_cfg }
    pub fn phase(&self) -> DuelPhase { self.m.phase }
    pub fn match_state(&self) -> &MatchState { &self.m }
    pub fn round_state(&self) -> &RoundState { &self.r }
    pub fn player_wins(&self) -> u32 { self.m.player_wins }
    pub fn ai_wins(&self) -> u32 { self.m.ai_wins }
    pub fn round_index(&self) -> u32 { self.m.round_index }
    pub fn in_clash(&self) -> bool { self.m.in_clash }
    pub fn current_opening(&self) -> Option<Opening> { self.r.opening }
    pub fn logger(&self) -> &L { &self.logger }
    pub fn logger_mut(&mut self) -> &mut L { &mut self.logger }

    pub fn result(&self) -> MatchResult {
        MatchResult {
            player_wins: self.m.player_wins,
            ai_wins: self.m.ai_wins,
            rounds_played: self.m.round_index,
        }
    }

    pub fn drain_events(&mut self) -> Vec<DuelEvent> { std::mem::take(&mut self.events) }

    /// Fixes the opening of the next round that would otherwise draw one.
    pub fn preset_opening(&mut self, opening: Opening) { self.preset = Some(opening); }

    /// Back to `Reset`; the next tick starts a fresh match.
    pub fn reset_match(&mut self) {
        self.m = MatchState::default();
        self.r = RoundState::default();
        self.swipe.reset();
        self.events.clear();
    }

    /// Reads both collaborators once and ticks.
    pub fn step<C: Clock, P: PointerSource>(&mut self, clock: &C, pointer: &P) -> TickResult {
        self.tick(clock.now(), pointer.sample())
    }

    pub fn tick(&mut self, now: f64, pointer: PointerSample) -> TickResult {
        loop {
            let before = self.m.phase;
            match self.m.phase {
                DuelPhase::Reset => {
                    self.m = MatchState::default();
                    self.r = RoundState::default();
                    self.set_phase(DuelPhase::Standoff);
                }
                DuelPhase::Standoff => self.begin_round(now),
                DuelPhase::RandomDelay => {
                    if now >= self.r.deadline {
                        self.set_phase(DuelPhase::GoSignal);
                    } else if pointer.is_moving() {
                        self.false_start(now, &pointer);
                    }
                }
                DuelPhase::GoSignal => self.fire_go(now, &pointer),
                DuelPhase::InputWindow => {
                    if now < self.r.window_end {
                        self.poll_player(now, &pointer);
                    } else {
                        self.set_phase(DuelPhase::Resolution);
                    }
                }
                DuelPhase::Resolution => self.resolve_round(now),
                DuelPhase::ResultFlash => {
                    if now >= self.r.deadline {
                        self.finish_round(now);
                    }
                }
                DuelPhase::NextRound => {
                    if now >= self.r.deadline {
                        self.events.push(DuelEvent::RoundTransition { next_round: self.m.round_index + 1 });
                        self.set_phase(DuelPhase::Standoff);
                    }
                }
                DuelPhase::MatchEnd => return TickResult::MatchEnded(self.result()),
            }
            if self.m.phase == before {
                return TickResult::Continue(self.m.phase);
            }
        }
    }

    fn set_phase(&mut self, phase: DuelPhase) {
        tracing::trace!(from = ?self.m.phase, to = ?phase, round = self.m.round_index, "phase");
        self.m.phase = phase;
    }

    fn ensure_opening(&mut self) -> Opening {
        let rng = &mut self.rng;
        let preset = &mut self.preset;
        *self
            .r
            .opening
            .get_or_insert_with(|| preset.take().unwrap_or_else(|| Opening::ALL[rng.gen_range(0..Opening::ALL.len())]))
    }

    fn begin_round(&mut self, now: f64) {
        self.m.round_index += 1;
        self.swipe.reset();
        self.r.clear_inputs();

        let (lo, hi) = if self.m.in_clash {
            (self.cfg.clash_delay_min_ms, self.cfg.clash_delay_max_ms)
        } else {
            (self.cfg.delay_min_ms, self.cfg.delay_max_ms)
        };
        let delay_ms = if hi > lo { self.rng.gen_range(lo..hi) } else { lo };
        self.r.deadline = now + ms_to_secs(delay_ms);
        tracing::debug!(round = self.m.round_index, delay_ms, clash = self.m.in_clash, "standoff");
        self.set_phase(DuelPhase::RandomDelay);
    }

    fn false_start(&mut self, now: f64, pointer: &PointerSample) {
        tracing::debug!(round = self.m.round_index, "false start");
        self.r.player = Some(SwipeEvent { dir: classify(pointer.motion), ts: now });
        self.events.push(DuelEvent::EarlyInput { side: Side::Player });
        self.m.in_clash = false;
        self.conclude(now, Resolution { outcome: RoundOutcome::EarlyPlayerLoss, is_clash: false });
    }

    fn fire_go(&mut self, now: f64, pointer: &PointerSample) {
        let opening = self.ensure_opening();
        let window_ms = if self.m.in_clash { self.cfg.clash_input_window_ms } else { self.cfg.input_window_ms };
        self.r.go_ts = Some(now);
        self.r.window_end = now + ms_to_secs(window_ms);
        self.swipe.begin_tracking(now, pointer.position);
        self.events.push(DuelEvent::GoSignal { opening, go_ts: now });

        // Reaction time first, then direction.
        let rt_ms = self.opponent.sample_reaction_ms();
        let ai_ts = now + rt_ms as f64 / 1000.0;
        self.r.ai = if ai_ts <= self.r.window_end {
            Some(SwipeEvent { dir: self.opponent.decide_direction(opening), ts: ai_ts })
        } else {
            None
        };
        tracing::debug!(round = self.m.round_index, %opening, window_ms, ai_rt_ms = rt_ms, "go");
        self.set_phase(DuelPhase::InputWindow);
    }

    fn poll_player(&mut self, now: f64, pointer: &PointerSample) {
        if self.r.player.is_some() {
            return;
        }
        let dir = self.swipe.poll(now, pointer.position);
        if !dir.is_none() {
            self.r.player = Some(SwipeEvent { dir, ts: now });
        }
    }

    fn resolve_round(&mut self, now: f64) {
        let opening = self.ensure_opening();
        let go_ts = self.r.go_ts.unwrap_or(now);
        let res = judge_round(opening, self.r.player, self.r.ai, go_ts, self.cfg.equal_tolerance_ms);
        self.m.in_clash = res.is_clash;
        if res.is_clash {
            self.events.push(DuelEvent::ClashTriggered { opening });
        }
        self.conclude(now, res);
    }

    /// Scores, logs and announces the round, then holds the result flash.
    fn conclude(&mut self, now: f64, res: Resolution) {
        match res.outcome.point_to() {
            Some(Side::Player) => self.m.player_wins += 1,
            Some(Side::Ai) => self.m.ai_wins += 1,
            None => {}
        }
        self.logger.append(RoundLog {
            round_index: self.m.round_index,
            opening: self.r.opening,
            go_ts: self.r.go_ts,
            player: self.r.player,
            ai: self.r.ai,
            outcome: res.outcome,
            clash: res.is_clash,
        });
        self.events.push(DuelEvent::RoundResolved {
            round_index: self.m.round_index,
            outcome: res.outcome,
            clash: res.is_clash,
        });
        tracing::info!(
            round = self.m.round_index,
            outcome = %res.outcome,
            player_wins = self.m.player_wins,
            ai_wins = self.m.ai_wins,
            "round resolved"
        );
        self.r.resolution = Some(res);
        self.r.deadline = now + ms_to_secs(self.cfg.result_flash_ms);
        self.set_phase(DuelPhase::ResultFlash);
    }

    fn finish_round(&mut self, now: f64) {
        if !self.m.in_clash {
            self.r.opening = None;
        }
        let needed = self.match_cfg.wins_needed();
        let decided = self.m.player_wins >= needed || self.m.ai_wins >= needed;
        if decided || self.m.round_index >= self.match_cfg.best_of {
            if let Err(err) = self.logger.flush() {
                tracing::warn!(%err, "failed to flush duel log");
            }
            let result = self.result();
            tracing::info!(?result, winner = ?result.winner(), "match over");
            self.events.push(DuelEvent::MatchEnded(result));
            self.set_phase(DuelPhase::MatchEnd);
        } else {
            self.r.deadline = now + ms_to_secs(self.cfg.next_round_ms);
            self.set_phase(DuelPhase::NextRound);
        }
    }
}
