//! Headless IAIDO runner
//!
//! Plays bot-driven matches through the duel engine, runs bout statistics
//! and verifies saved match logs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use iaido_core::{
    load_log, simulate_bouts, verify_match, BotPilot, Clock, DuelEngine, DuelError, DuelEvent, DuelLogger, ManualClock,
    MatchConfig, OpponentModel, SkillProfile, TickResult, TimingConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iaido")]
#[command(about = "Headless runner for the IAIDO duel engine")]
struct Args {
    /// Timing config (TOML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one match: a scripted player against the computer opponent
    Play {
        #[arg(long, default_value_t = 0xA1D0_5EED)]
        seed: u64,
        #[arg(long, default_value_t = 3)]
        best_of: u32,
        /// Computer opponent skill
        #[arg(long, value_enum, default_value_t = SkillProfile::Skilled)]
        skill: SkillProfile,
        /// Skill the scripted player swipes with
        #[arg(long, value_enum, default_value_t = SkillProfile::Skilled)]
        player_skill: SkillProfile,
        #[arg(long, default_value_t = 120)]
        fps: u32,
        /// Write the match log as JSON when the match ends
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Bot-vs-bot bouts straight through the resolver
    Sim {
        #[arg(long, default_value_t = 10)]
        rounds: u32,
        #[arg(long, value_enum, default_value_t = SkillProfile::Skilled)]
        a: SkillProfile,
        #[arg(long, value_enum, default_value_t = SkillProfile::Master)]
        b: SkillProfile,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Re-judge every round of a saved match log
    Replay {
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "iaido failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), DuelError> {
    let cfg = match &args.config {
        Some(path) => {
            let cfg = TimingConfig::load(path)?;
            cfg.validate()?;
            cfg
        }
        None => TimingConfig::default(),
    };

    match args.command {
        Command::Play { seed, best_of, skill, player_skill, fps, log } => {
            play(cfg, seed, best_of, skill, player_skill, fps.max(1), log)
        }
        Command::Sim { rounds, a, b, seed } => {
            let summary = simulate_bouts(&cfg, a, b, rounds, seed);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Replay { path } => {
            let log = load_log(&path)?;
            verify_match(&log, cfg.equal_tolerance_ms)?;
            println!("Replay OK for seed {} ({} rounds)", log.seed, log.rounds.len());
            Ok(())
        }
    }
}

fn play(
    cfg: TimingConfig,
    seed: u64,
    best_of: u32,
    skill: SkillProfile,
    player_skill: SkillProfile,
    fps: u32,
    log: Option<PathBuf>,
) -> Result<(), DuelError> {
    let match_cfg = MatchConfig { best_of, ..MatchConfig::default() };
    // Twice the minimum swipe distance.
    let swipe_px = match_cfg.metrics.mm_to_px(cfg.min_swipe_distance_mm) * 2.0;
    let mut pilot = BotPilot::new(OpponentModel::new(seed ^ 0xBEEF, cfg.profile(player_skill)), swipe_px);
    let logger = match &log {
        Some(path) => DuelLogger::with_output(seed, path),
        None => DuelLogger::new(seed),
    };
    let mut engine = DuelEngine::seeded_with(cfg, match_cfg, skill, seed, logger);

    let clock = ManualClock::new(0.0);
    let dt = 1.0 / fps as f64;
    let result = loop {
        let sample = pilot.sample(clock.now());
        if let TickResult::MatchEnded(result) = engine.step(&clock, &sample) {
            break result;
        }
        for ev in engine.drain_events() {
            if let DuelEvent::RoundResolved { round_index, outcome, .. } = ev {
                println!("round {round_index}: {outcome}");
            }
            pilot.on_event(&ev);
        }
        clock.advance(dt);
    };

    println!(
        "match over after {} rounds: player {} - ai {} ({:?})",
        result.rounds_played,
        result.player_wins,
        result.ai_wins,
        result.winner()
    );
    Ok(())
}
