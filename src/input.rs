use glam::Vec2;

use crate::config::{DeviceMetrics, TimingConfig};
use crate::types::Direction;

/// Squared per-frame motion (px²) above which the pointer counts as moving.
pub const EARLY_MOTION_EPSILON_SQ: f32 = 0.01;

/// One tick's view of the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    /// Motion since the previous frame.
    pub motion: Vec2,
}

impl PointerSample {
    pub fn at(position: Vec2) -> Self { Self { position, motion: Vec2::ZERO } }

    pub fn is_moving(&self) -> bool { self.motion.length_squared() > EARLY_MOTION_EPSILON_SQ }
}

/// Pointer-position collaborator, sampled once per tick.
pub trait PointerSource {
    fn position(&self) -> Vec2;
    fn motion(&self) -> Vec2;

    fn sample(&self) -> PointerSample {
        PointerSample { position: self.position(), motion: self.motion() }
    }
}

impl PointerSource for PointerSample {
    fn position(&self) -> Vec2 { self.position }
    fn motion(&self) -> Vec2 { self.motion }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    pub direction_lock_ms: u64,
    pub min_distance_px: f32,
}

impl SwipeConfig {
    pub fn from_timing(cfg: &TimingConfig, metrics: &DeviceMetrics) -> Self {
        Self {
            direction_lock_ms: cfg.direction_lock_ms,
            min_distance_px: metrics.mm_to_px(cfg.min_swipe_distance_mm),
        }
    }
}

/// Turns pointer displacement since the go signal into one committed direction.
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    cfg: SwipeConfig,
    tracking: bool,
    committed: bool,
    committed_dir: Direction,
    start_pos: Vec2,
    start_time: f64,
}

impl SwipeDetector {
    pub fn new(cfg: SwipeConfig) -> Self {
        Self {
            cfg,
            tracking: false,
            committed: false,
            committed_dir: Direction::None,
            start_pos: Vec2::ZERO,
            start_time: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.tracking = false;
        self.committed = false;
        self.committed_dir = Direction::None;
    }

    /// Starts the sample window. Called once, at the go signal.
    pub fn begin_tracking(&mut self, now: f64, start_pos: Vec2) {
        self.tracking = true;
        self.committed = false;
        self.committed_dir = Direction::None;
        self.start_pos = start_pos;
        self.start_time = now;
    }

    pub fn is_tracking(&self) -> bool { self.tracking }

    pub fn is_committed(&self) -> bool { self.committed }

    /// Returns the committed direction, committing first if the lock time
    /// has passed or the pointer travelled far enough.
    ///
    /// Unlike a plain lock-on-timeout, zero displacement never commits:
    /// a still pointer at lock time returns `None` and keeps the window
    /// open, so the first real motion afterwards commits immediately.
    pub fn poll(&mut self, now: f64, current: Vec2) -> Direction {
        if !self.tracking { return Direction::None; }
        if self.committed { return self.committed_dir; }

        let delta = current - self.start_pos;
        let dt_ms = (now - self.start_time) * 1000.0;
        let locked = dt_ms >= self.cfg.direction_lock_ms as f64;
        if locked || delta.length() >= self.cfg.min_distance_px {
            let dir = classify(delta);
            if !dir.is_none() {
                self.committed_dir = dir;
                self.committed = true;
            }
        }
        self.committed_dir
    }
}

/// Dominant-axis quantization; exact diagonals go vertical.
pub fn classify(delta: Vec2) -> Direction {
    if delta.length_squared() == 0.0 { return Direction::None; }
    if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 { Direction::Right } else { Direction::Left }
    } else if delta.y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}
