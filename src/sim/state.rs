//! Entities and match state
//!
//! Everything the rendering and persistence collaborators read lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Outcome;
use crate::settings::{GameConfig, ScorePolicy};

/// Playfield size in canvas pixels (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if both dimensions are finite and positive
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Clamp a horizontal span of `half_extent` so it stays inside the field
    pub fn clamp_x(&self, x: f32, half_extent: f32) -> f32 {
        if self.width <= half_extent * 2.0 {
            self.width / 2.0
        } else {
            x.clamp(half_extent, self.width - half_extent)
        }
    }

    /// Clamp a vertical span of `half_extent` so it stays inside the field
    pub fn clamp_y(&self, y: f32, half_extent: f32) -> f32 {
        if self.height <= half_extent * 2.0 {
            self.height / 2.0
        } else {
            y.clamp(half_extent, self.height - half_extent)
        }
    }
}

/// A falling ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Entity {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            alive: true,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Move by one frame of velocity
    #[inline]
    pub fn step(&mut self) {
        self.pos += self.vel;
    }
}

/// Phase of the current attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Running,
    Ended,
}

/// Signals for the navigation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationSignal {
    /// Retry requested with no attempts left
    RetryExhausted,
    /// Player chose to leave after an attempt ended
    BackToHome,
}

/// Result of asking for a retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// A fresh attempt is running; the caller must reset pool and paddle
    Restarted,
    /// No attempts left; the caller must navigate away
    Exhausted,
    /// Not ended yet, nothing changed
    Ignored,
}

/// Per-attempt outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStats {
    pub caught: u32,
    pub missed: u32,
    pub out_of_bounds: u32,
}

/// What the persistence collaborator receives when an attempt ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub score: u64,
    pub attempts_remaining: u32,
    pub stats: AttemptStats,
}

/// Countdown, score and attempt bookkeeping for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: MatchPhase,
    /// Seconds left in the current attempt
    pub time_left: u32,
    pub score: u64,
    pub attempts_remaining: u32,
    /// Counters for the current attempt
    pub stats: AttemptStats,
    game_duration: u32,
    catch_value: u64,
    score_policy: ScorePolicy,
}

impl MatchState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: MatchPhase::Running,
            time_left: config.game_duration_secs,
            score: 0,
            attempts_remaining: config.initial_attempts,
            stats: AttemptStats::default(),
            game_duration: config.game_duration_secs,
            catch_value: config.catch_value,
            score_policy: config.score_policy,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    /// One-second countdown step. Returns true if this call ended the attempt.
    pub fn countdown(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.observe_expiry()
    }

    /// Redundant expiry check for the frame loop; idempotent.
    /// Returns true if this call ended the attempt.
    pub fn observe_expiry(&mut self) -> bool {
        if self.is_running() && self.time_left == 0 {
            self.phase = MatchPhase::Ended;
            return true;
        }
        false
    }

    /// Fold a terminal entity outcome into score and stats
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        if !self.is_running() {
            return;
        }
        match outcome {
            Outcome::Caught => {
                self.score = self.score.saturating_add(self.catch_value);
                self.stats.caught += 1;
            }
            // No score penalty; the attempt only ends on time
            Outcome::MissedBottom => self.stats.missed += 1,
            Outcome::OutOfBounds => self.stats.out_of_bounds += 1,
            Outcome::Falling => {}
        }
    }

    /// Start another attempt if any are left
    pub fn retry(&mut self) -> RetryOutcome {
        if self.is_running() {
            return RetryOutcome::Ignored;
        }
        if self.attempts_remaining <= 1 {
            return RetryOutcome::Exhausted;
        }
        self.attempts_remaining -= 1;
        self.time_left = self.game_duration;
        self.stats = AttemptStats::default();
        if self.score_policy == ScorePolicy::PerAttempt {
            self.score = 0;
        }
        self.phase = MatchPhase::Running;
        RetryOutcome::Restarted
    }

    /// Leave the game; only honoured once the attempt has ended
    pub fn back_to_home(&self) -> Option<NavigationSignal> {
        match self.phase {
            MatchPhase::Ended => Some(NavigationSignal::BackToHome),
            MatchPhase::Running => None,
        }
    }

    pub fn result(&self) -> AttemptResult {
        AttemptResult {
            score: self.score,
            attempts_remaining: self.attempts_remaining,
            stats: self.stats,
        }
    }
}
