//! Scoring module - raw counters and reward shaping
//!
//! The primary score is the number of cleared rows. Drivers that learn from the
//! engine can switch to a shaped score built from the same raw counters:
//! - cleared rows, weighted
//! - a small bonus per placed piece
//! - a penalty per illegal move
//! - a convex penalty on ticks spent per piece, to punish stalling

use serde::Serialize;

use crate::config::{ScoreMode, ScoringConfig};

/// Per-game counters, reset by `Engine::reset`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GameStats {
    pub lines_cleared: u32,
    pub pieces_placed: u32,
    pub illegal_moves: u32,
    /// Ticks since the previous piece locked
    pub frames_since_lock: u32,
    /// Sum of `stall_penalty` over every locked piece
    pub stall_penalty: f64,
}

/// Records kept across games until `Engine::reset_global_accumulators`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Records {
    /// Best lines-cleared count of a finished game
    pub best_score: u32,
    /// Illegal moves summed over every started game
    pub accumulated_illegal_moves: u64,
    /// Number of resets
    pub games_played: u32,
}

impl Records {
    /// Fold a finished game into the records
    pub fn record_game(&mut self, stats: &GameStats) {
        self.best_score = self.best_score.max(stats.lines_cleared);
        self.accumulated_illegal_moves += stats.illegal_moves as u64;
    }

    /// Fold a game abandoned by `reset` before it finished
    ///
    /// Only its illegal moves count; an unfinished game never sets the best score.
    pub fn record_abandoned(&mut self, stats: &GameStats) {
        self.accumulated_illegal_moves += stats.illegal_moves as u64;
    }

    /// Mean illegal moves per started game (0 before any game)
    pub fn average_illegal_moves(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.accumulated_illegal_moves as f64 / self.games_played as f64
    }
}

/// Penalty for spending `frames` ticks on a single piece
///
/// Zero for an instant lock, grows exponentially with `rate`.
pub fn stall_penalty(frames: u32, rate: f64) -> f64 {
    (rate * frames as f64).exp_m1()
}

/// Weighted reward built from the raw counters
pub fn shaped_score(stats: &GameStats, weights: &ScoringConfig) -> f64 {
    weights.clear_weight * stats.lines_cleared as f64 + weights.piece_bonus * stats.pieces_placed as f64
        - weights.illegal_move_penalty * stats.illegal_moves as f64
        - weights.stall_weight * stats.stall_penalty
}

/// Score as reported to drivers
pub fn calculate_score(stats: &GameStats, weights: &ScoringConfig) -> f64 {
    match weights.mode {
        ScoreMode::Raw => stats.lines_cleared as f64,
        ScoreMode::Shaped => shaped_score(stats, weights),
    }
}
