//! Config module - board profile and reward weights
//!
//! The canonical profile is 10x20 with a descent every 20 ticks. Everything is
//! overridable so alternate board sizes can be exercised in tests and by drivers.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, FRAMES_PER_FALL, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, SPAWN_COLUMN,
    SPAWN_ROW, TEMPLATE_HEIGHT, TEMPLATE_WIDTH,
};

/// What `Engine::score` reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Number of cleared rows
    #[default]
    Raw,
    /// Weighted combination of the raw counters
    Shaped,
}

impl ScoreMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "raw" => Some(ScoreMode::Raw),
            "shaped" => Some(ScoreMode::Shaped),
            _ => None,
        }
    }
}

/// Reward-shaping weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub mode: ScoreMode,
    /// Reward per cleared row
    pub clear_weight: f64,
    /// Reward per placed piece
    pub piece_bonus: f64,
    /// Penalty per illegal move
    pub illegal_move_penalty: f64,
    /// Multiplier on the accumulated stall penalty
    pub stall_weight: f64,
    /// Growth rate of the per-piece stall penalty
    pub stall_rate: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mode: ScoreMode::Raw,
            clear_weight: 100.0,
            piece_bonus: 1.0,
            illegal_move_penalty: 0.1,
            stall_weight: 0.01,
            stall_rate: 0.01,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    /// Ticks between two forced descents
    pub frames_per_fall: u32,
    /// Spawn origin, added to the template offsets
    pub spawn_column: i32,
    pub spawn_row: i32,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            frames_per_fall: FRAMES_PER_FALL,
            spawn_column: SPAWN_COLUMN,
            spawn_row: SPAWN_ROW,
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Canonical profile with a different board size
    pub fn with_size(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            spawn_column: (width as i32 - TEMPLATE_WIDTH as i32) / 2,
            ..Self::default()
        }
    }

    /// Canonical profile with shaped scoring
    pub fn shaped() -> Self {
        Self {
            scoring: ScoringConfig {
                mode: ScoreMode::Shaped,
                ..ScoringConfig::default()
            },
            ..Self::default()
        }
    }

    /// Overlay `TETRIS_SIM_*` environment variables on the defaults
    ///
    /// Unset or unparsable values keep their default.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let width: u8 = env::var("TETRIS_SIM_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("TETRIS_SIM_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.height);
        let frames_per_fall = env::var("TETRIS_SIM_FRAMES_PER_FALL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.frames_per_fall);
        let mode = env::var("TETRIS_SIM_SCORE_MODE")
            .ok()
            .and_then(|s| ScoreMode::from_str(s.trim()))
            .unwrap_or(defaults.scoring.mode);

        let mut config = Self::with_size(width, height);
        config.frames_per_fall = frames_per_fall;
        config.scoring.mode = mode;
        config
    }

    /// Parse a (possibly partial) JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width < TEMPLATE_WIDTH || self.width > MAX_BOARD_WIDTH {
            return Err(EngineError::InvalidConfig(format!(
                "width {} outside {}..={}",
                self.width, TEMPLATE_WIDTH, MAX_BOARD_WIDTH
            )));
        }
        if self.height < TEMPLATE_HEIGHT || self.height > MAX_BOARD_HEIGHT {
            return Err(EngineError::InvalidConfig(format!(
                "height {} outside {}..={}",
                self.height, TEMPLATE_HEIGHT, MAX_BOARD_HEIGHT
            )));
        }
        if self.frames_per_fall == 0 {
            return Err(EngineError::InvalidConfig(
                "frames_per_fall must be at least 1".to_string(),
            ));
        }
        let spawn_column = self.spawn_column as i64;
        let spawn_row = self.spawn_row as i64;
        if spawn_column < 0 || spawn_column + TEMPLATE_WIDTH as i64 > self.width as i64 {
            return Err(EngineError::InvalidConfig(format!(
                "spawn column {} does not fit a {}-wide template on a {}-wide board",
                self.spawn_column, TEMPLATE_WIDTH, self.width
            )));
        }
        if spawn_row + TEMPLATE_HEIGHT as i64 > self.height as i64 {
            return Err(EngineError::InvalidConfig(format!(
                "spawn row {} puts the template below the floor",
                self.spawn_row
            )));
        }
        // At least the template's bottom row must reach the grid.
        if spawn_row < -(TEMPLATE_HEIGHT as i64) + 1 {
            return Err(EngineError::InvalidConfig(format!(
                "spawn row {} keeps the template above the board",
                self.spawn_row
            )));
        }

        let s = &self.scoring;
        let weights = [
            s.clear_weight,
            s.piece_bonus,
            s.illegal_move_penalty,
            s.stall_weight,
            s.stall_rate,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(EngineError::InvalidConfig(
                "scoring weights must be finite".to_string(),
            ));
        }

        Ok(())
    }
}
