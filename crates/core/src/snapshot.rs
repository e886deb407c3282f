//! Snapshot module - serializable view of the observable state
//!
//! Rows as drivers see them (active piece included) plus an FNV-1a hash of the
//! flattened grid for replay comparison.

use serde::Serialize;

use crate::pieces::{Block, Tetromino};
use crate::scoring::{GameStats, Records};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: &'static str,
    pub tag: u8,
    pub blocks: [Block; 4],
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind.as_str(),
            tag: value.kind.tag(),
            blocks: value.blocks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub width: u8,
    pub height: u8,
    pub board: Vec<Vec<u8>>,
    pub board_hash: u64,
    pub active: Option<ActiveSnapshot>,
    pub fall_counter: u32,
    pub stats: GameStats,
    pub records: Records,
    pub score: f64,
    pub terminal: bool,
    pub seed: u64,
    pub mode: &'static str,
}

impl EngineSnapshot {
    pub fn playable(&self) -> bool {
        !self.terminal && self.active.is_some()
    }
}

/// FNV-1a 64-bit hash of a row-major cell buffer
pub fn board_hash(cells: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in cells {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}
