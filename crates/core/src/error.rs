//! Error module - contract violations reported by the engine
//!
//! Normal play never fails: impossible moves are rolled back and counted.
//! These variants only cover callers breaking the engine's contract.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("action id {0} is out of range (expected 0..5)")]
    InvalidAction(u64),

    #[error("cell ({x}, {y}) is outside the {width}x{height} board")]
    CellOutOfBounds {
        x: i32,
        y: i32,
        width: u8,
        height: u8,
    },

    #[error("step called before the first reset")]
    NotReset,

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}
