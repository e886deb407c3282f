//! Tetris simulation (workspace facade crate).
//!
//! Re-exports the engine and its shared types under one name so drivers can depend on a
//! single package while the implementation lives in dedicated crates under `crates/`.

pub use tetris_sim_core as core;
pub use tetris_sim_types as types;
