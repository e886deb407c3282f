//! Core simulation engine - pure, deterministic, and testable
//!
//! This crate contains the grid model, the active-piece lifecycle, collision and
//! placement rules, line clearing and scoring. It has **no** rendering, input,
//! or I/O, so the same engine can be driven by:
//!
//! - **a human-input loop** translating key events into [`Action`](types::Action)s at a fixed frame rate
//! - **an agent loop** reading the grid as observations and submitting action ids
//!
//! Both call [`Engine::step`] once per discrete tick.
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with collision queries and gravity-compaction line clearing
//! - [`pieces`]: tetromino templates and the three rotation rules
//! - [`rng`]: per-engine seeded RNG keyed by (seed, learning mode)
//! - [`scoring`]: raw counters, cross-game records and reward shaping
//! - [`config`]: board profile and reward weights
//! - [`engine`]: the simulation state machine (`reset`, `step`, `score`, `cell_at`)
//! - [`snapshot`]: serializable view of the observable state
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every spawn draws one of the 7 shapes with equal probability
//! - **Gravity**: the piece falls one row every `frames_per_fall` ticks (20 by default), or
//!   immediately on a soft drop
//! - **Rollback**: moves that collide are undone and counted as illegal, never reported as errors
//! - **Lock**: a piece that cannot fall freezes in place; full rows are cleared and the
//!   rows above fall down
//! - **Game over**: a freshly spawned piece that does not fit ends the game
//!
//! # Example
//!
//! ```
//! use tetris_sim_core::Engine;
//! use tetris_sim_core::types::{Action, LearningMode};
//!
//! let mut engine = Engine::default();
//! engine.reset(0, LearningMode::Training);
//!
//! for _ in 0..20 {
//!     engine.step(Action::NoOp).unwrap();
//! }
//!
//! assert!(!engine.is_terminal());
//! assert_eq!(engine.fall_counter(), 0);
//! assert_eq!(engine.score(), 0.0);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_sim_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{EngineConfig, ScoreMode, ScoringConfig};
pub use engine::{Engine, LockEvent};
pub use error::EngineError;
pub use pieces::{rotation_rule, Block, RotationRule, Tetromino};
pub use rng::{combined_seed, SimpleRng};
pub use scoring::{calculate_score, stall_penalty, GameStats, Records};
pub use snapshot::{ActiveSnapshot, EngineSnapshot};
