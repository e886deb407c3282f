//! Engine module - the complete simulation state
//!
//! Ties together the board, the active piece, the RNG stream and the counters.
//! The engine advances exactly one tick per `step`; it never blocks and owns all
//! of its state, so `clone` forks a fully independent simulation.

use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pieces::Tetromino;
use crate::rng::SimpleRng;
use crate::scoring::{calculate_score, stall_penalty, GameStats, Records};
use crate::snapshot::{board_hash, ActiveSnapshot, EngineSnapshot};
use crate::types::{Action, Cell, LearningMode, PieceKind, EMPTY};

/// Rotate attempts in place that count as a degenerate oscillation
const ROTATION_CYCLE: u8 = 4;

/// Emitted each time a piece locks (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Ticks spent on the piece before it locked
    pub frames_on_piece: u32,
    pub stall_penalty: f64,
    /// The replacement piece had no room
    pub game_over: bool,
}

/// Simulation engine state
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    /// `None` before the first reset and once the game is over
    active: Option<Tetromino>,
    rng: SimpleRng,
    seed: u64,
    mode: LearningMode,
    /// Ticks since the active piece last moved down
    fall_counter: u32,
    /// Soft drop requested this tick
    accelerate: bool,
    /// Successful rotations since the piece last translated or fell
    rotation_streak: u8,
    /// Rotate attempts (successful or not) since the piece last translated or fell
    rotation_attempts: u8,
    terminal: bool,
    started: bool,
    stats: GameStats,
    records: Records,
    last_event: Option<LockEvent>,
}

impl Engine {
    /// Create an engine for `config`; call [`Engine::reset`] before stepping
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            config,
            board: Board::new(config.width, config.height),
            active: None,
            rng: SimpleRng::default(),
            seed: 0,
            mode: LearningMode::default(),
            fall_counter: 0,
            accelerate: false,
            rotation_streak: 0,
            rotation_attempts: 0,
            terminal: false,
            started: false,
            stats: GameStats::default(),
            records: Records::default(),
            last_event: None,
        }
    }

    /// Start a new game
    ///
    /// Cross-game records survive; see [`Engine::reset_global_accumulators`].
    pub fn reset(&mut self, seed: u64, mode: LearningMode) {
        if self.started && !self.terminal {
            self.records.record_abandoned(&self.stats);
        }

        self.rng = SimpleRng::for_game(seed, mode);
        self.seed = seed;
        self.mode = mode;
        self.board.clear();
        self.fall_counter = 0;
        self.accelerate = false;
        self.rotation_streak = 0;
        self.rotation_attempts = 0;
        self.terminal = false;
        self.started = true;
        self.stats = GameStats::default();
        self.last_event = None;
        self.records.games_played = self.records.games_played.wrapping_add(1);

        debug!(
            seed,
            mode = mode.as_str(),
            rng_state = self.rng.state(),
            "engine reset"
        );

        if self.spawn_piece() {
            self.draw_active();
        } else {
            self.end_game();
        }
    }

    /// Zero the records kept across games
    pub fn reset_global_accumulators(&mut self) {
        self.records = Records::default();
    }

    /// Advance the simulation by one tick
    ///
    /// Impossible moves are rolled back and counted, never reported as errors.
    /// Stepping a finished game is a no-op.
    pub fn step(&mut self, action: Action) -> Result<(), EngineError> {
        if !self.started {
            return Err(EngineError::NotReset);
        }
        if self.terminal {
            return Ok(());
        }
        let Some(current) = self.active else {
            return Ok(());
        };

        self.stats.frames_since_lock = self.stats.frames_since_lock.saturating_add(1);

        // Lift the piece off the grid so it cannot collide with itself.
        self.board.stamp(&current.blocks, EMPTY);
        let last = current;

        let candidate = match action {
            Action::MoveRight => current.translated(1, 0),
            Action::MoveLeft => current.translated(-1, 0),
            Action::RotateCw => current.rotated(),
            Action::SoftDrop => {
                self.accelerate = true;
                current
            }
            Action::NoOp => current,
        };

        let legal = candidate.fits(&self.board);
        let mut piece = if legal { candidate } else { last };
        if !legal {
            self.stats.illegal_moves += 1;
            trace!(action = action.as_str(), "illegal move rolled back");
        }

        match action {
            Action::RotateCw => self.track_rotation(legal),
            Action::MoveRight | Action::MoveLeft if legal => self.clear_rotation_tracking(),
            _ => {}
        }

        self.fall_counter += 1;
        if self.fall_counter >= self.config.frames_per_fall || self.accelerate {
            self.fall_counter = 0;
            self.accelerate = false;
            self.clear_rotation_tracking();

            let fallen = piece.translated(0, 1);
            if fallen.fits(&self.board) {
                piece = fallen;
            } else {
                self.lock_piece(piece);
                self.draw_active();
                return Ok(());
            }
        }

        self.active = Some(piece);
        self.draw_active();
        Ok(())
    }

    /// Advance one tick with a numeric action id (0..5)
    pub fn step_id(&mut self, action_id: u64) -> Result<(), EngineError> {
        let action = Action::from_id(action_id).ok_or(EngineError::InvalidAction(action_id))?;
        self.step(action)
    }

    fn track_rotation(&mut self, legal: bool) {
        self.rotation_attempts += 1;
        self.rotation_streak += 1;
        if !legal {
            self.rotation_streak -= 1;
        }
        if self.rotation_attempts >= ROTATION_CYCLE {
            self.stats.illegal_moves += 1;
            trace!(
                streak = self.rotation_streak,
                "rotation oscillation penalized"
            );
            self.clear_rotation_tracking();
        }
    }

    fn clear_rotation_tracking(&mut self) {
        self.rotation_streak = 0;
        self.rotation_attempts = 0;
    }

    /// Freeze `piece` into the grid, clear rows and bring in the next piece
    fn lock_piece(&mut self, piece: Tetromino) {
        self.board.stamp(&piece.blocks, piece.kind.tag());

        let cleared = self.board.clear_full_rows();
        let lines_cleared = cleared.len() as u32;
        self.stats.lines_cleared += lines_cleared;
        self.stats.pieces_placed += 1;

        let frames_on_piece = self.stats.frames_since_lock;
        let penalty = stall_penalty(frames_on_piece, self.config.scoring.stall_rate);
        self.stats.stall_penalty += penalty;
        self.stats.frames_since_lock = 0;

        debug!(
            kind = piece.kind.as_str(),
            lines_cleared,
            total_lines = self.stats.lines_cleared,
            pieces_placed = self.stats.pieces_placed,
            frames_on_piece,
            "piece locked"
        );

        let spawned = self.spawn_piece();
        if !spawned {
            self.end_game();
        }

        self.last_event = Some(LockEvent {
            kind: piece.kind,
            lines_cleared,
            frames_on_piece,
            stall_penalty: penalty,
            game_over: !spawned,
        });
    }

    /// Spawn a new piece from the RNG stream
    ///
    /// Returns false (leaving no active piece) if the spawn position is blocked.
    fn spawn_piece(&mut self) -> bool {
        let kind = self.rng.next_piece();
        let origin = (self.config.spawn_column, self.config.spawn_row);
        let piece = Tetromino::spawn(kind, origin);

        self.fall_counter = 0;
        self.accelerate = false;
        self.clear_rotation_tracking();

        if piece.fits(&self.board) {
            self.active = Some(piece);
            true
        } else {
            self.active = None;
            false
        }
    }

    fn end_game(&mut self) {
        self.terminal = true;
        self.active = None;
        self.records.record_game(&self.stats);
        info!(
            seed = self.seed,
            lines = self.stats.lines_cleared,
            pieces = self.stats.pieces_placed,
            illegal_moves = self.stats.illegal_moves,
            best = self.records.best_score,
            "game over"
        );
    }

    /// Write the active piece into the grid for observers
    fn draw_active(&mut self) {
        if let Some(piece) = self.active {
            self.board.stamp(&piece.blocks, piece.kind.tag());
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Score as configured (raw cleared rows or shaped reward)
    pub fn score(&self) -> f64 {
        calculate_score(&self.stats, &self.config.scoring)
    }

    /// Cleared rows in the current game
    pub fn game_score(&self) -> u32 {
        self.stats.lines_cleared
    }

    /// Cell value at (x, y), active piece included
    pub fn cell_at(&self, x: i32, y: i32) -> Result<Cell, EngineError> {
        self.board.get(x, y).ok_or(EngineError::CellOutOfBounds {
            x,
            y,
            width: self.board.width(),
            height: self.board.height(),
        })
    }

    /// Row-major observation buffer, active piece included
    pub fn cells(&self) -> &[Cell] {
        self.board.cells()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fall_counter(&self) -> u32 {
        self.fall_counter
    }

    pub fn rotation_streak(&self) -> u8 {
        self.rotation_streak
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn lines_cleared(&self) -> u32 {
        self.stats.lines_cleared
    }

    pub fn pieces_placed(&self) -> u32 {
        self.stats.pieces_placed
    }

    pub fn illegal_moves(&self) -> u32 {
        self.stats.illegal_moves
    }

    pub fn frames_since_lock(&self) -> u32 {
        self.stats.frames_since_lock
    }

    pub fn average_illegal_moves(&self) -> f64 {
        self.records.average_illegal_moves()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            board: self.board.rows().map(|row| row.to_vec()).collect(),
            board_hash: board_hash(self.board.cells()),
            active: self.active.map(ActiveSnapshot::from),
            fall_counter: self.fall_counter,
            stats: self.stats,
            records: self.records,
            score: self.score(),
            terminal: self.terminal,
            seed: self.seed,
            mode: self.mode.as_str(),
        }
    }

    /// Replace the active piece (test setup only)
    #[cfg(test)]
    fn set_active(&mut self, piece: Tetromino) {
        if let Some(old) = self.active {
            self.board.stamp(&old.blocks, EMPTY);
        }
        self.active = Some(piece);
        self.draw_active();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreMode;

    fn started(seed: u64) -> Engine {
        let mut engine = Engine::default();
        engine.reset(seed, LearningMode::Training);
        engine
    }

    fn fill_row(engine: &mut Engine, y: i32, skip: &[i32]) {
        for x in 0..engine.config.width as i32 {
            if !skip.contains(&x) {
                engine.board.set(x, y, PieceKind::J.tag());
            }
        }
    }

    #[test]
    fn test_new_engine_is_not_started() {
        let engine = Engine::default();
        assert!(!engine.started);
        assert!(!engine.terminal);
        assert!(engine.active.is_none());
        assert_eq!(engine.board.filled_count(), 0);
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut engine = Engine::default();
        assert_eq!(engine.step(Action::NoOp), Err(EngineError::NotReset));
    }

    #[test]
    fn test_reset_spawns_and_draws_piece() {
        let engine = started(0);
        let active = engine.active.unwrap();
        assert_eq!(engine.board.filled_count(), 4);
        for &(x, y) in &active.blocks {
            assert_eq!(engine.board.get(x, y), Some(active.kind.tag()));
        }
        assert_eq!(engine.records.games_played, 1);
    }

    #[test]
    fn test_fall_after_threshold() {
        let mut engine = started(0);
        let spawn = engine.active.unwrap();

        for _ in 0..19 {
            engine.step(Action::NoOp).unwrap();
        }
        assert_eq!(engine.active.unwrap(), spawn);
        assert_eq!(engine.fall_counter, 19);

        engine.step(Action::NoOp).unwrap();
        assert_eq!(engine.active.unwrap(), spawn.translated(0, 1));
        assert_eq!(engine.fall_counter, 0);
    }

    #[test]
    fn test_soft_drop_descends_immediately() {
        let mut engine = started(0);
        let spawn = engine.active.unwrap();
        engine.step(Action::SoftDrop).unwrap();
        assert_eq!(engine.active.unwrap(), spawn.translated(0, 1));
        assert_eq!(engine.fall_counter, 0);
        assert!(!engine.accelerate);
    }

    #[test]
    fn test_lock_clears_row_and_shifts_down() {
        let mut engine = started(0);
        fill_row(&mut engine, 19, &[0, 1]);
        engine.board.set(5, 18, PieceKind::S.tag());
        engine.set_active(Tetromino::spawn(PieceKind::O, (0, 17)));
        // O occupies (0,18) (1,18) (0,19) (1,19)

        engine.step(Action::SoftDrop).unwrap();

        assert_eq!(engine.game_score(), 1);
        assert_eq!(engine.stats.pieces_placed, 1);
        // Former row 18 now sits on the floor.
        assert_eq!(engine.board.get(0, 19), Some(PieceKind::O.tag()));
        assert_eq!(engine.board.get(1, 19), Some(PieceKind::O.tag()));
        assert_eq!(engine.board.get(5, 19), Some(PieceKind::S.tag()));
        assert_eq!(engine.board.get(2, 19), Some(EMPTY));
        for x in 0..10 {
            assert_eq!(engine.board.get(x, 18), Some(EMPTY));
        }

        let event = engine.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.kind, PieceKind::O);
        assert!(!event.game_over);
    }

    #[test]
    fn test_lock_without_clear() {
        let mut engine = started(0);
        engine.set_active(Tetromino::spawn(PieceKind::O, (3, 17)));
        engine.step(Action::SoftDrop).unwrap();

        assert_eq!(engine.game_score(), 0);
        assert_eq!(engine.stats.pieces_placed, 1);
        assert_eq!(engine.board.get(3, 19), Some(PieceKind::O.tag()));
        assert_eq!(engine.board.get(4, 18), Some(PieceKind::O.tag()));
        assert_eq!(engine.stats.frames_since_lock, 0);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut engine = started(0);
        // O occupies (7,-1) (8,-1) (7,0) (8,0)
        engine.set_active(Tetromino::spawn(PieceKind::O, (7, -2)));
        for y in 2..20 {
            fill_row(&mut engine, y, &[0]);
        }

        engine.step(Action::SoftDrop).unwrap();
        assert!(!engine.terminal);
        // Resting on row 2: locks in rows 0-1, and the spawn area is buried.
        engine.step(Action::SoftDrop).unwrap();

        assert!(engine.terminal);
        assert!(engine.active.is_none());
        assert_eq!(engine.board.get(7, 0), Some(PieceKind::O.tag()));
        assert_eq!(engine.records.best_score, 0);
        assert!(engine.take_last_event().unwrap().game_over);
    }

    #[test]
    fn test_terminal_step_is_noop() {
        let mut engine = started(0);
        engine.terminal = true;
        let before = engine.board.clone();
        engine.step(Action::MoveLeft).unwrap();
        assert_eq!(engine.board, before);
        assert_eq!(engine.stats.illegal_moves, 0);
    }

    #[test]
    fn test_illegal_move_rolls_back() {
        let mut engine = started(0);
        engine.set_active(Tetromino::spawn(PieceKind::O, (0, 5)));
        let before = engine.active.unwrap();

        engine.step(Action::MoveLeft).unwrap();
        assert_eq!(engine.active.unwrap(), before);
        assert_eq!(engine.stats.illegal_moves, 1);
    }

    #[test]
    fn test_four_rotations_in_place_are_penalized() {
        let mut engine = started(0);
        engine.set_active(Tetromino::spawn(PieceKind::T, (4, 8)));
        let before = engine.active.unwrap();

        for _ in 0..3 {
            engine.step(Action::RotateCw).unwrap();
        }
        assert_eq!(engine.rotation_streak, 3);
        assert_eq!(engine.stats.illegal_moves, 0);

        engine.step(Action::RotateCw).unwrap();
        assert_eq!(engine.active.unwrap(), before);
        assert_eq!(engine.stats.illegal_moves, 1);
        assert_eq!(engine.rotation_streak, 0);
    }

    #[test]
    fn test_rejected_rotation_does_not_extend_streak() {
        let mut engine = started(0);
        // Vertical I against the right wall cannot turn horizontal.
        engine.set_active(Tetromino::spawn(PieceKind::I, (8, 8)));
        let before = engine.active.unwrap();

        engine.step(Action::RotateCw).unwrap();
        assert_eq!(engine.active.unwrap(), before);
        assert_eq!(engine.rotation_streak, 0);
        assert_eq!(engine.rotation_attempts, 1);
        assert_eq!(engine.stats.illegal_moves, 1);
    }

    #[test]
    fn test_translation_resets_rotation_tracking() {
        let mut engine = started(0);
        engine.set_active(Tetromino::spawn(PieceKind::T, (4, 8)));
        engine.step(Action::RotateCw).unwrap();
        engine.step(Action::RotateCw).unwrap();
        engine.step(Action::MoveLeft).unwrap();
        assert_eq!(engine.rotation_attempts, 0);
        engine.step(Action::RotateCw).unwrap();
        engine.step(Action::RotateCw).unwrap();
        assert_eq!(engine.stats.illegal_moves, 0);
    }

    #[test]
    fn test_shaped_score_tracks_stall_penalty() {
        let mut engine = Engine::new(EngineConfig::shaped()).unwrap();
        engine.reset(0, LearningMode::Training);
        assert_eq!(engine.config.scoring.mode, ScoreMode::Shaped);
        engine.set_active(Tetromino::spawn(PieceKind::O, (3, 17)));
        for _ in 0..5 {
            engine.step(Action::NoOp).unwrap();
        }
        engine.step(Action::SoftDrop).unwrap();

        let expected_penalty = stall_penalty(6, engine.config.scoring.stall_rate);
        assert!((engine.stats.stall_penalty - expected_penalty).abs() < 1e-12);
        let weights = engine.config.scoring;
        let expected = weights.piece_bonus - weights.stall_weight * expected_penalty;
        assert!((engine.score() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_records_survive_reset() {
        let mut engine = started(0);
        engine.stats.illegal_moves = 3;
        engine.stats.lines_cleared = 2;
        engine.end_game();

        engine.reset(1, LearningMode::Training);
        assert_eq!(engine.records.best_score, 2);
        assert_eq!(engine.records.accumulated_illegal_moves, 3);
        assert_eq!(engine.records.games_played, 2);
        assert_eq!(engine.stats, GameStats::default());

        engine.reset_global_accumulators();
        assert_eq!(engine.records, Records::default());
    }

    #[test]
    fn test_reset_folds_unfinished_game() {
        let mut engine = started(0);
        engine.set_active(Tetromino::spawn(PieceKind::O, (0, 5)));
        engine.step(Action::MoveLeft).unwrap();
        engine.step(Action::MoveLeft).unwrap();
        assert_eq!(engine.stats.illegal_moves, 2);
        assert!(!engine.terminal);

        engine.reset(1, LearningMode::Training);
        assert_eq!(engine.records.games_played, 2);
        assert_eq!(engine.records.accumulated_illegal_moves, 2);
        assert_eq!(engine.records.best_score, 0);
        assert_eq!(engine.average_illegal_moves(), 1.0);

        // A finished game is folded once, at game over.
        engine.stats.illegal_moves = 4;
        engine.end_game();
        engine.reset(2, LearningMode::Training);
        assert_eq!(engine.records.accumulated_illegal_moves, 6);
    }

    #[test]
    fn test_cell_at_bounds() {
        let engine = started(0);
        assert!(engine.cell_at(0, 0).is_ok());
        assert!(engine.cell_at(9, 19).is_ok());
        assert_eq!(
            engine.cell_at(10, 0),
            Err(EngineError::CellOutOfBounds {
                x: 10,
                y: 0,
                width: 10,
                height: 20
            })
        );
        assert!(engine.cell_at(0, -1).is_err());
    }

    #[test]
    fn test_step_id_rejects_unknown_action() {
        let mut engine = started(0);
        assert_eq!(engine.step_id(5), Err(EngineError::InvalidAction(5)));
        assert!(engine.step_id(4).is_ok());
    }
}
