//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used by the simulation engine and
//! its drivers. All types are pure data with no external dependencies, so they
//! can be shared by the engine, a rendering consumer, or an agent loop.
//!
//! # Board Dimensions
//!
//! Canonical playfield dimensions (alternate sizes are configurable in the core):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, 0 at the top)
//! - **Spawn origin**: column 4, row 0
//!
//! # Tick Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAMES_PER_FALL` | 20 | Ticks between two forced descents |
//! | `ACTION_COUNT` | 5 | Size of the discrete action space |
//!
//! # Examples
//!
//! ```
//! use tetris_sim_types::{Action, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_tag(4).unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! let action = Action::from_id(1).unwrap();
//! assert_eq!(action, Action::MoveLeft);
//! assert_eq!(Action::from_str("noop"), Some(Action::NoOp));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Largest configurable board width
pub const MAX_BOARD_WIDTH: u8 = 64;

/// Largest configurable board height
pub const MAX_BOARD_HEIGHT: u8 = 64;

/// Number of ticks between two forced descents of the active piece
pub const FRAMES_PER_FALL: u32 = 20;

/// Number of discrete actions accepted by `step`
pub const ACTION_COUNT: usize = 5;

/// Spawn origin column (added to every template offset)
pub const SPAWN_COLUMN: i32 = 4;

/// Spawn origin row
pub const SPAWN_ROW: i32 = 0;

/// Piece templates are laid out in a 2-column grid...
pub const TEMPLATE_WIDTH: u8 = 2;

/// ...of 4 rows
pub const TEMPLATE_HEIGHT: u8 = 4;

/// A cell on the board
///
/// - `0`: empty
/// - `1..=7`: filled by the piece kind with that tag (see [`PieceKind::tag`])
pub type Cell = u8;

/// Empty cell value
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds, in tag order
///
/// The tag is what gets written into the grid and is used by consumers only
/// for coloring:
/// - **I** (1): cyan, straight line
/// - **S** (2): green
/// - **Z** (3): red
/// - **T** (4): magenta
/// - **L** (5): orange
/// - **J** (6): blue
/// - **O** (7): yellow, 2x2 square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    S,
    Z,
    T,
    L,
    J,
    O,
}

impl PieceKind {
    /// All kinds in tag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
    ];

    /// Grid tag of this kind (1..=7)
    pub fn tag(&self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::S => 2,
            PieceKind::Z => 3,
            PieceKind::T => 4,
            PieceKind::L => 5,
            PieceKind::J => 6,
            PieceKind::O => 7,
        }
    }

    /// Look up a kind from its grid tag
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_tag(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_tag(7), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_tag(0), None);
    /// assert_eq!(PieceKind::from_tag(8), None);
    /// ```
    pub fn from_tag(tag: Cell) -> Option<Self> {
        match tag {
            1..=7 => Some(Self::ALL[(tag - 1) as usize]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "o" => Some(PieceKind::O),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::O => "o",
        }
    }
}

/// Discrete actions accepted by the engine, one per tick
///
/// Both the human-input loop and agent loops produce these. The numeric ids
/// are part of the agent-facing contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move piece one column right (id 0)
    MoveRight,
    /// Move piece one column left (id 1)
    MoveLeft,
    /// Rotate piece clockwise (id 2)
    RotateCw,
    /// Force a descent at the end of this tick (id 3)
    SoftDrop,
    /// Let gravity run (id 4)
    NoOp,
}

impl Action {
    /// All actions in id order
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::MoveRight,
        Action::MoveLeft,
        Action::RotateCw,
        Action::SoftDrop,
        Action::NoOp,
    ];

    /// Numeric action id (0..=4)
    pub fn id(&self) -> u64 {
        match self {
            Action::MoveRight => 0,
            Action::MoveLeft => 1,
            Action::RotateCw => 2,
            Action::SoftDrop => 3,
            Action::NoOp => 4,
        }
    }

    /// Map an action id back to an action
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::Action;
    ///
    /// assert_eq!(Action::from_id(0), Some(Action::MoveRight));
    /// assert_eq!(Action::from_id(3), Some(Action::SoftDrop));
    /// assert_eq!(Action::from_id(5), None);
    /// ```
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(id).ok()?).copied()
    }

    /// Parse action from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveright" => Some(Action::MoveRight),
            "moveleft" => Some(Action::MoveLeft),
            "rotatecw" | "rotate" => Some(Action::RotateCw),
            "softdrop" => Some(Action::SoftDrop),
            "noop" => Some(Action::NoOp),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveRight => "moveRight",
            Action::MoveLeft => "moveLeft",
            Action::RotateCw => "rotateCw",
            Action::SoftDrop => "softDrop",
            Action::NoOp => "noOp",
        }
    }
}

/// Which random stream a game draws from
///
/// The same numeric seed yields different, individually reproducible piece
/// sequences per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LearningMode {
    #[default]
    Training,
    Validation,
}

impl LearningMode {
    /// Stable numeric tag mixed into the RNG seed
    pub fn tag(&self) -> u64 {
        match self {
            LearningMode::Training => 0,
            LearningMode::Validation => 1,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "training" | "train" => Some(LearningMode::Training),
            "validation" | "valid" => Some(LearningMode::Validation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::Training => "training",
            LearningMode::Validation => "validation",
        }
    }
}
