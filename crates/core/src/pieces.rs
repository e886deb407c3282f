//! Pieces module - tetromino templates and rotation rules
//!
//! Every shape is stored as four indices into a 2-column x 4-row template grid
//! (index -> column `index % 2`, row `index / 2`). A spawned piece carries the
//! absolute board coordinates of its four blocks; rotation works on those
//! coordinates directly, so there is no separate rotation state.

use crate::board::Board;
use crate::types::{PieceKind, TEMPLATE_WIDTH};

/// Absolute (x, y) coordinate of a single block
pub type Block = (i32, i32);

/// Template indices per piece kind, in tag order (I, S, Z, T, L, J, O)
const TEMPLATES: [[u8; 4]; 7] = [
    [1, 3, 5, 7], // I
    [2, 4, 5, 7], // S
    [3, 5, 4, 6], // Z
    [3, 5, 4, 7], // T
    [2, 3, 5, 7], // L
    [3, 5, 7, 6], // J
    [2, 3, 4, 5], // O
];

/// Template offsets (column, row) for a piece kind
pub fn template_offsets(kind: PieceKind) -> [Block; 4] {
    let template = TEMPLATES[(kind.tag() - 1) as usize];
    template.map(|index| {
        (
            (index % TEMPLATE_WIDTH) as i32,
            (index / TEMPLATE_WIDTH) as i32,
        )
    })
}

/// How a piece kind reacts to a rotate action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRule {
    /// Quarter turn of every block around the second listed block
    Pivot,
    /// Two-state vertical/horizontal toggle for the straight piece
    LineToggle,
    /// All orientations are identical
    Fixed,
}

/// Rotation rule for a piece kind
pub fn rotation_rule(kind: PieceKind) -> RotationRule {
    match kind {
        PieceKind::I => RotationRule::LineToggle,
        PieceKind::O => RotationRule::Fixed,
        PieceKind::S | PieceKind::Z | PieceKind::T | PieceKind::L | PieceKind::J => {
            RotationRule::Pivot
        }
    }
}

/// Active falling piece: its kind and the absolute position of each block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub blocks: [Block; 4],
}

impl Tetromino {
    /// Create a new tetromino with its template placed at `origin`
    pub fn spawn(kind: PieceKind, origin: Block) -> Self {
        let (ox, oy) = origin;
        Self {
            kind,
            blocks: template_offsets(kind).map(|(dx, dy)| (ox + dx, oy + dy)),
        }
    }

    /// Copy shifted by (dx, dy)
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            blocks: self.blocks.map(|(x, y)| (x + dx, y + dy)),
        }
    }

    /// Copy rotated clockwise according to the kind's rotation rule
    ///
    /// The result is not checked against the board.
    pub fn rotated(&self) -> Self {
        let blocks = match rotation_rule(self.kind) {
            RotationRule::Fixed => self.blocks,
            RotationRule::Pivot => {
                let (px, py) = self.blocks[1];
                self.blocks.map(|(x, y)| (px - (y - py), py + (x - px)))
            }
            RotationRule::LineToggle => {
                let (px, py) = self.blocks[1];
                let vertical = self.blocks[0].0 == px;
                let mut out = self.blocks;
                for (i, block) in out.iter_mut().enumerate() {
                    let step = i as i32 - 1;
                    *block = if vertical {
                        (px + step, py)
                    } else {
                        (px, py + step)
                    };
                }
                out
            }
        };
        Self {
            kind: self.kind,
            blocks,
        }
    }

    /// Check that every block sits on a free cell
    pub fn fits(&self, board: &Board) -> bool {
        self.blocks.iter().all(|&(x, y)| board.is_free(x, y))
    }

    /// Lowest row reached by the piece
    pub fn bottom(&self) -> i32 {
        self.blocks.iter().map(|&(_, y)| y).max().unwrap_or(0)
    }

    /// Leftmost column reached by the piece
    pub fn left(&self) -> i32 {
        self.blocks.iter().map(|&(x, _)| x).min().unwrap_or(0)
    }

    /// Occupied cells in a canonical order, for comparisons that ignore block order
    pub fn sorted_blocks(&self) -> [Block; 4] {
        let mut blocks = self.blocks;
        blocks.sort_unstable();
        blocks
    }
}
