//! Error types for the rules engine.
//!
//! Only malformed coordinates are errors in the usual sense. A refused move
//! is an expected outcome and is reported through [`Rejection`], which the
//! game layer wraps into [`MoveError`].

use thiserror::Error;

use crate::piece::Side;
use crate::topology::Cell;

/// A square string that does not name one of the 90 board cells.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("empty coordinate")]
    Empty,

    /// File letter outside `a`-`i`.
    #[error("invalid file {0:?} (expected a-i)")]
    File(char),

    /// Row part missing, not a number, or outside `1`-`10`.
    #[error("invalid row {0:?} (expected 1-10)")]
    Row(String),
}

/// Why the move validator refused a candidate move.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no piece on {0}")]
    EmptySource(Cell),

    #[error("piece on {cell} does not belong to {side}")]
    WrongSide { cell: Cell, side: Side },

    #[error("{to} is not reachable from {from}")]
    Unreachable { from: Cell, to: Cell },

    /// The move would leave the mover's own General attacked.
    #[error("{from}-{to} leaves the general in check")]
    ExposesGeneral { from: Cell, to: Cell },
}

/// Failure of a game-level move request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    Rejected(#[from] Rejection),
}
