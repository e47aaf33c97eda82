//! Janggi (Korean chess) rules engine.
//!
//! # Board
//!
//! ```text
//! 10  r e h a . a e h r      Blue (lower case) starts on rows 7-10
//!  9  . . . . g . . . .      and moves first.
//!  8  . c . . . . . c .
//!  7  s . s . s . s . s
//!  6  . . . . . . . . .
//!  5  . . . . . . . . .
//!  4  S . S . S . S . S      Red (upper case) starts on rows 1-4.
//!  3  . C . . . . . C .
//!  2  . . . . G . . . .
//!  1  R E H A . A E H R
//!     a b c d e f g h i
//! ```
//!
//! Cells are indexed `row * 9 + file` with row 0 being rank 1. The two
//! palaces span files d-f on rows 1-3 and 8-10; their corners and centres
//! are joined by diagonal lines.
//!
//! # Layers
//!
//! ```text
//! topology   cells, directions, palaces, CellSet bitsets
//! piece      sides, kinds, movement descriptors
//! board      occupancy + per-side location index, apply/undo
//! traversal  descriptor interpreter: destinations of one piece
//! attack     per-side attack maps and their inverses
//! validator  Position + move Transaction (validate/apply/commit/rollback)
//! checkmate  check detection, escape/capture/block search
//! game       turn order, win detection, string coordinates
//! ```

pub mod attack;
pub mod board;
pub mod checkmate;
pub mod config;
pub mod error;
pub mod game;
pub mod piece;
pub mod topology;
pub mod traversal;
pub mod validator;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use attack::AttackIndex;
pub use board::Board;
pub use checkmate::{is_checkmate, is_in_check, Resolution};
pub use config::{Formation, GameConfig};
pub use error::{CoordinateError, MoveError, Rejection};
pub use game::{GameState, JanggiGame};
pub use piece::{Piece, PieceKind, Side};
pub use topology::{cell_of, Cell, CellSet, Direction};
pub use validator::{MoveOutcome, Position, Transaction, TransactionState};
