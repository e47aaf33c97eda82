//! The game: turn order, win detection and the string-coordinate API.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::checkmate;
use crate::config::GameConfig;
use crate::error::{CoordinateError, MoveError};
use crate::piece::{Piece, Side};
use crate::topology::{cell_of, Cell, CellSet};
use crate::validator::{MoveOutcome, Position};

/// Game status as reported to callers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[default]
    Unfinished,
    RedWon,
    BlueWon,
}

impl GameState {
    /// The state in which `side` has won.
    pub const fn won_by(side: Side) -> GameState {
        match side {
            Side::Red => GameState::RedWon,
            Side::Blue => GameState::BlueWon,
        }
    }

    pub const fn winner(self) -> Option<Side> {
        match self {
            GameState::Unfinished => None,
            GameState::RedWon => Some(Side::Red),
            GameState::BlueWon => Some(Side::Blue),
        }
    }

    #[inline]
    pub const fn is_finished(self) -> bool {
        !matches!(self, GameState::Unfinished)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameState::Unfinished => "UNFINISHED",
            GameState::RedWon => "RED_WON",
            GameState::BlueWon => "BLUE_WON",
        })
    }
}

/// A Janggi game in progress. Blue moves first.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JanggiGame {
    position: Position,
    to_move: Side,
    state: GameState,
}

impl JanggiGame {
    /// Standard starting position, Blue to move.
    pub fn new() -> JanggiGame {
        JanggiGame::from_position(Position::standard(), Side::Blue)
    }

    pub fn with_config(config: &GameConfig) -> JanggiGame {
        JanggiGame::from_position(Position::with_config(config), Side::Blue)
    }

    /// Resume from an arbitrary position with `to_move` on turn.
    ///
    /// The state starts as unfinished even if the position is already won;
    /// results are only decided by moves.
    pub fn from_position(position: Position, to_move: Side) -> JanggiGame {
        JanggiGame { position, to_move, state: GameState::Unfinished }
    }

    #[inline]
    pub fn game_state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.to_move
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Play `from`-`to` for the side on turn. `from == to` passes.
    pub fn try_move(&mut self, from: &str, to: &str) -> Result<MoveOutcome, MoveError> {
        let from = cell_of(from)?;
        let to = cell_of(to)?;
        self.play(from, to)
    }

    /// Cell-typed form of [`try_move`](Self::try_move).
    pub fn play(&mut self, from: Cell, to: Cell) -> Result<MoveOutcome, MoveError> {
        if self.state.is_finished() {
            return Err(MoveError::GameOver);
        }
        let mover = self.to_move;
        let outcome = self.position.try_move(mover, from, to)?;
        self.to_move = mover.opponent();

        if let MoveOutcome::Moved { .. } = outcome {
            let opponent = mover.opponent();
            let general_lost = self.position.board().general_cell(opponent).is_none();
            if general_lost || checkmate::is_checkmate(&mut self.position, opponent) {
                self.state = GameState::won_by(mover);
                info!(winner = %mover, %from, %to, general_lost, "game over");
            }
        } else {
            debug!(side = %mover, "pass");
        }
        Ok(outcome)
    }

    /// Boolean form of [`try_move`](Self::try_move): `true` if the move
    /// was played.
    pub fn make_move(&mut self, from: &str, to: &str) -> bool {
        self.try_move(from, to).is_ok()
    }

    /// Is `side`'s General attacked in the current position?
    pub fn is_in_check(&self, side: Side) -> bool {
        checkmate::is_in_check(&self.position, side)
    }

    /// Is `side` checkmated in the current position?
    pub fn is_checkmate(&mut self, side: Side) -> bool {
        checkmate::is_checkmate(&mut self.position, side)
    }

    /// Piece on the named square, if any.
    pub fn occupant(&self, square: &str) -> Result<Option<Piece>, CoordinateError> {
        Ok(self.position.occupant(cell_of(square)?))
    }

    /// Pseudo-legal destinations of the piece on the named square.
    pub fn destinations(&self, square: &str) -> Result<CellSet, CoordinateError> {
        Ok(self.position.destinations(cell_of(square)?))
    }

    /// Legal non-pass moves for the side on turn. Empty once the game is over.
    pub fn legal_moves(&mut self) -> Vec<(Cell, Cell)> {
        if self.state.is_finished() {
            return Vec::new();
        }
        self.position.legal_moves(self.to_move)
    }
}

impl Default for JanggiGame {
    fn default() -> Self {
        Self::new()
    }
}
