//! Move validation as a small transaction.
//!
//! ```text
//! Idle --validate--> Validated --apply--> Applied --commit---> Committed
//!                                                 \--rollback-> RolledBack
//! ```
//!
//! `commit` runs the self-check itself: a move that leaves the mover's
//! General attacked ends in `RolledBack` whichever path drives it.
//!
//! [`Position`] owns the board and the attack index together; the only way
//! to change either is a [`Transaction`] over it. A transaction dropped while
//! still `Applied` rolls itself back, so a trial move can never leak.

use tracing::{debug, trace};

use crate::attack::{attackers, AttackIndex};
use crate::board::{Board, Undo};
use crate::config::GameConfig;
use crate::error::Rejection;
use crate::piece::{Piece, Side};
use crate::topology::{Cell, CellSet};

/// Where a transaction is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransactionState {
    Idle,
    Validated,
    Applied,
    Committed,
    RolledBack,
}

/// Result of an accepted move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Source equals destination: nothing on the board changed.
    Pass,
    /// The piece was relocated, possibly capturing.
    Moved { piece: Piece, captured: Option<Piece> },
}

/// Board plus the attack index derived from it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    board: Board,
    attacks: AttackIndex,
}

impl Position {
    /// Wrap a board, building its attack index.
    pub fn new(board: Board) -> Position {
        let attacks = AttackIndex::build(&board);
        Position { board, attacks }
    }

    /// The standard starting position.
    pub fn standard() -> Position {
        Position::new(Board::standard())
    }

    pub fn with_config(config: &GameConfig) -> Position {
        Position::new(Board::setup(config))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn attacks(&self) -> &AttackIndex {
        &self.attacks
    }

    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<Piece> {
        self.board.occupant(cell)
    }

    /// Current destination set of the piece on `cell`.
    pub fn destinations(&self, cell: Cell) -> CellSet {
        match self.board.occupant(cell) {
            Some(piece) => self.attacks.destinations_from(piece.side, cell),
            None => CellSet::EMPTY,
        }
    }

    /// Validate and play a move for `side`.
    ///
    /// On `Err` the position is exactly as before the call.
    pub fn try_move(&mut self, side: Side, from: Cell, to: Cell) -> Result<MoveOutcome, Rejection> {
        if from == to {
            return Ok(MoveOutcome::Pass);
        }

        let mut tx = Transaction::begin(self, side, from, to);
        tx.validate()?;
        tx.apply();
        tx.commit()
    }

    /// Would `side` be allowed to play `from`-`to`? Runs the full
    /// transaction and always rolls back.
    pub fn is_legal(&mut self, side: Side, from: Cell, to: Cell) -> bool {
        if from == to {
            return true;
        }
        let mut tx = Transaction::begin(self, side, from, to);
        if tx.validate().is_err() {
            return false;
        }
        tx.apply();
        let legal = !tx.exposes_general();
        tx.rollback();
        legal
    }

    /// Every non-pass move `side` may legally play, in cell order.
    pub fn legal_moves(&mut self, side: Side) -> Vec<(Cell, Cell)> {
        let candidates: Vec<(Cell, Cell)> = self
            .attacks
            .attacks_of(side)
            .iter()
            .flat_map(|(&from, dests)| dests.iter().map(move |to| (from, to)))
            .collect();
        candidates
            .into_iter()
            .filter(|&(from, to)| self.is_legal(side, from, to))
            .collect()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

/// One attempt to move a piece.
#[derive(Debug)]
pub struct Transaction<'a> {
    position: &'a mut Position,
    side: Side,
    from: Cell,
    to: Cell,
    state: TransactionState,
    undo: Option<Undo>,
}

impl<'a> Transaction<'a> {
    pub fn begin(position: &'a mut Position, side: Side, from: Cell, to: Cell) -> Transaction<'a> {
        Transaction {
            position,
            side,
            from,
            to,
            state: TransactionState::Idle,
            undo: None,
        }
    }

    #[inline]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Idle -> Validated. Checks ownership and reachability against the
    /// attack index.
    pub fn validate(&mut self) -> Result<(), Rejection> {
        assert_eq!(self.state, TransactionState::Idle, "validate called twice");
        let (side, from, to) = (self.side, self.from, self.to);

        let piece = self
            .position
            .board
            .occupant(from)
            .ok_or(Rejection::EmptySource(from))
            .inspect_err(|e| debug!(%side, "rejected: {e}"))?;
        if piece.side != side {
            let e = Rejection::WrongSide { cell: from, side };
            debug!(%side, "rejected: {e}");
            return Err(e);
        }
        if !self.position.attacks.destinations_from(side, from).contains(to) {
            let e = Rejection::Unreachable { from, to };
            debug!(%side, "rejected: {e}");
            return Err(e);
        }

        self.state = TransactionState::Validated;
        Ok(())
    }

    /// Validated -> Applied. Relocates the piece; the attack index is not
    /// touched yet.
    pub fn apply(&mut self) {
        assert_eq!(self.state, TransactionState::Validated, "apply before validate");
        self.undo = Some(self.position.board.apply(self.from, self.to));
        self.state = TransactionState::Applied;
    }

    /// Is the mover's General attacked in the applied position?
    ///
    /// The opponent's reach is recomputed on the new occupancy, so a move
    /// that opens a line (or supplies a Cannon screen) is caught.
    pub fn exposes_general(&self) -> bool {
        assert_eq!(self.state, TransactionState::Applied, "nothing applied");
        let board = &self.position.board;
        match board.general_cell(self.side) {
            Some(general) => !attackers(board, self.side.opponent(), general).is_empty(),
            None => false,
        }
    }

    /// Applied -> Committed, refreshing the attack index mover first.
    ///
    /// A move that leaves the mover's General attacked goes to RolledBack
    /// instead and is reported as [`Rejection::ExposesGeneral`].
    pub fn commit(mut self) -> Result<MoveOutcome, Rejection> {
        assert_eq!(self.state, TransactionState::Applied, "commit before apply");
        let (side, from, to) = (self.side, self.from, self.to);
        if self.exposes_general() {
            self.restore();
            debug!(%side, %from, %to, "rejected: general left in check");
            return Err(Rejection::ExposesGeneral { from, to });
        }

        let undo = self.undo.expect("applied transaction without undo record");
        let position = &mut *self.position;
        position.attacks.rebuild_side(&position.board, self.side);
        position.attacks.rebuild_side(&position.board, self.side.opponent());
        if cfg!(debug_assertions) {
            position.board.assert_consistent();
        }
        self.state = TransactionState::Committed;

        let board = &position.board;
        let piece = board.piece(undo.moved);
        let captured = undo.captured.map(|id| board.piece(id));
        trace!(%side, %from, %to, ?captured, "committed");
        Ok(MoveOutcome::Moved { piece, captured })
    }

    /// Applied -> RolledBack. Restores occupancy and location indexes.
    pub fn rollback(mut self) {
        assert_eq!(self.state, TransactionState::Applied, "rollback before apply");
        self.restore();
    }

    fn restore(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.position.board.undo(&undo);
        }
        self.state = TransactionState::RolledBack;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.state == TransactionState::Applied {
            self.restore();
        }
    }
}
