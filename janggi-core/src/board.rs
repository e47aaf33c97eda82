//! Occupancy and per-side location index.
//!
//! The board keeps two views of the same facts that must always agree:
//!
//! ```text
//! squares[cell]        -> Option<PieceId>      which piece stands on a cell
//! locations[side][id]  -> Cell                 where a live piece stands
//! ```
//!
//! Pieces get a [`PieceId`] when placed and keep it for the whole game; a
//! captured piece simply drops out of its side's location index. Each side's
//! General cell is cached next to its index.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::{Formation, GameConfig};
use crate::piece::{Piece, PieceKind, Side};
use crate::topology::{Cell, CELL_COUNT, FILES, ROWS};

/// Stable identity of a piece within one board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct PieceId(u8);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where one side's live pieces stand.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LocationIndex {
    cells: BTreeMap<PieceId, Cell>,
    general: Option<Cell>,
}

impl LocationIndex {
    #[inline]
    pub fn get(&self, id: PieceId) -> Option<Cell> {
        self.cells.get(&id).copied()
    }

    /// The cached General cell, `None` once the General has been captured.
    #[inline]
    pub fn general(&self) -> Option<Cell> {
        self.general
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Cell)> + '_ {
        self.cells.iter().map(|(&id, &cell)| (id, cell))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn insert(&mut self, id: PieceId, piece: Piece, cell: Cell) {
        self.cells.insert(id, cell);
        if piece.kind == PieceKind::General {
            self.general = Some(cell);
        }
    }

    fn remove(&mut self, id: PieceId, piece: Piece) {
        self.cells.remove(&id);
        if piece.kind == PieceKind::General {
            self.general = None;
        }
    }
}

/// Undo information for a relocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    pub from: Cell,
    pub to: Cell,
    pub moved: PieceId,
    /// Enemy piece removed from `to`, if any.
    pub captured: Option<PieceId>,
}

/// Piece placement on the 9×10 board.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    squares: [Option<PieceId>; CELL_COUNT],
    roster: Vec<Piece>,
    locations: [LocationIndex; 2],
}

impl Board {
    /// Create a board with no pieces.
    pub fn empty() -> Board {
        Board {
            squares: [None; CELL_COUNT],
            roster: Vec::with_capacity(32),
            locations: [LocationIndex::default(), LocationIndex::default()],
        }
    }

    /// The standard starting position with default formations.
    pub fn standard() -> Board {
        Board::setup(&GameConfig::default())
    }

    /// The starting position for the given formations.
    pub fn setup(config: &GameConfig) -> Board {
        let mut board = Board::empty();
        board.place_side(Side::Red, config.red);
        board.place_side(Side::Blue, config.blue);
        board
    }

    fn place_side(&mut self, side: Side, formation: Formation) {
        use PieceKind::*;

        // Rows counted from the side's own edge
        let (back, general_row, cannon_row, soldier_row) = match side {
            Side::Red => (0, 1, 2, 3),
            Side::Blue => (ROWS - 1, ROWS - 2, ROWS - 3, ROWS - 4),
        };
        let [b, c, g, h] = formation.back_rank();
        let back_rank = [Chariot, b, c, Guard, General, Guard, g, h, Chariot];

        for (file, kind) in (0..FILES).zip(back_rank) {
            if kind == General {
                continue;
            }
            self.place_at(file, back, Piece::new(side, kind));
        }
        self.place_at(4, general_row, Piece::new(side, General));
        self.place_at(1, cannon_row, Piece::new(side, Cannon));
        self.place_at(7, cannon_row, Piece::new(side, Cannon));
        for file in (0..FILES).step_by(2) {
            self.place_at(file, soldier_row, Piece::new(side, Soldier));
        }
    }

    fn place_at(&mut self, file: u8, row: u8, piece: Piece) {
        if let Some(cell) = Cell::new(file, row) {
            self.place(cell, piece);
        }
    }

    /// Put a new piece on an empty cell.
    ///
    /// # Panics
    ///
    /// If the cell is occupied, or if `piece` is a second General for its side.
    pub fn place(&mut self, cell: Cell, piece: Piece) -> PieceId {
        assert!(self.squares[cell.index()].is_none(), "{cell} is already occupied");
        assert!(
            piece.kind != PieceKind::General || self.general_cell(piece.side).is_none(),
            "{} already has a general",
            piece.side
        );
        let id = PieceId(u8::try_from(self.roster.len()).expect("piece roster overflow"));
        self.roster.push(piece);
        self.squares[cell.index()] = Some(id);
        self.locations[piece.side.index()].insert(id, piece, cell);
        id
    }

    /// Identity of the piece on `cell`.
    #[inline]
    pub fn piece_id_at(&self, cell: Cell) -> Option<PieceId> {
        self.squares[cell.index()]
    }

    /// The piece on `cell`, if any.
    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<Piece> {
        self.piece_id_at(cell).map(|id| self.piece(id))
    }

    #[inline]
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.squares[cell.index()].is_none()
    }

    /// Look up a piece by identity.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Piece {
        self.roster[id.index()]
    }

    /// Current cell of a piece, `None` once captured.
    pub fn location(&self, id: PieceId) -> Option<Cell> {
        self.locations[self.piece(id).side.index()].get(id)
    }

    /// The location index of one side.
    #[inline]
    pub fn locations(&self, side: Side) -> &LocationIndex {
        &self.locations[side.index()]
    }

    #[inline]
    pub fn general_cell(&self, side: Side) -> Option<Cell> {
        self.locations[side.index()].general()
    }

    /// Cells occupied by `side`, in piece order.
    pub fn occupied(&self, side: Side) -> impl Iterator<Item = Cell> + '_ {
        self.locations[side.index()].iter().map(|(_, cell)| cell)
    }

    /// Number of live pieces of `side`.
    #[inline]
    pub fn piece_count(&self, side: Side) -> usize {
        self.locations[side.index()].len()
    }

    // ========== Apply & Undo ==========

    /// Move the piece on `from` to `to`, capturing whatever stands there.
    ///
    /// Does NOT validate: the caller must have checked the move.
    pub(crate) fn apply(&mut self, from: Cell, to: Cell) -> Undo {
        let moved = self.squares[from.index()]
            .take()
            .expect("relocation from an empty cell");
        let piece = self.piece(moved);

        let captured = self.squares[to.index()].replace(moved);
        if let Some(cap) = captured {
            let cap_piece = self.piece(cap);
            debug_assert_ne!(cap_piece.side, piece.side, "capture of a friendly piece");
            self.locations[cap_piece.side.index()].remove(cap, cap_piece);
        }
        self.locations[piece.side.index()].insert(moved, piece, to);

        Undo { from, to, moved, captured }
    }

    /// Reverse an [`Board::apply`]. Undos must be replayed newest first.
    pub(crate) fn undo(&mut self, undo: &Undo) {
        let piece = self.piece(undo.moved);
        self.squares[undo.from.index()] = Some(undo.moved);
        self.squares[undo.to.index()] = undo.captured;
        self.locations[piece.side.index()].insert(undo.moved, piece, undo.from);
        if let Some(cap) = undo.captured {
            let cap_piece = self.piece(cap);
            self.locations[cap_piece.side.index()].insert(cap, cap_piece, undo.to);
        }
    }

    /// Check that occupancy and the location indexes agree.
    ///
    /// # Panics
    ///
    /// On any disagreement; that is a bug in this crate, not a user error.
    pub fn assert_consistent(&self) {
        let mut indexed = 0;
        for side in Side::BOTH {
            let index = &self.locations[side.index()];
            for (id, cell) in index.iter() {
                assert_eq!(self.piece(id).side, side, "{id:?} indexed under the wrong side");
                assert_eq!(self.squares[cell.index()], Some(id), "index entry {id:?} -> {cell} is stale");
                indexed += 1;
            }
            let general = index
                .iter()
                .find(|&(id, _)| self.piece(id).kind == PieceKind::General)
                .map(|(_, cell)| cell);
            assert_eq!(index.general(), general, "{side} general cache is stale");
        }
        let occupied = self.squares.iter().filter(|s| s.is_some()).count();
        assert_eq!(occupied, indexed, "occupied cells missing from the location index");
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Plain-text diagram, row 10 at the top. Red pieces are upper case.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            write!(f, "{:>2} ", row + 1)?;
            for file in 0..FILES {
                let symbol = Cell::new(file, row)
                    .and_then(|cell| self.occupant(cell))
                    .map_or('.', Piece::symbol);
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in 0..FILES {
            write!(f, " {}", (b'a' + file) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Cell {
        s.parse().unwrap()
    }

    fn kind_at(board: &Board, s: &str) -> Option<(Side, PieceKind)> {
        board.occupant(c(s)).map(|p| (p.side, p.kind))
    }

    #[test]
    fn test_standard_setup() {
        let board = Board::standard();
        board.assert_consistent();
        assert_eq!(board.piece_count(Side::Red), 16);
        assert_eq!(board.piece_count(Side::Blue), 16);
        assert_eq!(board.general_cell(Side::Red), Some(c("e2")));
        assert_eq!(board.general_cell(Side::Blue), Some(c("e9")));

        assert_eq!(kind_at(&board, "a1"), Some((Side::Red, PieceKind::Chariot)));
        assert_eq!(kind_at(&board, "b1"), Some((Side::Red, PieceKind::Elephant)));
        assert_eq!(kind_at(&board, "c1"), Some((Side::Red, PieceKind::Horse)));
        assert_eq!(kind_at(&board, "d1"), Some((Side::Red, PieceKind::Guard)));
        assert_eq!(kind_at(&board, "e1"), None);
        assert_eq!(kind_at(&board, "b3"), Some((Side::Red, PieceKind::Cannon)));
        assert_eq!(kind_at(&board, "i4"), Some((Side::Red, PieceKind::Soldier)));
        assert_eq!(kind_at(&board, "h10"), Some((Side::Blue, PieceKind::Horse)));
        assert_eq!(kind_at(&board, "h8"), Some((Side::Blue, PieceKind::Cannon)));
        assert_eq!(kind_at(&board, "e7"), Some((Side::Blue, PieceKind::Soldier)));
        assert_eq!(kind_at(&board, "b7"), None);
    }

    #[test]
    fn test_formation_setup() {
        let config = GameConfig { red: Formation::MaSangSangMa, blue: Formation::SangMaMaSang };
        let board = Board::setup(&config);
        board.assert_consistent();
        assert_eq!(kind_at(&board, "b1"), Some((Side::Red, PieceKind::Horse)));
        assert_eq!(kind_at(&board, "c1"), Some((Side::Red, PieceKind::Elephant)));
        assert_eq!(kind_at(&board, "g1"), Some((Side::Red, PieceKind::Elephant)));
        assert_eq!(kind_at(&board, "h1"), Some((Side::Red, PieceKind::Horse)));
        assert_eq!(kind_at(&board, "b10"), Some((Side::Blue, PieceKind::Elephant)));
        assert_eq!(kind_at(&board, "g10"), Some((Side::Blue, PieceKind::Horse)));
    }

    #[test]
    fn test_place_and_lookup() {
        let mut board = Board::empty();
        let id = board.place(c("e5"), Piece::new(Side::Red, PieceKind::Chariot));
        assert_eq!(board.piece_id_at(c("e5")), Some(id));
        assert_eq!(board.location(id), Some(c("e5")));
        assert_eq!(board.piece(id), Piece::new(Side::Red, PieceKind::Chariot));
        assert!(board.general_cell(Side::Red).is_none());
        board.assert_consistent();
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_place_on_occupied_cell_panics() {
        let mut board = Board::empty();
        board.place(c("e5"), Piece::new(Side::Red, PieceKind::Chariot));
        board.place(c("e5"), Piece::new(Side::Blue, PieceKind::Cannon));
    }

    #[test]
    fn test_apply_capture_and_undo() {
        let mut board = Board::empty();
        let red = board.place(c("e5"), Piece::new(Side::Red, PieceKind::Chariot));
        let blue = board.place(c("e8"), Piece::new(Side::Blue, PieceKind::Horse));
        let before = board.clone();

        let undo = board.apply(c("e5"), c("e8"));
        assert_eq!(undo.captured, Some(blue));
        assert_eq!(board.location(red), Some(c("e8")));
        assert_eq!(board.location(blue), None);
        assert_eq!(board.piece_count(Side::Blue), 0);
        assert!(board.is_empty(c("e5")));
        board.assert_consistent();

        board.undo(&undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_general_cache_follows_moves() {
        let mut board = Board::empty();
        board.place(c("e2"), Piece::new(Side::Red, PieceKind::General));
        let undo = board.apply(c("e2"), c("e3"));
        assert_eq!(board.general_cell(Side::Red), Some(c("e3")));
        board.undo(&undo);
        assert_eq!(board.general_cell(Side::Red), Some(c("e2")));
    }

    #[test]
    fn test_captured_general_clears_cache() {
        let mut board = Board::empty();
        board.place(c("e9"), Piece::new(Side::Blue, PieceKind::General));
        board.place(c("e5"), Piece::new(Side::Red, PieceKind::Chariot));
        let undo = board.apply(c("e5"), c("e9"));
        assert_eq!(board.general_cell(Side::Blue), None);
        board.assert_consistent();
        board.undo(&undo);
        assert_eq!(board.general_cell(Side::Blue), Some(c("e9")));
        board.assert_consistent();
    }

    #[test]
    fn test_display() {
        let text = Board::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "10  r e h a . a e h r");
        assert_eq!(lines[1], " 9  . . . . g . . . .");
        assert_eq!(lines[9], " 1  R E H A . A E H R");
        assert_eq!(lines[10], "    a b c d e f g h i");
    }
}
