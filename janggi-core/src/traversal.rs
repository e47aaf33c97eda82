//! Destination generation.
//!
//! Turns a piece's movement descriptor and the current occupancy into the
//! set of cells the piece can reach in one move (quiet moves and captures).
//! All piece classes share one loop shape and differ only in when a walk
//! stops:
//!
//! - fixed steps: any occupied or off-board cell before the last step
//!   kills the sequence; the last cell must be on the board and not friendly
//! - slide: empty cells accumulate; the first piece ends the walk and is
//!   included only if it is an enemy
//! - screened slide (Cannon): the first piece is the screen and may not be a
//!   Cannon; after it, empty cells accumulate and the next piece ends the
//!   walk, included only if it is an enemy non-Cannon

use crate::board::Board;
use crate::piece::{Movement, Piece, PieceKind, Side};
use crate::topology::{
    neighbor, palace_augmenting_cells, palace_containing, palace_of, Cell, CellSet, Direction,
};

/// All cells the piece on `from` can move to. Empty set if `from` is empty.
pub fn destinations(board: &Board, from: Cell) -> CellSet {
    let Some(piece) = board.occupant(from) else {
        return CellSet::EMPTY;
    };
    let desc = piece.descriptor();

    let mut result = walk(board, piece, from, desc.base);

    if let Some(palace_movement) = desc.palace {
        if let Some(palace_side) = palace_containing(from) {
            if palace_augmenting_cells(palace_side).contains(from) {
                let extra = walk(board, piece, from, palace_movement);
                result = result | (extra & palace_of(palace_side));
            }
        }
    }

    if desc.confined {
        result = result & palace_of(piece.side);
    }
    result
}

fn walk(board: &Board, piece: Piece, from: Cell, movement: Movement) -> CellSet {
    match movement {
        Movement::Steps(sequences) => sequences
            .iter()
            .filter_map(|seq| walk_steps(board, piece.side, from, seq))
            .collect(),
        Movement::Slide { directions, screen: false } => directions
            .iter()
            .fold(CellSet::EMPTY, |acc, &dir| acc | slide(board, piece.side, from, dir)),
        Movement::Slide { directions, screen: true } => directions
            .iter()
            .fold(CellSet::EMPTY, |acc, &dir| acc | screened_slide(board, piece.side, from, dir)),
    }
}

/// Walk one fixed step sequence. Returns the landing cell if legal.
fn walk_steps(board: &Board, side: Side, from: Cell, seq: &[Direction]) -> Option<Cell> {
    let (&last, path) = seq.split_last()?;
    let mut cell = from;
    for &dir in path {
        cell = neighbor(cell, dir)?;
        if !board.is_empty(cell) {
            return None;
        }
    }
    let dest = neighbor(cell, last)?;
    match board.occupant(dest) {
        Some(other) if other.side == side => None,
        _ => Some(dest),
    }
}

fn slide(board: &Board, side: Side, from: Cell, dir: Direction) -> CellSet {
    let mut result = CellSet::EMPTY;
    let mut cursor = neighbor(from, dir);
    while let Some(cell) = cursor {
        match board.occupant(cell) {
            None => result.insert(cell),
            Some(other) => {
                if other.side != side {
                    result.insert(cell);
                }
                break;
            }
        }
        cursor = neighbor(cell, dir);
    }
    result
}

fn screened_slide(board: &Board, side: Side, from: Cell, dir: Direction) -> CellSet {
    let mut result = CellSet::EMPTY;
    let mut screened = false;
    let mut cursor = neighbor(from, dir);
    while let Some(cell) = cursor {
        match board.occupant(cell) {
            None => {
                if screened {
                    result.insert(cell);
                }
            }
            Some(other) if other.kind == PieceKind::Cannon => break,
            Some(other) => {
                if !screened {
                    screened = true;
                } else {
                    if other.side != side {
                        result.insert(cell);
                    }
                    break;
                }
            }
        }
        cursor = neighbor(cell, dir);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind::*;
    use crate::piece::Side::{Blue, Red};

    fn c(s: &str) -> Cell {
        s.parse().unwrap()
    }

    fn set(cells: &[&str]) -> CellSet {
        cells.iter().map(|s| c(s)).collect()
    }

    fn board_with(pieces: &[(&str, Side, PieceKind)]) -> Board {
        let mut board = Board::empty();
        for &(cell, side, kind) in pieces {
            board.place(c(cell), Piece::new(side, kind));
        }
        board
    }

    #[test]
    fn test_empty_cell_has_no_destinations() {
        let board = Board::empty();
        assert!(destinations(&board, c("e5")).is_empty());
    }

    #[test]
    fn test_chariot_stops_at_enemy() {
        let board = board_with(&[("e5", Red, Chariot), ("e8", Blue, Soldier)]);
        let dests = destinations(&board, c("e5"));
        assert!(dests.contains(c("e6")));
        assert!(dests.contains(c("e7")));
        assert!(dests.contains(c("e8")));
        assert!(!dests.contains(c("e9")));
        assert!(!dests.contains(c("e10")));
        // open lines elsewhere
        assert!(dests.contains(c("e1")));
        assert!(dests.contains(c("a5")));
        assert!(dests.contains(c("i5")));
        assert_eq!(dests.len(), 3 + 4 + 8);
    }

    #[test]
    fn test_chariot_stops_before_friend() {
        let board = board_with(&[("a1", Red, Chariot), ("a4", Red, Soldier)]);
        let dests = destinations(&board, c("a1"));
        assert_eq!(dests & set(&["a2", "a3", "a4", "a5"]), set(&["a2", "a3"]));
    }

    #[test]
    fn test_cannon_needs_screen() {
        let board = board_with(&[("b3", Red, Cannon), ("b5", Red, Soldier), ("b7", Blue, Soldier)]);
        let dests = destinations(&board, c("b3"));
        assert!(dests.contains(c("b6")));
        assert!(dests.contains(c("b7")));
        assert!(!dests.contains(c("b4")));
        assert!(!dests.contains(c("b5")));
        assert!(!dests.contains(c("b8")));
        // nothing to jump along the rank or downwards
        assert_eq!(dests, set(&["b6", "b7"]));
    }

    #[test]
    fn test_cannon_cannot_jump_cannon() {
        let board = board_with(&[("e3", Red, Cannon), ("e5", Blue, Cannon), ("e8", Blue, Soldier)]);
        let north: CellSet = destinations(&board, c("e3")) & set(&["e4", "e5", "e6", "e7", "e8", "e9", "e10"]);
        assert!(north.is_empty());
    }

    #[test]
    fn test_cannon_cannot_capture_cannon() {
        let board = board_with(&[("e3", Red, Cannon), ("e5", Red, Soldier), ("e7", Blue, Cannon)]);
        let dests = destinations(&board, c("e3"));
        assert!(dests.contains(c("e6")));
        assert!(!dests.contains(c("e7")));
        assert!(!dests.contains(c("e8")));
    }

    #[test]
    fn test_cannon_does_not_capture_friend() {
        let board = board_with(&[("a1", Red, Cannon), ("a2", Blue, Soldier), ("a5", Red, Horse)]);
        let dests = destinations(&board, c("a1"));
        assert_eq!(dests, set(&["a3", "a4"]));
    }

    #[test]
    fn test_horse_moves_and_blocking() {
        let board = board_with(&[("e5", Red, Horse)]);
        let dests = destinations(&board, c("e5"));
        assert_eq!(dests, set(&["f7", "d7", "g6", "g4", "f3", "d3", "c6", "c4"]));

        // a piece on the first step blocks both sequences through it
        let board = board_with(&[("e5", Red, Horse), ("e6", Blue, Soldier)]);
        let dests = destinations(&board, c("e5"));
        assert!(!dests.contains(c("f7")));
        assert!(!dests.contains(c("d7")));
        assert_eq!(dests.len(), 6);
    }

    #[test]
    fn test_horse_captures_but_not_friends() {
        let board = board_with(&[("e5", Red, Horse), ("f7", Blue, Chariot), ("d7", Red, Soldier)]);
        let dests = destinations(&board, c("e5"));
        assert!(dests.contains(c("f7")));
        assert!(!dests.contains(c("d7")));
    }

    #[test]
    fn test_elephant_moves_and_blocking() {
        let board = board_with(&[("e5", Red, Elephant)]);
        let dests = destinations(&board, c("e5"));
        assert_eq!(dests, set(&["g8", "c8", "h7", "h3", "g2", "c2", "b7", "b3"]));

        // blocked on the diagonal part of the path
        let board = board_with(&[("e5", Red, Elephant), ("f7", Blue, Soldier)]);
        let dests = destinations(&board, c("e5"));
        assert!(!dests.contains(c("g8")));
        assert!(dests.contains(c("c8")));
    }

    #[test]
    fn test_sequence_off_board_fails() {
        let board = board_with(&[("a1", Red, Elephant)]);
        let dests = destinations(&board, c("a1"));
        assert_eq!(dests, set(&["c4", "d3"]));
    }

    #[test]
    fn test_soldier_direction_is_mirrored() {
        let board = board_with(&[("e5", Red, Soldier), ("c6", Blue, Soldier)]);
        assert_eq!(destinations(&board, c("e5")), set(&["e6", "d5", "f5"]));
        assert_eq!(destinations(&board, c("c6")), set(&["c5", "b6", "d6"]));
    }

    #[test]
    fn test_soldier_diagonal_in_enemy_palace() {
        let board = board_with(&[("d8", Red, Soldier)]);
        assert_eq!(destinations(&board, c("d8")), set(&["d9", "c8", "e8", "e9"]));

        // centre of the palace: both forward diagonals
        let board = board_with(&[("e9", Red, Soldier)]);
        assert_eq!(destinations(&board, c("e9")), set(&["e10", "d9", "f9", "d10", "f10"]));

        // e8 is not on a palace diagonal
        let board = board_with(&[("e8", Red, Soldier)]);
        assert_eq!(destinations(&board, c("e8")), set(&["e9", "d8", "f8"]));
    }

    #[test]
    fn test_general_confined_to_palace() {
        let board = board_with(&[("d3", Red, General)]);
        let dests = destinations(&board, c("d3"));
        assert_eq!(dests, set(&["d2", "e3", "e2"]));
        assert!(dests.is_subset(palace_of(Red)));
    }

    #[test]
    fn test_general_at_centre() {
        let board = board_with(&[("e9", Blue, General), ("d10", Blue, Guard), ("f8", Red, Chariot)]);
        let dests = destinations(&board, c("e9"));
        assert_eq!(dests, set(&["e10", "e8", "d9", "f9", "d8", "f10", "f8"]));
    }

    #[test]
    fn test_guard_on_side_cell_has_no_diagonals() {
        let board = board_with(&[("d2", Red, Guard)]);
        assert_eq!(destinations(&board, c("d2")), set(&["d1", "d3", "e2"]));
    }

    #[test]
    fn test_chariot_palace_diagonal() {
        let board = board_with(&[("d1", Red, Chariot), ("d2", Red, Guard), ("e1", Red, Guard)]);
        assert_eq!(destinations(&board, c("d1")), set(&["e2", "f3", "c1", "b1", "a1"]));

        // enemy palace works too, and the slide stops at the first piece
        let board = board_with(&[("f10", Red, Chariot), ("e9", Blue, General), ("f9", Blue, Guard), ("e10", Blue, Guard)]);
        assert_eq!(destinations(&board, c("f10")), set(&["e9", "f9", "e10", "g10", "h10", "i10"]));
    }

    #[test]
    fn test_chariot_off_diagonal_has_no_palace_move() {
        let board = board_with(&[("e1", Red, Chariot), ("d1", Red, Guard), ("f1", Red, Guard), ("e2", Red, General)]);
        assert!(destinations(&board, c("e1")).is_empty());
    }

    #[test]
    fn test_cannon_palace_diagonal_jump() {
        let board = board_with(&[
            ("d8", Red, Cannon),
            ("e9", Blue, General),
            ("d9", Blue, Guard),
            ("e8", Blue, Soldier),
            ("f10", Blue, Chariot),
        ]);
        let dests = destinations(&board, c("d8"));
        assert!(dests.contains(c("f10")), "jumps the general on e9 onto f10");

        // cannon screen on the centre blocks the diagonal
        let board = board_with(&[("d8", Red, Cannon), ("e9", Blue, Cannon), ("d9", Blue, Guard), ("e8", Blue, Soldier)]);
        assert!(!destinations(&board, c("d8")).contains(c("f10")));
    }

    #[test]
    fn test_own_cell_never_destination() {
        let board = Board::standard();
        for cell in Cell::all() {
            assert!(!destinations(&board, cell).contains(cell));
        }
    }

    #[test]
    fn test_standard_opening_counts() {
        let board = Board::standard();
        // b1 elephant: blocked by c1 horse to the east; north path b2-c3-d4 open
        assert_eq!(destinations(&board, c("b1")), set(&["d4"]));
        // c1 horse: c2 then b3 (own cannon) / d3; d1 is occupied
        assert_eq!(destinations(&board, c("c1")), set(&["d3"]));
        // cannons have no screen on the opening rank
        assert!(destinations(&board, c("b3")).is_empty());
        // red general moves within the palace
        assert_eq!(destinations(&board, c("e2")), set(&["e1", "e3", "d2", "f2", "d3", "f3"]));
    }
}
