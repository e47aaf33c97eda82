//! Check and checkmate.
//!
//! Check is a lookup in the attack index. Checkmate looks for a way out in
//! three stages (General escape, capture of a lone attacker, block of a
//! sliding attacker) and tests every candidate as a full trial move through
//! [`Position::is_legal`], so the answer always agrees with what the move
//! validator would accept.

use tracing::debug;

use crate::piece::{PieceKind, Side};
use crate::topology::{neighbor, Cell, CellSet, Direction};
use crate::validator::Position;

/// How a check can be answered.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolution {
    /// The General steps out of attack.
    Escape,
    /// A piece takes the single attacker.
    Capture,
    /// A piece interposes on a Chariot or Cannon line, or a Cannon's
    /// screen steps away.
    Block,
}

/// Is `side`'s General attacked right now?
pub fn is_in_check(position: &Position, side: Side) -> bool {
    let attacks = position.attacks();
    attacks
        .general_cell(side)
        .is_some_and(|general| !attacks.attackers_of(side, general).is_empty())
}

/// Is `side` checkmated? `false` when not in check.
pub fn is_checkmate(position: &mut Position, side: Side) -> bool {
    is_in_check(position, side) && find_resolution(position, side).is_none()
}

/// First legal answer to a check on `side`, searched escape, capture, block.
///
/// Returns `None` when `side` is not in check or the check cannot be met.
pub fn find_resolution(position: &mut Position, side: Side) -> Option<(Resolution, Cell, Cell)> {
    let general = position.attacks().general_cell(side)?;
    let attackers = position.attacks().attackers_of(side, general);
    if attackers.is_empty() {
        return None;
    }

    let stages = [
        (Resolution::Escape, escape_candidates(position, side, general)),
        (Resolution::Capture, capture_candidates(position, side, attackers)),
        (Resolution::Block, block_candidates(position, side, general, attackers)),
    ];
    for (resolution, candidates) in stages {
        for (from, to) in candidates {
            if position.is_legal(side, from, to) {
                debug!(%side, ?resolution, %from, %to, "check can be answered");
                return Some((resolution, from, to));
            }
        }
    }
    None
}

fn escape_candidates(position: &Position, side: Side, general: Cell) -> Vec<(Cell, Cell)> {
    position
        .attacks()
        .destinations_from(side, general)
        .iter()
        .map(|to| (general, to))
        .collect()
}

fn capture_candidates(position: &Position, side: Side, attackers: CellSet) -> Vec<(Cell, Cell)> {
    if attackers.len() != 1 {
        return Vec::new();
    }
    let Some(target) = attackers.iter().next() else {
        return Vec::new();
    };
    position
        .attacks()
        .attacks_of(side)
        .iter()
        .filter(|(_, dests)| dests.contains(target))
        .map(|(&from, _)| (from, target))
        .collect()
}

fn block_candidates(
    position: &Position,
    side: Side,
    general: Cell,
    attackers: CellSet,
) -> Vec<(Cell, Cell)> {
    let board = position.board();
    let attacks = position.attacks();
    let mut candidates = Vec::new();

    for attacker in attackers.iter() {
        let Some(kind) = board.occupant(attacker).map(|p| p.kind) else {
            continue;
        };
        if !kind.is_sliding() {
            continue;
        }
        let path = between(attacker, general);

        for (&from, dests) in attacks.attacks_of(side) {
            if from == general {
                continue;
            }
            // Interpose on the line
            candidates.extend((*dests & path).iter().map(|to| (from, to)));
            // A Cannon loses its check when its screen leaves the line
            if kind == PieceKind::Cannon && path.contains(from) {
                candidates.extend(dests.iter().map(|to| (from, to)));
            }
        }
    }
    candidates
}

/// Cells strictly between `a` and `b` on a shared straight line, empty when
/// the two are not aligned.
pub fn between(a: Cell, b: Cell) -> CellSet {
    let df = b.file() as i8 - a.file() as i8;
    let dr = b.row() as i8 - a.row() as i8;
    let aligned = df == 0 || dr == 0 || df.abs() == dr.abs();
    let Some(dir) = Direction::from_delta(df, dr).filter(|_| aligned) else {
        return CellSet::EMPTY;
    };

    let mut path = CellSet::EMPTY;
    let mut cursor = neighbor(a, dir);
    while let Some(cell) = cursor {
        if cell == b {
            break;
        }
        path.insert(cell);
        cursor = neighbor(cell, dir);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::Piece;
    use crate::piece::PieceKind::*;
    use crate::piece::Side::{Blue, Red};

    fn c(s: &str) -> Cell {
        s.parse().unwrap()
    }

    fn position_with(pieces: &[(&str, Side, PieceKind)]) -> Position {
        let mut board = Board::empty();
        for &(cell, side, kind) in pieces {
            board.place(c(cell), Piece::new(side, kind));
        }
        Position::new(board)
    }

    #[test]
    fn test_between() {
        let cells: Vec<String> = between(c("e2"), c("e6")).iter().map(|c| c.to_string()).collect();
        assert_eq!(cells, ["e3", "e4", "e5"]);
        assert_eq!(between(c("d1"), c("f3")).iter().collect::<Vec<_>>(), vec![c("e2")]);
        assert!(between(c("e2"), c("e3")).is_empty());
        assert!(between(c("a1"), c("b3")).is_empty(), "not aligned");
    }

    #[test]
    fn test_no_check_at_start() {
        let mut position = Position::standard();
        assert!(!is_in_check(&position, Red));
        assert!(!is_in_check(&position, Blue));
        assert!(!is_checkmate(&mut position, Blue));
    }

    #[test]
    fn test_escape_resolves_check() {
        let mut position = position_with(&[("e2", Red, General), ("e8", Blue, Chariot)]);
        assert!(is_in_check(&position, Red));
        let (resolution, from, to) = find_resolution(&mut position, Red).unwrap();
        assert_eq!(resolution, Resolution::Escape);
        assert_eq!(from, c("e2"));
        assert_ne!(to.file(), 4, "staying on the e-file is still check");
        assert!(!is_checkmate(&mut position, Red));
    }

    #[test]
    fn test_capture_resolves_check() {
        let mut position = position_with(&[
            ("e1", Red, General),
            ("d1", Red, Guard),
            ("f1", Red, Guard),
            ("e3", Blue, Chariot),
            ("a3", Red, Chariot),
            ("e10", Blue, General),
        ]);
        assert!(is_in_check(&position, Red));
        assert_eq!(
            find_resolution(&mut position, Red),
            Some((Resolution::Capture, c("a3"), c("e3")))
        );
        assert!(!is_checkmate(&mut position, Red));
    }

    #[test]
    fn test_chariot_checkmate_on_open_file() {
        let mut position = position_with(&[
            ("e1", Red, General),
            ("d7", Blue, Chariot),
            ("e7", Blue, Chariot),
            ("f7", Blue, Chariot),
            ("e10", Blue, General),
        ]);
        assert!(is_in_check(&position, Red));
        assert_eq!(find_resolution(&mut position, Red), None);
        assert!(is_checkmate(&mut position, Red));
        assert!(position.legal_moves(Red).is_empty());
    }

    #[test]
    fn test_block_resolves_chariot_check() {
        let mut position = position_with(&[
            ("e1", Red, General),
            ("a5", Red, Chariot),
            ("d7", Blue, Chariot),
            ("e7", Blue, Chariot),
            ("f7", Blue, Chariot),
            ("e10", Blue, General),
        ]);
        let before = position.clone();
        assert_eq!(
            find_resolution(&mut position, Red),
            Some((Resolution::Block, c("a5"), c("e5")))
        );
        assert_eq!(position, before, "trials must roll back");
    }

    #[test]
    fn test_cannon_screen_withdrawal_resolves_check() {
        let mut position = position_with(&[
            ("e1", Red, General),
            ("e4", Red, Horse),
            ("d7", Blue, Chariot),
            ("e7", Blue, Cannon),
            ("f7", Blue, Chariot),
            ("e10", Blue, General),
        ]);
        assert!(is_in_check(&position, Red));
        let (resolution, from, _) = find_resolution(&mut position, Red).unwrap();
        assert_eq!((resolution, from), (Resolution::Block, c("e4")));
        assert!(!is_checkmate(&mut position, Red));
    }

    #[test]
    fn test_horse_check_only_escape_or_capture() {
        // Filling the horse's leg on f2 would end the check, but fixed-step
        // attackers are never treated as blockable.
        let mut position = position_with(&[
            ("e1", Red, General),
            ("d1", Red, Guard),
            ("f1", Red, Guard),
            ("e2", Red, Elephant),
            ("f3", Blue, Horse),
            ("e10", Blue, General),
        ]);
        assert!(is_in_check(&position, Red));
        assert!(position.is_legal(Red, c("f1"), c("f2")));
        assert!(is_checkmate(&mut position, Red));
    }
}
