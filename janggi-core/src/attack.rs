//! Attack index: one-move reachability for both sides.
//!
//! ```text
//! attacks[side]      : occupied cell of side -> destinations of that piece
//! attacked_by[side]  : cell -> cells of the OPPOSING side that reach it
//! ```
//!
//! Rebuilding a side replaces its forward map and the opponent's inverse
//! map wholesale, so the two stay exact inverses after any commit.

use std::collections::BTreeMap;

use crate::board::Board;
use crate::piece::Side;
use crate::topology::{Cell, CellSet};
use crate::traversal::destinations;

/// Forward reachability map of one side.
pub type AttackMap = BTreeMap<Cell, CellSet>;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AttackIndex {
    attacks: [AttackMap; 2],
    attacked_by: [AttackMap; 2],
    generals: [Option<Cell>; 2],
}

impl AttackIndex {
    /// Build the index for both sides from scratch.
    pub fn build(board: &Board) -> AttackIndex {
        let mut index = AttackIndex::default();
        index.rebuild(board);
        index
    }

    /// Recompute both sides, Red first.
    pub fn rebuild(&mut self, board: &Board) {
        for side in Side::BOTH {
            self.rebuild_side(board, side);
        }
    }

    /// Recompute `side`'s attacks and the opponent's attacked-by map.
    pub fn rebuild_side(&mut self, board: &Board, side: Side) {
        let attacks = compute_attacks(board, side);
        self.attacked_by[side.opponent().index()] = invert(&attacks);
        self.attacks[side.index()] = attacks;
        self.generals[side.index()] = board.general_cell(side);
    }

    /// Destinations of every piece of `side`, keyed by the piece's cell.
    #[inline]
    pub fn attacks_of(&self, side: Side) -> &AttackMap {
        &self.attacks[side.index()]
    }

    /// Cells the opponent of `side` can reach, each with its attacker cells.
    #[inline]
    pub fn attacked_by(&self, side: Side) -> &AttackMap {
        &self.attacked_by[side.index()]
    }

    /// Destinations of the piece on `cell` as of the last rebuild.
    pub fn destinations_from(&self, side: Side, cell: Cell) -> CellSet {
        self.attacks[side.index()].get(&cell).copied().unwrap_or_default()
    }

    /// Cells of the opponent of `side` that reach `cell`.
    pub fn attackers_of(&self, side: Side, cell: Cell) -> CellSet {
        self.attacked_by[side.index()].get(&cell).copied().unwrap_or_default()
    }

    /// `side`'s General cell as of the last rebuild.
    #[inline]
    pub fn general_cell(&self, side: Side) -> Option<Cell> {
        self.generals[side.index()]
    }
}

/// Forward map of `side` under the given occupancy.
pub fn compute_attacks(board: &Board, side: Side) -> AttackMap {
    board
        .occupied(side)
        .map(|cell| (cell, destinations(board, cell)))
        .collect()
}

/// Invert a forward map: destination -> attacker cells.
pub fn invert(attacks: &AttackMap) -> AttackMap {
    let mut inverse = AttackMap::new();
    for (&from, dests) in attacks {
        for to in dests.iter() {
            inverse.entry(to).or_default().insert(from);
        }
    }
    inverse
}

/// Cells of side `by` whose piece reaches `target` under the given occupancy.
pub fn attackers(board: &Board, by: Side, target: Cell) -> CellSet {
    board
        .occupied(by)
        .filter(|&cell| destinations(board, cell).contains(target))
        .collect()
}
