//! Board topology: the fixed 9×10 grid of intersections.
//!
//! # Cell Encoding
//!
//! ```text
//! index = row * 9 + file        file 0-8 = a-i, row 0-9 = 1-10
//!
//!   row 10 | 81 82 83 84 85 86 87 88 89    Blue side
//!   ...    |
//!   row 1  |  0  1  2  3  4  5  6  7  8    Red side
//!          +---------------------------
//!             a  b  c  d  e  f  g  h  i
//! ```
//!
//! North is towards row 10. Neighbors are looked up in a table built at
//! compile time; a missing neighbor means the board edge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;
use crate::piece::Side;

/// Number of files (columns), `a`-`i`.
pub const FILES: u8 = 9;
/// Number of rows, `1`-`10`.
pub const ROWS: u8 = 10;
/// Number of cells on the board.
pub const CELL_COUNT: usize = (FILES as usize) * (ROWS as usize);

/// One board intersection, identified by its index (0-89).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell(u8);

impl Cell {
    /// Create a cell from file (0-8) and row (0-9).
    #[inline]
    pub const fn new(file: u8, row: u8) -> Option<Cell> {
        if file < FILES && row < ROWS {
            Some(Cell(row * FILES + file))
        } else {
            None
        }
    }

    /// Create a cell from its raw index (0-89).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Cell> {
        if index < CELL_COUNT {
            Some(Cell(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File, 0 = `a`.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % FILES
    }

    /// Row, 0 = `1`.
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / FILES
    }

    /// The adjacent cell in `dir`, or `None` at the board edge.
    #[inline]
    pub fn neighbor(self, dir: Direction) -> Option<Cell> {
        neighbor(self, dir)
    }

    /// Iterate over all 90 cells in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT as u8).map(Cell)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.row() + 1)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({self})")
    }
}

impl FromStr for Cell {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        cell_of(s)
    }
}

/// Parse algebraic notation (`a1` through `i10`) into a cell.
pub fn cell_of(coordinate: &str) -> Result<Cell, CoordinateError> {
    let mut chars = coordinate.chars();
    let file_char = chars.next().ok_or(CoordinateError::Empty)?;
    if !('a'..='i').contains(&file_char) {
        return Err(CoordinateError::File(file_char));
    }
    let file = file_char as u8 - b'a';

    let rest = chars.as_str();
    let row_err = || CoordinateError::Row(rest.to_string());
    if rest.is_empty() || rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Err(row_err());
    }
    let row: u8 = rest.parse().map_err(|_| row_err())?;
    if !(1..=ROWS).contains(&row) {
        return Err(row_err());
    }
    Cell::new(file, row - 1).ok_or_else(row_err)
}

/// The eight compass directions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// (file delta, row delta).
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// The direction whose delta has the given signs, if any.
    pub fn from_delta(df: i8, dr: i8) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| d.delta() == (df.signum(), dr.signum()) && (df, dr) != (0, 0))
    }
}

const NO_CELL: u8 = u8::MAX;

const fn build_neighbors() -> [[u8; 8]; CELL_COUNT] {
    let mut table = [[NO_CELL; 8]; CELL_COUNT];
    let mut idx = 0;
    while idx < CELL_COUNT {
        let file = (idx % FILES as usize) as i8;
        let row = (idx / FILES as usize) as i8;
        let mut d = 0;
        while d < 8 {
            let (df, dr) = Direction::ALL[d].delta();
            let f = file + df;
            let r = row + dr;
            if f >= 0 && f < FILES as i8 && r >= 0 && r < ROWS as i8 {
                table[idx][d] = (r * FILES as i8 + f) as u8;
            }
            d += 1;
        }
        idx += 1;
    }
    table
}

static NEIGHBORS: [[u8; 8]; CELL_COUNT] = build_neighbors();

/// The adjacent cell of `cell` in `dir`, or `None` past the board edge.
#[inline]
pub fn neighbor(cell: Cell, dir: Direction) -> Option<Cell> {
    match NEIGHBORS[cell.index()][dir as usize] {
        NO_CELL => None,
        idx => Some(Cell(idx)),
    }
}

// ============================================================================
// Cell sets
// ============================================================================

/// A set of cells packed into a 128-bit mask (bit i = cell index i).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSet(u128);

impl CellSet {
    pub const EMPTY: CellSet = CellSet(0);

    #[inline]
    pub fn insert(&mut self, cell: Cell) {
        self.0 |= 1u128 << cell.0;
    }

    #[inline]
    pub fn remove(&mut self, cell: Cell) {
        self.0 &= !(1u128 << cell.0);
    }

    #[inline]
    pub const fn contains(self, cell: Cell) -> bool {
        (self.0 >> cell.0) & 1 == 1
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn intersection(self, other: CellSet) -> CellSet {
        CellSet(self.0 & other.0)
    }

    #[inline]
    pub const fn union(self, other: CellSet) -> CellSet {
        CellSet(self.0 | other.0)
    }

    #[inline]
    pub const fn is_subset(self, other: CellSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate over member cells in index order.
    pub fn iter(self) -> impl Iterator<Item = Cell> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(Cell(idx))
        })
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::EMPTY;
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

impl std::ops::BitOr for CellSet {
    type Output = CellSet;

    fn bitor(self, rhs: CellSet) -> CellSet {
        self.union(rhs)
    }
}

impl std::ops::BitAnd for CellSet {
    type Output = CellSet;

    fn bitand(self, rhs: CellSet) -> CellSet {
        self.intersection(rhs)
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.to_string())).finish()
    }
}

// ============================================================================
// Palaces
// ============================================================================

/// Mask of a 3×3 palace on files d-f whose lowest row is `low_row`.
const fn palace_mask(low_row: u8) -> u128 {
    let mut mask = 0u128;
    let mut row = low_row;
    while row < low_row + 3 {
        let mut file = 3;
        while file <= 5 {
            mask |= 1u128 << (row * FILES + file);
            file += 1;
        }
        row += 1;
    }
    mask
}

/// Mask of the four corners and the centre of a palace: the cells joined
/// by the palace diagonals.
const fn augmenting_mask(low_row: u8) -> u128 {
    const fn bit(file: u8, row: u8) -> u128 {
        1u128 << (row * FILES + file)
    }
    bit(3, low_row)
        | bit(5, low_row)
        | bit(4, low_row + 1)
        | bit(3, low_row + 2)
        | bit(5, low_row + 2)
}

const RED_PALACE: CellSet = CellSet(palace_mask(0));
const BLUE_PALACE: CellSet = CellSet(palace_mask(7));
const RED_AUGMENTING: CellSet = CellSet(augmenting_mask(0));
const BLUE_AUGMENTING: CellSet = CellSet(augmenting_mask(7));

/// The nine cells of `side`'s palace.
#[inline]
pub const fn palace_of(side: Side) -> CellSet {
    match side {
        Side::Red => RED_PALACE,
        Side::Blue => BLUE_PALACE,
    }
}

/// The palace cells of `side` from which diagonal movement is possible.
#[inline]
pub const fn palace_augmenting_cells(side: Side) -> CellSet {
    match side {
        Side::Red => RED_AUGMENTING,
        Side::Blue => BLUE_AUGMENTING,
    }
}

/// Which side's palace contains `cell`, if any.
pub fn palace_containing(cell: Cell) -> Option<Side> {
    [Side::Red, Side::Blue]
        .into_iter()
        .find(|&side| palace_of(side).contains(cell))
}
