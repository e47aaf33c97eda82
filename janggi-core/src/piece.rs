//! Sides, piece kinds and the movement catalog.
//!
//! Descriptors are plain data. The traversal engine is the only code that
//! interprets them; no piece kind walks the board by itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::topology::Direction::{self, *};

/// One of the two players.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Starts on rows 1-4 and advances towards row 10.
    Red = 0,
    /// Starts on rows 7-10 and advances towards row 1. Moves first.
    Blue = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Red, Side::Blue];

    /// Get the opponent side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction in which this side's Soldiers advance.
    #[inline]
    pub const fn forward(self) -> Direction {
        match self {
            Side::Red => North,
            Side::Blue => South,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Red => "red",
            Side::Blue => "blue",
        })
    }
}

/// The seven piece kinds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    General,
    Guard,
    Horse,
    Elephant,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Guard,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// Single-letter symbol used by the text renderer.
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::General => 'G',
            PieceKind::Guard => 'A',
            PieceKind::Horse => 'H',
            PieceKind::Elephant => 'E',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'S',
        }
    }

    /// Chariot and Cannon move along open lines and can be blocked.
    #[inline]
    pub const fn is_sliding(self) -> bool {
        matches!(self, PieceKind::Chariot | PieceKind::Cannon)
    }
}

/// A piece: side plus kind. Immutable once created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(side: Side, kind: PieceKind) -> Piece {
        Piece { side, kind }
    }

    /// Text symbol: upper case for Red, lower case for Blue.
    pub fn symbol(self) -> char {
        let c = self.kind.symbol();
        match self.side {
            Side::Red => c,
            Side::Blue => c.to_ascii_lowercase(),
        }
    }

    /// Movement descriptor for this piece.
    #[inline]
    pub fn descriptor(self) -> MovementDescriptor {
        descriptor(self.kind, self.side)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.side, self.kind)
    }
}

// ============================================================================
// Movement catalog
// ============================================================================

/// How a piece moves along one class of paths.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Movement {
    /// Fixed step sequences. Each sequence is walked one direction at a
    /// time; every cell but the last must be empty.
    Steps(&'static [&'static [Direction]]),
    /// Unbounded slide along each direction. With `screen`, exactly one
    /// non-Cannon piece must be jumped before any landing or capture.
    Slide {
        directions: &'static [Direction],
        screen: bool,
    },
}

/// Full movement data of a piece kind for one side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MovementDescriptor {
    /// Movement on the open board.
    pub base: Movement,
    /// Extra diagonal movement, only from a palace's augmenting cells and
    /// only to cells of that palace.
    pub palace: Option<Movement>,
    /// Destinations are limited to the owner's palace.
    pub confined: bool,
}

const ORTHOGONAL_STEPS: &[&[Direction]] = &[&[North], &[East], &[South], &[West]];
const DIAGONAL_STEPS: &[&[Direction]] = &[&[NorthEast], &[SouthEast], &[SouthWest], &[NorthWest]];

const HORSE_STEPS: &[&[Direction]] = &[
    &[North, NorthEast],
    &[North, NorthWest],
    &[East, NorthEast],
    &[East, SouthEast],
    &[South, SouthEast],
    &[South, SouthWest],
    &[West, NorthWest],
    &[West, SouthWest],
];

const ELEPHANT_STEPS: &[&[Direction]] = &[
    &[North, NorthEast, NorthEast],
    &[North, NorthWest, NorthWest],
    &[East, NorthEast, NorthEast],
    &[East, SouthEast, SouthEast],
    &[South, SouthEast, SouthEast],
    &[South, SouthWest, SouthWest],
    &[West, NorthWest, NorthWest],
    &[West, SouthWest, SouthWest],
];

const RED_SOLDIER_STEPS: &[&[Direction]] = &[&[North], &[East], &[West]];
const BLUE_SOLDIER_STEPS: &[&[Direction]] = &[&[South], &[East], &[West]];
const RED_SOLDIER_PALACE_STEPS: &[&[Direction]] = &[&[NorthEast], &[NorthWest]];
const BLUE_SOLDIER_PALACE_STEPS: &[&[Direction]] = &[&[SouthEast], &[SouthWest]];

const ORTHOGONAL: &[Direction] = &Direction::ORTHOGONAL;
const DIAGONAL: &[Direction] = &Direction::DIAGONAL;

/// Look up the movement descriptor of `kind` played by `side`.
pub fn descriptor(kind: PieceKind, side: Side) -> MovementDescriptor {
    use PieceKind::*;

    match kind {
        General | Guard => MovementDescriptor {
            base: Movement::Steps(ORTHOGONAL_STEPS),
            palace: Some(Movement::Steps(DIAGONAL_STEPS)),
            confined: true,
        },
        Horse => MovementDescriptor {
            base: Movement::Steps(HORSE_STEPS),
            palace: None,
            confined: false,
        },
        Elephant => MovementDescriptor {
            base: Movement::Steps(ELEPHANT_STEPS),
            palace: None,
            confined: false,
        },
        Chariot => MovementDescriptor {
            base: Movement::Slide { directions: ORTHOGONAL, screen: false },
            palace: Some(Movement::Slide { directions: DIAGONAL, screen: false }),
            confined: false,
        },
        Cannon => MovementDescriptor {
            base: Movement::Slide { directions: ORTHOGONAL, screen: true },
            palace: Some(Movement::Slide { directions: DIAGONAL, screen: true }),
            confined: false,
        },
        Soldier => {
            let (base, palace) = match side {
                Side::Red => (RED_SOLDIER_STEPS, RED_SOLDIER_PALACE_STEPS),
                Side::Blue => (BLUE_SOLDIER_STEPS, BLUE_SOLDIER_PALACE_STEPS),
            };
            MovementDescriptor {
                base: Movement::Steps(base),
                palace: Some(Movement::Steps(palace)),
                confined: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_sequence(steps: &[&[Direction]], seq: &[Direction]) -> bool {
        steps.iter().any(|s| *s == seq)
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Red.opponent(), Side::Blue);
        assert_eq!(Side::Blue.opponent(), Side::Red);
    }

    #[test]
    fn test_soldier_forward_is_mirrored() {
        assert_eq!(Side::Red.forward(), North);
        assert_eq!(Side::Blue.forward(), South);

        let red = descriptor(PieceKind::Soldier, Side::Red);
        let blue = descriptor(PieceKind::Soldier, Side::Blue);
        let (Movement::Steps(red_steps), Movement::Steps(blue_steps)) = (red.base, blue.base) else {
            panic!("soldiers are fixed-step pieces");
        };
        assert!(has_sequence(red_steps, &[North]));
        assert!(!has_sequence(red_steps, &[South]));
        assert!(has_sequence(blue_steps, &[South]));
        // sideways steps are shared
        for sideways in [[East], [West]] {
            assert!(has_sequence(red_steps, &sideways));
            assert!(has_sequence(blue_steps, &sideways));
        }
    }

    #[test]
    fn test_horse_and_elephant_sequences() {
        let Movement::Steps(horse) = descriptor(PieceKind::Horse, Side::Red).base else {
            panic!("horse is a fixed-step piece");
        };
        assert_eq!(horse.len(), 8);
        assert!(horse.iter().all(|seq| seq.len() == 2));

        let Movement::Steps(elephant) = descriptor(PieceKind::Elephant, Side::Blue).base else {
            panic!("elephant is a fixed-step piece");
        };
        assert_eq!(elephant.len(), 8);
        // first step orthogonal, then the same diagonal twice
        for seq in elephant {
            assert_eq!(seq.len(), 3);
            assert!(Direction::ORTHOGONAL.contains(&seq[0]));
            assert_eq!(seq[1], seq[2]);
        }
    }

    #[test]
    fn test_only_cannon_needs_screen() {
        for kind in PieceKind::ALL {
            let desc = descriptor(kind, Side::Red);
            let screened = matches!(desc.base, Movement::Slide { screen: true, .. });
            assert_eq!(screened, kind == PieceKind::Cannon, "{kind:?}");
        }
    }

    #[test]
    fn test_confinement() {
        for kind in PieceKind::ALL {
            let confined = descriptor(kind, Side::Blue).confined;
            assert_eq!(confined, matches!(kind, PieceKind::General | PieceKind::Guard));
        }
    }

    #[test]
    fn test_palace_descriptors() {
        assert!(descriptor(PieceKind::Horse, Side::Red).palace.is_none());
        assert!(descriptor(PieceKind::Elephant, Side::Red).palace.is_none());
        assert!(descriptor(PieceKind::Chariot, Side::Red).palace.is_some());
        assert!(descriptor(PieceKind::Cannon, Side::Red).palace.is_some());
        assert!(descriptor(PieceKind::General, Side::Red).palace.is_some());
    }

    #[test]
    fn test_piece_symbol() {
        assert_eq!(Piece::new(Side::Red, PieceKind::Chariot).symbol(), 'R');
        assert_eq!(Piece::new(Side::Blue, PieceKind::Cannon).symbol(), 'c');
    }
}
