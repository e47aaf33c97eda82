//! Starting-position configuration.
//!
//! Before play each side chooses how its Horses (ma) and Elephants (sang)
//! stand on files b, c, g and h of its back rank. Everything else about the
//! starting position is fixed.

use serde::{Deserialize, Serialize};

use crate::piece::PieceKind::{self, Elephant, Horse};

/// Back-rank arrangement of Horses and Elephants, read from file b to h.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    /// Elephant, Horse, Elephant, Horse.
    #[default]
    SangMaSangMa,
    /// Horse, Elephant, Horse, Elephant.
    MaSangMaSang,
    /// Horse, Elephant, Elephant, Horse (inner elephants).
    MaSangSangMa,
    /// Elephant, Horse, Horse, Elephant (outer elephants).
    SangMaMaSang,
}

impl Formation {
    pub const ALL: [Formation; 4] = [
        Formation::SangMaSangMa,
        Formation::MaSangMaSang,
        Formation::MaSangSangMa,
        Formation::SangMaMaSang,
    ];

    /// Piece kinds on files b, c, g, h.
    pub const fn back_rank(self) -> [PieceKind; 4] {
        match self {
            Formation::SangMaSangMa => [Elephant, Horse, Elephant, Horse],
            Formation::MaSangMaSang => [Horse, Elephant, Horse, Elephant],
            Formation::MaSangSangMa => [Horse, Elephant, Elephant, Horse],
            Formation::SangMaMaSang => [Elephant, Horse, Horse, Elephant],
        }
    }
}

/// Game setup options.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub red: Formation,
    pub blue: Formation,
}

impl GameConfig {
    /// Both sides use the same formation.
    pub const fn symmetric(formation: Formation) -> GameConfig {
        GameConfig { red: formation, blue: formation }
    }
}
