// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-team starting layouts

use crate::{Dimensions, PieceKind, Position, Team};
use serde::{Deserialize, Serialize};

/// Fewest rows that fit both standard setups without overlap
pub const STANDARD_MIN_HEIGHT: u8 = 4;

/// Back rank order from the leftmost column
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// One entity to create and where to put it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PieceKind,
    pub position: Position,
}

impl Placement {
    pub fn new(kind: PieceKind, row: u8, col: u8) -> Self {
        Self {
            kind,
            position: Position::new(row, col),
        }
    }
}

/// Ordered list of placements for one team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    placements: Vec<Placement>,
}

impl Layout {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self { placements }
    }

    /// Classic starting setup
    ///
    /// White holds the first two rows, black the last two. Pawns fill the
    /// whole pawn row; the back rank uses the standard order for as many
    /// columns as the board has, up to eight. Boards shorter than
    /// [`STANDARD_MIN_HEIGHT`] make the two teams' setups overlap.
    pub fn standard(team: Team, dims: Dimensions) -> Self {
        let last = dims.height().saturating_sub(1);
        let (back_row, pawn_row) = match team {
            Team::White => (0, 1),
            Team::Black => (last, last.saturating_sub(1)),
        };

        let mut placements: Vec<Placement> = (0..dims.width())
            .map(|col| Placement::new(PieceKind::Pawn, pawn_row, col))
            .collect();
        placements.extend(
            BACK_RANK
                .iter()
                .zip(0..dims.width())
                .map(|(&kind, col)| Placement::new(kind, back_row, col)),
        );

        Self { placements }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }
}

impl FromIterator<Placement> for Layout {
    fn from_iter<I: IntoIterator<Item = Placement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
