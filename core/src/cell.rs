// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board cells and their neighbor map

use crate::{players::EntityId, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable cell identifier
///
/// Identifiers are handed out in construction order by the board builder and
/// double as the cell's index in the board arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// Index of the cell in row-major order
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0 + 1)
    }
}

/// Vertical component of a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    Top,
    Neutral,
    Bottom,
}

impl Vertical {
    fn slot(self) -> usize {
        match self {
            Vertical::Top => 0,
            Vertical::Neutral => 1,
            Vertical::Bottom => 2,
        }
    }

    /// Mirror across the horizontal axis
    pub fn opposite(self) -> Self {
        match self {
            Vertical::Top => Vertical::Bottom,
            Vertical::Neutral => Vertical::Neutral,
            Vertical::Bottom => Vertical::Top,
        }
    }

    /// Row offset, with TOP pointing at the previous row
    pub fn delta(self) -> i16 {
        self.slot() as i16 - 1
    }
}

/// Horizontal component of a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Neutral,
    Right,
}

impl Horizontal {
    fn slot(self) -> usize {
        match self {
            Horizontal::Left => 0,
            Horizontal::Neutral => 1,
            Horizontal::Right => 2,
        }
    }

    /// Mirror across the vertical axis
    pub fn opposite(self) -> Self {
        match self {
            Horizontal::Left => Horizontal::Right,
            Horizontal::Neutral => Horizontal::Neutral,
            Horizontal::Right => Horizontal::Left,
        }
    }

    /// Column offset
    pub fn delta(self) -> i16 {
        self.slot() as i16 - 1
    }
}

/// One of the eight compass directions around a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Direction {
    pub const TOP_LEFT: Direction = Direction::new(Vertical::Top, Horizontal::Left);
    pub const TOP: Direction = Direction::new(Vertical::Top, Horizontal::Neutral);
    pub const TOP_RIGHT: Direction = Direction::new(Vertical::Top, Horizontal::Right);
    pub const LEFT: Direction = Direction::new(Vertical::Neutral, Horizontal::Left);
    pub const RIGHT: Direction = Direction::new(Vertical::Neutral, Horizontal::Right);
    pub const BOTTOM_LEFT: Direction = Direction::new(Vertical::Bottom, Horizontal::Left);
    pub const BOTTOM: Direction = Direction::new(Vertical::Bottom, Horizontal::Neutral);
    pub const BOTTOM_RIGHT: Direction = Direction::new(Vertical::Bottom, Horizontal::Right);

    /// The eight directions, row by row from the top-left
    pub const ALL: [Direction; 8] = [
        Direction::TOP_LEFT,
        Direction::TOP,
        Direction::TOP_RIGHT,
        Direction::LEFT,
        Direction::RIGHT,
        Direction::BOTTOM_LEFT,
        Direction::BOTTOM,
        Direction::BOTTOM_RIGHT,
    ];

    pub const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Self { vertical, horizontal }
    }

    /// The direction pointing back at the origin
    pub fn opposite(self) -> Self {
        Self::new(self.vertical.opposite(), self.horizontal.opposite())
    }
}

/// The 3x3 neighbor map of a cell
///
/// The NEUTRAL/NEUTRAL slot stands for the cell itself and is never filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    slots: [[Option<CellId>; 3]; 3],
}

impl Neighbors {
    /// Neighbor in the given direction, if any
    pub fn get(&self, dir: Direction) -> Option<CellId> {
        self.slots[dir.vertical.slot()][dir.horizontal.slot()]
    }

    pub(crate) fn set(&mut self, dir: Direction, cell: CellId) {
        self.slots[dir.vertical.slot()][dir.horizontal.slot()] = Some(cell);
    }

    /// Every present neighbor with its direction
    pub fn iter(&self) -> impl Iterator<Item = (Direction, CellId)> + '_ {
        Direction::ALL
            .iter()
            .filter_map(move |&dir| self.get(dir).map(|id| (dir, id)))
    }

    /// Number of present neighbors
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single addressable board position
#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    position: Position,
    is_edge_row: bool,
    /// Entity standing on this cell; owned by the occupant directory
    pub(crate) occupant: Option<EntityId>,
    pub(crate) selected: bool,
    pub(crate) neighbors: Neighbors,
}

impl Cell {
    pub(crate) fn new(id: CellId, position: Position, is_edge_row: bool) -> Self {
        Self {
            id,
            position,
            is_edge_row,
            occupant: None,
            selected: false,
            neighbors: Neighbors::default(),
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// First or last row of the board (promotion rank)
    pub fn is_edge_row(&self) -> bool {
        self.is_edge_row
    }

    pub fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    /// Whether the cell is the active endpoint of an in-progress move
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn neighbors(&self) -> &Neighbors {
        &self.neighbors
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cell {}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.position)
    }
}
