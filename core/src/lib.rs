// SPDX-License-Identifier: MIT OR Apache-2.0

//! chessgrid core - board graph and selection rules
//!
//! This crate provides the rule-validation core of a two-player board game:
//! - Board graph with neighbor links in eight directions
//! - Occupant directory (players, pieces and turn tracking)
//! - A synchronous event channel safe against re-entrant dispatch
//! - The selection engine that classifies cell interactions

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod cell;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod events;
pub mod layout;
pub mod players;
pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use board::{BoardBuilder, BoardGraph};
pub use cell::{Cell, CellId, Direction, Horizontal, Vertical};
pub use context::{MatchContext, World};
pub use engine::{Movement, SelectionEngine};
pub use events::{Event, EventChannel, EventKind, ListenerId};
pub use layout::{Layout, Placement};
pub use players::{Entity, EntityId, OccupantDirectory, Player};

/// The two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// First mover
    White,
    /// Second mover
    Black,
}

impl Team {
    /// Returns the opposing team
    pub fn opposite(&self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => f.write_str("white"),
            Team::Black => f.write_str("black"),
        }
    }
}

/// Category of a piece-bearing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Every category, in table order
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Single-letter symbol, uppercase for white and lowercase for black
    pub fn symbol(&self, team: Team) -> char {
        let c = match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };
        match team {
            Team::White => c,
            Team::Black => c.to_ascii_lowercase(),
        }
    }
}

/// Board position, row-major from the first row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0 is the first row)
    pub row: u8,
    /// Column index (0 is the leftmost column)
    pub col: u8,
}

impl Position {
    /// Create a new position
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if the position lies inside a board of the given dimensions
    pub fn is_valid(&self, dims: Dimensions) -> bool {
        self.row < dims.height() && self.col < dims.width()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Board width and height, fixed once a graph is built
///
/// Only [`Dimensions::new`] creates values, so both sides are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    width: u8,
    height: u8,
}

impl Dimensions {
    /// Create dimensions, rejecting empty boards
    pub fn new(width: u8, height: u8) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells on a board of this size
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Errors raised by board construction, match setup and channel misuse
///
/// Illegal selections are not errors: they are classified as
/// [`Movement::Invalid`] and handled by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Width or height is zero, or the row count does not match
    #[error("Invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: u8, height: u8 },

    /// A player for this team is already part of the match
    #[error("Team {0} already has a player")]
    DuplicateTeam(Team),

    /// A placement targets a cell that already holds an occupant
    #[error("Cell at {0} is already occupied")]
    OccupiedCell(Position),

    /// A placement or lookup lies outside the board
    #[error("Position {0} is outside the board")]
    OutOfBounds(Position),

    /// No cell with this identifier exists
    #[error("Unknown cell {0}")]
    UnknownCell(CellId),

    /// The listener is not subscribed to this event kind
    #[error("Listener is not registered for {0:?}")]
    NotRegistered(EventKind),

    /// The board has too few rows for the standard setup of both teams
    #[error("Board height {height} is too small for the standard layout (needs at least {min} rows)")]
    BoardTooSmall { height: u8, min: u8 },

    /// The match has already been started
    #[error("Match is already running")]
    MatchAlreadyRunning,
}
