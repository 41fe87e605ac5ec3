// SPDX-License-Identifier: MIT OR Apache-2.0

//! Piece movement patterns
//!
//! Patterns are looked up by piece kind. Every kind starts out with
//! [`NoPattern`]; hosts install real patterns as they implement them. The
//! selection engine does not consult this table.

use crate::{board::BoardGraph, cell::CellId, players::OccupantDirectory, PieceKind, Team};
use std::collections::HashMap;

/// Candidate target cells for a piece of one kind
pub trait MovePattern {
    fn targets(
        &self,
        board: &BoardGraph,
        occupants: &OccupantDirectory,
        from: CellId,
        team: Team,
    ) -> Vec<CellId>;
}

/// Pattern with no targets
pub struct NoPattern;

impl MovePattern for NoPattern {
    fn targets(&self, _: &BoardGraph, _: &OccupantDirectory, _: CellId, _: Team) -> Vec<CellId> {
        Vec::new()
    }
}

/// Single step in any of the eight directions onto a cell not held by `team`
pub struct AdjacentPattern;

impl MovePattern for AdjacentPattern {
    fn targets(
        &self,
        board: &BoardGraph,
        occupants: &OccupantDirectory,
        from: CellId,
        team: Team,
    ) -> Vec<CellId> {
        board
            .neighbors(from)
            .unwrap_or_default()
            .into_iter()
            .filter(|&n| occupants.team_of(board, n) != Some(team))
            .collect()
    }
}

/// Pattern lookup keyed by piece kind
pub struct PatternTable {
    patterns: HashMap<PieceKind, Box<dyn MovePattern>>,
}

impl PatternTable {
    /// Table with [`NoPattern`] for every kind
    pub fn new() -> Self {
        let patterns = PieceKind::ALL
            .iter()
            .map(|&kind| (kind, Box::new(NoPattern) as Box<dyn MovePattern>))
            .collect();
        Self { patterns }
    }

    /// Replace the pattern used for `kind`
    pub fn install(&mut self, kind: PieceKind, pattern: Box<dyn MovePattern>) {
        self.patterns.insert(kind, pattern);
    }

    pub fn pattern(&self, kind: PieceKind) -> &dyn MovePattern {
        self.patterns
            .get(&kind)
            .map(|p| p.as_ref())
            .unwrap_or(&NoPattern)
    }

    /// Targets for whatever stands on `from`; empty for an empty cell
    pub fn targets(
        &self,
        board: &BoardGraph,
        occupants: &OccupantDirectory,
        from: CellId,
    ) -> Vec<CellId> {
        match occupants.occupant_of(board, from) {
            Some(entity) => self
                .pattern(entity.kind)
                .targets(board, occupants, from, entity.team),
            None => Vec::new(),
        }
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new()
    }
}
