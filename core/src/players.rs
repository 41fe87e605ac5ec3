// SPDX-License-Identifier: MIT OR Apache-2.0

//! Players, their pieces and whose turn it is

use crate::{
    board::BoardGraph,
    cell::CellId,
    layout::Layout,
    GameError, PieceKind, Team,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Handle to an entity owned by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(usize);

/// A piece-bearing entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: PieceKind,
    /// Owning team, fixed for the entity's lifetime
    pub team: Team,
}

/// One side of the match and the entities it controls
#[derive(Debug, Clone)]
pub struct Player {
    team: Team,
    entities: Vec<EntityId>,
}

impl Player {
    pub fn team(&self) -> Team {
        self.team
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }
}

/// Registry of players and entities, plus turn tracking
#[derive(Debug, Clone)]
pub struct OccupantDirectory {
    players: Vec<Player>,
    entities: Vec<Entity>,
    current: Team,
}

impl OccupantDirectory {
    /// Create an empty directory where `first` moves first
    pub fn new(first: Team) -> Self {
        Self {
            players: Vec::with_capacity(2),
            entities: Vec::new(),
            current: first,
        }
    }

    /// Create a player for `team` and place its layout on the board
    ///
    /// The whole layout is checked before anything is placed, so a failed
    /// call leaves both the board and the directory untouched.
    pub fn add_player(
        &mut self,
        board: &mut BoardGraph,
        team: Team,
        layout: &Layout,
    ) -> Result<&Player, GameError> {
        if self.player(team).is_some() {
            return Err(GameError::DuplicateTeam(team));
        }

        let mut targets = Vec::with_capacity(layout.len());
        let mut claimed = HashSet::new();
        for placement in layout.iter() {
            let id = board.id_at(placement.position)?;
            if board.cell(id)?.occupant().is_some() || !claimed.insert(id) {
                return Err(GameError::OccupiedCell(placement.position));
            }
            targets.push((placement.kind, id));
        }

        let mut owned = Vec::with_capacity(targets.len());
        for (kind, cell) in targets {
            let id = EntityId(self.entities.len());
            self.entities.push(Entity { id, kind, team });
            board.cell_mut(cell)?.occupant = Some(id);
            owned.push(id);
        }

        tracing::info!(%team, pieces = owned.len(), "Player added");
        self.players.push(Player {
            team,
            entities: owned,
        });
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn player(&self, team: Team) -> Option<&Player> {
        self.players.iter().find(|p| p.team == team)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    /// Entities of one team and category
    pub fn entities(&self, team: Team, kind: PieceKind) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.team == team && e.kind == kind)
            .collect()
    }

    /// Team owning the occupant of a cell, if it has one
    pub fn team_of(&self, board: &BoardGraph, cell: CellId) -> Option<Team> {
        self.occupant_of(board, cell).map(|e| e.team)
    }

    /// Entity standing on a cell
    pub fn occupant_of(&self, board: &BoardGraph, cell: CellId) -> Option<&Entity> {
        let id = board.cell(cell).ok()?.occupant()?;
        self.entity(id)
    }

    /// Team whose turn it is
    pub fn current_team(&self) -> Team {
        self.current
    }

    pub fn set_current_team(&mut self, team: Team) {
        self.current = team;
    }

    /// Hand the turn to the other team
    pub fn advance_turn(&mut self) -> Team {
        self.current = self.current.opposite();
        tracing::debug!(team = %self.current, "Turn advanced");
        self.current
    }
}
