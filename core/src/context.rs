// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match context: owns the board, the players, the channel and the engine

use crate::{
    board::BoardGraph,
    cell::{Cell, CellId},
    config::MatchConfig,
    diagnostics::{DiagnosticSink, Level, NullSink, Reporter},
    engine::{Movement, SelectionEngine},
    events::{Event, EventChannel, EventKind, ListenerId, SharedListener},
    layout::{Layout, STANDARD_MIN_HEIGHT},
    players::{Entity, OccupantDirectory, Player},
    rules::PatternTable,
    Dimensions, GameError, PieceKind, Position, Team,
};
use std::{cell::RefCell, rc::Rc};
use uuid::Uuid;

const ENGINE_LISTENER: &str = "selection-engine";

/// Everything listeners may read or mutate during dispatch
pub struct World {
    board: BoardGraph,
    directory: OccupantDirectory,
    patterns: PatternTable,
    reporter: Reporter,
}

impl World {
    pub fn new(board: BoardGraph, first: Team) -> Self {
        Self {
            board,
            directory: OccupantDirectory::new(first),
            patterns: PatternTable::new(),
            reporter: Reporter::default(),
        }
    }

    pub fn board(&self) -> &BoardGraph {
        &self.board
    }

    pub fn directory(&self) -> &OccupantDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut OccupantDirectory {
        &mut self.directory
    }

    pub fn patterns_mut(&mut self) -> &mut PatternTable {
        &mut self.patterns
    }

    /// Create a player and place its pieces
    pub fn add_player(&mut self, team: Team, layout: &Layout) -> Result<&Player, GameError> {
        self.directory.add_player(&mut self.board, team, layout)
    }

    pub fn current_team(&self) -> Team {
        self.directory.current_team()
    }

    /// Team owning the piece on `cell`
    pub fn team_of(&self, cell: CellId) -> Option<Team> {
        self.directory.team_of(&self.board, cell)
    }

    /// Set a cell's selection flag and publish `SelectionChanged`
    pub fn set_selected(
        &mut self,
        channel: &EventChannel,
        cell: CellId,
        selected: bool,
    ) -> Result<(), GameError> {
        self.board.cell_mut(cell)?.selected = selected;
        channel.publish(self, &Event::SelectionChanged { cell, selected });
        Ok(())
    }

    /// Emit a diagnostic for the host
    pub fn report(&self, level: Level, message: &str, fields: serde_json::Value) {
        self.reporter.report(level, message, fields);
    }
}

/// A single match, with no state shared outside of it
pub struct MatchContext {
    id: Uuid,
    channel: EventChannel,
    world: World,
    engine: Rc<RefCell<SelectionEngine>>,
}

impl MatchContext {
    /// Build the board, place both teams and start the match
    pub fn start_match(
        width: u8,
        height: u8,
        layouts: &[(Team, Layout)],
    ) -> Result<Self, GameError> {
        let mut ctx = Self::prepare(width, height, Team::White, layouts)?;
        ctx.start()?;
        Ok(ctx)
    }

    /// Build a match with the standard layout from a configuration
    ///
    /// Fails with [`GameError::BoardTooSmall`] when the board has fewer rows
    /// than the two standard setups need.
    pub fn from_config(config: &MatchConfig) -> Result<Self, GameError> {
        let dims = Dimensions::new(config.width, config.height)?;
        if dims.height() < STANDARD_MIN_HEIGHT {
            return Err(GameError::BoardTooSmall {
                height: dims.height(),
                min: STANDARD_MIN_HEIGHT,
            });
        }
        let layouts = [
            (Team::White, Layout::standard(Team::White, dims)),
            (Team::Black, Layout::standard(Team::Black, dims)),
        ];
        Self::prepare(config.width, config.height, config.first_team, &layouts)
    }

    /// Build the board and place the teams without starting
    ///
    /// Selections are accepted but classified as invalid until
    /// [`MatchContext::start`] is called.
    pub fn prepare(
        width: u8,
        height: u8,
        first: Team,
        layouts: &[(Team, Layout)],
    ) -> Result<Self, GameError> {
        let board = BoardGraph::build(width, height)?;
        let mut world = World::new(board, first);
        for (team, layout) in layouts {
            world.add_player(*team, layout)?;
        }

        let id = Uuid::new_v4();
        world.reporter = Reporter::new(Rc::new(NullSink), id, "selection");

        let mut ctx = Self {
            id,
            channel: EventChannel::new(),
            world,
            engine: Rc::new(RefCell::new(SelectionEngine::new())),
        };

        let engine: SharedListener = ctx.engine.clone();
        ctx.channel
            .subscribe(EventKind::ListenerAdded, ENGINE_LISTENER, engine.clone());
        ctx.subscribe(EventKind::SelectionChanged, ENGINE_LISTENER, engine);

        tracing::info!(match_id = %id, width, height, "Match prepared");
        Ok(ctx)
    }

    /// Flip the match into the running state
    pub fn start(&mut self) -> Result<(), GameError> {
        let mut engine = self.engine.borrow_mut();
        if engine.is_running() {
            return Err(GameError::MatchAlreadyRunning);
        }
        engine.start();
        Ok(())
    }

    /// Route diagnostics to `sink`
    pub fn set_diagnostic_sink(&mut self, sink: Rc<dyn DiagnosticSink>) {
        self.world.reporter = Reporter::new(sink, self.id, "selection");
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.engine.borrow().is_running()
    }

    /// Presentation entry point: the user picked `cell`
    ///
    /// Marks the cell selected, publishes `SelectionChanged` and returns how
    /// the engine classified this cell, even if other listeners selected
    /// further cells while it was dispatched. Returns `None` only if the
    /// engine was not listening.
    pub fn on_cell_interacted(&mut self, cell: CellId) -> Result<Option<Movement>, GameError> {
        self.engine.borrow_mut().begin_interaction();
        self.world.set_selected(&self.channel, cell, true)?;
        Ok(self.engine.borrow().interaction())
    }

    /// Same as [`MatchContext::on_cell_interacted`], addressed by position
    pub fn interact_at(&mut self, pos: Position) -> Result<Option<Movement>, GameError> {
        let cell = self.world.board.id_at(pos)?;
        self.on_cell_interacted(cell)
    }

    /// Register a listener and announce it with `ListenerAdded`
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        id: impl Into<ListenerId>,
        listener: SharedListener,
    ) {
        let id = id.into();
        self.channel.subscribe(kind, id.clone(), listener);
        self.channel.publish(
            &mut self.world,
            &Event::ListenerAdded { kind, listener: id },
        );
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn engine(&self) -> std::cell::Ref<'_, SelectionEngine> {
        self.engine.borrow()
    }

    pub fn previously_selected(&self) -> Option<CellId> {
        self.engine.borrow().previously_selected()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.world.board.dimensions()
    }

    pub fn neighbors(&self, cell: CellId) -> Result<Vec<CellId>, GameError> {
        self.world.board.neighbors(cell)
    }

    pub fn cell(&self, cell: CellId) -> Result<&Cell, GameError> {
        self.world.board.cell(cell)
    }

    pub fn cell_at(&self, pos: Position) -> Result<&Cell, GameError> {
        self.world.board.cell_at(pos)
    }

    pub fn current_team(&self) -> Team {
        self.world.current_team()
    }

    /// Hand the turn to the other team
    pub fn advance_turn(&mut self) -> Team {
        self.world.directory.advance_turn()
    }

    pub fn entities(&self, team: Team, kind: PieceKind) -> Vec<&Entity> {
        self.world.directory.entities(team, kind)
    }

    /// Candidate targets from the movement pattern of the piece on `cell`
    pub fn candidate_targets(&self, cell: CellId) -> Vec<CellId> {
        self.world
            .patterns
            .targets(&self.world.board, &self.world.directory, cell)
    }
}
