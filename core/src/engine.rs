// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection engine
//!
//! The engine is the only permanent listener for selection changes. Cells do
//! not know the rules; they report that they were selected, and the engine
//! decides what that selection means for the move in progress.

use crate::{
    cell::CellId,
    context::World,
    diagnostics::Level,
    events::{Dispatch, Event, Listener},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a selection event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Rejected; the cell is forced back to unselected
    Invalid,
    /// A piece of the mover is picked up with nothing else in hand
    FirstSelect,
    /// Another piece of the mover replaces the one in hand
    SecondSelect,
    /// The piece in hand is selected again and put back
    Unselect,
    /// The piece in hand targets an empty cell
    EmptyTarget,
    /// The piece in hand targets an opposing piece
    CaptureTarget,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Movement::Invalid => "invalid",
            Movement::FirstSelect => "first-select",
            Movement::SecondSelect => "second-select",
            Movement::Unselect => "unselect",
            Movement::EmptyTarget => "empty-target",
            Movement::CaptureTarget => "capture-target",
        };
        f.write_str(name)
    }
}

/// State machine reacting to `SelectionChanged` events
#[derive(Debug, Default)]
pub struct SelectionEngine {
    running: bool,
    previously_selected: Option<CellId>,
    last_movement: Option<Movement>,
    /// Classification of the selection delivered by the outermost publish
    interaction: Option<Movement>,
    processed: usize,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the match has started
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn start(&mut self) {
        self.running = true;
        tracing::info!("The match is now running");
    }

    /// Cell holding the first half of the move in progress
    pub fn previously_selected(&self) -> Option<CellId> {
        self.previously_selected
    }

    /// Classification of the most recently processed selection
    pub fn last_movement(&self) -> Option<Movement> {
        self.last_movement
    }

    /// Forget the result of the previous interaction
    pub(crate) fn begin_interaction(&mut self) {
        self.interaction = None;
    }

    /// How the selection that started the current interaction was classified
    ///
    /// Selections made by other listeners while the interaction is being
    /// dispatched update [`SelectionEngine::last_movement`] but not this.
    pub fn interaction(&self) -> Option<Movement> {
        self.interaction
    }

    /// Number of selection events run through the state machine
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Decide what selecting `cell` means right now
    pub fn classify(&self, world: &World, cell: CellId) -> Movement {
        if !self.running {
            tracing::warn!("Match is not running yet, cannot select any cells");
            return Movement::Invalid;
        }

        if self.previously_selected == Some(cell) {
            return Movement::Unselect;
        }

        let mover = world.current_team();
        match world.team_of(cell) {
            Some(team) if team == mover => match self.previously_selected {
                None => Movement::FirstSelect,
                Some(prev) if world.team_of(prev) == Some(mover) => Movement::SecondSelect,
                Some(_) => Movement::Invalid,
            },
            None => Movement::EmptyTarget,
            Some(_) => Movement::CaptureTarget,
        }
    }

    fn process(&mut self, cx: &mut Dispatch<'_>, cell: CellId) {
        let movement = self.classify(&*cx.world, cell);
        self.processed += 1;

        match movement {
            // Move application is not wired yet, so an empty target is
            // rejected the same way as an invalid selection.
            Movement::Invalid | Movement::EmptyTarget => {
                tracing::warn!(%cell, %movement, "Invalid board move, cannot perform a move using that cell");
                cx.world.report(
                    Level::Warn,
                    "Rejected selection",
                    serde_json::json!({
                        "cell": cell.index(),
                        "movement": movement.to_string(),
                        "mover": cx.world.current_team(),
                    }),
                );
                self.deselect(cx, cell);
            }
            Movement::FirstSelect => {
                self.previously_selected = Some(cell);
                tracing::info!(%cell, "Cell is now selected");
            }
            Movement::SecondSelect => {
                if let Some(prev) = self.previously_selected {
                    self.deselect(cx, prev);
                }
                self.previously_selected = Some(cell);
                tracing::info!(%cell, "Cell is now selected");
            }
            Movement::Unselect => {
                if let Some(prev) = self.previously_selected.take() {
                    self.deselect(cx, prev);
                }
            }
            Movement::CaptureTarget => {
                tracing::debug!(%cell, "Capture target recorded, application deferred");
            }
        }

        self.last_movement = Some(movement);
        if cx.is_outermost() {
            self.interaction = Some(movement);
        }
        cx.publish(&Event::MovementClassified { cell, movement });
    }

    fn deselect(&self, cx: &mut Dispatch<'_>, cell: CellId) {
        match cx.set_selected(cell, false) {
            Ok(()) => tracing::info!(%cell, "Cell is now deselected"),
            Err(e) => tracing::warn!(%cell, error = %e, "Could not deselect cell"),
        }
    }
}

impl Listener for SelectionEngine {
    fn on_event(&mut self, cx: &mut Dispatch<'_>, event: &Event) {
        match event {
            Event::SelectionChanged { cell, .. } => {
                // Step off the channel so our own deselections are not fed back in.
                // Another listener may already have removed us; the event still
                // counts, we just stay off the channel afterwards.
                let listener_id = match cx.unsubscribe_self() {
                    Ok(id) => Some(id),
                    Err(e) => {
                        tracing::debug!(error = %e, "Selection engine already unsubscribed");
                        None
                    }
                };

                self.process(cx, *cell);

                if let Some(id) = listener_id {
                    cx.resubscribe(id);
                }
            }
            Event::ListenerAdded { kind, listener } => {
                tracing::debug!(?kind, %listener, "Listener added to match");
            }
            Event::MovementClassified { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::BoardGraph,
        events::{EventChannel, EventKind, SharedListener},
        layout::{Layout, Placement},
        PieceKind, Position, Team,
    };
    use std::{cell::RefCell, rc::Rc};

    /// Takes another listener off the channel when it hears anything
    struct Remover {
        target: SharedListener,
    }

    impl Listener for Remover {
        fn on_event(&mut self, cx: &mut Dispatch<'_>, _event: &Event) {
            cx.channel()
                .unsubscribe(EventKind::SelectionChanged, &self.target)
                .unwrap();
        }
    }

    fn world() -> World {
        let mut world = World::new(BoardGraph::build(4, 4).unwrap(), Team::White);
        world
            .add_player(
                Team::White,
                &Layout::new(vec![
                    Placement::new(PieceKind::Rook, 0, 0),
                    Placement::new(PieceKind::King, 0, 1),
                ]),
            )
            .unwrap();
        world
            .add_player(
                Team::Black,
                &Layout::new(vec![Placement::new(PieceKind::King, 3, 3)]),
            )
            .unwrap();
        world
    }

    fn at(world: &World, row: u8, col: u8) -> CellId {
        world.board().id_at(Position::new(row, col)).unwrap()
    }

    #[test]
    fn nothing_is_legal_before_start() {
        let world = world();
        let engine = SelectionEngine::new();
        assert_eq!(engine.classify(&world, at(&world, 0, 0)), Movement::Invalid);
    }

    #[test]
    fn classification_table() {
        let world = world();
        let mut engine = SelectionEngine::new();
        engine.start();

        let rook = at(&world, 0, 0);
        let king = at(&world, 0, 1);
        let enemy = at(&world, 3, 3);
        let empty = at(&world, 2, 2);

        assert_eq!(engine.classify(&world, rook), Movement::FirstSelect);
        assert_eq!(engine.classify(&world, empty), Movement::EmptyTarget);
        assert_eq!(engine.classify(&world, enemy), Movement::CaptureTarget);

        engine.previously_selected = Some(rook);
        assert_eq!(engine.classify(&world, rook), Movement::Unselect);
        assert_eq!(engine.classify(&world, king), Movement::SecondSelect);
        assert_eq!(engine.classify(&world, enemy), Movement::CaptureTarget);
    }

    #[test]
    fn stale_selection_from_other_team_is_invalid() {
        let mut world = world();
        let mut engine = SelectionEngine::new();
        engine.start();

        engine.previously_selected = Some(at(&world, 0, 0));
        world.directory_mut().advance_turn();
        // black king while a white rook is still in hand
        assert_eq!(engine.classify(&world, at(&world, 3, 3)), Movement::Invalid);
    }

    #[test]
    fn event_is_processed_after_removal_by_another_listener() {
        let mut world = world();
        let rook = at(&world, 0, 0);

        let engine = Rc::new(RefCell::new(SelectionEngine::new()));
        engine.borrow_mut().start();
        let shared: SharedListener = engine.clone();
        let remover = Rc::new(RefCell::new(Remover {
            target: shared.clone(),
        }));

        let channel = EventChannel::new();
        channel.subscribe(EventKind::SelectionChanged, "remover", remover);
        channel.subscribe(EventKind::SelectionChanged, "engine", shared.clone());

        // the snapshot still delivers to the engine after the remover ran
        channel.publish(&mut world, &Event::SelectionChanged { cell: rook, selected: true });

        assert_eq!(engine.borrow().processed(), 1);
        assert_eq!(engine.borrow().previously_selected(), Some(rook));
        assert_eq!(engine.borrow().interaction(), Some(Movement::FirstSelect));
        assert!(!channel.is_subscribed(EventKind::SelectionChanged, &shared));
    }
}
