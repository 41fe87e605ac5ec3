// SPDX-License-Identifier: MIT OR Apache-2.0

use chessgrid_core::{
    events::{Dispatch, Listener},
    CellId, Dimensions, Event, EventKind, Layout, ListenerId, MatchContext, Movement, Position,
    Team,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{cell::RefCell, rc::Rc};

fn standard_layouts() -> Vec<(Team, Layout)> {
    let dims = Dimensions::new(8, 8).unwrap();
    vec![
        (Team::White, Layout::standard(Team::White, dims)),
        (Team::Black, Layout::standard(Team::Black, dims)),
    ]
}

fn started() -> MatchContext {
    MatchContext::start_match(8, 8, &standard_layouts()).unwrap()
}

fn selected(ctx: &MatchContext, row: u8, col: u8) -> bool {
    ctx.cell_at(Position::new(row, col)).unwrap().is_selected()
}

/// Records everything it hears, in order
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Listener for Recorder {
    fn on_event(&mut self, _cx: &mut Dispatch<'_>, event: &Event) {
        self.events.push(event.clone());
    }
}

#[test]
fn capture_target_is_classified_but_not_applied() {
    let mut ctx = started();
    let own = ctx.cell_at(Position::new(1, 4)).unwrap().id();

    assert_eq!(ctx.interact_at(Position::new(1, 4)).unwrap(), Some(Movement::FirstSelect));
    assert_eq!(ctx.previously_selected(), Some(own));

    assert_eq!(ctx.interact_at(Position::new(6, 4)).unwrap(), Some(Movement::CaptureTarget));
    assert_eq!(ctx.previously_selected(), Some(own));
    assert!(selected(&ctx, 1, 4));
    // whatever the interaction left there; the engine does not touch it
    assert!(selected(&ctx, 6, 4));
}

#[test]
fn second_own_piece_switches_selection() {
    let mut ctx = started();

    assert_eq!(ctx.interact_at(Position::new(1, 4)).unwrap(), Some(Movement::FirstSelect));
    assert_eq!(ctx.interact_at(Position::new(1, 5)).unwrap(), Some(Movement::SecondSelect));

    assert!(!selected(&ctx, 1, 4));
    assert!(selected(&ctx, 1, 5));
    assert_eq!(
        ctx.previously_selected(),
        Some(ctx.cell_at(Position::new(1, 5)).unwrap().id())
    );
}

#[test]
fn selection_before_start_is_invalid() {
    let mut ctx = MatchContext::prepare(8, 8, Team::White, &standard_layouts()).unwrap();

    assert_eq!(ctx.interact_at(Position::new(1, 4)).unwrap(), Some(Movement::Invalid));
    assert!(!selected(&ctx, 1, 4));
    assert_eq!(ctx.previously_selected(), None);

    ctx.start().unwrap();
    assert_eq!(ctx.interact_at(Position::new(1, 4)).unwrap(), Some(Movement::FirstSelect));
}

#[test]
fn reselecting_the_same_cell_unselects_anywhere() {
    let mut ctx = started();
    let own_cells: Vec<Position> = ctx
        .world()
        .board()
        .cells()
        .filter(|c| ctx.world().team_of(c.id()) == Some(Team::White))
        .map(|c| c.position())
        .collect();
    assert_eq!(own_cells.len(), 16);

    for pos in own_cells {
        assert_eq!(ctx.interact_at(pos).unwrap(), Some(Movement::FirstSelect));
        assert_eq!(ctx.interact_at(pos).unwrap(), Some(Movement::Unselect));
        assert_eq!(ctx.previously_selected(), None);
        assert!(!selected(&ctx, pos.row, pos.col));
    }
}

#[test]
fn empty_and_enemy_cells_without_selection() {
    let mut ctx = started();

    assert_eq!(ctx.interact_at(Position::new(3, 3)).unwrap(), Some(Movement::EmptyTarget));
    assert!(!selected(&ctx, 3, 3));

    assert_eq!(ctx.interact_at(Position::new(7, 0)).unwrap(), Some(Movement::CaptureTarget));
    assert_eq!(ctx.previously_selected(), None);
    // capture targets are left as the interaction marked them, held piece or not
    assert!(selected(&ctx, 7, 0));

    // selecting an own piece afterwards is still a fresh first selection
    assert_eq!(ctx.interact_at(Position::new(1, 0)).unwrap(), Some(Movement::FirstSelect));
    assert!(selected(&ctx, 7, 0));
}

#[test]
fn turn_change_flips_ownership() {
    let mut ctx = started();
    assert_eq!(ctx.advance_turn(), Team::Black);

    assert_eq!(ctx.interact_at(Position::new(6, 0)).unwrap(), Some(Movement::FirstSelect));
    assert_eq!(ctx.interact_at(Position::new(1, 0)).unwrap(), Some(Movement::CaptureTarget));
}

/// Selects `target` once, from inside the first selection it hears about
struct Chaser {
    target: CellId,
    fired: bool,
}

impl Listener for Chaser {
    fn on_event(&mut self, cx: &mut Dispatch<'_>, event: &Event) {
        if let Event::SelectionChanged { selected: true, .. } = event {
            if !self.fired {
                self.fired = true;
                cx.set_selected(self.target, true).unwrap();
            }
        }
    }
}

#[test]
fn nested_events_are_seen_once_in_causal_order() {
    let mut ctx = started();
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    ctx.subscribe(EventKind::SelectionChanged, "recorder", recorder.clone());
    ctx.subscribe(EventKind::MovementClassified, "recorder", recorder.clone());

    let first = ctx.cell_at(Position::new(1, 4)).unwrap().id();
    let second = ctx.cell_at(Position::new(1, 5)).unwrap().id();
    let order = vec![ListenerId::from("selection-engine"), ListenerId::from("recorder")];

    ctx.on_cell_interacted(first).unwrap();
    assert_eq!(ctx.channel().listeners(EventKind::SelectionChanged), order);
    ctx.on_cell_interacted(second).unwrap();
    assert_eq!(ctx.channel().listeners(EventKind::SelectionChanged), order);
    assert_eq!(ctx.engine().processed(), 2);

    // the engine stays first in line, so each classification precedes the
    // recorder's copy of the selection that caused it
    let events = recorder.borrow().events.clone();
    assert_eq!(
        events,
        vec![
            Event::MovementClassified { cell: first, movement: Movement::FirstSelect },
            Event::SelectionChanged { cell: first, selected: true },
            // the engine's own deselect, published while it is off the channel
            Event::SelectionChanged { cell: first, selected: false },
            Event::MovementClassified { cell: second, movement: Movement::SecondSelect },
            Event::SelectionChanged { cell: second, selected: true },
        ]
    );
}

#[test]
fn selection_made_by_another_listener_is_processed_once() {
    let mut ctx = started();
    let first = ctx.cell_at(Position::new(1, 4)).unwrap().id();
    let second = ctx.cell_at(Position::new(1, 5)).unwrap().id();

    let recorder = Rc::new(RefCell::new(Recorder::default()));
    ctx.subscribe(EventKind::MovementClassified, "recorder", recorder.clone());
    let chaser = Rc::new(RefCell::new(Chaser {
        target: second,
        fired: false,
    }));
    ctx.subscribe(EventKind::SelectionChanged, "chaser", chaser);

    // the caller learns about its own cell, not the one selected in reaction
    assert_eq!(ctx.on_cell_interacted(first).unwrap(), Some(Movement::FirstSelect));
    assert_eq!(ctx.engine().last_movement(), Some(Movement::SecondSelect));
    assert_eq!(ctx.engine().processed(), 2);

    assert_eq!(
        recorder.borrow().events,
        vec![
            Event::MovementClassified { cell: first, movement: Movement::FirstSelect },
            Event::MovementClassified { cell: second, movement: Movement::SecondSelect },
        ]
    );
    assert_eq!(ctx.previously_selected(), Some(second));
    assert!(!ctx.cell(first).unwrap().is_selected());
    assert!(ctx.cell(second).unwrap().is_selected());
}

#[test]
fn listener_added_is_announced() {
    let mut ctx = started();
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    ctx.subscribe(EventKind::ListenerAdded, "watcher", recorder.clone());
    ctx.subscribe(EventKind::MovementClassified, "late", recorder.clone());

    let events = recorder.borrow().events.clone();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[1],
        Event::ListenerAdded { kind: EventKind::MovementClassified, listener } if listener.as_str() == "late"
    ));
}

#[test]
fn random_play_keeps_one_move_in_flight() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut ctx = started();

    for step in 0..2_000 {
        let pos = Position::new(rng.gen_range(0..8), rng.gen_range(0..8));
        ctx.interact_at(pos).unwrap();

        let prev = ctx.previously_selected();
        if let Some(prev) = prev {
            assert!(ctx.cell(prev).unwrap().is_selected(), "step {}", step);
        }
        // besides the cell in hand, only untouched capture targets keep a flag
        for cell in ctx.world().board().selected_cells() {
            if Some(cell) != prev {
                assert_eq!(ctx.world().team_of(cell), Some(Team::Black), "step {}", step);
            }
        }
    }
    assert_eq!(ctx.engine().processed(), 2_000);
}

#[test]
fn selection_only_sequences_hold_a_single_flag() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ctx = started();
    let own: Vec<Position> = (0..2)
        .flat_map(|row| (0..8).map(move |col| Position::new(row, col)))
        .collect();

    for _ in 0..500 {
        let pos = own[rng.gen_range(0..own.len())];
        let movement = ctx.interact_at(pos).unwrap().unwrap();
        assert!(matches!(
            movement,
            Movement::FirstSelect | Movement::SecondSelect | Movement::Unselect
        ));
        assert!(ctx.world().board().selected_cells().len() <= 1);
    }
}
