// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous publish/subscribe channel
//!
//! Delivery is a plain fan-out on the caller's stack. Every publish works on a
//! snapshot of the registrations taken when it starts, so listeners that
//! subscribe or unsubscribe while a dispatch is running only affect later
//! publishes. A listener that is still running further up the stack is never
//! entered a second time; nested deliveries to it are dropped.
//!
//! Dispatch order is registration order. Unsubscribing leaves the slot
//! behind, so an id that subscribes again takes its old place in line.

use crate::{cell::CellId, context::World, engine::Movement, GameError};
use serde::{Deserialize, Serialize};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};
use uuid::Uuid;

/// Kinds of events carried by the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SelectionChanged,
    ListenerAdded,
    MovementClassified,
}

/// Events emitted during play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A cell's selection flag was set
    SelectionChanged {
        /// The cell that changed
        cell: CellId,
        /// The flag after the change
        selected: bool,
    },
    /// A listener was registered through the match context
    ListenerAdded {
        /// The kind it subscribed to
        kind: EventKind,
        /// The name it subscribed under
        listener: ListenerId,
    },
    /// The selection engine classified an inbound selection
    MovementClassified {
        /// The cell that was selected
        cell: CellId,
        /// The resulting category
        movement: Movement,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SelectionChanged { .. } => EventKind::SelectionChanged,
            Event::ListenerAdded { .. } => EventKind::ListenerAdded,
            Event::MovementClassified { .. } => EventKind::MovementClassified,
        }
    }
}

/// Name a listener is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(String);

impl ListenerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Fresh unique token for anonymous listeners
    pub fn generate() -> Self {
        Self(format!("listener-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListenerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receiver of channel events
pub trait Listener {
    /// Handle one event
    fn on_event(&mut self, cx: &mut Dispatch<'_>, event: &Event);
}

/// Shared handle to a listener; its pointer identity is its channel identity
pub type SharedListener = Rc<RefCell<dyn Listener>>;

fn same_listener(a: &SharedListener, b: &SharedListener) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

struct Registration {
    kind: EventKind,
    id: ListenerId,
    /// `None` once unsubscribed; the slot is reused if the id comes back
    listener: Option<SharedListener>,
}

impl Registration {
    fn holds(&self, kind: EventKind, listener: &SharedListener) -> bool {
        self.kind == kind
            && self
                .listener
                .as_ref()
                .is_some_and(|l| same_listener(l, listener))
    }
}

/// Registry of listeners per event kind
#[derive(Default)]
pub struct EventChannel {
    registrations: RefCell<Vec<Registration>>,
    depth: Cell<usize>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `id` for `kind`
    ///
    /// Registering an id that is already known for the kind, active or
    /// unsubscribed, puts the listener back into that id's slot.
    pub fn subscribe(&self, kind: EventKind, id: impl Into<ListenerId>, listener: SharedListener) {
        let id = id.into();
        let mut regs = self.registrations.borrow_mut();
        match regs.iter_mut().find(|r| r.kind == kind && r.id == id) {
            Some(existing) => {
                tracing::debug!(?kind, listener = %id, rejoined = existing.listener.is_none(), "Replacing listener");
                existing.listener = Some(listener);
            }
            None => {
                tracing::debug!(?kind, listener = %id, "Subscribing listener");
                regs.push(Registration {
                    kind,
                    id,
                    listener: Some(listener),
                });
            }
        }
    }

    /// Register under a generated id and return it
    pub fn subscribe_anonymous(&self, kind: EventKind, listener: SharedListener) -> ListenerId {
        let id = ListenerId::generate();
        self.subscribe(kind, id.clone(), listener);
        id
    }

    /// Remove `listener` from `kind`, returning the id it was registered under
    pub fn unsubscribe(
        &self,
        kind: EventKind,
        listener: &SharedListener,
    ) -> Result<ListenerId, GameError> {
        let mut regs = self.registrations.borrow_mut();
        let reg = regs
            .iter_mut()
            .find(|r| r.holds(kind, listener))
            .ok_or(GameError::NotRegistered(kind))?;
        reg.listener = None;
        tracing::debug!(?kind, listener = %reg.id, "Unsubscribed listener");
        Ok(reg.id.clone())
    }

    /// Whether `listener` is currently registered for `kind`
    pub fn is_subscribed(&self, kind: EventKind, listener: &SharedListener) -> bool {
        self.registrations
            .borrow()
            .iter()
            .any(|r| r.holds(kind, listener))
    }

    /// Ids registered for `kind`, in dispatch order
    pub fn listeners(&self, kind: EventKind) -> Vec<ListenerId> {
        self.registrations
            .borrow()
            .iter()
            .filter(|r| r.kind == kind && r.listener.is_some())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Number of publishes currently on the stack; 0 outside of dispatch
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Deliver `event` to every listener registered for its kind
    pub fn publish(&self, world: &mut World, event: &Event) {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, SharedListener)> = self
            .registrations
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .filter_map(|r| r.listener.clone().map(|l| (r.id.clone(), l)))
            .collect();

        self.depth.set(self.depth.get() + 1);
        for (id, shared) in &snapshot {
            let Ok(mut listener) = shared.try_borrow_mut() else {
                tracing::warn!(?kind, listener = %id, "Listener already dispatching, skipping nested delivery");
                continue;
            };
            let mut cx = Dispatch {
                world: &mut *world,
                channel: self,
                kind,
                current: shared,
            };
            listener.on_event(&mut cx, event);
        }
        self.depth.set(self.depth.get() - 1);
    }
}

/// What a listener can reach while it handles an event
pub struct Dispatch<'a> {
    /// Board, occupants and diagnostics of the match
    pub world: &'a mut World,
    channel: &'a EventChannel,
    kind: EventKind,
    current: &'a SharedListener,
}

impl<'a> Dispatch<'a> {
    pub fn channel(&self) -> &EventChannel {
        self.channel
    }

    /// Kind of the event being delivered
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether the event comes from the outermost publish rather than from
    /// a listener reacting to another event
    pub fn is_outermost(&self) -> bool {
        self.channel.depth() == 1
    }

    /// Remove the running listener from the current event kind
    pub fn unsubscribe_self(&self) -> Result<ListenerId, GameError> {
        self.channel.unsubscribe(self.kind, self.current)
    }

    /// Register the running listener again for the current event kind
    pub fn resubscribe(&self, id: ListenerId) {
        self.channel.subscribe(self.kind, id, self.current.clone());
    }

    /// Publish a nested event on the same channel
    pub fn publish(&mut self, event: &Event) {
        self.channel.publish(self.world, event);
    }

    /// Set a cell's selection flag and announce it
    pub fn set_selected(&mut self, cell: CellId, selected: bool) -> Result<(), GameError> {
        self.world.set_selected(self.channel, cell, selected)
    }
}
