//! Engine notifications.
//!
//! Listeners are plain callbacks invoked synchronously, in registration
//! order, from inside the mutating call that raised the event.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum GameEvent {
    /// A piece was moved (and possibly captured something).
    PieceMove,
    /// All Time and Plus pieces swapped kinds.
    PieceSwitch,
    /// The game ended; carries the winning player index.
    PlayerWin(usize),
    /// The game was reset to the starting layout.
    NewGame,
}

type Callback = Box<dyn FnMut(&GameEvent)>;

/// Ordered list of event callbacks.
#[derive(Default)]
pub struct Listeners {
    callbacks: Vec<Callback>,
}

impl Listeners {
    pub fn new() -> Listeners {
        Listeners::default()
    }

    /// Register a callback. Returns its position in the call order.
    pub fn subscribe<F>(&mut self, callback: F) -> usize
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.callbacks.push(Box::new(callback));
        self.callbacks.len() - 1
    }

    /// Deliver an event to every callback.
    pub fn notify(&mut self, event: &GameEvent) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }

}

/// Buffer that records events for callers that poll instead of reacting
/// inside the callback.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventQueue {
    pub fn new() -> EventQueue {
        EventQueue::default()
    }

    /// A callback that appends to this queue, for [`Listeners::subscribe`]
    /// or [`crate::Game::subscribe`].
    pub fn sink(&self) -> impl FnMut(&GameEvent) + 'static {
        let events = Rc::clone(&self.events);
        move |event| events.borrow_mut().push(*event)
    }

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.callbacks.len())
            .finish()
    }
}
