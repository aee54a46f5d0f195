//! Listener groups: ordered subscriber lists with synchronous fan-out.
//!
//! A [`ListenerGroup`] holds callbacks in registration order. Publishing
//! snapshots the current list first, so a callback may add or remove
//! listeners, or publish to another group, while it is being notified.
//! Nested publications are delivered depth-first before the outer
//! [`ListenerGroup::notify_all`] returns.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`ListenerGroup::add_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

/// An observer list for events of type `E`.
///
/// No de-duplication is performed: two identical consecutive events reach
/// every listener twice.
pub struct ListenerGroup<E> {
    listeners: RefCell<Vec<(ListenerId, Callback<E>)>>,
    next_id: Cell<u64>,
}

impl<E> ListenerGroup<E> {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe `listener`. It is called after every listener registered
    /// before it.
    pub fn add_listener(&self, listener: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Unsubscribe. Returns `false` if the id was not registered.
    ///
    /// Removal during a [`notify_all`](Self::notify_all) does not affect the
    /// event already being delivered: a listener removed by an earlier one
    /// still receives it, and is skipped from the next event on.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver `event` to every listener, in registration order.
    pub fn notify_all(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        tracing::trace!(listeners = snapshot.len(), "notifying listener group");
        for cb in snapshot {
            cb(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl<E> Default for ListenerGroup<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ListenerGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGroup")
            .field("listeners", &self.len())
            .finish()
    }
}
