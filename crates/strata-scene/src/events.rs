//! Ordered listener registries for synchronous event delivery.
//!
//! Every event surface in the engine (property changes, animation lifecycle,
//! loop finish) is an ordered set of callbacks: registration returns a
//! [`ListenerId`] usable for de-registration, and delivery is FIFO by
//! registration order. Listeners are invoked synchronously at the point the
//! event occurs, never queued.
//!
//! Listeners are stored as `Rc<dyn Fn(&E)>` so a set can be snapshotted and
//! invoked after interior borrows are released; this lets a listener re-enter
//! the engine (read a layer's animation list, start a new animation, cancel a
//! running one) without tripping a borrow.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by listener registration, used to de-register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Generate a new unique listener ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shared callback type.
///
/// `Fn` rather than `FnMut`: snapshots of a set are invoked outside any
/// interior borrow, so listeners that need mutable state capture `Cell` or
/// `RefCell` themselves.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// An ordered set of listeners for one event kind.
pub struct ListenerSet<E> {
    entries: Vec<(ListenerId, Listener<E>)>,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ListenerSet<E> {
    /// Create a new empty listener set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a callback, returning its de-registration handle.
    pub fn register(&mut self, callback: impl Fn(&E) + 'static) -> ListenerId {
        self.insert(Rc::new(callback))
    }

    /// Register an already-shared callback.
    pub fn insert(&mut self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId::next();
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener by handle. Returns `true` if it was present.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Drop all listeners.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check if the set has no listeners.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot the listeners in registration order.
    ///
    /// Invoke the snapshot after releasing interior borrows; listeners
    /// registered or removed during invocation affect later events only.
    pub fn snapshot(&self) -> Vec<Listener<E>> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

impl<E> std::fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.entries.len())
            .finish()
    }
}
