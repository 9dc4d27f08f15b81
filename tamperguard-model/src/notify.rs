//! Push notifications from a watched object.
//!
//! Delivery is synchronous: [`ChangeChannel::notify`] calls every listener
//! before returning. Listeners may subscribe or unsubscribe from inside a
//! callback; the channel snapshots its listener list before delivering.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Zero-argument callback fired after an exposed field was edited.
pub type ChangeListener = Rc<dyn Fn()>;

/// Token returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Observer registration contract implemented by watched objects.
pub trait ChangeNotifier {
    /// Registers a listener and returns its subscription token.
    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId;

    /// Removes a listener. Returns false if the token was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Ready-made [`ChangeNotifier`] a target can embed.
#[derive(Default)]
pub struct ChangeChannel {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, ChangeListener)>>,
}

impl ChangeChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls every registered listener and returns how many were called.
    pub fn notify(&self) -> usize {
        let snapshot: Vec<ChangeListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in &snapshot {
            listener();
        }
        snapshot.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ChangeNotifier for ChangeChannel {
    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl fmt::Debug for ChangeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeChannel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
