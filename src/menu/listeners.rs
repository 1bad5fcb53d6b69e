use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::anchor::AnchorState;

/// Observer notified when the hover menu exits because the user asked it to.
///
/// The final anchor is handed over so listeners can persist it; the menu
/// itself is mid-teardown and cannot be borrowed during notification.
pub trait OnExitListener {
    fn on_exit_by_user_request(&self, final_anchor: AnchorState);
}

impl<F: Fn(AnchorState)> OnExitListener for F {
    fn on_exit_by_user_request(&self, final_anchor: AnchorState) {
        self(final_anchor)
    }
}

/// Opaque handle returned when registering an exit listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Registry of exit listeners.
///
/// Registering the same `Rc` twice hands back the existing id. Notification
/// runs in registration order over a snapshot of the registry, so a listener
/// holding the registry may add or remove entries while being notified.
#[derive(Default)]
pub struct ExitListeners {
    next_id: Cell<u64>,
    entries: RefCell<BTreeMap<ListenerId, Rc<dyn OnExitListener>>>,
}

impl ExitListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Rc<dyn OnExitListener>) -> ListenerId {
        let mut entries = self.entries.borrow_mut();
        if let Some((id, _)) = entries
            .iter()
            .find(|(_, existing)| Rc::ptr_eq(existing, &listener))
        {
            return *id;
        }
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        entries.insert(id, listener);
        id
    }

    /// Returns `true` when a listener was registered under `id`.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.entries.borrow_mut().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Call every listener registered when notification starts. Entries
    /// removed mid-notification still receive this round.
    pub fn notify_all(&self, final_anchor: AnchorState) {
        let snapshot: Vec<Rc<dyn OnExitListener>> =
            self.entries.borrow().values().cloned().collect();
        for listener in snapshot {
            listener.on_exit_by_user_request(final_anchor);
        }
    }
}

impl std::fmt::Debug for ExitListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitListeners")
            .field("ids", &self.entries.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}
