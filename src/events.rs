//! Change and debug notifications.
//!
//! Every [`Instance`](crate::Instance) owns its own bus. Listeners run
//! synchronously, in registration order, before the operation that fired
//! them returns. The listener list is copied before each dispatch, so a
//! listener may subscribe or unsubscribe from inside its own callback; the
//! change takes effect from the next event.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Identifier returned when subscribing, used to unsubscribe.
pub type ListenerId = u64;

/// Callback for change events.
pub type ChangeListener = Arc<dyn Fn(&Change) + Send + Sync>;

/// Callback for debug events.
pub type DebugListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Mutations: create, drop, truncate, set, delete
    Change,
    /// One message per completed storage statement
    Debug,
}

/// Kind of mutation carried by a [`Change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOp {
    /// Table created
    Create,
    /// Table dropped
    Drop,
    /// Table emptied
    Truncate,
    /// Key written
    Set,
    /// Key deleted
    Delete,
}

impl ChangeOp {
    /// Upper-case operation name
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeOp::Create => "CREATE",
            ChangeOp::Drop => "DROP",
            ChangeOp::Truncate => "TRUNCATE",
            ChangeOp::Set => "SET",
            ChangeOp::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed mutation.
///
/// Table-level operations carry the table name; key-level operations carry
/// the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Table created
    Create(String),
    /// Table dropped
    Drop(String),
    /// Table emptied
    Truncate(String),
    /// Key written
    Set {
        /// Key that was written
        key: String,
        /// Whether an existing row was overwritten, if the backend can tell
        updated: Option<bool>,
    },
    /// Key deleted
    Delete(String),
}

impl Change {
    /// The operation this change reports
    pub fn op(&self) -> ChangeOp {
        match self {
            Change::Create(_) => ChangeOp::Create,
            Change::Drop(_) => ChangeOp::Drop,
            Change::Truncate(_) => ChangeOp::Truncate,
            Change::Set { .. } => ChangeOp::Set,
            Change::Delete(_) => ChangeOp::Delete,
        }
    }
}

#[derive(Default)]
struct Listeners {
    next_id: ListenerId,
    change: Vec<(ListenerId, ChangeListener)>,
    debug: Vec<(ListenerId, DebugListener)>,
}

impl Listeners {
    fn allocate(&mut self) -> ListenerId {
        self.next_id += 1;
        self.next_id
    }
}

/// Per-instance listener registry
#[derive(Default)]
pub(crate) struct EventBus {
    listeners: Mutex<Listeners>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_change(&self, listener: ChangeListener) -> ListenerId {
        let mut listeners = self.listeners.lock();
        let id = listeners.allocate();
        listeners.change.push((id, listener));
        id
    }

    pub(crate) fn on_debug(&self, listener: DebugListener) -> ListenerId {
        let mut listeners = self.listeners.lock();
        let id = listeners.allocate();
        listeners.debug.push((id, listener));
        id
    }

    /// Remove one listener from whichever channel holds it
    pub(crate) fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.change.len() + listeners.debug.len();
        listeners.change.retain(|(lid, _)| *lid != id);
        listeners.debug.retain(|(lid, _)| *lid != id);
        listeners.change.len() + listeners.debug.len() != before
    }

    pub(crate) fn remove_all(&self, kind: EventKind) {
        let mut listeners = self.listeners.lock();
        match kind {
            EventKind::Change => listeners.change.clear(),
            EventKind::Debug => listeners.debug.clear(),
        }
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        let listeners = self.listeners.lock();
        match kind {
            EventKind::Change => listeners.change.len(),
            EventKind::Debug => listeners.debug.len(),
        }
    }

    pub(crate) fn emit_change(&self, change: &Change) {
        let snapshot: Vec<ChangeListener> = self
            .listeners
            .lock()
            .change
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(change);
        }
    }

    pub(crate) fn emit_debug(&self, message: &str) {
        let snapshot: Vec<DebugListener> = self
            .listeners
            .lock()
            .debug
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(message);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        f.debug_struct("EventBus")
            .field("change", &listeners.change.len())
            .field("debug", &listeners.debug.len())
            .finish()
    }
}
