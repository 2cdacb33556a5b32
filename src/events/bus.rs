//! Synchronous publish/subscribe hub for [`GameEvent`]s.
//!
//! The [`EventBus`] is a per-session resource: [`crate::game::setup_session`]
//! inserts one into the `World`, and collaborators (animation, sound, UI)
//! subscribe to the [`EventKind`]s they care about. Producers call
//! [`EventBus::emit`] from systems and observers.
//!
//! # Dispatch policy
//!
//! - Listeners run synchronously, in registration order, each at most once
//!   per `emit`.
//! - The listener list is snapshotted before dispatch. Listeners added while
//!   an `emit` is running first see the next event; listeners removed while
//!   it is running still receive the in-flight event, except `once`
//!   listeners, which run at most once in total.
//! - A listener returning `Err` or panicking is logged and skipped; the rest
//!   still run and `emit` itself never fails.
//!
//! The lock is released before any listener runs, so a listener may capture a
//! clone of the bus and call `on`, `off` or `emit` from inside a callback.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy_ecs::prelude::Resource;
use log::{error, trace, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::gameevent::{EventKind, GameEvent};

/// What a listener reports back. Errors are logged, never propagated.
pub type ListenerResult = Result<(), String>;

type Callback = dyn Fn(&GameEvent) -> ListenerResult + Send + Sync;

/// Handle returned by [`EventBus::on`] / [`EventBus::once`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Clone)]
struct Listener {
    id: ListenerId,
    callback: Arc<Callback>,
    /// Present on `once` listeners; flips to true on first delivery.
    spent: Option<Arc<AtomicBool>>,
}

impl Listener {
    fn retire(&self) {
        if let Some(spent) = &self.spent {
            spent.store(true, Ordering::Release);
        }
    }
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    listeners: FxHashMap<EventKind, SmallVec<[Listener; 4]>>,
}

/// Cheaply clonable handle to the session's event hub.
#[derive(Resource, Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        // Listeners never run under the lock, so poisoning only means a
        // panic escaped bookkeeping code; the data is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, kind: EventKind, callback: Arc<Callback>, once: bool) -> ListenerId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = ListenerId(state.next_id);
        state.listeners.entry(kind).or_default().push(Listener {
            id,
            callback,
            spent: once.then(|| Arc::new(AtomicBool::new(false))),
        });
        id
    }

    /// Subscribe `callback` to every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&GameEvent) -> ListenerResult + Send + Sync + 'static,
    {
        self.add(kind, Arc::new(callback), false)
    }

    /// Subscribe `callback` for the next event of `kind` only.
    pub fn once<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&GameEvent) -> ListenerResult + Send + Sync + 'static,
    {
        self.add(kind, Arc::new(callback), true)
    }

    /// Remove a listener. Returns false if it was not registered for `kind`.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut state = self.lock();
        let Some(list) = state.listeners.get_mut(&kind) else {
            return false;
        };
        let Some(index) = list.iter().position(|l| l.id == id) else {
            return false;
        };
        let removed = list.remove(index);
        removed.retire();
        if list.is_empty() {
            state.listeners.remove(&kind);
        }
        true
    }

    /// Drop every listener of `kind`, or of all kinds when `None`.
    pub fn remove_all_listeners(&self, kind: Option<EventKind>) {
        let mut state = self.lock();
        match kind {
            Some(kind) => {
                if let Some(list) = state.listeners.remove(&kind) {
                    list.iter().for_each(Listener::retire);
                }
            }
            None => {
                for (_, list) in state.listeners.drain() {
                    list.iter().for_each(Listener::retire);
                }
            }
        }
    }

    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.lock()
            .listeners
            .get(&kind)
            .is_some_and(|list| !list.is_empty())
    }

    /// Number of listeners for `kind`, or in total when `None`.
    pub fn listener_count(&self, kind: Option<EventKind>) -> usize {
        let state = self.lock();
        match kind {
            Some(kind) => state.listeners.get(&kind).map_or(0, |list| list.len()),
            None => state.listeners.values().map(|list| list.len()).sum(),
        }
    }

    /// Deliver `event` to every listener of its kind.
    pub fn emit(&self, event: GameEvent) {
        let kind = event.kind();
        let snapshot: SmallVec<[Listener; 8]> = {
            let state = self.lock();
            match state.listeners.get(&kind) {
                Some(list) => list.iter().cloned().collect(),
                None => {
                    trace!("No listeners for '{}'", kind.name());
                    return;
                }
            }
        };
        trace!("Emitting '{}' to {} listener(s)", kind.name(), snapshot.len());

        for listener in &snapshot {
            if let Some(spent) = &listener.spent {
                if spent.swap(true, Ordering::AcqRel) {
                    continue;
                }
                self.off(kind, listener.id);
            }
            self.invoke(kind, listener, &event);
        }
    }

    /// Emit a kind that carries no (or only optional) data.
    ///
    /// Kinds that need a payload are rejected with a warning.
    pub fn emit_kind(&self, kind: EventKind) {
        match GameEvent::without_payload(kind) {
            Some(event) => self.emit(event),
            None => warn!("'{}' requires a payload; nothing emitted", kind.name()),
        }
    }

    fn invoke(&self, kind: EventKind, listener: &Listener, event: &GameEvent) {
        let callback: &Callback = listener.callback.as_ref();
        match panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                "Listener {:?} for '{}' failed: {}",
                listener.id,
                kind.name(),
                e
            ),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    "Listener {:?} for '{}' panicked: {}",
                    listener.id,
                    kind.name(),
                    message
                );
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count(None))
            .finish()
    }
}
