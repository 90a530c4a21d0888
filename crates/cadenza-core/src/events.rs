//! Typed per-instance event bus.
//!
//! Listeners are keyed by an event's [`Event::Kind`] and invoked in
//! registration order with the owning context (usually a track) and the
//! event payload. Listener identity is `Arc` identity, so the same listener
//! can be registered twice (and fires twice) and removed by handle.
//!
//! # Example
//! ```
//! use cadenza_core::{listener, Event, EventBus};
//!
//! #[derive(Debug)]
//! enum Ping { Ping(u32) }
//!
//! impl Event for Ping {
//!     type Kind = ();
//!     fn kind(&self) -> Self::Kind {}
//! }
//!
//! let bus: EventBus<String, Ping> = EventBus::new();
//! let log = listener(|ctx: &String, Ping::Ping(n): &Ping| println!("{ctx}: {n}"));
//! bus.on((), log.clone());
//! bus.trigger(&"host".to_string(), &Ping::Ping(42));
//! bus.off((), Some(&log));
//! assert_eq!(bus.listener_count(()), 0);
//! ```

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// An event payload that can be routed by kind.
pub trait Event: Send + Sync {
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync;

    fn kind(&self) -> Self::Kind;
}

/// Shared listener callback. Compared by pointer identity.
pub type Listener<C, E> = Arc<dyn Fn(&C, &E) + Send + Sync>;

/// Wrap a closure as a [`Listener`].
pub fn listener<C, E, F>(f: F) -> Listener<C, E>
where
    F: Fn(&C, &E) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub struct EventBus<C, E: Event> {
    listeners: Mutex<HashMap<E::Kind, Vec<Listener<C, E>>>>,
}

impl<C, E: Event> Default for EventBus<C, E> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
        }
    }
}

impl<C, E: Event> EventBus<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the list for `kind`.
    pub fn on(&self, kind: E::Kind, listener: Listener<C, E>) -> &Self {
        self.listeners.lock().entry(kind).or_default().push(listener);
        self
    }

    /// Remove every registration of `listener`, or all listeners for `kind`
    /// when `None`. The remaining listeners keep their order.
    pub fn off(&self, kind: E::Kind, listener: Option<&Listener<C, E>>) -> &Self {
        let mut listeners = self.listeners.lock();
        match listener {
            None => {
                listeners.remove(&kind);
            }
            Some(target) => {
                if let Some(list) = listeners.get_mut(&kind) {
                    list.retain(|l| !Arc::ptr_eq(l, target));
                }
            }
        }
        self
    }

    /// Register `listener` unless `skip` returns true. `skip` runs with the
    /// listener table locked, pairing with [`EventBus::exclusive`] so a state
    /// flip and this check cannot interleave. Returns whether it registered.
    pub fn on_unless(
        &self,
        kind: E::Kind,
        listener: Listener<C, E>,
        skip: impl FnOnce() -> bool,
    ) -> bool {
        let mut listeners = self.listeners.lock();
        if skip() {
            return false;
        }
        listeners.entry(kind).or_default().push(listener);
        true
    }

    /// Run `f` with the listener table locked. `f` must not touch this bus.
    pub fn exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.listeners.lock();
        f()
    }

    /// Invoke every listener for `event.kind()` synchronously, in order.
    ///
    /// Listeners run on a snapshot of the list, so they may register or
    /// remove listeners (or trigger further events) without deadlocking.
    /// A panicking listener propagates to the caller; later listeners are
    /// skipped.
    pub fn trigger(&self, ctx: &C, event: &E) -> &Self {
        let snapshot = match self.listeners.lock().get(&event.kind()) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => return self,
        };
        for listener in &snapshot {
            listener(ctx, event);
        }
        self
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }
}

impl<C, E: Event> fmt::Debug for EventBus<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let mut counts: Vec<_> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_by_key(|(k, _)| format!("{:?}", k));
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}
