// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-target handler registry.
//!
//! A target gets an entry lazily, on the first [`Subscriptions::on`] or
//! [`Subscriptions::add`]. The entry goes away when:
//! - [`Subscriptions::rm`] is called, or
//! - its last handler is removed with [`Subscriptions::off`] and it was never
//!   opted in through [`Subscriptions::add`].
//!
//! Managers treat "has an entry" as "is opted in": raw input for a target
//! without an entry is ignored.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_event_state::subscriptions::Subscriptions;
//!
//! let seen = Rc::new(Cell::new(0));
//! let mut subs: Subscriptions<u32, u32> = Subscriptions::new();
//! let s = seen.clone();
//! let id = subs.on(7, Box::new(move |v: &u32| s.set(s.get() + *v)));
//!
//! assert_eq!(subs.emit(7, &5), 1);
//! assert_eq!(seen.get(), 5);
//!
//! // Removing the last handler tears the entry down.
//! assert!(subs.off(7, id));
//! assert!(!subs.contains(7));
//! ```

use alloc::boxed::Box;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Handle returned by [`Subscriptions::on`], used to remove the handler again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Boxed event handler.
pub type Handler<E> = Box<dyn FnMut(&E)>;

struct Entry<E> {
    declared: bool,
    handlers: SmallVec<[(SubscriptionId, Handler<E>); 2]>,
}

/// Mapping from target to handlers for a single event type.
pub struct Subscriptions<K, E> {
    entries: HashMap<K, Entry<E>>,
    next_id: u64,
}

impl<K, E> core::fmt::Debug for Subscriptions<K, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let handlers: usize = self.entries.values().map(|e| e.handlers.len()).sum();
        f.debug_struct("Subscriptions")
            .field("targets", &self.entries.len())
            .field("handlers", &handlers)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<K: Copy + Eq + Hash, E> Default for Subscriptions<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash, E> Subscriptions<K, E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a handler for `target`.
    pub fn on(&mut self, target: K, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries
            .entry(target)
            .or_insert_with(|| Entry {
                declared: false,
                handlers: SmallVec::new(),
            })
            .handlers
            .push((id, handler));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered for `target`.
    pub fn off(&mut self, target: K, id: SubscriptionId) -> bool {
        let Some(entry) = self.entries.get_mut(&target) else {
            return false;
        };
        let before = entry.handlers.len();
        entry.handlers.retain(|(h, _)| *h != id);
        let removed = entry.handlers.len() != before;
        if entry.handlers.is_empty() && !entry.declared {
            self.entries.remove(&target);
        }
        removed
    }

    /// Opt `target` in without a handler.
    ///
    /// Returns `false` if it was already declared.
    pub fn add(&mut self, target: K) -> bool {
        let entry = self.entries.entry(target).or_insert_with(|| Entry {
            declared: false,
            handlers: SmallVec::new(),
        });
        !core::mem::replace(&mut entry.declared, true)
    }

    /// Drop the entry for `target` along with all of its handlers.
    pub fn rm(&mut self, target: K) -> bool {
        self.entries.remove(&target).is_some()
    }

    /// Whether `target` has an entry.
    pub fn contains(&self, target: K) -> bool {
        self.entries.contains_key(&target)
    }

    /// Number of targets with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no target has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over targets with an entry.
    pub fn targets(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }

    /// Deliver `event` to every handler of `target`; returns how many ran.
    pub fn emit(&mut self, target: K, event: &E) -> usize {
        let Some(entry) = self.entries.get_mut(&target) else {
            return 0;
        };
        for (_, handler) in &mut entry.handlers {
            handler(event);
        }
        entry.handlers.len()
    }

    /// Drop entries whose target is no longer alive.
    pub fn prune(&mut self, mut alive: impl FnMut(K) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| alive(*k));
        before - self.entries.len()
    }
}
