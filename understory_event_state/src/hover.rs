// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking per target.
//!
//! A target is hovered while a mouse or pen pointer is inside its bounding box.
//! Touch pointers never produce hover state. Entering requires that no button
//! is held, so a drag that sweeps across a target does not light it up.
//!
//! The navigator also drives hover: [`HoverManager::sync_nav`] makes its current
//! element the only hovered one, so styling stays consistent between pointer and
//! keyboard/gamepad users.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_event_state::envelope::PointerKind;
//! use understory_event_state::host::{Marker, TargetHost};
//! use understory_event_state::hover::HoverManager;
//!
//! struct One(Rect, bool);
//! impl TargetHost<u8> for One {
//!     fn bounds(&self, _: u8) -> Option<Rect> { Some(self.0) }
//!     fn set_marker(&mut self, _: u8, _: Marker, on: bool) { self.1 = on; }
//! }
//!
//! let mut host = One(Rect::new(0.0, 0.0, 10.0, 10.0), false);
//! let mut hover = HoverManager::new();
//! hover.add(1_u8);
//!
//! let events = hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(5.0, 5.0), 0, 0);
//! assert!(events[0].payload.hover && host.1);
//!
//! // Touch is ignored entirely.
//! let events = hover.pointer_move(&mut host, PointerKind::Touch, Point::new(50.0, 5.0), 0, 1);
//! assert!(events.is_empty());
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::Point;
use smallvec::SmallVec;

use crate::envelope::{Hover, HoverEvent, PointerKind, UiEvent};
use crate::host::{Marker, TargetHost};
use crate::subscriptions::{Handler, SubscriptionId, Subscriptions};

/// Hover state machine for a set of opted-in targets.
#[derive(Debug)]
pub struct HoverManager<K> {
    subs: Subscriptions<K, HoverEvent<K>>,
    hovered: HashSet<K>,
}

impl<K: Copy + Eq + Hash> Default for HoverManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> HoverManager<K> {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            subs: Subscriptions::new(),
            hovered: HashSet::new(),
        }
    }

    /// Subscribe to hover events of `target`, opting it in.
    pub fn on(&mut self, target: K, handler: Handler<HoverEvent<K>>) -> SubscriptionId {
        self.subs.on(target, handler)
    }

    /// Remove a handler. If this drops the target's entry, its hover state goes too.
    pub fn off(&mut self, target: K, id: SubscriptionId) -> bool {
        let removed = self.subs.off(target, id);
        if !self.subs.contains(target) {
            self.hovered.remove(&target);
        }
        removed
    }

    /// Opt `target` in without a handler.
    pub fn add(&mut self, target: K) -> bool {
        self.subs.add(target)
    }

    /// Opt `target` out, dropping its handlers and clearing its marker.
    pub fn rm(&mut self, host: &mut impl TargetHost<K>, target: K) -> bool {
        if self.hovered.remove(&target) {
            host.set_marker(target, Marker::Hover, false);
        }
        self.subs.rm(target)
    }

    /// Whether `target` is currently hovered.
    pub fn is_hovered(&self, target: K) -> bool {
        self.hovered.contains(&target)
    }

    /// Pointer moved to `point`; `buttons` is the held-button mask.
    pub fn pointer_move(
        &mut self,
        host: &mut impl TargetHost<K>,
        kind: PointerKind,
        point: Point,
        buttons: u16,
        timestamp: u64,
    ) -> Vec<HoverEvent<K>> {
        let mut events = Vec::new();
        if kind == PointerKind::Touch {
            return events;
        }
        let targets: SmallVec<[K; 16]> = self.subs.targets().collect();
        for target in targets {
            let inside = host.bounds(target).is_some_and(|r| r.contains(point));
            let was = self.hovered.contains(&target);
            if inside && !was && buttons == 0 {
                events.push(self.set(host, target, true, timestamp));
            } else if !inside && was {
                events.push(self.set(host, target, false, timestamp));
            }
        }
        events
    }

    /// The pointer left the surface: every hovered target leaves.
    pub fn pointer_leave(
        &mut self,
        host: &mut impl TargetHost<K>,
        kind: PointerKind,
        timestamp: u64,
    ) -> Vec<HoverEvent<K>> {
        if kind == PointerKind::Touch {
            return Vec::new();
        }
        let hovered: SmallVec<[K; 4]> = self.hovered.iter().copied().collect();
        hovered
            .into_iter()
            .map(|t| self.set(host, t, false, timestamp))
            .collect()
    }

    /// Make the navigator's `current` element the only hovered one.
    ///
    /// `current` is marked even if it was never opted in; only subscribers of a
    /// target see its events.
    pub fn sync_nav(
        &mut self,
        host: &mut impl TargetHost<K>,
        current: Option<K>,
        timestamp: u64,
    ) -> Vec<HoverEvent<K>> {
        let mut events = Vec::new();
        let stale: SmallVec<[K; 4]> = self
            .hovered
            .iter()
            .copied()
            .filter(|t| Some(*t) != current)
            .collect();
        for target in stale {
            events.push(self.set(host, target, false, timestamp));
        }
        if let Some(current) = current
            && !self.hovered.contains(&current)
        {
            events.push(self.set(host, current, true, timestamp));
        }
        events
    }

    /// The navigator let go of `target` because a pointer moved to `point`.
    ///
    /// `target` keeps its hover when it is opted in and the pointer is over it.
    pub fn release_nav(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        point: Point,
        timestamp: u64,
    ) -> Option<HoverEvent<K>> {
        if !self.hovered.contains(&target) {
            return None;
        }
        let under_pointer = host.bounds(target).is_some_and(|r| r.contains(point));
        if under_pointer && self.subs.contains(target) {
            return None;
        }
        Some(self.set(host, target, false, timestamp))
    }

    /// Drop state for targets that are no longer alive.
    pub fn prune(&mut self, mut alive: impl FnMut(K) -> bool) {
        self.hovered.retain(|k| alive(*k));
        self.subs.prune(alive);
    }

    fn set(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        hover: bool,
        timestamp: u64,
    ) -> HoverEvent<K> {
        if hover {
            self.hovered.insert(target);
        } else {
            self.hovered.remove(&target);
        }
        host.set_marker(target, Marker::Hover, hover);
        let event = UiEvent::new(target, timestamp, Hover { hover });
        self.subs.emit(target, &event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::MapHost;
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use kurbo::Rect;

    fn host() -> MapHost {
        MapHost::with(&[
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(20.0, 0.0, 30.0, 10.0)),
        ])
    }

    #[test]
    fn enter_and_leave_emit_once_each() {
        let mut host = host();
        let mut hover = HoverManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        hover.on(1, Box::new(move |e: &HoverEvent<u32>| s.borrow_mut().push(e.payload.hover)));

        hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(5.0, 5.0), 0, 0);
        hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(6.0, 5.0), 0, 1);
        assert!(host.has(1, Marker::Hover));
        hover.pointer_move(&mut host, PointerKind::Pen, Point::new(50.0, 5.0), 0, 2);
        assert!(!host.has(1, Marker::Hover));
        assert_eq!(*seen.borrow(), [true, false]);
    }

    #[test]
    fn touch_never_hovers() {
        let mut host = host();
        let mut hover = HoverManager::new();
        hover.add(1);
        let events = hover.pointer_move(&mut host, PointerKind::Touch, Point::new(5.0, 5.0), 0, 0);
        assert!(events.is_empty());
        assert!(!hover.is_hovered(1));
    }

    #[test]
    fn held_buttons_block_entering_but_not_leaving() {
        let mut host = host();
        let mut hover = HoverManager::new();
        hover.add(1);
        let events = hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(5.0, 5.0), 1, 0);
        assert!(events.is_empty());
        hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(5.0, 5.0), 0, 1);
        assert!(hover.is_hovered(1));
        let events = hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(50.0, 5.0), 1, 2);
        assert_eq!(events.len(), 1);
        assert!(!events[0].payload.hover);
    }

    #[test]
    fn sync_nav_moves_hover_to_current() {
        let mut host = host();
        let mut hover = HoverManager::new();
        hover.add(1);
        hover.add(2);
        hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(5.0, 5.0), 0, 0);

        let events = hover.sync_nav(&mut host, Some(2), 1);
        assert_eq!(events.len(), 2);
        assert!(!hover.is_hovered(1));
        assert!(hover.is_hovered(2));
        assert!(host.has(2, Marker::Hover));

        // Already hovered: nothing to do.
        assert!(hover.sync_nav(&mut host, Some(2), 2).is_empty());
        let events = hover.sync_nav(&mut host, None, 3);
        assert_eq!(events, [UiEvent::new(2, 3, Hover { hover: false })]);
    }

    #[test]
    fn release_nav_keeps_hover_under_the_pointer() {
        let mut host = host();
        let mut hover = HoverManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        hover.on(1, Box::new(move |e: &HoverEvent<u32>| s.borrow_mut().push(e.payload.hover)));
        hover.sync_nav(&mut host, Some(1), 0);

        assert!(hover.release_nav(&mut host, 1, Point::new(5.0, 5.0), 1).is_none());
        assert!(hover.is_hovered(1));
        let events = hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(6.0, 5.0), 0, 2);
        assert!(events.is_empty());
        assert_eq!(*seen.borrow(), [true]);

        let event = hover.release_nav(&mut host, 1, Point::new(50.0, 5.0), 3);
        assert_eq!(event, Some(UiEvent::new(1, 3, Hover { hover: false })));
        assert!(!host.has(1, Marker::Hover));
    }

    #[test]
    fn release_nav_clears_targets_that_never_opted_in() {
        let mut host = host();
        let mut hover = HoverManager::new();
        hover.sync_nav(&mut host, Some(2), 0);
        assert!(host.has(2, Marker::Hover));

        let event = hover.release_nav(&mut host, 2, Point::new(25.0, 5.0), 1);
        assert!(event.is_some());
        assert!(!hover.is_hovered(2));
        assert!(hover.release_nav(&mut host, 2, Point::new(25.0, 5.0), 2).is_none());
    }

    #[test]
    fn rm_clears_marker_and_state() {
        let mut host = host();
        let mut hover = HoverManager::new();
        hover.add(1);
        hover.pointer_move(&mut host, PointerKind::Mouse, Point::new(5.0, 5.0), 0, 0);
        assert!(hover.rm(&mut host, 1));
        assert!(!host.has(1, Marker::Hover));
        assert!(!hover.is_hovered(1));
        assert!(!hover.rm(&mut host, 1));
    }
}
