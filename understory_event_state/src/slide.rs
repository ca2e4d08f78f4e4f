// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag gestures as a `start → move* → end` stream per target.
//!
//! Each target slides under at most one [`PointerId`], but any number of
//! targets may slide at once under distinct identities (two sliders dragged by
//! two fingers never see each other's coordinates).
//!
//! Pointer-down entry points ([`SlideManager::mouse_down`],
//! [`SlideManager::touch_start`]) begin a gesture immediately and emit `start`.
//! [`SlideManager::start`] lets a caller begin one on its own terms, for example
//! after a long press, without emitting anything.
//!
//! Window-level input (`mouse_move`, `mouse_up`, `touch_move`, `touch_end`) is
//! only consumed while [`SlideManager::is_listening`], that is while at least
//! one gesture is live. Hosts may use that flag to install and remove their
//! global listeners lazily.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::envelope::{PointerId, Slide, SlideEvent, SlideState, Touch, TouchResponse, UiEvent};
use crate::host::{Marker, TargetHost};
use crate::subscriptions::{Handler, SubscriptionId, Subscriptions};

/// Per-target drag gesture state.
#[derive(Debug)]
pub struct SlideManager<K> {
    subs: Subscriptions<K, SlideEvent<K>>,
    owners: HashMap<K, PointerId>,
    listening: bool,
}

impl<K: Copy + Eq + Hash> Default for SlideManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> SlideManager<K> {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            subs: Subscriptions::new(),
            owners: HashMap::new(),
            listening: false,
        }
    }

    /// Subscribe to slide events of `target`, opting it in.
    pub fn on(&mut self, target: K, handler: Handler<SlideEvent<K>>) -> SubscriptionId {
        self.subs.on(target, handler)
    }

    /// Remove a handler.
    pub fn off(&mut self, target: K, id: SubscriptionId) -> bool {
        self.subs.off(target, id)
    }

    /// Opt `target` in without a handler.
    pub fn add(&mut self, target: K) -> bool {
        self.subs.add(target)
    }

    /// Opt `target` out, ending any live gesture silently.
    pub fn rm(&mut self, host: &mut impl TargetHost<K>, target: K) -> bool {
        self.cancel(host, target);
        self.subs.rm(target)
    }

    /// Begin a gesture on `target` driven by `pointer`.
    ///
    /// Fails if `target` is not opted in or is already sliding.
    pub fn start(&mut self, host: &mut impl TargetHost<K>, target: K, pointer: PointerId) -> bool {
        if !self.can_start(target) {
            return false;
        }
        self.activate(host, target, pointer);
        true
    }

    /// Force-end the gesture on `target` without emitting `end`.
    pub fn cancel(&mut self, host: &mut impl TargetHost<K>, target: K) -> bool {
        if !self.owners.contains_key(&target) {
            return false;
        }
        self.deactivate(host, target);
        true
    }

    /// Whether `target` is sliding.
    pub fn is_sliding(&self, target: K) -> bool {
        self.owners.contains_key(&target)
    }

    /// Identity driving the gesture on `target`.
    pub fn owner(&self, target: K) -> Option<PointerId> {
        self.owners.get(&target).copied()
    }

    /// Whether window-level input is being consumed.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Mouse pressed on `target`.
    pub fn mouse_down(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        point: Point,
        timestamp: u64,
    ) -> Option<SlideEvent<K>> {
        if !self.can_start(target) {
            return None;
        }
        self.activate(host, target, PointerId::Mouse);
        Some(self.dispatch(target, SlideState::Start, point, timestamp))
    }

    /// Touch began on `target`; the first changed contact drives the gesture.
    pub fn touch_start(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> TouchResponse<SlideEvent<K>> {
        let Some(first) = changed.first() else {
            return TouchResponse::ignored();
        };
        if !self.can_start(target) {
            return TouchResponse::ignored();
        }
        self.activate(host, target, PointerId::Touch(first.id));
        TouchResponse::handled(self.dispatch(target, SlideState::Start, first.point, timestamp))
    }

    /// Window-level mouse move.
    pub fn mouse_move(&mut self, point: Point, timestamp: u64) -> Vec<SlideEvent<K>> {
        if !self.listening {
            return Vec::new();
        }
        self.owned_by_mouse()
            .into_iter()
            .map(|t| self.dispatch(t, SlideState::Move, point, timestamp))
            .collect()
    }

    /// Window-level mouse up: every mouse-driven gesture ends.
    pub fn mouse_up(
        &mut self,
        host: &mut impl TargetHost<K>,
        point: Point,
        timestamp: u64,
    ) -> Vec<SlideEvent<K>> {
        if !self.listening {
            return Vec::new();
        }
        let mut events = Vec::new();
        for target in self.owned_by_mouse() {
            events.push(self.dispatch(target, SlideState::End, point, timestamp));
            self.deactivate(host, target);
        }
        events
    }

    /// Window-level touch move.
    pub fn touch_move(&mut self, changed: &[Touch], timestamp: u64) -> Vec<SlideEvent<K>> {
        if !self.listening {
            return Vec::new();
        }
        self.owned_by_touch(changed)
            .into_iter()
            .map(|(t, p)| self.dispatch(t, SlideState::Move, p, timestamp))
            .collect()
    }

    /// Window-level touch end: gestures whose contact lifted end.
    pub fn touch_end(
        &mut self,
        host: &mut impl TargetHost<K>,
        changed: &[Touch],
        timestamp: u64,
    ) -> Vec<SlideEvent<K>> {
        if !self.listening {
            return Vec::new();
        }
        let mut events = Vec::new();
        for (target, point) in self.owned_by_touch(changed) {
            events.push(self.dispatch(target, SlideState::End, point, timestamp));
            self.deactivate(host, target);
        }
        events
    }

    /// Drop state for targets that are no longer alive.
    pub fn prune(&mut self, mut alive: impl FnMut(K) -> bool) {
        self.owners.retain(|k, _| alive(*k));
        self.subs.prune(alive);
        if self.owners.is_empty() {
            self.listening = false;
        }
    }

    fn can_start(&self, target: K) -> bool {
        self.subs.contains(target) && !self.owners.contains_key(&target)
    }

    fn owned_by_mouse(&self) -> SmallVec<[K; 2]> {
        self.owners
            .iter()
            .filter(|(_, p)| **p == PointerId::Mouse)
            .map(|(t, _)| *t)
            .collect()
    }

    fn owned_by_touch(&self, changed: &[Touch]) -> SmallVec<[(K, Point); 2]> {
        self.owners
            .iter()
            .filter_map(|(t, p)| match p {
                PointerId::Touch(id) => changed
                    .iter()
                    .find(|c| c.id == *id)
                    .map(|c| (*t, c.point)),
                _ => None,
            })
            .collect()
    }

    fn activate(&mut self, host: &mut impl TargetHost<K>, target: K, pointer: PointerId) {
        self.owners.insert(target, pointer);
        host.set_marker(target, Marker::Slide, true);
        if self.owners.len() == 1 {
            self.listening = true;
            log::trace!("slide: window listeners on");
        }
    }

    fn deactivate(&mut self, host: &mut impl TargetHost<K>, target: K) {
        self.owners.remove(&target);
        host.set_marker(target, Marker::Slide, false);
        if self.owners.is_empty() {
            self.listening = false;
            log::trace!("slide: window listeners off");
        }
    }

    fn dispatch(
        &mut self,
        target: K,
        state: SlideState,
        point: Point,
        timestamp: u64,
    ) -> SlideEvent<K> {
        let event = UiEvent::new(
            target,
            timestamp,
            Slide {
                state,
                x: point.x,
                y: point.y,
            },
        );
        self.subs.emit(target, &event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::MapHost;
    use kurbo::Rect;

    fn setup() -> (MapHost, SlideManager<u32>) {
        let host = MapHost::with(&[
            (1, Rect::new(0.0, 0.0, 100.0, 10.0)),
            (2, Rect::new(0.0, 20.0, 100.0, 30.0)),
        ]);
        let mut slide = SlideManager::new();
        slide.add(1);
        slide.add(2);
        (host, slide)
    }

    #[test]
    fn start_and_cancel_are_silent_and_guarded() {
        let (mut host, mut slide) = setup();
        assert!(!slide.start(&mut host, 9, PointerId::Mouse), "not opted in");
        assert!(slide.start(&mut host, 1, PointerId::Mouse));
        assert!(!slide.start(&mut host, 1, PointerId::Touch(0)), "already sliding");
        assert!(slide.is_listening());
        assert!(host.has(1, Marker::Slide));
        assert!(slide.cancel(&mut host, 1));
        assert!(!slide.cancel(&mut host, 1));
        assert!(!slide.is_listening());
        assert!(!host.has(1, Marker::Slide));
    }

    #[test]
    fn mouse_gesture_runs_start_move_end() {
        let (mut host, mut slide) = setup();
        assert!(slide.mouse_move(Point::new(1.0, 1.0), 0).is_empty(), "not listening yet");
        let start = slide.mouse_down(&mut host, 1, Point::new(5.0, 5.0), 0);
        assert_eq!(start.map(|e| e.payload.state), Some(SlideState::Start));
        let moves = slide.mouse_move(Point::new(40.0, 8.0), 1);
        assert_eq!(moves.len(), 1);
        assert_eq!((moves[0].payload.x, moves[0].payload.y), (40.0, 8.0));
        let ends = slide.mouse_up(&mut host, Point::new(42.0, 8.0), 2);
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].payload.state, SlideState::End);
        assert!(!slide.is_sliding(1));
        assert!(!slide.is_listening());
    }

    #[test]
    fn two_touches_stay_independent() {
        let (mut host, mut slide) = setup();
        let a = slide.touch_start(&mut host, 1, &[Touch::new(0, Point::new(5.0, 5.0))], 0);
        let b = slide.touch_start(&mut host, 2, &[Touch::new(1, Point::new(5.0, 25.0))], 0);
        assert!(a.prevent_default && b.prevent_default);

        let moves = slide.touch_move(&[Touch::new(1, Point::new(60.0, 25.0))], 1);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].target, 2);
        assert_eq!(moves[0].payload.x, 60.0);

        let ends = slide.touch_end(&mut host, &[Touch::new(0, Point::new(30.0, 5.0))], 2);
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].target, 1);
        assert!(slide.is_sliding(2));
        assert!(slide.is_listening());

        // Mouse movement never reaches touch-driven gestures.
        assert!(slide.mouse_move(Point::new(1.0, 1.0), 3).is_empty());
    }
}
