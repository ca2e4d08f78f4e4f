// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pressed-state tracking that unifies mouse, touch, and navigator input.
//!
//! "Active" is decoupled from click semantics: it only answers *is this target
//! pressed right now, and by whom*. Widgets use it for press-and-hold feedback
//! and delayed activation; click recognition stays a separate concern.
//!
//! ## State machine
//!
//! Each opted-in target is either idle or pressed by exactly one [`PointerId`].
//!
//! `idle → pressed`:
//! - primary mouse button down ([`PointerId::Mouse`]),
//! - the first contact of a touch start ([`PointerId::Touch`]),
//! - the navigator confirming its current element ([`PointerId::Nav`]).
//!
//! `pressed → idle`:
//! - mouse up: a clean release,
//! - the mouse leaving the target while pressed: `cancel = true`,
//! - the owning touch ending: a clean release,
//! - the owning touch moving outside the target's box: `cancel = true`,
//! - the navigator moving away or releasing.
//!
//! Any press on a target that is already pressed is ignored, whatever its identity.
//!
//! ## Usage
//!
//! ```
//! use kurbo::Rect;
//! use understory_event_state::active::{ActiveManager, PRIMARY_BUTTON};
//! use understory_event_state::envelope::PointerId;
//! use understory_event_state::host::{Marker, TargetHost};
//!
//! struct Host;
//! impl TargetHost<u32> for Host {
//!     fn bounds(&self, _: u32) -> Option<Rect> { Some(Rect::new(0.0, 0.0, 10.0, 10.0)) }
//!     fn set_marker(&mut self, _: u32, _: Marker, _: bool) {}
//! }
//!
//! let mut active = ActiveManager::new();
//! active.add(42_u32);
//!
//! let down = active.mouse_down(&mut Host, 42, PRIMARY_BUTTON, 1_000).unwrap();
//! assert!(down.payload.active);
//! assert_eq!(active.owner(42), Some(PointerId::Mouse));
//!
//! // A second press while pressed is ignored.
//! assert!(active.mouse_down(&mut Host, 42, PRIMARY_BUTTON, 1_010).is_none());
//!
//! let up = active.mouse_up(&mut Host, 42, 1_050).unwrap();
//! assert!(!up.payload.active && !up.payload.cancel);
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::envelope::{Active, ActiveEvent, PointerId, Touch, TouchResponse, UiEvent};
use crate::host::{Marker, TargetHost};
use crate::subscriptions::{Handler, SubscriptionId, Subscriptions};

/// Mouse button identifier, numbered the way DOM `MouseEvent.button` is.
pub type Button = u8;

/// The primary (usually left) mouse button.
pub const PRIMARY_BUTTON: Button = 0;

/// Per-target pressed state.
#[derive(Debug)]
pub struct ActiveManager<K> {
    subs: Subscriptions<K, ActiveEvent<K>>,
    /// Activation record: which identity owns each pressed target.
    owners: HashMap<K, PointerId>,
}

impl<K: Copy + Eq + Hash> Default for ActiveManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> ActiveManager<K> {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            subs: Subscriptions::new(),
            owners: HashMap::new(),
        }
    }

    /// Subscribe to active events of `target`, opting it in.
    pub fn on(&mut self, target: K, handler: Handler<ActiveEvent<K>>) -> SubscriptionId {
        self.subs.on(target, handler)
    }

    /// Remove a handler.
    pub fn off(&mut self, target: K, id: SubscriptionId) -> bool {
        let removed = self.subs.off(target, id);
        if !self.subs.contains(target) {
            self.owners.remove(&target);
        }
        removed
    }

    /// Opt `target` in without a handler.
    pub fn add(&mut self, target: K) -> bool {
        self.subs.add(target)
    }

    /// Opt `target` out. A pressed target is released silently.
    pub fn rm(&mut self, host: &mut impl TargetHost<K>, target: K) -> bool {
        if self.owners.remove(&target).is_some() {
            host.set_marker(target, Marker::Active, false);
        }
        self.subs.rm(target)
    }

    /// Identity currently pressing `target`.
    pub fn owner(&self, target: K) -> Option<PointerId> {
        self.owners.get(&target).copied()
    }

    /// Whether `target` is pressed.
    pub fn is_active(&self, target: K) -> bool {
        self.owners.contains_key(&target)
    }

    /// Mouse button pressed over `target`. Only [`PRIMARY_BUTTON`] presses.
    pub fn mouse_down(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        button: Button,
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        if button != PRIMARY_BUTTON || !self.can_press(target) {
            return None;
        }
        Some(self.press(host, target, PointerId::Mouse, timestamp))
    }

    /// Mouse button released over a mouse-pressed `target`.
    pub fn mouse_up(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        if self.owner(target) != Some(PointerId::Mouse) {
            return None;
        }
        Some(self.release(host, target, false, PointerId::Mouse, timestamp))
    }

    /// Mouse left a mouse-pressed `target`; the press is cancelled.
    pub fn mouse_leave(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        if self.owner(target) != Some(PointerId::Mouse) {
            return None;
        }
        Some(self.release(host, target, true, PointerId::Mouse, timestamp))
    }

    /// Touch began on `target`; the first changed contact takes ownership.
    pub fn touch_start(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> TouchResponse<ActiveEvent<K>> {
        let Some(first) = changed.first() else {
            return TouchResponse::ignored();
        };
        if !self.can_press(target) {
            return TouchResponse::ignored();
        }
        TouchResponse::handled(self.press(host, target, PointerId::Touch(first.id), timestamp))
    }

    /// Touches ended; releases `target` if its owning contact is among them.
    pub fn touch_end(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        let owner = self.touch_owner(target, changed)?;
        Some(self.release(host, target, false, owner, timestamp))
    }

    /// Touches moved; cancels `target` if its owning contact left the box.
    pub fn touch_move(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        let owner = self.touch_owner(target, changed)?;
        let PointerId::Touch(id) = owner else {
            return None;
        };
        let touch = changed.iter().find(|t| t.id == id)?;
        let inside = host.bounds(target).is_some_and(|r| {
            let p = touch.point;
            p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
        });
        if inside {
            return None;
        }
        Some(self.release(host, target, true, owner, timestamp))
    }

    /// The navigator moved to `current`: every other pressed target is cancelled.
    pub fn sync_nav(
        &mut self,
        host: &mut impl TargetHost<K>,
        current: Option<K>,
        timestamp: u64,
    ) -> Vec<ActiveEvent<K>> {
        let stale: SmallVec<[K; 4]> = self
            .owners
            .keys()
            .copied()
            .filter(|t| Some(*t) != current)
            .collect();
        stale
            .into_iter()
            .map(|t| self.release(host, t, true, PointerId::Nav, timestamp))
            .collect()
    }

    /// The navigator pressed (`active = true`) or released its current element.
    ///
    /// Only opted-in targets respond, and only when the state actually changes.
    pub fn nav_active(
        &mut self,
        host: &mut impl TargetHost<K>,
        current: Option<K>,
        active: bool,
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        let target = current.filter(|t| self.subs.contains(*t))?;
        if self.is_active(target) == active {
            return None;
        }
        Some(if active {
            self.press(host, target, PointerId::Nav, timestamp)
        } else {
            self.release(host, target, false, PointerId::Nav, timestamp)
        })
    }

    /// Force-release `target`, reporting a cancel. No-op when idle.
    pub fn deactivate(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        timestamp: u64,
    ) -> Option<ActiveEvent<K>> {
        let owner = self.owner(target)?;
        Some(self.release(host, target, true, owner, timestamp))
    }

    /// Drop state for targets that are no longer alive.
    pub fn prune(&mut self, mut alive: impl FnMut(K) -> bool) {
        self.owners.retain(|k, _| alive(*k));
        self.subs.prune(alive);
    }

    fn can_press(&self, target: K) -> bool {
        self.subs.contains(target) && !self.owners.contains_key(&target)
    }

    fn touch_owner(&self, target: K, changed: &[Touch]) -> Option<PointerId> {
        match self.owner(target)? {
            PointerId::Touch(id) if changed.iter().any(|t| t.id == id) => {
                Some(PointerId::Touch(id))
            }
            _ => None,
        }
    }

    fn press(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        pointer_id: PointerId,
        timestamp: u64,
    ) -> ActiveEvent<K> {
        self.owners.insert(target, pointer_id);
        host.set_marker(target, Marker::Active, true);
        self.dispatch(target, true, false, pointer_id, timestamp)
    }

    fn release(
        &mut self,
        host: &mut impl TargetHost<K>,
        target: K,
        cancel: bool,
        pointer_id: PointerId,
        timestamp: u64,
    ) -> ActiveEvent<K> {
        self.owners.remove(&target);
        host.set_marker(target, Marker::Active, false);
        self.dispatch(target, false, cancel, pointer_id, timestamp)
    }

    fn dispatch(
        &mut self,
        target: K,
        active: bool,
        cancel: bool,
        pointer_id: PointerId,
        timestamp: u64,
    ) -> ActiveEvent<K> {
        let event = UiEvent::new(
            target,
            timestamp,
            Active {
                active,
                cancel,
                pointer_id,
            },
        );
        self.subs.emit(target, &event);
        event
    }
}
