// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive "press the combination you want" capture.
//!
//! A binder records every key pressed during one continuous press/release
//! cycle. Keys added while others are held join the same combination. The
//! capture finishes when every captured key has been released. If only some
//! keys are released, they stay part of the combination for a short grace
//! window; a new key inside the window drops them, and the window elapsing
//! drops them too.
//!
//! ```
//! use understory_keyboard::{BinderConfig, BinderEvent, KeyBinder, KeyCode, KeySet};
//!
//! let mut binder = KeyBinder::new(BinderConfig::default());
//! binder.key_down(KeyCode::ControlLeft, 0);
//! binder.key_down(KeyCode::KeyS, 10);
//! assert_eq!(binder.key_up(KeyCode::KeyS, 50), None);
//! let done = binder.key_up(KeyCode::ControlLeft, 60);
//! assert_eq!(done, Some(BinderEvent::Done(KeySet::from([KeyCode::ControlLeft, KeyCode::KeyS]))));
//! assert!(!binder.is_binding());
//! ```

use crate::code::{KeyCode, KeySet};

/// Binder timing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BinderConfig {
    /// Grace window after a partial release, in milliseconds.
    pub deactivation_delay: u64,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            deactivation_delay: 100,
        }
    }
}

/// Progress of a capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinderEvent {
    /// The combination in progress changed.
    Update(KeySet),
    /// Capture finished with this combination.
    Done(KeySet),
}

/// One-shot key combination capture.
#[derive(Clone, Debug)]
pub struct KeyBinder {
    config: BinderConfig,
    activated: KeySet,
    deactivating: KeySet,
    deadline: Option<u64>,
    binding: bool,
}

impl KeyBinder {
    /// Start capturing.
    pub fn new(config: BinderConfig) -> Self {
        Self {
            config,
            activated: KeySet::EMPTY,
            deactivating: KeySet::EMPTY,
            deadline: None,
            binding: true,
        }
    }

    /// Whether the capture is still running.
    pub fn is_binding(&self) -> bool {
        self.binding
    }

    /// The combination captured so far.
    pub fn keys(&self) -> KeySet {
        self.activated
    }

    /// A key went down. Auto-repeat of a held key is ignored.
    pub fn key_down(&mut self, key: KeyCode, _now: u64) -> Option<BinderEvent> {
        if !self.binding || (self.activated.contains(key) && !self.deactivating.contains(key)) {
            return None;
        }
        if self.deadline.take().is_some() {
            self.flush();
        }
        self.activated.insert(key);
        Some(BinderEvent::Update(self.activated))
    }

    /// A key went up.
    pub fn key_up(&mut self, key: KeyCode, now: u64) -> Option<BinderEvent> {
        if !self.binding || !self.activated.contains(key) {
            return None;
        }
        self.deactivating.insert(key);
        if self.deactivating.len() == self.activated.len() {
            self.binding = false;
            self.deadline = None;
            log::debug!("key binder finished with {:?}", self.activated);
            return Some(BinderEvent::Done(self.activated));
        }
        self.deadline = Some(now.saturating_add(self.config.deactivation_delay));
        None
    }

    /// Advance the grace window.
    pub fn tick(&mut self, now: u64) -> Option<BinderEvent> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.flush();
        Some(BinderEvent::Update(self.activated))
    }

    /// Abort the capture. Returns `false` if it had already finished.
    pub fn cancel(&mut self) -> bool {
        self.deadline = None;
        core::mem::replace(&mut self.binding, false)
    }

    fn flush(&mut self) {
        self.activated = self.activated.difference(self.deactivating);
        self.deactivating.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_ignored() {
        let mut b = KeyBinder::new(BinderConfig::default());
        assert!(b.key_down(KeyCode::KeyA, 0).is_some());
        assert_eq!(b.key_down(KeyCode::KeyA, 30), None);
    }

    #[test]
    fn grace_window_drops_released_keys() {
        let mut b = KeyBinder::new(BinderConfig::default());
        b.key_down(KeyCode::ShiftLeft, 0);
        b.key_down(KeyCode::KeyA, 5);
        assert_eq!(b.key_up(KeyCode::KeyA, 20), None);
        assert_eq!(b.tick(119), None);
        assert_eq!(
            b.tick(120),
            Some(BinderEvent::Update(KeySet::single(KeyCode::ShiftLeft)))
        );
        assert!(b.is_binding());
        assert_eq!(
            b.key_up(KeyCode::ShiftLeft, 200),
            Some(BinderEvent::Done(KeySet::single(KeyCode::ShiftLeft)))
        );
    }

    #[test]
    fn new_key_inside_window_replaces_released_ones() {
        let mut b = KeyBinder::new(BinderConfig::default());
        b.key_down(KeyCode::ControlLeft, 0);
        b.key_down(KeyCode::KeyA, 5);
        b.key_up(KeyCode::KeyA, 20);
        let e = b.key_down(KeyCode::KeyB, 40);
        assert_eq!(
            e,
            Some(BinderEvent::Update(KeySet::from([KeyCode::ControlLeft, KeyCode::KeyB])))
        );
        assert_eq!(b.tick(500), None, "window was cleared by the new key");
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut b = KeyBinder::new(BinderConfig::default());
        assert!(b.cancel());
        assert!(!b.cancel());
        assert_eq!(b.key_down(KeyCode::KeyA, 0), None);
    }
}
