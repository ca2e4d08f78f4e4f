// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyboard manager: held keys, aliases, and shortcuts.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;
use understory_event_state::subscriptions::{Handler, SubscriptionId, Subscriptions};

use crate::binder::{BinderConfig, BinderEvent, KeyBinder};
use crate::code::{KeyCode, KeySet};
use crate::error::KeyError;
use crate::event::{KeyEventKind, KeyResponse, KeyboardEvent};

/// Shortcut id for "focus the next element".
pub const NAV_NEXT: &str = "ui.navNext";
/// Shortcut id for "focus the previous element".
pub const NAV_PREV: &str = "ui.navPrev";
/// Alias id for confirming.
pub const CONFIRM: &str = "ui.confirm";
/// Alias id for cancelling.
pub const CANCEL: &str = "ui.cancel";
/// Alias id for moving up.
pub const UP: &str = "ui.up";
/// Alias id for moving right.
pub const RIGHT: &str = "ui.right";
/// Alias id for moving down.
pub const DOWN: &str = "ui.down";
/// Alias id for moving left.
pub const LEFT: &str = "ui.left";
/// Alias id for additive selection.
pub const SELECT_MULTI: &str = "ui.selectMulti";
/// Alias id for range selection.
pub const SELECT_RANGE: &str = "ui.selectRange";

/// Keys whose browser default action (scrolling, focus moves) fights navigation.
const WEB_BEHAVIOR_KEYS: KeySet = KeySet::EMPTY
    .with(KeyCode::ArrowUp)
    .with(KeyCode::ArrowRight)
    .with(KeyCode::ArrowDown)
    .with(KeyCode::ArrowLeft)
    .with(KeyCode::Space)
    .with(KeyCode::Tab);

/// Turns raw key events into raw, alias, and shortcut events.
///
/// Only allow-listed codes take part; anything else (and anything typed while
/// an IME composition is running) is ignored. Shortcut matching is exact: a
/// combination fires only when the held set equals it. Alias matching is
/// any-of: an alias fires for every key it contains.
///
/// ```
/// use understory_keyboard::{KeyEventKind, KeyboardManager};
///
/// let mut keyboard = KeyboardManager::new();
/// let r = keyboard.key_down("Tab", false, 0);
/// assert!(r.prevent_default);
/// assert!(r.events.iter().any(|e| e.kind == KeyEventKind::Shortcut && e.key == "ui.navNext"));
///
/// let r = keyboard.key_down("KeyW", false, 10);
/// assert!(r.events.iter().any(|e| e.kind == KeyEventKind::AliasDown && e.key == "ui.up"));
/// ```
pub struct KeyboardManager {
    bind_map: Vec<(String, Vec<KeySet>)>,
    alias_map: Vec<(String, KeySet)>,
    held: KeySet,
    /// Report `prevent_default` for arrows, Space, and Tab.
    pub prevent_default_web_behavior: bool,
    binder_config: BinderConfig,
    binder: Option<KeyBinder>,
    subs: Subscriptions<KeyEventKind, KeyboardEvent>,
}

impl core::fmt::Debug for KeyboardManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyboardManager")
            .field("bind_map", &self.bind_map)
            .field("alias_map", &self.alias_map)
            .field("held", &self.held)
            .field(
                "prevent_default_web_behavior",
                &self.prevent_default_web_behavior,
            )
            .field("binder", &self.binder)
            .finish_non_exhaustive()
    }
}

impl Default for KeyboardManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardManager {
    /// A manager with the default shortcuts and aliases.
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.bind_map = Vec::from([
            (NAV_NEXT.to_owned(), Vec::from([KeySet::from([KeyCode::Tab])])),
            (
                NAV_PREV.to_owned(),
                Vec::from([KeySet::from([KeyCode::Tab, KeyCode::ShiftLeft])]),
            ),
        ]);
        manager.alias_map = Vec::from([
            (CONFIRM.to_owned(), KeySet::from([KeyCode::Enter, KeyCode::Space])),
            (CANCEL.to_owned(), KeySet::from([KeyCode::Escape])),
            (UP.to_owned(), KeySet::from([KeyCode::ArrowUp, KeyCode::KeyW])),
            (RIGHT.to_owned(), KeySet::from([KeyCode::ArrowRight, KeyCode::KeyD])),
            (DOWN.to_owned(), KeySet::from([KeyCode::ArrowDown, KeyCode::KeyS])),
            (LEFT.to_owned(), KeySet::from([KeyCode::ArrowLeft, KeyCode::KeyA])),
            (
                SELECT_MULTI.to_owned(),
                KeySet::from([KeyCode::ControlLeft, KeyCode::ControlRight]),
            ),
            (
                SELECT_RANGE.to_owned(),
                KeySet::from([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            ),
        ]);
        manager
    }

    /// A manager with no shortcuts and no aliases.
    pub fn empty() -> Self {
        Self {
            bind_map: Vec::new(),
            alias_map: Vec::new(),
            held: KeySet::EMPTY,
            prevent_default_web_behavior: true,
            binder_config: BinderConfig::default(),
            binder: None,
            subs: Subscriptions::new(),
        }
    }

    /// Use `config` for future interactive bindings.
    #[must_use]
    pub fn with_binder_config(mut self, config: BinderConfig) -> Self {
        self.binder_config = config;
        self
    }

    /// Subscribe to events of `kind`.
    pub fn on(&mut self, kind: KeyEventKind, handler: Handler<KeyboardEvent>) -> SubscriptionId {
        self.subs.on(kind, handler)
    }

    /// Remove a handler.
    pub fn off(&mut self, kind: KeyEventKind, id: SubscriptionId) -> bool {
        self.subs.off(kind, id)
    }

    /// Keys currently held.
    pub fn held(&self) -> KeySet {
        self.held
    }

    // --- shortcuts ---

    /// Combinations bound to shortcut `id`.
    pub fn shortcut(&self, id: &str) -> Option<&[KeySet]> {
        self.bind_map
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, group)| group.as_slice())
    }

    /// All shortcuts, in match order.
    pub fn bind_map(&self) -> impl Iterator<Item = (&str, &[KeySet])> + '_ {
        self.bind_map
            .iter()
            .map(|(id, group)| (id.as_str(), group.as_slice()))
    }

    /// Replace every shortcut. Nothing changes if any combination is invalid.
    pub fn set_bind_map<I, S, G>(&mut self, map: I) -> Result<(), KeyError>
    where
        I: IntoIterator<Item = (S, G)>,
        S: Into<String>,
        G: IntoIterator<Item = KeySet>,
    {
        let mut next: Vec<(String, Vec<KeySet>)> = Vec::new();
        for (id, group) in map {
            let id: String = id.into();
            let group = dedup_group(&id, group)?;
            match next.iter_mut().find(|(k, _)| *k == id) {
                Some((_, existing)) => *existing = group,
                None => next.push((id, group)),
            }
        }
        self.bind_map = next;
        Ok(())
    }

    /// Bind shortcut `id` to `group`, replacing what it had.
    pub fn set_shortcut(
        &mut self,
        id: &str,
        group: impl IntoIterator<Item = KeySet>,
    ) -> Result<(), KeyError> {
        let group = dedup_group(id, group)?;
        match self.bind_map.iter_mut().find(|(k, _)| k == id) {
            Some((_, existing)) => *existing = group,
            None => self.bind_map.push((id.to_owned(), group)),
        }
        Ok(())
    }

    /// Add one combination to shortcut `id`. `Ok(false)` if it was already bound.
    pub fn add_shortcut(&mut self, id: &str, combo: KeySet) -> Result<bool, KeyError> {
        check_combo(id, combo)?;
        match self.bind_map.iter_mut().find(|(k, _)| k == id) {
            Some((_, group)) if group.contains(&combo) => Ok(false),
            Some((_, group)) => {
                group.push(combo);
                Ok(true)
            }
            None => {
                self.bind_map.push((id.to_owned(), Vec::from([combo])));
                Ok(true)
            }
        }
    }

    /// Remove one combination from shortcut `id`.
    pub fn remove_shortcut(&mut self, id: &str, combo: KeySet) -> bool {
        let Some((_, group)) = self.bind_map.iter_mut().find(|(k, _)| k == id) else {
            return false;
        };
        let Some(index) = group.iter().position(|c| *c == combo) else {
            return false;
        };
        group.remove(index);
        true
    }

    /// Remove shortcut `id` entirely.
    pub fn delete_shortcut(&mut self, id: &str) -> bool {
        let before = self.bind_map.len();
        self.bind_map.retain(|(k, _)| k != id);
        self.bind_map.len() != before
    }

    // --- aliases ---

    /// Keys bound to alias `id`.
    pub fn alias(&self, id: &str) -> Option<KeySet> {
        self.alias_map
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, keys)| *keys)
    }

    /// All aliases.
    pub fn alias_map(&self) -> impl Iterator<Item = (&str, KeySet)> + '_ {
        self.alias_map.iter().map(|(id, keys)| (id.as_str(), *keys))
    }

    /// Replace every alias.
    pub fn set_alias_map<I, S>(&mut self, map: I)
    where
        I: IntoIterator<Item = (S, KeySet)>,
        S: Into<String>,
    {
        self.alias_map.clear();
        for (id, keys) in map {
            let id: String = id.into();
            self.set_alias(&id, keys);
        }
    }

    /// Bind alias `id` to `keys`, replacing what it had.
    pub fn set_alias(&mut self, id: &str, keys: KeySet) {
        match self.alias_map.iter_mut().find(|(k, _)| k == id) {
            Some((_, existing)) => *existing = keys,
            None => self.alias_map.push((id.to_owned(), keys)),
        }
    }

    /// Add one key to alias `id`. Returns `false` if it was already there.
    pub fn add_alias_key(&mut self, id: &str, key: KeyCode) -> bool {
        match self.alias_map.iter_mut().find(|(k, _)| k == id) {
            Some((_, keys)) => keys.insert(key),
            None => {
                self.alias_map.push((id.to_owned(), KeySet::single(key)));
                true
            }
        }
    }

    /// Remove one key from alias `id`.
    pub fn remove_alias_key(&mut self, id: &str, key: KeyCode) -> bool {
        self.alias_map
            .iter_mut()
            .find(|(k, _)| k == id)
            .is_some_and(|(_, keys)| keys.remove(key))
    }

    /// Remove alias `id` entirely.
    pub fn delete_alias(&mut self, id: &str) -> bool {
        let before = self.alias_map.len();
        self.alias_map.retain(|(k, _)| k != id);
        self.alias_map.len() != before
    }

    /// Whether any key of alias `id` is held.
    pub fn is_alias_activated(&self, id: &str) -> bool {
        self.alias(id).is_some_and(|keys| keys.intersects(self.held))
    }

    // --- binding ---

    /// Start an interactive binding. Returns `false` while one is running.
    ///
    /// Normal dispatch is suspended until the binding finishes or is cancelled.
    pub fn begin_binding(&mut self) -> bool {
        if self.is_binding() {
            return false;
        }
        log::debug!("key binder started");
        self.binder = Some(KeyBinder::new(self.binder_config));
        true
    }

    /// Whether an interactive binding is running.
    pub fn is_binding(&self) -> bool {
        self.binder.as_ref().is_some_and(KeyBinder::is_binding)
    }

    /// The running (or most recently finished) binder.
    pub fn binder(&self) -> Option<&KeyBinder> {
        self.binder.as_ref()
    }

    /// Abort the running binding.
    pub fn cancel_binding(&mut self) -> bool {
        self.binder.as_mut().is_some_and(KeyBinder::cancel)
    }

    /// Advance the binder's grace window.
    pub fn tick(&mut self, now: u64) -> Option<BinderEvent> {
        self.binder.as_mut()?.tick(now)
    }

    // --- input ---

    /// A key went down. `code` is the host's physical key code string.
    pub fn key_down(&mut self, code: &str, composing: bool, timestamp: u64) -> KeyResponse {
        let key = KeyCode::from_code(code);
        let mut response = KeyResponse {
            prevent_default: self.prevent_default_web_behavior
                && key.is_some_and(|k| WEB_BEHAVIOR_KEYS.contains(k)),
            ..KeyResponse::default()
        };
        if self.is_binding() {
            if let (Some(key), false, Some(binder)) = (key, composing, self.binder.as_mut()) {
                response.binder = binder.key_down(key, timestamp);
            }
            return response;
        }
        let Some(key) = key.filter(|_| !composing) else {
            return response;
        };
        let aliases = self.aliases_of(key);

        self.push(&mut response, KeyEventKind::Trigger, key.as_str(), timestamp);
        for id in &aliases {
            self.push(&mut response, KeyEventKind::AliasTrigger, id, timestamp);
        }
        let added = self.held.insert(key);
        let matched = self.matching_shortcuts();
        for id in &matched {
            self.push(&mut response, KeyEventKind::ShortcutTrigger, id, timestamp);
        }
        if !added {
            return response;
        }
        self.push(&mut response, KeyEventKind::Down, key.as_str(), timestamp);
        for id in &aliases {
            self.push(&mut response, KeyEventKind::AliasDown, id, timestamp);
        }
        for id in &matched {
            self.push(&mut response, KeyEventKind::Shortcut, id, timestamp);
        }
        response
    }

    /// A key went up.
    ///
    /// A key held from before a binding started is released here too, even
    /// though the binder swallows the event.
    pub fn key_up(&mut self, code: &str, composing: bool, timestamp: u64) -> KeyResponse {
        let mut response = KeyResponse::default();
        let key = KeyCode::from_code(code);
        if self.is_binding() {
            if let Some(key) = key {
                self.held.remove(key);
            }
            if let (Some(key), false, Some(binder)) = (key, composing, self.binder.as_mut()) {
                response.binder = binder.key_up(key, timestamp);
            }
            return response;
        }
        let Some(key) = key.filter(|_| !composing) else {
            return response;
        };
        self.held.remove(key);
        let aliases = self.aliases_of(key);
        self.push(&mut response, KeyEventKind::Up, key.as_str(), timestamp);
        for id in &aliases {
            self.push(&mut response, KeyEventKind::AliasUp, id, timestamp);
        }
        self.push(&mut response, KeyEventKind::Press, key.as_str(), timestamp);
        for id in &aliases {
            self.push(&mut response, KeyEventKind::AliasPress, id, timestamp);
        }
        response
    }

    /// Forget every held key without emitting anything, for example on window blur.
    pub fn clear_held(&mut self) {
        self.held.clear();
    }

    fn aliases_of(&self, key: KeyCode) -> SmallVec<[String; 2]> {
        self.alias_map
            .iter()
            .filter(|(_, keys)| keys.contains(key))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn matching_shortcuts(&self) -> SmallVec<[String; 1]> {
        self.bind_map
            .iter()
            .filter(|(_, group)| group.iter().any(|c| *c == self.held))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn push(&mut self, response: &mut KeyResponse, kind: KeyEventKind, key: &str, timestamp: u64) {
        let event = KeyboardEvent {
            kind,
            key: key.to_owned(),
            timestamp,
        };
        self.subs.emit(kind, &event);
        response.events.push(event);
    }
}

fn check_combo(id: &str, combo: KeySet) -> Result<(), KeyError> {
    if combo.is_empty() {
        log::warn!("rejected empty key combination for `{id}`");
        return Err(KeyError::EmptyCombination(id.to_owned()));
    }
    Ok(())
}

fn dedup_group(id: &str, group: impl IntoIterator<Item = KeySet>) -> Result<Vec<KeySet>, KeyError> {
    let mut out: Vec<KeySet> = Vec::new();
    for combo in group {
        check_combo(id, combo)?;
        if !out.contains(&combo) {
            out.push(combo);
        }
    }
    Ok(out)
}
