// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard event records.

use alloc::string::String;
use alloc::vec::Vec;

use crate::binder::BinderEvent;
use crate::code::KeyCode;

/// Kind of keyboard event.
///
/// Raw kinds carry a key code; `Shortcut*` kinds carry a shortcut id; `Alias*`
/// kinds carry an alias id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// A key became held.
    Down,
    /// A key was released.
    Up,
    /// A key completed a down/up cycle; emitted right after [`KeyEventKind::Up`].
    Press,
    /// Every keydown, including OS auto-repeat.
    Trigger,
    /// The held set became exactly a bound combination by adding a key.
    Shortcut,
    /// The held set is exactly a bound combination on a keydown, repeats included.
    ShortcutTrigger,
    /// [`KeyEventKind::Down`] for every alias containing the key.
    AliasDown,
    /// [`KeyEventKind::Up`] for every alias containing the key.
    AliasUp,
    /// [`KeyEventKind::Press`] for every alias containing the key.
    AliasPress,
    /// [`KeyEventKind::Trigger`] for every alias containing the key.
    AliasTrigger,
}

impl KeyEventKind {
    /// Event type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Press => "press",
            Self::Trigger => "trigger",
            Self::Shortcut => "shortcut",
            Self::ShortcutTrigger => "shortcutTrigger",
            Self::AliasDown => "aliasDown",
            Self::AliasUp => "aliasUp",
            Self::AliasPress => "aliasPress",
            Self::AliasTrigger => "aliasTrigger",
        }
    }

    /// Whether `key` of this kind is a physical key code.
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Down | Self::Up | Self::Press | Self::Trigger)
    }
}

/// A keyboard event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// What happened.
    pub kind: KeyEventKind,
    /// Key code, shortcut id, or alias id depending on `kind`.
    pub key: String,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
}

impl KeyboardEvent {
    /// The key code of a raw event.
    pub fn code(&self) -> Option<KeyCode> {
        if self.kind.is_raw() {
            KeyCode::from_code(&self.key)
        } else {
            None
        }
    }

    /// Whether this is an alias event of `kind` for alias `id`.
    pub fn is_alias(&self, kind: KeyEventKind, id: &str) -> bool {
        self.kind == kind && self.key == id
    }
}

/// Outcome of feeding one key event to the manager.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// The host should suppress the browser's default action for this key.
    pub prevent_default: bool,
    /// Events emitted, in order.
    pub events: Vec<KeyboardEvent>,
    /// Binder progress while an interactive binding is running.
    pub binder: Option<BinderEvent>,
}
