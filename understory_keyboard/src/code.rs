// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Allow-listed physical key codes and exact key sets.

use core::fmt;
use core::str::FromStr;

use crate::error::KeyError;

macro_rules! define_key_codes {
    ($($name:ident),* $(,)?) => {
        /// A physical key code from the allow-list.
        ///
        /// Names match the DOM `KeyboardEvent.code` values. Keys outside this
        /// list are ignored by the keyboard manager and rejected by bindings.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        #[allow(missing_docs, reason = "Variant names are the key codes themselves.")]
        pub enum KeyCode {
            $($name,)*
        }

        impl KeyCode {
            /// Every allow-listed code, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$name,)*];

            /// The `KeyboardEvent.code` string of this key.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }

            /// Look up an allow-listed code by its `KeyboardEvent.code` string.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $(stringify!($name) => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

define_key_codes! {
    Escape, F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12, F13, F14, F15, F16, F17, F18,
    F19, F20, ControlLeft, AltLeft, ShiftLeft, ControlRight, AltRight, ShiftRight, Tab,
    Backquote, Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    Minus, Equal, Backspace, Enter, BracketLeft, BracketRight, Backslash, Semicolon, Quote,
    Comma, Period, Slash, Space, Home, End, PageUp, PageDown, ArrowUp, ArrowRight, ArrowDown,
    ArrowLeft, KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ, Numpad0,
    Numpad1, Numpad2, Numpad3, Numpad4, Numpad5, Numpad6, Numpad7, Numpad8, Numpad9, NumpadAdd,
    NumpadSubtract, NumpadMultiply, NumpadDivide, NumpadDecimal,
}

impl KeyCode {
    const fn bit(self) -> u128 {
        1_u128 << (self as u8)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyCode {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| KeyError::NotAllowed(s.into()))
    }
}

/// An order-independent set of [`KeyCode`]s.
///
/// Equality is exact set equality, which is what shortcut matching needs.
///
/// ```
/// use understory_keyboard::{KeyCode, KeySet};
///
/// let a: KeySet = [KeyCode::Tab, KeyCode::ShiftLeft].into_iter().collect();
/// let b = KeySet::parse(["ShiftLeft", "Tab"]).unwrap();
/// assert_eq!(a, b);
/// assert!(KeySet::parse(["Tab", "MetaLeft"]).is_err());
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u128);

impl KeySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// A set holding one key.
    pub const fn single(key: KeyCode) -> Self {
        Self(key.bit())
    }

    /// Parse code strings, failing on the first one outside the allow-list.
    pub fn parse<I, S>(codes: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::EMPTY;
        for code in codes {
            set.insert(code.as_ref().parse()?);
        }
        Ok(set)
    }

    /// This set plus `key`.
    #[must_use]
    pub const fn with(self, key: KeyCode) -> Self {
        Self(self.0 | key.bit())
    }

    /// Add a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: KeyCode) -> bool {
        let had = self.contains(key);
        self.0 |= key.bit();
        !had
    }

    /// Remove a key. Returns `false` if it was absent.
    pub fn remove(&mut self, key: KeyCode) -> bool {
        let had = self.contains(key);
        self.0 &= !key.bit();
        had
    }

    /// Whether `key` is in the set.
    pub const fn contains(&self, key: KeyCode) -> bool {
        self.0 & key.bit() != 0
    }

    /// Whether any key of `other` is in the set.
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Keys in `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Number of keys.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterate in [`KeyCode::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        KeyCode::ALL.iter().copied().filter(|k| self.contains(*k))
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<KeyCode> for KeySet {
    fn from_iter<T: IntoIterator<Item = KeyCode>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<const N: usize> From<[KeyCode; N]> for KeySet {
    fn from(keys: [KeyCode; N]) -> Self {
        keys.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_round_trips_names() {
        assert_eq!(KeyCode::ALL.len(), 101);
        assert!(KeyCode::ALL.len() <= 128, "key sets are a 128-bit mask");
        for key in KeyCode::ALL {
            assert_eq!(KeyCode::from_code(key.as_str()), Some(*key));
        }
        assert_eq!(KeyCode::from_code("MetaLeft"), None);
        assert_eq!(KeyCode::from_code("keya"), None, "codes are case sensitive");
    }

    #[test]
    fn set_equality_ignores_order() {
        let mut a = KeySet::EMPTY;
        assert!(a.insert(KeyCode::KeyA));
        assert!(a.insert(KeyCode::KeyB));
        assert!(!a.insert(KeyCode::KeyA));
        let b = KeySet::from([KeyCode::KeyB, KeyCode::KeyA]);
        assert_eq!(a, b);
        assert_ne!(a, KeySet::single(KeyCode::KeyA));
        assert_eq!(a.len(), 2);
        assert!(a.remove(KeyCode::KeyA));
        assert!(!a.remove(KeyCode::KeyA));
    }

    #[test]
    fn parse_reports_the_offending_code() {
        let err = KeySet::parse(["Enter", "Fn"]).unwrap_err();
        assert_eq!(err, KeyError::NotAllowed("Fn".into()));
    }
}
