// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::String;
use core::fmt;

/// A shortcut or alias binding could not be applied.
///
/// These are caller bugs found at setup time; runtime input never produces them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyError {
    /// The code is not on the key allow-list.
    NotAllowed(String),
    /// A binding combination contained no keys.
    EmptyCombination(String),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed(code) => write!(f, "key code `{code}` is not allowed in bindings"),
            Self::EmptyCombination(id) => write!(f, "binding `{id}` has an empty key combination"),
        }
    }
}

impl core::error::Error for KeyError {}
