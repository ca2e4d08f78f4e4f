// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_keyboard --heading-base-level=0

//! Understory Keyboard: physical keys to logical aliases and shortcuts.
//!
//! Two independent mapping layers sit over an allow-list of physical key codes
//! ([`KeyCode`]):
//!
//! - **Aliases** are any-of: `ui.confirm` fires when Enter *or* Space goes down.
//!   Each raw event kind has an alias twin (`aliasDown`, `aliasUp`, `aliasPress`,
//!   `aliasTrigger`), found by reverse lookup over every alias containing the key.
//! - **Shortcuts** are exact-set: `{ControlLeft, KeyS}` fires only when exactly
//!   those keys are held. `shortcutTrigger` fires on every qualifying keydown,
//!   auto-repeat included; `shortcut` fires only when the newly added key
//!   completes the combination.
//!
//! Bindings are validated: [`KeySet::parse`] rejects codes outside the allow-list
//! with a [`KeyError`], and the manager rejects empty combinations.
//!
//! [`KeyBinder`] captures a combination interactively for rebinding UIs; while
//! it runs, [`KeyboardManager`] suspends normal dispatch.
//!
//! ```rust
//! use understory_keyboard::{KeyCode, KeyEventKind, KeySet, KeyboardManager};
//!
//! let mut keyboard = KeyboardManager::empty();
//! keyboard
//!     .set_shortcut("save", [KeySet::parse(["ControlLeft", "KeyS"]).unwrap()])
//!     .unwrap();
//!
//! keyboard.key_down("ControlLeft", false, 0);
//! let r = keyboard.key_down("KeyS", false, 5);
//! assert!(r.events.iter().any(|e| e.kind == KeyEventKind::Shortcut && e.key == "save"));
//!
//! // Holding a third key breaks the exact match.
//! let r = keyboard.key_down("ShiftLeft", false, 9);
//! assert!(!r.events.iter().any(|e| e.key == "save"));
//! assert_eq!(keyboard.held().len(), 3);
//! assert!(keyboard.held().contains(KeyCode::KeyS));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod binder;
mod code;
mod error;
mod event;
mod manager;

pub use binder::{BinderConfig, BinderEvent, KeyBinder};
pub use code::{KeyCode, KeySet};
pub use error::KeyError;
pub use event::{KeyEventKind, KeyResponse, KeyboardEvent};
pub use manager::{
    CANCEL, CONFIRM, DOWN, KeyboardManager, LEFT, NAV_NEXT, NAV_PREV, RIGHT, SELECT_MULTI,
    SELECT_RANGE, UP,
};
