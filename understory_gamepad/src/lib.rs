// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gamepad --heading-base-level=0

//! Understory Gamepad: frame-diffed controller state.
//!
//! A [`Gamepad`] polls one of [`MAX_GAMEPADS`] slots through a host-provided
//! [`GamepadSource`]. Each frame it normalizes the snapshot (stick vectors
//! clamped to unit length, optional dead zones) and emits one [`GamepadEvent`]
//! per field that differs from the previous frame, plus a single `arrow` event
//! when any D-pad direction changed.
//!
//! Polling runs only while the slot is connected. A persistent rumble started
//! with [`Gamepad::rumble`] is replayed every `rumble_interval` milliseconds
//! until [`Gamepad::stop_rumble`] or a disconnect.
//!
//! ```rust
//! use understory_gamepad::{
//!     GamepadButton, GamepadEvent, GamepadRegistry, GamepadSource, HapticEffect, RawButton,
//!     RawGamepad,
//! };
//!
//! struct OnePad(RawGamepad);
//! impl GamepadSource for OnePad {
//!     fn snapshot(&self, index: usize) -> Option<RawGamepad> {
//!         (index == 0).then(|| self.0.clone())
//!     }
//!     fn play_effect(&mut self, _: usize, _: &HapticEffect) {}
//!     fn reset_haptics(&mut self, _: usize) {}
//! }
//!
//! let mut source = OnePad(RawGamepad::default());
//! let mut pads = GamepadRegistry::default();
//! assert!(pads.get(0, &source).unwrap().is_connected());
//! assert!(pads.get(7, &source).is_err());
//!
//! source.0.buttons.push(RawButton::pressed(true));
//! let events = pads.poll(&mut source, 16);
//! assert_eq!(
//!     events,
//!     [(0, GamepadEvent::Button { button: GamepadButton::A, pressed: true })]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod gamepad;
mod source;
mod types;

pub use gamepad::{Gamepad, GamepadRegistry};
pub use source::{GamepadSource, RawButton, RawGamepad};
pub use types::{
    GamepadButton, GamepadConfig, GamepadError, GamepadEvent, HapticEffect, HapticKind,
    MAX_GAMEPADS, RumbleOptions, Stick,
};
