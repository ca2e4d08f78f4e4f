// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_interaction --heading-base-level=0

//! Understory Interaction: one entry point for every input source.
//!
//! [`Interaction`] owns the per-target state managers from
//! `understory_event_state`, the keyboard manager, the gamepad registry, and
//! the spatial [`Navigator`](understory_focus::Navigator). Hosts forward raw
//! platform input to it and get back an [`Emitted`] record of everything that
//! happened; subscribers registered on the individual services have already
//! been called by then.
//!
//! The wiring between services:
//! - Keyboard events feed the navigator (directional aliases, Tab shortcuts,
//!   confirm/cancel).
//! - Events from the navigation gamepad slot feed the navigator on every
//!   [`Interaction::frame`].
//! - Pointer and wheel input make the navigator step aside.
//! - A navigator `nav` broadcast re-targets hover and cancels stale presses;
//!   an `active` broadcast presses or releases the current element with the
//!   `Nav` pointer identity.
//!
//! The tree passed to routing methods must implement both
//! `understory_event_state::host::TargetHost` and
//! `understory_focus::NavTree`. With `element_tree_adapter`,
//! `understory_element_tree::ElementTree` does.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_event_state::host::{Marker, TargetHost};
//! use understory_focus::NavTree;
//! use understory_interaction::{Interaction, InteractionConfig};
//!
//! /// Root 0 holding a single leaf 1.
//! struct Screen {
//!     hovered: Option<u32>,
//! }
//! impl TargetHost<u32> for Screen {
//!     fn bounds(&self, id: u32) -> Option<Rect> {
//!         Some(match id {
//!             0 => Rect::new(0.0, 0.0, 100.0, 100.0),
//!             _ => Rect::new(10.0, 10.0, 20.0, 20.0),
//!         })
//!     }
//!     fn set_marker(&mut self, id: u32, marker: Marker, on: bool) {
//!         if marker == Marker::Hover {
//!             self.hovered = on.then_some(id);
//!         }
//!     }
//! }
//! impl NavTree<u32> for Screen {
//!     fn is_alive(&self, id: u32) -> bool { id <= 1 }
//!     fn bounds(&self, id: u32) -> Option<Rect> { TargetHost::bounds(self, id) }
//!     fn parent(&self, id: u32) -> Option<u32> { (id == 1).then_some(0) }
//!     fn children(&self, id: u32) -> &[u32] { if id == 0 { &[1] } else { &[] } }
//!     fn is_nav_leaf(&self, id: u32) -> bool { id == 1 }
//!     fn is_nav_group(&self, _: u32) -> bool { false }
//!     fn is_non_navigable(&self, _: u32) -> bool { false }
//! }
//!
//! let mut screen = Screen { hovered: None };
//! let mut ui = Interaction::new(0_u32, InteractionConfig::default());
//! ui.hover().add(1);
//!
//! let out = ui.key_down(&mut screen, "Tab", false, 0);
//! assert!(out.prevent_default);
//! assert_eq!(ui.navigator().current(), Some(1));
//! assert_eq!(screen.hovered, Some(1));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for every Understory dependency.
//! - `libm`: `no_std` floating-point support.
//! - `element_tree_adapter`: enables the `ElementTree` adapters of the event
//!   state and focus crates, and re-exports `understory_element_tree`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod emitted;
mod interaction;

pub use emitted::Emitted;
pub use interaction::{Interaction, InteractionConfig};

#[cfg(feature = "element_tree_adapter")]
pub use understory_element_tree;
