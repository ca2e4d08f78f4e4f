// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: semantic pointer state per target.
//!
//! Raw pointer input comes in several identity models: the mouse is a single
//! implicit pointer, touch brings N concurrent contacts, and the spatial
//! navigator simulates presses of its own. This crate folds all of them into
//! three small, per-target state machines:
//!
//! - [`hover::HoverManager`]: is a (non-touch) pointer over the target?
//! - [`active::ActiveManager`]: is the target pressed, and by which [`envelope::PointerId`]?
//! - [`slide::SlideManager`]: is the target being dragged, and where is the pointer now?
//!
//! Each manager keeps a [`subscriptions::Subscriptions`] table. A target takes part once it
//! has an entry there, either through a handler (`on`) or a bare opt-in (`add`).
//! Every operation dispatches to subscribers *and* returns the events it emitted.
//!
//! Managers do not own targets. They read bounds from, and write styling markers
//! to, a [`host::TargetHost`]. Identifiers are any `Copy + Eq + Hash` handle; with
//! generational handles a removed target simply stops matching, and `prune`
//! drops leftover entries.
//!
//! [`scheduler`] holds the cooperative frame-loop and auto-repeat primitives
//! used by the gamepad poller and the navigator.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_event_state::envelope::{SlideState, Touch};
//! use understory_event_state::host::{Marker, TargetHost};
//! use understory_event_state::slide::SlideManager;
//!
//! struct Sliders;
//! impl TargetHost<u32> for Sliders {
//!     fn bounds(&self, _: u32) -> Option<Rect> { Some(Rect::new(0.0, 0.0, 100.0, 10.0)) }
//!     fn set_marker(&mut self, _: u32, _: Marker, _: bool) {}
//! }
//!
//! let mut slide = SlideManager::new();
//! slide.add(1_u32);
//! slide.add(2_u32);
//!
//! slide.touch_start(&mut Sliders, 1, &[Touch::new(10, Point::new(5.0, 5.0))], 0);
//! slide.touch_start(&mut Sliders, 2, &[Touch::new(11, Point::new(9.0, 5.0))], 0);
//!
//! let moved = slide.touch_move(&[Touch::new(11, Point::new(70.0, 5.0))], 16);
//! assert_eq!(moved.len(), 1);
//! assert_eq!(moved[0].target, 2);
//! assert_eq!(moved[0].payload.state, SlideState::Move);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` floating-point support for `kurbo`.
//! - `element_tree_adapter`: implements [`host::TargetHost`] for
//!   `understory_element_tree::ElementTree`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod active;
pub mod adapters;
pub mod envelope;
pub mod host;
pub mod hover;
pub mod scheduler;
pub mod slide;
pub mod subscriptions;
