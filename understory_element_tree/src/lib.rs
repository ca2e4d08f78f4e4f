// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_element_tree --heading-base-level=0

//! Understory Element Tree: a generational arena of addressable UI targets.
//!
//! Understory Element Tree is the structure the interaction crates run against when there is
//! no host document to borrow from. It is deliberately small:
//!
//! - Represents a hierarchy of elements with world-space bounds and marker flags.
//! - Hands out generational [`ElementId`]s. Removing an element makes every copy of its id
//!   stale, so nothing that merely *holds* an id keeps the element alive.
//! - Carries the navigation markers ([`ElementFlags::NAV`], [`ElementFlags::NAV_GROUP`],
//!   [`ElementFlags::NON_NAVIGABLE`]) and the interaction markers written back by the
//!   event managers ([`ElementFlags::HOVER`], [`ElementFlags::ACTIVE`], [`ElementFlags::SLIDE`]).
//! - Optionally overrides containment for navigation with a declared parent and an explicit,
//!   ordered child list.
//!
//! ## Not a layout engine
//!
//! Bounds are written by upstream code after layout. This crate never measures or arranges.
//!
//! ## API overview
//!
//! - [`ElementTree`]: container managing elements.
//! - [`Element`]: per-element data (bounds, flags, declared navigation links).
//! - [`ElementFlags`]: navigation and interaction markers.
//! - [`ElementId`]: generational handle of an element.
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_element_tree::{Element, ElementFlags, ElementTree};
//!
//! let mut tree = ElementTree::new();
//! let root = tree.insert(None, Element::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! let button = tree.insert(
//!     Some(root),
//!     Element::with_bounds(Rect::new(10.0, 10.0, 40.0, 30.0)).flags(ElementFlags::NAV),
//! );
//!
//! assert!(tree.is_ancestor_or_self(root, button));
//! tree.remove(button);
//! assert!(!tree.is_alive(button));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::ElementTree;
pub use types::{Element, ElementFlags, ElementId};
