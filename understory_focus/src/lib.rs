// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_focus --heading-base-level=0

//! Understory Focus: layered spatial navigation.
//!
//! This crate moves a single logical cursor over any hierarchy that implements
//! [`NavTree`]:
//! - **Navigation intents** ([`Navigation`]): ordinal (`Next`/`Prev`, for Tab and
//!   Shift+Tab) and compass (`Up`/`Right`/`Down`/`Left`).
//! - **Geometry** ([`geometry`]): a box-to-box distance that accounts for element
//!   size, strict half-plane filters, and a running [`geometry::NearestFinder`].
//! - **Searches** ([`search`]): inward (nearest leaf among siblings, descending
//!   into groups), outward (climbing ancestor groups up to the layer root, no
//!   wraparound), and document order.
//! - **The navigator** ([`Navigator`]): a stack of layers for modal scopes, a
//!   lock that redirects intents to one element, per-element signal callbacks,
//!   and `nav`/`active`/`cancel` events for global listeners. It consumes
//!   keyboard and gamepad events directly and steps aside on pointer input.
//!
//! Only nodes marked as leaves are ever focused. Groups are stepping stones:
//! when a group is the nearest candidate, the search continues inside it.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_focus::{NavTree, Navigation, Navigator, NavigatorConfig};
//!
//! /// Root 0 with two leaves side by side.
//! struct Row;
//! impl NavTree<u32> for Row {
//!     fn is_alive(&self, id: u32) -> bool { id <= 2 }
//!     fn bounds(&self, id: u32) -> Option<Rect> {
//!         Some(match id {
//!             0 => Rect::new(0.0, 0.0, 100.0, 20.0),
//!             1 => Rect::new(0.0, 0.0, 10.0, 10.0),
//!             _ => Rect::new(20.0, 0.0, 30.0, 10.0),
//!         })
//!     }
//!     fn parent(&self, id: u32) -> Option<u32> { (id != 0).then_some(0) }
//!     fn children(&self, id: u32) -> &[u32] { if id == 0 { &[1, 2] } else { &[] } }
//!     fn is_nav_leaf(&self, id: u32) -> bool { id != 0 }
//!     fn is_nav_group(&self, _: u32) -> bool { false }
//!     fn is_non_navigable(&self, _: u32) -> bool { false }
//! }
//!
//! let mut nav = Navigator::new(0_u32, NavigatorConfig::default());
//! nav.nav(&mut Row, Navigation::Next, 0);
//! assert_eq!(nav.current(), Some(1));
//! nav.nav(&mut Row, Navigation::Right, 16);
//! assert_eq!(nav.current(), Some(2));
//! // Nothing further right, and no wraparound.
//! assert!(nav.nav(&mut Row, Navigation::Right, 32).is_none());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `element_tree_adapter`: implements [`NavTree`] for
//!   `understory_element_tree::ElementTree`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod geometry;
mod navigator;
pub mod search;
mod tree;

pub use navigator::{
    Indicator, Layer, NavCallback, NavSignal, Navigator, NavigatorConfig, NavigatorEvent,
    NavigatorEventType,
};
pub use tree::NavTree;

/// Direction of focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Next element in document order (for example, Tab).
    Next,
    /// Previous element in document order (for example, Shift+Tab).
    Prev,
    /// Nearest element above.
    Up,
    /// Nearest element below.
    Down,
    /// Nearest element to the left.
    Left,
    /// Nearest element to the right.
    Right,
}

impl Navigation {
    /// `Next` and `Prev` follow document order rather than geometry.
    pub const fn is_ordinal(self) -> bool {
        matches!(self, Self::Next | Self::Prev)
    }

    /// Lowercase name (`"next"`, `"up"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_intents() {
        assert!(Navigation::Next.is_ordinal());
        assert!(!Navigation::Left.is_ordinal());
        assert_eq!(Navigation::Prev.name(), "prev");
    }
}
