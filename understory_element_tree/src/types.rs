// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: identifiers, flags, and per-element data.

use alloc::vec::Vec;
use kurbo::Rect;

/// Identifier for an element in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Markers carried by an element.
    ///
    /// The first three are read by navigation; the last three are written by the
    /// hover, active, and slide managers and are meant for styling.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        /// Element is a focusable navigation leaf.
        const NAV           = 0b0000_0001;
        /// Element is a navigation group.
        const NAV_GROUP     = 0b0000_0010;
        /// Element (and its subtree) is skipped by navigation.
        const NON_NAVIGABLE = 0b0000_0100;
        /// A pointer (or the navigator) is over the element.
        const HOVER         = 0b0000_1000;
        /// The element is pressed.
        const ACTIVE        = 0b0001_0000;
        /// The element is being dragged.
        const SLIDE         = 0b0010_0000;
    }
}

/// Data for a single element.
#[derive(Clone, Debug, Default)]
pub struct Element {
    /// World-space bounds. Zero-sized bounds mean "not rendered".
    pub bounds: Rect,
    /// Navigation and interaction markers.
    pub flags: ElementFlags,
    /// Declared navigation parent, overriding the structural parent for outward search.
    pub nav_parent: Option<ElementId>,
    /// Declared, ordered navigation children, overriding the structural children.
    pub nav_children: Option<Vec<ElementId>>,
}

impl Element {
    /// An element with the given bounds and no flags.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Builder-style flag setter.
    #[must_use]
    pub fn flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }
}
