// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`TargetHost`] for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! Bounds come straight from the tree; markers become [`ElementFlags::HOVER`],
//! [`ElementFlags::ACTIVE`], and [`ElementFlags::SLIDE`]. Stale ids have no
//! bounds and ignore marker writes.

use kurbo::Rect;
use understory_element_tree::{ElementFlags, ElementId, ElementTree};

use crate::host::{Marker, TargetHost};

/// Element flag that mirrors `marker`.
pub fn marker_flag(marker: Marker) -> ElementFlags {
    match marker {
        Marker::Hover => ElementFlags::HOVER,
        Marker::Active => ElementFlags::ACTIVE,
        Marker::Slide => ElementFlags::SLIDE,
    }
}

impl TargetHost<ElementId> for ElementTree {
    fn bounds(&self, target: ElementId) -> Option<Rect> {
        Self::bounds(self, target)
    }

    fn set_marker(&mut self, target: ElementId, marker: Marker, on: bool) {
        self.toggle_flags(target, marker_flag(marker), on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::active::{ActiveManager, PRIMARY_BUTTON};
    use understory_element_tree::Element;

    #[test]
    fn markers_land_on_element_flags() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let button = tree.insert(
            Some(root),
            Element::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)).flags(ElementFlags::NAV),
        );

        let mut active = ActiveManager::new();
        active.add(button);
        active.mouse_down(&mut tree, button, PRIMARY_BUTTON, 0);
        assert_eq!(
            tree.flags(button),
            Some(ElementFlags::NAV | ElementFlags::ACTIVE)
        );
        active.mouse_up(&mut tree, button, 1);
        assert_eq!(tree.flags(button), Some(ElementFlags::NAV));
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut tree = ElementTree::new();
        let gone = tree.insert(None, Element::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        tree.remove(gone);
        assert_eq!(TargetHost::bounds(&tree, gone), None);
        tree.set_marker(gone, Marker::Hover, true);
        assert_eq!(tree.flags(gone), None);
    }
}
