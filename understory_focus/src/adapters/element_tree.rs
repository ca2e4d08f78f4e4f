// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`NavTree`] for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! [`ElementFlags::NAV`] marks leaves, [`ElementFlags::NAV_GROUP`] marks groups,
//! and [`ElementFlags::NON_NAVIGABLE`] opts out. Declared navigation links come
//! from `Element::nav_parent` and `Element::nav_children`.

use kurbo::Rect;
use understory_element_tree::{ElementFlags, ElementId, ElementTree};

use crate::tree::NavTree;

fn has(tree: &ElementTree, id: ElementId, flag: ElementFlags) -> bool {
    tree.flags(id).is_some_and(|f| f.contains(flag))
}

impl NavTree<ElementId> for ElementTree {
    fn is_alive(&self, id: ElementId) -> bool {
        Self::is_alive(self, id)
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        Self::bounds(self, id)
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent_of(id)
    }

    fn children(&self, id: ElementId) -> &[ElementId] {
        self.children_of(id)
    }

    fn declared_parent(&self, id: ElementId) -> Option<ElementId> {
        self.nav_parent_of(id)
    }

    fn declared_children(&self, id: ElementId) -> Option<&[ElementId]> {
        self.nav_children_of(id)
    }

    fn is_nav_leaf(&self, id: ElementId) -> bool {
        has(self, id, ElementFlags::NAV)
    }

    fn is_nav_group(&self, id: ElementId) -> bool {
        has(self, id, ElementFlags::NAV_GROUP)
    }

    fn is_non_navigable(&self, id: ElementId) -> bool {
        has(self, id, ElementFlags::NON_NAVIGABLE)
    }

    fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.is_ancestor_or_self(ancestor, id)
    }
}
