// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::Rect;

use crate::types::{Element, ElementFlags, ElementId};

/// Arena of elements with a parent/child hierarchy.
///
/// Unlike a layout or render tree, updates take effect immediately; there is no
/// commit step. Every accessor returns `None` (or an empty slice) for stale
/// identifiers, which is how callers observe that an element went away.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use understory_element_tree::{Element, ElementTree};
///
/// let mut tree = ElementTree::new();
/// let root = tree.insert(None, Element::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
/// let child = tree.insert(Some(root), Element::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
///
/// assert_eq!(tree.parent_of(child), Some(root));
/// assert_eq!(tree.children_of(root), &[child]);
/// ```
pub struct ElementTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("ElementTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    element: Element,
}

impl ElementTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the tree holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the element as a root.
    pub fn insert(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its subtree.
    ///
    /// Every id in the subtree becomes stale immediately.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let mut stack = alloc::vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(mut node) = self.free(cur) {
                stack.append(&mut node.children);
            }
        }
    }

    /// Reparent `id` under `new_parent` (or detach it into a root with `None`).
    ///
    /// Returns `false` without changing anything if either id is stale or if
    /// `new_parent` lies inside the subtree of `id`.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return false;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        true
    }

    /// Update world-space bounds.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.bounds = bounds;
        }
    }

    /// Replace all flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.flags = flags;
        }
    }

    /// Insert or remove `flags`, leaving the others untouched.
    pub fn toggle_flags(&mut self, id: ElementId, flags: ElementFlags, on: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.flags.set(flags, on);
        }
    }

    /// Declare (or clear) the navigation parent of `id`.
    pub fn set_nav_parent(&mut self, id: ElementId, nav_parent: Option<ElementId>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.nav_parent = nav_parent;
        }
    }

    /// Declare (or clear) the ordered navigation children of `id`.
    pub fn set_nav_children(&mut self, id: ElementId, nav_children: Option<Vec<ElementId>>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.nav_children = nav_children;
        }
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// The element data of a live id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// World-space bounds of a live id.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.element.bounds)
    }

    /// Flags of a live id.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.node_opt(id).map(|n| n.element.flags)
    }

    /// Returns the structural parent of a live id, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the structural children of an element, or an empty slice if it is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Declared navigation parent, if any.
    pub fn nav_parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.element.nav_parent)
    }

    /// Declared navigation children, if any.
    pub fn nav_children_of(&self, id: ElementId) -> Option<&[ElementId]> {
        self.node_opt(id)
            .and_then(|n| n.element.nav_children.as_deref())
    }

    /// Whether `ancestor` is `id` or one of its structural ancestors.
    ///
    /// Both ids must be live.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    // --- internals ---

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn free(&mut self, id: ElementId) -> Option<Node> {
        self.node_opt(id)?;
        self.free_list.push(id.idx());
        self.nodes[id.idx()].take()
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn leaf(x: f64) -> Element {
        Element::with_bounds(Rect::new(x, 0.0, x + 10.0, 10.0)).flags(ElementFlags::NAV)
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::default());
        let a = tree.insert(Some(root), leaf(0.0));
        assert!(tree.is_alive(a));
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.bounds(a), None, "stale ids must return None");

        // The slot is reused with a bumped generation; the old id stays stale.
        let b = tree.insert(Some(root), leaf(20.0));
        assert_eq!(a.0, b.0);
        assert_ne!(a, b);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.children_of(root), &[b]);
    }

    #[test]
    fn remove_takes_the_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::default());
        let group = tree.insert(Some(root), Element::default());
        let x = tree.insert(Some(group), leaf(0.0));
        let y = tree.insert(Some(group), leaf(20.0));
        tree.remove(group);
        assert!(!tree.is_alive(x));
        assert!(!tree.is_alive(y));
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn parent_of_respects_liveness_and_roots() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::default());
        let child = tree.insert(Some(root), Element::default());
        assert_eq!(tree.parent_of(root), None);
        assert_eq!(tree.parent_of(child), Some(root));
        tree.remove(child);
        assert_eq!(tree.parent_of(child), None);
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::default());
        let a = tree.insert(Some(root), Element::default());
        let b = tree.insert(Some(a), Element::default());
        assert!(!tree.reparent(a, Some(b)), "cannot move a node under its own descendant");
        assert!(!tree.reparent(a, Some(a)));
        assert_eq!(tree.parent_of(a), Some(root));

        assert!(tree.reparent(b, Some(root)));
        assert_eq!(tree.children_of(root), &[a, b]);
        assert!(tree.reparent(b, None));
        assert_eq!(tree.parent_of(b), None);
        assert!(!tree.is_ancestor_or_self(root, b));
    }

    #[test]
    fn flags_toggle_independently() {
        let mut tree = ElementTree::new();
        let n = tree.insert(None, leaf(0.0));
        tree.toggle_flags(n, ElementFlags::HOVER, true);
        tree.toggle_flags(n, ElementFlags::ACTIVE, true);
        tree.toggle_flags(n, ElementFlags::HOVER, false);
        assert_eq!(tree.flags(n), Some(ElementFlags::NAV | ElementFlags::ACTIVE));
        tree.set_flags(n, ElementFlags::NAV_GROUP);
        assert_eq!(tree.flags(n), Some(ElementFlags::NAV_GROUP));
    }

    #[test]
    fn declared_navigation_links() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::default());
        let a = tree.insert(Some(root), leaf(0.0));
        let b = tree.insert(Some(root), leaf(20.0));
        assert_eq!(tree.nav_children_of(root), None);
        tree.set_nav_children(root, Some(vec![b, a]));
        assert_eq!(tree.nav_children_of(root), Some(&[b, a][..]));
        tree.set_nav_parent(a, Some(b));
        assert_eq!(tree.nav_parent_of(a), Some(b));
        assert_eq!(tree.get(a).map(|e| e.nav_parent), Some(Some(b)));
    }

    #[test]
    fn ancestor_query_walks_structure() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, Element::default());
        let mid = tree.insert(Some(root), Element::default());
        let deep = tree.insert(Some(mid), Element::default());
        let other = tree.insert(None, Element::default());
        assert!(tree.is_ancestor_or_self(root, deep));
        assert!(tree.is_ancestor_or_self(deep, deep));
        assert!(!tree.is_ancestor_or_self(deep, root));
        assert!(!tree.is_ancestor_or_self(other, deep));
    }
}
