// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability a node hierarchy needs to be navigable.

use core::hash::Hash;

use kurbo::Rect;

/// Read access to a hierarchy of navigable nodes, plus scrolling.
///
/// Structural links (`parent`, `children`) must form a forest. Declared links
/// (`declared_parent`, `declared_children`) override them for navigation and
/// may point anywhere; searches guard against cycles through them.
///
/// Bounds are in one shared world space. A node without bounds, or with zero
/// width and height, is treated as not rendered.
pub trait NavTree<K: Copy + Eq + Hash> {
    /// Whether `id` still refers to a live node.
    fn is_alive(&self, id: K) -> bool;

    /// World-space bounds of `id`.
    fn bounds(&self, id: K) -> Option<Rect>;

    /// Structural parent.
    fn parent(&self, id: K) -> Option<K>;

    /// Structural children in document order.
    fn children(&self, id: K) -> &[K];

    /// Navigation parent that overrides [`NavTree::parent`].
    fn declared_parent(&self, _id: K) -> Option<K> {
        None
    }

    /// Ordered navigation children that override [`NavTree::children`].
    fn declared_children(&self, _id: K) -> Option<&[K]> {
        None
    }

    /// Whether `id` is a focusable leaf.
    fn is_nav_leaf(&self, id: K) -> bool;

    /// Whether `id` is a navigation group.
    fn is_nav_group(&self, id: K) -> bool;

    /// Whether `id` opted out of navigation.
    fn is_non_navigable(&self, id: K) -> bool;

    /// Bring `id` into view. Best effort; the default does nothing.
    fn scroll_into_view(&mut self, _id: K) {}

    /// Parent used by navigation: declared first, then structural.
    fn nav_parent(&self, id: K) -> Option<K> {
        self.declared_parent(id).or_else(|| self.parent(id))
    }

    /// Children used by navigation: declared first, then structural.
    fn nav_children(&self, id: K) -> &[K] {
        match self.declared_children(id) {
            Some(children) => children,
            None => self.children(id),
        }
    }

    /// Whether `id` is `ancestor` or structurally below it.
    fn contains(&self, ancestor: K, id: K) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    /// Whether `id` is alive and inside `root`.
    fn is_attached(&self, id: K, root: K) -> bool {
        self.is_alive(id) && self.contains(root, id)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use alloc::vec::Vec;

    use hashbrown::HashMap;
    use kurbo::Rect;

    use super::NavTree;

    #[derive(Debug, Default)]
    struct Node {
        parent: Option<u32>,
        children: Vec<u32>,
        bounds: Rect,
        leaf: bool,
        group: bool,
        non_navigable: bool,
        declared_parent: Option<u32>,
        declared_children: Option<Vec<u32>>,
    }

    /// Small integer-keyed hierarchy with a scroll log.
    #[derive(Debug, Default)]
    pub(crate) struct TestTree {
        nodes: HashMap<u32, Node>,
        pub(crate) scrolled: Vec<u32>,
    }

    impl TestTree {
        pub(crate) fn root(id: u32, bounds: Rect) -> Self {
            let mut tree = Self::default();
            tree.nodes.insert(
                id,
                Node {
                    bounds,
                    ..Node::default()
                },
            );
            tree
        }

        fn insert(&mut self, parent: u32, id: u32, bounds: Rect, leaf: bool) -> &mut Self {
            self.nodes.insert(
                id,
                Node {
                    parent: Some(parent),
                    bounds,
                    leaf,
                    group: !leaf,
                    ..Node::default()
                },
            );
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.push(id);
            }
            self
        }

        pub(crate) fn leaf(&mut self, parent: u32, id: u32, bounds: Rect) -> &mut Self {
            self.insert(parent, id, bounds, true)
        }

        pub(crate) fn group(&mut self, parent: u32, id: u32, bounds: Rect) -> &mut Self {
            self.insert(parent, id, bounds, false)
        }

        pub(crate) fn plain(&mut self, parent: u32, id: u32, bounds: Rect) -> &mut Self {
            self.insert(parent, id, bounds, false);
            if let Some(n) = self.nodes.get_mut(&id) {
                n.group = false;
            }
            self
        }

        pub(crate) fn set_non_navigable(&mut self, id: u32) {
            if let Some(n) = self.nodes.get_mut(&id) {
                n.non_navigable = true;
            }
        }

        pub(crate) fn set_bounds(&mut self, id: u32, bounds: Rect) {
            if let Some(n) = self.nodes.get_mut(&id) {
                n.bounds = bounds;
            }
        }

        pub(crate) fn declare(&mut self, group: u32, children: &[u32]) {
            for c in children {
                if let Some(n) = self.nodes.get_mut(c) {
                    n.declared_parent = Some(group);
                }
            }
            if let Some(n) = self.nodes.get_mut(&group) {
                n.declared_children = Some(children.to_vec());
            }
        }

        pub(crate) fn remove(&mut self, id: u32) {
            if let Some(node) = self.nodes.remove(&id) {
                if let Some(p) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
                    p.children.retain(|c| *c != id);
                }
                for c in node.children {
                    self.remove(c);
                }
            }
        }
    }

    impl NavTree<u32> for TestTree {
        fn is_alive(&self, id: u32) -> bool {
            self.nodes.contains_key(&id)
        }

        fn bounds(&self, id: u32) -> Option<Rect> {
            self.nodes.get(&id).map(|n| n.bounds)
        }

        fn parent(&self, id: u32) -> Option<u32> {
            self.nodes.get(&id).and_then(|n| n.parent)
        }

        fn children(&self, id: u32) -> &[u32] {
            self.nodes.get(&id).map_or(&[][..], |n| n.children.as_slice())
        }

        fn declared_parent(&self, id: u32) -> Option<u32> {
            self.nodes.get(&id).and_then(|n| n.declared_parent)
        }

        fn declared_children(&self, id: u32) -> Option<&[u32]> {
            self.nodes.get(&id).and_then(|n| n.declared_children.as_deref())
        }

        fn is_nav_leaf(&self, id: u32) -> bool {
            self.nodes.get(&id).is_some_and(|n| n.leaf)
        }

        fn is_nav_group(&self, id: u32) -> bool {
            self.nodes.get(&id).is_some_and(|n| n.group)
        }

        fn is_non_navigable(&self, id: u32) -> bool {
            self.nodes.get(&id).is_some_and(|n| n.non_navigable)
        }

        fn scroll_into_view(&mut self, id: u32) {
            self.scrolled.push(id);
        }
    }
}
