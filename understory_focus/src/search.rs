// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate searches over a [`NavTree`].
//!
//! Only focusable leaves are results. When the nearest candidate is a group,
//! the search descends into it, measuring from the original box. Every walk
//! over declared links keeps a visited set, so a malformed hierarchy ends the
//! search instead of looping.

use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::Navigation;
use crate::geometry::NearestFinder;
use crate::tree::NavTree;

/// Not opted out and rendered with a non-zero size.
pub fn is_navigable<K, T>(tree: &T, id: K) -> bool
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    !tree.is_non_navigable(id)
        && tree
            .bounds(id)
            .is_some_and(|b| b.width() != 0.0 || b.height() != 0.0)
}

/// Whether `id` can be a search step: a navigable leaf, or a navigable node
/// that leads to one.
///
/// A node leads to a leaf when one of its declared children is navigable, when
/// a navigable leaf sits anywhere below it, or when a group below it declares a
/// navigable child.
pub fn is_candidate<K, T>(tree: &T, id: K, exclude: Option<K>) -> bool
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    if exclude == Some(id) || !is_navigable(tree, id) {
        return false;
    }
    if tree.is_nav_leaf(id) || declares_navigable(tree, id) {
        return true;
    }
    let mut visited = HashSet::new();
    let mut stack: SmallVec<[K; 16]> = SmallVec::from_slice(tree.children(id));
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        if tree.is_nav_leaf(node) && is_navigable(tree, node) {
            return true;
        }
        if tree.is_nav_group(node) && declares_navigable(tree, node) {
            return true;
        }
        stack.extend_from_slice(tree.children(node));
    }
    false
}

fn declares_navigable<K, T>(tree: &T, id: K) -> bool
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    tree.declared_children(id)
        .is_some_and(|children| children.iter().any(|c| is_navigable(tree, *c)))
}

/// Whether `child` is reachable from `parent` for ordered traversal.
///
/// True when `child` is structurally inside `parent`, inside one of its
/// declared children, or inside a declared child of a group below it.
pub fn contains_nav<K, T>(tree: &T, parent: K, child: K) -> bool
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    if tree.contains(parent, child) {
        return true;
    }
    let declared_contains = |group: K| {
        tree.declared_children(group)
            .map(|children| children.iter().any(|c| tree.contains(*c, child)))
    };
    if let Some(found) = declared_contains(parent) {
        return found;
    }
    let mut visited = HashSet::new();
    let mut stack: SmallVec<[K; 16]> = SmallVec::from_slice(tree.children(parent));
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        if tree.is_nav_group(node) && declared_contains(node) == Some(true) {
            return true;
        }
        stack.extend_from_slice(tree.children(node));
    }
    false
}

/// Nearest leaf among the navigation children of `root`, measured from `begin`.
///
/// `exclude` is skipped as a candidate (usually the node `begin` came from).
pub fn search_inwards<K, T>(
    tree: &T,
    root: K,
    direction: Navigation,
    begin: Rect,
    exclude: Option<K>,
) -> Option<K>
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    let mut visited = HashSet::new();
    inwards(tree, root, direction, begin, exclude, &mut visited)
}

fn inwards<K, T>(
    tree: &T,
    root: K,
    direction: Navigation,
    begin: Rect,
    exclude: Option<K>,
    visited: &mut HashSet<K>,
) -> Option<K>
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    if !visited.insert(root) {
        return None;
    }
    let item = nearest(tree, root, direction, begin, exclude)?;
    if tree.is_nav_leaf(item) {
        Some(item)
    } else {
        inwards(tree, item, direction, begin, None, visited)
    }
}

fn nearest<K, T>(
    tree: &T,
    root: K,
    direction: Navigation,
    begin: Rect,
    exclude: Option<K>,
) -> Option<K>
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    let mut finder = NearestFinder::new(begin, direction);
    let mut item = None;
    for &child in tree.nav_children(root) {
        if !is_candidate(tree, child, exclude) {
            continue;
        }
        if let Some(rect) = tree.bounds(child) {
            if finder.offer(rect) {
                item = Some(child);
            }
        }
    }
    item
}

/// Climb from `from` through navigation ancestors inside `border`, searching
/// each ancestor's other children until a leaf is found.
///
/// Stops without a result once the next ancestor lies outside `border`.
pub fn search_outwards<K, T>(
    tree: &T,
    border: K,
    direction: Navigation,
    begin: Rect,
    from: K,
) -> Option<K>
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    let mut visited = HashSet::new();
    let mut from = from;
    loop {
        let root = tree.nav_parent(from)?;
        if !tree.is_attached(root, border) || !visited.insert(root) {
            return None;
        }
        if let Some(item) = nearest(tree, root, direction, begin, Some(from)) {
            if tree.is_nav_leaf(item) {
                return Some(item);
            }
            if let Some(found) = search_inwards(tree, item, direction, begin, None) {
                return Some(found);
            }
        }
        from = root;
    }
}

/// Next (or previous) leaf in document order inside `root`, after `from`.
///
/// Groups are entered and left as the order requires. Without `from` the first
/// (or last) leaf is returned. There is no wraparound.
pub fn search_by_order<K, T>(tree: &T, root: K, direction: Navigation, from: Option<K>) -> Option<K>
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    let mut visited = HashSet::new();
    by_order(tree, root, direction == Navigation::Prev, from, &mut visited)
}

fn by_order<K, T>(
    tree: &T,
    root: K,
    backwards: bool,
    from: Option<K>,
    visited: &mut HashSet<K>,
) -> Option<K>
where
    K: Copy + Eq + Hash,
    T: NavTree<K> + ?Sized,
{
    if !visited.insert(root) {
        return None;
    }
    let mut children: SmallVec<[K; 16]> = tree
        .nav_children(root)
        .iter()
        .copied()
        .filter(|c| is_candidate(tree, *c, None))
        .collect();
    if backwards {
        children.reverse();
    }

    let start = match from {
        None => 0,
        Some(from) => {
            let i = children.iter().position(|c| contains_nav(tree, *c, from))?;
            if children[i] == from { i + 1 } else { i }
        }
    };

    for &target in &children[start..] {
        if tree.is_nav_leaf(target) {
            return Some(target);
        }
        let inner = from.filter(|f| contains_nav(tree, target, *f));
        if let Some(found) = by_order(tree, target, backwards, inner, visited) {
            return Some(found);
        }
    }
    None
}
