// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the managers and whatever owns the targets.

use kurbo::Rect;

/// Styling marker written by a manager on state transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Written by [`HoverManager`](crate::hover::HoverManager).
    Hover,
    /// Written by [`ActiveManager`](crate::active::ActiveManager).
    Active,
    /// Written by [`SlideManager`](crate::slide::SlideManager).
    Slide,
}

/// Target storage the managers read bounds from and write markers to.
///
/// Markers are written synchronously, immediately before the matching event
/// is dispatched. Implementations should ignore targets they no longer know.
pub trait TargetHost<K> {
    /// World-space bounds of `target`, or `None` if it is gone.
    fn bounds(&self, target: K) -> Option<Rect>;

    /// Set or clear a styling marker on `target`.
    fn set_marker(&mut self, target: K, marker: Marker, on: bool);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Marker, TargetHost};
    use hashbrown::{HashMap, HashSet};
    use kurbo::Rect;

    /// Bounds table with a marker log, keyed by small integers.
    #[derive(Debug, Default)]
    pub(crate) struct MapHost {
        pub(crate) bounds: HashMap<u32, Rect>,
        pub(crate) markers: HashSet<(u32, Marker)>,
    }

    impl MapHost {
        pub(crate) fn with(items: &[(u32, Rect)]) -> Self {
            Self {
                bounds: items.iter().copied().collect(),
                markers: HashSet::new(),
            }
        }

        pub(crate) fn has(&self, target: u32, marker: Marker) -> bool {
            self.markers.contains(&(target, marker))
        }
    }

    impl TargetHost<u32> for MapHost {
        fn bounds(&self, target: u32) -> Option<Rect> {
            self.bounds.get(&target).copied()
        }

        fn set_marker(&mut self, target: u32, marker: Marker, on: bool) {
            if on {
                self.markers.insert((target, marker));
            } else {
                self.markers.remove(&(target, marker));
            }
        }
    }
}
