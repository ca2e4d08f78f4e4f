// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-to-box distance and directional filters.

use kurbo::{Point, Rect, Vec2};

use crate::Navigation;

/// Gap between two boxes along the line joining their centers.
///
/// The center-to-center length is shortened by how far each box reaches
/// along that line, so large neighbors are not penalized for their size.
/// Overlapping boxes yield negative values.
pub fn box_distance(a: Rect, b: Rect) -> f64 {
    let (ca, cb) = (a.center(), b.center());
    let v = Vec2::new((cb.x - ca.x).abs(), (cb.y - ca.y).abs());
    let (half_wa, half_ha) = (a.width() / 2.0, a.height() / 2.0);
    let (half_wb, half_hb) = (b.width() / 2.0, b.height() / 2.0);

    if v.x == 0.0 {
        return v.y - half_ha - half_hb;
    }
    if v.y == 0.0 {
        return v.x - half_wa - half_wb;
    }

    let length = v.length();
    let sin = v.y / length;
    let cos = v.x / length;
    length - (half_ha / sin).min(half_wa / cos) - (half_hb / sin).min(half_wb / cos)
}

/// Whether `to` lies strictly beyond `from` in `direction`.
///
/// Ordinal intents (`Next`, `Prev`) have no half-plane.
pub fn in_half_plane(direction: Navigation, from: Point, to: Rect) -> bool {
    match direction {
        Navigation::Up => to.y1 < from.y,
        Navigation::Right => from.x < to.x0,
        Navigation::Down => from.y < to.y0,
        Navigation::Left => to.x1 < from.x,
        Navigation::Next | Navigation::Prev => false,
    }
}

/// Inclusive point-in-box test.
pub fn is_inside(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Running nearest-candidate search from one box in one direction.
///
/// ```
/// use kurbo::Rect;
/// use understory_focus::Navigation;
/// use understory_focus::geometry::NearestFinder;
///
/// let mut finder = NearestFinder::new(Rect::new(0.0, 0.0, 10.0, 10.0), Navigation::Right);
/// assert!(finder.offer(Rect::new(40.0, 0.0, 50.0, 10.0)));
/// assert!(finder.offer(Rect::new(20.0, 0.0, 30.0, 10.0)));
/// assert!(!finder.offer(Rect::new(60.0, 0.0, 70.0, 10.0)), "farther");
/// assert!(!finder.offer(Rect::new(-20.0, 0.0, -10.0, 10.0)), "wrong side");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct NearestFinder {
    begin: Rect,
    origin: Point,
    direction: Navigation,
    best: f64,
}

impl NearestFinder {
    /// Start searching from `begin`.
    pub fn new(begin: Rect, direction: Navigation) -> Self {
        Self {
            begin,
            origin: begin.center(),
            direction,
            best: f64::INFINITY,
        }
    }

    /// Offer a candidate; returns `true` if it is the new nearest.
    ///
    /// Candidates must be strictly closer than the current best, and either
    /// lie in the half-plane or contain the origin point. An all-zero box is
    /// never accepted.
    pub fn offer(&mut self, rect: Rect) -> bool {
        if rect == Rect::ZERO {
            return false;
        }
        let distance = box_distance(self.begin, rect);
        if distance >= self.best {
            return false;
        }
        if !(in_half_plane(self.direction, self.origin, rect) || is_inside(self.origin, rect)) {
            return false;
        }
        self.best = distance;
        true
    }

    /// Distance of the current best candidate.
    pub fn best_distance(&self) -> f64 {
        self.best
    }
}
