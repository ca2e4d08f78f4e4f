// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event records shared by the hover, active, and slide managers.
//!
//! Every record is a [`UiEvent`]: the target it concerns, a host timestamp in
//! milliseconds, and a manager-specific payload. The payload decides the event
//! type string, so a handler that only sees the record can still tell what it got.

use kurbo::Point;

/// Immutable event record delivered to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub struct UiEvent<K, P> {
    /// Target the event concerns.
    pub target: K,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
    /// Manager-specific data.
    pub payload: P,
}

impl<K, P: Payload> UiEvent<K, P> {
    /// Create a new record.
    pub fn new(target: K, timestamp: u64, payload: P) -> Self {
        Self {
            target,
            timestamp,
            payload,
        }
    }

    /// The event type name (`"hover"`, `"active"`, or `"slide"`).
    pub fn event_type(&self) -> &'static str {
        P::TYPE
    }
}

/// A payload that names its event type.
pub trait Payload {
    /// Type name reported by [`UiEvent::event_type`].
    const TYPE: &'static str;
}

/// Payload of a hover event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hover {
    /// `true` when the pointer entered the target, `false` when it left.
    pub hover: bool,
}

impl Payload for Hover {
    const TYPE: &'static str = "hover";
}

/// Payload of an active (pressed) event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Active {
    /// `true` when the press began, `false` on release.
    pub active: bool,
    /// Set on releases that did not complete normally.
    pub cancel: bool,
    /// Identity that owns (or owned) the press.
    pub pointer_id: PointerId,
}

impl Payload for Active {
    const TYPE: &'static str = "active";
}

/// Phase of a slide gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlideState {
    /// The gesture began.
    Start,
    /// The owning pointer moved.
    Move,
    /// The owning pointer was released.
    End,
}

/// Payload of a slide event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slide {
    /// Gesture phase.
    pub state: SlideState,
    /// Absolute x coordinate.
    pub x: f64,
    /// Absolute y coordinate.
    pub y: f64,
}

impl Payload for Slide {
    const TYPE: &'static str = "slide";
}

/// Hover event record.
pub type HoverEvent<K> = UiEvent<K, Hover>;
/// Active event record.
pub type ActiveEvent<K> = UiEvent<K, Active>;
/// Slide event record.
pub type SlideEvent<K> = UiEvent<K, Slide>;

/// Identity driving a press or a slide.
///
/// At most one identity owns a target at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerId {
    /// Simulated by the spatial navigator.
    Nav,
    /// The mouse; there is only ever one.
    Mouse,
    /// A touch or pen contact.
    Touch(u32),
}

impl PointerId {
    /// Numeric form used at the host boundary: `-2` nav, `-1` mouse, `>= 0` contacts.
    pub fn raw(self) -> i64 {
        match self {
            Self::Nav => -2,
            Self::Mouse => -1,
            Self::Touch(id) => i64::from(id),
        }
    }

    /// Inverse of [`PointerId::raw`]; values below `-2` have no identity.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            -2 => Some(Self::Nav),
            -1 => Some(Self::Mouse),
            n => u32::try_from(n).ok().map(Self::Touch),
        }
    }
}

/// Kind of pointer that produced a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse.
    Mouse,
    /// Pen or stylus.
    Pen,
    /// Touch contact.
    Touch,
}

/// One touch contact in a touch event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// Contact identifier, stable for the lifetime of the contact.
    pub id: u32,
    /// Absolute position of the contact.
    pub point: Point,
}

impl Touch {
    /// Create a contact record.
    pub fn new(id: u32, point: Point) -> Self {
        Self { id, point }
    }
}

/// Result of feeding a touch start to a manager.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchResponse<E> {
    /// The host should suppress emulated mouse events for this touch.
    pub prevent_default: bool,
    /// The event that was emitted, if any.
    pub event: Option<E>,
}

impl<E> TouchResponse<E> {
    /// The touch was not consumed.
    pub fn ignored() -> Self {
        Self {
            prevent_default: false,
            event: None,
        }
    }

    /// The touch was consumed and produced `event`.
    pub fn handled(event: E) -> Self {
        Self {
            prevent_default: true,
            event: Some(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_comes_from_payload() {
        let hover = HoverEvent::new(1_u32, 10, Hover { hover: true });
        let slide = SlideEvent::new(
            1_u32,
            10,
            Slide {
                state: SlideState::Move,
                x: 1.0,
                y: 2.0,
            },
        );
        assert_eq!(hover.event_type(), "hover");
        assert_eq!(slide.event_type(), "slide");
    }

    #[test]
    fn pointer_id_numeric_form() {
        assert_eq!(PointerId::Nav.raw(), -2);
        assert_eq!(PointerId::Mouse.raw(), -1);
        assert_eq!(PointerId::Touch(7).raw(), 7);
        assert_eq!(PointerId::from_raw(0), Some(PointerId::Touch(0)));
        assert_eq!(PointerId::from_raw(-2), Some(PointerId::Nav));
        assert_eq!(PointerId::from_raw(-3), None);
    }
}
