// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Everything one input produced.

use alloc::vec::Vec;

use understory_event_state::envelope::{ActiveEvent, HoverEvent, SlideEvent};
use understory_focus::NavigatorEvent;
use understory_gamepad::GamepadEvent;
use understory_keyboard::{BinderEvent, KeyboardEvent};

/// Events emitted while routing one input, grouped by source.
///
/// Subscribers have already seen these; the record is for callers that
/// prefer polling results over handlers.
#[derive(Clone, Debug)]
pub struct Emitted<K> {
    /// Hover changes, including those caused by navigation.
    pub hover: Vec<HoverEvent<K>>,
    /// Press changes, including navigator presses.
    pub active: Vec<ActiveEvent<K>>,
    /// Drag gesture steps.
    pub slide: Vec<SlideEvent<K>>,
    /// Navigator broadcasts.
    pub navigator: Vec<NavigatorEvent<K>>,
    /// Keyboard events, in dispatch order.
    pub keyboard: Vec<KeyboardEvent>,
    /// Gamepad events tagged with their slot.
    pub gamepad: Vec<(usize, GamepadEvent)>,
    /// Interactive binder progress.
    pub binder: Option<BinderEvent>,
    /// The host should suppress the platform default action.
    pub prevent_default: bool,
}

impl<K> Default for Emitted<K> {
    fn default() -> Self {
        Self {
            hover: Vec::new(),
            active: Vec::new(),
            slide: Vec::new(),
            navigator: Vec::new(),
            keyboard: Vec::new(),
            gamepad: Vec::new(),
            binder: None,
            prevent_default: false,
        }
    }
}

impl<K> Emitted<K> {
    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.hover.is_empty()
            && self.active.is_empty()
            && self.slide.is_empty()
            && self.navigator.is_empty()
            && self.keyboard.is_empty()
            && self.gamepad.is_empty()
            && self.binder.is_none()
    }
}
