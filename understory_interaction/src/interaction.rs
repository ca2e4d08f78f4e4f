// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::Hash;

use kurbo::Point;
use understory_event_state::active::{ActiveManager, Button, PRIMARY_BUTTON};
use understory_event_state::envelope::{PointerId, PointerKind, Touch};
use understory_event_state::host::TargetHost;
use understory_event_state::hover::HoverManager;
use understory_event_state::slide::SlideManager;
use understory_focus::{NavTree, Navigator, NavigatorConfig, NavigatorEvent};
use understory_gamepad::{
    Gamepad, GamepadConfig, GamepadError, GamepadEvent, GamepadRegistry, GamepadSource,
    MAX_GAMEPADS,
};
use understory_keyboard::{BinderConfig, KeyResponse, KeyboardManager};

use crate::Emitted;

/// Setup for [`Interaction::new`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InteractionConfig {
    /// Navigator tuning.
    pub navigator: NavigatorConfig,
    /// Gamepad poller tuning.
    pub gamepad: GamepadConfig,
    /// Key binder tuning.
    pub binder: BinderConfig,
    /// Gamepad slot that drives navigation, `0` by default.
    pub nav_gamepad: usize,
}

/// The input services of one UI surface, wired together.
#[derive(Debug)]
pub struct Interaction<K> {
    hover: HoverManager<K>,
    active: ActiveManager<K>,
    slide: SlideManager<K>,
    keyboard: KeyboardManager,
    gamepads: GamepadRegistry,
    navigator: Navigator<K>,
    nav_gamepad: usize,
}

impl<K: Copy + Eq + Hash> Interaction<K> {
    /// Services for a surface whose base navigation layer is `root`.
    pub fn new(root: K, config: InteractionConfig) -> Self {
        if config.nav_gamepad >= MAX_GAMEPADS {
            log::warn!(
                "interaction: gamepad slot {} cannot drive navigation",
                config.nav_gamepad
            );
        }
        Self {
            hover: HoverManager::new(),
            active: ActiveManager::new(),
            slide: SlideManager::new(),
            keyboard: KeyboardManager::new().with_binder_config(config.binder),
            gamepads: GamepadRegistry::new(config.gamepad),
            navigator: Navigator::new(root, config.navigator),
            nav_gamepad: config.nav_gamepad,
        }
    }

    /// Hover state.
    pub fn hover(&mut self) -> &mut HoverManager<K> {
        &mut self.hover
    }

    /// Press state.
    pub fn active(&mut self) -> &mut ActiveManager<K> {
        &mut self.active
    }

    /// Drag state.
    pub fn slide(&mut self) -> &mut SlideManager<K> {
        &mut self.slide
    }

    /// Keyboard bindings and state.
    pub fn keyboard(&mut self) -> &mut KeyboardManager {
        &mut self.keyboard
    }

    /// Spatial navigator.
    pub fn navigator(&mut self) -> &mut Navigator<K> {
        &mut self.navigator
    }

    /// The pad in slot `index`, created on first use.
    pub fn gamepad(
        &mut self,
        index: usize,
        source: &impl GamepadSource,
    ) -> Result<&mut Gamepad, GamepadError> {
        self.gamepads.get(index, source)
    }

    /// A pointer moved. Clears the navigator cursor, then updates hover and
    /// mouse-driven drags.
    pub fn pointer_move<T>(
        &mut self,
        tree: &mut T,
        kind: PointerKind,
        point: Point,
        buttons: u16,
        timestamp: u64,
    ) -> Emitted<K>
    where
        T: TargetHost<K> + NavTree<K>,
    {
        let mut out = Emitted::default();
        let previous = self.navigator.current();
        if let Some(event) = self.navigator.pointer_moved(point, timestamp) {
            self.step_aside(tree, previous, point, event, &mut out);
        }
        out.hover.extend(self.hover.pointer_move(tree, kind, point, buttons, timestamp));
        if kind != PointerKind::Touch {
            out.slide.extend(self.slide.mouse_move(point, timestamp));
        }
        out
    }

    /// A pointer left the surface.
    pub fn pointer_leave(
        &mut self,
        tree: &mut impl TargetHost<K>,
        kind: PointerKind,
        timestamp: u64,
    ) -> Emitted<K> {
        Emitted {
            hover: self.hover.pointer_leave(tree, kind, timestamp),
            ..Emitted::default()
        }
    }

    /// Wheel input. Clears the navigator cursor.
    pub fn wheel<T>(&mut self, tree: &mut T, point: Point, timestamp: u64) -> Emitted<K>
    where
        T: TargetHost<K> + NavTree<K>,
    {
        let mut out = Emitted::default();
        let previous = self.navigator.current();
        if let Some(event) = self.navigator.wheel(point, timestamp) {
            self.step_aside(tree, previous, point, event, &mut out);
        }
        out
    }

    /// A mouse button went down over `target`. The primary button presses and
    /// starts a drag.
    pub fn mouse_down(
        &mut self,
        tree: &mut impl TargetHost<K>,
        target: K,
        button: Button,
        point: Point,
        timestamp: u64,
    ) -> Emitted<K> {
        let mut out = Emitted::default();
        out.active.extend(self.active.mouse_down(tree, target, button, timestamp));
        if button == PRIMARY_BUTTON {
            out.slide.extend(self.slide.mouse_down(tree, target, point, timestamp));
        }
        out
    }

    /// A mouse button went up, over `target` if it is known.
    pub fn mouse_up(
        &mut self,
        tree: &mut impl TargetHost<K>,
        target: Option<K>,
        point: Point,
        timestamp: u64,
    ) -> Emitted<K> {
        let mut out = Emitted::default();
        if let Some(target) = target {
            out.active.extend(self.active.mouse_up(tree, target, timestamp));
        }
        out.slide.extend(self.slide.mouse_up(tree, point, timestamp));
        out
    }

    /// The mouse left `target`.
    pub fn mouse_leave(
        &mut self,
        tree: &mut impl TargetHost<K>,
        target: K,
        timestamp: u64,
    ) -> Emitted<K> {
        Emitted {
            active: self
                .active
                .mouse_leave(tree, target, timestamp)
                .into_iter()
                .collect(),
            ..Emitted::default()
        }
    }

    /// Touches began on `target`.
    pub fn touch_start(
        &mut self,
        tree: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> Emitted<K> {
        let active = self.active.touch_start(tree, target, changed, timestamp);
        let slide = self.slide.touch_start(tree, target, changed, timestamp);
        Emitted {
            active: active.event.into_iter().collect(),
            slide: slide.event.into_iter().collect(),
            prevent_default: active.prevent_default || slide.prevent_default,
            ..Emitted::default()
        }
    }

    /// Touches that began on `target` moved.
    pub fn touch_move(
        &mut self,
        tree: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> Emitted<K> {
        let mut out = Emitted::default();
        out.active.extend(self.active.touch_move(tree, target, changed, timestamp));
        out.slide.extend(self.slide.touch_move(changed, timestamp));
        out
    }

    /// Touches that began on `target` ended.
    pub fn touch_end(
        &mut self,
        tree: &mut impl TargetHost<K>,
        target: K,
        changed: &[Touch],
        timestamp: u64,
    ) -> Emitted<K> {
        let mut out = Emitted::default();
        out.active.extend(self.active.touch_end(tree, target, changed, timestamp));
        out.slide.extend(self.slide.touch_end(tree, changed, timestamp));
        out
    }

    /// A key went down.
    pub fn key_down<T>(
        &mut self,
        tree: &mut T,
        code: &str,
        composing: bool,
        timestamp: u64,
    ) -> Emitted<K>
    where
        T: TargetHost<K> + NavTree<K>,
    {
        let response = self.keyboard.key_down(code, composing, timestamp);
        self.route_keys(tree, response, timestamp)
    }

    /// A key went up.
    pub fn key_up<T>(
        &mut self,
        tree: &mut T,
        code: &str,
        composing: bool,
        timestamp: u64,
    ) -> Emitted<K>
    where
        T: TargetHost<K> + NavTree<K>,
    {
        let response = self.keyboard.key_up(code, composing, timestamp);
        self.route_keys(tree, response, timestamp)
    }

    /// Every physical key was released (for example, the window lost focus).
    pub fn blur(&mut self) {
        self.keyboard.clear_held();
    }

    /// The host reported a controller in slot `index`.
    ///
    /// The slot's pad is created on first use.
    pub fn gamepad_connected(
        &mut self,
        source: &impl GamepadSource,
        index: usize,
    ) -> Result<Emitted<K>, GamepadError> {
        let fresh = self.gamepads.slot(index).is_none();
        let pad = self.gamepads.get(index, source)?;
        let event = if fresh && pad.is_connected() {
            Some(GamepadEvent::Connectivity(true))
        } else {
            pad.connected(index)
        };
        Ok(Emitted {
            gamepad: event.map(|e| (index, e)).into_iter().collect(),
            ..Emitted::default()
        })
    }

    /// The host reported that the controller in slot `index` went away.
    pub fn gamepad_disconnected(&mut self, index: usize) -> Emitted<K> {
        Emitted {
            gamepad: self
                .gamepads
                .disconnected(index)
                .map(|e| (index, e))
                .into_iter()
                .collect(),
            ..Emitted::default()
        }
    }

    /// One display frame: poll gamepads, advance the binder, the navigator
    /// indicator, and held-direction repeats.
    pub fn frame<T>(
        &mut self,
        tree: &mut T,
        source: &mut impl GamepadSource,
        timestamp: u64,
    ) -> Emitted<K>
    where
        T: TargetHost<K> + NavTree<K>,
    {
        let mut out = Emitted::default();
        let polled = self.gamepads.poll(source, timestamp);
        let nav_gamepad = self.nav_gamepad;
        for (_, event) in polled.iter().filter(|(i, _)| *i == nav_gamepad) {
            let Some(pad) = self.gamepads.slot(nav_gamepad) else {
                break;
            };
            for nav_event in self.navigator.handle_gamepad(tree, event, pad, timestamp) {
                self.follow(tree, nav_event, &mut out);
            }
        }
        out.gamepad = polled;
        out.binder = self.keyboard.tick(timestamp);
        for nav_event in self.navigator.tick(tree, timestamp) {
            self.follow(tree, nav_event, &mut out);
        }
        out
    }

    /// Drop state for targets that are no longer alive.
    pub fn prune(&mut self, mut alive: impl FnMut(K) -> bool) {
        self.hover.prune(&mut alive);
        self.active.prune(&mut alive);
        self.slide.prune(&mut alive);
        self.navigator.prune(&mut alive);
    }

    fn route_keys<T>(
        &mut self,
        tree: &mut T,
        response: KeyResponse,
        timestamp: u64,
    ) -> Emitted<K>
    where
        T: TargetHost<K> + NavTree<K>,
    {
        let mut out = Emitted {
            prevent_default: response.prevent_default,
            binder: response.binder,
            ..Emitted::default()
        };
        for event in &response.events {
            if let Some(nav_event) = self.navigator.handle_keyboard(tree, event, timestamp) {
                self.follow(tree, nav_event, &mut out);
            }
        }
        out.keyboard = response.events;
        out
    }

    /// The navigator gave way to a pointer at `point`. Only the element it had
    /// marked is released; hover under the pointer stays put.
    fn step_aside(
        &mut self,
        tree: &mut impl TargetHost<K>,
        previous: Option<K>,
        point: Point,
        event: NavigatorEvent<K>,
        out: &mut Emitted<K>,
    ) {
        let timestamp = event.timestamp();
        if let Some(target) = previous {
            out.hover.extend(self.hover.release_nav(tree, target, point, timestamp));
            if self.active.owner(target) == Some(PointerId::Nav) {
                out.active.extend(self.active.deactivate(tree, target, timestamp));
            }
        }
        out.navigator.push(event);
    }

    /// Mirror a navigator broadcast into hover and press state.
    fn follow(
        &mut self,
        tree: &mut impl TargetHost<K>,
        event: NavigatorEvent<K>,
        out: &mut Emitted<K>,
    ) {
        let timestamp = event.timestamp();
        match event {
            NavigatorEvent::Nav { current, .. } => {
                out.hover.extend(self.hover.sync_nav(tree, current, timestamp));
                out.active.extend(self.active.sync_nav(tree, current, timestamp));
            }
            NavigatorEvent::Active { target, active, .. } => {
                out.active.extend(self.active.nav_active(tree, Some(target), active, timestamp));
            }
            NavigatorEvent::Cancel { .. } => {}
        }
        out.navigator.push(event);
    }
}
