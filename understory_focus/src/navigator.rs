// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layered focus cursor.
//!
//! A [`Navigator`] keeps a stack of [`Layer`]s. Only the top layer is live:
//! searches stay inside its root, and its `current`/`lock` pair is the cursor.
//! Covering a layer keeps its state, so removing the cover restores whatever
//! was focused beneath. The bottom (base) layer cannot be removed.
//!
//! Keyboard aliases, keyboard shortcuts, the gamepad D-pad, and the left stick
//! all end up in [`Navigator::nav`]. Held directions auto-repeat through
//! [`RepeatingTrigger`]s advanced by [`Navigator::tick`]. Pointer movement and
//! wheel input clear the cursor.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use understory_event_state::scheduler::{FrameLoop, RepeatingTrigger};
use understory_event_state::subscriptions::{Handler, SubscriptionId, Subscriptions};
use understory_gamepad::{Gamepad, GamepadButton, GamepadEvent, Stick};
use understory_keyboard::{
    CANCEL, CONFIRM, DOWN, KeyEventKind, KeyboardEvent, LEFT, NAV_NEXT, NAV_PREV, RIGHT, UP,
};

use crate::Navigation;
use crate::search::{is_navigable, search_by_order, search_inwards, search_outwards};
use crate::tree::NavTree;

const COMPASS: [Navigation; 4] = [
    Navigation::Up,
    Navigation::Right,
    Navigation::Down,
    Navigation::Left,
];

/// Navigator tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavigatorConfig {
    /// Left-stick deflection below which no direction is held.
    pub stick_dead_zone: f64,
    /// Hold time before a held direction starts repeating, in milliseconds.
    pub repeat_delay: u64,
    /// Time between repeats, in milliseconds.
    pub repeat_interval: u64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            stick_dead_zone: 0.3,
            repeat_delay: 500,
            repeat_interval: 100,
        }
    }
}

/// What a focused (or locked) element receives through its callback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavSignal {
    /// A navigation intent redirected by the lock.
    pub direction: Option<Navigation>,
    /// Confirm pressed (`true`) or released.
    pub active: Option<bool>,
    /// Cancel pressed (`true`) or released.
    pub cancel: Option<bool>,
}

impl NavSignal {
    fn direction(direction: Navigation) -> Self {
        Self {
            direction: Some(direction),
            ..Self::default()
        }
    }

    fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    fn cancel(cancel: bool) -> Self {
        Self {
            cancel: Some(cancel),
            ..Self::default()
        }
    }
}

/// Per-element signal hook.
pub type NavCallback = Box<dyn FnMut(&NavSignal)>;

/// Navigator event type, used as the subscription key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavigatorEventType {
    /// The cursor moved or was cleared.
    Nav,
    /// Confirm changed on the focused element.
    Active,
    /// Cancel changed on the focused element.
    Cancel,
}

/// Event broadcast to global navigator listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavigatorEvent<K> {
    /// The cursor moved to `current`, or was cleared.
    Nav {
        /// New cursor.
        current: Option<K>,
        /// Host timestamp in milliseconds.
        timestamp: u64,
    },
    /// Confirm was pressed or released on `target`.
    Active {
        /// Focused element.
        target: K,
        /// Pressed state.
        active: bool,
        /// Host timestamp in milliseconds.
        timestamp: u64,
    },
    /// Cancel was pressed or released on `target`.
    Cancel {
        /// Focused element.
        target: K,
        /// Pressed state.
        cancel: bool,
        /// Host timestamp in milliseconds.
        timestamp: u64,
    },
}

impl<K> NavigatorEvent<K> {
    /// Event type.
    pub fn kind(&self) -> NavigatorEventType {
        match self {
            Self::Nav { .. } => NavigatorEventType::Nav,
            Self::Active { .. } => NavigatorEventType::Active,
            Self::Cancel { .. } => NavigatorEventType::Cancel,
        }
    }

    /// Host timestamp in milliseconds.
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Nav { timestamp, .. }
            | Self::Active { timestamp, .. }
            | Self::Cancel { timestamp, .. } => *timestamp,
        }
    }
}

/// One navigation scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layer<K> {
    root: K,
    current: Option<K>,
    lock: Option<K>,
}

impl<K: Copy> Layer<K> {
    /// Searches stay inside this node.
    pub fn root(&self) -> K {
        self.root
    }

    /// Focused element of this layer.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Locked element of this layer.
    pub fn lock(&self) -> Option<K> {
        self.lock
    }
}

/// Where to draw the focus ring. While visible, hosts hide the mouse cursor.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Indicator {
    /// Bounds of the focused element.
    pub rect: Rect,
    /// Whether the ring is shown.
    pub visible: bool,
}

/// Layered spatial focus navigator.
pub struct Navigator<K> {
    config: NavigatorConfig,
    base: K,
    // Never empty: the base layer cannot be removed.
    layers: Vec<Layer<K>>,
    position: Option<Point>,
    indicator: Indicator,
    frame_loop: FrameLoop,
    repeat: [RepeatingTrigger; 4],
    callbacks: HashMap<K, NavCallback>,
    subs: Subscriptions<NavigatorEventType, NavigatorEvent<K>>,
    /// Ignore directional aliases and navigation shortcuts.
    pub block_keyboard: bool,
}

impl<K: fmt::Debug> fmt::Debug for Navigator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("config", &self.config)
            .field("base", &self.base)
            .field("layers", &self.layers)
            .field("position", &self.position)
            .field("indicator", &self.indicator)
            .field("frame_loop", &self.frame_loop)
            .field("repeat", &self.repeat)
            .field("callbacks", &self.callbacks.len())
            .field("subs", &self.subs)
            .field("block_keyboard", &self.block_keyboard)
            .finish()
    }
}

impl<K: Copy + Eq + Hash> Navigator<K> {
    /// A navigator whose base layer is rooted at `root`.
    pub fn new(root: K, config: NavigatorConfig) -> Self {
        let trigger = RepeatingTrigger::new(config.repeat_delay, config.repeat_interval);
        Self {
            config,
            base: root,
            layers: alloc::vec![Layer {
                root,
                current: None,
                lock: None,
            }],
            position: None,
            indicator: Indicator::default(),
            frame_loop: FrameLoop::new(),
            repeat: [trigger; 4],
            callbacks: HashMap::new(),
            subs: Subscriptions::new(),
            block_keyboard: false,
        }
    }

    /// Navigator tuning.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Subscribe to navigator events.
    pub fn on(
        &mut self,
        kind: NavigatorEventType,
        handler: Handler<NavigatorEvent<K>>,
    ) -> SubscriptionId {
        self.subs.on(kind, handler)
    }

    /// Remove a handler.
    pub fn off(&mut self, kind: NavigatorEventType, id: SubscriptionId) -> bool {
        self.subs.off(kind, id)
    }

    /// Install the signal hook of `target`, returning the one it replaces.
    pub fn set_callback(&mut self, target: K, callback: NavCallback) -> Option<NavCallback> {
        self.callbacks.insert(target, callback)
    }

    /// Remove the signal hook of `target`.
    pub fn clear_callback(&mut self, target: K) -> bool {
        self.callbacks.remove(&target).is_some()
    }

    /// Layers from bottom to top.
    pub fn layers(&self) -> &[Layer<K>] {
        &self.layers
    }

    /// Focused element of the top layer.
    pub fn current(&self) -> Option<K> {
        self.top().current
    }

    /// Focus `target` directly. Fails unless it is attached under the top root.
    pub fn set_current(&mut self, tree: &impl NavTree<K>, target: K) -> bool {
        if !tree.is_attached(target, self.top().root) {
            return false;
        }
        self.set_top_current(Some(target));
        true
    }

    /// Lock the top layer on `target`, or unlock with `None`.
    ///
    /// While locked, navigation intents go to the target's callback and the
    /// cursor stays put.
    pub fn lock(&mut self, target: Option<K>) {
        self.top_mut().lock = target;
    }

    /// Whether the top layer is locked. A lock only counts while something is focused.
    pub fn locking(&self) -> bool {
        let top = self.top();
        top.current.is_some() && top.lock.is_some()
    }

    /// Last cursor center, or last pointer position.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Focus ring state.
    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Push a layer rooted at `root`, or move an existing one to the top.
    ///
    /// `current` is adopted only if it lies inside `root`. Fails if `root` is
    /// not alive.
    pub fn add_layer(&mut self, tree: &impl NavTree<K>, root: K, current: Option<K>) -> bool {
        if !tree.is_alive(root) {
            return false;
        }
        let current = current.filter(|c| tree.contains(root, *c));
        if let Some(index) = self.layers.iter().position(|l| l.root == root) {
            let mut layer = self.layers.remove(index);
            if current.is_some() {
                layer.current = current;
            }
            self.layers.push(layer);
            log::debug!("navigator: promoted layer {index} to the top");
        } else {
            self.layers.push(Layer {
                root,
                current,
                lock: None,
            });
            log::debug!("navigator: pushed layer {}", self.layers.len() - 1);
        }
        true
    }

    /// Remove the layer rooted at `root`, wherever it is in the stack.
    ///
    /// The base layer is never removed.
    pub fn rm_layer(&mut self, root: K) -> bool {
        if root == self.base {
            return false;
        }
        let Some(index) = self.layers.iter().position(|l| l.root == root) else {
            return false;
        };
        self.layers.remove(index);
        log::debug!("navigator: removed layer {index}");
        true
    }

    /// Move the cursor in `direction`.
    ///
    /// While locked the intent goes to the locked element's callback instead.
    /// Returns the `nav` event on success; finding nothing is a no-op.
    pub fn nav<T: NavTree<K>>(
        &mut self,
        tree: &mut T,
        direction: Navigation,
        timestamp: u64,
    ) -> Option<NavigatorEvent<K>> {
        if let Some(lock) = self.lock_target(&*tree) {
            self.run_callback(lock, &NavSignal::direction(direction));
            return None;
        }
        let root = self.top().root;
        let current = self.top().current.filter(|c| tree.is_attached(*c, root));

        let next = if direction.is_ordinal() {
            search_by_order(&*tree, root, direction, current)
        } else {
            let (begin, parent) = match current {
                Some(c) => (tree.bounds(c)?, tree.nav_parent(c).unwrap_or(root)),
                None => {
                    let origin = self
                        .position
                        .or_else(|| tree.bounds(root).map(|b| b.center()))
                        .unwrap_or(Point::ORIGIN);
                    (Rect::from_origin_size(origin, Size::ZERO), root)
                }
            };
            search_inwards(&*tree, parent, direction, begin, current).or_else(|| {
                current.and_then(|c| search_outwards(&*tree, root, direction, begin, c))
            })
        }?;

        self.set_top_current(Some(next));
        tree.scroll_into_view(next);
        self.frame_loop.start();
        Some(self.emit(NavigatorEvent::Nav {
            current: Some(next),
            timestamp,
        }))
    }

    /// Advance the indicator loop and the auto-repeat triggers.
    ///
    /// The indicator follows the cursor (or the lock). If the cursor was
    /// detached, hidden, or marked non-navigable it is cleared and a `nav`
    /// event reports that.
    pub fn tick<T: NavTree<K>>(&mut self, tree: &mut T, timestamp: u64) -> Vec<NavigatorEvent<K>> {
        let mut events = Vec::new();
        if self.frame_loop.is_running() {
            events.extend(self.update(&*tree, timestamp));
        }
        for (i, direction) in COMPASS.into_iter().enumerate() {
            if self.repeat[i].tick(timestamp) {
                events.extend(self.nav(tree, direction, timestamp));
            }
        }
        events
    }

    /// The pointer moved: the navigator steps aside.
    pub fn pointer_moved(&mut self, point: Point, timestamp: u64) -> Option<NavigatorEvent<K>> {
        self.stop_nav(point, timestamp)
    }

    /// Wheel input: the navigator steps aside.
    pub fn wheel(&mut self, point: Point, timestamp: u64) -> Option<NavigatorEvent<K>> {
        self.stop_nav(point, timestamp)
    }

    /// React to a keyboard event.
    ///
    /// Directional `aliasTrigger`s and the `ui.navNext`/`ui.navPrev` shortcuts
    /// navigate unless [`Navigator::block_keyboard`] is set. `ui.confirm` and
    /// `ui.cancel` alias down/up become `active`/`cancel` signals.
    pub fn handle_keyboard<T: NavTree<K>>(
        &mut self,
        tree: &mut T,
        event: &KeyboardEvent,
        timestamp: u64,
    ) -> Option<NavigatorEvent<K>> {
        match event.kind {
            KeyEventKind::AliasTrigger if !self.block_keyboard => {
                let direction = alias_direction(&event.key)?;
                self.nav(tree, direction, timestamp)
            }
            KeyEventKind::Shortcut if !self.block_keyboard => match event.key.as_str() {
                NAV_NEXT => self.nav(tree, Navigation::Next, timestamp),
                NAV_PREV => self.nav(tree, Navigation::Prev, timestamp),
                _ => None,
            },
            KeyEventKind::AliasDown => self.alias_signal(&*tree, &event.key, true, timestamp),
            KeyEventKind::AliasUp => self.alias_signal(&*tree, &event.key, false, timestamp),
            _ => None,
        }
    }

    /// React to a gamepad event; `pad` is the controller that produced it.
    ///
    /// The left stick (outside the dead zone, dominant axis) and the D-pad
    /// hold directions; `a` and `b` become `active`/`cancel` signals.
    pub fn handle_gamepad<T: NavTree<K>>(
        &mut self,
        tree: &mut T,
        event: &GamepadEvent,
        pad: &Gamepad,
        timestamp: u64,
    ) -> Vec<NavigatorEvent<K>> {
        match *event {
            GamepadEvent::Stick {
                stick: Stick::Left,
                value,
            } => {
                let held = self.stick_direction(value);
                self.hold(tree, COMPASS.map(|d| held == Some(d)), timestamp)
            }
            GamepadEvent::Arrow => {
                let held = [pad.up(), pad.right(), pad.down(), pad.left()];
                self.hold(tree, held, timestamp)
            }
            GamepadEvent::Button {
                button: GamepadButton::A,
                pressed,
            } => self
                .signal(&*tree, NavigatorEventType::Active, pressed, timestamp)
                .into_iter()
                .collect(),
            GamepadEvent::Button {
                button: GamepadButton::B,
                pressed,
            } => self
                .signal(&*tree, NavigatorEventType::Cancel, pressed, timestamp)
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Drop callbacks, layers, and cursors that refer to dead elements.
    pub fn prune(&mut self, mut alive: impl FnMut(K) -> bool) {
        self.callbacks.retain(|k, _| alive(*k));
        let base = self.base;
        self.layers.retain(|l| l.root == base || alive(l.root));
        for layer in &mut self.layers {
            if layer.current.is_some_and(|c| !alive(c)) {
                layer.current = None;
                layer.lock = None;
            }
            if layer.lock.is_some_and(|l| !alive(l)) {
                layer.lock = None;
            }
        }
    }

    fn top(&self) -> &Layer<K> {
        &self.layers[self.layers.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Layer<K> {
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    fn set_top_current(&mut self, current: Option<K>) {
        let top = self.top_mut();
        top.current = current;
        top.lock = None;
    }

    fn lock_target(&self, tree: &impl NavTree<K>) -> Option<K> {
        let top = self.top();
        top.current.filter(|c| tree.is_attached(*c, top.root))?;
        top.lock.filter(|l| tree.is_attached(*l, top.root))
    }

    fn update(&mut self, tree: &impl NavTree<K>, timestamp: u64) -> Option<NavigatorEvent<K>> {
        let root = self.top().root;
        let mut current = self
            .top()
            .current
            .filter(|c| tree.is_attached(*c, root) && is_navigable(tree, *c));
        if let Some(lock) = self.lock_target(tree) {
            current = Some(lock);
        }
        if let Some(rect) = current.and_then(|c| tree.bounds(c)) {
            self.position = Some(rect.center());
            self.indicator = Indicator {
                rect,
                visible: true,
            };
            return None;
        }
        self.set_top_current(None);
        self.frame_loop.stop();
        self.indicator.visible = false;
        Some(self.emit(NavigatorEvent::Nav {
            current: None,
            timestamp,
        }))
    }

    fn stop_nav(&mut self, point: Point, timestamp: u64) -> Option<NavigatorEvent<K>> {
        let top = *self.top();
        if let (Some(_), Some(lock)) = (top.current, top.lock) {
            self.run_callback(lock, &NavSignal::active(false));
        }
        self.position = Some(point);
        self.indicator = Indicator {
            rect: Rect::from_origin_size(point, Size::ZERO),
            visible: false,
        };
        top.current?;
        self.frame_loop.stop();
        self.set_top_current(None);
        Some(self.emit(NavigatorEvent::Nav {
            current: None,
            timestamp,
        }))
    }

    fn stick_direction(&self, value: Vec2) -> Option<Navigation> {
        let length = value.length();
        if length == 0.0 || length < self.config.stick_dead_zone {
            return None;
        }
        Some(if value.x.abs() > value.y.abs() {
            if value.x > 0.0 {
                Navigation::Right
            } else {
                Navigation::Left
            }
        } else if value.y > 0.0 {
            Navigation::Down
        } else {
            Navigation::Up
        })
    }

    fn hold<T: NavTree<K>>(
        &mut self,
        tree: &mut T,
        held: [bool; 4],
        timestamp: u64,
    ) -> Vec<NavigatorEvent<K>> {
        let mut events = Vec::new();
        for (i, direction) in COMPASS.into_iter().enumerate() {
            if !held[i] {
                self.repeat[i].stop();
            } else if self.repeat[i].start(timestamp) {
                events.extend(self.nav(tree, direction, timestamp));
            }
        }
        events
    }

    fn alias_signal(
        &mut self,
        tree: &impl NavTree<K>,
        alias: &str,
        pressed: bool,
        timestamp: u64,
    ) -> Option<NavigatorEvent<K>> {
        let kind = match alias {
            CONFIRM => NavigatorEventType::Active,
            CANCEL => NavigatorEventType::Cancel,
            _ => return None,
        };
        self.signal(tree, kind, pressed, timestamp)
    }

    /// Confirm and cancel go to whichever element receives directions.
    fn signal(
        &mut self,
        tree: &impl NavTree<K>,
        kind: NavigatorEventType,
        pressed: bool,
        timestamp: u64,
    ) -> Option<NavigatorEvent<K>> {
        let target = self.top().current?;
        let (signal, event) = if kind == NavigatorEventType::Cancel {
            let event = NavigatorEvent::Cancel {
                target,
                cancel: pressed,
                timestamp,
            };
            (NavSignal::cancel(pressed), event)
        } else {
            let event = NavigatorEvent::Active {
                target,
                active: pressed,
                timestamp,
            };
            (NavSignal::active(pressed), event)
        };
        let receiver = self.lock_target(tree).unwrap_or(target);
        self.run_callback(receiver, &signal);
        if self.locking() {
            return None;
        }
        Some(self.emit(event))
    }

    fn run_callback(&mut self, target: K, signal: &NavSignal) {
        if let Some(callback) = self.callbacks.get_mut(&target) {
            callback(signal);
        }
    }

    fn emit(&mut self, event: NavigatorEvent<K>) -> NavigatorEvent<K> {
        self.subs.emit(event.kind(), &event);
        event
    }
}

fn alias_direction(alias: &str) -> Option<Navigation> {
    match alias {
        UP => Some(Navigation::Up),
        RIGHT => Some(Navigation::Right),
        DOWN => Some(Navigation::Down),
        LEFT => Some(Navigation::Left),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use core::cell::RefCell;

    use understory_gamepad::{
        GamepadRegistry, GamepadSource, HapticEffect, RawButton, RawGamepad,
    };

    use super::*;
    use crate::tree::testing::TestTree;

    fn r(x: f64, y: f64) -> Rect {
        Rect::new(x, y, x + 10.0, y + 10.0)
    }

    /// Root 0 with leaves 1, 2, 3 in a row.
    fn row() -> TestTree {
        let mut tree = TestTree::root(0, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.leaf(0, 1, r(0.0, 0.0))
            .leaf(0, 2, r(20.0, 0.0))
            .leaf(0, 3, r(40.0, 0.0));
        tree
    }

    fn key(kind: KeyEventKind, id: &str) -> KeyboardEvent {
        KeyboardEvent {
            kind,
            key: id.to_string(),
            timestamp: 0,
        }
    }

    fn recorder(nav: &mut Navigator<u32>, target: u32) -> Rc<RefCell<Vec<NavSignal>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        nav.set_callback(target, Box::new(move |s| log.borrow_mut().push(*s)));
        seen
    }

    #[test]
    fn tab_walks_siblings_in_order() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        let next = key(KeyEventKind::Shortcut, NAV_NEXT);

        let event = nav.handle_keyboard(&mut tree, &next, 1);
        assert_eq!(
            event,
            Some(NavigatorEvent::Nav {
                current: Some(1),
                timestamp: 1
            })
        );
        nav.handle_keyboard(&mut tree, &next, 2);
        assert_eq!(nav.current(), Some(2));
        assert_eq!(tree.scrolled, [1, 2]);

        let prev = key(KeyEventKind::Shortcut, NAV_PREV);
        nav.handle_keyboard(&mut tree, &prev, 3);
        assert_eq!(nav.current(), Some(1));
    }

    #[test]
    fn right_never_moves_left_and_does_not_wrap() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        assert!(nav.set_current(&tree, 2));
        nav.nav(&mut tree, Navigation::Right, 0);
        assert_eq!(nav.current(), Some(3));
        assert!(nav.nav(&mut tree, Navigation::Right, 1).is_none());
        assert_eq!(nav.current(), Some(3));
        nav.nav(&mut tree, Navigation::Left, 2);
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn first_press_searches_from_the_pointer() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        assert!(nav.pointer_moved(Point::new(33.0, 50.0), 0).is_none(), "nothing focused");
        nav.nav(&mut tree, Navigation::Up, 1);
        // Leaf 3 spans 40..50, leaf 2 spans 20..30; 2 is closer to x = 33.
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn lock_redirects_directions() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        let seen = recorder(&mut nav, 1);
        nav.set_current(&tree, 1);
        nav.lock(Some(1));
        assert!(nav.locking());

        assert!(nav.nav(&mut tree, Navigation::Right, 0).is_none());
        assert_eq!(nav.current(), Some(1));
        assert_eq!(seen.borrow()[0].direction, Some(Navigation::Right));

        // Confirm reaches the callback but is not broadcast while locked.
        let down = key(KeyEventKind::AliasDown, CONFIRM);
        assert!(nav.handle_keyboard(&mut tree, &down, 1).is_none());
        assert_eq!(seen.borrow()[1].active, Some(true));

        nav.lock(None);
        nav.nav(&mut tree, Navigation::Right, 2);
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn lock_on_another_element_receives_every_signal() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        let focused = recorder(&mut nav, 1);
        let locked = recorder(&mut nav, 2);
        nav.set_current(&tree, 1);
        nav.lock(Some(2));

        assert!(nav.nav(&mut tree, Navigation::Right, 0).is_none());
        let down = key(KeyEventKind::AliasDown, CONFIRM);
        assert!(nav.handle_keyboard(&mut tree, &down, 1).is_none());
        let cancel = key(KeyEventKind::AliasDown, CANCEL);
        assert!(nav.handle_keyboard(&mut tree, &cancel, 2).is_none());

        assert!(focused.borrow().is_empty());
        assert_eq!(
            *locked.borrow(),
            [
                NavSignal::direction(Navigation::Right),
                NavSignal::active(true),
                NavSignal::cancel(true),
            ]
        );
        assert_eq!(nav.current(), Some(1));
    }

    #[test]
    fn lock_outside_the_layer_is_ignored() {
        let mut tree = row();
        // Alive, but not under the navigation root.
        tree.leaf(99, 7, r(60.0, 0.0));
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        let locked = recorder(&mut nav, 7);
        nav.set_current(&tree, 1);
        nav.lock(Some(7));

        let event = nav.nav(&mut tree, Navigation::Right, 0);
        assert_eq!(event.map(|e| e.kind()), Some(NavigatorEventType::Nav));
        assert_eq!(nav.current(), Some(2));
        assert!(locked.borrow().is_empty());
    }

    #[test]
    fn confirm_and_cancel_are_broadcast() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        let down = key(KeyEventKind::AliasDown, CONFIRM);
        assert!(nav.handle_keyboard(&mut tree, &down, 0).is_none(), "nothing focused");

        nav.set_current(&tree, 3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        nav.on(
            NavigatorEventType::Active,
            Box::new(move |e| log.borrow_mut().push(*e)),
        );
        nav.handle_keyboard(&mut tree, &down, 1);
        let up = key(KeyEventKind::AliasUp, CONFIRM);
        nav.handle_keyboard(&mut tree, &up, 2);
        let cancel = key(KeyEventKind::AliasDown, CANCEL);
        let event = nav.handle_keyboard(&mut tree, &cancel, 3);

        assert_eq!(
            *seen.borrow(),
            [
                NavigatorEvent::Active {
                    target: 3,
                    active: true,
                    timestamp: 1
                },
                NavigatorEvent::Active {
                    target: 3,
                    active: false,
                    timestamp: 2
                },
            ]
        );
        assert_eq!(event.map(|e| e.kind()), Some(NavigatorEventType::Cancel));
    }

    #[test]
    fn blocked_keyboard_still_confirms() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.block_keyboard = true;
        let right = key(KeyEventKind::AliasTrigger, RIGHT);
        assert!(nav.handle_keyboard(&mut tree, &right, 0).is_none());
        assert_eq!(nav.current(), None);

        nav.set_current(&tree, 1);
        let down = key(KeyEventKind::AliasDown, CONFIRM);
        assert!(nav.handle_keyboard(&mut tree, &down, 1).is_some());
    }

    #[test]
    fn layers_scope_search_and_restore_focus() {
        let mut tree = row();
        tree.group(0, 10, Rect::new(0.0, 50.0, 100.0, 100.0))
            .leaf(10, 11, r(0.0, 60.0))
            .leaf(10, 12, r(20.0, 60.0));
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.set_current(&tree, 2);

        assert!(nav.add_layer(&tree, 10, Some(12)));
        assert!(nav.add_layer(&tree, 10, None), "promotion keeps the old cursor");
        assert_eq!(nav.layers().len(), 2);
        assert_eq!(nav.current(), Some(12));
        assert!(!nav.set_current(&tree, 1), "outside the top layer");

        nav.nav(&mut tree, Navigation::Up, 0);
        assert_eq!(nav.current(), Some(12), "search stays inside the layer");
        nav.nav(&mut tree, Navigation::Left, 1);
        assert_eq!(nav.current(), Some(11));

        assert!(!nav.rm_layer(0), "base layer");
        assert!(nav.rm_layer(10));
        assert!(!nav.rm_layer(10));
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn pointer_clears_and_tick_tracks_the_cursor() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.nav(&mut tree, Navigation::Next, 0);
        assert!(nav.tick(&mut tree, 16).is_empty());
        assert!(nav.indicator().visible);
        assert_eq!(nav.indicator().rect, r(0.0, 0.0));

        tree.remove(1);
        let events = nav.tick(&mut tree, 32);
        assert_eq!(
            events,
            [NavigatorEvent::Nav {
                current: None,
                timestamp: 32
            }]
        );
        assert!(!nav.indicator().visible);

        nav.nav(&mut tree, Navigation::Next, 40);
        let cleared = nav.wheel(Point::new(70.0, 70.0), 48);
        assert_eq!(cleared.map(|e| e.kind()), Some(NavigatorEventType::Nav));
        assert_eq!(nav.current(), None);
        assert_eq!(nav.position(), Some(Point::new(70.0, 70.0)));
    }

    #[test]
    fn tick_drops_a_cursor_that_collapsed() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.nav(&mut tree, Navigation::Next, 0);
        assert!(nav.tick(&mut tree, 16).is_empty());

        tree.set_bounds(1, Rect::ZERO);
        let events = nav.tick(&mut tree, 32);
        assert_eq!(
            events,
            [NavigatorEvent::Nav {
                current: None,
                timestamp: 32
            }]
        );
        assert_eq!(nav.current(), None);
        assert!(!nav.indicator().visible);
    }

    struct OnePad(RawGamepad);

    impl GamepadSource for OnePad {
        fn snapshot(&self, index: usize) -> Option<RawGamepad> {
            (index == 0).then(|| self.0.clone())
        }

        fn play_effect(&mut self, _: usize, _: &HapticEffect) {}

        fn reset_haptics(&mut self, _: usize) {}
    }

    #[test]
    fn held_dpad_repeats_after_the_delay() {
        let mut tree = TestTree::root(0, Rect::new(0.0, 0.0, 200.0, 20.0));
        for i in 1..=8 {
            tree.leaf(0, i, r(f64::from(i) * 20.0, 0.0));
        }
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.set_current(&tree, 1);

        let mut source = OnePad(RawGamepad::default());
        let mut pads = GamepadRegistry::default();
        let Ok(pad) = pads.get(0, &source) else {
            panic!("slot 0 exists");
        };
        source.0.buttons.resize(17, RawButton::default());
        source.0.buttons[GamepadButton::Right as usize] = RawButton::pressed(true);
        let events = pad.poll(&mut source, 0);
        assert!(events.contains(&GamepadEvent::Arrow));

        nav.handle_gamepad(&mut tree, &GamepadEvent::Arrow, pad, 0);
        assert_eq!(nav.current(), Some(2), "fires on press");
        nav.tick(&mut tree, 400);
        assert_eq!(nav.current(), Some(2));
        nav.tick(&mut tree, 500);
        assert_eq!(nav.current(), Some(3));
        nav.tick(&mut tree, 700);
        assert_eq!(nav.current(), Some(4), "a late frame moves one step only");
        nav.tick(&mut tree, 750);
        assert_eq!(nav.current(), Some(4));
        nav.tick(&mut tree, 800);
        assert_eq!(nav.current(), Some(5));

        source.0.buttons[GamepadButton::Right as usize] = RawButton::pressed(false);
        pad.poll(&mut source, 810);
        nav.handle_gamepad(&mut tree, &GamepadEvent::Arrow, pad, 810);
        nav.tick(&mut tree, 2_000);
        assert_eq!(nav.current(), Some(5), "released");
    }

    #[test]
    fn stick_uses_dead_zone_and_dominant_axis() {
        let mut tree = row();
        tree.leaf(0, 4, r(20.0, 30.0));
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.set_current(&tree, 2);
        let source = OnePad(RawGamepad::default());
        let mut pads = GamepadRegistry::default();
        let Ok(pad) = pads.get(0, &source) else {
            panic!("slot 0 exists");
        };
        let stick = |x, y| GamepadEvent::Stick {
            stick: Stick::Left,
            value: Vec2::new(x, y),
        };

        nav.handle_gamepad(&mut tree, &stick(0.2, 0.1), pad, 0);
        assert_eq!(nav.current(), Some(2), "inside the dead zone");
        nav.handle_gamepad(&mut tree, &stick(0.3, 0.6), pad, 1);
        assert_eq!(nav.current(), Some(4), "y dominates and points down");
        nav.handle_gamepad(&mut tree, &stick(0.0, 0.0), pad, 2);
        nav.handle_gamepad(&mut tree, &stick(-0.9, -0.5), pad, 3);
        assert_eq!(nav.current(), Some(1));
    }

    #[test]
    fn gamepad_a_toggles_active() {
        let mut tree = row();
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.set_current(&tree, 1);
        let source = OnePad(RawGamepad::default());
        let mut pads = GamepadRegistry::default();
        let Ok(pad) = pads.get(0, &source) else {
            panic!("slot 0 exists");
        };
        let press = |pressed| GamepadEvent::Button {
            button: GamepadButton::A,
            pressed,
        };
        let on = nav.handle_gamepad(&mut tree, &press(true), pad, 0);
        let off = nav.handle_gamepad(&mut tree, &press(false), pad, 1);
        assert!(matches!(on[..], [NavigatorEvent::Active { active: true, .. }]));
        assert!(matches!(off[..], [NavigatorEvent::Active { active: false, .. }]));
    }

    #[test]
    fn prune_forgets_dead_layers() {
        let mut tree = row();
        tree.group(0, 10, Rect::new(0.0, 50.0, 100.0, 100.0))
            .leaf(10, 11, r(0.0, 60.0));
        let mut nav = Navigator::new(0, NavigatorConfig::default());
        nav.add_layer(&tree, 10, Some(11));
        tree.remove(10);
        nav.prune(|k| tree.is_alive(k));
        assert_eq!(nav.layers().len(), 1);
    }
}
