// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-slot poller and the slot registry.

use alloc::vec::Vec;

use kurbo::Vec2;
use understory_event_state::scheduler::FrameLoop;
use understory_event_state::subscriptions::{Handler, SubscriptionId, Subscriptions};

use crate::source::{GamepadSource, RawGamepad};
use crate::types::{
    GamepadButton, GamepadConfig, GamepadError, GamepadEvent, HapticEffect, MAX_GAMEPADS,
    RumbleOptions, Stick,
};

/// Normalized state of one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Frame {
    buttons: [bool; 17],
    lt: f64,
    rt: f64,
    ls: Vec2,
    rs: Vec2,
}

impl Frame {
    fn read(raw: &RawGamepad, config: &GamepadConfig) -> Self {
        let mut buttons = [false; 17];
        for button in GamepadButton::ALL {
            if !button.is_analog() {
                buttons[button.index()] = raw.button(button.index()).pressed;
            }
        }
        Self {
            buttons,
            lt: trigger(raw.button(GamepadButton::Lt.index()).value, config.trigger_dead_zone),
            rt: trigger(raw.button(GamepadButton::Rt.index()).value, config.trigger_dead_zone),
            ls: stick(Vec2::new(raw.axis(0), raw.axis(1)), config.stick_dead_zone),
            rs: stick(Vec2::new(raw.axis(2), raw.axis(3)), config.stick_dead_zone),
        }
    }

    fn trigger(&self, button: GamepadButton) -> f64 {
        if button == GamepadButton::Lt {
            self.lt
        } else {
            self.rt
        }
    }

    fn stick(&self, stick: Stick) -> Vec2 {
        match stick {
            Stick::Left => self.ls,
            Stick::Right => self.rs,
        }
    }
}

fn trigger(value: f64, dead_zone: f64) -> f64 {
    if value < dead_zone { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn stick(value: Vec2, dead_zone: f64) -> Vec2 {
    let length = value.length();
    if length == 0.0 || length < dead_zone {
        Vec2::ZERO
    } else if length > 1.0 {
        value / length
    } else {
        value
    }
}

/// State and events of one controller slot.
///
/// While connected, each [`Gamepad::poll`] reads a snapshot from the
/// [`GamepadSource`], compares every field with the previous frame, and emits
/// one event per changed field. Handlers are keyed by event name (`"a"`,
/// `"lt"`, `"ls"`, `"arrow"`, `"connectivity"`, ...).
#[derive(Debug)]
pub struct Gamepad {
    index: usize,
    config: GamepadConfig,
    frame_loop: FrameLoop,
    state: Frame,
    rumble: Option<RumbleOptions>,
    last_rumble: Option<u64>,
    subs: Subscriptions<&'static str, GamepadEvent>,
}

impl Gamepad {
    pub(crate) fn new(index: usize, config: GamepadConfig) -> Self {
        Self {
            index,
            config,
            frame_loop: FrameLoop::new(),
            state: Frame::default(),
            rumble: None,
            last_rumble: None,
            subs: Subscriptions::new(),
        }
    }

    /// Slot index, `0..MAX_GAMEPADS`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Poller tuning.
    pub fn config(&self) -> &GamepadConfig {
        &self.config
    }

    /// Subscribe to events named `name`.
    pub fn on(&mut self, name: &'static str, handler: Handler<GamepadEvent>) -> SubscriptionId {
        self.subs.on(name, handler)
    }

    /// Remove a handler.
    pub fn off(&mut self, name: &'static str, id: SubscriptionId) -> bool {
        self.subs.off(name, id)
    }

    /// Start polling if the source already reports a controller in this slot.
    pub fn attach(&mut self, source: &impl GamepadSource) -> Option<GamepadEvent> {
        if source.snapshot(self.index).is_some() {
            self.connected(self.index)
        } else {
            None
        }
    }

    /// A controller was connected in slot `index`.
    ///
    /// Ignored for other slots and when already connected.
    pub fn connected(&mut self, index: usize) -> Option<GamepadEvent> {
        if index != self.index || !self.frame_loop.start() {
            return None;
        }
        log::debug!("gamepad {index}: connected");
        Some(self.dispatch(GamepadEvent::Connectivity(true)))
    }

    /// The controller in slot `index` was disconnected.
    ///
    /// Polling stops and any persistent rumble is dropped.
    pub fn disconnected(&mut self, index: usize) -> Option<GamepadEvent> {
        if index != self.index || !self.frame_loop.stop() {
            return None;
        }
        log::debug!("gamepad {index}: disconnected");
        self.rumble = None;
        self.last_rumble = None;
        Some(self.dispatch(GamepadEvent::Connectivity(false)))
    }

    /// Whether the slot is connected and polling.
    pub fn is_connected(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Read one frame and emit an event for every field that changed.
    ///
    /// Buttons come first in [`GamepadButton::ALL`] order, then `arrow` if any
    /// D-pad direction changed, then the sticks. A persistent rumble is
    /// replayed here once every `rumble_interval` milliseconds.
    pub fn poll(&mut self, source: &mut impl GamepadSource, timestamp: u64) -> Vec<GamepadEvent> {
        if !self.frame_loop.is_running() {
            return Vec::new();
        }
        let Some(raw) = source.snapshot(self.index) else {
            return Vec::new();
        };
        let next = Frame::read(&raw, &self.config);
        let prev = core::mem::replace(&mut self.state, next);

        let mut events = Vec::new();
        let mut arrow = false;
        for button in GamepadButton::ALL {
            if button.is_analog() {
                let value = next.trigger(button);
                if value != prev.trigger(button) {
                    events.push(GamepadEvent::Trigger { button, value });
                }
            } else {
                let pressed = next.buttons[button.index()];
                if pressed != prev.buttons[button.index()] {
                    events.push(GamepadEvent::Button { button, pressed });
                    arrow |= button.is_dpad();
                }
            }
        }
        if arrow {
            events.push(GamepadEvent::Arrow);
        }
        for stick in [Stick::Left, Stick::Right] {
            let value = next.stick(stick);
            if value != prev.stick(stick) {
                events.push(GamepadEvent::Stick { stick, value });
            }
        }

        for event in &events {
            self.subs.emit(event.name(), event);
        }
        self.replay_rumble(source, timestamp);
        events
    }

    /// Start a persistent rumble, replayed by [`Gamepad::poll`] until stopped.
    pub fn rumble(&mut self, options: RumbleOptions) {
        self.rumble = Some(options);
        self.last_rumble = None;
    }

    /// Stop the persistent rumble and reset the actuator.
    pub fn stop_rumble(&mut self, source: &mut impl GamepadSource) {
        self.rumble = None;
        self.last_rumble = None;
        source.reset_haptics(self.index);
    }

    /// Play a single effect without touching the persistent rumble.
    pub fn rumble_once(&self, source: &mut impl GamepadSource, effect: &HapticEffect) {
        source.play_effect(self.index, effect);
    }

    /// Whether a persistent rumble is active.
    pub fn is_vibrating(&self) -> bool {
        self.rumble.is_some()
    }

    /// Pressed state of a digital button; triggers read as pressed above zero.
    pub fn pressed(&self, button: GamepadButton) -> bool {
        if button.is_analog() {
            self.state.trigger(button) > 0.0
        } else {
            self.state.buttons[button.index()]
        }
    }

    /// Face button A.
    pub fn a(&self) -> bool {
        self.pressed(GamepadButton::A)
    }

    /// Face button B.
    pub fn b(&self) -> bool {
        self.pressed(GamepadButton::B)
    }

    /// Face button X.
    pub fn x(&self) -> bool {
        self.pressed(GamepadButton::X)
    }

    /// Face button Y.
    pub fn y(&self) -> bool {
        self.pressed(GamepadButton::Y)
    }

    /// Left bumper.
    pub fn lb(&self) -> bool {
        self.pressed(GamepadButton::Lb)
    }

    /// Right bumper.
    pub fn rb(&self) -> bool {
        self.pressed(GamepadButton::Rb)
    }

    /// Left trigger value.
    pub fn lt(&self) -> f64 {
        self.state.lt
    }

    /// Right trigger value.
    pub fn rt(&self) -> f64 {
        self.state.rt
    }

    /// Back button.
    pub fn back(&self) -> bool {
        self.pressed(GamepadButton::Back)
    }

    /// Start button.
    pub fn start(&self) -> bool {
        self.pressed(GamepadButton::Start)
    }

    /// Left stick press.
    pub fn lsb(&self) -> bool {
        self.pressed(GamepadButton::Lsb)
    }

    /// Right stick press.
    pub fn rsb(&self) -> bool {
        self.pressed(GamepadButton::Rsb)
    }

    /// D-pad up.
    pub fn up(&self) -> bool {
        self.pressed(GamepadButton::Up)
    }

    /// D-pad down.
    pub fn down(&self) -> bool {
        self.pressed(GamepadButton::Down)
    }

    /// D-pad left.
    pub fn left(&self) -> bool {
        self.pressed(GamepadButton::Left)
    }

    /// D-pad right.
    pub fn right(&self) -> bool {
        self.pressed(GamepadButton::Right)
    }

    /// Home button.
    pub fn home(&self) -> bool {
        self.pressed(GamepadButton::Home)
    }

    /// Left stick position.
    pub fn ls(&self) -> Vec2 {
        self.state.ls
    }

    /// Right stick position.
    pub fn rs(&self) -> Vec2 {
        self.state.rs
    }

    fn replay_rumble(&mut self, source: &mut impl GamepadSource, now: u64) {
        let Some(options) = self.rumble else {
            return;
        };
        let interval = self.config.rumble_interval;
        if self
            .last_rumble
            .is_some_and(|last| now.saturating_sub(last) < interval)
        {
            return;
        }
        source.play_effect(self.index, &options.effect(interval));
        self.last_rumble = Some(now);
    }

    fn dispatch(&mut self, event: GamepadEvent) -> GamepadEvent {
        self.subs.emit(event.name(), &event);
        event
    }
}

/// Lazily created [`Gamepad`]s, one per slot.
#[derive(Debug)]
pub struct GamepadRegistry {
    config: GamepadConfig,
    slots: [Option<Gamepad>; MAX_GAMEPADS],
}

impl Default for GamepadRegistry {
    fn default() -> Self {
        Self::new(GamepadConfig::default())
    }
}

impl GamepadRegistry {
    /// An empty registry whose pads use `config`.
    pub fn new(config: GamepadConfig) -> Self {
        Self {
            config,
            slots: core::array::from_fn(|_| None),
        }
    }

    /// The pad for slot `index`, created on first use.
    ///
    /// A freshly created pad starts polling right away if `source` already
    /// reports a controller in its slot.
    pub fn get(
        &mut self,
        index: usize,
        source: &impl GamepadSource,
    ) -> Result<&mut Gamepad, GamepadError> {
        let config = self.config;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(GamepadError::InvalidSlot(index))?;
        Ok(slot.get_or_insert_with(|| {
            let mut pad = Gamepad::new(index, config);
            pad.attach(source);
            pad
        }))
    }

    /// The pad for slot `index`, if one was created.
    pub fn slot(&self, index: usize) -> Option<&Gamepad> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable access to an existing pad.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Gamepad> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Route a host connect notification.
    pub fn connected(&mut self, index: usize) -> Option<GamepadEvent> {
        self.slot_mut(index)?.connected(index)
    }

    /// Route a host disconnect notification.
    pub fn disconnected(&mut self, index: usize) -> Option<GamepadEvent> {
        self.slot_mut(index)?.disconnected(index)
    }

    /// Poll every created pad; events are tagged with their slot.
    pub fn poll(
        &mut self,
        source: &mut impl GamepadSource,
        timestamp: u64,
    ) -> Vec<(usize, GamepadEvent)> {
        let mut events = Vec::new();
        for pad in self.slots.iter_mut().flatten() {
            let index = pad.index;
            events.extend(pad.poll(source, timestamp).into_iter().map(|e| (index, e)));
        }
        events
    }
}
