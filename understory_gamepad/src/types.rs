// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buttons, sticks, events, and configuration.

use core::fmt;

use kurbo::Vec2;

/// Number of gamepad slots.
pub const MAX_GAMEPADS: usize = 4;

/// A button or trigger, in standard-mapping order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    /// Bottom face button.
    A,
    /// Right face button.
    B,
    /// Left face button.
    X,
    /// Top face button.
    Y,
    /// Left bumper.
    Lb,
    /// Right bumper.
    Rb,
    /// Left trigger (analog).
    Lt,
    /// Right trigger (analog).
    Rt,
    /// Back / select.
    Back,
    /// Start / menu.
    Start,
    /// Left stick press.
    Lsb,
    /// Right stick press.
    Rsb,
    /// D-pad up.
    Up,
    /// D-pad down.
    Down,
    /// D-pad left.
    Left,
    /// D-pad right.
    Right,
    /// Home / guide.
    Home,
}

impl GamepadButton {
    /// Every button, indexed like the host's button array.
    pub const ALL: [Self; 17] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::Lb,
        Self::Rb,
        Self::Lt,
        Self::Rt,
        Self::Back,
        Self::Start,
        Self::Lsb,
        Self::Rsb,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Home,
    ];

    /// Event name of this field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::X => "x",
            Self::Y => "y",
            Self::Lb => "lb",
            Self::Rb => "rb",
            Self::Lt => "lt",
            Self::Rt => "rt",
            Self::Back => "back",
            Self::Start => "start",
            Self::Lsb => "lsb",
            Self::Rsb => "rsb",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
        }
    }

    /// Triggers report an analog value instead of a pressed flag.
    pub const fn is_analog(self) -> bool {
        matches!(self, Self::Lt | Self::Rt)
    }

    /// One of the four D-pad directions.
    pub const fn is_dpad(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// An analog stick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stick {
    /// Left stick, axes 0 and 1.
    Left,
    /// Right stick, axes 2 and 3.
    Right,
}

impl Stick {
    /// Event name of this field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "ls",
            Self::Right => "rs",
        }
    }
}

/// A field that changed since the previous frame, or a connectivity change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GamepadEvent {
    /// A digital button changed.
    Button {
        /// Which button.
        button: GamepadButton,
        /// New pressed state.
        pressed: bool,
    },
    /// A trigger's analog value changed.
    Trigger {
        /// [`GamepadButton::Lt`] or [`GamepadButton::Rt`].
        button: GamepadButton,
        /// New value in `0.0..=1.0`.
        value: f64,
    },
    /// A stick moved. `y` grows downwards.
    Stick {
        /// Which stick.
        stick: Stick,
        /// New position, at most unit length.
        value: Vec2,
    },
    /// At least one D-pad direction changed this frame.
    Arrow,
    /// The pad was connected (`true`) or disconnected.
    Connectivity(bool),
}

impl GamepadEvent {
    /// Event name: the field name, `"arrow"`, or `"connectivity"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Button { button, .. } | Self::Trigger { button, .. } => button.name(),
            Self::Stick { stick, .. } => stick.name(),
            Self::Arrow => "arrow",
            Self::Connectivity(_) => "connectivity",
        }
    }
}

/// Haptic effect family.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HapticKind {
    /// Two eccentric rotating mass motors.
    #[default]
    DualRumble,
    /// Motors in the triggers.
    TriggerRumble,
}

/// Parameters of a persistent rumble started with [`Gamepad::rumble`](crate::Gamepad::rumble).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RumbleOptions {
    /// Effect family.
    pub kind: HapticKind,
    /// Left trigger motor intensity.
    pub left_trigger: Option<f64>,
    /// Right trigger motor intensity.
    pub right_trigger: Option<f64>,
    /// Low-frequency motor intensity.
    pub strong_magnitude: Option<f64>,
    /// High-frequency motor intensity.
    pub weak_magnitude: Option<f64>,
}

impl RumbleOptions {
    /// One playback of these options lasting `duration` milliseconds.
    pub fn effect(&self, duration: u64) -> HapticEffect {
        HapticEffect {
            kind: self.kind,
            start_delay: 0,
            duration,
            left_trigger: self.left_trigger,
            right_trigger: self.right_trigger,
            strong_magnitude: self.strong_magnitude,
            weak_magnitude: self.weak_magnitude,
        }
    }
}

/// A single haptic playback request handed to the host.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HapticEffect {
    /// Effect family.
    pub kind: HapticKind,
    /// Delay before playback, in milliseconds.
    pub start_delay: u64,
    /// Playback length, in milliseconds.
    pub duration: u64,
    /// Left trigger motor intensity.
    pub left_trigger: Option<f64>,
    /// Right trigger motor intensity.
    pub right_trigger: Option<f64>,
    /// Low-frequency motor intensity.
    pub strong_magnitude: Option<f64>,
    /// High-frequency motor intensity.
    pub weak_magnitude: Option<f64>,
}

/// Poller tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    /// Stick positions shorter than this read as centered.
    pub stick_dead_zone: f64,
    /// Trigger values below this read as released.
    pub trigger_dead_zone: f64,
    /// Replay period of a persistent rumble, in milliseconds.
    pub rumble_interval: u64,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            stick_dead_zone: 0.0,
            trigger_dead_zone: 0.0,
            rumble_interval: 200,
        }
    }
}

/// A gamepad slot outside `0..MAX_GAMEPADS` was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamepadError {
    /// The offending index.
    InvalidSlot(usize),
}

impl fmt::Display for GamepadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlot(index) => write!(
                f,
                "gamepad index {index} is out of range (expected 0..{MAX_GAMEPADS})"
            ),
        }
    }
}

impl core::error::Error for GamepadError {}
