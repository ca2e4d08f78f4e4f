// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: raw controller snapshots and haptics.

use smallvec::SmallVec;

use crate::types::HapticEffect;

/// One button as the host reports it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RawButton {
    /// Digital state.
    pub pressed: bool,
    /// Analog value in `0.0..=1.0`.
    pub value: f64,
}

impl RawButton {
    /// A digital button.
    pub const fn pressed(pressed: bool) -> Self {
        Self {
            pressed,
            value: if pressed { 1.0 } else { 0.0 },
        }
    }

    /// An analog button.
    pub const fn analog(value: f64) -> Self {
        Self {
            pressed: value > 0.0,
            value,
        }
    }
}

/// A controller snapshot in standard mapping.
///
/// Buttons follow [`GamepadButton::ALL`](crate::GamepadButton::ALL) order and
/// axes are `[lx, ly, rx, ry]`. Missing entries read as released or centered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGamepad {
    /// Button states.
    pub buttons: SmallVec<[RawButton; 17]>,
    /// Axis values in `-1.0..=1.0`.
    pub axes: SmallVec<[f64; 4]>,
}

impl RawGamepad {
    pub(crate) fn button(&self, index: usize) -> RawButton {
        self.buttons.get(index).copied().unwrap_or_default()
    }

    pub(crate) fn axis(&self, index: usize) -> f64 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }
}

/// Where controller state comes from and haptics go.
pub trait GamepadSource {
    /// Current state of slot `index`, or `None` if nothing is plugged in there.
    fn snapshot(&self, index: usize) -> Option<RawGamepad>;

    /// Play one haptic effect on slot `index`.
    fn play_effect(&mut self, index: usize, effect: &HapticEffect);

    /// Stop any haptic effect playing on slot `index`.
    fn reset_haptics(&mut self, index: usize);
}

#[cfg(test)]
pub(crate) mod testing {
    use alloc::vec::Vec;

    use super::*;

    /// Four slots of scripted state plus a log of haptic calls.
    #[derive(Debug, Default)]
    pub(crate) struct FakePads {
        pub(crate) pads: [Option<RawGamepad>; 4],
        pub(crate) played: Vec<(usize, HapticEffect)>,
        pub(crate) resets: Vec<usize>,
    }

    impl FakePads {
        pub(crate) fn plug(&mut self, index: usize) {
            self.pads[index] = Some(RawGamepad::default());
        }

        pub(crate) fn set_button(&mut self, index: usize, button: usize, state: RawButton) {
            if let Some(pad) = self.pads[index].as_mut() {
                if pad.buttons.len() <= button {
                    pad.buttons.resize(button + 1, RawButton::default());
                }
                pad.buttons[button] = state;
            }
        }

        pub(crate) fn set_axes(&mut self, index: usize, axes: [f64; 4]) {
            if let Some(pad) = self.pads[index].as_mut() {
                pad.axes = SmallVec::from_slice(&axes);
            }
        }
    }

    impl GamepadSource for FakePads {
        fn snapshot(&self, index: usize) -> Option<RawGamepad> {
            self.pads.get(index).cloned().flatten()
        }

        fn play_effect(&mut self, index: usize, effect: &HapticEffect) {
            self.played.push((index, *effect));
        }

        fn reset_haptics(&mut self, index: usize) {
            self.resets.push(index);
        }
    }
}
