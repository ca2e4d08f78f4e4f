// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative scheduling primitives driven by the host's frame tick.
//!
//! Nothing here owns a clock. The host calls `tick` (or its equivalent) at its
//! display refresh cadence, or from a fixed ~60 Hz timer, with a millisecond
//! timestamp. Starting and stopping are idempotent everywhere.

/// Run flag for a per-frame loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameLoop {
    running: bool,
}

impl FrameLoop {
    /// A stopped loop.
    pub const fn new() -> Self {
        Self { running: false }
    }

    /// Start the loop. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        !core::mem::replace(&mut self.running, true)
    }

    /// Stop the loop. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        core::mem::replace(&mut self.running, false)
    }

    /// Whether the loop is running.
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

/// Press-and-hold auto-repeat: fire once on start, then after `delay`, then every `interval`.
///
/// ```
/// use understory_event_state::scheduler::RepeatingTrigger;
///
/// let mut t = RepeatingTrigger::new(500, 100);
/// assert!(t.start(1_000)); // caller fires once now
/// assert!(!t.tick(1_400));
/// assert!(t.tick(1_500));
/// // A late tick still fires once; the missed repeats are dropped.
/// assert!(t.tick(1_720));
/// assert!(!t.tick(1_790));
/// assert!(t.tick(1_800));
/// assert!(t.stop());
/// assert!(!t.tick(5_000));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RepeatingTrigger {
    /// Time between the initial fire and the first repeat, in milliseconds.
    pub delay: u64,
    /// Time between repeats, in milliseconds.
    pub interval: u64,
    next_due: Option<u64>,
}

impl RepeatingTrigger {
    /// A stopped trigger.
    pub const fn new(delay: u64, interval: u64) -> Self {
        Self {
            delay,
            interval,
            next_due: None,
        }
    }

    /// Start repeating. Returns `false` (and does nothing) if already running.
    ///
    /// When this returns `true` the caller performs the initial fire itself.
    pub fn start(&mut self, now: u64) -> bool {
        if self.next_due.is_some() {
            return false;
        }
        self.next_due = Some(now.saturating_add(self.delay));
        true
    }

    /// Stop repeating. Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// Whether the trigger is running.
    pub const fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether a repeat is due at `now`.
    ///
    /// At most one repeat fires per tick. After a stall the schedule skips
    /// ahead to the first slot past `now`.
    pub fn tick(&mut self, now: u64) -> bool {
        let Some(due) = self.next_due.filter(|due| *due <= now) else {
            return false;
        };
        let step = self.interval.max(1);
        let missed = (now - due) / step;
        self.next_due = Some(due.saturating_add(step.saturating_mul(missed + 1)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_loop_is_idempotent() {
        let mut l = FrameLoop::new();
        assert!(!l.stop());
        assert!(l.start());
        assert!(!l.start());
        assert!(l.is_running());
        assert!(l.stop());
        assert!(!l.stop());
    }

    #[test]
    fn trigger_restart_is_ignored_while_running() {
        let mut t = RepeatingTrigger::new(500, 100);
        assert!(t.start(0));
        assert!(!t.start(450), "second start must not reset the delay");
        assert!(t.tick(500));
        assert!(!t.tick(599));
        assert!(t.tick(600));
    }

    #[test]
    fn zero_interval_does_not_spin() {
        let mut t = RepeatingTrigger::new(0, 0);
        t.start(10);
        assert!(t.tick(12));
        assert!(!t.tick(12), "next slot is past the last tick");
        assert!(t.tick(13));
    }

    #[test]
    fn stall_fires_once() {
        let mut t = RepeatingTrigger::new(500, 100);
        t.start(0);
        assert!(t.tick(5_000));
        assert!(!t.tick(5_050), "missed repeats are not replayed");
        assert!(t.tick(5_100));
    }
}
