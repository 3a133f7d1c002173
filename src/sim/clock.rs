//! Countdown clock
//!
//! The countdown runs off a wall-clock interval that is independent of the frame
//! ticker. Interval timers cannot be paused, only cancelled and re-created, so
//! each arming hands out a fresh [`TimerHandle`] and cancels the previous one
//! first. Ticks delivered for a cancelled handle are ignored, which keeps two
//! countdowns from ever running at once.
//!
//! [`FixedStep`] is the matching host helper for the frame ticker.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Identity of one armed countdown interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone, Default)]
pub struct CountdownClock {
    next_id: u32,
    active: Option<TimerHandle>,
}

impl CountdownClock {
    /// Cancel any running interval, then arm a new one
    pub fn arm(&mut self) -> TimerHandle {
        self.cancel();
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.active = Some(handle);
        handle
    }

    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.active.take()
    }

    pub fn active(&self) -> Option<TimerHandle> {
        self.active
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.active == Some(handle)
    }
}

/// Host-side interval emulation: turns elapsed wall-clock time into whole-second
/// ticks for whichever handle is currently armed. Switching handles restarts the
/// second, like clearing and re-creating a browser interval.
#[derive(Debug, Clone, Default)]
pub struct IntervalDriver {
    handle: Option<TimerHandle>,
    elapsed: f32,
}

impl IntervalDriver {
    /// Advance by `seconds` and return how many ticks fired for `active`
    pub fn advance(&mut self, active: Option<TimerHandle>, seconds: f32) -> u32 {
        if active != self.handle {
            self.handle = active;
            self.elapsed = 0.0;
        }
        if self.handle.is_none() {
            return 0;
        }
        self.elapsed += seconds;
        let ticks = self.elapsed.floor();
        self.elapsed -= ticks;
        ticks as u32
    }
}

/// Host-side fixed-timestep accumulator for the frame ticker. At most
/// `MAX_SUBSTEPS` steps run per host frame; time still owed after that is
/// dropped so a stalled host never carries a backlog into later frames.
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add `seconds` of host time and return how many `SIM_DT` steps to run
    pub fn advance(&mut self, seconds: f32) -> u32 {
        self.accumulator += seconds;
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if self.accumulator >= SIM_DT {
            log::debug!("Frame ticker behind, dropping {:.3}s", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }

    /// Time carried into the next host frame, always below one step
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
