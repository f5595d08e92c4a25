//! Tick sources and the driving loop.
//!
//! The driving loop owns the clock and calls [`step_one`] synchronously once
//! per tick. Waiting between ticks happens here; the engine never sleeps.

use std::thread;
use std::time::{Duration, Instant};

use crate::{step_one, CoreConfig, CoreState, Peripherals, RunOutcome};

/// Nominal tick rate.
pub const TICK_RATE_HZ: u32 = 60;

/// External periodic trigger.
pub trait TickSource {
    /// Blocks until the next tick. Returns `false` when the source has stopped.
    fn wait_tick(&mut self) -> bool;
}

/// Wall-clock tick source firing at a fixed rate.
///
/// Deadlines advance by whole periods from the first tick, so a slow step
/// is caught up on instead of drifting the schedule. An optional limit stops
/// the source after that many ticks.
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    period: Duration,
    next_deadline: Option<Instant>,
    remaining: Option<u64>,
}

impl FixedRateClock {
    /// Creates a clock firing `hz` times per second; `hz` of zero is treated as one.
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / hz.max(1),
            next_deadline: None,
            remaining: None,
        }
    }

    /// Stops the clock after `ticks` ticks.
    #[must_use]
    pub const fn with_limit(mut self, ticks: u64) -> Self {
        self.remaining = Some(ticks);
        self
    }

    /// Interval between ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Default for FixedRateClock {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ)
    }
}

impl TickSource for FixedRateClock {
    fn wait_tick(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_deadline = Some(deadline + self.period);
        true
    }
}

/// Tick source that fires a fixed number of times without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountedTicks(pub u64);

impl TickSource for CountedTicks {
    fn wait_tick(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

/// Runs one step per tick until the source stops or the core halts or faults.
pub fn drive(
    state: &mut CoreState,
    io: &mut Peripherals<'_>,
    config: &CoreConfig,
    ticks: &mut dyn TickSource,
) -> RunOutcome {
    let mut outcome = RunOutcome {
        steps: 0,
        final_step: None,
    };

    while ticks.wait_tick() {
        let step = step_one(state, io, config);
        outcome.steps = outcome.steps.saturating_add(1);
        outcome.final_step = Some(step);
        if step.is_terminal() {
            log::info!("run ended after {} ticks: {step:?}", outcome.steps);
            break;
        }
    }

    outcome
}
