//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter advanced once per fixed
//! simulation step of `dt` seconds.  Rendering runs at its own rate and only
//! needs to know how far it is between two ticks; [`FixedStep`] turns variable
//! frame durations into a whole number of due ticks plus that fraction.
//!
//! The core never samples a real clock.  Whoever drives the simulation feeds
//! frame durations in and calls the tick function the returned number of times.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── FixedStep ─────────────────────────────────────────────────────────────────

/// Default cap on ticks executed for a single frame.  A frame that stalls for
/// longer drops the excess instead of trying to catch up all at once.
pub const DEFAULT_MAX_CATCH_UP: u32 = 8;

/// Fixed-timestep accumulator.
///
/// ```text
/// frame:  |----- 0.033 s -----|----- 0.033 s -----|
/// ticks:  |  0.02  |  0.02  |  0.02  |  0.02  |
///                                    ^ alpha = leftover / dt
/// ```
#[derive(Clone, Debug)]
pub struct FixedStep {
    dt:            f32,
    accumulator:   f32,
    max_catch_up:  u32,
}

impl FixedStep {
    /// Create an accumulator for ticks of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTickDuration`] unless `dt` is finite and
    /// strictly positive.
    pub fn new(dt: f32) -> CoreResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CoreError::InvalidTickDuration(dt));
        }
        Ok(Self { dt, accumulator: 0.0, max_catch_up: DEFAULT_MAX_CATCH_UP })
    }

    /// Override the per-frame catch-up cap (minimum 1).
    pub fn with_max_catch_up(mut self, max: u32) -> Self {
        self.max_catch_up = max.max(1);
        self
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add one frame's worth of elapsed seconds and return how many fixed
    /// ticks are now due.  Negative or non-finite input counts as zero.
    pub fn push_frame(&mut self, frame_secs: f32) -> u32 {
        if frame_secs.is_finite() && frame_secs > 0.0 {
            self.accumulator += frame_secs;
        }
        let mut due = 0;
        while self.accumulator >= self.dt && due < self.max_catch_up {
            self.accumulator -= self.dt;
            due += 1;
        }
        if due == self.max_catch_up && self.accumulator >= self.dt {
            // Drop the backlog; keep only the sub-tick remainder.
            self.accumulator %= self.dt;
        }
        due
    }

    /// Seconds elapsed since the last due tick.
    #[inline]
    pub fn since_last_tick(&self) -> f32 {
        self.accumulator
    }

    /// Fraction of a tick interval elapsed since the last tick, in `[0, 1]`.
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }
}
