//! Per-frame timing state owned by the frame driver.

use std::f64::consts::TAU;
use std::time::Instant;

/// How simulation time advances between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeStep {
    /// Measured time between ticks
    WallClock,

    /// Constant step per frame (seconds), independent of real time
    Fixed { dt_s: f64 },
}

/// Timing snapshot handed to the engine each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frame number, starting at 0
    pub frame: u64,

    /// Simulation time since the previous tick (seconds)
    pub dt_s: f64,

    /// Simulation time since the first tick (seconds)
    pub elapsed_s: f64,
}

impl FrameTick {
    /// Synthesis angle `t` in radians: one full turn per `period_s`
    pub fn phase_angle(&self, period_s: f64) -> f64 {
        TAU * self.elapsed_s / period_s
    }
}

/// Frame clock: previous tick and accumulated simulation time
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: TimeStep,
    last_tick: Option<Instant>,
    elapsed_s: f64,
    next_frame: u64,
}

impl FrameClock {
    pub fn new(step: TimeStep) -> Self {
        Self {
            step,
            last_tick: None,
            elapsed_s: 0.0,
            next_frame: 0,
        }
    }

    pub fn step(&self) -> TimeStep {
        self.step
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Advance to the next frame. The first tick is always at time zero.
    pub fn tick(&mut self) -> FrameTick {
        self.tick_at(Instant::now())
    }

    /// Advance using `now` as the wall-clock reading
    pub fn tick_at(&mut self, now: Instant) -> FrameTick {
        let dt_s = match (self.step, self.last_tick) {
            (_, None) => 0.0,
            (TimeStep::Fixed { dt_s }, Some(_)) => dt_s,
            (TimeStep::WallClock, Some(last)) => now.saturating_duration_since(last).as_secs_f64(),
        };
        self.last_tick = Some(now);
        self.elapsed_s += dt_s;

        let tick = FrameTick {
            frame: self.next_frame,
            dt_s,
            elapsed_s: self.elapsed_s,
        };
        self.next_frame += 1;
        tick
    }
}
