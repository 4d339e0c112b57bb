//! Analysis and animation timing parameters.

use std::time::Duration;

use crate::error::{EpicycleError, Result};
use crate::fourier::MAX_HARMONIC;
use crate::frame::TimeStep;

/// Drives the analyzer once and the synthesizer every frame
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Highest harmonic index N; analysis produces 2N + 1 epicycles
    pub harmonics: u32,

    /// Trapezoidal integration step (theta units, > 0)
    /// 1e-4 resolves the square-wave edge to well under a pixel
    pub density: f64,

    /// Seconds for the fundamental to complete one turn
    /// ≈ 0.01 rad per 16 ms frame
    pub period_s: f64,

    /// Delay between redraws (milliseconds)
    pub frame_delay_ms: u64,

    /// How simulation time advances per frame
    pub time_step: TimeStep,

    /// Analyse harmonics on the rayon pool
    pub parallel_analysis: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            harmonics: 5,
            density: 1e-4,
            period_s: 10.0,
            frame_delay_ms: 16,
            time_step: TimeStep::WallClock,
            parallel_analysis: true,
        }
    }
}

impl AnimationConfig {
    /// Validate configuration (density and period must be positive, etc.)
    pub fn validate(&self) -> Result<()> {
        if self.harmonics > MAX_HARMONIC {
            return Err(EpicycleError::invalid_parameter(format!(
                "harmonics must be <= {}, got {}",
                MAX_HARMONIC, self.harmonics
            )));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(EpicycleError::invalid_parameter(format!(
                "density must be > 0, got {}",
                self.density
            )));
        }
        if !(self.period_s.is_finite() && self.period_s > 0.0) {
            return Err(EpicycleError::invalid_parameter(format!(
                "period must be > 0 seconds, got {}",
                self.period_s
            )));
        }
        if let TimeStep::Fixed { dt_s } = self.time_step {
            if !(dt_s.is_finite() && dt_s > 0.0) {
                return Err(EpicycleError::invalid_parameter(format!(
                    "fixed time step must be > 0 seconds, got {}",
                    dt_s
                )));
            }
        }
        Ok(())
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    /// Epicycle count after analysis
    pub fn epicycle_count(&self) -> usize {
        2 * self.harmonics as usize + 1
    }
}
