//! Piecewise-linear periodic complex signal.
//!
//! The signal is `f(theta) = amplitude(theta) * e^{i * phase(theta)}` where
//! amplitude and phase are interpolated independently between control points.
//! Phase is interpolated on raw radian values: a segment going from `3.0` to
//! `-3.0` sweeps through zero, not across the ±π seam.

use rustfft::num_complex::Complex;

use crate::error::{EpicycleError, Result};

/// One knot of a piecewise-linear signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Position in the signal domain (one period spans the domain)
    pub theta: f64,

    /// Magnitude of the signal at this knot (pixels when drawn)
    pub amplitude: f64,

    /// Argument of the signal at this knot (radians, unwrapped)
    pub phase: f64,
}

impl ControlPoint {
    pub const fn new(theta: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            theta,
            amplitude,
            phase,
        }
    }
}

/// Ordered control points with strictly increasing theta.
///
/// Constructed once at startup and never mutated. Fewer than two points is
/// a valid (empty) signal: sampling it fails, analysing it yields zeros.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PiecewiseLinearSignal {
    points: Vec<ControlPoint>,
}

impl PiecewiseLinearSignal {
    /// Build a signal, rejecting non-finite values and non-increasing theta
    pub fn new(points: Vec<ControlPoint>) -> Result<Self> {
        for (i, p) in points.iter().enumerate() {
            if !(p.theta.is_finite() && p.amplitude.is_finite() && p.phase.is_finite()) {
                return Err(EpicycleError::invalid_parameter(format!(
                    "control point {} is not finite: {:?}",
                    i, p
                )));
            }
        }

        if let Some(i) = points.windows(2).position(|w| w[1].theta <= w[0].theta) {
            return Err(EpicycleError::invalid_parameter(format!(
                "control point theta must be strictly increasing (point {} has theta {} after {})",
                i + 1,
                points[i + 1].theta,
                points[i].theta
            )));
        }

        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Domain `[theta_min, theta_max)`, or `None` with fewer than two points
    pub fn domain(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => Some((first.theta, last.theta)),
            _ => None,
        }
    }

    /// Sample `(amplitude, phase)` at `theta` inside `[theta_min, theta_max)`
    pub fn sample(&self, theta: f64) -> Result<(f64, f64)> {
        let (min, max) = self.require_domain()?;
        if !(theta >= min && theta < max) {
            return Err(EpicycleError::out_of_range(theta, min, max));
        }

        let segment = self.segment_containing(theta);
        Ok(self.interpolate(segment, theta))
    }

    /// Sample at any finite `theta`, wrapping it into the domain first
    pub fn sample_periodic(&self, theta: f64) -> Result<(f64, f64)> {
        let (min, max) = self.require_domain()?;
        if !theta.is_finite() {
            return Err(EpicycleError::out_of_range(theta, min, max));
        }

        let mut wrapped = min + (theta - min).rem_euclid(max - min);
        // rem_euclid can round up to the full width for tiny negative offsets
        if wrapped >= max {
            wrapped = min;
        }
        self.sample(wrapped)
    }

    /// Complex value `amplitude * e^{i * phase}` at `theta`
    pub fn value(&self, theta: f64) -> Result<Complex<f64>> {
        let (amplitude, phase) = self.sample(theta)?;
        Ok(Complex::from_polar(amplitude, phase))
    }

    fn require_domain(&self) -> Result<(f64, f64)> {
        self.domain().ok_or_else(|| {
            EpicycleError::invalid_parameter(format!(
                "sampling requires at least 2 control points, got {}",
                self.points.len()
            ))
        })
    }

    /// Index of the segment `[points[i], points[i + 1]]` holding `theta`.
    ///
    /// Values past the last knot map to the final segment.
    pub(crate) fn segment_containing(&self, theta: f64) -> usize {
        let upper = self.points.partition_point(|p| p.theta <= theta);
        upper.saturating_sub(1).min(self.points.len().saturating_sub(2))
    }

    /// Interpolate within `segment`, without domain checks.
    ///
    /// Valid for `theta` on the closed segment, including its right knot.
    pub(crate) fn interpolate(&self, segment: usize, theta: f64) -> (f64, f64) {
        let lo = &self.points[segment];
        let hi = &self.points[segment + 1];
        let lerp = (theta - lo.theta) / (hi.theta - lo.theta);

        (
            lo.amplitude + (hi.amplitude - lo.amplitude) * lerp,
            lo.phase + (hi.phase - lo.phase) * lerp,
        )
    }
}
