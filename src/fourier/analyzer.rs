//! Numerical Fourier coefficient extraction by composite trapezoidal rule.

use std::f64::consts::TAU;

use rayon::prelude::*;
use rustfft::num_complex::Complex;

use super::{traversal_order, CoefficientSequence, HarmonicCoefficient};
use crate::error::{EpicycleError, Result};
use crate::signal::PiecewiseLinearSignal;

/// Computes `c_n = ∫ f(theta) e^{-i 2π n theta} dtheta` over the signal domain
#[derive(Debug, Clone, Copy)]
pub struct FourierAnalyzer {
    /// Integration step in theta units
    density: f64,

    /// Spread harmonics over the rayon pool
    parallel: bool,
}

impl FourierAnalyzer {
    /// Create an analyzer with integration step `density` (must be > 0)
    pub fn new(density: f64) -> Result<Self> {
        if !(density.is_finite() && density > 0.0) {
            return Err(EpicycleError::invalid_parameter(format!(
                "integration density must be a positive finite number, got {}",
                density
            )));
        }
        Ok(Self {
            density,
            parallel: false,
        })
    }

    /// Compute harmonics in parallel. Output is identical to the serial path.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Raw complex integral for harmonic `n`.
    ///
    /// Every control point is a forced node: steps restart from each knot and
    /// the last step of a segment is clamped onto the next knot. Fewer than two
    /// control points integrate to zero.
    pub fn integrate(&self, signal: &PiecewiseLinearSignal, n: i32) -> Complex<f64> {
        let points = signal.points();
        let omega = -TAU * n as f64;
        let integrand = |segment: usize, theta: f64| {
            let (amplitude, phase) = signal.interpolate(segment, theta);
            Complex::from_polar(amplitude, phase + omega * theta)
        };

        let mut sum = Complex::new(0.0, 0.0);
        for (segment, knots) in points.windows(2).enumerate() {
            let (start, boundary) = (knots[0].theta, knots[1].theta);

            let mut theta = start;
            let mut value = integrand(segment, theta);
            let mut step: u64 = 0;
            while theta < boundary {
                step += 1;
                let next = (start + step as f64 * self.density).min(boundary);
                let next_value = integrand(segment, next);

                sum += (value + next_value) * (0.5 * (next - theta));

                theta = next;
                value = next_value;
            }
        }
        sum
    }

    /// Coefficient for a single harmonic
    pub fn coefficient(&self, signal: &PiecewiseLinearSignal, n: i32) -> HarmonicCoefficient {
        let sum = self.integrate(signal, n);
        HarmonicCoefficient::from_sums(n, sum.re, sum.im)
    }

    /// All `2 * n_max + 1` coefficients for `n = -n_max..=n_max`, in traversal order
    pub fn analyze(&self, signal: &PiecewiseLinearSignal, n_max: u32) -> CoefficientSequence {
        let order: Vec<i32> = traversal_order(n_max).collect();

        let coefficients = if self.parallel {
            order
                .par_iter()
                .map(|&n| self.coefficient(signal, n))
                .collect()
        } else {
            order.iter().map(|&n| self.coefficient(signal, n)).collect()
        };

        CoefficientSequence { coefficients }
    }
}
