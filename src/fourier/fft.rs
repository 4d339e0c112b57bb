//! FFT cross-check for the trapezoidal analyzer.
//!
//! Uniform sampling of a unit-period signal turns `c_n` into a scaled DFT bin,
//! so one FFT estimates every harmonic at once. The estimate is only used to
//! sanity-check analyzer output at startup.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::TAU;

use super::{traversal_order, CoefficientSequence, MAX_HARMONIC};
use crate::error::{EpicycleError, Result};
use crate::signal::PiecewiseLinearSignal;

/// Width tolerance for treating the signal domain as one unit period
const UNIT_PERIOD_TOLERANCE: f64 = 1e-9;

/// Estimate `c_n` for `n = -n_max..=n_max` (traversal order) from `samples` uniform samples
pub fn fft_coefficients(
    signal: &PiecewiseLinearSignal,
    n_max: u32,
    samples: usize,
) -> Result<Vec<(i32, Complex<f64>)>> {
    let (min, max) = signal.domain().ok_or_else(|| {
        EpicycleError::invalid_parameter("FFT estimate requires at least 2 control points")
    })?;
    if ((max - min) - 1.0).abs() > UNIT_PERIOD_TOLERANCE {
        return Err(EpicycleError::invalid_parameter(format!(
            "FFT estimate requires a unit-width domain, got [{}, {})",
            min, max
        )));
    }
    if n_max > MAX_HARMONIC || samples <= 2 * n_max as usize {
        return Err(EpicycleError::invalid_parameter(format!(
            "{} samples cannot resolve harmonics up to {}",
            samples, n_max
        )));
    }

    let mut buffer = (0..samples)
        .map(|k| {
            let theta = min + k as f64 / samples as f64;
            let (amplitude, phase) = signal.sample_periodic(theta)?;
            Ok(Complex::from_polar(amplitude, phase))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(samples);
    fft.process(&mut buffer);

    let scale = 1.0 / samples as f64;
    Ok(traversal_order(n_max)
        .map(|n| {
            let bin = (n as i64).rem_euclid(samples as i64) as usize;
            // Shift the DFT origin from theta = 0 to theta = min
            let shift = Complex::from_polar(1.0, -TAU * n as f64 * min);
            (n, buffer[bin] * scale * shift)
        })
        .collect())
}

/// Largest `|c_n - estimate_n|` over harmonics present in both inputs
pub fn max_deviation(coefficients: &CoefficientSequence, estimates: &[(i32, Complex<f64>)]) -> f64 {
    estimates
        .iter()
        .filter_map(|(n, estimate)| {
            coefficients
                .get(*n)
                .map(|c| (c.value() - estimate).norm())
        })
        .fold(0.0, f64::max)
}
