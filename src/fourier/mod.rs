//! Harmonic coefficients and their traversal order.
//!
//! Coefficients are produced and stored in epicycle traversal order
//! `n = 0, +1, -1, +2, -2, ...`. The summed point does not depend on
//! the order, but the apex chain drawn between circles does.

mod analyzer;
mod fft;

pub use analyzer::FourierAnalyzer;
pub use fft::{fft_coefficients, max_deviation};

use std::f64::consts::PI;

use rustfft::num_complex::Complex;

use crate::error::{EpicycleError, Result};

/// Magnitudes at or below this are treated as exactly zero, and real parts
/// at or below it route phase through the ±π/2 guard instead of `atan2`.
pub const DEGENERATE_EPSILON: f64 = 5e-8;

/// Largest harmonic index; `-n` must also fit in an `i32`
pub const MAX_HARMONIC: u32 = i32::MAX as u32;

/// One term of the Fourier decomposition, immutable once built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicCoefficient {
    /// Harmonic index (rotations per period, sign = direction)
    n: i32,

    /// Radius of the epicycle, always >= 0
    amplitude: f64,

    /// Starting angle in (-π, π]
    phase: f64,
}

impl HarmonicCoefficient {
    /// The degenerate coefficient for harmonic `n`
    pub const fn zero(n: i32) -> Self {
        Self {
            n,
            amplitude: 0.0,
            phase: 0.0,
        }
    }

    /// Derive amplitude and phase from accumulated integral sums.
    ///
    /// Near the `atan2` pole (`|re| <= ε`) the phase snaps to ±π/2 by the
    /// sign of the imaginary sum.
    pub fn from_sums(n: i32, re: f64, im: f64) -> Self {
        let magnitude = (re * re + im * im).sqrt();
        if magnitude <= DEGENERATE_EPSILON {
            return Self::zero(n);
        }

        let phase = if re.abs() > DEGENERATE_EPSILON {
            // atan2 already lands in [-π, π]; only the -π end needs moving
            match im.atan2(re) {
                phase if phase == -PI => PI,
                phase => phase,
            }
        } else if im >= 0.0 {
            PI / 2.0
        } else {
            -PI / 2.0
        };

        Self {
            n,
            amplitude: magnitude,
            phase,
        }
    }

    /// Build from raw user values: any finite phase, possibly negative amplitude
    pub fn from_polar(n: i32, amplitude: f64, phase: f64) -> Result<Self> {
        if !(amplitude.is_finite() && phase.is_finite()) {
            return Err(EpicycleError::invalid_parameter(format!(
                "harmonic {} has non-finite amplitude/phase ({}, {})",
                n, amplitude, phase
            )));
        }

        let (amplitude, phase) = if amplitude < 0.0 {
            (-amplitude, phase + PI)
        } else {
            (amplitude, phase)
        };

        Ok(Self {
            n,
            amplitude,
            phase: wrap_phase(phase),
        })
    }

    pub fn n(&self) -> i32 {
        self.n
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Complex coefficient `amplitude * e^{i * phase}`
    pub fn value(&self) -> Complex<f64> {
        Complex::from_polar(self.amplitude, self.phase)
    }

    pub fn is_degenerate(&self) -> bool {
        self.amplitude == 0.0
    }
}

/// Wrap an angle into (-π, π]. In-range angles come back unchanged.
pub fn wrap_phase(phase: f64) -> f64 {
    if phase > -PI && phase <= PI {
        return phase;
    }
    let wrapped = (phase + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Harmonic indices for `-n_max..=n_max` in traversal order `0, 1, -1, 2, -2, ...`
///
/// `n_max` saturates at `MAX_HARMONIC`; callers validate it first.
pub fn traversal_order(n_max: u32) -> impl Iterator<Item = i32> {
    let n_max = i32::try_from(n_max).unwrap_or(i32::MAX);
    std::iter::once(0).chain((1..=n_max).flat_map(|n| [n, -n]))
}

/// Coefficients in traversal order, read-only once built
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoefficientSequence {
    coefficients: Vec<HarmonicCoefficient>,
}

impl CoefficientSequence {
    /// Wrap coefficients, checking each one is finite and normalised
    pub fn new(coefficients: Vec<HarmonicCoefficient>) -> Result<Self> {
        for c in &coefficients {
            let normalised = c.amplitude.is_finite()
                && c.amplitude >= 0.0
                && c.phase.is_finite()
                && c.phase > -PI
                && c.phase <= PI;
            if !normalised {
                return Err(EpicycleError::invalid_parameter(format!(
                    "harmonic {} is not a normalised coefficient ({}, {})",
                    c.n, c.amplitude, c.phase
                )));
            }
        }
        Ok(Self { coefficients })
    }

    /// Direct coefficient set: `amplitudes[i]` and raw `offsets[i]` drive harmonic `i + 1`
    pub fn from_amplitudes(amplitudes: &[f64], offsets: &[f64]) -> Result<Self> {
        if amplitudes.len() != offsets.len() {
            return Err(EpicycleError::invalid_parameter(format!(
                "{} amplitudes but {} phase offsets",
                amplitudes.len(),
                offsets.len()
            )));
        }

        let coefficients = amplitudes
            .iter()
            .zip(offsets)
            .enumerate()
            .map(|(i, (&amp, &offset))| HarmonicCoefficient::from_polar(i as i32 + 1, amp, offset))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { coefficients })
    }

    pub fn as_slice(&self) -> &[HarmonicCoefficient] {
        &self.coefficients
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HarmonicCoefficient> {
        self.coefficients.iter()
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Look up the coefficient for harmonic `n`
    pub fn get(&self, n: i32) -> Option<&HarmonicCoefficient> {
        self.coefficients.iter().find(|c| c.n == n)
    }

    /// The `k` largest-amplitude harmonics, largest first
    pub fn dominant(&self, k: usize) -> Vec<HarmonicCoefficient> {
        let mut sorted = self.coefficients.clone();
        sorted.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));
        sorted.truncate(k);
        sorted
    }
}

impl<'a> IntoIterator for &'a CoefficientSequence {
    type Item = &'a HarmonicCoefficient;
    type IntoIter = std::slice::Iter<'a, HarmonicCoefficient>;

    fn into_iter(self) -> Self::IntoIter {
        self.coefficients.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_traversal_order_interleaves() {
        let order: Vec<i32> = traversal_order(3).collect();
        assert_eq!(order, vec![0, 1, -1, 2, -2, 3, -3]);
        assert_eq!(traversal_order(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(traversal_order(10).count(), 21);
    }

    #[test]
    fn test_traversal_order_large_n_max() {
        // Indices past i32::MAX must not wrap into an empty range
        let head: Vec<i32> = traversal_order(3_000_000_000).take(5).collect();
        assert_eq!(head, vec![0, 1, -1, 2, -2]);
    }

    #[test]
    fn test_from_sums_degenerate() {
        let c = HarmonicCoefficient::from_sums(4, 1e-9, -2e-9);
        assert_eq!(c, HarmonicCoefficient::zero(4));
        assert!(c.is_degenerate());
    }

    #[test]
    fn test_from_sums_atan2_guard() {
        // Real part inside the epsilon band: phase snaps to exactly ±π/2
        let up = HarmonicCoefficient::from_sums(1, 1e-9, 3.0);
        assert_eq!(up.phase, FRAC_PI_2);
        assert!((up.amplitude - 3.0).abs() < 1e-12);

        let down = HarmonicCoefficient::from_sums(1, -1e-9, -3.0);
        assert_eq!(down.phase, -FRAC_PI_2);
    }

    #[test]
    fn test_from_sums_regular_phase() {
        let c = HarmonicCoefficient::from_sums(2, 1.0, 1.0);
        assert!((c.amplitude - 2f64.sqrt()).abs() < 1e-12);
        assert!((c.phase - std::f64::consts::FRAC_PI_4).abs() < 1e-12);

        // Negative real axis lands on +π, never -π
        let c = HarmonicCoefficient::from_sums(2, -1.0, -0.0);
        assert_eq!(c.phase, PI);
    }

    #[test]
    fn test_from_sums_phase_is_exact_atan2() {
        for (re, im) in [(1.0, 2.0), (-0.3, 0.7), (-2.5, -1e-3), (0.9, -4.0)] {
            let c = HarmonicCoefficient::from_sums(1, re, im);
            assert_eq!(c.phase(), f64::atan2(im, re));
        }
        assert_eq!(wrap_phase(2.0), 2.0);
        assert_eq!(wrap_phase(-3.0), -3.0);
    }

    #[test]
    fn test_accessors() {
        let c = HarmonicCoefficient::from_polar(-3, 12.5, 0.25).unwrap();
        assert_eq!((c.n(), c.amplitude(), c.phase()), (-3, 12.5, 0.25));
    }

    #[test]
    fn test_wrap_phase_range() {
        assert!((wrap_phase(293.234) - (293.234 - 94.0 * PI)).abs() < 1e-9);
        assert_eq!(wrap_phase(-PI), PI);
        assert_eq!(wrap_phase(PI), PI);
        assert!((wrap_phase(3.0 * PI).abs() - PI).abs() < 1e-12);
        for raw in [-10.0, -3.2, -1.0, 0.0, 1.0, 3.2, 23.2] {
            let w = wrap_phase(raw);
            assert!(w > -PI && w <= PI, "{} wrapped to {}", raw, w);
        }
    }

    #[test]
    fn test_from_polar_normalises() {
        let c = HarmonicCoefficient::from_polar(3, -2.0, 0.5).unwrap();
        assert_eq!(c.amplitude, 2.0);
        assert!((c.phase - wrap_phase(0.5 + PI)).abs() < 1e-12);

        assert!(HarmonicCoefficient::from_polar(3, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_sequence_validation() {
        let bad = CoefficientSequence::new(vec![HarmonicCoefficient {
            n: 1,
            amplitude: 1.0,
            phase: 4.0,
        }]);
        assert!(matches!(bad, Err(EpicycleError::InvalidParameter { .. })));

        let seq = CoefficientSequence::from_amplitudes(
            &[200.0, 150.0, 125.0, 100.0, 75.0],
            &[1.0, 0.5, 23.2, 293.234, 0.0],
        )
        .unwrap();
        assert_eq!(seq.len(), 5);
        assert_eq!(
            seq.iter().map(|c| c.n).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(CoefficientSequence::new(seq.as_slice().to_vec()).is_ok());

        assert!(CoefficientSequence::from_amplitudes(&[1.0], &[]).is_err());
    }

    #[test]
    fn test_dominant_sorted_by_amplitude() {
        let seq = CoefficientSequence::from_amplitudes(&[10.0, 30.0, 20.0], &[0.0; 3]).unwrap();
        let top: Vec<i32> = seq.dominant(2).iter().map(|c| c.n).collect();
        assert_eq!(top, vec![2, 3]);
        assert_eq!(seq.get(3).map(|c| c.amplitude), Some(20.0));
        assert!(seq.get(7).is_none());
    }
}
