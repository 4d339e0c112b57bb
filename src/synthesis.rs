//! Epicycle synthesis: chaining rotating vectors into a 2D point.
//!
//! Link `i` rotates by `angle = n_i * t + phase_i` and adds
//! `amplitude_i * (cos(angle), -sin(angle))` to the previous apex. The y
//! component is negated for the y-down pixel convention.

use glam::DVec2;

use crate::canvas::Canvas;
use crate::fourier::CoefficientSequence;
use crate::params::Palette;

/// One rotating vector of the chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLink {
    /// Harmonic index driving this link
    pub n: i32,

    /// Circle centre / arrow start (previous apex)
    pub base: DVec2,

    /// Arrow end (this apex)
    pub tip: DVec2,

    /// Circle radius (coefficient amplitude)
    pub radius: f64,
}

/// Apex positions produced while summing the epicycles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApexChain {
    pub origin: DVec2,
    pub links: Vec<ChainLink>,
}

impl ApexChain {
    /// Final apex: the synthesized point
    pub fn tip(&self) -> DVec2 {
        self.links.last().map_or(self.origin, |link| link.tip)
    }

    /// `apex_0` (origin) followed by every link tip
    pub fn apexes(&self) -> impl Iterator<Item = DVec2> + '_ {
        std::iter::once(self.origin).chain(self.links.iter().map(|link| link.tip))
    }
}

/// Reassembles harmonics into a trajectory around a movable centre
#[derive(Debug, Clone)]
pub struct EpicycleSynthesizer {
    coefficients: CoefficientSequence,
    center: DVec2,
}

impl EpicycleSynthesizer {
    pub fn new(coefficients: CoefficientSequence, center: DVec2) -> Self {
        Self {
            coefficients,
            center,
        }
    }

    /// Centre the chain on a `width x height` canvas
    pub fn for_canvas(coefficients: CoefficientSequence, width: u32, height: u32) -> Self {
        Self::new(coefficients, canvas_center(width, height))
    }

    /// Resize notification: `apex_0` moves to the new canvas centre
    pub fn resize(&mut self, width: u32, height: u32) {
        self.center = canvas_center(width, height);
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn coefficients(&self) -> &CoefficientSequence {
        &self.coefficients
    }

    /// Full chain at time `t` (radians). Zero-amplitude harmonics still get a link.
    pub fn apex_chain(&self, t: f64) -> ApexChain {
        let mut apex = self.center;
        let links = self
            .coefficients
            .iter()
            .map(|c| {
                let base = apex;
                apex += epicycle_offset(c.n(), c.amplitude(), c.phase(), t);
                ChainLink {
                    n: c.n(),
                    base,
                    tip: apex,
                    radius: c.amplitude(),
                }
            })
            .collect();

        let chain = ApexChain {
            origin: self.center,
            links,
        };
        debug_assert!(chain.tip().is_finite(), "non-finite apex at t = {}", t);
        chain
    }

    /// Synthesized point at time `t`, without materialising the chain
    pub fn synthesize(&self, t: f64) -> DVec2 {
        let point = self.coefficients.iter().fold(self.center, |apex, c| {
            apex + epicycle_offset(c.n(), c.amplitude(), c.phase(), t)
        });
        debug_assert!(point.is_finite(), "non-finite point at t = {}", t);
        point
    }

    /// Draw the chain at time `t` and return the synthesized point
    pub fn draw<C: Canvas + ?Sized>(&self, t: f64, canvas: &mut C, palette: &Palette) -> DVec2 {
        let chain = self.apex_chain(t);
        self.draw_chain(&chain, canvas, palette);
        chain.tip()
    }

    /// Draw every link of `chain`: circle first, then the spoke arrow
    pub fn draw_chain<C: Canvas + ?Sized>(
        &self,
        chain: &ApexChain,
        canvas: &mut C,
        palette: &Palette,
    ) {
        let count = chain.links.len();
        for (i, link) in chain.links.iter().enumerate() {
            canvas.draw_circle(link.base, link.radius, palette.circle);
            canvas.draw_arrow(link.base, link.tip, palette.spoke_color(i, count));
        }
    }
}

fn canvas_center(width: u32, height: u32) -> DVec2 {
    DVec2::new(width as f64 / 2.0, height as f64 / 2.0)
}

fn epicycle_offset(n: i32, amplitude: f64, phase: f64, t: f64) -> DVec2 {
    let angle = n as f64 * t + phase;
    amplitude * DVec2::new(angle.cos(), -angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::fourier::{FourierAnalyzer, HarmonicCoefficient};
    use crate::signal::{ControlPoint, PiecewiseLinearSignal};
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn sequence(coefficients: &[(i32, f64, f64)]) -> CoefficientSequence {
        CoefficientSequence::new(
            coefficients
                .iter()
                .map(|&(n, amplitude, phase)| {
                    HarmonicCoefficient::from_polar(n, amplitude, phase).unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    fn square_wave() -> PiecewiseLinearSignal {
        PiecewiseLinearSignal::new(vec![
            ControlPoint::new(0.0, 400.0, 0.0),
            ControlPoint::new(0.5, 400.0, 0.0),
            ControlPoint::new(0.5 + 1e-6, 400.0, PI),
            ControlPoint::new(1.0, 400.0, PI),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_link_uses_y_down_convention() {
        let synth = EpicycleSynthesizer::for_canvas(sequence(&[(1, 100.0, 0.0)]), 800, 600);
        assert_eq!(synth.center(), DVec2::new(400.0, 300.0));

        // Quarter turn counter-clockwise moves the tip up the screen
        let p = synth.synthesize(FRAC_PI_2);
        assert!((p - DVec2::new(400.0, 200.0)).length() < 1e-9);

        let p = synth.synthesize(0.0);
        assert!((p - DVec2::new(500.0, 300.0)).length() < 1e-9);
    }

    #[test]
    fn test_chain_accumulates_in_sequence_order() {
        let synth = EpicycleSynthesizer::new(
            sequence(&[(0, 10.0, 0.0), (1, 20.0, FRAC_PI_2), (-1, 5.0, PI)]),
            DVec2::ZERO,
        );
        let chain = synth.apex_chain(0.0);

        let apexes: Vec<DVec2> = chain.apexes().collect();
        assert_eq!(apexes.len(), 4);
        assert!((apexes[1] - DVec2::new(10.0, 0.0)).length() < 1e-9);
        assert!((apexes[2] - DVec2::new(10.0, -20.0)).length() < 1e-9);
        assert!((apexes[3] - DVec2::new(5.0, -20.0)).length() < 1e-9);
        assert_eq!(chain.tip(), apexes[3]);
        assert_eq!(
            chain.links.iter().map(|l| l.n).collect::<Vec<_>>(),
            vec![0, 1, -1]
        );
        assert!((synth.synthesize(0.0) - chain.tip()).length() < 1e-12);
    }

    #[test]
    fn test_order_independent_point_order_dependent_chain() {
        let forward = sequence(&[
            (0, 30.0, 0.2),
            (1, 80.0, -1.0),
            (-1, 40.0, 2.5),
            (2, 15.0, 0.9),
        ]);
        let mut reversed = forward.as_slice().to_vec();
        reversed.reverse();
        let reversed = CoefficientSequence::new(reversed).unwrap();

        let a = EpicycleSynthesizer::new(forward, DVec2::new(320.0, 240.0));
        let b = EpicycleSynthesizer::new(reversed, DVec2::new(320.0, 240.0));

        for t in [0.0, 0.4, 1.7, 3.0, 5.9] {
            let chain_a = a.apex_chain(t);
            let chain_b = b.apex_chain(t);
            assert!((chain_a.tip() - chain_b.tip()).length() < 1e-9);
            assert!((chain_a.links[0].tip - chain_b.links[0].tip).length() > 1e-3);
        }
    }

    #[test]
    fn test_zero_amplitude_keeps_its_link() {
        let synth = EpicycleSynthesizer::new(
            sequence(&[(0, 0.0, 0.0), (1, 50.0, 0.0), (-1, 0.0, 0.0)]),
            DVec2::ZERO,
        );
        let mut canvas = RecordingCanvas::default();
        let palette = Palette::default();
        let tip = synth.draw(1.0, &mut canvas, &palette);

        assert_eq!(canvas.circles.len(), 3);
        assert_eq!(canvas.arrows.len(), 3);
        assert_eq!(canvas.circles[0].1, 0.0);
        assert_eq!(canvas.arrows[0].0, canvas.arrows[0].1);
        assert_eq!(tip, canvas.arrows[2].1);

        // Spoke colours run along the gradient
        assert_eq!(canvas.arrows[0].2, palette.spoke_color(0, 3));
        assert_eq!(canvas.arrows[2].2, palette.spoke_color(2, 3));
    }

    #[test]
    fn test_resize_moves_origin() {
        let mut synth = EpicycleSynthesizer::for_canvas(sequence(&[(1, 10.0, 0.0)]), 800, 600);
        let before = synth.synthesize(0.3);
        synth.resize(1280, 720);

        assert_eq!(synth.center(), DVec2::new(640.0, 360.0));
        let after = synth.synthesize(0.3);
        assert!(((after - before) - DVec2::new(240.0, 60.0)).length() < 1e-9);
    }

    #[test]
    fn test_empty_sequence_sits_at_center() {
        let synth = EpicycleSynthesizer::for_canvas(CoefficientSequence::default(), 100, 50);
        assert_eq!(synth.synthesize(2.0), DVec2::new(50.0, 25.0));
        assert!(synth.apex_chain(2.0).links.is_empty());
    }

    /// RMS distance between the synthesized path and the signal over one period
    fn rms_error(signal: &PiecewiseLinearSignal, synth: &EpicycleSynthesizer) -> f64 {
        let samples = 1000;
        let sum: f64 = (0..samples)
            .map(|k| {
                let theta = (k as f64 + 0.5) / samples as f64;
                let (amp, phase) = signal.sample_periodic(theta).unwrap();
                let truth = synth.center() + DVec2::new(amp * phase.cos(), -amp * phase.sin());
                synth.synthesize(TAU * theta).distance_squared(truth)
            })
            .sum();
        (sum / samples as f64).sqrt()
    }

    #[test]
    fn test_truncation_converges() {
        let signal = square_wave();
        let analyzer = FourierAnalyzer::new(1e-4).unwrap();

        let errors: Vec<f64> = [1, 3, 5, 7, 9]
            .iter()
            .map(|&n_max| {
                let synth =
                    EpicycleSynthesizer::new(analyzer.analyze(&signal, n_max), DVec2::ZERO);
                rms_error(&signal, &synth)
            })
            .collect();

        for pair in errors.windows(2) {
            assert!(pair[1] < pair[0], "RMS did not decrease: {:?}", errors);
        }
    }
}
