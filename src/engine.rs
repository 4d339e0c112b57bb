//! One parameterized epicycle engine: analyse once, then synthesize and
//! trace every frame.

use glam::DVec2;
use log::{debug, info};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::fourier::{fft_coefficients, max_deviation, CoefficientSequence, FourierAnalyzer};
use crate::frame::FrameTick;
use crate::params::{AnimationConfig, Palette, TraceConfig};
use crate::signal::PiecewiseLinearSignal;
use crate::synthesis::EpicycleSynthesizer;
use crate::trace::TraceBuffer;

/// Where the engine's harmonics come from
#[derive(Debug, Clone)]
pub enum SignalSource {
    /// Analysed over `-N..=N` at startup
    ControlPoints(PiecewiseLinearSignal),

    /// Used as-is, bypassing analysis
    Coefficients(CoefficientSequence),
}

/// Everything needed to build an engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub source: SignalSource,
    pub animation: AnimationConfig,
    pub trace: TraceConfig,
    pub palette: Palette,
}

/// Analyzer, synthesizer and trace for a single animation
pub struct EpicycleEngine {
    synthesizer: EpicycleSynthesizer,
    trace: TraceBuffer,
    signal: Option<PiecewiseLinearSignal>,
    harmonics: u32,
    period_s: f64,
    palette: Palette,
}

impl EpicycleEngine {
    /// Validate configuration and run the analysis for a `width x height` canvas.
    ///
    /// Every configuration error surfaces here, before the first frame.
    pub fn new(config: EngineConfig, width: u32, height: u32) -> Result<Self> {
        let EngineConfig {
            source,
            animation,
            trace,
            palette,
        } = config;
        animation.validate()?;

        let (coefficients, signal) = match source {
            SignalSource::ControlPoints(signal) => {
                let analyzer =
                    FourierAnalyzer::new(animation.density)?.parallel(animation.parallel_analysis);
                let coefficients = analyzer.analyze(&signal, animation.harmonics);
                debug_assert_eq!(coefficients.len(), animation.epicycle_count());
                info!(
                    "Analysed {} control points into {} harmonics (density {})",
                    signal.len(),
                    coefficients.len(),
                    animation.density
                );
                (coefficients, Some(signal))
            }
            SignalSource::Coefficients(coefficients) => {
                info!("Using {} precomputed harmonics", coefficients.len());
                (coefficients, None)
            }
        };

        for c in &coefficients {
            debug!(
                "  n={:+3}  amplitude={:10.4}  phase={:+.4}",
                c.n(),
                c.amplitude(),
                c.phase()
            );
        }
        let dominant: Vec<i32> = coefficients.dominant(3).iter().map(|c| c.n()).collect();
        info!("Dominant harmonics: {:?}", dominant);

        let trace = TraceBuffer::new(trace.policy_for(animation.period_s), trace.max_points);
        info!(
            "Trace policy {:?}, at most {} points",
            trace.policy(),
            trace.max_points()
        );

        Ok(Self {
            synthesizer: EpicycleSynthesizer::for_canvas(coefficients, width, height),
            trace,
            signal,
            harmonics: animation.harmonics,
            period_s: animation.period_s,
            palette,
        })
    }

    pub fn coefficients(&self) -> &CoefficientSequence {
        self.synthesizer.coefficients()
    }

    pub fn synthesizer(&self) -> &EpicycleSynthesizer {
        &self.synthesizer
    }

    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }

    /// Resize notification from the platform shell
    pub fn resize(&mut self, width: u32, height: u32) {
        self.synthesizer.resize(width, height);
    }

    /// Advance one frame: synthesize, record the point, draw trace then chain
    pub fn frame<C: Canvas + ?Sized>(&mut self, tick: &FrameTick, canvas: &mut C) -> DVec2 {
        let t = tick.phase_angle(self.period_s);
        let chain = self.synthesizer.apex_chain(t);
        let point = chain.tip();

        self.trace.push(point, tick.elapsed_s);
        self.trace.draw(canvas, self.palette.trace);
        self.synthesizer.draw_chain(&chain, canvas, &self.palette);

        point
    }

    /// Largest gap between the trapezoidal coefficients and an FFT estimate.
    ///
    /// `None` when the engine was built from precomputed coefficients.
    pub fn cross_check(&self, samples: usize) -> Option<Result<f64>> {
        let signal = self.signal.as_ref()?;
        Some(
            fft_coefficients(signal, self.harmonics, samples)
                .map(|estimates| max_deviation(self.coefficients(), &estimates)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::error::EpicycleError;
    use crate::frame::{FrameClock, TimeStep};
    use crate::params::{SignalPreset, TracePolicyKind};

    fn config(preset: SignalPreset) -> EngineConfig {
        EngineConfig {
            source: preset.source().unwrap(),
            animation: AnimationConfig {
                time_step: TimeStep::Fixed { dt_s: 1.0 / 60.0 },
                ..Default::default()
            },
            trace: TraceConfig::default(),
            palette: Palette::default(),
        }
    }

    #[test]
    fn test_square_preset_runs_frames() {
        let config = config(SignalPreset::Square);
        let period_s = config.animation.period_s;
        let mut engine = EpicycleEngine::new(config, 800, 600).unwrap();
        assert_eq!(engine.coefficients().len(), 11);

        let mut clock = FrameClock::new(TimeStep::Fixed { dt_s: 1.0 / 60.0 });
        for _ in 0..1199 {
            engine.frame(&clock.tick(), &mut RecordingCanvas::default());
        }
        let mut canvas = RecordingCanvas::default();
        engine.frame(&clock.tick(), &mut canvas);

        // Chain links drawn every frame, trace capped at half a period
        assert_eq!(canvas.circles.len(), 11);
        assert_eq!(canvas.arrows.len(), 11);
        let bound = ((period_s / 2.0) * 60.0).ceil() as usize + 1;
        assert!(engine.trace().len() <= bound);
        assert_eq!(canvas.segments.len(), engine.trace().len() - 1);
    }

    #[test]
    fn test_first_frame_matches_chain_tip() {
        let mut engine = EpicycleEngine::new(config(SignalPreset::Square), 800, 600).unwrap();
        let mut clock = FrameClock::new(TimeStep::Fixed { dt_s: 0.1 });
        let mut canvas = RecordingCanvas::default();

        let point = engine.frame(&clock.tick(), &mut canvas);
        assert_eq!(point, engine.synthesizer().synthesize(0.0));
        assert_eq!(engine.trace().iter().next(), Some(&point));

        // theta = 0 is the square wave's jump: the partial sum sits at the midpoint
        assert!((point - DVec2::new(400.0, 300.0)).length() < 5.0);
    }

    #[test]
    fn test_classic_preset_skips_analysis() {
        let engine = EpicycleEngine::new(config(SignalPreset::Classic), 800, 600).unwrap();
        assert_eq!(engine.coefficients().len(), 5);
        assert!(engine.cross_check(1024).is_none());
    }

    #[test]
    fn test_invalid_density_fails_before_loop() {
        let mut config = config(SignalPreset::Square);
        config.animation.density = -1.0;
        assert!(matches!(
            EpicycleEngine::new(config, 800, 600),
            Err(EpicycleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_resize_recenters_chain() {
        let mut engine = EpicycleEngine::new(config(SignalPreset::Tone), 800, 600).unwrap();
        engine.resize(1000, 1000);
        assert_eq!(engine.synthesizer().center(), DVec2::new(500.0, 500.0));
    }

    #[test]
    fn test_dedup_trace_policy() {
        let mut config = config(SignalPreset::Tone);
        config.trace.policy = TracePolicyKind::Dedup;
        let mut engine = EpicycleEngine::new(config, 800, 600).unwrap();

        // Same tick twice: the second point lands on a visited pixel
        let tick = FrameTick {
            frame: 0,
            dt_s: 0.0,
            elapsed_s: 1.0,
        };
        let mut canvas = RecordingCanvas::default();
        engine.frame(&tick, &mut canvas);
        engine.frame(&tick, &mut canvas);
        assert_eq!(engine.trace().len(), 1);
    }

    #[test]
    fn test_unrepresentable_harmonics_fail_before_analysis() {
        let mut config = config(SignalPreset::Square);
        config.animation.harmonics = 3_000_000_000;
        assert!(matches!(
            EpicycleEngine::new(config, 800, 600),
            Err(EpicycleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_engine_keeps_configured_period_and_palette() {
        let mut config = config(SignalPreset::Tone);
        config.animation.period_s = 4.0;
        config.trace.policy = TracePolicyKind::TimeWindow;
        let engine = EpicycleEngine::new(config, 800, 600).unwrap();

        assert_eq!(engine.period_s(), 4.0);
        assert_eq!(engine.palette(), &Palette::default());
        assert_eq!(
            engine.trace().policy(),
            crate::trace::TracePolicy::TimeWindow { window_s: 2.0 }
        );
    }

    #[test]
    fn test_cross_check_square() {
        let engine = EpicycleEngine::new(config(SignalPreset::Square), 800, 600).unwrap();
        let deviation = engine.cross_check(4096).unwrap().unwrap();
        assert!(deviation < 1.0, "deviation {}", deviation);
    }
}
