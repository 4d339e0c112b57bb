//! Command-line argument parsing.

use clap::Parser;
use log::{info, warn};

use crate::engine::EngineConfig;
use crate::error::Result;
use crate::frame::TimeStep;
use crate::params::{
    parse_control_points, AnimationConfig, RecordingConfig, RenderConfig, SignalPreset,
    TraceConfig, TracePolicyKind,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Epicycles")]
#[command(about = "Fourier epicycles tracing a piecewise-linear signal", long_about = None)]
pub struct Args {
    /// Signal preset: square (default), tone, star, classic
    #[arg(long, value_name = "PRESET", default_value = "square")]
    pub preset: String,

    /// Custom control points "theta:amplitude:phase,..." (overrides --preset)
    #[arg(long, value_name = "POINTS")]
    pub points: Option<String>,

    /// Highest harmonic N; draws 2N+1 epicycles
    #[arg(long, value_name = "N", default_value = "5")]
    pub harmonics: u32,

    /// Integration node spacing (theta units)
    #[arg(long, value_name = "STEP", default_value = "1e-4")]
    pub density: f64,

    /// Seconds per full revolution of the fundamental
    #[arg(long, value_name = "SECONDS", default_value = "10")]
    pub period: f64,

    /// Trace retention: window (default) or dedup
    #[arg(long, value_name = "POLICY", default_value = "window")]
    pub trace_policy: String,

    /// Hard cap on retained trace points
    #[arg(long, value_name = "COUNT", default_value = "4096")]
    pub max_trace: usize,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "800")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "600")]
    pub height: u32,

    /// Advance time by a fixed step per frame instead of the wall clock
    #[arg(long, value_name = "SECONDS")]
    pub fixed_step: Option<f64>,

    /// Record frames to PNG (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Compare the analysed coefficients against an FFT estimate at startup
    #[arg(long)]
    pub verify: bool,

    /// Analyse harmonics on one thread
    #[arg(long)]
    pub serial: bool,
}

impl Args {
    /// Parse signal preset from command-line arguments
    pub fn parse_preset(&self) -> Result<SignalPreset> {
        if let Some(ref text) = self.points {
            let points = parse_control_points(text)?;
            info!("Signal: custom ({} control points)", points.len());
            return Ok(SignalPreset::Custom(points));
        }

        match SignalPreset::from_name(&self.preset) {
            Some(preset) => {
                info!("Signal: {}", preset.name());
                Ok(preset)
            }
            None => {
                warn!("Unknown signal preset '{}', using square", self.preset);
                Ok(SignalPreset::Square)
            }
        }
    }

    /// Parse trace policy, falling back to the time window
    pub fn trace_config(&self) -> TraceConfig {
        let policy = TracePolicyKind::from_name(&self.trace_policy).unwrap_or_else(|| {
            warn!(
                "Unknown trace policy '{}', using window",
                self.trace_policy
            );
            TracePolicyKind::TimeWindow
        });

        TraceConfig {
            policy,
            max_points: self.max_trace,
        }
    }

    /// Animation parameters; recording forces a fixed step of one frame
    pub fn animation_config(&self, recording: Option<&RecordingConfig>) -> AnimationConfig {
        let time_step = match (recording, self.fixed_step) {
            (Some(config), _) => TimeStep::Fixed {
                dt_s: config.frame_step_s(),
            },
            (None, Some(dt_s)) => TimeStep::Fixed { dt_s },
            (None, None) => TimeStep::WallClock,
        };

        AnimationConfig {
            harmonics: self.harmonics,
            density: self.density,
            period_s: self.period,
            time_step,
            parallel_analysis: !self.serial,
            ..Default::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..Default::default()
        }
    }

    /// Full engine configuration
    pub fn engine_config(&self, recording: Option<&RecordingConfig>) -> Result<EngineConfig> {
        Ok(EngineConfig {
            source: self.parse_preset()?.source()?,
            animation: self.animation_config(recording),
            trace: self.trace_config(),
            palette: self.render_config().palette,
        })
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> std::io::Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        let config = RecordingConfig::new(duration);

        // Create output directories
        std::fs::create_dir_all(config.frames_dir())?;
        std::fs::create_dir_all(&config.output_dir)?;

        Ok(Some(config))
    }
}
