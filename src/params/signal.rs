//! Built-in signals and control-point parsing.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::engine::SignalSource;
use crate::error::{EpicycleError, Result};
use crate::fourier::CoefficientSequence;
use crate::signal::{ControlPoint, PiecewiseLinearSignal};

/// Width of the phase ramp at the square wave's mid-period edge
const SQUARE_EDGE_WIDTH: f64 = 1e-6;

/// Square wave / tone amplitude (pixels)
const SQUARE_AMPLITUDE: f64 = 400.0;
const TONE_AMPLITUDE: f64 = 200.0;
const TONE_HARMONIC: i32 = 3;

/// Star tip and notch radii (pixels)
const STAR_OUTER: f64 = 250.0;
const STAR_INNER: f64 = 100.0;
const STAR_POINTS: usize = 5;

/// Direct coefficient set: radii for harmonics 1..=5
const CLASSIC_AMPLITUDES: [f64; 5] = [200.0, 150.0, 125.0, 100.0, 75.0];
/// Raw phase offsets for the same harmonics (normalised on load)
const CLASSIC_OFFSETS: [f64; 5] = [1.0, 0.5, 23.2, 293.234, 0.0];

/// Named signal presets
#[derive(Debug, Clone, PartialEq)]
pub enum SignalPreset {
    /// Phase 0 on the first half period, π on the second
    Square,

    /// One harmonic, everything else zero
    Tone,

    /// Five-pointed star outline
    Star,

    /// Fixed five-harmonic chain, no analysis
    Classic,

    /// User-supplied control points
    Custom(Vec<ControlPoint>),
}

impl SignalPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "square" => Some(Self::Square),
            "tone" => Some(Self::Tone),
            "star" => Some(Self::Star),
            "classic" => Some(Self::Classic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Tone => "tone",
            Self::Star => "star",
            Self::Classic => "classic",
            Self::Custom(_) => "custom",
        }
    }

    /// Build the engine input for this preset
    pub fn source(&self) -> Result<SignalSource> {
        let points = match self {
            Self::Square => square_points(),
            Self::Tone => vec![
                ControlPoint::new(0.0, TONE_AMPLITUDE, 0.0),
                ControlPoint::new(1.0, TONE_AMPLITUDE, TAU * TONE_HARMONIC as f64),
            ],
            Self::Star => star_points(),
            Self::Classic => {
                return CoefficientSequence::from_amplitudes(&CLASSIC_AMPLITUDES, &CLASSIC_OFFSETS)
                    .map(SignalSource::Coefficients);
            }
            Self::Custom(points) => points.clone(),
        };

        PiecewiseLinearSignal::new(points).map(SignalSource::ControlPoints)
    }
}

fn square_points() -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(0.0, SQUARE_AMPLITUDE, 0.0),
        ControlPoint::new(0.5, SQUARE_AMPLITUDE, 0.0),
        ControlPoint::new(0.5 + SQUARE_EDGE_WIDTH, SQUARE_AMPLITUDE, PI),
        ControlPoint::new(1.0, SQUARE_AMPLITUDE, PI),
    ]
}

/// Alternating tip/notch radii, phase sweeping one full turn from straight up
fn star_points() -> Vec<ControlPoint> {
    let knots = 2 * STAR_POINTS;
    (0..=knots)
        .map(|k| {
            let radius = if k % 2 == 0 { STAR_OUTER } else { STAR_INNER };
            ControlPoint::new(
                k as f64 / knots as f64,
                radius,
                FRAC_PI_2 + TAU * k as f64 / knots as f64,
            )
        })
        .collect()
}

/// Parse `"theta:amplitude:phase,theta:amplitude:phase,..."`
pub fn parse_control_points(text: &str) -> Result<Vec<ControlPoint>> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let fields = item
                .split(':')
                .map(|field| {
                    field.trim().parse::<f64>().map_err(|e| {
                        EpicycleError::invalid_parameter(format!(
                            "bad number '{}' in control point '{}': {}",
                            field, item, e
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            match fields.as_slice() {
                [theta, amplitude, phase] => Ok(ControlPoint::new(*theta, *amplitude, *phase)),
                _ => Err(EpicycleError::invalid_parameter(format!(
                    "control point '{}' needs theta:amplitude:phase",
                    item
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in [
            SignalPreset::Square,
            SignalPreset::Tone,
            SignalPreset::Star,
            SignalPreset::Classic,
        ] {
            assert_eq!(SignalPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(SignalPreset::from_name("SQUARE"), Some(SignalPreset::Square));
        assert_eq!(SignalPreset::from_name("triangle"), None);
    }

    #[test]
    fn test_presets_build() {
        for preset in [SignalPreset::Square, SignalPreset::Tone, SignalPreset::Star] {
            match preset.source().unwrap() {
                SignalSource::ControlPoints(signal) => {
                    assert_eq!(signal.domain(), Some((0.0, 1.0)), "{}", preset.name())
                }
                SignalSource::Coefficients(_) => panic!("{} should be analysed", preset.name()),
            }
        }

        match SignalPreset::Classic.source().unwrap() {
            SignalSource::Coefficients(seq) => assert_eq!(seq.len(), 5),
            SignalSource::ControlPoints(_) => panic!("classic is a direct coefficient set"),
        }
    }

    #[test]
    fn test_star_alternates_radius() {
        let points = star_points();
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].amplitude, STAR_OUTER);
        assert_eq!(points[1].amplitude, STAR_INNER);
        assert_eq!(points[10].amplitude, STAR_OUTER);
        assert!((points[10].phase - points[0].phase - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_parse_control_points() {
        let points = parse_control_points("0:400:0, 0.5:400:0 ,0.500001:400:3.14159,1:400:3.14159")
            .unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[1], ControlPoint::new(0.5, 400.0, 0.0));
        assert_eq!(points[3].phase, 3.14159);

        assert!(parse_control_points("0:1").is_err());
        assert!(parse_control_points("0:one:2").is_err());
        assert!(parse_control_points("").unwrap().is_empty());
    }

    #[test]
    fn test_custom_preset_validates_order() {
        let preset = SignalPreset::Custom(vec![
            ControlPoint::new(0.5, 1.0, 0.0),
            ControlPoint::new(0.2, 1.0, 0.0),
        ]);
        assert!(matches!(
            preset.source(),
            Err(EpicycleError::InvalidParameter { .. })
        ));
    }
}
