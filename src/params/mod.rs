//! Parameter definitions with units and documented semantics.
//!
//! All tunables live here with:
//! - Units (pixels, seconds, theta units)
//! - Documented ranges and meanings
//! - Validation where a bad value would break analysis

mod animation;
mod render;
mod signal;
mod trace;

// Re-export all types
pub use animation::AnimationConfig;
pub use render::{Palette, RecordingConfig, RenderConfig};
pub use signal::{parse_control_points, SignalPreset};
pub use trace::{TraceConfig, TracePolicyKind};
