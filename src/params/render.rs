//! Rendering and recording configuration.

use crate::canvas::Rgba;

/// Colours for every drawn element
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Clear colour
    pub background: Rgba,

    /// Epicycle circle outlines
    pub circle: Rgba,

    /// Spoke colour of the first link
    pub spoke_start: Rgba,

    /// Spoke colour the chain fades toward at its tip
    pub spoke_end: Rgba,

    /// Reconstructed path
    pub trace: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            circle: Rgba::WHITE,
            spoke_start: Rgba::RED,
            spoke_end: Rgba::PURPLE,
            trace: Rgba::rgb(0.2, 0.85, 1.0),
        }
    }
}

impl Palette {
    /// Spoke colour for link `index` of a `count`-link chain (red → purple)
    pub fn spoke_color(&self, index: usize, count: usize) -> Rgba {
        let t = index as f32 / count.max(1) as f32;
        self.spoke_start.lerp(self.spoke_end, t)
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            palette: Palette::default(),
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds of simulation time)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS), also the fixed simulation step
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Simulation seconds per captured frame
    pub fn frame_step_s(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// PNG path for frame `frame_num`
    pub fn frame_path(&self, frame_num: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), frame_num)
    }
}
