//! Drawing contract between the epicycle engine and the renderer.
//!
//! Coordinates are pixels with a top-left origin and y increasing downward.
//! `LineBatch` turns the primitives into line-list vertices for the GPU.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use std::f64::consts::TAU;

/// Linear RGBA colour, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Rgba = Rgba([1.0, 0.0, 0.0, 1.0]);
    pub const PURPLE: Rgba = Rgba([1.0, 0.0, 1.0, 1.0]);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Rgba([r, g, b, 1.0])
    }

    /// Component-wise blend, `t = 0` gives `self`
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0.0; 4];
        for (i, c) in out.iter_mut().enumerate() {
            *c = self.0[i] + (other.0[i] - self.0[i]) * t;
        }
        Rgba(out)
    }
}

/// Drawing primitives the renderer exposes to the engine
pub trait Canvas {
    /// Straight line between two points
    fn draw_segment(&mut self, p1: DVec2, p2: DVec2, color: Rgba);

    /// Circle outline
    fn draw_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// Directed segment with an arrowhead at `p2`
    fn draw_arrow(&mut self, p1: DVec2, p2: DVec2, color: Rgba);
}

/// Vertex for the line-list pipeline (pixel position + colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Target pixel length of one circle chord
const CIRCLE_CHORD_PX: f64 = 4.0;
const MIN_CIRCLE_SEGMENTS: usize = 12;
const MAX_CIRCLE_SEGMENTS: usize = 360;

/// Arrowhead stroke length cap (pixels) and fraction of shaft length
const ARROW_HEAD_PX: f64 = 10.0;
const ARROW_HEAD_FRACTION: f64 = 0.3;
/// Angle between shaft and each head stroke (radians, ~25°)
const ARROW_HEAD_ANGLE: f64 = 0.44;

/// Accumulates primitives as pairs of line-list vertices
#[derive(Debug, Default)]
pub struct LineBatch {
    vertices: Vec<LineVertex>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push_line(&mut self, p1: DVec2, p2: DVec2, color: Rgba) {
        self.vertices.push(LineVertex {
            position: p1.as_vec2().to_array(),
            color: color.0,
        });
        self.vertices.push(LineVertex {
            position: p2.as_vec2().to_array(),
            color: color.0,
        });
    }

    /// Chord count for a circle of `radius` pixels
    pub fn circle_segments(radius: f64) -> usize {
        ((TAU * radius / CIRCLE_CHORD_PX).ceil() as usize)
            .clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
    }
}

impl Canvas for LineBatch {
    fn draw_segment(&mut self, p1: DVec2, p2: DVec2, color: Rgba) {
        self.push_line(p1, p2, color);
    }

    fn draw_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if !(radius > 0.0) {
            return;
        }

        let segments = Self::circle_segments(radius);
        let point = |i: usize| {
            let angle = TAU * i as f64 / segments as f64;
            center + radius * DVec2::new(angle.cos(), angle.sin())
        };
        for i in 0..segments {
            self.push_line(point(i), point(i + 1), color);
        }
    }

    fn draw_arrow(&mut self, p1: DVec2, p2: DVec2, color: Rgba) {
        let shaft = p2 - p1;
        let length = shaft.length();
        if !(length > 0.0) {
            return;
        }

        self.push_line(p1, p2, color);

        let head = ARROW_HEAD_PX.min(length * ARROW_HEAD_FRACTION);
        let back = -shaft / length * head;
        for angle in [ARROW_HEAD_ANGLE, -ARROW_HEAD_ANGLE] {
            let stroke = DVec2::from_angle(angle).rotate(back);
            self.push_line(p2, p2 + stroke, color);
        }
    }
}

/// Canvas double that records every call
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub segments: Vec<(DVec2, DVec2)>,
    pub circles: Vec<(DVec2, f64)>,
    pub arrows: Vec<(DVec2, DVec2, Rgba)>,
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn draw_segment(&mut self, p1: DVec2, p2: DVec2, _color: Rgba) {
        self.segments.push((p1, p2));
    }

    fn draw_circle(&mut self, center: DVec2, radius: f64, _color: Rgba) {
        self.circles.push((center, radius));
    }

    fn draw_arrow(&mut self, p1: DVec2, p2: DVec2, color: Rgba) {
        self.arrows.push((p1, p2, color));
    }
}
