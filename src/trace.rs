//! Bounded history of synthesized points, drawn as the reconstructed path.

use std::collections::{HashSet, VecDeque};

use glam::DVec2;
use log::warn;

use crate::canvas::{Canvas, Rgba};

/// One synthesized point in pixel coordinates
pub type TracePoint = DVec2;

/// Eviction policy for the trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TracePolicy {
    /// Keep a point only if its pixel has not been visited yet.
    /// Only the hard size bound evicts.
    Dedup,

    /// Append every frame; once simulation time exceeds `window_s`,
    /// drop the oldest point on every push.
    TimeWindow { window_s: f64 },
}

/// FIFO of trace points with a policy and a hard size bound
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    policy: TracePolicy,
    max_points: usize,
    points: VecDeque<TracePoint>,
    /// Pixel cells currently held (dedup policy only)
    seen: HashSet<(i64, i64)>,
}

impl TraceBuffer {
    /// `max_points` is a hard bound applied after the policy; 0 is raised to 1
    pub fn new(policy: TracePolicy, max_points: usize) -> Self {
        if max_points == 0 {
            warn!("Trace capacity 0 raised to 1");
        }
        Self {
            policy,
            max_points: max_points.max(1),
            points: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    pub fn policy(&self) -> TracePolicy {
        self.policy
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Offer this frame's point. Returns whether it was stored.
    pub fn push(&mut self, point: TracePoint, elapsed_s: f64) -> bool {
        debug_assert!(point.is_finite(), "non-finite trace point {:?}", point);

        let inserted = match self.policy {
            TracePolicy::Dedup => {
                if self.seen.insert(pixel_cell(point)) {
                    self.points.push_back(point);
                    true
                } else {
                    false
                }
            }
            TracePolicy::TimeWindow { window_s } => {
                self.points.push_back(point);
                if elapsed_s > window_s {
                    self.evict_oldest();
                }
                true
            }
        };

        while self.points.len() > self.max_points {
            self.evict_oldest();
        }

        inserted
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self.points.pop_front() {
            if self.policy == TracePolicy::Dedup {
                self.seen.remove(&pixel_cell(oldest));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points oldest first
    pub fn iter(&self) -> impl Iterator<Item = &TracePoint> {
        self.points.iter()
    }

    /// Consecutive pairs, oldest first
    pub fn segments(&self) -> impl Iterator<Item = (TracePoint, TracePoint)> + '_ {
        self.points.iter().zip(self.points.iter().skip(1)).map(|(a, b)| (*a, *b))
    }

    /// Draw the path as connected segments in FIFO order
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, color: Rgba) {
        for (a, b) in self.segments() {
            canvas.draw_segment(a, b, color);
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.seen.clear();
    }
}

/// Integer pixel a point lands on
fn pixel_cell(point: TracePoint) -> (i64, i64) {
    (point.x.round() as i64, point.y.round() as i64)
}
