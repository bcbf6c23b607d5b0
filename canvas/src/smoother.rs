//! Stroke smoothing: the live point buffer and the per-frame curve renderer.
//!
//! DESIGN
//! ======
//! A stroke is `Idle -> Drawing -> Idle`. Pointer-down captures the raster as
//! it was before the stroke and seeds the buffer with one point. Pointer-moves
//! only append samples; nothing is drawn from the event handlers. Once per
//! display frame the renderer copies the buffer, builds a quadratic path
//! through the midpoints of adjacent samples, and strokes it with a width that
//! eases toward the buffer's average pressure. Pointer-up hands the finished
//! stroke back to the session, which decides between keeping the curve and
//! redrawing a tap as a dot.
//!
//! The buffer is trimmed to the most recent `LIVE_POINT_WINDOW` samples after
//! each frame. Only those points influence the segment being drawn, so long
//! strokes stay bounded in memory.

#[cfg(test)]
#[path = "smoother_test.rs"]
mod smoother_test;

use crate::consts::{LIVE_POINT_WINDOW, MIN_CURVE_POINTS, WIDTH_SMOOTHING};
use crate::coords::Point;
use crate::input::StrokePoint;
use crate::surface::{Color, DrawingSurface, SurfaceError};

/// One quadratic Bézier segment; the start is the previous segment's end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSegment {
    pub ctrl: Point,
    pub end: Point,
}

/// A smoothed path: a start point followed by quadratic segments.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    pub start: Point,
    pub segments: Vec<QuadSegment>,
}

impl StrokePath {
    /// Flatten into a polyline, `steps` line pieces per segment.
    #[must_use]
    pub fn flatten(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        let mut out = Vec::with_capacity(1 + self.segments.len() * steps);
        out.push(self.start);
        let mut from = self.start;
        for seg in &self.segments {
            for step in 1..=steps {
                #[allow(clippy::cast_precision_loss)]
                let t = step as f64 / steps as f64;
                let mt = 1.0 - t;
                out.push(Point {
                    x: mt * mt * from.x + 2.0 * mt * t * seg.ctrl.x + t * t * seg.end.x,
                    y: mt * mt * from.y + 2.0 * mt * t * seg.ctrl.y + t * t * seg.end.y,
                });
            }
            from = seg.end;
        }
        out
    }
}

/// Build the smoothed path through `points`.
///
/// Each interior sample becomes the control point of a quadratic ending at the
/// midpoint to its successor; the last segment ends exactly on the final
/// sample. Returns `None` for fewer than two points.
#[must_use]
pub fn smooth_path(points: &[StrokePoint]) -> Option<StrokePath> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len();
    let mut segments = Vec::with_capacity(n - 1);
    for i in 1..n.saturating_sub(2) {
        let ctrl = points[i].point();
        segments.push(QuadSegment { ctrl, end: ctrl.midpoint(points[i + 1].point()) });
    }
    segments.push(QuadSegment { ctrl: points[n - 2].point(), end: points[n - 1].point() });
    Some(StrokePath { start: points[0].point(), segments })
}

/// Mean pressure of `points`; the default pressure for an empty slice.
#[must_use]
pub fn average_pressure(points: &[StrokePoint]) -> f64 {
    if points.is_empty() {
        return crate::consts::DEFAULT_PRESSURE;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = points.len() as f64;
    points.iter().map(|p| p.pressure).sum::<f64>() / len
}

/// Width the pen is heading toward for a given average pressure.
#[must_use]
pub fn target_width(base_width: f64, avg_pressure: f64) -> f64 {
    base_width * (0.5 + avg_pressure * 0.5)
}

/// One easing step from `rendered` toward `target`.
#[must_use]
pub fn ease_width(rendered: f64, target: f64) -> f64 {
    rendered + (target - rendered) * WIDTH_SMOOTHING
}

/// A stroke that has just ended.
#[derive(Debug, Clone)]
pub struct FinishedStroke<T> {
    /// First sample of the stroke; where a tap dot is painted.
    pub origin: StrokePoint,
    /// Total samples taken, including ones trimmed from the live buffer.
    pub samples: usize,
    /// Raster captured at pointer-down, if it could be read.
    pub before: Option<T>,
}

impl<T> FinishedStroke<T> {
    /// Whether the stroke was too short to render as a curve.
    #[must_use]
    pub fn is_tap(&self) -> bool {
        self.samples < MIN_CURVE_POINTS
    }
}

#[derive(Debug)]
enum StrokeState<T> {
    Idle,
    Drawing { origin: StrokePoint, samples: usize, before: Option<T> },
}

/// Live stroke buffer and smoothing state.
#[derive(Debug)]
pub struct StrokeSmoother<T> {
    state: StrokeState<T>,
    points: Vec<StrokePoint>,
    rendered_width: f64,
    /// Samples appended since the last rendered frame.
    pending: bool,
}

impl<T> Default for StrokeSmoother<T> {
    fn default() -> Self {
        Self { state: StrokeState::Idle, points: Vec::new(), rendered_width: 0.0, pending: false }
    }
}

impl<T> StrokeSmoother<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Samples currently held in the live buffer.
    #[must_use]
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    /// Width used by the most recent frame.
    #[must_use]
    pub fn rendered_width(&self) -> f64 {
        self.rendered_width
    }

    /// Whether samples arrived since the last frame was drawn.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.pending
    }

    /// Start a stroke at `start`. Any stroke in progress is discarded.
    pub fn begin(&mut self, start: StrokePoint, base_width: f64, before: Option<T>) {
        self.points.clear();
        self.points.push(start);
        self.rendered_width = base_width;
        self.pending = false;
        self.state = StrokeState::Drawing { origin: start, samples: 1, before };
    }

    /// Append a sample. Returns `false` (and drops the sample) when idle.
    pub fn push(&mut self, point: StrokePoint) -> bool {
        let StrokeState::Drawing { samples, .. } = &mut self.state else {
            return false;
        };
        *samples += 1;
        self.points.push(point);
        self.pending = true;
        true
    }

    /// Render one frame of the live stroke onto `surface`.
    ///
    /// Returns `Ok(true)` if something was drawn. Nothing is drawn while idle
    /// or while the buffer holds fewer than three points.
    ///
    /// # Errors
    ///
    /// Propagates the surface's drawing error; the buffer is left untouched.
    pub fn render_frame<S>(&mut self, surface: &mut S, base_width: f64, color: Color) -> Result<bool, SurfaceError>
    where
        S: DrawingSurface<Snapshot = T>,
    {
        if !self.is_drawing() || self.points.len() < MIN_CURVE_POINTS {
            return Ok(false);
        }

        // Copy before iterating: handlers may append while the host is mid-frame.
        let frame = self.points.clone();
        let width = ease_width(self.rendered_width, target_width(base_width, average_pressure(&frame)));
        surface.render_segment(&frame, width, color)?;

        self.rendered_width = width;
        self.pending = false;
        if self.points.len() > LIVE_POINT_WINDOW {
            let excess = self.points.len() - LIVE_POINT_WINDOW;
            self.points.drain(..excess);
        }
        Ok(true)
    }

    /// End the stroke. Returns `None` if no stroke was active, which makes
    /// duplicate end events harmless.
    pub fn finish(&mut self) -> Option<FinishedStroke<T>> {
        let state = std::mem::replace(&mut self.state, StrokeState::Idle);
        self.points.clear();
        self.pending = false;
        match state {
            StrokeState::Idle => None,
            StrokeState::Drawing { origin, samples, before } => Some(FinishedStroke { origin, samples, before }),
        }
    }
}
