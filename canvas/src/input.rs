//! Input model: pointer sources, raw pointer events, and pressure samples.
//!
//! `PointerEvent` is what the host hands the session for every mouse or touch
//! callback. It carries the client-space position (first touch for touch
//! events), optional device pressure, and the event timestamp used to drop the
//! synthetic mouse events browsers emit after a touch.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DEFAULT_PRESSURE, MAX_PRESSURE, MIN_PRESSURE};
use crate::coords::Point;

/// Which device produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    /// Mouse or pen reported through mouse events.
    Mouse,
    /// Touch screen.
    Touch,
}

/// A raw pointer event in client space.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Device that produced the event.
    pub source: PointerSource,
    /// Client-space position, or `None` when the event carries no coordinate
    /// (e.g. `touchend` with an empty touch list).
    pub client: Option<Point>,
    /// Device-reported pressure/force, if any.
    pub pressure: Option<f64>,
    /// Event timestamp in milliseconds.
    pub time_ms: f64,
}

impl PointerEvent {
    /// A mouse event at `(x, y)`.
    #[must_use]
    pub fn mouse(x: f64, y: f64, time_ms: f64) -> Self {
        Self { source: PointerSource::Mouse, client: Some(Point::new(x, y)), pressure: None, time_ms }
    }

    /// A touch event. Only the first active touch is used.
    #[must_use]
    pub fn touch(touches: &[Point], time_ms: f64) -> Self {
        Self { source: PointerSource::Touch, client: touches.first().copied(), pressure: None, time_ms }
    }

    /// Attach a device pressure reading. Zero means "not reported" as in the
    /// DOM `Touch.force` convention.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = (pressure > 0.0).then_some(pressure);
        self
    }

    #[must_use]
    pub fn is_touch(&self) -> bool {
        self.source == PointerSource::Touch
    }
}

/// Normalize a device pressure reading into `[MIN_PRESSURE, MAX_PRESSURE]`.
#[must_use]
pub fn normalize_pressure(raw: Option<f64>) -> f64 {
    match raw {
        Some(p) if p.is_finite() && p > 0.0 => p.clamp(MIN_PRESSURE, MAX_PRESSURE),
        _ => DEFAULT_PRESSURE,
    }
}

/// One sampled point of an active stroke, in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Normalized pressure in `[0.1, 1]`.
    pub pressure: f64,
}

impl StrokePoint {
    /// Build a sample from a mapped position and a raw pressure reading.
    #[must_use]
    pub fn new(at: Point, raw_pressure: Option<f64>) -> Self {
        Self { x: at.x, y: at.y, pressure: normalize_pressure(raw_pressure) }
    }

    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Tracks the last touch so that trailing synthetic mouse events are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchGuard {
    last_touch_ms: Option<f64>,
}

impl TouchGuard {
    /// Record `event` and decide whether it should be processed.
    ///
    /// Touch events are always accepted. Mouse events arriving less than
    /// `window_ms` after the last touch are rejected.
    pub fn accept(&mut self, event: &PointerEvent, window_ms: f64) -> bool {
        match event.source {
            PointerSource::Touch => {
                self.last_touch_ms = Some(event.time_ms);
                true
            }
            PointerSource::Mouse => match self.last_touch_ms {
                Some(last) => event.time_ms - last >= window_ms,
                None => true,
            },
        }
    }
}
