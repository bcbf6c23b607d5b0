//! Coordinate mapping from client (CSS) space into surface bitmap space.
//!
//! A canvas element is laid out at one size by CSS and backed by a bitmap of
//! another. Pointer events report positions relative to the viewport, so every
//! sample is shifted by the element's bounding-rect origin and scaled by
//! `bitmap / displayed` per axis before it reaches the smoother.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

/// A point in either client or surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The element's bounding rectangle in client space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether the rectangle has a finite, non-zero area.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Client-space center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.left + self.width / 2.0, y: self.top + self.height / 2.0 }
    }
}

/// Map a client-space point into surface bitmap space.
///
/// Returns `None` when the bounds are degenerate or the input is not finite,
/// which callers treat as "no coordinate".
#[must_use]
pub fn client_to_surface(client: Point, bounds: SurfaceBounds, bitmap_width: u32, bitmap_height: u32) -> Option<Point> {
    if !bounds.is_usable() || !client.x.is_finite() || !client.y.is_finite() {
        return None;
    }
    let scale_x = f64::from(bitmap_width) / bounds.width;
    let scale_y = f64::from(bitmap_height) / bounds.height;
    Some(Point { x: (client.x - bounds.left) * scale_x, y: (client.y - bounds.top) * scale_y })
}
