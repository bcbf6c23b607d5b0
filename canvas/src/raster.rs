//! In-memory RGBA raster implementing [`DrawingSurface`].
//!
//! Used natively (tests, server-side previews) and anywhere a browser canvas
//! is not available. Strokes are flattened into short line pieces and each
//! piece is filled as a capsule of the stroke's half-width, which gives round
//! caps and joins without a separate join pass. No anti-aliasing.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::sync::Arc;

use crate::consts::QUAD_FLATTEN_STEPS;
use crate::coords::{self, Point, SurfaceBounds};
use crate::input::{PointerEvent, StrokePoint};
use crate::smoother::smooth_path;
use crate::surface::{Color, DrawingSurface, SurfaceError};

/// Smallest radius a stroke piece is filled with, so hairlines stay visible.
const MIN_FILL_RADIUS: f64 = 0.5;

/// A full copy of a raster's pixels. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSnapshot {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl RasterSnapshot {
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// A software RGBA8 bitmap.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pixels: Vec<u8>,
    /// Client-space layout of the surface; `None` while unmounted.
    bounds: Option<SurfaceBounds>,
}

impl Raster {
    /// A white raster of `width` x `height`, unmounted.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut raster = Self { width, height, pixels: vec![0; pixel_len(width, height)], bounds: None };
        raster.fill_white();
        raster
    }

    /// A white raster laid out at `bounds` in client space.
    #[must_use]
    pub fn mounted(width: u32, height: u32, bounds: SurfaceBounds) -> Self {
        let mut raster = Self::new(width, height);
        raster.bounds = Some(bounds);
        raster
    }

    /// Update (or clear) the client-space layout.
    pub fn set_bounds(&mut self, bounds: Option<SurfaceBounds>) {
        self.bounds = bounds;
    }

    #[must_use]
    pub fn bounds(&self) -> Option<SurfaceBounds> {
        self.bounds
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of pixel `(x, y)`, or `None` out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2], self.pixels[idx + 3]])
    }

    /// Whether every pixel is opaque white.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 255)
    }

    /// Number of pixels that are not opaque white.
    #[must_use]
    pub fn inked_pixel_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| *px != [255, 255, 255, 255]).count()
    }

    fn fill_white(&mut self) {
        self.pixels.fill(255);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let [r, g, b, a] = color.to_rgba();
        if a == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
            return;
        }
        let alpha = f64::from(a) / 255.0;
        for (offset, src) in [r, g, b].into_iter().enumerate() {
            let dst = f64::from(self.pixels[idx + offset]);
            self.pixels[idx + offset] = to_channel(f64::from(src) * alpha + dst * (1.0 - alpha));
        }
        let dst_a = f64::from(self.pixels[idx + 3]) / 255.0;
        self.pixels[idx + 3] = to_channel((alpha + dst_a * (1.0 - alpha)) * 255.0);
    }

    /// Fill every pixel whose center lies within `radius` of segment `a`-`b`.
    fn fill_capsule(&mut self, a: Point, b: Point, radius: f64, color: Color) {
        let r = radius.max(MIN_FILL_RADIUS);
        let Some((x0, x1)) = pixel_span(a.x.min(b.x) - r, a.x.max(b.x) + r, self.width) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(a.y.min(b.y) - r, a.y.max(b.y) + r, self.height) else {
            return;
        };
        for py in y0..=y1 {
            for px in x0..=x1 {
                let center = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                if distance_to_segment(center, a, b) <= r {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }
}

impl DrawingSurface for Raster {
    type Snapshot = RasterSnapshot;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn map_to_surface_space(&self, event: &PointerEvent) -> Option<Point> {
        coords::client_to_surface(event.client?, self.bounds?, self.width, self.height)
    }

    fn render_segment(&mut self, points: &[StrokePoint], width: f64, color: Color) -> Result<(), SurfaceError> {
        let Some(path) = smooth_path(points) else {
            return Ok(());
        };
        let polyline = path.flatten(QUAD_FLATTEN_STEPS);
        let radius = width / 2.0;
        for pair in polyline.windows(2) {
            self.fill_capsule(pair[0], pair[1], radius, color);
        }
        Ok(())
    }

    fn fill_dot(&mut self, center: Point, radius: f64, color: Color) -> Result<(), SurfaceError> {
        self.fill_capsule(center, center, radius, color);
        Ok(())
    }

    fn snapshot(&self) -> Result<RasterSnapshot, SurfaceError> {
        Ok(RasterSnapshot { width: self.width, height: self.height, pixels: Arc::from(self.pixels.as_slice()) })
    }

    fn restore(&mut self, snapshot: &RasterSnapshot) -> Result<(), SurfaceError> {
        if snapshot.width != self.width || snapshot.height != self.height {
            return Err(SurfaceError::SizeMismatch {
                expected_w: self.width,
                expected_h: self.height,
                actual_w: snapshot.width,
                actual_h: snapshot.height,
            });
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
        Ok(())
    }

    fn blank(&mut self) -> Result<(), SurfaceError> {
        self.fill_white();
        Ok(())
    }

    fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        writer
            .write_image_data(&self.pixels)
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        writer.finish().map_err(|e| SurfaceError::Encode(e.to_string()))?;
        Ok(out)
    }
}

fn pixel_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Inclusive pixel index range covering `[lo, hi]`, clipped to `0..limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(lo: f64, hi: f64, limit: u32) -> Option<(u32, u32)> {
    if limit == 0 || !lo.is_finite() || !hi.is_finite() || hi < 0.0 || lo >= f64::from(limit) {
        return None;
    }
    let first = lo.floor().max(0.0) as u32;
    let last = (hi.floor().max(0.0) as u32).min(limit - 1);
    Some((first, last))
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
