//! The abstract drawing surface the session renders onto.
//!
//! Everything target-specific lives behind [`DrawingSurface`]: coordinate
//! mapping for raw events, stroking a smoothed segment, painting a tap dot,
//! and full-raster snapshot/restore. [`crate::raster::Raster`] implements it in
//! memory; [`crate::web::CanvasSurface`] implements it over a browser canvas.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::coords::Point;
use crate::input::{PointerEvent, StrokePoint};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Errors raised by a drawing surface. The session treats all of them as no-ops.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface is not mounted")]
    Unmounted,
    #[error("snapshot is {actual_w}x{actual_h}, surface is {expected_w}x{expected_h}")]
    SizeMismatch { expected_w: u32, expected_h: u32, actual_w: u32, actual_h: u32 },
    #[error("image encoding failed: {0}")]
    Encode(String),
    #[error("drawing backend error: {0}")]
    Backend(String),
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?.as_bytes();
        let byte = |i: usize| Some(hex_val(hex[i])? * 16 + hex_val(hex[i + 1])?);
        match hex.len() {
            3 => {
                let nib = |i: usize| Some(hex_val(hex[i])? * 17);
                Some(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }

    /// CSS color string accepted by `CanvasRenderingContext2d`.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    #[must_use]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_css()
    }
}

/// A 2D target the drawing session can render strokes onto.
pub trait DrawingSurface {
    /// Full-surface raster captured by [`DrawingSurface::snapshot`].
    type Snapshot: Clone;

    /// Bitmap size in pixels.
    fn size(&self) -> (u32, u32);

    /// Map a raw event into surface pixel space. `None` when the surface is
    /// unmounted or the event has no usable coordinate.
    fn map_to_surface_space(&self, event: &PointerEvent) -> Option<Point>;

    /// Stroke the smoothed curve through `points`. See [`crate::smoother::smooth_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects a drawing call.
    fn render_segment(&mut self, points: &[StrokePoint], width: f64, color: Color) -> Result<(), SurfaceError>;

    /// Fill a circle of `radius` at `center`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects a drawing call.
    fn fill_dot(&mut self, center: Point, radius: f64, color: Color) -> Result<(), SurfaceError>;

    /// Capture the full raster.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixels cannot be read back.
    fn snapshot(&self) -> Result<Self::Snapshot, SurfaceError>;

    /// Replace the full raster with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot does not fit the surface.
    fn restore(&mut self, snapshot: &Self::Snapshot) -> Result<(), SurfaceError>;

    /// Fill the surface with white.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects a drawing call.
    fn blank(&mut self) -> Result<(), SurfaceError>;

    /// Encode the current raster as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn export_png(&self) -> Result<Vec<u8>, SurfaceError>;

    /// Encode the current raster as a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn export_data_url(&self) -> Result<String, SurfaceError> {
        Ok(png_data_url(&self.export_png()?))
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Wrap PNG bytes in a data URL.
#[must_use]
pub fn png_data_url(png: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png))
}

/// Extract PNG bytes from a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`SurfaceError::Encode`] if the prefix or payload is invalid.
pub fn decode_png_data_url(url: &str) -> Result<Vec<u8>, SurfaceError> {
    let payload = url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| SurfaceError::Encode("not a PNG data URL".into()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| SurfaceError::Encode(e.to_string()))
}
