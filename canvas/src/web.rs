//! Browser canvas backend.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Snapshots are `ImageData` read back with `getImageData`; export goes
//! through `toDataURL`. All fallible `Canvas2D` calls are mapped into
//! [`SurfaceError::Backend`] and handled by the session.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::coords::{self, Point, SurfaceBounds};
use crate::input::{PointerEvent, StrokePoint};
use crate::session::DrawingSession;
use crate::smoother::smooth_path;
use crate::surface::{Color, DrawingSurface, SurfaceError, decode_png_data_url};

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Bind to `canvas`, acquiring its 2D context.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Unmounted`] if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let context: Option<js_sys::Object> = canvas.get_context("2d").map_err(js_error)?;
        let ctx = context
            .ok_or(SurfaceError::Unmounted)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Unmounted)?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn bounds(&self) -> Option<SurfaceBounds> {
        if !self.canvas.is_connected() {
            return None;
        }
        let rect = self.canvas.get_bounding_client_rect();
        Some(SurfaceBounds::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }
}

impl DrawingSurface for CanvasSurface {
    type Snapshot = ImageData;

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn map_to_surface_space(&self, event: &PointerEvent) -> Option<Point> {
        coords::client_to_surface(event.client?, self.bounds()?, self.canvas.width(), self.canvas.height())
    }

    fn render_segment(&mut self, points: &[StrokePoint], width: f64, color: Color) -> Result<(), SurfaceError> {
        let Some(path) = smooth_path(points) else {
            return Ok(());
        };
        self.ctx.begin_path();
        self.ctx.move_to(path.start.x, path.start.y);
        for seg in &path.segments {
            self.ctx
                .quadratic_curve_to(seg.ctrl.x, seg.ctrl.y, seg.end.x, seg.end.y);
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.ctx.stroke();
        Ok(())
    }

    fn fill_dot(&mut self, center: Point, radius: f64, color: Color) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, TAU)
            .map_err(js_error)?;
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        Ok(())
    }

    fn snapshot(&self) -> Result<ImageData, SurfaceError> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Err(SurfaceError::Unmounted);
        }
        self.ctx
            .get_image_data(0.0, 0.0, f64::from(w), f64::from(h))
            .map_err(js_error)
    }

    fn restore(&mut self, snapshot: &ImageData) -> Result<(), SurfaceError> {
        let (w, h) = self.size();
        if snapshot.width() != w || snapshot.height() != h {
            return Err(SurfaceError::SizeMismatch {
                expected_w: w,
                expected_h: h,
                actual_w: snapshot.width(),
                actual_h: snapshot.height(),
            });
        }
        self.ctx.put_image_data(snapshot, 0.0, 0.0).map_err(js_error)
    }

    fn blank(&mut self) -> Result<(), SurfaceError> {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
        self.ctx.set_fill_style_str(&Color::WHITE.to_css());
        self.ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
        Ok(())
    }

    fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        decode_png_data_url(&self.export_data_url()?)
    }

    fn export_data_url(&self) -> Result<String, SurfaceError> {
        self.canvas
            .to_data_url_with_type("image/png")
            .map_err(js_error)
    }
}

impl DrawingSession<CanvasSurface> {
    /// Mount a session directly on a `<canvas>` element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element has no 2D context.
    pub fn for_canvas(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        Ok(Self::new(CanvasSurface::new(canvas)?))
    }
}

fn js_error(err: JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{err:?}"))
}
