//! The drawing session: pointer handlers, frame loop, undo and clear.
//!
//! `DrawingSession` is generic over the [`DrawingSurface`] so the whole input
//! pipeline can be exercised against [`crate::raster::Raster`] in tests and
//! run unchanged against a browser canvas. Handlers never fail: surface errors
//! and unmappable events are logged and dropped. Each handler returns the
//! [`Action`]s the host must carry out (start/stop its frame loop, repaint,
//! refresh undo buttons).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BASE_WIDTH, TOUCH_MOUSE_SUPPRESS_MS};
use crate::history::StrokeHistory;
use crate::input::{PointerEvent, StrokePoint, TouchGuard};
use crate::smoother::{FinishedStroke, StrokeSmoother};
use crate::surface::{Color, DrawingSurface, SurfaceError};

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Begin calling [`DrawingSession::frame`] once per display frame.
    StartFrameLoop,
    /// Stop the frame loop.
    StopFrameLoop,
    /// The surface changed and should be presented.
    RenderNeeded,
    /// A stroke was committed to the undo history.
    StrokeCommitted { history_len: usize },
    /// Undo or clear changed the history.
    HistoryChanged { history_len: usize },
}

/// Pen color and nominal width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenSettings {
    pub color: Color,
    pub base_width: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self { color: Color::BLACK, base_width: DEFAULT_BASE_WIDTH }
    }
}

/// One mounted drawing surface with its stroke and undo state.
pub struct DrawingSession<S: DrawingSurface> {
    surface: S,
    pen: PenSettings,
    smoother: StrokeSmoother<S::Snapshot>,
    history: StrokeHistory<S::Snapshot>,
    touch_guard: TouchGuard,
}

impl<S: DrawingSurface> DrawingSession<S> {
    /// Mount a session on `surface`, blanking it.
    pub fn new(mut surface: S) -> Self {
        if let Err(e) = surface.blank() {
            warn!("blanking surface on mount failed: {e}");
        }
        Self {
            surface,
            pen: PenSettings::default(),
            smoother: StrokeSmoother::new(),
            history: StrokeHistory::new(),
            touch_guard: TouchGuard::default(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-side layout updates.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn pen(&self) -> PenSettings {
        self.pen
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() && !self.smoother.is_drawing()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.smoother.is_drawing()
    }

    /// Samples in the live stroke buffer.
    #[must_use]
    pub fn live_points(&self) -> &[StrokePoint] {
        self.smoother.points()
    }

    // --- Pen ---

    pub fn set_pen(&mut self, pen: PenSettings) {
        self.pen = pen;
    }

    pub fn set_color(&mut self, color: Color) {
        self.pen.color = color;
    }

    /// Set the nominal width. Non-positive or non-finite widths are ignored.
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.pen.base_width = width;
        }
    }

    // --- Input events ---

    /// Pointer-down / touch-start.
    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Vec<Action> {
        if !self.touch_guard.accept(event, TOUCH_MOUSE_SUPPRESS_MS) {
            return Vec::new();
        }
        let Some(at) = self.surface.map_to_surface_space(event) else {
            debug!("pointer-down without a surface coordinate; ignored");
            return Vec::new();
        };

        let mut actions = Vec::new();
        if self.smoother.is_drawing() {
            // A second pointer-down without an up: commit what we have first.
            actions.extend(self.end_stroke());
        }

        let before = match self.surface.snapshot() {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("pre-stroke snapshot failed: {e}");
                None
            }
        };
        self.smoother
            .begin(StrokePoint::new(at, event.pressure), self.pen.base_width, before);
        actions.push(Action::StartFrameLoop);
        actions
    }

    /// Pointer-move / touch-move. Samples are buffered; drawing happens in [`Self::frame`].
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Vec<Action> {
        if !self.touch_guard.accept(event, TOUCH_MOUSE_SUPPRESS_MS) || !self.smoother.is_drawing() {
            return Vec::new();
        }
        let Some(at) = self.surface.map_to_surface_space(event) else {
            return Vec::new();
        };
        self.smoother.push(StrokePoint::new(at, event.pressure));
        Vec::new()
    }

    /// Pointer-up, pointer-leave, touch-end and touch-cancel all end the stroke.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Vec<Action> {
        if !self.touch_guard.accept(event, TOUCH_MOUSE_SUPPRESS_MS) {
            return Vec::new();
        }
        self.end_stroke()
    }

    /// Render one frame of the live stroke. Call once per display frame
    /// between `StartFrameLoop` and `StopFrameLoop`.
    pub fn frame(&mut self) -> Vec<Action> {
        match self
            .smoother
            .render_frame(&mut self.surface, self.pen.base_width, self.pen.color)
        {
            Ok(true) => vec![Action::RenderNeeded],
            Ok(false) => Vec::new(),
            Err(e) => {
                warn!("frame render failed: {e}");
                Vec::new()
            }
        }
    }

    /// End the active stroke without an event (e.g. the host lost capture).
    /// A no-op when no stroke is active.
    pub fn end_stroke(&mut self) -> Vec<Action> {
        if self.smoother.has_pending_frame() {
            // Samples that arrived after the last frame still belong on the surface.
            self.frame();
        }
        let Some(stroke) = self.smoother.finish() else {
            return Vec::new();
        };

        if stroke.is_tap() {
            if let Err(e) = self.paint_tap(&stroke) {
                warn!("tap render failed: {e}");
            }
        }

        let mut actions = vec![Action::StopFrameLoop];
        match self.surface.snapshot() {
            Ok(snapshot) => {
                self.history.commit(snapshot);
                actions.push(Action::StrokeCommitted { history_len: self.history.len() });
            }
            Err(e) => warn!("post-stroke snapshot failed; stroke not undoable: {e}"),
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn paint_tap(&mut self, stroke: &FinishedStroke<S::Snapshot>) -> Result<(), SurfaceError> {
        if let Some(before) = &stroke.before {
            self.surface.restore(before)?;
        }
        self.surface
            .fill_dot(stroke.origin.point(), self.pen.base_width / 2.0, self.pen.color)
    }

    // --- History ---

    /// Undo the last committed stroke. Ignored while a stroke is active.
    pub fn undo(&mut self) -> Vec<Action> {
        if self.smoother.is_drawing() {
            return Vec::new();
        }
        match self.history.undo(&mut self.surface) {
            Ok(true) => vec![Action::HistoryChanged { history_len: self.history.len() }, Action::RenderNeeded],
            Ok(false) => Vec::new(),
            Err(e) => {
                warn!("undo failed; surface and history unchanged: {e}");
                Vec::new()
            }
        }
    }

    /// Blank the surface and drop all history, abandoning any active stroke.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.smoother.finish().is_some() {
            actions.push(Action::StopFrameLoop);
        }
        if let Err(e) = self.history.clear(&mut self.surface) {
            warn!("clear failed: {e}");
        }
        actions.push(Action::HistoryChanged { history_len: 0 });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Return to the freshly-mounted state after a successful submit.
    /// The pen is kept.
    pub fn reset(&mut self) -> Vec<Action> {
        self.touch_guard = TouchGuard::default();
        self.clear()
    }

    // --- Export ---

    /// PNG bytes of the current surface.
    ///
    /// # Errors
    ///
    /// Returns the surface's encoding error.
    pub fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.surface.export_png()
    }

    /// `data:image/png;base64,...` URL of the current surface, as submitted
    /// with a handwritten message.
    ///
    /// # Errors
    ///
    /// Returns the surface's encoding error.
    pub fn export_data_url(&self) -> Result<String, SurfaceError> {
        self.surface.export_data_url()
    }
}
