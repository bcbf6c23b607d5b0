//! Handwriting capture engine for the invitation message form.
//!
//! This crate runs natively and compiled to WebAssembly. It owns the drawing
//! side of a handwritten message: translating raw mouse/touch events into
//! surface coordinates, smoothing live strokes with pressure-reactive width,
//! redrawing taps as dots, and keeping a full-raster undo history. The host
//! page is responsible only for wiring DOM events and the animation frame to a
//! [`session::DrawingSession`] and submitting the exported PNG.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Top-level [`session::DrawingSession`]: handlers, frame loop, undo/clear |
//! | [`smoother`] | Live point buffer, midpoint-quadratic path, width easing |
//! | [`history`] | Full-snapshot undo history |
//! | [`surface`] | The [`surface::DrawingSurface`] trait, colors, PNG data URLs |
//! | [`raster`] | In-memory RGBA surface |
//! | [`web`] | Browser `<canvas>` surface |
//! | [`coords`] | Points and client-to-bitmap mapping |
//! | [`input`] | Pointer events, pressure, touch/mouse de-duplication |
//! | [`consts`] | Shared numeric constants (widths, smoothing, windows) |

pub mod consts;
pub mod coords;
pub mod history;
pub mod input;
pub mod raster;
pub mod session;
pub mod smoother;
pub mod surface;
pub mod web;
