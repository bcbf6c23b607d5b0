//! Shared numeric constants for the canvas crate.

// ── Pen ─────────────────────────────────────────────────────────

/// Default pen width in bitmap pixels.
pub const DEFAULT_BASE_WIDTH: f64 = 3.0;

/// Pen widths offered by the message form: thin, medium, thick, bold.
pub const PEN_WIDTHS: [f64; 4] = [2.0, 3.0, 5.0, 8.0];

/// Pen colors offered by the message form: black, red, blue, green, purple, orange.
pub const PEN_COLORS: [&str; 6] = ["#000000", "#EF4444", "#3B82F6", "#10B981", "#8B5CF6", "#F59E0B"];

// ── Pressure ────────────────────────────────────────────────────

/// Pressure assumed when the device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Lower clamp for reported pressure.
pub const MIN_PRESSURE: f64 = 0.1;

/// Upper clamp for reported pressure.
pub const MAX_PRESSURE: f64 = 1.0;

// ── Smoothing ───────────────────────────────────────────────────

/// Fraction of the gap between rendered and target width closed each frame.
pub const WIDTH_SMOOTHING: f64 = 0.3;

/// Points kept in the live buffer after each rendered frame.
pub const LIVE_POINT_WINDOW: usize = 10;

/// Minimum sampled points for a stroke to render as a curve; fewer is a tap.
pub const MIN_CURVE_POINTS: usize = 3;

/// Line segments used to flatten one quadratic segment on the software raster.
pub const QUAD_FLATTEN_STEPS: usize = 16;

// ── Input ───────────────────────────────────────────────────────

/// Window after a touch event during which mouse events are treated as synthetic.
pub const TOUCH_MOUSE_SUPPRESS_MS: f64 = 500.0;
