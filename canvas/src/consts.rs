//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around a rendered path.
pub const HIT_SLOP_PX: f64 = 8.0;

/// Squared segment length below which a segment is treated as a single point.
pub const DEGENERATE_SEGMENT_SQ: f64 = 1e-12;

// ── Drawing ─────────────────────────────────────────────────────

/// Minimum number of points for a finished path.
pub const MIN_PATH_POINTS: usize = 2;

// ── Rendering ───────────────────────────────────────────────────

/// Stroke width for annotation paths, in screen pixels.
pub const STROKE_WIDTH_PX: f64 = 3.0;

/// Stroke width for the selected annotation, in screen pixels.
pub const SELECTED_STROKE_WIDTH_PX: f64 = 5.0;

/// Radius of vertex dots, in screen pixels.
pub const VERTEX_RADIUS_PX: f64 = 4.0;

/// Font size of assignee labels, in screen pixels.
pub const LABEL_FONT_PX: f64 = 12.0;

/// Dash segment length for the rubber-band preview, in screen pixels.
pub const PREVIEW_DASH_PX: f64 = 6.0;
