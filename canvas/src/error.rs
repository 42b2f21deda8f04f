//! Error type for fallible canvas operations.

/// Error returned by engine construction, rendering, and configuration parsing.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The canvas element did not provide a 2D rendering context.
    #[error("canvas 2d context unavailable")]
    ContextUnavailable,
    /// A `Canvas2D` call failed while drawing.
    #[error("render failed: {0}")]
    Render(String),
    /// Configuration JSON could not be parsed.
    #[error("invalid canvas config: {0}")]
    Config(#[from] serde_json::Error),
}
