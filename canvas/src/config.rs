//! Tunable interaction and styling settings.
//!
//! The host may pass a partial JSON object; any field it omits keeps its
//! default from [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationKind;
use crate::consts::{HIT_SLOP_PX, LABEL_FONT_PX, SELECTED_STROKE_WIDTH_PX, STROKE_WIDTH_PX, VERTEX_RADIUS_PX};
use crate::error::CanvasError;

/// Canvas settings. Lengths are screen pixels; colors are CSS color strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Distance from a rendered path that still counts as a hit.
    pub hit_slop_px: f64,
    pub stroke_width_px: f64,
    pub selected_stroke_width_px: f64,
    pub vertex_radius_px: f64,
    pub label_font_px: f64,
    pub pipe_color: String,
    pub connection_color: String,
    /// Stroke for annotations marked complete, regardless of kind.
    pub completed_color: String,
    /// Halo drawn under the selected annotation.
    pub selected_color: String,
    /// Stroke for the path currently being drawn.
    pub drawing_color: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            hit_slop_px: HIT_SLOP_PX,
            stroke_width_px: STROKE_WIDTH_PX,
            selected_stroke_width_px: SELECTED_STROKE_WIDTH_PX,
            vertex_radius_px: VERTEX_RADIUS_PX,
            label_font_px: LABEL_FONT_PX,
            pipe_color: "#1E90FF".to_owned(),
            connection_color: "#E8833A".to_owned(),
            completed_color: "#3BA55C".to_owned(),
            selected_color: "rgba(255, 214, 10, 0.55)".to_owned(),
            drawing_color: "#D94B4B".to_owned(),
        }
    }
}

impl CanvasConfig {
    /// Parse settings from a JSON object, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] if `json` is not a valid settings object.
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Base stroke color for an annotation kind.
    #[must_use]
    pub fn kind_color(&self, kind: AnnotationKind) -> &str {
        match kind {
            AnnotationKind::Pipe => &self.pipe_color,
            AnnotationKind::Connection => &self.connection_color,
        }
    }
}
