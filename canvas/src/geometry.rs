//! Screen ↔ image projection for the blueprint overlay.
//!
//! Annotation points are always stored in the image's natural pixel space so
//! they stay pixel-accurate whatever size the image is displayed at. The
//! [`Projection`] tracks where the image is currently rendered inside its
//! container and converts pointer positions (client coordinates, CSS pixels)
//! into that space and back.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either screen space or image natural-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// A screen-space rectangle in CSS pixels, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Measured layout of the displayed image.
///
/// `container` and `image` are both in client coordinates. `natural_width` /
/// `natural_height` are the decoded image dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFrame {
    pub container: Rect,
    pub image: Rect,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl GeometryFrame {
    /// Offset of the rendered image's top-left corner inside the container.
    #[must_use]
    pub fn image_offset(&self) -> Point {
        Point::new(self.image.x - self.container.x, self.image.y - self.container.y)
    }

    /// Natural pixels per rendered CSS pixel, per axis.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        (self.natural_width / self.image.width, self.natural_height / self.image.height)
    }

    /// Convert a client-space point to image natural-pixel space.
    #[must_use]
    pub fn to_image_space(&self, screen: Point) -> Point {
        let offset = self.image_offset();
        let (sx, sy) = self.scale();
        Point {
            x: ((screen.x - self.container.x) - offset.x) * sx,
            y: ((screen.y - self.container.y) - offset.y) * sy,
        }
    }

    /// Convert an image-space point to overlay coordinates (relative to the container).
    #[must_use]
    pub fn to_container_space(&self, image: Point) -> Point {
        let offset = self.image_offset();
        let (sx, sy) = self.scale();
        Point { x: image.x / sx + offset.x, y: image.y / sy + offset.y }
    }

    /// Convert an image-space point back to client coordinates.
    #[must_use]
    pub fn to_screen_space(&self, image: Point) -> Point {
        let local = self.to_container_space(image);
        Point { x: local.x + self.container.x, y: local.y + self.container.y }
    }

    /// Scale a screen-space delta into natural pixels without re-projecting a position.
    #[must_use]
    pub fn screen_delta_to_image(&self, dx: f64, dy: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (dx * sx, dy * sy)
    }
}

/// Geometry manager: owns the current [`GeometryFrame`] and the image source it belongs to.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    source: Option<String>,
    frame: Option<GeometryFrame>,
}

impl Projection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the displayed image source. A different source clears the frame at once
    /// so mappings for the previous image are never used while the new one loads.
    ///
    /// Returns `true` if the frame was invalidated.
    pub fn set_image_source(&mut self, source: Option<&str>) -> bool {
        if self.source.as_deref() == source {
            return false;
        }
        self.source = source.map(str::to_owned);
        self.frame = None;
        log::debug!("canvas: image source changed, geometry frame cleared");
        true
    }

    /// Store a new frame from measured layout.
    ///
    /// Silently ignored when the container is not mounted, the image has not
    /// decoded yet (no natural size), or the image is not laid out. Returns
    /// whether a frame was stored.
    pub fn measure(&mut self, container: Option<Rect>, image: Rect, natural_width: f64, natural_height: f64) -> bool {
        let Some(container) = container else {
            return false;
        };
        if !is_positive(natural_width) || !is_positive(natural_height) {
            return false;
        }
        if !is_positive(image.width) || !is_positive(image.height) {
            return false;
        }
        self.frame = Some(GeometryFrame { container, image, natural_width, natural_height });
        true
    }

    /// Drop the current frame without changing the source, e.g. when the image fails to load.
    pub fn invalidate(&mut self) {
        self.frame = None;
    }

    /// The current frame, if one has been measured for the current source.
    #[must_use]
    pub fn frame(&self) -> Option<&GeometryFrame> {
        self.frame.as_ref()
    }

    /// Convert a client-space point to image space. Returns `(0, 0)` without a frame.
    #[must_use]
    pub fn to_image_space(&self, screen: Point) -> Point {
        self.frame
            .map_or_else(Point::default, |frame| frame.to_image_space(screen))
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
