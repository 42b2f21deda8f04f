#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::annotation::{Annotation, AnnotationId};
use crate::consts::DEGENERATE_SEGMENT_SQ;
use crate::geometry::{GeometryFrame, Point};

/// Find the topmost finished annotation whose rendered path passes within
/// `slop_px` of `screen_pt` (client coordinates).
///
/// In-progress annotations and the one currently being drawn (`skip`) are
/// never hit. Later entries are drawn on top, so the search runs back to front.
#[must_use]
pub fn hit_test(
    screen_pt: Point,
    annotations: &[Annotation],
    frame: &GeometryFrame,
    slop_px: f64,
    skip: Option<AnnotationId>,
) -> Option<AnnotationId> {
    annotations
        .iter()
        .rev()
        .filter(|a| a.is_finished() && Some(a.id) != skip)
        .find(|a| path_distance(screen_pt, a, frame) <= slop_px)
        .map(|a| a.id)
}

/// Screen-space distance from `screen_pt` to the annotation's rendered polyline.
fn path_distance(screen_pt: Point, annotation: &Annotation, frame: &GeometryFrame) -> f64 {
    let projected: Vec<Point> = annotation
        .points
        .iter()
        .map(|p| frame.to_screen_space(*p))
        .collect();
    match projected.as_slice() {
        [] => f64::INFINITY,
        [only] => distance(screen_pt, *only),
        pts => pts
            .windows(2)
            .map(|w| distance_to_segment(screen_pt, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < DEGENERATE_SEGMENT_SQ {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
