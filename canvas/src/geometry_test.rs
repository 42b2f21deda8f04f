#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// Container at (100, 50), 800x600. Image letterboxed at (200, 50), 400x300,
/// natural size 2000x1500 (scale 5x on both axes).
fn letterboxed() -> GeometryFrame {
    GeometryFrame {
        container: Rect::new(100.0, 50.0, 800.0, 600.0),
        image: Rect::new(200.0, 50.0, 400.0, 300.0),
        natural_width: 2000.0,
        natural_height: 1500.0,
    }
}

fn measured(frame: GeometryFrame) -> Projection {
    let mut proj = Projection::new();
    proj.set_image_source(Some("blueprint.png"));
    assert!(proj.measure(Some(frame.container), frame.image, frame.natural_width, frame.natural_height));
    proj
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_offset() {
    let p = Point::new(1.0, 2.0).offset(3.0, -4.0);
    assert_eq!(p, Point::new(4.0, -2.0));
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(Point::new(1.5, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": 2.0 }));
}

// =============================================================
// GeometryFrame
// =============================================================

#[test]
fn frame_image_offset_is_relative_to_container() {
    let offset = letterboxed().image_offset();
    assert_eq!(offset, Point::new(100.0, 0.0));
}

#[test]
fn frame_scale_is_natural_over_rendered() {
    let (sx, sy) = letterboxed().scale();
    assert!(approx_eq(sx, 5.0));
    assert!(approx_eq(sy, 5.0));
}

#[test]
fn frame_image_top_left_maps_to_origin() {
    let p = letterboxed().to_image_space(Point::new(200.0, 50.0));
    assert!(point_approx_eq(p, Point::new(0.0, 0.0)));
}

#[test]
fn frame_image_bottom_right_maps_to_natural_size() {
    let p = letterboxed().to_image_space(Point::new(600.0, 350.0));
    assert!(point_approx_eq(p, Point::new(2000.0, 1500.0)));
}

#[test]
fn frame_non_uniform_scale_is_per_axis() {
    let frame = GeometryFrame {
        container: Rect::new(0.0, 0.0, 400.0, 100.0),
        image: Rect::new(0.0, 0.0, 400.0, 100.0),
        natural_width: 800.0,
        natural_height: 400.0,
    };
    let p = frame.to_image_space(Point::new(100.0, 50.0));
    assert!(point_approx_eq(p, Point::new(200.0, 200.0)));
}

#[test]
fn frame_round_trip_reproduces_screen_point() {
    let frame = letterboxed();
    for screen in [Point::new(200.0, 50.0), Point::new(333.3, 123.4), Point::new(599.9, 349.1)] {
        let back = frame.to_screen_space(frame.to_image_space(screen));
        assert!(point_approx_eq(back, screen), "{screen:?} -> {back:?}");
    }
}

#[test]
fn frame_container_space_excludes_container_origin() {
    let frame = letterboxed();
    let local = frame.to_container_space(Point::new(0.0, 0.0));
    assert!(point_approx_eq(local, Point::new(100.0, 0.0)));
}

#[test]
fn frame_screen_delta_scales_without_offset() {
    let (dx, dy) = letterboxed().screen_delta_to_image(10.0, -4.0);
    assert!(approx_eq(dx, 50.0));
    assert!(approx_eq(dy, -20.0));
}

// =============================================================
// Projection
// =============================================================

#[test]
fn projection_starts_invalid() {
    let proj = Projection::new();
    assert!(proj.frame().is_none());
    assert!(proj.frame().is_none());
}

#[test]
fn projection_without_frame_returns_origin() {
    let proj = Projection::new();
    assert_eq!(proj.to_image_space(Point::new(300.0, 200.0)), Point::new(0.0, 0.0));
}

#[test]
fn projection_measure_stores_frame() {
    let proj = measured(letterboxed());
    assert!(proj.frame().is_some());
    let p = proj.to_image_space(Point::new(400.0, 200.0));
    assert!(point_approx_eq(p, Point::new(1000.0, 750.0)));
}

#[test]
fn projection_measure_without_container_is_noop() {
    let mut proj = Projection::new();
    assert!(!proj.measure(None, Rect::new(0.0, 0.0, 10.0, 10.0), 100.0, 100.0));
    assert!(proj.frame().is_none());
}

#[test]
fn projection_measure_before_decode_is_noop() {
    let mut proj = Projection::new();
    let container = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(!proj.measure(container, Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 0.0));
    assert!(!proj.measure(container, Rect::new(0.0, 0.0, 10.0, 10.0), f64::NAN, 10.0));
    assert!(proj.frame().is_none());
}

#[test]
fn projection_measure_with_unlaid_image_is_noop() {
    let mut proj = Projection::new();
    let container = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(!proj.measure(container, Rect::new(0.0, 0.0, 0.0, 10.0), 100.0, 100.0));
    assert!(proj.frame().is_none());
}

#[test]
fn projection_measure_failure_keeps_previous_frame() {
    let mut proj = measured(letterboxed());
    assert!(!proj.measure(None, Rect::new(0.0, 0.0, 10.0, 10.0), 100.0, 100.0));
    assert_eq!(proj.frame().copied(), Some(letterboxed()));
}

#[test]
fn projection_source_change_clears_frame() {
    let mut proj = measured(letterboxed());
    assert!(proj.set_image_source(Some("other.png")));
    assert!(proj.frame().is_none());
    assert_eq!(proj.to_image_space(Point::new(400.0, 200.0)), Point::new(0.0, 0.0));
    assert!(!proj.set_image_source(Some("other.png")));
}

#[test]
fn projection_same_source_keeps_frame() {
    let mut proj = measured(letterboxed());
    assert!(!proj.set_image_source(Some("blueprint.png")));
    assert!(proj.frame().is_some());
}

#[test]
fn projection_clearing_source_clears_frame() {
    let mut proj = measured(letterboxed());
    assert!(proj.set_image_source(None));
    assert!(proj.frame().is_none());
    assert!(!proj.set_image_source(None));
}

#[test]
fn projection_remeasure_after_resize_updates_mapping() {
    let mut proj = measured(letterboxed());
    proj.measure(Some(Rect::new(0.0, 0.0, 1000.0, 750.0)), Rect::new(0.0, 0.0, 1000.0, 750.0), 2000.0, 1500.0);
    let p = proj.to_image_space(Point::new(500.0, 375.0));
    assert!(point_approx_eq(p, Point::new(1000.0, 750.0)));
}

#[test]
fn projection_invalidate_drops_frame_but_keeps_source() {
    let mut proj = measured(letterboxed());
    proj.invalidate();
    assert!(proj.frame().is_none());
    assert!(!proj.set_image_source(Some("blueprint.png")));
}
