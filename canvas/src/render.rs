//! Rendering: draws annotations onto the overlay canvas.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels; it does not mutate anything.
//! Paths are projected from image space into container space through the
//! current [`GeometryFrame`], so stroke widths stay constant on screen at
//! any image size. Nothing is drawn until a frame has been measured.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) maps the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::annotation::Annotation;
use crate::config::CanvasConfig;
use crate::consts::PREVIEW_DASH_PX;
use crate::engine::EngineCore;
use crate::geometry::{GeometryFrame, Point};
use crate::input::DrawingSession;

/// Gap between a path's first vertex and its assignee label, in screen pixels.
const LABEL_OFFSET_PX: f64 = 6.0;

/// Padding around label text, in screen pixels.
const LABEL_PADDING_PX: f64 = 3.0;

/// Draw the full overlay: finished annotations, then the drawing in progress.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    // Layer 1: clear in CSS pixels.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);

    let Some(frame) = core.frame() else {
        return Ok(());
    };
    let config = &core.config;
    let active = core.active();
    let viewer = core.ui.viewer_id.as_deref();

    // Layer 2: finished annotations in list order (later on top).
    for ann in &core.annotations {
        if Some(ann.id) == active || ann.points.is_empty() {
            continue;
        }
        let selected = core.ui.selected_id == Some(ann.id);
        draw_annotation(ctx, ann, frame, config, selected, ann.is_owned_by(viewer))?;
    }

    // Layer 3: drawing in progress.
    if let Some(session) = core.input.drawing() {
        draw_session(ctx, session, frame, config)?;
    }

    Ok(())
}

// =============================================================
// Annotations
// =============================================================

fn draw_annotation(
    ctx: &CanvasRenderingContext2d,
    ann: &Annotation,
    frame: &GeometryFrame,
    config: &CanvasConfig,
    selected: bool,
    owned: bool,
) -> Result<(), JsValue> {
    let pts = project(&ann.points, frame);
    let color = if ann.completed { config.completed_color.as_str() } else { config.kind_color(ann.kind) };

    ctx.save();
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    if selected {
        ctx.set_stroke_style_str(&config.selected_color);
        ctx.set_line_width(config.selected_stroke_width_px * 2.0);
        stroke_polyline(ctx, &pts);
    }

    ctx.set_stroke_style_str(color);
    ctx.set_line_width(if selected { config.selected_stroke_width_px } else { config.stroke_width_px });
    stroke_polyline(ctx, &pts);

    if owned || selected {
        draw_vertices(ctx, &pts, color, config.vertex_radius_px)?;
    }

    if let (Some(assignee), Some(first)) = (&ann.assignee, pts.first()) {
        draw_label(ctx, &assignee.name, *first, color, config.label_font_px)?;
    }

    ctx.restore();
    Ok(())
}

fn draw_session(
    ctx: &CanvasRenderingContext2d,
    session: &DrawingSession,
    frame: &GeometryFrame,
    config: &CanvasConfig,
) -> Result<(), JsValue> {
    let pts = project(&session.points, frame);

    ctx.save();
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(&config.drawing_color);
    ctx.set_line_width(config.stroke_width_px);
    stroke_polyline(ctx, &pts);

    // Rubber band from the last vertex to the pointer.
    if let (Some(last), Some(pointer)) = (pts.last(), session.pointer) {
        let pointer = frame.to_container_space(pointer);
        let dash = js_sys::Array::new();
        dash.push(&PREVIEW_DASH_PX.into());
        dash.push(&PREVIEW_DASH_PX.into());
        ctx.set_line_dash(&dash)?;
        ctx.begin_path();
        ctx.move_to(last.x, last.y);
        ctx.line_to(pointer.x, pointer.y);
        ctx.stroke();
        ctx.set_line_dash(&js_sys::Array::new())?;
    }

    draw_vertices(ctx, &pts, &config.drawing_color, config.vertex_radius_px)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Primitives
// =============================================================

fn stroke_polyline(ctx: &CanvasRenderingContext2d, pts: &[Point]) {
    let Some((first, rest)) = pts.split_first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
}

fn draw_vertices(ctx: &CanvasRenderingContext2d, pts: &[Point], color: &str, radius: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.5);
    for p in pts {
        ctx.begin_path();
        ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, anchor: Point, color: &str, font_px: f64) -> Result<(), JsValue> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    ctx.save();
    ctx.set_font(&format!("{font_px}px sans-serif"));
    ctx.set_text_baseline("bottom");
    ctx.set_text_align("left");

    let x = anchor.x + LABEL_OFFSET_PX;
    let y = anchor.y - LABEL_OFFSET_PX;
    let width = measured_text_width(ctx, text);
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
    ctx.fill_rect(
        x - LABEL_PADDING_PX,
        y - font_px - LABEL_PADDING_PX,
        width + LABEL_PADDING_PX * 2.0,
        font_px + LABEL_PADDING_PX * 2.0,
    );
    ctx.set_fill_style_str(color);
    ctx.fill_text(text, x, y)?;
    ctx.restore();
    Ok(())
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => 0.0,
    }
}

/// Project image-space points into container (overlay) coordinates.
fn project(points: &[Point], frame: &GeometryFrame) -> Vec<Point> {
    points
        .iter()
        .map(|p| frame.to_container_space(*p))
        .collect()
}
