//! Canvas input mapping and pointer helper utilities.

#[cfg(test)]
#[path = "canvas_input_test.rs"]
mod canvas_input_test;

use blueprint_canvas::input::{Button as CanvasButton, KeyCommand, Key as CanvasKey, Modifiers as CanvasModifiers};

#[cfg(feature = "hydrate")]
use blueprint_canvas::geometry::Point as CanvasPoint;

/// Map a DOM `MouseEvent.button` value to the engine's button.
pub fn map_button(button: i16) -> CanvasButton {
    match button {
        1 => CanvasButton::Middle,
        2 => CanvasButton::Secondary,
        _ => CanvasButton::Primary,
    }
}

pub fn map_modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> CanvasModifiers {
    CanvasModifiers { shift, ctrl, alt, meta }
}

/// Whether the browser's default action for this key must be suppressed.
///
/// Only keys the canvas consumes while drawing qualify: Enter and Escape,
/// plus the undo/redo chords the browser would otherwise apply to the page.
pub fn should_prevent_default_key(key: &str, modifiers: CanvasModifiers, drawing: bool) -> bool {
    drawing && KeyCommand::from_key(&CanvasKey(key.to_owned()), modifiers).is_some()
}

/// Pointer position in client coordinates, the space `getBoundingClientRect` reports in.
#[cfg(feature = "hydrate")]
pub fn pointer_point(ev: &leptos::ev::MouseEvent) -> CanvasPoint {
    CanvasPoint::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}
