//! Leptos host for the blueprint annotation canvas.
//!
//! SYSTEM CONTEXT
//! ==============
//! The owning page holds the annotation list and persists every change. This
//! crate mounts `blueprint_canvas::engine::Engine` over a blueprint image,
//! feeds page state into it, and reports the engine's actions back through
//! the page's callbacks.

pub mod components;
pub mod util;

pub use components::blueprint_canvas::{BlueprintCanvas, CanvasCallbacks};

/// Install the browser console logger and panic hook.
///
/// Call once from the page's hydrate entry point.
#[cfg(feature = "hydrate")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {err}");
    }
}
