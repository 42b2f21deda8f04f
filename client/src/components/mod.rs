//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components wrap the imperative canvas engine in Leptos props and
//! callbacks so a page can drop an annotation surface into its layout.

pub mod blueprint_canvas;
