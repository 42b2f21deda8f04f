//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (DOM events, layout measurement)
//! from the component so the mapping rules can be tested natively.

pub mod canvas_input;
pub mod canvas_viewport;
