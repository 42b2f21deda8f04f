//! Annotation canvas engine for blueprint images.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It overlays
//! a displayed blueprint image with vector annotations: it maps pointer
//! positions into the image's natural pixel space, drives the draw / undo /
//! redo / drag state machine, hit-tests paths, and renders the overlay. The
//! host layer is responsible only for wiring DOM events to the engine and
//! forwarding the resulting [`engine::Action`]s to the owning page, which
//! persists them and feeds the updated annotation list back in.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`annotation`] | Annotation model, ownership, and id generation |
//! | [`geometry`] | Geometry frame and screen ↔ image projection |
//! | [`input`] | Input event types and the drawing/drag sessions |
//! | [`hit`] | Hit-testing against rendered paths |
//! | [`render`] | Overlay rendering to a 2D canvas |
//! | [`config`] | Tunable hit slop, stroke sizes, and colors |
//! | [`error`] | [`error::CanvasError`] |
//! | [`consts`] | Shared numeric defaults |

pub mod annotation;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
