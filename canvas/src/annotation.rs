//! Annotation model: drawn regions overlaid on a blueprint.
//!
//! Annotations arrive from the owning page as a snapshot (usually
//! deserialized from its data store) and are never mutated in place by the
//! engine. Changes flow back to the page as [`crate::engine::Action`]s and
//! return on the next [`crate::engine::EngineCore::set_annotations`].
//!
//! New identifiers come from an injected [`IdGenerator`] so tests can use
//! deterministic ids.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Unique identifier for an annotation.
pub type AnnotationId = Uuid;

/// The category of a drawn region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// A pipe run.
    #[default]
    Pipe,
    /// A joint between pipe runs.
    Connection,
}

/// The worker responsible for an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Identity of the worker in the page's user store.
    pub worker_id: String,
    /// Display name shown next to the path.
    pub name: String,
}

/// One drawn region on a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    /// Path vertices in image natural-pixel space.
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub completed: bool,
    /// True only while the path is being drawn. Never persisted.
    #[serde(skip)]
    pub in_progress: bool,
}

impl Annotation {
    /// A new, empty annotation ready to be drawn.
    #[must_use]
    pub fn begin(ids: &mut impl IdGenerator, kind: AnnotationKind) -> Self {
        Self { id: ids.next_id(), kind, points: Vec::new(), assignee: None, completed: false, in_progress: true }
    }

    /// Whether `viewer_id` is this annotation's assignee.
    ///
    /// Derived at render time from the current assignment so a reassignment
    /// is reflected immediately.
    #[must_use]
    pub fn is_owned_by(&self, viewer_id: Option<&str>) -> bool {
        match (viewer_id, &self.assignee) {
            (Some(viewer), Some(assignee)) => assignee.worker_id == viewer,
            _ => false,
        }
    }

    /// Whether the path is finished and can be hit-tested, selected, and dragged.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.in_progress && !self.points.is_empty()
    }
}

/// Source of fresh annotation identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> AnnotationId;
}

/// Random v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> AnnotationId {
        Uuid::new_v4()
    }
}

/// Deterministic identifiers counting up from a seed.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    #[must_use]
    pub fn starting_at(next: u128) -> Self {
        Self { next }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> AnnotationId {
        let id = Uuid::from_u128(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Look up an annotation by id in a snapshot.
#[must_use]
pub fn find(annotations: &[Annotation], id: AnnotationId) -> Option<&Annotation> {
    annotations.iter().find(|a| a.id == id)
}
