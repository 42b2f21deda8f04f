//! Input model: modifier keys, mouse buttons, viewer role, and the gesture state machine.
//!
//! `InputState` is the interaction currently in progress. Drawing and
//! dragging each carry a session holding everything needed to compute the
//! next path without consulting the (page-owned) annotation snapshot.
//!
//! ## Finishing a drawing
//!
//! A double-click arrives after two ordinary clicks, and each of those clicks
//! already appended a point. The second of them is an artifact of the
//! gesture, so [`FinishGesture::DoubleActivation`] drops the last point
//! before the path is validated. [`FinishGesture::Confirm`] (a key press)
//! keeps every point. Any input backend must report these gestures
//! explicitly instead of relying on its own event order.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::annotation::AnnotationId;
use crate::consts::MIN_PATH_POINTS;
use crate::geometry::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"z"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Keyboard commands the canvas understands while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    Finish,
    Cancel,
}

impl KeyCommand {
    /// Map a key press to a command.
    ///
    /// Cmd/Ctrl+Z undoes, Cmd/Ctrl+Shift+Z or Cmd/Ctrl+Y redoes, Enter
    /// finishes and Escape cancels.
    #[must_use]
    pub fn from_key(key: &Key, modifiers: Modifiers) -> Option<Self> {
        let name = key.0.as_str();
        if modifiers.command() {
            if name.eq_ignore_ascii_case("z") {
                return Some(if modifiers.shift { Self::Redo } else { Self::Undo });
            }
            if name.eq_ignore_ascii_case("y") {
                return Some(Self::Redo);
            }
            return None;
        }
        match name {
            "Enter" => Some(Self::Finish),
            "Escape" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Whether the viewer may rearrange annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerRole {
    /// Managers: select, drag, and draw.
    #[default]
    Interactive,
    /// Workers: select only.
    ReadOnly,
}

/// Page-controlled UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Annotation currently being drawn, as chosen by the page.
    pub active_id: Option<AnnotationId>,
    /// Annotation highlighted by the page.
    pub selected_id: Option<AnnotationId>,
    pub role: ViewerRole,
    /// Identity of the current viewer, for ownership display.
    pub viewer_id: Option<String>,
}

/// How the user asked to finish a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishGesture {
    /// A double-click; its second click appended a spurious point.
    DoubleActivation,
    /// An explicit confirmation with no extra point.
    Confirm,
}

/// Result of finishing a drawing session.
#[derive(Debug, Clone, PartialEq)]
pub enum Finish {
    /// The path is long enough to keep.
    Completed(Vec<Point>),
    /// Too few points remained; the annotation should be discarded.
    Abandoned,
}

/// Points placed so far for the annotation being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    pub id: AnnotationId,
    pub points: Vec<Point>,
    /// Points removed by undo, most recent last.
    pub redo: Vec<Point>,
    /// Last pointer position in image space, for the rubber-band preview.
    pub pointer: Option<Point>,
}

impl DrawingSession {
    #[must_use]
    pub fn new(id: AnnotationId) -> Self {
        Self { id, points: Vec::new(), redo: Vec::new(), pointer: None }
    }

    /// Append a point from direct input. Invalidates redo history.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
        self.redo.clear();
    }

    /// Move the last point onto the redo stack. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(point) = self.points.pop() else {
            return false;
        };
        self.redo.push(point);
        true
    }

    /// Restore the most recently undone point. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(point) = self.redo.pop() else {
            return false;
        };
        self.points.push(point);
        true
    }

    /// Consume the session and produce the final path.
    #[must_use]
    pub fn finish(mut self, gesture: FinishGesture) -> Finish {
        if gesture == FinishGesture::DoubleActivation {
            self.points.pop();
        }
        if self.points.len() < MIN_PATH_POINTS {
            Finish::Abandoned
        } else {
            Finish::Completed(self.points)
        }
    }
}

/// A finished path being moved by the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: AnnotationId,
    /// Pointer position at drag start, in client coordinates.
    pub start_screen: Point,
    /// The path as it was at drag start.
    pub snapshot: Vec<Point>,
}

impl DragSession {
    /// The snapshot translated by an image-space delta.
    ///
    /// Always computed from the snapshot, so repeated moves never accumulate error.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Vec<Point> {
        self.snapshot.iter().map(|p| p.offset(dx, dy)).collect()
    }
}

/// The interaction in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// Waiting for the page to activate a drawing or the pointer to press on a path.
    #[default]
    Idle,
    Drawing(DrawingSession),
    Dragging(DragSession),
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn drawing(&self) -> Option<&DrawingSession> {
        match self {
            Self::Drawing(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn dragging(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }
}
