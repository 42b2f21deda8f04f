use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::annotation::{self, Annotation, AnnotationId};
use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::geometry::{GeometryFrame, Point, Projection, Rect};
use crate::hit;
use crate::input::{
    Button, DragSession, DrawingSession, Finish, FinishGesture, InputState, Key, KeyCommand, Modifiers, UiState,
    ViewerRole,
};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to forward to the owning page.
///
/// Actions are emitted in the order the page must apply them. In particular a
/// finished drawing always reports its final `PathUpdated` before `DrawingFinished`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The annotation's full path changed (point added, undo/redo, drag move).
    PathUpdated { id: AnnotationId, points: Vec<Point> },
    /// Drawing completed; the path reported just before is final.
    DrawingFinished { id: AnnotationId },
    /// Drawing was canceled with points placed; the annotation stays but is no longer in progress.
    DrawingCanceled { id: AnnotationId },
    /// The annotation was abandoned and should be deleted.
    AnnotationRemoved { id: AnnotationId },
    /// The user pressed on an annotation's path.
    AnnotationSelected(Annotation),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub projection: Projection,
    /// Latest snapshot supplied by the page.
    pub annotations: Vec<Annotation>,
    pub ui: UiState,
    pub input: InputState,
    pub config: CanvasConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    cursor: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            projection: Projection::new(),
            annotations: Vec::new(),
            ui: UiState::default(),
            input: InputState::default(),
            config: CanvasConfig::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            cursor: "default".to_owned(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Set the displayed image. A new source invalidates the geometry frame.
    pub fn set_image_source(&mut self, source: Option<&str>) {
        if self.projection.set_image_source(source) {
            self.end_drag();
        }
    }

    /// Re-measure the image layout. Call on image load and on container resize.
    ///
    /// `container` is `None` while the container element is unmounted.
    pub fn measure(&mut self, container: Option<Rect>, image: Rect, natural_width: f64, natural_height: f64) {
        self.projection
            .measure(container, image, natural_width, natural_height);
    }

    /// The displayed image failed to load. Drops the frame so nothing is drawn over it.
    pub fn image_failed(&mut self) {
        log::warn!("canvas: image failed to load, geometry frame cleared");
        self.projection.invalidate();
        self.end_drag();
    }

    /// Replace the annotation snapshot.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        if let Some(drag) = self.input.dragging() {
            if annotation::find(&self.annotations, drag.id).is_none() {
                self.end_drag();
            }
        }
    }

    /// Mark an annotation as the one being drawn, or clear it.
    ///
    /// Any change resets the drawing session and drops an open drag; state
    /// is never carried over from a previous drawing.
    pub fn set_active(&mut self, id: Option<AnnotationId>) {
        if self.ui.active_id == id {
            return;
        }
        self.ui.active_id = id;
        match id {
            Some(id) => {
                log::debug!("canvas: drawing started id={id}");
                self.input = InputState::Drawing(DrawingSession::new(id));
            }
            None => {
                self.end_drag();
                self.input = InputState::Idle;
            }
        }
    }

    /// Set the page's highlighted annotation. Visual only.
    pub fn set_selected(&mut self, id: Option<AnnotationId>) {
        self.ui.selected_id = id;
    }

    /// Switch between interactive and read-only viewing.
    pub fn set_viewer_role(&mut self, role: ViewerRole) {
        self.ui.role = role;
        if role == ViewerRole::ReadOnly {
            self.end_drag();
        }
    }

    /// Set the viewer's identity, used to mark owned annotations.
    pub fn set_viewer(&mut self, viewer_id: Option<String>) {
        self.ui.viewer_id = viewer_id;
    }

    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config;
    }

    /// Record the overlay size in CSS pixels and the device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Input events ---

    /// Pointer pressed. On a finished path while idle this reports the path
    /// as selected and, for interactive viewers, opens a drag session.
    ///
    /// The highlight is left to the page: it changes only once the page
    /// feeds the selection back through [`Self::set_selected`].
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary || !self.input.is_idle() {
            return actions;
        }
        let Some(id) = self.hit(screen_pt) else {
            return actions;
        };
        let Some(target) = annotation::find(&self.annotations, id).cloned() else {
            return actions;
        };

        if self.ui.role == ViewerRole::Interactive {
            log::debug!("canvas: drag started id={id}");
            self.input =
                InputState::Dragging(DragSession { id, start_screen: screen_pt, snapshot: target.points.clone() });
            self.update_cursor("move", &mut actions);
        }
        actions.push(Action::AnnotationSelected(target));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Pointer moved. Updates the drawing preview, moves a dragged path, or updates the hover cursor.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let frame = self.projection.frame().copied();
        match &mut self.input {
            InputState::Drawing(session) => {
                if let Some(frame) = frame {
                    session.pointer = Some(frame.to_image_space(screen_pt));
                    actions.push(Action::RenderNeeded);
                }
                self.update_cursor("crosshair", &mut actions);
            }
            InputState::Dragging(drag) => {
                let Some(frame) = frame else {
                    return actions;
                };
                let points = drag_path(drag, &frame, screen_pt);
                actions.push(Action::PathUpdated { id: drag.id, points });
                actions.push(Action::RenderNeeded);
            }
            InputState::Idle => {
                let cursor = match (self.hit(screen_pt), self.ui.role) {
                    (Some(_), ViewerRole::Interactive) => "move",
                    (Some(_), ViewerRole::ReadOnly) => "pointer",
                    (None, _) => "default",
                };
                self.update_cursor(cursor, &mut actions);
            }
        }
        actions
    }

    /// Pointer released: ends any drag.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.dragging().is_none() {
            return actions;
        }
        self.end_drag();
        actions.push(Action::RenderNeeded);
        actions.extend(self.on_pointer_move(screen_pt, modifiers));
        actions
    }

    /// Pointer left the canvas: ends any drag and hides the drawing preview.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let InputState::Drawing(session) = &mut self.input {
            session.pointer = None;
            actions.push(Action::RenderNeeded);
        }
        if self.input.dragging().is_some() {
            self.end_drag();
            actions.push(Action::RenderNeeded);
        }
        self.update_cursor("default", &mut actions);
        actions
    }

    /// A primary click while drawing appends the pointer's image-space position.
    pub fn on_click(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary {
            return actions;
        }
        let Some(frame) = self.projection.frame().copied() else {
            return actions;
        };
        let InputState::Drawing(session) = &mut self.input else {
            return actions;
        };
        let point = frame.to_image_space(screen_pt);
        session.push(point);
        session.pointer = Some(point);
        actions.push(Action::PathUpdated { id: session.id, points: session.points.clone() });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// A double-click finishes the drawing, discarding the point its second click added.
    pub fn on_double_click(&mut self, _screen_pt: Point) -> Vec<Action> {
        self.finish_drawing(FinishGesture::DoubleActivation)
    }

    /// Key pressed. Undo, redo, finish and cancel only apply while drawing.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(command) = KeyCommand::from_key(&key, modifiers) else {
            return actions;
        };
        let InputState::Drawing(session) = &mut self.input else {
            return actions;
        };
        match command {
            KeyCommand::Undo | KeyCommand::Redo => {
                let changed = if command == KeyCommand::Undo { session.undo() } else { session.redo() };
                if changed {
                    actions.push(Action::PathUpdated { id: session.id, points: session.points.clone() });
                    actions.push(Action::RenderNeeded);
                }
            }
            KeyCommand::Finish => actions.extend(self.finish_drawing(FinishGesture::Confirm)),
            KeyCommand::Cancel => actions.extend(self.cancel_drawing()),
        }
        actions
    }

    /// End the drawing in progress.
    ///
    /// A path with fewer than two points after the gesture's trimming is
    /// abandoned. Otherwise the final path is reported before the finish
    /// notification.
    pub fn finish_drawing(&mut self, gesture: FinishGesture) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(session) = self.take_drawing() else {
            return actions;
        };
        let id = session.id;
        match session.finish(gesture) {
            Finish::Completed(points) => {
                log::debug!("canvas: drawing finished id={id} points={}", points.len());
                actions.push(Action::PathUpdated { id, points });
                actions.push(Action::DrawingFinished { id });
            }
            Finish::Abandoned => {
                log::debug!("canvas: drawing abandoned id={id}");
                actions.push(Action::AnnotationRemoved { id });
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Cancel the drawing in progress. An annotation with no points is removed.
    pub fn cancel_drawing(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(session) = self.take_drawing() else {
            return actions;
        };
        let id = session.id;
        if session.points.is_empty() {
            log::debug!("canvas: drawing canceled empty id={id}");
            actions.push(Action::AnnotationRemoved { id });
        } else {
            log::debug!("canvas: drawing canceled id={id} points={}", session.points.len());
            actions.push(Action::DrawingCanceled { id });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// The page-selected annotation, if any.
    #[must_use]
    pub fn selection(&self) -> Option<AnnotationId> {
        self.ui.selected_id
    }

    /// The annotation being drawn, if any.
    #[must_use]
    pub fn active(&self) -> Option<AnnotationId> {
        self.input.drawing().map(|s| s.id)
    }

    /// Points placed in the current drawing session.
    #[must_use]
    pub fn drawing_points(&self) -> &[Point] {
        match self.input.drawing() {
            Some(session) => &session.points,
            None => &[],
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.input.dragging().is_some()
    }

    #[must_use]
    pub fn frame(&self) -> Option<&GeometryFrame> {
        self.projection.frame()
    }

    /// Convert a client-space point to image space; `(0, 0)` before the image is measured.
    #[must_use]
    pub fn to_image_space(&self, screen_pt: Point) -> Point {
        self.projection.to_image_space(screen_pt)
    }

    /// Look up an annotation by ID.
    #[must_use]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        annotation::find(&self.annotations, id)
    }

    /// The cursor most recently requested via [`Action::SetCursor`].
    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    // --- Internals ---

    fn hit(&self, screen_pt: Point) -> Option<AnnotationId> {
        let frame = self.projection.frame()?;
        hit::hit_test(screen_pt, &self.annotations, frame, self.config.hit_slop_px, self.active())
    }

    fn take_drawing(&mut self) -> Option<DrawingSession> {
        match std::mem::take(&mut self.input) {
            InputState::Drawing(session) => {
                self.ui.active_id = None;
                Some(session)
            }
            other => {
                self.input = other;
                None
            }
        }
    }

    fn end_drag(&mut self) {
        if let Some(drag) = self.input.dragging() {
            log::debug!("canvas: drag ended id={}", drag.id);
            self.input = InputState::Idle;
        }
    }

    fn update_cursor(&mut self, cursor: &str, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            cursor.clone_into(&mut self.cursor);
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }
}

/// The dragged path for the pointer at `screen_pt`.
///
/// The delta is measured from the drag start and scaled, never re-projected,
/// and applied to the snapshot taken when the drag began.
fn drag_path(drag: &DragSession, frame: &GeometryFrame, screen_pt: Point) -> Vec<Point> {
    let (dx, dy) = frame.screen_delta_to_image(screen_pt.x - drag.start_screen.x, screen_pt.y - drag.start_screen.y);
    drag.translated(dx, dy)
}

/// The full canvas engine. Wraps `EngineCore` and owns the overlay canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ContextUnavailable`] if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| CanvasError::ContextUnavailable)?
            .ok_or(CanvasError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::ContextUnavailable)?;
        Ok(Self { canvas, ctx, core: EngineCore::new() })
    }

    // --- Delegated data inputs ---

    pub fn set_image_source(&mut self, source: Option<&str>) {
        self.core.set_image_source(source);
    }

    pub fn measure(&mut self, container: Option<Rect>, image: Rect, natural_width: f64, natural_height: f64) {
        self.core
            .measure(container, image, natural_width, natural_height);
    }

    pub fn image_failed(&mut self) {
        self.core.image_failed();
    }

    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.core.set_annotations(annotations);
    }

    pub fn set_active(&mut self, id: Option<AnnotationId>) {
        self.core.set_active(id);
    }

    pub fn set_selected(&mut self, id: Option<AnnotationId>) {
        self.core.set_selected(id);
    }

    pub fn set_viewer_role(&mut self, role: ViewerRole) {
        self.core.set_viewer_role(role);
    }

    pub fn set_viewer(&mut self, viewer_id: Option<String>) {
        self.core.set_viewer(viewer_id);
    }

    pub fn set_config(&mut self, config: CanvasConfig) {
        self.core.set_config(config);
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, resizing the backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let width_px = (self.core.viewport_width * self.core.dpr).round() as u32;
        let height_px = (self.core.viewport_height * self.core.dpr).round() as u32;
        if self.canvas.width() != width_px {
            self.canvas.set_width(width_px);
        }
        if self.canvas.height() != height_px {
            self.canvas.set_height(height_px);
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_click(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_click(screen_pt, button)
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_double_click(screen_pt)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn cancel_drawing(&mut self) -> Vec<Action> {
        self.core.cancel_drawing()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), CanvasError> {
        render::draw(&self.ctx, &self.core).map_err(|e| {
            let message = format!("{e:?}");
            log::warn!("canvas: render failed: {message}");
            CanvasError::Render(message)
        })
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<AnnotationId> {
        self.core.selection()
    }

    #[must_use]
    pub fn active(&self) -> Option<AnnotationId> {
        self.core.active()
    }

    #[must_use]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.core.annotation(id)
    }
}
