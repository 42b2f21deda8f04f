//! Bridge component between page state and the imperative `blueprint_canvas::engine::Engine`.
//!
//! ARCHITECTURE
//! ============
//! The page owns the annotation list. Props flow into the engine through
//! effects; DOM events flow into the engine's input handlers; the returned
//! actions flow back out through the page's callbacks, in order. The engine
//! never sees the page's data except through the latest snapshot.

use leptos::prelude::*;

use blueprint_canvas::annotation::{Annotation, AnnotationId};
use blueprint_canvas::config::CanvasConfig;
use blueprint_canvas::geometry::Point;

#[cfg(feature = "hydrate")]
use crate::util::canvas_input::{map_button, map_modifiers, pointer_point, should_prevent_default_key};
#[cfg(feature = "hydrate")]
use crate::util::canvas_viewport::{image_source, measure_image, sync_viewport, viewer_role};

#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use blueprint_canvas::engine::{Action, Engine};
#[cfg(feature = "hydrate")]
use blueprint_canvas::input::Key as CanvasKey;
#[cfg(feature = "hydrate")]
use leptos::logging::warn;
#[cfg(feature = "hydrate")]
use wasm_bindgen::{JsCast, closure::Closure};
#[cfg(feature = "hydrate")]
use web_sys::ResizeObserver;

#[cfg(feature = "hydrate")]
type EngineSlot = Rc<RefCell<Option<Engine>>>;

/// A live resize observation. Dropping it after `disconnect` frees the callback.
#[cfg(feature = "hydrate")]
struct ResizeWatch {
    observer: ResizeObserver,
    _on_resize: Closure<dyn FnMut(js_sys::Array)>,
}

const OVERLAY_STYLE: &str = "position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none;";

/// The page's handlers for engine actions.
#[derive(Clone, Copy)]
pub struct CanvasCallbacks {
    pub on_path_update: Callback<(AnnotationId, Vec<Point>)>,
    pub on_drawing_finished: Callback<AnnotationId>,
    pub on_select: Callback<Annotation>,
    pub on_remove: Option<Callback<AnnotationId>>,
    pub on_cancel: Option<Callback<AnnotationId>>,
}

/// Annotation overlay for a blueprint image.
///
/// `active_id` names the annotation being drawn; the page creates it and
/// then sets this prop. Every path change is reported through
/// `on_path_update` with the full point list in natural image pixels.
/// `on_remove` fires when a drawing is abandoned or canceled before any
/// point was placed; `on_cancel` when it is canceled with points kept.
#[component]
pub fn BlueprintCanvas(
    #[prop(into)] image_url: Signal<String>,
    #[prop(into)] annotations: Signal<Vec<Annotation>>,
    #[prop(into, optional)] active_id: Signal<Option<AnnotationId>>,
    #[prop(into, optional)] selected_id: Signal<Option<AnnotationId>>,
    #[prop(into, optional)] read_only: Signal<bool>,
    #[prop(into, optional)] viewer_id: Signal<Option<String>>,
    #[prop(optional)] config: Option<CanvasConfig>,
    on_path_update: Callback<(AnnotationId, Vec<Point>)>,
    on_drawing_finished: Callback<AnnotationId>,
    on_select: Callback<Annotation>,
    #[prop(optional)] on_remove: Option<Callback<AnnotationId>>,
    #[prop(optional)] on_cancel: Option<Callback<AnnotationId>>,
) -> impl IntoView {
    let container_ref = NodeRef::<leptos::html::Div>::new();
    let image_ref = NodeRef::<leptos::html::Img>::new();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let cursor = RwSignal::new("default".to_owned());
    let callbacks = CanvasCallbacks { on_path_update, on_drawing_finished, on_select, on_remove, on_cancel };

    #[cfg(not(feature = "hydrate"))]
    let _ = (annotations, active_id, selected_id, read_only, viewer_id, config, callbacks);

    #[cfg(feature = "hydrate")]
    let engine: EngineSlot = Rc::new(RefCell::new(None));

    #[cfg(feature = "hydrate")]
    {
        let engine = Rc::clone(&engine);
        let resize_watch = StoredValue::new_local(None::<ResizeWatch>);
        on_cleanup(move || {
            resize_watch.update_value(|watch| {
                if let Some(watch) = watch.take() {
                    watch.observer.disconnect();
                }
            });
        });
        Effect::new(move || {
            let (Some(canvas), Some(container)) = (canvas_ref.get(), container_ref.get()) else {
                return;
            };
            if engine.borrow().is_some() {
                return;
            }

            let mut instance = match Engine::new(canvas) {
                Ok(instance) => instance,
                Err(err) => {
                    warn!("blueprint canvas: engine unavailable: {err}");
                    return;
                }
            };
            if let Some(config) = config.clone() {
                instance.set_config(config);
            }
            instance.set_image_source(image_source(&image_url.get_untracked()));
            instance.set_annotations(annotations.get_untracked());
            instance.set_active(active_id.get_untracked());
            instance.set_selected(selected_id.get_untracked());
            instance.set_viewer_role(viewer_role(read_only.get_untracked()));
            instance.set_viewer(viewer_id.get_untracked());
            sync_viewport(&mut instance, &container);
            if let Some(image) = image_ref.get_untracked() {
                measure_image(&mut instance, Some(&container), &image);
            }
            render(&instance);
            *engine.borrow_mut() = Some(instance);

            if let Some(watch) = observe_resize(&engine, &container, image_ref) {
                resize_watch.set_value(Some(watch));
            }
        });
    }

    #[cfg(feature = "hydrate")]
    {
        bind_prop(&engine, image_url, |engine, url: String| {
            engine.set_image_source(image_source(&url));
        });
        bind_prop(&engine, annotations, Engine::set_annotations);
        bind_prop(&engine, active_id, Engine::set_active);
        bind_prop(&engine, selected_id, Engine::set_selected);
        bind_prop(&engine, read_only, |engine, read_only: bool| {
            engine.set_viewer_role(viewer_role(read_only));
        });
        bind_prop(&engine, viewer_id, Engine::set_viewer);
    }

    let on_image_load = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::Event| {
                if let Some(container) = container_ref.get_untracked() {
                    remeasure(&engine, &container, image_ref);
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::Event| {}
        }
    };

    let on_image_error = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::ErrorEvent| {
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    engine.image_failed();
                    render(engine);
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::ErrorEvent| {}
        }
    };

    let on_pointer_down = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                if let Some(container) = container_ref.get_untracked() {
                    if let Err(err) = container.focus() {
                        warn!("blueprint canvas: focus failed: {err:?}");
                    }
                }
                let point = pointer_point(&ev);
                let button = map_button(ev.button());
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                let (actions, dragging) = with_engine(&engine, |engine| {
                    let actions = engine.on_pointer_down(point, button, modifiers);
                    (actions, engine.core.is_dragging())
                });
                if dragging {
                    ev.prevent_default();
                    if let Some(canvas) = canvas_ref.get_untracked() {
                        if let Err(err) = canvas.set_pointer_capture(ev.pointer_id()) {
                            warn!("blueprint canvas: pointer capture failed: {err:?}");
                        }
                    }
                }
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_move = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                let point = pointer_point(&ev);
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                let actions = with_engine(&engine, |engine| engine.on_pointer_move(point, modifiers));
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_up = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                let point = pointer_point(&ev);
                let button = map_button(ev.button());
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                let actions = with_engine(&engine, |engine| engine.on_pointer_up(point, button, modifiers));
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_leave = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::PointerEvent| {
                let actions = with_engine(&engine, Engine::on_pointer_leave);
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_click = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::MouseEvent| {
                let point = pointer_point(&ev);
                let button = map_button(ev.button());
                let actions = with_engine(&engine, |engine| engine.on_click(point, button));
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_double_click = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::MouseEvent| {
                if ev.button() != 0 {
                    return;
                }
                ev.prevent_default();
                let point = pointer_point(&ev);
                let actions = with_engine(&engine, |engine| engine.on_double_click(point));
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_key_down = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::KeyboardEvent| {
                let key = ev.key();
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                let drawing = with_engine(&engine, |engine| engine.active().is_some());
                if should_prevent_default_key(&key, modifiers, drawing) {
                    ev.prevent_default();
                }
                let actions = with_engine(&engine, |engine| engine.on_key_down(CanvasKey(key), modifiers));
                dispatch(&engine, actions, callbacks, cursor);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::KeyboardEvent| {}
        }
    };

    let overlay_style = move || format!("{OVERLAY_STYLE} cursor: {};", cursor.get());

    view! {
        <div
            class="blueprint-canvas"
            node_ref=container_ref
            tabindex="0"
            style="position: relative; outline: none;"
            on:keydown=on_key_down
        >
            <img
                class="blueprint-canvas__image"
                node_ref=image_ref
                src=move || image_url.get()
                alt=""
                draggable="false"
                on:load=on_image_load
                on:error=on_image_error
            />
            <canvas
                class="blueprint-canvas__overlay"
                node_ref=canvas_ref
                style=overlay_style
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointerleave=on_pointer_leave
                on:click=on_click
                on:dblclick=on_double_click
            >
                "Your browser does not support canvas."
            </canvas>
        </div>
    }
}

#[cfg(feature = "hydrate")]
fn render(engine: &Engine) {
    if let Err(err) = engine.render() {
        warn!("blueprint canvas: {err}");
    }
}

/// Run `f` against the mounted engine; the default result before mount.
#[cfg(feature = "hydrate")]
fn with_engine<R: Default>(engine: &EngineSlot, f: impl FnOnce(&mut Engine) -> R) -> R {
    engine.borrow_mut().as_mut().map(f).unwrap_or_default()
}

/// Push a reactive prop into the engine whenever it changes.
#[cfg(feature = "hydrate")]
fn bind_prop<T>(engine: &EngineSlot, signal: Signal<T>, apply: impl Fn(&mut Engine, T) + 'static)
where
    T: Clone + Send + Sync + 'static,
{
    let engine = Rc::clone(engine);
    Effect::new(move || {
        let value = signal.get();
        if let Some(engine) = engine.borrow_mut().as_mut() {
            apply(engine, value);
            render(engine);
        }
    });
}

#[cfg(feature = "hydrate")]
fn remeasure(engine: &EngineSlot, container: &web_sys::HtmlDivElement, image_ref: NodeRef<leptos::html::Img>) {
    let Some(image) = image_ref.get_untracked() else {
        return;
    };
    if let Some(engine) = engine.borrow_mut().as_mut() {
        sync_viewport(engine, container);
        measure_image(engine, Some(container), &image);
        render(engine);
    }
}

/// Re-measure whenever the container box changes size.
///
/// The returned watch must be kept until unmount and then disconnected.
#[cfg(feature = "hydrate")]
fn observe_resize(
    engine: &EngineSlot,
    container: &web_sys::HtmlDivElement,
    image_ref: NodeRef<leptos::html::Img>,
) -> Option<ResizeWatch> {
    let engine = Rc::clone(engine);
    let target = container.clone();
    let on_resize = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
        remeasure(&engine, &target, image_ref);
    });
    match ResizeObserver::new(on_resize.as_ref().unchecked_ref()) {
        Ok(observer) => {
            observer.observe(container);
            Some(ResizeWatch { observer, _on_resize: on_resize })
        }
        Err(err) => {
            warn!("blueprint canvas: resize observer unavailable: {err:?}");
            None
        }
    }
}

/// Forward engine actions to the page in order, then render once if any asked for it.
///
/// Runs with the engine unborrowed so page callbacks may update props freely.
#[cfg(feature = "hydrate")]
fn dispatch(engine: &EngineSlot, actions: Vec<Action>, callbacks: CanvasCallbacks, cursor: RwSignal<String>) {
    let mut render_needed = false;
    for action in actions {
        match action {
            Action::PathUpdated { id, points } => callbacks.on_path_update.run((id, points)),
            Action::DrawingFinished { id } => callbacks.on_drawing_finished.run(id),
            Action::DrawingCanceled { id } => {
                if let Some(on_cancel) = callbacks.on_cancel {
                    on_cancel.run(id);
                }
            }
            Action::AnnotationRemoved { id } => {
                if let Some(on_remove) = callbacks.on_remove {
                    on_remove.run(id);
                }
            }
            Action::AnnotationSelected(annotation) => callbacks.on_select.run(annotation),
            Action::SetCursor(next) => cursor.set(next),
            Action::RenderNeeded => render_needed = true,
        }
    }
    if render_needed {
        if let Some(engine) = engine.borrow().as_ref() {
            render(engine);
        }
    }
}
