//! Layout measurement helpers shared by the blueprint canvas host.
//!
//! These bridge the DOM layout and the engine's geometry frame. The DOM
//! readers are `#[cfg(feature = "hydrate")]` because they depend on
//! `web_sys` elements that only exist in the browser.

#[cfg(test)]
#[path = "canvas_viewport_test.rs"]
mod canvas_viewport_test;

use blueprint_canvas::input::ViewerRole;

#[cfg(feature = "hydrate")]
use blueprint_canvas::engine::Engine;
#[cfg(feature = "hydrate")]
use blueprint_canvas::geometry::Rect;

/// The image source to hand the engine; a blank URL means no image.
pub fn image_source(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

pub fn viewer_role(read_only: bool) -> ViewerRole {
    if read_only { ViewerRole::ReadOnly } else { ViewerRole::Interactive }
}

/// Whether the image's natural size belongs to its current source.
///
/// While a new source is loading the element still reports the previous
/// image's natural size, so nothing is measured until `complete` is set.
pub fn should_measure(complete: bool, natural_width: u32, natural_height: u32) -> bool {
    complete && natural_width > 0 && natural_height > 0
}

#[cfg(feature = "hydrate")]
fn client_rect(element: &web_sys::Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Re-measure the rendered image against its container and push the frame to the engine.
///
/// `container` is `None` while the container is unmounted; the engine keeps
/// its previous frame in that case. An image that is still loading is
/// skipped; its `load` event measures it.
#[cfg(feature = "hydrate")]
pub fn measure_image(engine: &mut Engine, container: Option<&web_sys::HtmlDivElement>, image: &web_sys::HtmlImageElement) {
    if !should_measure(image.complete(), image.natural_width(), image.natural_height()) {
        return;
    }
    let container_rect = container.map(|el| client_rect(el));
    engine.measure(
        container_rect,
        client_rect(image),
        f64::from(image.natural_width()),
        f64::from(image.natural_height()),
    );
}

/// Size the overlay canvas to the container's CSS box and the device pixel ratio.
///
/// Must run on every resize so the backing store stays sharp and the overlay
/// stays aligned with the image underneath it.
#[cfg(feature = "hydrate")]
pub fn sync_viewport(engine: &mut Engine, container: &web_sys::HtmlDivElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let width = f64::from(container.client_width()).max(1.0);
    let height = f64::from(container.client_height()).max(1.0);
    let dpr = window.device_pixel_ratio().max(1.0);
    engine.set_viewport(width, height, dpr);
}
