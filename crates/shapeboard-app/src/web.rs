//! WebAssembly entry point and page setup.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

const CANVAS_ID: &str = "shapeboard-canvas";

/// Browser viewport in logical pixels, or the fallback size.
fn viewport_size(fallback_width: u32, fallback_height: u32) -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (fallback_width as f64, fallback_height as f64);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_width as f64);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_height as f64);
    (width, height)
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Browser viewport in physical pixels.
pub(crate) fn viewport_physical_size(fallback_width: u32, fallback_height: u32) -> (u32, u32) {
    let (width, height) = viewport_size(fallback_width, fallback_height);
    let dpr = device_pixel_ratio();
    ((width * dpr) as u32, (height * dpr) as u32)
}

/// Find or create the canvas and size it to fill the page.
pub(crate) fn attach_canvas(fallback_width: u32, fallback_height: u32) -> Option<HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;

    if let Some(loading) = document.get_element_by_id("loading") {
        loading.remove();
    }

    let canvas = match document.get_element_by_id(CANVAS_ID) {
        Some(element) => element.dyn_into::<HtmlCanvasElement>().ok()?,
        None => {
            let app_div = document.get_element_by_id("app")?;
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id(CANVAS_ID);
            app_div.append_child(&canvas).ok()?;
            canvas.dyn_into::<HtmlCanvasElement>().ok()?
        }
    };

    let (width, height) = viewport_physical_size(fallback_width, fallback_height);
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    for (property, value) in [
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
    ] {
        let _ = style.set_property(property, value);
    }

    log::info!("Canvas created: {}x{} (dpr: {})", width, height, device_pixel_ratio());
    Some(canvas)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Starting Shapeboard (WASM)");

    if let Err(err) = crate::App::run().await {
        log::error!("{err}");
    }
}
