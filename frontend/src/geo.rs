//! Best-effort browser geolocation for the final map view.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::Callback;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn map_embed_url(position: &GeoPosition) -> String {
    format!(
        "https://www.google.com/maps?q={},{}&z=15&output=embed",
        position.latitude, position.longitude
    )
}

/// Asks the browser for the current position, once. Exactly one of the
/// two callbacks fires; denial, unavailability, or a missing geolocation
/// API all land in `on_error`.
pub fn locate(on_found: Callback<GeoPosition>, on_error: Callback<String>) {
    let Some(window) = web_sys::window() else {
        on_error.emit("no window object".into());
        return;
    };
    let geolocation = match window.navigator().geolocation() {
        Ok(geolocation) => geolocation,
        Err(_) => {
            on_error.emit("geolocation is not available".into());
            return;
        }
    };

    let success = Closure::<dyn FnMut(web_sys::Position)>::new(move |pos: web_sys::Position| {
        let coords = pos.coords();
        on_found.emit(GeoPosition {
            latitude: coords.latitude(),
            longitude: coords.longitude(),
        });
    });
    let on_error_cb = on_error.clone();
    let failure =
        Closure::<dyn FnMut(web_sys::PositionError)>::new(move |err: web_sys::PositionError| {
            on_error_cb.emit(err.message());
        });

    if geolocation
        .get_current_position_with_error_callback(
            success.as_ref().unchecked_ref(),
            Some(failure.as_ref().unchecked_ref()),
        )
        .is_err()
    {
        on_error.emit("geolocation request was rejected".into());
    }

    // One-shot lookup; the browser holds the only references.
    success.forget();
    failure.forget();
}
