use yew::prelude::*;

use super::utils::debounce;
use crate::app::{App, Msg};
use crate::geo::map_embed_url;

pub fn render(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link().clone();

    let map_view = if let Some(position) = &app.position {
        html! {
            <iframe
                id="map"
                src={map_embed_url(position)}
                style="width: 100%; height: 400px; border: 0;"
                loading="lazy"
                referrerpolicy="no-referrer-when-downgrade"
            />
        }
    } else if let Some(reason) = &app.geo_error {
        html! {
            <div class="map-placeholder">
                <i class="fa-solid fa-location-crosshairs"></i>
                <p>{ format!("Could not determine your location: {reason}") }</p>
            </div>
        }
    } else {
        html! {
            <div class="map-placeholder">
                <i class="fa-solid fa-spinner fa-spin"></i>
                <p>{"Locating..."}</p>
            </div>
        }
    };

    html! {
        <div class="final-section">
            <h2>{"All done!"}</h2>
            <p>{"Here is where the check took place."}</p>
            { map_view }
            <div class="button-container">
                <button
                    class="scan-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::Restart).emit(())
                    })}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Check another car"}
                </button>
            </div>
        </div>
    }
}
