use yew::prelude::*;

use crate::app::App;

pub fn render(app: &App) -> Html {
    let status_line = match app.scan_status {
        Some(status) => format!("Status: {status}"),
        None => "Submitting your photo...".to_string(),
    };

    html! {
        <div class="scanning-section">
            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
            <h2>{"Scanning your vehicle..."}</h2>
            <p class="scan-status">{ status_line }</p>
            <p class="scan-hint">{"This usually takes a few seconds."}</p>
        </div>
    }
}
