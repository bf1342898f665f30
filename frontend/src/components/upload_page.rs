use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

use super::utils::{debounce, extract_image_files};
use crate::app::{App, Msg};

pub fn render(app: &App, ctx: &Context<App>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(app, ctx) }
            { render_preview(app, ctx) }
        </div>
    }
}

fn render_file_input_area(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let picked = files.as_ref().map(extract_image_files).unwrap_or_default();

        input.set_value("");

        Msg::FilesPicked(picked)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", app.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop a photo of your car here, paste, or click"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP"}</p>
                </div>
            </div>
        </>
    }
}

fn render_preview(app: &App, ctx: &Context<App>) -> Html {
    let Some(picked) = &app.picked else {
        return html! {};
    };
    let link = ctx.link().clone();

    html! {
        <div id="preview-container">
            <img
                id="photo-preview"
                src={picked.preview_url.to_string()}
                alt={picked.file.name()}
                style="max-width:100%; max-height: 400px; object-fit: contain; margin-bottom: 10px;"
            />
            <div class="button-container">
                <button
                    class="scan-btn"
                    style="background-color: var(--danger-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::ClearFile).emit(())
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Remove"}
                </button>
                <button
                    class="scan-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::StartScan).emit(())
                    })}
                >
                    <i class="fa-solid fa-magnifying-glass"></i>{" Check my car"}
                </button>
            </div>
        </div>
    }
}
