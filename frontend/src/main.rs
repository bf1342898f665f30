mod api;
mod app;
mod components;
mod geo;
mod workflow;

use app::App;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Vehicle condition check client starting...");
    yew::Renderer::<App>::new().render();
}
