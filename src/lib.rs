mod app;
mod app_state;
pub mod assets;
pub mod canvas;
pub mod config;
pub mod drawing;
pub mod drawing_game;
mod event_handler;
pub mod export;
mod renderer;
pub mod replay;
pub mod spot;
pub mod spot_page;
mod state;
pub mod stroke_log;
pub mod ui;
mod update_logic;

pub use app::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn start() {
    if let Err(e) = run().await {
        log::error!("{e:#}");
    }
}
