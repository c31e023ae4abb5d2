//! Particle birthday cake with a looping melody.
//!
//! `core` holds the platform-independent pieces (particle field builder,
//! melody score, audio sequencer, shader parameter feed) and is compiled and
//! tested on every target. The WebGPU/WebAudio front-end is wasm-only.

pub mod camera;
pub mod constants;
pub mod core;
pub mod input;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use super::{audio, dom, events, frame};
    use crate::core::SceneParameters;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("cake-web starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    async fn init() -> anyhow::Result<()> {
        static STARTED: AtomicBool = AtomicBool::new(false);
        if STARTED.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        let canvas: web::HtmlCanvasElement = document
            .get_element_by_id("app-canvas")
            .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        dom::wire_canvas_resize(&canvas);

        let params = SceneParameters::from_query(&dom::location_query());
        log::info!("[params] {:?}", params);

        let sequencer = audio::create_sequencer();
        let gpu = frame::init_gpu(&canvas).await;
        let composer = Rc::new(RefCell::new(frame::SceneComposer::new(
            params,
            gpu,
            canvas,
            sequencer.clone(),
        )));

        let seq_click = sequencer.clone();
        dom::add_click_listener(&document, "music-toggle", move || {
            audio::toggle_music(&seq_click);
        });
        let seq_teardown = sequencer.clone();
        dom::add_pagehide_listener(move || {
            seq_teardown.borrow_mut().stop();
        });
        events::wire_global_keydown(composer.clone());
        events::wire_settings_panel(&document, composer.clone());

        frame::start_loop(composer);
        Ok(())
    }
}
