use crate::core::ParamChange;
use crate::frame::SceneComposer;
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const PANEL_ID: &str = "settings";

/// Listen for `input` events from panel controls tagged with `data-param`,
/// turning each into a typed parameter change.
pub fn wire_settings_panel(document: &web::Document, composer: Rc<RefCell<SceneComposer<'static>>>) {
    let Some(panel) = document.get_element_by_id(PANEL_ID) else {
        log::info!("[panel] no #{} element; settings panel disabled", PANEL_ID);
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let Some(el) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(field) = el.get_attribute("data-param") else {
            return;
        };
        match ParamChange::parse(&field, &el.value()) {
            Ok(change) => composer
                .borrow_mut()
                .apply_change(input::clamp_to_panel_range(change)),
            Err(e) => log::warn!("[panel] {}", e),
        }
    }) as Box<dyn FnMut(_)>);
    _ = panel.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
    closure.forget();
}
