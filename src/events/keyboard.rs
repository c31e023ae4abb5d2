use crate::audio;
use crate::frame::SceneComposer;
use crate::input::{self, KeyAction};
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, composer: &Rc<RefCell<SceneComposer<'static>>>) {
    let tag = ev
        .target()
        .and_then(|t| t.dyn_ref::<web::Element>().map(|el| el.tag_name()));
    if !input::key_reaches_shortcuts(tag.as_deref()) {
        return;
    }
    let Some(action) = input::action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::ToggleMusic => {
            let sequencer = composer.borrow().sequencer().clone();
            audio::toggle_music(&sequencer);
            ev.prevent_default();
        }
        KeyAction::AddCandle | KeyAction::RemoveCandle => {
            let change = input::candle_change(composer.borrow().params(), action);
            if let Some(change) = change {
                composer.borrow_mut().apply_change(change);
            }
        }
        KeyAction::ToggleHud => {
            if let Some(doc) = crate::dom::window_document() {
                overlay::toggle_hud(&doc);
            }
        }
    }
}

pub fn wire_global_keydown(composer: Rc<RefCell<SceneComposer<'static>>>) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &composer);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
