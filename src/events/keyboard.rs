use super::WindowListener;
use crate::input::{self, KeyAction};
use backdrop_core::{FrameDriver, Preset};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

fn handle_keydown(ev: &web::KeyboardEvent, driver: &Rc<RefCell<FrameDriver>>) {
    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    match input::key_action(&ev.key()) {
        Some(KeyAction::ToggleAnimation) => {
            driver.borrow_mut().toggle_animation();
            ev.prevent_default();
        }
        Some(KeyAction::SelectPreset(index)) => {
            if let Some(&preset) = Preset::ALL.get(index) {
                if let Err(e) = driver.borrow_mut().apply_preset(preset) {
                    log::error!("preset {preset}: {e}");
                }
            }
        }
        None => {}
    }
}

/// Space pauses and resumes, digits pick presets.
pub fn wire_keyboard(driver: Rc<RefCell<FrameDriver>>) -> Option<WindowListener<web::KeyboardEvent>> {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_keydown(&ev, &driver);
    }) as Box<dyn FnMut(_)>);
    WindowListener::add("keydown", closure)
}
