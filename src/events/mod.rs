use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

mod keyboard;
mod pointer;

pub use keyboard::wire_keyboard;
pub use pointer::wire_pointermove;

/// Window event listener that is removed again when dropped.
pub struct WindowListener<E: FromWasmAbi + 'static> {
    event: &'static str,
    closure: Closure<dyn FnMut(E)>,
}

impl<E: FromWasmAbi + 'static> WindowListener<E> {
    pub fn add(event: &'static str, closure: Closure<dyn FnMut(E)>) -> Option<Self> {
        let window = web::window()?;
        if let Err(e) =
            window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("{event} listener not added: {:?}", e);
            return None;
        }
        Some(Self { event, closure })
    }
}

impl<E: FromWasmAbi + 'static> Drop for WindowListener<E> {
    fn drop(&mut self) {
        if let Some(window) = web::window() {
            _ = window
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        }
    }
}
