use super::WindowListener;
use crate::constants::POINTER_THROTTLE_MS;
use crate::{dom, input};
use backdrop_core::FrameDriver;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

/// Feeds window-level pointer moves into the driver as NDC, throttled.
pub fn wire_pointermove(driver: Rc<RefCell<FrameDriver>>) -> Option<WindowListener<web::PointerEvent>> {
    let origin = Instant::now();
    let mut throttle = input::PointerThrottle::new(POINTER_THROTTLE_MS);
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let now_ms = origin.elapsed().as_secs_f64() * 1000.0;
        if !throttle.accept(now_ms) {
            return;
        }
        let Some((width, height)) = dom::viewport_css_size() else {
            return;
        };
        let ndc = input::client_to_ndc(ev.client_x() as f64, ev.client_y() as f64, width, height);
        driver.borrow_mut().set_pointer(ndc);
    }) as Box<dyn FnMut(_)>);
    WindowListener::add("pointermove", closure)
}
