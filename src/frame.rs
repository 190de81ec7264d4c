use crate::constants::MAX_FRAME_DELTA_SEC;
use crate::dom;
use crate::lifecycle::FrameSchedule;
use backdrop_core::{render_frame, FrameDriver, Framebuffer};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

pub struct FrameContext {
    pub driver: Rc<RefCell<FrameDriver>>,
    pub canvas: web::HtmlCanvasElement,
    pub ctx: web::CanvasRenderingContext2d,
    pub framebuffer: Framebuffer,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DELTA_SEC);
        self.last_instant = now;

        let params = {
            let mut driver = self.driver.borrow_mut();
            let scale = driver.config().resolution_scale;
            let (width, height) = dom::sync_canvas_backing_size(&self.canvas, scale);
            driver.resize(width, height);
            driver.tick(dt_sec)
        };
        render_frame(&params, &mut self.framebuffer);

        let image = web::ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.framebuffer.as_bytes()),
            self.framebuffer.width,
            self.framebuffer.height,
        );
        match image {
            Ok(image) => {
                if let Err(e) = self.ctx.put_image_data(&image, 0.0, 0.0) {
                    log::warn!("put_image_data failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("ImageData allocation failed: {:?}", e),
        }
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Running requestAnimationFrame loop. Stopping cancels the pending frame
/// and releases the tick closure along with the frame context it owns.
pub struct FrameLoop {
    tick: TickSlot,
    schedule: Rc<RefCell<FrameSchedule>>,
}

impl FrameLoop {
    pub fn stop(&self) {
        if let Some(id) = self.schedule.borrow_mut().stop() {
            if let Some(window) = web::window() {
                _ = window.cancel_animation_frame(id);
            }
        }
        // Breaks the closure's self-reference.
        self.tick.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        self.schedule.borrow().is_running()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let schedule = Rc::new(RefCell::new(FrameSchedule::new()));
    let tick_clone = tick.clone();
    let schedule_clone = schedule.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !schedule_clone.borrow_mut().fired() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone, &schedule_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &schedule);
    FrameLoop { tick, schedule }
}

fn request_frame(tick: &TickSlot, schedule: &RefCell<FrameSchedule>) {
    if !schedule.borrow().can_request() {
        return;
    }
    let Some(window) = web::window() else {
        return;
    };
    if let Some(callback) = tick.borrow().as_ref() {
        if let Ok(id) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            schedule.borrow_mut().requested(id);
        }
    }
}
