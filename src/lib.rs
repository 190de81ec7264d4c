#![cfg(target_arch = "wasm32")]
use backdrop_core::{FrameDriver, Framebuffer, Palette, Preset};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod lifecycle;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

thread_local! {
    // Backdrop auto-attached by `start`, held until the page takes it.
    static DEFAULT_BACKDROP: RefCell<Option<Backdrop>> = const { RefCell::new(None) };
}

/// Handle to a running backdrop, exported to JavaScript.
///
/// Owns the render loop and the window listeners; `destroy()` or `free()`
/// stops the loop and unhooks the listeners.
#[wasm_bindgen]
pub struct Backdrop {
    driver: Rc<RefCell<FrameDriver>>,
    frame_loop: Option<frame::FrameLoop>,
    pointer: Option<events::WindowListener<web::PointerEvent>>,
    keyboard: Option<events::WindowListener<web::KeyboardEvent>>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Attaches to the canvas with id `canvas_id` using the named preset
    /// (`neon` when omitted).
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, preset: Option<String>) -> Result<Backdrop, JsValue> {
        let canvas = dom::canvas_by_id(canvas_id)
            .map_err(to_js)?
            .ok_or_else(|| to_js(format!("missing #{canvas_id}")))?;
        attach(&canvas, preset.as_deref(), None).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setPreset)]
    pub fn set_preset(&self, name: &str) -> Result<(), JsValue> {
        let preset = Preset::from_name(name).map_err(to_js)?;
        self.driver.borrow_mut().apply_preset(preset).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&self, primary: &str, background: &str, accent: &str) -> Result<(), JsValue> {
        let palette = Palette::from_hex(primary, background, accent).map_err(to_js)?;
        self.driver.borrow_mut().apply_palette(palette);
        Ok(())
    }

    #[wasm_bindgen(js_name = setAnimationEnabled)]
    pub fn set_animation_enabled(&self, enabled: bool) {
        self.driver.borrow_mut().set_animation_enabled(enabled);
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(frame::FrameLoop::is_running)
    }

    /// Stops rendering and removes the window listeners. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
            log::info!("backdrop detached");
        }
        self.pointer = None;
        self.keyboard = None;
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Hands the backdrop attached to `#backdrop-canvas` at startup over to the
/// page. Returns `undefined` when there was none or it was already taken.
#[wasm_bindgen(js_name = takeDefaultBackdrop)]
pub fn take_default_backdrop() -> Option<Backdrop> {
    DEFAULT_BACKDROP.with(|slot| slot.borrow_mut().take())
}

fn attach(
    canvas: &web::HtmlCanvasElement,
    preset: Option<&str>,
    palette: Option<&str>,
) -> anyhow::Result<Backdrop> {
    let preset = match preset {
        Some(name) => Preset::from_name(name)?,
        None => Preset::default(),
    };
    let mut driver = FrameDriver::from_preset(preset)?;
    if let Some(list) = palette {
        driver.apply_palette(Palette::from_list(list)?);
    }
    if dom::prefers_reduced_motion() {
        log::info!("reduced motion requested; animation disabled");
        driver.set_animation_enabled(false);
    }

    let ctx = dom::context_2d(canvas)?;
    let (width, height) = dom::sync_canvas_backing_size(canvas, driver.config().resolution_scale);
    driver.resize(width, height);

    let driver = Rc::new(RefCell::new(driver));
    let pointer = events::wire_pointermove(driver.clone());
    let keyboard = events::wire_keyboard(driver.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        driver: driver.clone(),
        canvas: canvas.clone(),
        ctx,
        framebuffer: Framebuffer::new(width, height),
        last_instant: Instant::now(),
    }));
    let frame_loop = frame::start_loop(frame_ctx);
    log::info!("backdrop attached ({preset}, {width}x{height})");

    Ok(Backdrop {
        driver,
        frame_loop: Some(frame_loop),
        pointer,
        keyboard,
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    // Pages without the default canvas construct `Backdrop` themselves.
    let Some(canvas) = dom::canvas_by_id(constants::CANVAS_ID).map_err(to_js)? else {
        return Ok(());
    };
    let preset = dom::data_preset(&canvas);
    let palette = dom::data_palette(&canvas);
    match attach(&canvas, preset.as_deref(), palette.as_deref()) {
        Ok(backdrop) => DEFAULT_BACKDROP.with(|slot| {
            // Replacing an earlier handle drops it, which tears it down.
            slot.borrow_mut().replace(backdrop);
        }),
        Err(e) => log::error!("init error: {:?}", e),
    }
    Ok(())
}
