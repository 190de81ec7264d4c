use crate::constants::{
    DATA_PALETTE, DATA_PRESET, MAX_BACKING_DIMENSION, MAX_DEVICE_PIXEL_RATIO, REDUCED_MOTION_QUERY,
};
use crate::input;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas_by_id(id: &str) -> anyhow::Result<Option<web::HtmlCanvasElement>> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let Some(element) = document.get_element_by_id(id) else {
        return Ok(None);
    };
    let canvas = element
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("#{id} is not a canvas"))?;
    Ok(Some(canvas))
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|_| anyhow::anyhow!("unexpected 2d context type"))
}

/// Sizes the backing store to CSS size x devicePixelRatio x `resolution_scale`
/// and returns the new size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, resolution_scale: f32) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let (width, height) = input::backing_size(
        canvas.client_width() as f64,
        canvas.client_height() as f64,
        dpr,
        resolution_scale as f64,
        MAX_DEVICE_PIXEL_RATIO,
        MAX_BACKING_DIMENSION,
    );
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
    (width, height)
}

/// Window inner size in CSS pixels.
pub fn viewport_css_size() -> Option<(f64, f64)> {
    let window = web::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

pub fn prefers_reduced_motion() -> bool {
    web::window()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}

pub fn data_preset(canvas: &web::HtmlCanvasElement) -> Option<String> {
    canvas.dataset().get(DATA_PRESET)
}

pub fn data_palette(canvas: &web::HtmlCanvasElement) -> Option<String> {
    canvas.dataset().get(DATA_PALETTE)
}
