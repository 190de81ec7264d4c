use std::time::Instant;

use backdrop_core::{ndc_from_pixel, render_frame, FrameDriver, Framebuffer, Preset};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

mod export;
mod gpu;
mod settings;

use gpu::GpuState;
use settings::NativeSettings;

/// Window-side state: the frame driver and the buffer it renders into.
struct Backdrop {
    driver: FrameDriver,
    framebuffer: Framebuffer,
    last_frame: Instant,
}

impl Backdrop {
    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let scale = self.driver.config().resolution_scale;
        let width = ((size.width as f32 * scale).round() as u32).max(1);
        let height = ((size.height as f32 * scale).round() as u32).max(1);
        self.driver.resize(width, height);
    }

    fn select_preset(&mut self, preset: Preset, window_size: winit::dpi::PhysicalSize<u32>) {
        match self.driver.apply_preset(preset) {
            Ok(()) => {
                log::info!("preset: {preset}");
                // Presets may change the resolution scale.
                self.resize(window_size);
            }
            Err(err) => log::error!("{err}"),
        }
    }

    fn frame(&mut self) -> &Framebuffer {
        let now = Instant::now();
        let delta = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let params = self.driver.tick(delta);
        render_frame(&params, &mut self.framebuffer);
        &self.framebuffer
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = NativeSettings::from_env()?;
    let mut driver = FrameDriver::new(settings.config)?;
    if let Some(palette) = settings.palette {
        driver.apply_palette(palette);
    }

    if let Some(options) = settings.export {
        export::export_frames(&mut driver, &options)?;
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("SDF Backdrop (native)")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;
    let mut backdrop = Backdrop {
        driver,
        framebuffer: Framebuffer::default(),
        last_frame: Instant::now(),
    };
    backdrop.resize(window.inner_size());
    log::info!("started with preset {}", settings.preset);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            state.resize(size);
            backdrop.resize(size);
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            let size = state.window.inner_size();
            backdrop.driver.set_pointer(ndc_from_pixel(
                position.x as f32,
                position.y as f32,
                size.width as f32,
                size.height as f32,
            ));
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => match logical_key {
            Key::Named(NamedKey::Escape) => elwt.exit(),
            Key::Named(NamedKey::Space) => backdrop.driver.toggle_animation(),
            Key::Character(ref text) => {
                if let Some(preset) = text.chars().next().and_then(Preset::from_digit) {
                    backdrop.select_preset(preset, state.window.inner_size());
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let frame = backdrop.frame();
            match state.present(frame) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}
