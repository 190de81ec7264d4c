//! Headless rendering of a fixed number of frames to PNG files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use backdrop_core::{render_frame, FrameDriver, Framebuffer};
use image::RgbaImage;

use crate::settings::ExportOptions;

/// Renders `options.frames` frames at a fixed time step and writes them as
/// `frame_0000.png`, `frame_0001.png`, ... into `options.dir`.
pub fn export_frames(driver: &mut FrameDriver, options: &ExportOptions) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&options.dir)
        .with_context(|| format!("creating {}", options.dir.display()))?;
    driver.resize(options.width, options.height);

    let delta = 1.0 / options.fps;
    let mut framebuffer = Framebuffer::new(options.width, options.height);
    let mut written = Vec::with_capacity(options.frames as usize);
    for index in 0..options.frames {
        // The first frame is rendered at t = 0.
        let params = if index == 0 {
            driver.snapshot()
        } else {
            driver.tick(delta)
        };
        render_frame(&params, &mut framebuffer);
        let path = options.dir.join(format!("frame_{index:04}.png"));
        write_png(&framebuffer, &path)?;
        written.push(path);
    }
    log::info!(
        "exported {} frame(s) at {}x{} to {}",
        written.len(),
        options.width,
        options.height,
        options.dir.display()
    );
    Ok(written)
}

pub fn write_png(framebuffer: &Framebuffer, path: &Path) -> anyhow::Result<()> {
    let image = RgbaImage::from_raw(
        framebuffer.width,
        framebuffer.height,
        framebuffer.as_bytes().to_vec(),
    )
    .context("framebuffer size does not match its pixel data")?;
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::Preset;

    #[test]
    fn writes_numbered_pngs() {
        let dir = std::env::temp_dir().join(format!("backdrop-export-{}", std::process::id()));
        let options = ExportOptions {
            dir: dir.clone(),
            frames: 2,
            fps: 30.0,
            width: 16,
            height: 8,
        };
        let mut driver = FrameDriver::from_preset(Preset::Neon).unwrap();
        let written = export_frames(&mut driver, &options).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("frame_0001.png"));

        let decoded = image::open(&written[0]).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert!((driver.time() - 1.0 / 30.0).abs() < 1e-6);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
