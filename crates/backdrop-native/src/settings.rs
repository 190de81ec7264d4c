//! Launch options read from the environment.

use std::path::PathBuf;

use anyhow::{bail, Context};
use backdrop_core::{Palette, Preset, SceneConfig};

const DEFAULT_EXPORT_SIZE: (u32, u32) = (640, 360);
const DEFAULT_EXPORT_FRAMES: u32 = 1;
const DEFAULT_EXPORT_FPS: f32 = 30.0;
/// Largest export side; 8192x8192 RGBA is a 256 MiB framebuffer.
pub const MAX_EXPORT_DIMENSION: u32 = 8192;

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub dir: PathBuf,
    pub frames: u32,
    pub fps: f32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct NativeSettings {
    pub preset: Preset,
    pub config: SceneConfig,
    pub palette: Option<Palette>,
    pub export: Option<ExportOptions>,
}

impl NativeSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NativeSettings::from_env`] with an injectable variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let preset = match var("BACKDROP_PRESET") {
            Some(name) => Preset::from_name(&name)?,
            None => Preset::default(),
        };

        let config = match var("BACKDROP_CONFIG") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading scene config {path}"))?;
                SceneConfig::from_json(&raw).with_context(|| format!("parsing {path}"))?
            }
            None => preset.config(),
        };

        let palette = var("BACKDROP_PALETTE")
            .map(|list| Palette::from_list(&list))
            .transpose()?;

        let export = match var("BACKDROP_EXPORT") {
            Some(dir) => {
                let frames = match var("BACKDROP_FRAMES") {
                    Some(raw) => raw
                        .trim()
                        .parse::<u32>()
                        .with_context(|| format!("BACKDROP_FRAMES={raw}"))?
                        .max(1),
                    None => DEFAULT_EXPORT_FRAMES,
                };
                let fps = match var("BACKDROP_FPS") {
                    Some(raw) => raw
                        .trim()
                        .parse::<f32>()
                        .with_context(|| format!("BACKDROP_FPS={raw}"))?,
                    None => DEFAULT_EXPORT_FPS,
                };
                if !fps.is_finite() || fps <= 0.0 {
                    bail!("BACKDROP_FPS must be a positive number");
                }
                let (width, height) = match var("BACKDROP_SIZE") {
                    Some(raw) => parse_size(&raw)?,
                    None => DEFAULT_EXPORT_SIZE,
                };
                Some(ExportOptions {
                    dir: PathBuf::from(dir),
                    frames,
                    fps,
                    width,
                    height,
                })
            }
            None => None,
        };

        Ok(Self {
            preset,
            config,
            palette,
            export,
        })
    }
}

/// Parses `WIDTHxHEIGHT`, each side in `1..=MAX_EXPORT_DIMENSION`.
pub fn parse_size(raw: &str) -> anyhow::Result<(u32, u32)> {
    let Some((w, h)) = raw.trim().split_once(['x', 'X']) else {
        bail!("size '{raw}' must look like 640x360");
    };
    let width: u32 = w.trim().parse().with_context(|| format!("width in '{raw}'"))?;
    let height: u32 = h.trim().parse().with_context(|| format!("height in '{raw}'"))?;
    if width == 0 || height == 0 {
        bail!("size '{raw}' must be non-zero");
    }
    if width > MAX_EXPORT_DIMENSION || height > MAX_EXPORT_DIMENSION {
        bail!("size '{raw}' exceeds {MAX_EXPORT_DIMENSION} per side");
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_neon_without_export() {
        let settings = NativeSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.preset, Preset::Neon);
        assert_eq!(settings.config, Preset::Neon.config());
        assert!(settings.palette.is_none());
        assert!(settings.export.is_none());
    }

    #[test]
    fn reads_preset_palette_and_export() {
        let settings = NativeSettings::from_lookup(lookup(&[
            ("BACKDROP_PRESET", "Cosmic"),
            ("BACKDROP_PALETTE", "#ff3366,#101010,#00ffd1"),
            ("BACKDROP_EXPORT", "out"),
            ("BACKDROP_FRAMES", "12"),
            ("BACKDROP_SIZE", "320x180"),
        ]))
        .unwrap();
        assert_eq!(settings.preset, Preset::Cosmic);
        assert!(settings.palette.is_some());
        let export = settings.export.unwrap();
        assert_eq!(export.frames, 12);
        assert_eq!((export.width, export.height), (320, 180));
        assert_eq!(export.fps, 30.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(NativeSettings::from_lookup(lookup(&[("BACKDROP_PRESET", "sunset")])).is_err());
        assert!(NativeSettings::from_lookup(lookup(&[("BACKDROP_PALETTE", "#fff")])).is_err());
        assert!(NativeSettings::from_lookup(lookup(&[
            ("BACKDROP_EXPORT", "out"),
            ("BACKDROP_FPS", "0")
        ]))
        .is_err());
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1280X720").unwrap(), (1280, 720));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("100000x100000").is_err());
        assert!(parse_size("8193x10").is_err());
        assert_eq!(parse_size("8192x8192").unwrap(), (8192, 8192));
    }

    #[test]
    fn oversized_export_is_rejected() {
        assert!(NativeSettings::from_lookup(lookup(&[
            ("BACKDROP_EXPORT", "out"),
            ("BACKDROP_SIZE", "100000x100000")
        ]))
        .is_err());
    }
}
