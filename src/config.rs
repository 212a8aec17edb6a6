use crate::drawing::Color;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "HAMMOCK_CONFIG";
pub const CONFIG_FILE: &str = "hammock.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub drawing: DrawingConfig,
    pub assets: AssetConfig,
    pub export: ExportConfig,
}

/// Logical resolution of the drawing surface, independent of window size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 540,
            height: 340,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub color: Color,
    pub width: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub palette: Vec<Color>,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 4.0,
            min_width: 6.0,
            max_width: 20.0,
            palette: [
                Color([0x22, 0x22, 0x22]),
                Color([0xE5, 0x39, 0x35]),
                Color([0x19, 0x76, 0xD2]),
                Color([0x43, 0xA0, 0x47]),
                Color([0xFB, 0xC0, 0x2D]),
                Color([0xFF, 0x98, 0x00]),
                Color([0x8E, 0x24, 0xAA]),
                Color([0x00, 0xB8, 0xD4]),
            ]
            .to_vec(),
        }
    }
}

impl DrawingConfig {
    /// Repair width settings that would make the width controls or stroke
    /// capture misbehave. Each repair is logged.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let usable = |w: f32| w.is_finite() && w > 0.0;
        if !usable(self.min_width) || !usable(self.max_width) {
            log::warn!(
                "width range {}..{} is unusable, using {}..{}",
                self.min_width,
                self.max_width,
                defaults.min_width,
                defaults.max_width
            );
            self.min_width = defaults.min_width;
            self.max_width = defaults.max_width;
        }
        if self.min_width > self.max_width {
            log::warn!("width range {}..{} is inverted, swapping", self.min_width, self.max_width);
            std::mem::swap(&mut self.min_width, &mut self.max_width);
        }
        if !usable(self.width) {
            log::warn!("initial width {} is not positive, using {}", self.width, defaults.width);
            self.width = defaults.width;
        }
        self
    }
}

/// File paths natively, URLs in the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub drawing_background: String,
    pub spot_top: String,
    pub spot_bottom: String,
    pub targets: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            drawing_background: "assets/hammock_image.jpg".into(),
            spot_top: "assets/top_image.png".into(),
            spot_bottom: "assets/bottom_image.png".into(),
            targets: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "friendly-hammock-drawing.png".into(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing config")
    }

    /// `$HAMMOCK_CONFIG`, else `./hammock.json` if present, else defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.exists() {
                    log::info!("no {CONFIG_FILE} found, using built-in defaults");
                    return Ok(Self::default());
                }
                local
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&text).with_context(|| format!("in {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self> {
        Ok(Self::default())
    }
}
