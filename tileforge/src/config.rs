use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::math::Size;

/// Configuration values for the view and the game loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    /// Initial render scale (world units to screen pixels).
    pub render_scale: f32,
    /// Game loop ticks per second.
    pub update_rate: u32,
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            render_scale: 3.0,
            update_rate: 60,
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Override the screen resolution in pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Override the initial render scale. Non-positive values are ignored.
    #[must_use]
    pub fn with_render_scale(mut self, render_scale: f32) -> Self {
        if render_scale > 0.0 && render_scale.is_finite() {
            self.render_scale = render_scale;
        } else {
            log::warn!("Ignoring invalid render scale {}", render_scale);
        }
        self
    }

    /// Override the game loop update rate.
    #[must_use]
    pub fn with_update_rate(mut self, update_rate: u32) -> Self {
        self.update_rate = update_rate.max(1);
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn resolution(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Camera behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Nudge focus points whose fractional y lands on a quarter pixel by +0.01.
    ///
    /// Works around rasterizers that jitter when images are placed exactly
    /// on those sub-pixel offsets at common render scales.
    pub subpixel_focus_nudge: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            subpixel_focus_nudge: true,
        }
    }
}
