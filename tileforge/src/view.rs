//! Shared view state read by renderers and written by the active camera.

use crate::camera::CameraId;
use crate::config::EngineConfig;
use crate::math::Size;

/// Render scale, screen resolution and the currently active camera.
///
/// Owned by the view/session controller and passed explicitly to cameras and
/// renderers. While a camera is active it is the only intended writer of the
/// render scale; writing it from elsewhere during that time is a caller error
/// and is not guarded.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewContext {
    render_scale: f32,
    resolution: Size,
    active_camera: Option<CameraId>,
}

impl ViewContext {
    pub fn new(resolution: Size, render_scale: f32) -> Self {
        Self {
            render_scale: sanitize_scale(render_scale, 1.0),
            resolution,
            active_camera: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.resolution(), config.render_scale)
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    /// Set the render scale. Non-positive or non-finite values are ignored.
    pub fn set_render_scale(&mut self, render_scale: f32) {
        self.render_scale = sanitize_scale(render_scale, self.render_scale);
    }

    pub fn resolution(&self) -> Size {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: Size) {
        self.resolution = resolution;
    }

    pub fn active_camera(&self) -> Option<CameraId> {
        self.active_camera
    }

    pub fn set_active_camera(&mut self, camera: Option<CameraId>) {
        self.active_camera = camera;
    }

    /// A camera may advance when it is the active one or when none is active.
    pub fn is_camera_active(&self, camera: CameraId) -> bool {
        self.active_camera.map_or(true, |active| active == camera)
    }

    /// Resolution expressed in world units at the current render scale.
    pub fn world_resolution(&self) -> Size {
        Size::new(
            self.resolution.width / self.render_scale,
            self.resolution.height / self.render_scale,
        )
    }
}

fn sanitize_scale(scale: f32, fallback: f32) -> f32 {
    if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        log::warn!("Rejecting render scale {}, keeping {}", scale, fallback);
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scale_stays_positive() {
        let mut ctx = ViewContext::new(Size::new(800.0, 600.0), 2.0);
        ctx.set_render_scale(-1.0);
        assert_eq!(ctx.render_scale(), 2.0);
        ctx.set_render_scale(f32::NAN);
        assert_eq!(ctx.render_scale(), 2.0);
        ctx.set_render_scale(4.0);
        assert_eq!(ctx.render_scale(), 4.0);
    }

    #[test]
    fn world_resolution_divides_by_scale() {
        let ctx = ViewContext::new(Size::new(800.0, 600.0), 2.0);
        assert_eq!(ctx.world_resolution(), Size::new(400.0, 300.0));
    }
}
