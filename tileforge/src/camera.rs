//! Tick-driven camera with timed zoom transitions and screen shake.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Mat4, Vec3};

use crate::clock::GameLoop;
use crate::config::CameraConfig;
use crate::entities::Entity;
use crate::math::{Rect, Size, Vec2};
use crate::view::ViewContext;

static NEXT_CAMERA_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a camera, used to decide which camera is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CameraId(u32);

impl CameraId {
    fn next() -> Self {
        Self(NEXT_CAMERA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type ZoomCallback = Rc<dyn Fn(f32)>;

/// Shared list of zoom-change callbacks.
///
/// Cloning yields another handle to the same list, so a callback may hold a
/// handle and register further callbacks while being notified. Those join
/// from the next notification on.
#[derive(Clone, Default)]
pub struct ZoomListeners {
    callbacks: Rc<RefCell<Vec<ZoomCallback>>>,
}

impl ZoomListeners {
    pub fn add(&self, callback: impl Fn(f32) + 'static) {
        self.callbacks.borrow_mut().push(Rc::new(callback));
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    /// Invoke every callback in registration order.
    fn notify(&self, render_scale: f32) {
        let snapshot: Vec<ZoomCallback> = self.callbacks.borrow().clone();
        for callback in snapshot {
            callback(render_scale);
        }
    }
}

impl fmt::Debug for ZoomListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomListeners")
            .field("len", &self.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ZoomTransition {
    target: f32,
    delay: u64,
    tick: u64,
    step: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Shake {
    intensity: f32,
    delay: u64,
    duration: u64,
    tick: u64,
}

/// Camera centering the viewport on a focus point in world space.
///
/// [`Camera::update`] runs once per tick and advances zoom transitions and
/// shake; [`Camera::update_focus`] runs once per frame after the focus was
/// set and publishes the viewport rectangle.
#[derive(Debug)]
pub struct Camera {
    id: CameraId,
    config: CameraConfig,
    focus: Vec2,
    viewport: Rect,
    zoom: Option<ZoomTransition>,
    shake: Option<Shake>,
    last_shake: Option<u64>,
    shake_offset: Vec2,
    listeners: ZoomListeners,
    rng: fastrand::Rng,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            id: CameraId::next(),
            config,
            focus: Vec2::ZERO,
            viewport: Rect::default(),
            zoom: None,
            shake: None,
            last_shake: None,
            shake_offset: Vec2::ZERO,
            listeners: ZoomListeners::default(),
            rng: fastrand::Rng::new(),
        }
    }

    /// Seed the generator used for shake directions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    /// Advance zoom and shake by one tick.
    ///
    /// Does nothing while another camera is active in `ctx`.
    pub fn update(&mut self, clock: &dyn GameLoop, ctx: &mut ViewContext) {
        if !ctx.is_camera_active(self.id) {
            return;
        }

        self.step_zoom(clock, ctx);

        let shake = match self.shake {
            Some(shake) if is_running(&shake, clock) => shake,
            _ => {
                self.shake_offset = Vec2::ZERO;
                return;
            }
        };

        let due = self
            .last_shake
            .map_or(true, |tick| clock.delta_time(tick) > shake.delay);
        if due {
            self.shake_offset = Vec2::new(
                shake.intensity * self.random_sign(),
                shake.intensity * self.random_sign(),
            );
            self.last_shake = Some(clock.ticks());
        }
    }

    fn step_zoom(&mut self, clock: &dyn GameLoop, ctx: &mut ViewContext) {
        let Some(zoom) = self.zoom else {
            return;
        };

        if zoom.target == ctx.render_scale() {
            self.zoom = None;
            return;
        }

        if clock.delta_time(zoom.tick) >= zoom.delay {
            ctx.set_render_scale(zoom.target);
            self.zoom = None;
            log::debug!("Camera {:?} reached zoom {}", self.id, zoom.target);
            self.listeners.notify(zoom.target);
            return;
        }

        // Never step past the target; the final value is applied by the snap above.
        let next = ctx.render_scale() + zoom.step;
        let next = if zoom.step > 0.0 {
            next.min(zoom.target)
        } else {
            next.max(zoom.target)
        };
        ctx.set_render_scale(next);
        self.listeners.notify(ctx.render_scale());
    }

    /// Change the render scale to `target`, immediately or over `delay_ms`.
    ///
    /// Replaces any transition in flight. Non-positive targets are ignored.
    pub fn set_zoom(
        &mut self,
        target: f32,
        delay_ms: u32,
        clock: &dyn GameLoop,
        ctx: &mut ViewContext,
    ) {
        if !(target > 0.0 && target.is_finite()) {
            log::warn!("Ignoring zoom request to {}", target);
            return;
        }

        if delay_ms == 0 {
            ctx.set_render_scale(target);
            self.zoom = None;
            self.listeners.notify(target);
            return;
        }

        // whole ticks that fit into the delay
        let ticks = u64::from(delay_ms) * u64::from(clock.update_rate()) / 1000;
        let delta = target - ctx.render_scale();
        let step = if ticks > 0 {
            (f64::from(delta) / ticks as f64) as f32
        } else {
            delta
        };

        self.zoom = Some(ZoomTransition {
            target,
            delay: u64::from(delay_ms),
            tick: clock.ticks(),
            step,
        });
    }

    /// Target scale of the transition in flight, if any.
    pub fn pending_zoom(&self) -> Option<f32> {
        self.zoom.map(|zoom| zoom.target)
    }

    /// Shake the view by `intensity` world units for `duration_ms`, picking a
    /// new direction at most every `delay_ms`.
    ///
    /// Replaces any shake in progress.
    pub fn shake(&mut self, intensity: f32, delay_ms: u32, duration_ms: u32, clock: &dyn GameLoop) {
        self.shake = Some(Shake {
            intensity,
            delay: u64::from(delay_ms),
            duration: u64::from(duration_ms),
            tick: clock.ticks(),
        });
        self.last_shake = None;
    }

    pub fn is_shake_active(&self, clock: &dyn GameLoop) -> bool {
        self.shake.map_or(false, |shake| is_running(&shake, clock))
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Register a callback invoked with the new render scale whenever it changes.
    pub fn on_zoom_changed(&self, callback: impl Fn(f32) + 'static) {
        self.listeners.add(callback);
    }

    /// Handle to the zoom-change callbacks.
    pub fn zoom_listeners(&self) -> ZoomListeners {
        self.listeners.clone()
    }

    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    /// Center the view on `focus`.
    pub fn set_focus(&mut self, focus: Vec2) {
        let mut focus = focus;
        if self.config.subpixel_focus_nudge && is_quarter_pixel(focus.y) {
            focus.y += 0.01;
        }

        self.focus = focus;
    }

    /// Apply the shake offset to the focus and recompute the viewport.
    pub fn update_focus(&mut self, clock: &dyn GameLoop, ctx: &ViewContext) {
        if !self.is_shake_active(clock) {
            self.shake_offset = Vec2::ZERO;
        }

        self.set_focus(self.focus + self.shake_offset);

        let center = self.viewport_center(ctx);
        let size = ctx.world_resolution();
        self.viewport = Rect::new(
            self.focus.x - center.x,
            self.focus.y - center.y,
            size.width,
            size.height,
        );
    }

    /// Visible world region as of the last [`Camera::update_focus`].
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Viewport center in world units at the current render scale.
    pub fn viewport_center(&self, ctx: &ViewContext) -> Vec2 {
        ctx.resolution().half() / ctx.render_scale()
    }

    /// Offset added to world coordinates to get viewport coordinates.
    pub fn pixel_offset(&self, ctx: &ViewContext) -> Vec2 {
        self.viewport_center(ctx) - self.focus
    }

    pub fn map_to_viewport(&self, map_location: Vec2, ctx: &ViewContext) -> Vec2 {
        map_location + self.pixel_offset(ctx)
    }

    pub fn viewport_to_map(&self, viewport_location: Vec2, ctx: &ViewContext) -> Vec2 {
        viewport_location - self.pixel_offset(ctx)
    }

    /// Viewport location at which the entity's sprite is drawn.
    ///
    /// A sprite larger than the hitbox is centered over it.
    pub fn viewport_location_of(&self, entity: &dyn Entity, ctx: &ViewContext) -> Vec2 {
        let location = match entity.sprite_size() {
            Some(sprite) => {
                let size = entity.size();
                entity.location()
                    - Vec2::new(
                        (sprite.width - size.width) * 0.5,
                        (sprite.height - size.height) * 0.5,
                    )
            }
            None => entity.location(),
        };

        self.map_to_viewport(location, ctx)
    }

    /// Viewport position of the center of what is drawn for the entity.
    pub fn viewport_dimension_center(&self, entity: &dyn Entity, ctx: &ViewContext) -> Vec2 {
        let drawn: Size = entity.sprite_size().unwrap_or_else(|| entity.size());
        self.viewport_location_of(entity, ctx) + drawn.half()
    }

    /// World-to-clip transform for GPU renderers.
    pub fn view_projection(&self, ctx: &ViewContext) -> Mat4 {
        let resolution = ctx.resolution();
        let projection =
            Mat4::orthographic_rh_gl(0.0, resolution.width, resolution.height, 0.0, -1.0, 1.0);
        let scale = ctx.render_scale();
        let zoom = Mat4::from_scale(Vec3::new(scale, scale, 1.0));
        let offset = self.pixel_offset(ctx).to_glam();
        let translation = Mat4::from_translation(offset.extend(0.0));

        projection * zoom * translation
    }

    fn random_sign(&mut self) -> f32 {
        if self.rng.bool() {
            1.0
        } else {
            -1.0
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

fn is_running(shake: &Shake, clock: &dyn GameLoop) -> bool {
    clock.delta_time(shake.tick) < shake.duration
}

fn is_quarter_pixel(y: f32) -> bool {
    let scaled = (y - y.floor()) * 4.0;
    (scaled - scaled.round()).abs() < 1e-4
}
