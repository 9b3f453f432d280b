//! Tileforge - tile-map environments and a tick-driven 2D camera.
//!
//! Map objects are loaded into live entities held by an [`Environment`]; a
//! [`Camera`] driven by a [`GameLoop`] clock maps between world and viewport
//! coordinates and applies zoom transitions and screen shake.

pub mod camera;
pub mod clock;
pub mod config;
pub mod entities;
pub mod environment;
pub mod error;
pub mod math;
pub mod render;
pub mod view;

pub use crate::camera::{Camera, CameraId, ZoomListeners};
pub use crate::clock::{GameLoop, TickClock};
pub use crate::config::{CameraConfig, EngineConfig};
pub use crate::entities::{Entity, EntityBase, Trigger, TriggerActivation};
pub use crate::environment::{
    Environment, MapObject, MapObjectLoader, MapObjectProperty, MapObjectType, PropertySource,
    TriggerMapObjectLoader,
};
pub use crate::error::LoadError;
pub use crate::math::{Rect, Size, Vec2};
pub use crate::render::{MapRenderer, Spritesheet, Tilemap};
pub use crate::view::ViewContext;
