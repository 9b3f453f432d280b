//! Live entities created from map objects.
//!
//! Entities are plain objects owned by an [`Environment`](crate::environment::Environment).
//! Every entity carries an [`EntityBase`] with the data shared by all kinds of
//! entities (map id, name, geometry, tags).

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::math::{Rect, Size, Vec2};

/// Map id meaning "no id assigned" in the map format.
pub const NO_MAP_ID: i32 = 0;

/// Data shared by every entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityBase {
    map_id: i32,
    name: Option<String>,
    location: Vec2,
    size: Size,
    tags: Vec<String>,
}

impl EntityBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_id(&self) -> i32 {
        self.map_id
    }

    pub fn set_map_id(&mut self, map_id: i32) {
        self.map_id = map_id;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn location(&self) -> Vec2 {
        self.location
    }

    pub fn set_location(&mut self, location: Vec2) {
        self.location = location;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Size::new(width, height);
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_location_size(self.location, self.size)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a tag unless it is already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// `#<map id>: <name>`, falling back to `kind` when the entity has no name.
    pub fn label(&self, kind: &str) -> String {
        match self.name() {
            Some(name) if !name.is_empty() => format!("#{}: {}", self.map_id, name),
            _ => format!("#{}: {}", self.map_id, kind),
        }
    }
}

/// Object-safe interface implemented by every live entity.
pub trait Entity: Any {
    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Size of the sprite currently drawn for this entity, if any.
    ///
    /// Cameras center sprites that are larger than the hitbox over it.
    fn sprite_size(&self) -> Option<Size> {
        None
    }

    fn map_id(&self) -> i32 {
        self.base().map_id()
    }

    fn name(&self) -> Option<&str> {
        self.base().name()
    }

    fn location(&self) -> Vec2 {
        self.base().location()
    }

    fn size(&self) -> Size {
        self.base().size()
    }
}

/// How a trigger gets activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TriggerActivation {
    /// Fires when a qualifying entity collides with the trigger area.
    #[default]
    Collision,
    /// Fires when a qualifying entity explicitly interacts with the trigger.
    Interact,
}

impl TriggerActivation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerActivation::Collision => "COLLISION",
            TriggerActivation::Interact => "INTERACT",
        }
    }
}

impl fmt::Display for TriggerActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized trigger activation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trigger activation '{0}' (expected COLLISION or INTERACT)")]
pub struct ParseActivationError(pub String);

impl FromStr for TriggerActivation {
    type Err = ParseActivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("ON_")
            .or_else(|| trimmed.strip_prefix("on_"))
            .unwrap_or(trimmed);

        if name.eq_ignore_ascii_case("COLLISION") {
            Ok(TriggerActivation::Collision)
        } else if name.eq_ignore_ascii_case("INTERACT") {
            Ok(TriggerActivation::Interact)
        } else {
            Err(ParseActivationError(s.to_string()))
        }
    }
}

/// Area that fires game logic when a qualifying entity activates it.
#[derive(Clone, Debug, PartialEq)]
pub struct Trigger {
    base: EntityBase,
    activation: TriggerActivation,
    message: Option<String>,
    one_time: bool,
    targets: Vec<i32>,
    activators: Vec<i32>,
    arguments: BTreeMap<String, String>,
    activated: bool,
}

impl Trigger {
    pub fn new(
        activation: TriggerActivation,
        name: impl Into<String>,
        message: Option<String>,
        one_time: bool,
        arguments: BTreeMap<String, String>,
    ) -> Self {
        let mut base = EntityBase::new();
        base.set_name(name);
        Self {
            base,
            activation,
            message,
            one_time,
            targets: Vec::new(),
            activators: Vec::new(),
            arguments,
            activated: false,
        }
    }

    pub fn activation(&self) -> TriggerActivation {
        self.activation
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_one_time(&self) -> bool {
        self.one_time
    }

    /// Map ids of the entities this trigger acts upon.
    pub fn targets(&self) -> &[i32] {
        &self.targets
    }

    /// Map ids allowed to activate this trigger. Empty means anyone.
    pub fn activators(&self) -> &[i32] {
        &self.activators
    }

    /// Add a target id. Returns false for the unset id or a duplicate.
    pub fn add_target(&mut self, map_id: i32) -> bool {
        push_id(&mut self.targets, map_id)
    }

    /// Add an activator id. Returns false for the unset id or a duplicate.
    pub fn add_activator(&mut self, map_id: i32) -> bool {
        push_id(&mut self.activators, map_id)
    }

    pub fn arguments(&self) -> &BTreeMap<String, String> {
        &self.arguments
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn can_activate(&self, activator: i32) -> bool {
        if self.one_time && self.activated {
            return false;
        }

        self.activators.is_empty() || self.activators.contains(&activator)
    }

    /// Activate the trigger on behalf of `activator`. Returns whether it fired.
    pub fn activate(&mut self, activator: i32) -> bool {
        if !self.can_activate(activator) {
            log::debug!("{} refused activation by #{}", self, activator);
            return false;
        }

        self.activated = true;
        log::debug!("{} activated by #{} ({} targets)", self, activator, self.targets.len());
        true
    }
}

fn push_id(ids: &mut Vec<i32>, map_id: i32) -> bool {
    if map_id == NO_MAP_ID || ids.contains(&map_id) {
        return false;
    }

    ids.push(map_id);
    true
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base.label("Trigger"))
    }
}

impl Entity for Trigger {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
