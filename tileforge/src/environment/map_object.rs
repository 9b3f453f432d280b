//! Declarative map objects and typed access to their properties.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::math::{Size, Vec2};

/// Property keys consumed by the engine itself.
///
/// Every key that is not listed here is a custom, user-defined key.
pub struct MapObjectProperty;

impl MapObjectProperty {
    pub const TRIGGER_MESSAGE: &'static str = "TRIGGER_MESSAGE";
    pub const TRIGGER_ACTIVATION: &'static str = "TRIGGER_ACTIVATION";
    pub const TRIGGER_TARGETS: &'static str = "TRIGGER_TARGETS";
    pub const TRIGGER_ACTIVATORS: &'static str = "TRIGGER_ACTIVATORS";
    pub const TRIGGER_ONETIME: &'static str = "TRIGGER_ONETIME";
    pub const TAGS: &'static str = "TAGS";

    pub const RESERVED: &'static [&'static str] = &[
        Self::TRIGGER_MESSAGE,
        Self::TRIGGER_ACTIVATION,
        Self::TRIGGER_TARGETS,
        Self::TRIGGER_ACTIVATORS,
        Self::TRIGGER_ONETIME,
        Self::TAGS,
    ];

    /// Whether `name` is a user-defined key rather than one the engine consumes.
    pub fn is_custom(name: &str) -> bool {
        !Self::RESERVED.contains(&name)
    }
}

/// Kinds of map objects the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapObjectType {
    Trigger,
    Prop,
    Creature,
    LightSource,
    Spawnpoint,
    CollisionBox,
    Area,
}

impl MapObjectType {
    pub const ALL: [MapObjectType; 7] = [
        MapObjectType::Trigger,
        MapObjectType::Prop,
        MapObjectType::Creature,
        MapObjectType::LightSource,
        MapObjectType::Spawnpoint,
        MapObjectType::CollisionBox,
        MapObjectType::Area,
    ];

    /// Tag used for this type in map files.
    pub fn tag(&self) -> &'static str {
        match self {
            MapObjectType::Trigger => "trigger",
            MapObjectType::Prop => "prop",
            MapObjectType::Creature => "creature",
            MapObjectType::LightSource => "lightsource",
            MapObjectType::Spawnpoint => "spawnpoint",
            MapObjectType::CollisionBox => "collisionbox",
            MapObjectType::Area => "area",
        }
    }

    /// Resolve a type tag, ignoring case. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for MapObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Value type declared for a property in the map format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Int,
    Float,
    Bool,
}

/// Named string property attached to a map object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: PropertyType,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyType::String,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PropertyType) -> Self {
        self.kind = kind;
        self
    }
}

/// Read-only string property lookup with typed helpers.
pub trait PropertySource {
    fn get(&self, key: &str) -> Option<&str>;

    /// `true` only for a case-insensitive "true" value.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Absent or unparsable values read as 0.
    fn get_int(&self, key: &str) -> i32 {
        self.get(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    fn get_float(&self, key: &str) -> f32 {
        self.get(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0.0)
    }

    /// Delimited integer list; see [`parse_int_list`].
    fn get_int_list(&self, key: &str) -> Vec<i32> {
        self.get(key).map(parse_int_list).unwrap_or_default()
    }
}

impl PropertySource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// Parse a list of integers separated by commas, semicolons or whitespace.
///
/// Tokens that are not integers are skipped so a single bad id does not
/// discard the rest of the list.
pub fn parse_int_list(text: &str) -> Vec<i32> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<i32>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Skipping non-numeric id '{}' in '{}'", token, text);
                None
            }
        })
        .collect()
}

/// Placeable object read from a map file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub id: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    properties: Vec<Property>,
}

impl MapObject {
    pub fn new(id: i32, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(Property::new(name, value));
        self
    }

    pub fn object_type(&self) -> Option<MapObjectType> {
        MapObjectType::from_tag(&self.kind)
    }

    pub fn location(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn dimension(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Insert a property, replacing an existing one with the same name in place.
    pub fn set_property(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Property> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index))
    }

    pub fn all_properties(&self) -> &[Property] {
        &self.properties
    }

    /// Non-reserved properties as `(name, value)` pairs, in declaration order.
    pub fn custom_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .filter(|p| MapObjectProperty::is_custom(&p.name))
            .map(|p| (p.name.as_str(), p.value.as_str()))
    }
}

impl PropertySource for MapObject {
    fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == key)
            .map(|p| p.value.as_str())
    }
}

/// Read a JSON array of map objects.
///
/// Later duplicates of a property name replace earlier ones so keys stay unique.
pub fn load_map_objects_from_json(json: &str) -> Result<Vec<MapObject>> {
    let objects: Vec<MapObject> = serde_json::from_str(json)?;
    Ok(objects.into_iter().map(dedup_properties).collect())
}

pub fn load_map_objects_from_file(path: &Path) -> Result<Vec<MapObject>> {
    let json = std::fs::read_to_string(path)?;
    let objects = load_map_objects_from_json(&json)?;
    log::info!("{} map objects read from {:?}", objects.len(), path);
    Ok(objects)
}

fn dedup_properties(mut object: MapObject) -> MapObject {
    let properties = std::mem::take(&mut object.properties);
    for property in properties {
        object.set_property(property);
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_list_skips_bad_tokens() {
        assert_eq!(parse_int_list("3,0,5"), vec![3, 0, 5]);
        assert_eq!(parse_int_list(" 1, x ,2;;3 4"), vec![1, 2, 3, 4]);
        assert_eq!(parse_int_list("-7,abc"), vec![-7]);
        assert!(parse_int_list("").is_empty());
    }

    #[test]
    fn typed_getters_fall_back_to_defaults() {
        let object = MapObject::new(1, "trigger", "t")
            .with_property("flag", "TRUE")
            .with_property("count", " 12 ")
            .with_property("broken", "twelve")
            .with_property("speed", "1.5");

        assert!(object.get_bool("flag"));
        assert!(!object.get_bool("missing"));
        assert_eq!(object.get_int("count"), 12);
        assert_eq!(object.get_int("broken"), 0);
        assert_eq!(object.get_float("speed"), 1.5);
        assert!(object.get_int_list("missing").is_empty());
    }

    #[test]
    fn reserved_keys_are_not_custom() {
        assert!(!MapObjectProperty::is_custom(MapObjectProperty::TRIGGER_TARGETS));
        assert!(!MapObjectProperty::is_custom(MapObjectProperty::TAGS));
        assert!(MapObjectProperty::is_custom("sound"));

        let object = MapObject::new(1, "trigger", "t")
            .with_property(MapObjectProperty::TRIGGER_ONETIME, "true")
            .with_property("sound", "door.ogg")
            .with_property("delay", "3");
        let custom: Vec<_> = object.custom_properties().collect();
        assert_eq!(custom, vec![("sound", "door.ogg"), ("delay", "3")]);
    }

    #[test]
    fn set_property_keeps_keys_unique() {
        let mut object = MapObject::new(1, "prop", "crate").with_property("a", "1");
        object.set_property(Property::new("a", "2"));
        assert_eq!(object.all_properties().len(), 1);
        assert_eq!(object.get("a"), Some("2"));
        assert_eq!(object.remove_property("a").map(|p| p.value), Some("2".to_string()));
        assert_eq!(object.get("a"), None);
    }

    #[test]
    fn type_tags_resolve_case_insensitively() {
        assert_eq!(MapObjectType::from_tag("TRIGGER"), Some(MapObjectType::Trigger));
        assert_eq!(MapObjectType::from_tag("LightSource"), Some(MapObjectType::LightSource));
        assert_eq!(MapObjectType::from_tag("spaceship"), None);
    }

    #[test]
    fn json_objects_are_read_with_defaults() {
        let json = r#"[
            {
                "id": 4,
                "type": "trigger",
                "name": "door1",
                "x": 64, "y": 96, "width": 32, "height": 32,
                "properties": [
                    { "name": "TRIGGER_TARGETS", "value": "7" },
                    { "name": "TRIGGER_TARGETS", "value": "8" },
                    { "name": "hp", "type": "int", "value": "3" }
                ]
            },
            { "id": 5 }
        ]"#;

        let objects = load_map_objects_from_json(json).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].location(), Vec2::new(64.0, 96.0));
        assert_eq!(objects[0].get(MapObjectProperty::TRIGGER_TARGETS), Some("8"));
        assert_eq!(objects[0].all_properties()[1].kind, PropertyType::Int);
        assert_eq!(objects[1].object_type(), None);
    }
}
