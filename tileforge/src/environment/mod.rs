//! Live entity container fed by map object loaders.

mod loader;
mod map_object;
mod trigger;

use std::collections::HashMap;

pub use loader::{ensure_type, load_default_properties, MapObjectLoader};
pub use map_object::{
    load_map_objects_from_file, load_map_objects_from_json, parse_int_list, MapObject,
    MapObjectProperty, MapObjectType, Property, PropertySource, PropertyType,
};
pub use trigger::TriggerMapObjectLoader;

use crate::entities::{Entity, Trigger};
use crate::error::LoadError;

/// Holds the live entities of one loaded map.
///
/// Map objects are dispatched to the loader registered for their type. The
/// trigger loader is registered by default.
pub struct Environment {
    entities: Vec<Box<dyn Entity>>,
    loaders: HashMap<MapObjectType, Box<dyn MapObjectLoader>>,
}

impl Environment {
    /// Create an empty environment with the built-in loaders.
    pub fn new() -> Self {
        let mut environment = Self {
            entities: Vec::new(),
            loaders: HashMap::new(),
        };
        environment.register_loader(Box::new(TriggerMapObjectLoader::new()));
        environment
    }

    /// Register a loader, replacing any loader for the same type.
    pub fn register_loader(&mut self, loader: Box<dyn MapObjectLoader>) {
        self.loaders.insert(loader.object_type(), loader);
    }

    pub fn has_loader(&self, kind: MapObjectType) -> bool {
        self.loaders.contains_key(&kind)
    }

    /// Load a map object and add the resulting entities.
    ///
    /// Returns the map ids of the added entities.
    pub fn load(&mut self, map_object: &MapObject) -> Result<Vec<i32>, LoadError> {
        let loader = map_object
            .object_type()
            .and_then(|kind| self.loaders.get(&kind))
            .ok_or_else(|| LoadError::NoLoader {
                id: map_object.id,
                kind: map_object.kind.clone(),
            })?;

        let entities = loader.load(map_object)?;
        let ids = entities.iter().map(|e| e.map_id()).collect();
        for entity in entities {
            self.add(entity);
        }

        Ok(ids)
    }

    /// Load every map object, skipping the ones that fail.
    ///
    /// Returns the number of entities added.
    pub fn load_all<'a>(&mut self, map_objects: impl IntoIterator<Item = &'a MapObject>) -> usize {
        let mut loaded = 0;
        for map_object in map_objects {
            match self.load(map_object) {
                Ok(ids) => loaded += ids.len(),
                Err(err) => log::warn!("Skipping map object: {}", err),
            }
        }

        log::info!("{} entities loaded ({} total)", loaded, self.entities.len());
        loaded
    }

    /// Re-synchronize the entities of `map_object` with its current data.
    ///
    /// The previous entities are kept when the new data fails to load.
    pub fn reload(&mut self, map_object: &MapObject) -> Result<Vec<i32>, LoadError> {
        let previous: Vec<Box<dyn Entity>> = {
            let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
                .into_iter()
                .partition(|e| e.map_id() == map_object.id);
            self.entities = rest;
            matching
        };

        match self.load(map_object) {
            Ok(ids) => Ok(ids),
            Err(err) => {
                self.entities.extend(previous);
                Err(err)
            }
        }
    }

    pub fn add(&mut self, entity: Box<dyn Entity>) {
        self.entities.push(entity);
    }

    /// Remove every entity with the given map id. Returns how many were removed.
    pub fn remove(&mut self, map_id: i32) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.map_id() != map_id);
        before - self.entities.len()
    }

    pub fn get(&self, map_id: i32) -> Option<&(dyn Entity + 'static)> {
        self.entities
            .iter()
            .find(|e| e.map_id() == map_id)
            .map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, map_id: i32) -> Option<&mut (dyn Entity + 'static)> {
        self.entities
            .iter_mut()
            .find(|e| e.map_id() == map_id)
            .map(|e| e.as_mut())
    }

    /// Entity with the given map id, if it is a `T`.
    pub fn get_as<T: Entity>(&self, map_id: i32) -> Option<&T> {
        self.get(map_id)?.as_any().downcast_ref::<T>()
    }

    pub fn get_as_mut<T: Entity>(&mut self, map_id: i32) -> Option<&mut T> {
        self.get_mut(map_id)?.as_any_mut().downcast_mut::<T>()
    }

    /// All entities of type `T`.
    pub fn all_of<T: Entity>(&self) -> impl Iterator<Item = &T> {
        self.entities
            .iter()
            .filter_map(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.all_of::<Trigger>()
    }

    pub fn entities(&self) -> impl Iterator<Item = &(dyn Entity + 'static)> {
        self.entities.iter().map(|e| e.as_ref())
    }

    pub fn by_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a (dyn Entity + 'static)> + 'a {
        self.entities().filter(move |e| e.base().has_tag(tag))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Tear down every entity.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} entities", self.entities.len());
        self.entities.clear();
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger_object(id: i32, name: &str) -> MapObject {
        MapObject::new(id, "trigger", name).with_size(16.0, 16.0)
    }

    #[test]
    fn loads_registered_types() {
        let mut env = Environment::new();
        assert!(env.has_loader(MapObjectType::Trigger));

        let ids = env.load(&trigger_object(1, "a")).unwrap();
        assert_eq!(ids, vec![1]);
        assert_eq!(env.len(), 1);
        assert_eq!(env.get_as::<Trigger>(1).map(|t| t.to_string()), Some("#1: a".to_string()));
    }

    #[test]
    fn unknown_types_have_no_loader() {
        let mut env = Environment::new();
        let err = env.load(&MapObject::new(2, "spaceship", "x")).unwrap_err();
        assert_eq!(
            err,
            LoadError::NoLoader {
                id: 2,
                kind: "spaceship".to_string()
            }
        );
        let err = env.load(&MapObject::new(3, "prop", "x")).unwrap_err();
        assert!(matches!(err, LoadError::NoLoader { id: 3, .. }));
    }

    #[test]
    fn load_all_skips_failures() {
        let objects = vec![
            trigger_object(1, "a"),
            trigger_object(2, "b").with_property(MapObjectProperty::TRIGGER_ACTIVATION, "BOGUS"),
            MapObject::new(3, "creature", "rat"),
            trigger_object(4, "c"),
        ];

        let mut env = Environment::new();
        assert_eq!(env.load_all(&objects), 2);
        assert_eq!(env.triggers().count(), 2);
        assert!(env.get(2).is_none());
    }

    #[test]
    fn reload_replaces_entity_and_keeps_it_on_failure() {
        let mut env = Environment::new();
        env.load(&trigger_object(7, "lever")).unwrap();

        let changed = trigger_object(7, "lever")
            .with_location(10.0, 20.0)
            .with_property(MapObjectProperty::TRIGGER_ACTIVATION, "INTERACT");
        env.reload(&changed).unwrap();
        assert_eq!(env.len(), 1);
        let trigger = env.get_as::<Trigger>(7).unwrap();
        assert_eq!(trigger.location().x, 10.0);

        let broken = changed.with_property(MapObjectProperty::TRIGGER_ACTIVATION, "??");
        assert!(env.reload(&broken).is_err());
        assert_eq!(env.len(), 1);
        assert_eq!(
            env.get_as::<Trigger>(7).map(|t| t.activation()),
            Some(crate::entities::TriggerActivation::Interact)
        );
    }

    #[test]
    fn mutable_access_and_teardown() {
        let mut env = Environment::new();
        env.load(&trigger_object(1, "a").with_property(MapObjectProperty::TAGS, "door"))
            .unwrap();
        env.load(&trigger_object(2, "b")).unwrap();

        assert!(env.get_as_mut::<Trigger>(1).unwrap().activate(5));
        assert!(env.get_as::<Trigger>(1).unwrap().is_activated());
        assert_eq!(env.by_tag("door").count(), 1);

        assert_eq!(env.remove(2), 1);
        env.clear();
        assert!(env.is_empty());
    }
}
