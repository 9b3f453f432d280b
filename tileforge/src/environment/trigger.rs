use std::collections::BTreeMap;

use crate::entities::{Entity, Trigger, TriggerActivation};
use crate::environment::loader::{ensure_type, load_default_properties, MapObjectLoader};
use crate::environment::map_object::{MapObject, MapObjectProperty, MapObjectType, PropertySource};
use crate::error::LoadError;

/// Loads `trigger` map objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct TriggerMapObjectLoader;

impl TriggerMapObjectLoader {
    pub fn new() -> Self {
        Self
    }

    /// Build the trigger described by `map_object`.
    pub fn load_trigger(&self, map_object: &MapObject) -> Result<Trigger, LoadError> {
        ensure_type(map_object, MapObjectType::Trigger)?;

        let activation = match map_object.get(MapObjectProperty::TRIGGER_ACTIVATION) {
            Some(value) => value
                .parse::<TriggerActivation>()
                .map_err(|source| LoadError::InvalidActivation {
                    id: map_object.id,
                    source,
                })?,
            None => TriggerActivation::Collision,
        };

        let message = map_object
            .get(MapObjectProperty::TRIGGER_MESSAGE)
            .map(str::to_string);

        let arguments: BTreeMap<String, String> = map_object
            .custom_properties()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let mut trigger = Trigger::new(
            activation,
            map_object.name.clone(),
            message,
            map_object.get_bool(MapObjectProperty::TRIGGER_ONETIME),
            arguments,
        );

        // add_target/add_activator drop the unset id 0
        for target in map_object.get_int_list(MapObjectProperty::TRIGGER_TARGETS) {
            trigger.add_target(target);
        }

        for activator in map_object.get_int_list(MapObjectProperty::TRIGGER_ACTIVATORS) {
            trigger.add_activator(activator);
        }

        load_default_properties(&mut trigger, map_object);

        log::debug!(
            "Loaded {} ({}, targets {:?}, activators {:?})",
            trigger,
            trigger.activation(),
            trigger.targets(),
            trigger.activators()
        );
        Ok(trigger)
    }
}

impl MapObjectLoader for TriggerMapObjectLoader {
    fn object_type(&self) -> MapObjectType {
        MapObjectType::Trigger
    }

    fn load(&self, map_object: &MapObject) -> Result<Vec<Box<dyn Entity>>, LoadError> {
        let trigger = self.load_trigger(map_object)?;
        Ok(vec![Box::new(trigger)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Size, Vec2};

    fn trigger_object() -> MapObject {
        MapObject::new(12, "trigger", "door1")
            .with_size(32.0, 32.0)
            .with_location(64.0, 96.0)
    }

    #[test]
    fn rejects_other_types() {
        let object = MapObject::new(3, "prop", "barrel");
        let err = TriggerMapObjectLoader::new().load(&object).err().unwrap();
        assert_eq!(
            err,
            LoadError::WrongMapObjectType {
                id: 3,
                expected: "trigger",
                actual: "prop".to_string(),
            }
        );
    }

    #[test]
    fn zero_ids_are_filtered() {
        let object = trigger_object()
            .with_property(MapObjectProperty::TRIGGER_TARGETS, "3,0,5")
            .with_property(MapObjectProperty::TRIGGER_ACTIVATORS, "0,0,9");
        let trigger = TriggerMapObjectLoader::new().load_trigger(&object).unwrap();
        assert_eq!(trigger.targets(), &[3, 5]);
        assert_eq!(trigger.activators(), &[9]);
    }

    #[test]
    fn missing_activation_defaults_to_collision() {
        let trigger = TriggerMapObjectLoader::new()
            .load_trigger(&trigger_object())
            .unwrap();
        assert_eq!(trigger.activation(), TriggerActivation::Collision);
        assert!(!trigger.is_one_time());
        assert_eq!(trigger.message(), None);
        assert!(trigger.targets().is_empty());
        assert!(trigger.activators().is_empty());
    }

    #[test]
    fn unknown_activation_fails_the_load() {
        let object =
            trigger_object().with_property(MapObjectProperty::TRIGGER_ACTIVATION, "TELEPATHY");
        let err = TriggerMapObjectLoader::new().load(&object).err().unwrap();
        assert!(matches!(err, LoadError::InvalidActivation { id: 12, .. }));

        let err = TriggerMapObjectLoader::new().load_trigger(&object).unwrap_err();
        assert!(matches!(err, LoadError::InvalidActivation { id: 12, .. }));
    }

    #[test]
    fn bad_id_tokens_do_not_lose_the_rest() {
        let object =
            trigger_object().with_property(MapObjectProperty::TRIGGER_TARGETS, "4,lever,6");
        let trigger = TriggerMapObjectLoader::new().load_trigger(&object).unwrap();
        assert_eq!(trigger.targets(), &[4, 6]);
    }

    #[test]
    fn custom_properties_become_arguments() {
        let object = trigger_object()
            .with_property(MapObjectProperty::TRIGGER_MESSAGE, "The door opens")
            .with_property(MapObjectProperty::TRIGGER_ONETIME, "true")
            .with_property("sound", "creak.ogg")
            .with_property("delay", " 250 ");
        let trigger = TriggerMapObjectLoader::new().load_trigger(&object).unwrap();

        assert_eq!(trigger.message(), Some("The door opens"));
        assert!(trigger.is_one_time());
        assert_eq!(trigger.arguments().len(), 2);
        assert_eq!(trigger.argument("sound"), Some("creak.ogg"));
        assert_eq!(trigger.argument("delay"), Some(" 250 "));
        assert_eq!(trigger.argument(MapObjectProperty::TRIGGER_MESSAGE), None);
    }

    #[test]
    fn geometry_and_map_id_come_from_the_map_object() {
        let object = trigger_object().with_property(MapObjectProperty::TAGS, "door, north");
        let entities = TriggerMapObjectLoader::new().load(&object).unwrap();
        assert_eq!(entities.len(), 1);

        let entity = &entities[0];
        assert_eq!(entity.map_id(), 12);
        assert_eq!(entity.name(), Some("door1"));
        assert_eq!(entity.location(), Vec2::new(64.0, 96.0));
        assert_eq!(entity.size(), Size::new(32.0, 32.0));
        assert!(entity.base().has_tag("north"));
        assert!(entity.as_any().downcast_ref::<Trigger>().is_some());
    }

    #[test]
    fn tags_are_not_trigger_arguments() {
        let object = trigger_object()
            .with_property(MapObjectProperty::TAGS, "door")
            .with_property("sound", "creak.ogg");
        let trigger = TriggerMapObjectLoader::new().load_trigger(&object).unwrap();

        assert!(trigger.base().has_tag("door"));
        assert_eq!(trigger.argument(MapObjectProperty::TAGS), None);
        assert_eq!(trigger.arguments().keys().collect::<Vec<_>>(), vec!["sound"]);
    }
}
