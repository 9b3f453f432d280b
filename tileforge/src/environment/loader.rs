use crate::entities::Entity;
use crate::environment::map_object::{MapObject, MapObjectProperty, MapObjectType, PropertySource};
use crate::error::LoadError;

/// Turns map objects of one type into live entities.
pub trait MapObjectLoader {
    /// The map object type this loader accepts.
    fn object_type(&self) -> MapObjectType;

    /// Create the entities described by `map_object`.
    fn load(&self, map_object: &MapObject) -> Result<Vec<Box<dyn Entity>>, LoadError>;
}

/// Fail unless `map_object` carries the type tag `expected`.
pub fn ensure_type(map_object: &MapObject, expected: MapObjectType) -> Result<(), LoadError> {
    if map_object.object_type() == Some(expected) {
        return Ok(());
    }

    Err(LoadError::WrongMapObjectType {
        id: map_object.id,
        expected: expected.tag(),
        actual: map_object.kind.clone(),
    })
}

/// Common entity setup shared by every loader.
///
/// Binds the entity to its map object (map id, name, geometry) and copies
/// the comma separated `TAGS` property.
pub fn load_default_properties(entity: &mut dyn Entity, map_object: &MapObject) {
    let base = entity.base_mut();
    base.set_map_id(map_object.id);
    if !map_object.name.is_empty() {
        base.set_name(map_object.name.clone());
    }
    base.set_size(map_object.width, map_object.height);
    base.set_location(map_object.location());

    if let Some(tags) = map_object.get(MapObjectProperty::TAGS) {
        for tag in tags.split(',').map(str::trim) {
            base.add_tag(tag);
        }
    }
}
