use crate::entities::ParseActivationError;

/// Errors raised while turning map objects into entities.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The map object was handed to a loader for a different type.
    #[error("cannot load map object #{id} of type '{actual}' with a loader for '{expected}'")]
    WrongMapObjectType {
        id: i32,
        expected: &'static str,
        actual: String,
    },

    /// No loader is registered for the map object's type.
    #[error("no loader registered for map object #{id} of type '{kind}'")]
    NoLoader { id: i32, kind: String },

    /// A trigger declared an activation that does not exist.
    #[error("map object #{id}: {source}")]
    InvalidActivation {
        id: i32,
        #[source]
        source: ParseActivationError,
    },
}
