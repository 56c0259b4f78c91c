use thiserror::Error;

/// Errors raised by the registration surface of the collision world.
/// Queries never fail; only setup calls that would corrupt the tables do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// Another live entity already uses this id.
    /// Unregister the old one first, or pick a fresh id.
    #[error("entity id `{0}` is already registered")]
    DuplicateEntityId(String),

    /// Entity radii must be finite and strictly positive.
    #[error("entity `{id}` has invalid radius {radius}")]
    InvalidRadius { id: String, radius: f32 },

    /// A static box with inverted or non-finite bounds.
    #[error("invalid collider bounds x:[{min_x}, {max_x}] z:[{min_z}, {max_z}]")]
    InvalidBounds {
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    },
}

/// Errors raised while loading a town layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("malformed town layout: {0}")]
    Json(#[from] serde_json::Error),

    /// NPCs need at least one place to walk to.
    #[error("town layout defines no destinations")]
    NoDestinations,

    /// The town's colliders and destinations are set once per context.
    #[error("town is already built")]
    AlreadyBuilt,

    #[error(transparent)]
    Collider(#[from] CollisionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_id_message_names_the_id() {
        let err = CollisionError::DuplicateEntityId("player".into());
        assert_eq!(err.to_string(), "entity id `player` is already registered");
    }

    #[test]
    fn json_errors_convert_into_layout_errors() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: LayoutError = json_err.into();
        assert!(matches!(err, LayoutError::Json(_)));
    }
}
