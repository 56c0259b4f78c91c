pub mod api;
pub mod core;
pub mod components;
pub mod navigation;
pub mod systems;
pub mod input;
pub mod assets;
pub mod error;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::game::{Game, WorldConfig, EngineContext};
pub use api::types::{EntityId, SteeringRecord, PositionRecord};
pub use components::entity::Entity;
pub use components::layer::CollisionLayer;
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use core::grid::SpatialGrid;
pub use core::collision::{
    CollisionWorld, StaticCollider, DynamicEntity, ValidatedPosition,
    ColliderHandle, EntityHandle, CollisionDebugInfo,
};
pub use navigation::destination::{Destination, DestinationCatalog, DestinationKind, Site};
pub use navigation::pathfinder::{
    Pathfinder, PathfinderConfig, PathfindingState, MovementState,
    SpeedClass, Steering, NpcSnapshot, NpcDebugInfo,
};
pub use input::queue::{Intent, IntentQueue};
pub use assets::manifest::{TownLayout, BuildingDescriptor, ObstacleDescriptor};
pub use systems::debug::{debug_snapshot, debug_snapshot_json, DebugSnapshot};
pub use systems::movement::{heading_vector, walk_entity};
pub use error::{CollisionError, LayoutError};
