use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::layer::CollisionLayer;
use crate::core::collision::DEFAULT_ENTITY_RADIUS;
use crate::navigation::pathfinder::{NpcSnapshot, SpeedClass};

/// Walking speed for entities that never set one (world units per second).
pub const DEFAULT_WALK_SPEED: f32 = 3.0;

/// Fat Entity: one struct per walker in town (player, NPC, animal).
/// The scene owns it; the collision world only holds a position snapshot
/// keyed by `tag`.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Name in the collision world and the pathfinder. Must be unique.
    pub tag: String,
    /// Inactive entities are skipped by steering.
    pub active: bool,
    /// Position on the ground plane (`y` is world Z).
    pub pos: Vec2,
    /// Facing in radians, `atan2(dx, dz)` convention.
    pub heading: f32,
    /// Collision circle radius.
    pub radius: f32,
    /// World units per second.
    pub walk_speed: f32,
    pub layer: CollisionLayer,
    /// `Some` for NPCs that wander on their own.
    pub wanderer: Option<SpeedClass>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: format!("entity-{}", id.0),
            active: true,
            pos: Vec2::ZERO,
            heading: 0.0,
            radius: DEFAULT_ENTITY_RADIUS,
            walk_speed: DEFAULT_WALK_SPEED,
            layer: CollisionLayer::default(),
            wanderer: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Hand the entity to the pathfinder.
    pub fn wandering(mut self, speed: SpeedClass) -> Self {
        self.wanderer = Some(speed);
        self.layer = CollisionLayer::NPC;
        self
    }

    /// What the pathfinder sees of this entity, if it wanders.
    pub fn npc_snapshot(&self) -> Option<NpcSnapshot<'_>> {
        self.wanderer.map(|speed| NpcSnapshot {
            id: &self.tag,
            pos: self.pos,
            speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_standing_npc_sized_body() {
        let e = Entity::new(EntityId(7));
        assert_eq!(e.tag, "entity-7");
        assert_eq!(e.radius, 0.5);
        assert!(e.active);
        assert!(e.npc_snapshot().is_none());
    }

    #[test]
    fn wandering_sets_layer_and_snapshot() {
        let e = Entity::new(EntityId(1))
            .with_tag("baker")
            .with_pos(Vec2::new(3.0, -2.0))
            .wandering(SpeedClass::Slow);
        assert_eq!(e.layer, CollisionLayer::NPC);
        let snap = e.npc_snapshot().unwrap();
        assert_eq!(snap.id, "baker");
        assert_eq!(snap.pos, Vec2::new(3.0, -2.0));
        assert_eq!(snap.speed, SpeedClass::Slow);
    }
}
