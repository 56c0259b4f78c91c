//! Moving walkers through the collision world.
//!
//! Entities own their positions. Every move goes through
//! [`CollisionWorld::get_validated_position`] and the accepted position is
//! pushed back into the world under the entity's tag.

use glam::Vec2;

use crate::components::entity::Entity;
use crate::core::collision::{CollisionWorld, ValidatedPosition};
use crate::navigation::pathfinder::Steering;

/// Displacements shorter than this do not turn the walker.
const MIN_TURN_DISTANCE: f32 = 1e-4;

/// Unit direction on the ground plane for an `atan2(dx, dz)` heading.
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}

/// Heading that faces along `displacement`.
pub fn heading_of(displacement: Vec2) -> f32 {
    displacement.x.atan2(displacement.y)
}

/// Try to move `entity` by `displacement`, sliding along walls.
/// Writes the accepted position and heading back to the entity and syncs
/// the collision world.
pub fn walk_entity(entity: &mut Entity, collision: &mut CollisionWorld, displacement: Vec2) -> ValidatedPosition {
    let target = entity.pos + displacement;
    let result = collision.get_validated_position(Some(entity.tag.as_str()), target, entity.radius, true);
    let moved = result.pos - entity.pos;
    if moved.length_squared() > MIN_TURN_DISTANCE * MIN_TURN_DISTANCE {
        entity.heading = heading_of(moved);
    } else if displacement.length_squared() > MIN_TURN_DISTANCE * MIN_TURN_DISTANCE {
        // Blocked: face the wall we pushed against.
        entity.heading = heading_of(displacement);
    }
    entity.pos = result.pos;
    collision.set_entity_position(&entity.tag, entity.pos);
    result
}

/// Apply one pathfinder decision: walk `walk_speed * dt` along the steering
/// angle. Returns `None` when the NPC stays put.
pub fn steer_entity(
    entity: &mut Entity,
    collision: &mut CollisionWorld,
    steering: &Steering,
    dt: f32,
) -> Option<ValidatedPosition> {
    if !steering.should_move {
        return None;
    }
    let angle = steering.target_angle?;
    let displacement = heading_vector(angle) * entity.walk_speed * dt;
    Some(walk_entity(entity, collision, displacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::layer::CollisionLayer;

    fn world_with(entity: &Entity) -> CollisionWorld {
        let mut world = CollisionWorld::default();
        world
            .register_entity(entity.tag.clone(), entity.pos, entity.radius, CollisionLayer::PLAYER)
            .unwrap();
        world
    }

    #[test]
    fn heading_convention_matches_atan2_dx_dz() {
        let north = heading_vector(0.0);
        assert!((north - Vec2::new(0.0, 1.0)).length() < 1e-6);
        let east = heading_vector(std::f32::consts::FRAC_PI_2);
        assert!((east - Vec2::new(1.0, 0.0)).length() < 1e-6);
        let back = heading_of(Vec2::new(3.0, -4.0));
        assert!((heading_vector(back) - Vec2::new(0.6, -0.8)).length() < 1e-6);
    }

    #[test]
    fn free_walk_moves_and_syncs_collision_world() {
        let mut e = Entity::new(EntityId(1)).with_tag("player");
        let mut world = world_with(&e);
        let result = walk_entity(&mut e, &mut world, Vec2::new(0.5, 0.0));
        assert!(!result.collided);
        assert_eq!(e.pos, Vec2::new(0.5, 0.0));
        assert_eq!(world.entity("player").unwrap().pos, e.pos);
        assert!((e.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn diagonal_into_wall_slides_along_it() {
        let mut e = Entity::new(EntityId(1)).with_tag("player");
        let mut world = world_with(&e);
        world.add_static_box_min_max(1.0, 3.0, -5.0, 5.0).unwrap();
        let result = walk_entity(&mut e, &mut world, Vec2::new(0.8, 0.8));
        assert!(result.collided);
        assert_eq!(e.pos, Vec2::new(0.0, 0.8));
        assert_eq!(e.heading, 0.0);
    }

    #[test]
    fn steering_without_move_leaves_entity_alone() {
        let mut e = Entity::new(EntityId(1)).with_tag("npc").with_pos(Vec2::new(2.0, 2.0));
        let mut world = world_with(&e);
        assert!(steer_entity(&mut e, &mut world, &Steering::RESTING, 0.1).is_none());
        assert_eq!(e.pos, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn steering_integrates_walk_speed() {
        let mut e = Entity::new(EntityId(1))
            .with_tag("npc")
            .with_walk_speed(2.0);
        let mut world = world_with(&e);
        let steering = Steering {
            target_angle: Some(0.0),
            should_move: true,
            is_arrived: false,
        };
        steer_entity(&mut e, &mut world, &steering, 0.5).unwrap();
        assert!((e.pos - Vec2::new(0.0, 1.0)).length() < 1e-5, "pos was {}", e.pos);
    }
}
