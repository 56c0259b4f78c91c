use glam::Vec2;
use town_engine::{
    CollisionLayer, EngineContext, Entity, FrameClock, Intent, IntentQueue, MovementState, SpeedClass,
    TownLayout, WorldConfig,
};

const LAYOUT: &str = r#"{
    "buildings": [
        { "id": "inn", "name": "Inn", "x": 0, "z": 10, "width": 8, "depth": 6 },
        { "id": "smithy", "name": "Smithy", "x": -15, "z": -10, "width": 6, "depth": 6 }
    ],
    "activities": [ { "id": "market", "name": "Market", "x": 20, "z": 0 } ],
    "points_of_interest": [ { "id": "fountain", "name": "Fountain", "x": 0, "z": -20 } ],
    "obstacles": [ { "min_x": 30, "max_x": 31, "min_z": -10, "max_z": 10 } ]
}"#;

fn town() -> EngineContext {
    let config = WorldConfig::default();
    let mut ctx = EngineContext::new(&config);
    let layout = TownLayout::from_json(LAYOUT).unwrap();
    ctx.build_town(&layout).unwrap();
    ctx
}

#[test]
fn layout_builds_colliders_and_catalog() {
    let ctx = town();
    assert_eq!(ctx.collision.static_colliders().len(), 3);
    assert_eq!(ctx.pathfinder.catalog().len(), 4);
    // Inn door: 10 + 3 + 0.5 + 1
    let inn = ctx.pathfinder.catalog().get(0).unwrap();
    assert_eq!(inn.pos, Vec2::new(0.0, 14.5));
    assert!(ctx.collision.can_move(None, inn.pos, 0.5, false));
}

#[test]
fn player_slides_along_the_inn_wall() {
    let mut ctx = town();
    let id = ctx.next_id();
    // Inn collider spans x -4.5..4.5, z 6.5..13.5.
    let player = Entity::new(id)
        .with_tag("player")
        .with_layer(CollisionLayer::PLAYER)
        .with_pos(Vec2::new(0.0, 5.9));
    ctx.spawn_walker(player).unwrap();

    let mut queue = IntentQueue::new();
    queue.push(Intent::Walk { entity: id, dx: 0.3, dz: 0.3 });
    for intent in queue.drain() {
        ctx.apply_intent(&intent);
    }
    let pos = ctx.scene.get(id).unwrap().pos;
    assert_eq!(pos, Vec2::new(0.3, 5.9));
}

#[test]
fn townsfolk_wander_without_entering_buildings() {
    let mut ctx = town();
    let speeds = [SpeedClass::Fast, SpeedClass::Normal, SpeedClass::Slow];
    for (i, speed) in speeds.iter().enumerate() {
        let id = ctx.next_id();
        let npc = Entity::new(id)
            .with_tag(format!("npc-{}", i))
            .with_pos(Vec2::new(i as f32 * 2.0 - 2.0, 0.0))
            .with_walk_speed(2.5)
            .wandering(*speed);
        ctx.place_walker(npc).unwrap().unwrap();
    }

    let mut clock = FrameClock::new(1.0 / 60.0, 10);
    for _ in 0..1200 {
        for _ in 0..clock.accumulate(1.0 / 60.0) {
            ctx.steer_npcs(clock.step());
        }
        for npc in ctx.scene.iter() {
            assert!(
                !ctx.collision.overlaps_static(npc.pos, npc.radius),
                "{} ended up inside a wall at {}",
                npc.tag,
                npc.pos
            );
            assert!(ctx.collision.is_within_world(npc.pos));
        }
    }

    let visited: usize = ctx
        .scene
        .iter()
        .filter_map(|e| ctx.pathfinder.state(&e.tag))
        .map(|s| s.visited.len())
        .sum();
    assert!(visited >= 3, "NPCs chose only {} destinations", visited);
}

#[test]
fn despawned_npc_frees_its_tag() {
    let mut ctx = town();
    let id = ctx.next_id();
    ctx.spawn_walker(Entity::new(id).with_tag("baker").wandering(SpeedClass::Slow))
        .unwrap();
    ctx.steer_npcs(0.1);
    ctx.despawn(id).unwrap();

    let again = ctx.next_id();
    ctx.spawn_walker(Entity::new(again).with_tag("baker").wandering(SpeedClass::Slow))
        .unwrap();
    ctx.steer_npcs(0.1);
    let state = ctx.pathfinder.state("baker").unwrap();
    assert_eq!(state.movement, MovementState::Walking);
    assert_eq!(state.visited.len(), 1);
}
