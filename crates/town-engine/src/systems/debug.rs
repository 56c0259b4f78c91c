//! Debug overlay: collider outlines and wander state, opt-in.
//!
//! Call `debug_snapshot()` from the host page's dev tools to see hitboxes and
//! what each NPC is up to. Outlines are closed polylines in world `(x, z)`.

use serde::Serialize;

use crate::core::collision::{CollisionDebugInfo, CollisionWorld, StaticCollider};
use crate::core::scene::Scene;
use crate::navigation::pathfinder::{NpcDebugInfo, Pathfinder};

/// Segments used to outline an entity circle.
const CIRCLE_SEGMENTS: usize = 24;

/// One NPC in the overlay.
#[derive(Debug, Clone, Serialize)]
pub struct NpcOverlay {
    pub tag: String,
    pub x: f32,
    pub z: f32,
    #[serde(flatten)]
    pub info: NpcDebugInfo,
}

/// Everything the overlay draws for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DebugSnapshot {
    pub collision: CollisionDebugInfo,
    pub npcs_enabled: bool,
    pub npcs: Vec<NpcOverlay>,
    pub outlines: Vec<Vec<[f32; 2]>>,
}

/// Collect the overlay from the current world state.
pub fn debug_snapshot(scene: &Scene, collision: &CollisionWorld, pathfinder: &Pathfinder) -> DebugSnapshot {
    let npcs = scene
        .wanderers()
        .filter_map(|e| {
            let info = pathfinder.debug_info(&e.tag)?;
            Some(NpcOverlay {
                tag: e.tag.clone(),
                x: e.pos.x,
                z: e.pos.y,
                info,
            })
        })
        .collect();

    let mut outlines: Vec<Vec<[f32; 2]>> = collision.static_colliders().iter().map(box_outline).collect();
    outlines.extend(
        collision
            .entities()
            .filter(|e| e.enabled)
            .map(|e| circle_outline(e.pos.x, e.pos.y, e.radius)),
    );

    DebugSnapshot {
        collision: collision.debug_info(),
        npcs_enabled: pathfinder.is_enabled(),
        npcs,
        outlines,
    }
}

/// Serialize the overlay for the host page.
pub fn debug_snapshot_json(scene: &Scene, collision: &CollisionWorld, pathfinder: &Pathfinder) -> String {
    serde_json::to_string(&debug_snapshot(scene, collision, pathfinder)).unwrap_or_else(|err| {
        log::warn!("debug: failed to serialize overlay: {}", err);
        String::from("{}")
    })
}

/// Four corners plus the first again.
fn box_outline(c: &StaticCollider) -> Vec<[f32; 2]> {
    vec![
        [c.min_x, c.min_z],
        [c.max_x, c.min_z],
        [c.max_x, c.max_z],
        [c.min_x, c.max_z],
        [c.min_x, c.min_z],
    ]
}

fn circle_outline(cx: f32, cz: f32, radius: f32) -> Vec<[f32; 2]> {
    (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
            [cx + angle.cos() * radius, cz + angle.sin() * radius]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::entity::Entity;
    use crate::components::layer::CollisionLayer;
    use crate::navigation::destination::Site;
    use crate::navigation::pathfinder::{PathfinderConfig, SpeedClass};
    use glam::Vec2;

    #[test]
    fn box_outline_is_closed() {
        let c = StaticCollider::from_bounds(0.0, 2.0, 0.0, 1.0).unwrap();
        let pts = box_outline(&c);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
    }

    #[test]
    fn circle_outline_stays_on_radius() {
        let pts = circle_outline(1.0, -1.0, 2.0);
        assert_eq!(pts.len(), CIRCLE_SEGMENTS + 1);
        for p in &pts {
            let d = Vec2::new(p[0] - 1.0, p[1] + 1.0).length();
            assert!((d - 2.0).abs() < 1e-4, "point {:?} off radius", p);
        }
    }

    #[test]
    fn snapshot_lists_outlines_and_npcs() {
        let mut scene = Scene::new();
        let mut collision = CollisionWorld::default();
        let mut pathfinder = Pathfinder::new(PathfinderConfig::default(), 1);
        pathfinder.init_destinations(&[], &[], &[Site::new("well", "Well", 10.0, 0.0)]);

        collision.add_static_box_min_max(-20.0, -18.0, -1.0, 1.0).unwrap();
        let npc = Entity::new(EntityId(1)).with_tag("miller").wandering(SpeedClass::Normal);
        collision
            .register_entity(npc.tag.clone(), npc.pos, npc.radius, CollisionLayer::NPC)
            .unwrap();
        pathfinder.update_npc(&npc.npc_snapshot().unwrap(), 0.016);
        scene.spawn(npc);

        let snap = debug_snapshot(&scene, &collision, &pathfinder);
        assert_eq!(snap.outlines.len(), 2);
        assert_eq!(snap.npcs.len(), 1);
        assert_eq!(snap.npcs[0].info.state, "walking");
        assert_eq!(snap.npcs[0].info.destination.as_deref(), Some("Well"));

        let json = debug_snapshot_json(&scene, &collision, &pathfinder);
        assert!(json.contains("\"tag\":\"miller\""), "json was {}", json);
        assert!(json.contains("\"npcs_enabled\":true"));
    }
}
