use town_engine::{
    debug_snapshot_json, EngineContext, EntityId, FrameClock, Game, Intent, IntentQueue, PositionRecord,
    ValidatedPosition, WorldConfig,
};
use town_engine::glam::Vec2;

/// Generic town runner that wires up the movement loop.
///
/// Each concrete game (e.g., `town-stroll`) creates a `thread_local!` TownRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct TownRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    intents: IntentQueue,
    clock: FrameClock,
    config: WorldConfig,
    initialized: bool,
    /// Flat (id, x, z, heading) records for the host page to read.
    positions: Vec<PositionRecord>,
}

impl<G: Game> TownRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let clock = FrameClock::new(config.fixed_dt, config.max_steps_per_frame);
        Self {
            game,
            ctx: EngineContext::new(&config),
            intents: IntentQueue::new(),
            clock,
            config,
            initialized: false,
            positions: Vec::with_capacity(64),
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.ctx.positions_into(&mut self.positions);
    }

    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Run one browser frame: as many fixed steps as the clock allows, then
    /// repack positions. Intents are seen by the first step only; a frame
    /// with no steps keeps them for the next one.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        let steps = self.clock.accumulate(dt);
        if steps == 0 {
            return;
        }

        self.ctx.clear_frame_data();
        for step in 0..steps {
            self.game.update(&mut self.ctx, &self.intents);
            if step == 0 {
                self.intents.clear();
            }
        }

        self.ctx.positions_into(&mut self.positions);
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Queries answered straight from the collision world ----

    pub fn can_move(&self, x: f32, z: f32, radius: f32) -> bool {
        self.ctx.collision.can_move(None, Vec2::new(x, z), radius, true)
    }

    /// Where `entity` would land trying to reach `(x, z)`. `None` for unknown ids.
    pub fn validated_position(&self, entity: u32, x: f32, z: f32) -> Option<ValidatedPosition> {
        let walker = self.ctx.scene.get(EntityId(entity))?;
        Some(
            self.ctx
                .collision
                .get_validated_position(Some(walker.tag.as_str()), Vec2::new(x, z), walker.radius, true),
        )
    }

    pub fn nearest_valid_position(&self, x: f32, z: f32, radius: f32) -> Option<Vec2> {
        self.ctx.collision.find_nearest_valid_position(
            Vec2::new(x, z),
            radius,
            self.config.placement_search_radius,
            self.config.placement_search_steps,
        )
    }

    /// Tags of solid walkers whose centers lie within `radius` of `(x, z)`.
    pub fn entities_in_radius(&self, x: f32, z: f32, radius: f32) -> Vec<String> {
        self.ctx
            .collision
            .get_entities_in_radius(Vec2::new(x, z), radius, None)
            .into_iter()
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn collision_debug_json(&self) -> String {
        serde_json::to_string(&self.ctx.collision.debug_info()).unwrap_or_else(|err| {
            log::warn!("town-web: failed to serialize collision info: {}", err);
            String::from("{}")
        })
    }

    pub fn npc_debug_json(&self) -> String {
        debug_snapshot_json(&self.ctx.scene, &self.ctx.collision, &self.ctx.pathfinder)
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn positions_ptr(&self) -> *const f32 {
        self.positions.as_ptr() as *const f32
    }

    /// Number of floats behind `positions_ptr`.
    pub fn positions_len(&self) -> u32 {
        (self.positions.len() * PositionRecord::FLOATS) as u32
    }

    pub fn steering_ptr(&self) -> *const f32 {
        self.ctx.steering.as_ptr() as *const f32
    }

    pub fn steering_len(&self) -> u32 {
        (self.ctx.steering.len() * town_engine::SteeringRecord::FLOATS) as u32
    }

    pub fn world_radius(&self) -> f32 {
        self.config.world_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_engine::{Entity, SpeedClass, TownLayout};

    const LAYOUT: &str = r#"{
        "points_of_interest": [ { "id": "well", "name": "Well", "x": 0, "z": 20 } ],
        "obstacles": [ { "min_x": 2, "max_x": 4, "min_z": -4, "max_z": 4 } ]
    }"#;

    struct Hamlet;

    impl Game for Hamlet {
        fn init(&mut self, ctx: &mut EngineContext) {
            let layout = TownLayout::from_json(LAYOUT).unwrap();
            ctx.build_town(&layout).unwrap();
            let id = ctx.next_id();
            ctx.spawn_walker(Entity::new(id).with_tag("player")).unwrap();
            let npc = ctx.next_id();
            ctx.spawn_walker(
                Entity::new(npc)
                    .with_tag("shepherd")
                    .with_pos(Vec2::new(-5.0, 0.0))
                    .wandering(SpeedClass::Normal),
            )
            .unwrap();
        }

        fn update(&mut self, ctx: &mut EngineContext, intents: &IntentQueue) {
            for intent in intents.iter() {
                ctx.apply_intent(intent);
            }
            ctx.steer_npcs(1.0 / 60.0);
        }
    }

    fn runner() -> TownRunner<Hamlet> {
        let mut r = TownRunner::new(Hamlet);
        r.init();
        r
    }

    #[test]
    fn tick_before_init_is_a_no_op() {
        let mut r = TownRunner::new(Hamlet);
        r.tick(0.1);
        assert_eq!(r.positions_len(), 0);
    }

    #[test]
    fn walk_intent_applies_once_per_frame() {
        let mut r = runner();
        r.push_intent(Intent::Walk { entity: EntityId(1), dx: 0.0, dz: 1.0 });
        // Three fixed steps in one frame.
        r.tick(3.0 / 60.0 + 0.001);
        let player = r.context().scene.get(EntityId(1)).unwrap();
        assert!((player.pos.y - 1.0).abs() < 1e-6, "player at {}", player.pos);
        assert_eq!(r.positions_len(), 8);
    }

    #[test]
    fn intents_wait_for_a_step() {
        let mut r = runner();
        r.push_intent(Intent::Walk { entity: EntityId(1), dx: -1.0, dz: 0.0 });
        r.tick(0.001);
        assert_eq!(r.context().scene.get(EntityId(1)).unwrap().pos, Vec2::ZERO);
        r.tick(1.0 / 60.0);
        assert_eq!(r.context().scene.get(EntityId(1)).unwrap().pos, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn queries_see_the_town() {
        let r = runner();
        assert!(!r.can_move(3.0, 0.0, 0.5));
        assert!(r.can_move(0.0, 10.0, 0.5));

        let slid = r.validated_position(1, 1.8, 0.0).unwrap();
        assert!(slid.collided);
        assert_eq!(slid.pos, Vec2::ZERO);
        assert!(r.validated_position(99, 0.0, 0.0).is_none());

        // Ring 1 lies inside the fence; ring 1.5 at angle 0 just touches it.
        assert_eq!(r.nearest_valid_position(3.0, 0.0, 0.5), Some(Vec2::new(4.5, 0.0)));
        let mut near = r.entities_in_radius(0.0, 0.0, 6.0);
        near.sort();
        assert_eq!(near, vec!["player".to_string(), "shepherd".to_string()]);
    }

    #[test]
    fn debug_json_reports_counts() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        let json = r.collision_debug_json();
        assert!(json.contains("\"static_colliders\":1"), "json was {}", json);
        assert!(json.contains("\"entities\":2"));
        assert!(r.npc_debug_json().contains("shepherd"));
        assert_eq!(r.steering_len(), 4);
    }
}
