use glam::Vec2;

use crate::api::types::{EntityId, PositionRecord, SteeringRecord};
use crate::assets::manifest::TownLayout;
use crate::components::entity::Entity;
use crate::core::collision::{
    CollisionWorld, ValidatedPosition, DEFAULT_ENTITY_RADIUS, DEFAULT_SEARCH_RADIUS, DEFAULT_SEARCH_STEPS,
    DEFAULT_WORLD_RADIUS,
};
use crate::core::grid::SpatialGrid;
use crate::core::scene::Scene;
use crate::error::{CollisionError, LayoutError};
use crate::input::queue::{Intent, IntentQueue};
use crate::navigation::pathfinder::{Pathfinder, PathfinderConfig};
use crate::systems::movement::{steer_entity, walk_entity};

/// Configuration for the town, provided by the game.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Most fixed steps run for a single browser frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Radius of the walkable disk (default: 75).
    pub world_radius: f32,
    /// Side of a spatial grid cell (default: 10).
    pub grid_cell_size: f32,
    /// Radius for walkers that do not set one (default: 0.5).
    pub default_radius: f32,
    /// Outer ring for spawn placement (default: 5).
    pub placement_search_radius: f32,
    /// Angles per placement ring (default: 16).
    pub placement_search_steps: u32,
    /// Seed for destination choice and dwell times.
    pub seed: u64,
    /// Steering records reserved per frame (default: 64).
    pub max_npcs: usize,
    pub pathfinder: PathfinderConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            world_radius: DEFAULT_WORLD_RADIUS,
            grid_cell_size: SpatialGrid::DEFAULT_CELL_SIZE,
            default_radius: DEFAULT_ENTITY_RADIUS,
            placement_search_radius: DEFAULT_SEARCH_RADIUS,
            placement_search_steps: DEFAULT_SEARCH_STEPS,
            seed: 42,
            max_npcs: 64,
            pathfinder: PathfinderConfig::default(),
        }
    }
}

/// The core contract every town game must fulfill.
pub trait Game {
    /// Return world configuration. Called once before init.
    fn config(&self) -> WorldConfig {
        WorldConfig::default()
    }

    /// Build the town, spawn the player and townsfolk.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. Apply intents, steer NPCs.
    fn update(&mut self, ctx: &mut EngineContext, intents: &IntentQueue);
}

/// Mutable access to the town, passed to Game::init and Game::update.
/// Owns both services; nothing in the engine is global.
pub struct EngineContext {
    pub scene: Scene,
    pub collision: CollisionWorld,
    pub pathfinder: Pathfinder,
    /// NPC decisions from the latest `steer_npcs`.
    pub steering: Vec<SteeringRecord>,
    placement_radius: f32,
    placement_steps: u32,
    next_id: u32,
}

impl EngineContext {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            scene: Scene::new(),
            collision: CollisionWorld::new(config.world_radius, config.grid_cell_size),
            pathfinder: Pathfinder::new(config.pathfinder.clone(), config.seed),
            steering: Vec::with_capacity(config.max_npcs),
            placement_radius: config.placement_search_radius,
            placement_steps: config.placement_search_steps,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.steering.clear();
    }

    // -- Town construction --

    /// Make building footprints and obstacles solid and hand every
    /// destination to the pathfinder. Call once, before spawning walkers.
    /// Every collider is validated before any is added, so a failed build
    /// leaves the town empty.
    pub fn build_town(&mut self, layout: &TownLayout) -> Result<(), LayoutError> {
        if self.pathfinder.catalog().is_initialized() {
            return Err(LayoutError::AlreadyBuilt);
        }
        if layout.destination_count() == 0 {
            return Err(LayoutError::NoDestinations);
        }
        let colliders = layout.colliders()?;
        for collider in colliders {
            self.collision.add_static_collider(collider);
        }
        let buildings = layout.building_sites();
        self.pathfinder
            .init_destinations(&buildings, &layout.activities, &layout.points_of_interest);
        log::info!(
            "town: built with {} colliders and {} destinations",
            self.collision.static_colliders().len(),
            self.pathfinder.catalog().len()
        );
        Ok(())
    }

    // -- Walkers --

    /// Add a walker exactly where it stands. Fails if its tag is taken or its
    /// radius is unusable; the scene is untouched on failure.
    pub fn spawn_walker(&mut self, entity: Entity) -> Result<EntityId, CollisionError> {
        self.collision
            .register_entity(entity.tag.clone(), entity.pos, entity.radius, entity.layer)?;
        let id = entity.id;
        self.scene.spawn(entity);
        Ok(id)
    }

    /// Add a walker at the nearest free spot to where it stands.
    /// `Ok(None)` when no spot within the search radius fits.
    pub fn place_walker(&mut self, mut entity: Entity) -> Result<Option<EntityId>, CollisionError> {
        let spot = self.collision.find_nearest_valid_position(
            entity.pos,
            entity.radius,
            self.placement_radius,
            self.placement_steps,
        );
        match spot {
            Some(pos) => {
                entity.pos = pos;
                self.spawn_walker(entity).map(Some)
            }
            None => {
                log::warn!(
                    "town: no free spot for `{}` near ({}, {})",
                    entity.tag,
                    entity.pos.x,
                    entity.pos.y
                );
                Ok(None)
            }
        }
    }

    /// Remove a walker from the scene, the collision world and the pathfinder.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.scene.despawn(id)?;
        self.collision.unregister_entity(&entity.tag);
        self.pathfinder.remove_npc(&entity.tag);
        Some(entity)
    }

    /// Move a walker by `displacement`, sliding along whatever blocks it.
    /// `None` if the id is unknown.
    pub fn walk(&mut self, id: EntityId, displacement: Vec2) -> Option<ValidatedPosition> {
        let entity = self.scene.get_mut(id)?;
        Some(walk_entity(entity, &mut self.collision, displacement))
    }

    /// Toggle whether a walker blocks other walkers.
    pub fn set_solid(&mut self, id: EntityId, solid: bool) -> bool {
        match self.scene.get(id) {
            Some(entity) => {
                self.collision.set_entity_enabled(&entity.tag, solid);
                true
            }
            None => false,
        }
    }

    /// Make an NPC give up its destination. `false` if it has not wandered yet.
    pub fn replan(&mut self, id: EntityId) -> bool {
        match self.scene.get(id) {
            Some(entity) => self.pathfinder.reset_npc_destination(&entity.tag),
            None => false,
        }
    }

    pub fn set_npcs_frozen(&mut self, frozen: bool) {
        self.pathfinder.set_enabled(!frozen);
    }

    /// Ask the pathfinder where each NPC wants to go, walk it there at its own
    /// speed, and record the decision.
    pub fn steer_npcs(&mut self, dt: f32) {
        self.steering.clear();
        for entity in self.scene.iter_mut() {
            if !entity.active {
                continue;
            }
            let steering = match entity.npc_snapshot() {
                Some(snapshot) => self.pathfinder.update_npc(&snapshot, dt),
                None => continue,
            };
            let moved = steer_entity(entity, &mut self.collision, &steering, dt).is_some();
            self.steering.push(SteeringRecord {
                entity: entity.id.0 as f32,
                angle: steering.target_angle.unwrap_or(f32::NAN),
                should_move: if moved { 1.0 } else { 0.0 },
                arrived: if steering.is_arrived { 1.0 } else { 0.0 },
            });
        }
    }

    /// Carry out one host-page request.
    pub fn apply_intent(&mut self, intent: &Intent) {
        match *intent {
            Intent::Walk { entity, dx, dz } => {
                if self.walk(entity, Vec2::new(dx, dz)).is_none() {
                    log::debug!("town: walk for unknown entity {:?}", entity);
                }
            }
            Intent::Replan { entity } => {
                self.replan(entity);
            }
            Intent::FreezeNpcs { frozen } => self.set_npcs_frozen(frozen),
            Intent::SetSolid { entity, solid } => {
                self.set_solid(entity, solid);
            }
        }
    }

    /// Pack every active walker's position for the host page.
    pub fn positions_into(&self, out: &mut Vec<PositionRecord>) {
        out.clear();
        out.extend(self.scene.iter().filter(|e| e.active).map(|e| PositionRecord {
            entity: e.id.0 as f32,
            x: e.pos.x,
            z: e.pos.y,
            heading: e.heading,
        }));
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}
