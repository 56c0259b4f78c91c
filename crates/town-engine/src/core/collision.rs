//! Circle-vs-box collision world on the horizontal plane.
//!
//! The town is 2D for collision purposes: every position is a [`Vec2`] whose
//! `x` is world X and whose `y` is world Z. Height is ignored.
//!
//! Static colliders are axis-aligned rectangles bucketed into a
//! [`SpatialGrid`]. Dynamic entities are circles kept in a small slot arena
//! and scanned linearly; a town holds a few dozen of them at most.
//!
//! The world never moves anything. Callers push entity positions in with
//! [`CollisionWorld::set_entity_position`] and ask where a move may land with
//! [`CollisionWorld::get_validated_position`].

use std::collections::HashMap;

use glam::Vec2;
use serde::Serialize;

use crate::components::layer::CollisionLayer;
use crate::core::grid::SpatialGrid;
use crate::error::CollisionError;

/// Radius of the walkable disk around the origin.
pub const DEFAULT_WORLD_RADIUS: f32 = 75.0;
/// Radius assumed for queries that do not name one.
pub const DEFAULT_ENTITY_RADIUS: f32 = 0.5;
/// Outer ring radius of the placement search.
pub const DEFAULT_SEARCH_RADIUS: f32 = 5.0;
/// Angles sampled per ring of the placement search.
pub const DEFAULT_SEARCH_STEPS: u32 = 16;

const SEARCH_FIRST_RING: f32 = 1.0;
const SEARCH_RING_SPACING: f32 = 0.5;

// ---------------------------------------------------------------------------
// Static geometry
// ---------------------------------------------------------------------------

/// Immutable axis-aligned obstacle (building footprint, fixed prop).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaticCollider {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl StaticCollider {
    /// Build from explicit bounds. Rejects inverted or non-finite bounds.
    pub fn from_bounds(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Result<Self, CollisionError> {
        let finite = [min_x, max_x, min_z, max_z].iter().all(|v| v.is_finite());
        if !finite || min_x > max_x || min_z > max_z {
            return Err(CollisionError::InvalidBounds { min_x, max_x, min_z, max_z });
        }
        Ok(Self { min_x, max_x, min_z, max_z })
    }

    /// Build from a center and `(width, depth)`, grown by `buffer` on every side.
    pub fn from_center(center: Vec2, size: Vec2, buffer: f32) -> Result<Self, CollisionError> {
        let half = size * 0.5 + Vec2::splat(buffer);
        Self::from_bounds(
            center.x - half.x,
            center.x + half.x,
            center.y - half.y,
            center.y + half.y,
        )
    }

    /// Closest point of the rectangle to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min_x, self.max_x), p.y.clamp(self.min_z, self.max_z))
    }

    /// Circle-vs-rectangle overlap. Touching is not overlapping.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.distance_squared(self.closest_point(center)) < radius * radius
    }
}

/// Index of a static collider in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub usize);

// ---------------------------------------------------------------------------
// Dynamic entities
// ---------------------------------------------------------------------------

/// A moving, circularly-bounded actor (player, NPC, animal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicEntity {
    pub id: String,
    /// Last position pushed by the owner of the game object.
    pub pos: Vec2,
    pub radius: f32,
    pub layer: CollisionLayer,
    /// Disabled entities neither block nor get blocked by anything.
    pub enabled: bool,
}

impl DynamicEntity {
    fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.pos.distance_squared(center) < reach * reach
    }
}

/// Generational slot handle returned by registration.
/// Goes stale once the entity is unregistered, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct EntitySlot {
    generation: u32,
    entity: Option<DynamicEntity>,
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Outcome of [`CollisionWorld::get_validated_position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedPosition {
    /// Where the entity may stand this tick.
    pub pos: Vec2,
    /// `false` only when the raw target was accepted unchanged.
    pub collided: bool,
}

impl ValidatedPosition {
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn z(&self) -> f32 {
        self.pos.y
    }
}

/// Counters for the diagnostics overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionDebugInfo {
    pub static_colliders: usize,
    pub entities: usize,
    pub grid_cells: usize,
    pub world_radius: f32,
}

// ---------------------------------------------------------------------------
// CollisionWorld
// ---------------------------------------------------------------------------

/// Authoritative answer to "may this circle stand here" for the whole town.
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    world_radius: f32,
    grid: SpatialGrid,
    statics: Vec<StaticCollider>,
    slots: Vec<EntitySlot>,
    free_slots: Vec<u32>,
    by_id: HashMap<String, EntityHandle>,
}

impl CollisionWorld {
    pub fn new(world_radius: f32, cell_size: f32) -> Self {
        Self {
            world_radius,
            grid: SpatialGrid::new(cell_size),
            statics: Vec::new(),
            slots: Vec::new(),
            free_slots: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn world_radius(&self) -> f32 {
        self.world_radius
    }

    // -- Static registration --

    /// Add a box by center and `(width, depth)`, grown by `buffer` on all sides.
    pub fn add_static_box(
        &mut self,
        center: Vec2,
        size: Vec2,
        buffer: f32,
    ) -> Result<ColliderHandle, CollisionError> {
        let collider = StaticCollider::from_center(center, size, buffer)?;
        Ok(self.add_static_collider(collider))
    }

    /// Add a box by explicit bounds.
    pub fn add_static_box_min_max(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    ) -> Result<ColliderHandle, CollisionError> {
        let collider = StaticCollider::from_bounds(min_x, max_x, min_z, max_z)?;
        Ok(self.add_static_collider(collider))
    }

    /// Add a collider already checked by its constructor.
    pub fn add_static_collider(&mut self, c: StaticCollider) -> ColliderHandle {
        let index = self.statics.len();
        self.grid.insert_rect(index, c.min_x, c.max_x, c.min_z, c.max_z);
        self.statics.push(c);
        ColliderHandle(index)
    }

    pub fn static_collider(&self, handle: ColliderHandle) -> Option<&StaticCollider> {
        self.statics.get(handle.0)
    }

    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.statics
    }

    // -- Entity registration --

    /// Register a circular entity. Ids are unique: registering a live id fails
    /// with [`CollisionError::DuplicateEntityId`] and leaves the old entry intact.
    pub fn register_entity(
        &mut self,
        id: impl Into<String>,
        pos: Vec2,
        radius: f32,
        layer: CollisionLayer,
    ) -> Result<EntityHandle, CollisionError> {
        let id = id.into();
        if self.by_id.contains_key(&id) {
            log::warn!("collision: rejected duplicate entity id `{}`", id);
            return Err(CollisionError::DuplicateEntityId(id));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(CollisionError::InvalidRadius { id, radius });
        }

        let entity = DynamicEntity {
            id: id.clone(),
            pos,
            radius,
            layer,
            enabled: true,
        };
        let handle = match self.free_slots.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entity = Some(entity);
                EntityHandle { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(EntitySlot { generation: 0, entity: Some(entity) });
                EntityHandle { index, generation: 0 }
            }
        };
        log::debug!("collision: registered `{}` r={} at ({}, {})", id, radius, pos.x, pos.y);
        self.by_id.insert(id, handle);
        Ok(handle)
    }

    /// Remove an entity. Returns the removed record, or `None` if absent.
    pub fn unregister_entity(&mut self, id: &str) -> Option<DynamicEntity> {
        let handle = self.by_id.remove(id)?;
        let slot = self.slots.get_mut(handle.index as usize)?;
        let entity = slot.entity.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(handle.index);
        log::debug!("collision: unregistered `{}`", id);
        entity
    }

    /// Toggle whether an entity takes part in collision queries. No-op if absent.
    pub fn set_entity_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(entity) = self.entity_mut(id) {
            entity.enabled = enabled;
        }
    }

    /// Push the owner's current position for an entity.
    /// Returns `false` if the id is not registered.
    pub fn set_entity_position(&mut self, id: &str, pos: Vec2) -> bool {
        match self.entity_mut(id) {
            Some(entity) => {
                entity.pos = pos;
                true
            }
            None => false,
        }
    }

    pub fn entity(&self, id: &str) -> Option<&DynamicEntity> {
        let handle = self.by_id.get(id)?;
        self.entity_by_handle(*handle)
    }

    pub fn entity_by_handle(&self, handle: EntityHandle) -> Option<&DynamicEntity> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    fn entity_mut(&mut self, id: &str) -> Option<&mut DynamicEntity> {
        let handle = *self.by_id.get(id)?;
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// All registered entities, enabled or not.
    pub fn entities(&self) -> impl Iterator<Item = &DynamicEntity> {
        self.slots.iter().filter_map(|s| s.entity.as_ref())
    }

    pub fn entity_count(&self) -> usize {
        self.by_id.len()
    }

    // -- Queries --

    /// Inside the walkable disk (boundary inclusive).
    pub fn is_within_world(&self, pos: Vec2) -> bool {
        pos.length() <= self.world_radius
    }

    /// Whether a circle overlaps any static collider near it.
    pub fn overlaps_static(&self, pos: Vec2, radius: f32) -> bool {
        let statics = &self.statics;
        self.grid.any_in_rect(
            pos.x - radius,
            pos.x + radius,
            pos.y - radius,
            pos.y + radius,
            |i| statics.get(i).is_some_and(|c| c.overlaps_circle(pos, radius)),
        )
    }

    /// Whether a circle overlaps any enabled entity other than `exclude_id`.
    pub fn overlaps_entity(&self, pos: Vec2, radius: f32, exclude_id: Option<&str>) -> bool {
        self.entities()
            .filter(|e| e.enabled && Some(e.id.as_str()) != exclude_id)
            .any(|e| e.overlaps_circle(pos, radius))
    }

    /// Whether a circle of `radius` may stand at `pos`.
    ///
    /// Checks, in order: the world boundary disk, static colliders in the grid
    /// cells the circle touches, and (when `check_entities`) every other
    /// enabled entity. `entity_id` names the mover so it does not block itself;
    /// pass `None` for hypothetical placements.
    pub fn can_move(&self, entity_id: Option<&str>, pos: Vec2, radius: f32, check_entities: bool) -> bool {
        if !self.is_within_world(pos) {
            return false;
        }
        if self.overlaps_static(pos, radius) {
            return false;
        }
        !(check_entities && self.overlaps_entity(pos, radius, entity_id))
    }

    /// Resolve a desired move into a legal position.
    ///
    /// Tie-break order: the raw target; then X-only (hold current Z), which
    /// slides along obstacle faces normal to X; then Z-only (hold current X);
    /// then stay put. At corners this prefers the X slide even when the Z
    /// slide would travel further.
    ///
    /// An unknown `entity_id` has no current position, so the target stands
    /// in for it and a blocked move comes back as the target itself.
    pub fn get_validated_position(
        &self,
        entity_id: Option<&str>,
        target: Vec2,
        radius: f32,
        check_entities: bool,
    ) -> ValidatedPosition {
        if self.can_move(entity_id, target, radius, check_entities) {
            return ValidatedPosition { pos: target, collided: false };
        }

        let current = entity_id
            .and_then(|id| self.entity(id))
            .map(|e| e.pos)
            .unwrap_or(target);

        let x_only = Vec2::new(target.x, current.y);
        if self.can_move(entity_id, x_only, radius, check_entities) {
            return ValidatedPosition { pos: x_only, collided: true };
        }

        let z_only = Vec2::new(current.x, target.y);
        if self.can_move(entity_id, z_only, radius, check_entities) {
            return ValidatedPosition { pos: z_only, collided: true };
        }

        ValidatedPosition { pos: current, collided: true }
    }

    /// Nearest free spot for one-shot placement (spawning, scattering props).
    ///
    /// Tries `target`, then rings of radius 1, 1.5, 2, … up to `search_radius`,
    /// sampling `search_steps` evenly spaced angles per ring starting at
    /// angle 0. Other entities are ignored. `None` when nothing fits or the
    /// search radius is not finite.
    pub fn find_nearest_valid_position(
        &self,
        target: Vec2,
        radius: f32,
        search_radius: f32,
        search_steps: u32,
    ) -> Option<Vec2> {
        if self.can_move(None, target, radius, false) {
            return Some(target);
        }
        if search_steps == 0 || !search_radius.is_finite() {
            return None;
        }
        // Rings past this reach only land outside the world disk.
        let search_radius = search_radius.min(target.length() + self.world_radius);

        let angle_step = std::f32::consts::TAU / search_steps as f32;
        let mut ring = 0u32;
        loop {
            let r = SEARCH_FIRST_RING + ring as f32 * SEARCH_RING_SPACING;
            if r > search_radius {
                return None;
            }
            for step in 0..search_steps {
                let angle = step as f32 * angle_step;
                let candidate = target + Vec2::new(angle.cos(), angle.sin()) * r;
                if self.can_move(None, candidate, radius, false) {
                    return Some(candidate);
                }
            }
            ring += 1;
        }
    }

    /// Enabled entities whose center lies within `radius` of `center` (inclusive).
    pub fn get_entities_in_radius(
        &self,
        center: Vec2,
        radius: f32,
        exclude_id: Option<&str>,
    ) -> Vec<&DynamicEntity> {
        self.entities()
            .filter(|e| e.enabled && Some(e.id.as_str()) != exclude_id)
            .filter(|e| e.pos.distance(center) <= radius)
            .collect()
    }

    pub fn debug_info(&self) -> CollisionDebugInfo {
        CollisionDebugInfo {
            static_colliders: self.statics.len(),
            entities: self.entity_count(),
            grid_cells: self.grid.cell_count(),
            world_radius: self.world_radius,
        }
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_RADIUS, SpatialGrid::DEFAULT_CELL_SIZE)
    }
}
