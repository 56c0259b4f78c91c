use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Every walker in town, stored flat.
/// Sized for a town's worth of entities (dozens), so lookups are linear.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Add an entity. Tag uniqueness is enforced by the collision world, not here.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns it if it was present.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Active entities driven by the pathfinder.
    pub fn wanderers(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.active && e.wanderer.is_some())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::pathfinder::SpeedClass;

    #[test]
    fn despawn_returns_the_entity() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("mayor"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("cat"));
        let gone = scene.despawn(EntityId(1)).unwrap();
        assert_eq!(gone.tag, "mayor");
        assert_eq!(scene.len(), 1);
        assert!(scene.despawn(EntityId(1)).is_none());
    }

    #[test]
    fn wanderers_skips_player_and_inactive() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("player"));
        scene.spawn(Entity::new(EntityId(2)).wandering(SpeedClass::Fast));
        scene.spawn(Entity::new(EntityId(3)).wandering(SpeedClass::Slow));
        scene.get_mut(EntityId(3)).unwrap().active = false;
        let ids: Vec<EntityId> = scene.wanderers().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2)]);
    }
}
