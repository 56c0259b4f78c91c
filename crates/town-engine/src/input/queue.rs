use crate::api::types::EntityId;

/// Requests the host page makes of the town.
/// The page pushes them between frames; the game reads them during update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Walk an entity by a displacement in world units this frame.
    Walk { entity: EntityId, dx: f32, dz: f32 },
    /// Make an NPC drop its destination and pick a new one.
    Replan { entity: EntityId },
    /// Freeze (`true`) or release (`false`) every wandering NPC.
    FreezeNpcs { frozen: bool },
    /// Toggle whether an entity blocks other entities.
    SetSolid { entity: EntityId, solid: bool },
}

/// A queue of intents.
/// JS writes intents into the queue; Rust reads and drains them each frame.
pub struct IntentQueue {
    intents: Vec<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self {
            intents: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Take all pending intents, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    pub fn clear(&mut self) {
        self.intents.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }
}

impl Default for IntentQueue {
    fn default() -> Self {
        Self::new()
    }
}
