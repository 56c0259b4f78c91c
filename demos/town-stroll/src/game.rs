//! Town stroll - walk a small town while the townsfolk go about their day.
//! The host page drives the player with walk intents; residents wander on
//! their own between buildings, activity sites and landmarks.

use town_engine::api::types::EntityId;
use town_engine::components::entity::Entity;
use town_engine::components::layer::CollisionLayer;
use town_engine::input::queue::IntentQueue;
use town_engine::{EngineContext, Game, TownLayout, WorldConfig};

use crate::town::{LAYOUT, PLAYER_SPEED, PLAYER_START, RESIDENTS};

const SEED: u64 = 0x70_57_20_11;

pub struct TownStroll {
    player: Option<EntityId>,
    residents: Vec<EntityId>,
    dt: f32,
}

impl TownStroll {
    pub fn new() -> Self {
        Self {
            player: None,
            residents: Vec::with_capacity(RESIDENTS.len()),
            dt: 1.0 / 60.0,
        }
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }
}

impl Default for TownStroll {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TownStroll {
    fn config(&self) -> WorldConfig {
        WorldConfig {
            seed: SEED,
            max_npcs: RESIDENTS.len(),
            ..WorldConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.dt = self.config().fixed_dt;

        let layout = match TownLayout::from_json(LAYOUT) {
            Ok(layout) => layout,
            Err(err) => {
                log::error!("town-stroll: bad layout: {}", err);
                return;
            }
        };
        if let Err(err) = ctx.build_town(&layout) {
            log::error!("town-stroll: could not build town: {}", err);
            return;
        }

        let id = ctx.next_id();
        let player = Entity::new(id)
            .with_tag("player")
            .with_pos(PLAYER_START)
            .with_walk_speed(PLAYER_SPEED)
            .with_layer(CollisionLayer::PLAYER);
        match ctx.place_walker(player) {
            Ok(placed) => self.player = placed,
            Err(err) => log::error!("town-stroll: player: {}", err),
        }

        for resident in RESIDENTS {
            let id = ctx.next_id();
            let npc = Entity::new(id)
                .with_tag(resident.tag)
                .with_pos(resident.home)
                .with_walk_speed(resident.walk_speed)
                .wandering(resident.speed);
            match ctx.place_walker(npc) {
                Ok(Some(id)) => self.residents.push(id),
                Ok(None) => {}
                Err(err) => log::warn!("town-stroll: {}: {}", resident.tag, err),
            }
        }
        log::info!("town-stroll: {} residents out and about", self.residents.len());
    }

    fn update(&mut self, ctx: &mut EngineContext, intents: &IntentQueue) {
        for intent in intents.iter() {
            ctx.apply_intent(intent);
        }
        ctx.steer_npcs(self.dt);
    }
}
