//! Destination-based wandering for townsfolk.
//!
//! Each NPC cycles Idle → Walking → Arrived → Idle, and the tick that enters
//! Idle also picks the next destination. The pathfinder only
//! proposes a heading; the caller integrates position at the NPC's own speed
//! and runs the result through the collision world. Steering is heading-only
//! with no obstacle avoidance, so an NPC that stops making progress for a
//! while gives up on its destination and picks another.

use std::collections::{HashMap, VecDeque};
use std::ops::Range;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::destination::{Destination, DestinationCatalog, DestinationKind, Site};

const ALL_KINDS: [DestinationKind; 3] = [
    DestinationKind::Building,
    DestinationKind::Activity,
    DestinationKind::PointOfInterest,
];

/// Temperament of an NPC's walk. Decides where it likes to go and how long
/// it lingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl SpeedClass {
    /// Destination kinds this class picks unconditionally.
    pub fn preferred_kinds(self) -> &'static [DestinationKind] {
        match self {
            SpeedClass::Fast => &[DestinationKind::Activity, DestinationKind::PointOfInterest],
            SpeedClass::Normal => &ALL_KINDS,
            SpeedClass::Slow => &[DestinationKind::Building, DestinationKind::PointOfInterest],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpeedClass::Fast => "fast",
            SpeedClass::Normal => "normal",
            SpeedClass::Slow => "slow",
        }
    }
}

/// Where an NPC is in its walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MovementState {
    Idle,
    Walking,
    Arrived,
}

impl MovementState {
    pub fn name(self) -> &'static str {
        match self {
            MovementState::Idle => "idle",
            MovementState::Walking => "walking",
            MovementState::Arrived => "arrived",
        }
    }
}

/// Tuning for the wander cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PathfinderConfig {
    /// Displacement per sample below which an NPC counts as not moving.
    pub stuck_distance: f32,
    /// Continuous seconds without progress before a destination is abandoned.
    pub stuck_timeout: f32,
    /// How many recent destinations an NPC avoids revisiting.
    pub history_len: usize,
    /// Chance that a destination outside the preferred kinds is considered.
    pub off_type_chance: f64,
    /// Dwell time at a destination, seconds, per speed class.
    pub dwell_fast: Range<f32>,
    pub dwell_normal: Range<f32>,
    pub dwell_slow: Range<f32>,
}

impl PathfinderConfig {
    pub fn dwell_range(&self, speed: SpeedClass) -> Range<f32> {
        match speed {
            SpeedClass::Fast => self.dwell_fast.clone(),
            SpeedClass::Normal => self.dwell_normal.clone(),
            SpeedClass::Slow => self.dwell_slow.clone(),
        }
    }
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            stuck_distance: 0.01,
            stuck_timeout: 2.0,
            history_len: 3,
            off_type_chance: 0.3,
            dwell_fast: 2.0..5.0,
            dwell_normal: 5.0..10.0,
            dwell_slow: 8.0..15.0,
        }
    }
}

/// Per-NPC wander state. Created on the NPC's first update.
#[derive(Debug, Clone, PartialEq)]
pub struct PathfindingState {
    /// Index into the destination catalog.
    pub current_destination: Option<usize>,
    /// Recently chosen destination ids, oldest first.
    pub visited: VecDeque<String>,
    pub movement: MovementState,
    /// Seconds of dwell left while `Arrived`.
    pub arrival_timer: f32,
    /// Seconds spent without measurable progress while `Walking`.
    pub stuck_timer: f32,
    pub last_position: Vec2,
    pub speed: SpeedClass,
    pub preferred_kinds: &'static [DestinationKind],
}

impl PathfindingState {
    pub fn new(speed: SpeedClass, pos: Vec2) -> Self {
        Self {
            current_destination: None,
            visited: VecDeque::new(),
            movement: MovementState::Idle,
            arrival_timer: 0.0,
            stuck_timer: 0.0,
            last_position: pos,
            speed,
            preferred_kinds: speed.preferred_kinds(),
        }
    }

    fn go_idle(&mut self) {
        self.current_destination = None;
        self.movement = MovementState::Idle;
        self.arrival_timer = 0.0;
        self.stuck_timer = 0.0;
    }
}

/// What the pathfinder needs to know about an NPC this tick.
#[derive(Debug, Clone, Copy)]
pub struct NpcSnapshot<'a> {
    pub id: &'a str,
    pub pos: Vec2,
    pub speed: SpeedClass,
}

/// Per-tick movement intent for one NPC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// `atan2(dx, dz)` toward the destination; `None` unless walking.
    pub target_angle: Option<f32>,
    pub should_move: bool,
    pub is_arrived: bool,
}

impl Steering {
    /// Stand still, not at a destination.
    pub const HOLD: Self = Self {
        target_angle: None,
        should_move: false,
        is_arrived: false,
    };

    /// Stand still, resting at a destination.
    pub const RESTING: Self = Self {
        target_angle: None,
        should_move: false,
        is_arrived: true,
    };

    fn toward(from: Vec2, to: Vec2) -> Self {
        let d = to - from;
        Self {
            target_angle: Some(d.x.atan2(d.y)),
            should_move: true,
            is_arrived: false,
        }
    }
}

/// Snapshot of one NPC's wander state for the diagnostics overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpcDebugInfo {
    pub state: &'static str,
    pub destination: Option<String>,
    pub arrival_timer: f32,
    pub stuck_timer: f32,
    pub speed: &'static str,
}

/// Owns the destination catalog and every NPC's wander state.
pub struct Pathfinder {
    config: PathfinderConfig,
    catalog: DestinationCatalog,
    states: HashMap<String, PathfindingState>,
    enabled: bool,
    rng: SmallRng,
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig, seed: u64) -> Self {
        Self {
            config,
            catalog: DestinationCatalog::new(),
            states: HashMap::new(),
            enabled: true,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Build the destination catalog. Only the first call has any effect.
    pub fn init_destinations(&mut self, buildings: &[Site], activities: &[Site], points: &[Site]) -> bool {
        self.catalog.initialize(buildings, activities, points)
    }

    pub fn catalog(&self) -> &DestinationCatalog {
        &self.catalog
    }

    /// Freeze or release every NPC at once. Frozen updates touch no state.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fresh state for an NPC, Idle at `pos`.
    pub fn create_state(&self, speed: SpeedClass, pos: Vec2) -> PathfindingState {
        PathfindingState::new(speed, pos)
    }

    pub fn state(&self, npc_id: &str) -> Option<&PathfindingState> {
        self.states.get(npc_id)
    }

    /// The destination an NPC is currently heading to or resting at.
    pub fn current_destination(&self, npc_id: &str) -> Option<&Destination> {
        let index = self.states.get(npc_id)?.current_destination?;
        self.catalog.get(index)
    }

    /// Advance one NPC's wander cycle by `delta` seconds.
    pub fn update_npc(&mut self, npc: &NpcSnapshot, delta: f32) -> Steering {
        if !self.enabled {
            return Steering::HOLD;
        }
        if !self.states.contains_key(npc.id) {
            self.states
                .insert(npc.id.to_owned(), PathfindingState::new(npc.speed, npc.pos));
        }
        let Some(state) = self.states.get_mut(npc.id) else {
            return Steering::HOLD;
        };

        match state.movement {
            MovementState::Idle => begin_walk(&self.catalog, state, &mut self.rng, &self.config, npc),
            MovementState::Walking => {
                let Some(dest) = state.current_destination.and_then(|i| self.catalog.get(i)) else {
                    state.go_idle();
                    return begin_walk(&self.catalog, state, &mut self.rng, &self.config, npc);
                };

                if npc.pos.distance(dest.pos) < dest.arrival_threshold {
                    state.movement = MovementState::Arrived;
                    state.stuck_timer = 0.0;
                    state.arrival_timer = self.rng.gen_range(self.config.dwell_range(state.speed));
                    log::debug!(
                        "navigation: `{}` arrived at {}, resting {:.1}s",
                        npc.id,
                        dest.name,
                        state.arrival_timer
                    );
                    return Steering::RESTING;
                }

                if npc.pos.distance(state.last_position) < self.config.stuck_distance {
                    state.stuck_timer += delta;
                    if state.stuck_timer >= self.config.stuck_timeout {
                        log::debug!("navigation: `{}` stuck on the way to {}, replanning", npc.id, dest.name);
                        state.go_idle();
                        return begin_walk(&self.catalog, state, &mut self.rng, &self.config, npc);
                    }
                } else {
                    state.stuck_timer = 0.0;
                }
                state.last_position = npc.pos;
                Steering::toward(npc.pos, dest.pos)
            }
            MovementState::Arrived => {
                state.arrival_timer -= delta;
                if state.arrival_timer <= 0.0 {
                    state.go_idle();
                    return begin_walk(&self.catalog, state, &mut self.rng, &self.config, npc);
                }
                Steering::RESTING
            }
        }
    }

    /// Drop an NPC's destination so it replans on its next update.
    /// History is kept. Returns `false` if the NPC has no state yet.
    pub fn reset_npc_destination(&mut self, npc_id: &str) -> bool {
        match self.states.get_mut(npc_id) {
            Some(state) => {
                state.go_idle();
                true
            }
            None => false,
        }
    }

    /// Forget an NPC entirely (on despawn).
    pub fn remove_npc(&mut self, npc_id: &str) -> Option<PathfindingState> {
        self.states.remove(npc_id)
    }

    pub fn npc_count(&self) -> usize {
        self.states.len()
    }

    pub fn debug_info(&self, npc_id: &str) -> Option<NpcDebugInfo> {
        let state = self.states.get(npc_id)?;
        Some(NpcDebugInfo {
            state: state.movement.name(),
            destination: state
                .current_destination
                .and_then(|i| self.catalog.get(i))
                .map(|d| d.name.clone()),
            arrival_timer: state.arrival_timer,
            stuck_timer: state.stuck_timer,
            speed: state.speed.name(),
        })
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(PathfinderConfig::default(), 42)
    }
}

// ---------------------------------------------------------------------------
// Destination selection
// ---------------------------------------------------------------------------

/// Plan from Idle and set off in the same tick. Holds only when the catalog
/// is empty.
fn begin_walk(
    catalog: &DestinationCatalog,
    state: &mut PathfindingState,
    rng: &mut SmallRng,
    config: &PathfinderConfig,
    npc: &NpcSnapshot,
) -> Steering {
    let Some(index) = pick_destination(catalog, state, rng, config) else {
        return Steering::HOLD;
    };
    let Some(dest) = catalog.get(index) else {
        return Steering::HOLD;
    };
    state.current_destination = Some(index);
    state.movement = MovementState::Walking;
    state.stuck_timer = 0.0;
    state.last_position = npc.pos;
    log::debug!("navigation: `{}` heading to {}", npc.id, dest.name);
    Steering::toward(npc.pos, dest.pos)
}

/// Choose the next destination and record it in the NPC's history.
///
/// Recently visited destinations are skipped; preferred kinds always qualify
/// and every other destination gets an independent `off_type_chance` draw.
/// An empty pool clears the history and tries once more. Returns `None` only
/// for an empty catalog.
fn pick_destination(
    catalog: &DestinationCatalog,
    state: &mut PathfindingState,
    rng: &mut SmallRng,
    config: &PathfinderConfig,
) -> Option<usize> {
    if catalog.is_empty() {
        return None;
    }

    let mut pool = candidates(catalog, state, rng, config.off_type_chance);
    if pool.is_empty() {
        state.visited.clear();
        pool = candidates(catalog, state, rng, config.off_type_chance);
    }
    if pool.is_empty() {
        // Nothing preferred exists and every off-type draw missed.
        pool = (0..catalog.len()).collect();
    }

    let index = pool[rng.gen_range(0..pool.len())];
    let id = catalog.get(index)?.id.clone();
    state.visited.push_back(id);
    while state.visited.len() > config.history_len {
        state.visited.pop_front();
    }
    Some(index)
}

fn candidates(
    catalog: &DestinationCatalog,
    state: &PathfindingState,
    rng: &mut SmallRng,
    off_type_chance: f64,
) -> Vec<usize> {
    let chance = off_type_chance.clamp(0.0, 1.0);
    catalog
        .iter()
        .enumerate()
        .filter(|(_, d)| !state.visited.contains(&d.id))
        .filter(|(_, d)| state.preferred_kinds.contains(&d.kind) || rng.gen_bool(chance))
        .map(|(i, _)| i)
        .collect()
}
