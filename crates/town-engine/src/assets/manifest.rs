use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::collision::StaticCollider;
use crate::error::{CollisionError, LayoutError};
use crate::navigation::destination::Site;

/// Town layout describing everything solid and everywhere NPCs may go.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TownLayout {
    /// Buildings: solid footprint plus a door NPCs walk to.
    #[serde(default)]
    pub buildings: Vec<BuildingDescriptor>,
    /// Open-air activity sites (market, fishing pier). Not solid.
    #[serde(default)]
    pub activities: Vec<Site>,
    /// Landmarks (fountain, statue). Not solid.
    #[serde(default)]
    pub points_of_interest: Vec<Site>,
    /// Solid props that are not destinations (fences, trees, carts).
    #[serde(default)]
    pub obstacles: Vec<ObstacleDescriptor>,
}

/// Describes one building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDescriptor {
    pub id: String,
    pub name: String,
    /// Footprint center, world X.
    pub x: f32,
    /// Footprint center, world Z.
    pub z: f32,
    /// Footprint extent along X.
    pub width: f32,
    /// Footprint extent along Z.
    pub depth: f32,
    /// Margin added around the footprint on every side.
    #[serde(default = "default_buffer")]
    pub buffer: f32,
    /// Where NPCs stand when visiting. Defaults to just outside the +Z wall.
    #[serde(default)]
    pub entrance: Option<[f32; 2]>,
}

/// Describes a solid prop, either by center and size or by explicit bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObstacleDescriptor {
    Bounds {
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
    },
    Box {
        x: f32,
        z: f32,
        width: f32,
        depth: f32,
        #[serde(default)]
        buffer: f32,
    },
}

/// Gap between a building's collider and its default entrance.
const ENTRANCE_CLEARANCE: f32 = 1.0;

fn default_buffer() -> f32 {
    0.5
}

impl BuildingDescriptor {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.depth)
    }

    /// Door position on the ground plane.
    pub fn entrance(&self) -> Vec2 {
        match self.entrance {
            Some([x, z]) => Vec2::new(x, z),
            None => Vec2::new(
                self.x,
                self.z + self.depth * 0.5 + self.buffer + ENTRANCE_CLEARANCE,
            ),
        }
    }

    /// The building as a destination, located at its door.
    pub fn site(&self) -> Site {
        let door = self.entrance();
        Site::new(self.id.clone(), self.name.clone(), door.x, door.y)
    }
}

impl TownLayout {
    /// Parse a layout from a JSON string.
    /// Rejects layouts that give NPCs nowhere to go.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        if layout.destination_count() == 0 {
            return Err(LayoutError::NoDestinations);
        }
        Ok(layout)
    }

    /// Every solid box in the layout, buildings first, or the first bad one.
    pub fn colliders(&self) -> Result<Vec<StaticCollider>, CollisionError> {
        let buildings = self
            .buildings
            .iter()
            .map(|b| StaticCollider::from_center(b.center(), b.size(), b.buffer));
        let obstacles = self.obstacles.iter().map(|o| match *o {
            ObstacleDescriptor::Bounds { min_x, max_x, min_z, max_z } => {
                StaticCollider::from_bounds(min_x, max_x, min_z, max_z)
            }
            ObstacleDescriptor::Box { x, z, width, depth, buffer } => {
                StaticCollider::from_center(Vec2::new(x, z), Vec2::new(width, depth), buffer)
            }
        });
        buildings.chain(obstacles).collect()
    }

    pub fn building_sites(&self) -> Vec<Site> {
        self.buildings.iter().map(BuildingDescriptor::site).collect()
    }

    pub fn destination_count(&self) -> usize {
        self.buildings.len() + self.activities.len() + self.points_of_interest.len()
    }
}
