use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What sort of place a destination is. Drives arrival radius and which
/// NPCs like going there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationKind {
    Building,
    Activity,
    PointOfInterest,
}

impl DestinationKind {
    /// Planar distance below which an NPC counts as arrived.
    /// Doors are tight, activity sites are sprawling, landmarks are small.
    pub fn arrival_threshold(self) -> f32 {
        match self {
            DestinationKind::Building => 3.0,
            DestinationKind::Activity => 4.0,
            DestinationKind::PointOfInterest => 2.0,
        }
    }
}

/// A named spot supplied by the world builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub z: f32,
}

impl Site {
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f32, z: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            z,
        }
    }
}

/// A place an NPC may walk to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    /// `x` is world X, `y` is world Z.
    pub pos: Vec2,
    pub kind: DestinationKind,
    pub arrival_threshold: f32,
}

impl Destination {
    pub fn from_site(site: &Site, kind: DestinationKind) -> Self {
        Self {
            id: site.id.clone(),
            name: site.name.clone(),
            pos: Vec2::new(site.x, site.z),
            kind,
            arrival_threshold: kind.arrival_threshold(),
        }
    }
}

/// Every destination in town, built once from three fixed lists.
#[derive(Debug, Clone, Default)]
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
    initialized: bool,
}

impl DestinationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate buildings, activity sites and points of interest, in that
    /// order. Only the first call has any effect; later calls return `false`.
    pub fn initialize(&mut self, buildings: &[Site], activities: &[Site], points: &[Site]) -> bool {
        if self.initialized {
            return false;
        }
        let lists = [
            (buildings, DestinationKind::Building),
            (activities, DestinationKind::Activity),
            (points, DestinationKind::PointOfInterest),
        ];
        for (sites, kind) in lists {
            self.destinations
                .extend(sites.iter().map(|site| Destination::from_site(site, kind)));
        }
        self.initialized = true;
        log::info!(
            "navigation: catalog built with {} buildings, {} activities, {} points of interest",
            buildings.len(),
            activities.len(),
            points.len()
        );
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn get(&self, index: usize) -> Option<&Destination> {
        self.destinations.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}
