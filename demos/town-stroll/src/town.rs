//! The town itself: layout and who lives here.

use glam::Vec2;
use town_engine::SpeedClass;

/// Buildings ring a small plaza; activity sites and landmarks sit further out.
pub const LAYOUT: &str = r#"{
    "buildings": [
        { "id": "town_hall", "name": "Town Hall", "x": 0,   "z": 20,  "width": 12, "depth": 8 },
        { "id": "inn",       "name": "Inn",       "x": -20, "z": 10,  "width": 8,  "depth": 6 },
        { "id": "bakery",    "name": "Bakery",    "x": 18,  "z": 8,   "width": 6,  "depth": 6 },
        { "id": "smithy",    "name": "Smithy",    "x": -25, "z": -15, "width": 8,  "depth": 6 },
        { "id": "chapel",    "name": "Chapel",    "x": 25,  "z": -20, "width": 8,  "depth": 10 },
        { "id": "library",   "name": "Library",   "x": 0,   "z": -30, "width": 10, "depth": 6 }
    ],
    "activities": [
        { "id": "market",   "name": "Market",         "x": 8,   "z": -8 },
        { "id": "pier",     "name": "Fishing Pier",   "x": -45, "z": 30 },
        { "id": "orchard",  "name": "Orchard",        "x": 40,  "z": 25 },
        { "id": "training", "name": "Training Yard",  "x": -40, "z": -35 }
    ],
    "points_of_interest": [
        { "id": "well",    "name": "Old Well", "x": -10, "z": -5 },
        { "id": "statue",  "name": "Statue",   "x": 12,  "z": 30 },
        { "id": "oak",     "name": "Great Oak", "x": -30, "z": 45 },
        { "id": "lookout", "name": "Lookout",  "x": 50,  "z": -45 }
    ],
    "obstacles": [
        { "min_x": 30, "max_x": 31, "min_z": 0, "max_z": 12 },
        { "x": -8, "z": 12, "width": 2, "depth": 1 }
    ]
}"#;

/// Player spawn, just south of the town hall door.
pub const PLAYER_START: Vec2 = Vec2::new(0.0, 3.0);
pub const PLAYER_SPEED: f32 = 5.0;

/// Someone who wanders town on their own.
pub struct Resident {
    pub tag: &'static str,
    pub home: Vec2,
    pub speed: SpeedClass,
    /// World units per second. Keep well above 0.6 at 60 steps per second
    /// or progress per step falls under the stuck threshold.
    pub walk_speed: f32,
}

pub const RESIDENTS: &[Resident] = &[
    Resident { tag: "courier",    home: Vec2::new(5.0, 5.0),    speed: SpeedClass::Fast,   walk_speed: 4.0 },
    Resident { tag: "errand_boy", home: Vec2::new(-5.0, 2.0),   speed: SpeedClass::Fast,   walk_speed: 3.6 },
    Resident { tag: "baker",      home: Vec2::new(18.0, 14.0),  speed: SpeedClass::Normal, walk_speed: 2.8 },
    Resident { tag: "smith",      home: Vec2::new(-25.0, -8.0), speed: SpeedClass::Normal, walk_speed: 2.6 },
    Resident { tag: "farmer",     home: Vec2::new(38.0, 20.0),  speed: SpeedClass::Normal, walk_speed: 2.4 },
    Resident { tag: "elder",      home: Vec2::new(-2.0, -20.0), speed: SpeedClass::Slow,   walk_speed: 1.6 },
    Resident { tag: "priest",     home: Vec2::new(25.0, -10.0), speed: SpeedClass::Slow,   walk_speed: 1.8 },
    Resident { tag: "fisher",     home: Vec2::new(-42.0, 28.0), speed: SpeedClass::Slow,   walk_speed: 1.5 },
];
