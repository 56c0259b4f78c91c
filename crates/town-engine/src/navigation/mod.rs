pub mod destination;
pub mod pathfinder;
