pub mod collision;
pub mod grid;
pub mod scene;
pub mod time;
