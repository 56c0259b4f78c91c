use wasm_bindgen::prelude::*;

mod game;
mod town;

use game::TownStroll;

town_web::export_town!(TownStroll, "town-stroll");
