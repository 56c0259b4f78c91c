pub mod runner;

pub use runner::TownRunner;
pub use js_sys;
pub use town_engine;

/// Generate all `#[wasm_bindgen]` exports for a town game.
///
/// Generates:
/// - `thread_local!` storage for the TownRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, intents, collision
///   queries, buffer accessors, debug JSON)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use town_web::TownRunner;
///
/// mod game;
/// use game::MyTown;
///
/// town_web::export_town!(MyTown, "my-town");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `town_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in log messages
///
/// Calls made before `game_init()` are logged and answered with an empty
/// value rather than trapping.
#[macro_export]
macro_rules! export_town {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::TownRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::TownRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: called before game_init()", $game_name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::TownRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Intents ----

        #[wasm_bindgen]
        pub fn game_walk(entity: u32, dx: f32, dz: f32) {
            with_runner(|r| {
                r.push_intent($crate::town_engine::Intent::Walk {
                    entity: $crate::town_engine::EntityId(entity),
                    dx,
                    dz,
                })
            });
        }

        #[wasm_bindgen]
        pub fn game_replan(entity: u32) {
            with_runner(|r| {
                r.push_intent($crate::town_engine::Intent::Replan {
                    entity: $crate::town_engine::EntityId(entity),
                })
            });
        }

        #[wasm_bindgen]
        pub fn game_freeze_npcs(frozen: bool) {
            with_runner(|r| r.push_intent($crate::town_engine::Intent::FreezeNpcs { frozen }));
        }

        #[wasm_bindgen]
        pub fn game_set_solid(entity: u32, solid: bool) {
            with_runner(|r| {
                r.push_intent($crate::town_engine::Intent::SetSolid {
                    entity: $crate::town_engine::EntityId(entity),
                    solid,
                })
            });
        }

        // ---- Collision queries ----

        #[wasm_bindgen]
        pub fn can_move(x: f32, z: f32, radius: f32) -> bool {
            with_runner(|r| r.can_move(x, z, radius)).unwrap_or(false)
        }

        /// `[x, z, collided]`, or empty for an unknown entity.
        #[wasm_bindgen]
        pub fn validated_position(entity: u32, x: f32, z: f32) -> Vec<f32> {
            with_runner(|r| r.validated_position(entity, x, z))
                .flatten()
                .map(|v| vec![v.x(), v.z(), if v.collided { 1.0 } else { 0.0 }])
                .unwrap_or_default()
        }

        /// `[x, z]`, or empty when nothing nearby fits.
        #[wasm_bindgen]
        pub fn nearest_valid_position(x: f32, z: f32, radius: f32) -> Vec<f32> {
            with_runner(|r| r.nearest_valid_position(x, z, radius))
                .flatten()
                .map(|p| vec![p.x, p.y])
                .unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn entities_in_radius(x: f32, z: f32, radius: f32) -> $crate::js_sys::Array {
            let tags = with_runner(|r| r.entities_in_radius(x, z, radius)).unwrap_or_default();
            tags.into_iter().map(|tag| JsValue::from_str(&tag)).collect()
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_positions_ptr() -> *const f32 {
            with_runner(|r| r.positions_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_positions_len() -> u32 {
            with_runner(|r| r.positions_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_steering_ptr() -> *const f32 {
            with_runner(|r| r.steering_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_steering_len() -> u32 {
            with_runner(|r| r.steering_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_world_radius() -> f32 {
            with_runner(|r| r.world_radius()).unwrap_or(0.0)
        }

        // ---- Debug ----

        #[wasm_bindgen]
        pub fn collision_debug_json() -> String {
            with_runner(|r| r.collision_debug_json()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn npc_debug_json() -> String {
            with_runner(|r| r.npc_debug_json()).unwrap_or_default()
        }
    };
}
