// Engine modules: tiles, physics, effects, events, frame loop

pub mod effects;
pub mod events;
pub mod game_loop;
pub mod physics;
pub mod tiles;
