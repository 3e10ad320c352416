// Rocket Man: per-frame physics of a destructible 2D side-scroller

pub mod core;
pub mod engine;
pub mod game;
