use anyhow::Result;
use glam::Vec2;
use log::info;

use rocket_man::core::config::PhysicsConfig;
use rocket_man::core::math::Rect;
use rocket_man::engine::events::WorldEvent;
use rocket_man::engine::game_loop::SceneState;
use rocket_man::engine::physics::BodyId;
use rocket_man::engine::tiles::{MapLayers, TileMap, WORLD_LAYER};
use rocket_man::game::{presets, GameScene, RunnerStats, TrackedBodyRule};

/// Simulated display refresh rate
const FRAME_TIME: f64 = 1.0 / 60.0;
/// Give up if the level is not finished by then
const MAX_FRAMES: usize = 60 * 60;
/// The runner fires a bullet this often (in frames)
const FIRE_INTERVAL: usize = 20;
/// Frame at which the app is sent to the background and back
const BACKGROUND_AT: usize = 300;
/// Seconds spent in the background
const BACKGROUND_TIME: f64 = 30.0;

const LEVEL: &[&str] = &[
    "..............................",
    "..............................",
    "..............................",
    "..............#...............",
    ".........#....#.......##......",
    "##############################",
    "==============================",
];

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Rocket Man headless run...");

    let config = PhysicsConfig::default();
    let layers = MapLayers::new().with_layer(WORLD_LAYER, TileMap::from_ascii(LEVEL)?);
    let spawn_y = 2.0 * config.tile_size + 80.0;
    let mut scene = GameScene::setup(config, &layers, 2018)?;

    let runner = scene.add_body(presets::runner(120.0, spawn_y, RunnerStats::default()));
    let rule = TrackedBodyRule::across(runner, scene.grid());
    scene.add_rule(rule);

    let mut clock = 0.0;
    let mut destroyed = 0;
    let mut frames = 0;
    while frames < MAX_FRAMES && !scene.game_loop().is_game_over() {
        if frames == BACKGROUND_AT {
            info!("App backgrounded for {}s", BACKGROUND_TIME);
            scene.on_enter_foreground();
            scene.update(clock);
            clock += BACKGROUND_TIME;
            scene.resume();
        }

        if frames % FIRE_INTERVAL == 0 {
            fire_ahead(&mut scene, runner);
        }

        let report = scene.update(clock);
        if report.state == SceneState::Running {
            follow(&mut scene, runner);
        }

        for event in scene.drain_events() {
            match event {
                WorldEvent::TileDestroyed { row, column, .. } => {
                    destroyed += 1;
                    info!("Tile ({}, {}) destroyed", row, column);
                }
                WorldEvent::StateChanged { from, to } => info!("Scene {} -> {}", from, to),
                _ => {}
            }
        }

        clock += FRAME_TIME;
        frames += 1;
    }

    let pool = scene.effects();
    info!(
        "Finished after {} frames: {}, {} tiles destroyed, {} bodies, {} effects allocated ({} reused)",
        frames,
        scene.state(),
        destroyed,
        scene.world().len(),
        pool.allocated(),
        pool.reused()
    );

    scene.teardown();
    Ok(())
}

/// Shoot at the ground a few tiles ahead of the runner
fn fire_ahead(scene: &mut GameScene, runner: BodyId) {
    let Some(body) = scene.world().body(runner) else {
        return;
    };
    let from = presets::muzzle(body.position);
    let tile = scene.config().tile_size;
    let toward = Vec2::new(from.x + 3.0 * tile, tile);
    scene.add_body(presets::bullet(from, toward));
}

/// Keep the visible area centred on the runner
fn follow(scene: &mut GameScene, runner: BodyId) {
    let Some(body) = scene.world().body(runner) else {
        return;
    };
    let view = Rect::from_center_size(body.position, Vec2::new(1280.0, 720.0));
    scene.set_visible_area(view);
}
