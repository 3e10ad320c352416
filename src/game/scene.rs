// Game scene: owns the world state and drives one update per frame

use glam::Vec2;

use super::presets;
use super::rules::OutcomeRule;
use crate::core::config::PhysicsConfig;
use crate::core::math::Rect;
use crate::engine::effects::RecyclingPool;
use crate::engine::events::{WorldEvent, WorldEventQueue};
use crate::engine::game_loop::{GameLoop, SceneState, Transition};
use crate::engine::physics::{Body, BodyId, PhysicsWorld, StepEnv, StepStats};
use crate::engine::tiles::{DamageEngine, DamageReport, DamageSource, MapLayers, TileGrid, WorldError};

/// Summary of one call to [`GameScene::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// State after the frame
    pub state: SceneState,
    /// State change applied at the start of the frame
    pub transition: Option<Transition>,
    /// Seconds simulated, `None` if the scene did not run
    pub dt: Option<f32>,
    pub stats: Option<StepStats>,
    /// Bodies removed by housekeeping this frame
    pub cleaned: usize,
}

/// One level: tile grid, bodies, effect pool and the frame state machine
pub struct GameScene {
    config: PhysicsConfig,
    game_loop: GameLoop,
    grid: TileGrid,
    world: PhysicsWorld,
    effects: RecyclingPool,
    events: WorldEventQueue,
    rules: Vec<Box<dyn OutcomeRule>>,
    /// Area currently shown; cleanup removes bodies far outside it
    visible: Rect,
}

impl GameScene {
    /// Build a scene from the level's tile layers
    ///
    /// Fails if the configuration is invalid or the "World" layer is missing
    /// or empty. `seed` drives debris scatter.
    pub fn setup(config: PhysicsConfig, layers: &MapLayers, seed: u64) -> Result<Self, WorldError> {
        config.validate().map_err(WorldError::InvalidConfig)?;
        let map = layers.world()?;
        let grid = TileGrid::build(map, config.world_origin, config.tile_size, config.tile_health)?;
        let effects = presets::effect_pool(seed);
        let visible = grid.bounds();

        log::info!(
            "Scene ready: {}x{} tiles, {} solid",
            grid.columns(),
            grid.rows(),
            grid.solid_count()
        );

        Ok(Self {
            game_loop: GameLoop::from_config(&config),
            config,
            grid,
            world: PhysicsWorld::new(),
            effects,
            events: WorldEventQueue::new(),
            rules: Vec::new(),
            visible,
        })
    }

    /// Add a body; it joins the physics pipeline on the next frame
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.world.add_body(body)
    }

    /// Add a win/lose rule, evaluated after every simulated frame
    pub fn add_rule<R: OutcomeRule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Set the area currently on screen
    pub fn set_visible_area(&mut self, visible: Rect) {
        self.visible = visible;
    }

    /// Run one frame at `current_time` seconds
    pub fn update(&mut self, current_time: f64) -> FrameReport {
        let start = self.game_loop.begin_frame(current_time);
        if let Some(transition) = start.transition {
            self.record_transition(transition);
        }

        let mut report = FrameReport {
            state: self.game_loop.state(),
            transition: start.transition,
            dt: start.dt,
            stats: None,
            cleaned: 0,
        };
        let Some(dt) = start.dt else {
            return report;
        };

        let stats = self.world.step(
            dt,
            StepEnv {
                config: &self.config,
                grid: &mut self.grid,
                effects: &mut self.effects,
                events: &mut self.events,
            },
        );
        log::trace!("Frame {}: {:?}", self.game_loop.frame_count(), stats);
        if stats.pause_requested {
            self.game_loop.request_pause();
        }

        self.check_outcome();

        if self.game_loop.end_frame() {
            report.cleaned = self.remove_bodies_outside_view();
        }

        report.stats = Some(stats);
        report
    }

    fn check_outcome(&mut self) {
        for rule in &mut self.rules {
            if let Some(outcome) = rule.evaluate(&self.world, &self.grid) {
                self.game_loop.record_outcome(outcome);
                return;
            }
        }
    }

    /// Drop non-persistent bodies that drifted far outside the visible area
    fn remove_bodies_outside_view(&mut self) -> usize {
        let keep = self.visible.expand(self.config.remove_distance);
        let removed = self
            .world
            .remove_where(&mut self.effects, |body| !body.physics_frame().intersects(&keep));
        if removed > 0 {
            log::debug!("Cleanup removed {} bodies outside the view", removed);
        }
        removed
    }

    fn record_transition(&mut self, transition: Transition) {
        self.events.push(WorldEvent::StateChanged {
            from: transition.from,
            to: transition.to,
        });
    }

    /// The app came back to the foreground: pause before the next frame
    pub fn on_enter_foreground(&mut self) {
        self.game_loop.request_pause();
    }

    /// Pause at the start of the next frame
    pub fn request_pause(&mut self) {
        self.game_loop.request_pause();
    }

    /// Resume a paused scene; the next frame simulates zero time
    pub fn resume(&mut self) -> bool {
        match self.game_loop.resume() {
            Some(transition) => {
                self.record_transition(transition);
                true
            }
            None => false,
        }
    }

    /// Damage the grid from outside the frame pipeline (scripted explosions)
    pub fn apply_damage(&mut self, at: Vec2, source: &DamageSource) -> DamageReport {
        let mut spawns = Vec::new();
        let report = DamageEngine::new(
            &mut self.grid,
            &mut self.effects,
            &mut spawns,
            &mut self.events,
            self.config.debris_per_tile,
        )
        .apply_damage(at, source);

        for body in spawns {
            self.world.add_body(body);
        }
        report
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain()
    }

    /// Release every body and pooled effect
    pub fn teardown(&mut self) {
        self.world.clear();
        self.effects.reset();
        self.events.clear();
        self.rules.clear();
        log::info!("Scene torn down after {} frames", self.game_loop.frame_count());
    }

    pub fn state(&self) -> SceneState {
        self.game_loop.state()
    }

    pub fn game_loop(&self) -> &GameLoop {
        &self.game_loop
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn effects(&self) -> &RecyclingPool {
        &self.effects
    }

    pub fn visible_area(&self) -> Rect {
        self.visible
    }
}
