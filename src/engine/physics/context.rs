// Frame context handed to body behaviors

use glam::Vec2;

use super::body::{Body, BodyId};
use crate::core::config::PhysicsConfig;
use crate::engine::effects::{EffectKind, EffectPool};
use crate::engine::events::{WorldEvent, WorldEventQueue};
use crate::engine::tiles::{DamageEngine, DamageReport, DamageSource, TileGrid};

/// Structural changes requested during a frame, applied once it completes
#[derive(Debug, Default)]
pub struct Commands {
    pub(crate) spawns: Vec<Body>,
    pub(crate) despawns: Vec<BodyId>,
    pub(crate) pause_requested: bool,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.despawns.is_empty() && !self.pause_requested
    }

    /// Bodies queued for insertion
    pub fn spawns(&self) -> &[Body] {
        &self.spawns
    }

    pub fn pause_requested(&self) -> bool {
        self.pause_requested
    }
}

/// Everything a behavior may touch while the world is being stepped
///
/// Bodies spawned or removed through the context only join or leave the
/// world once the current frame is complete.
pub struct FrameContext<'a> {
    /// Seconds integrated this frame
    pub dt: f32,
    pub config: &'a PhysicsConfig,
    pub grid: &'a mut TileGrid,
    pub effects: &'a mut dyn EffectPool,
    pub events: &'a mut WorldEventQueue,
    commands: &'a mut Commands,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        dt: f32,
        config: &'a PhysicsConfig,
        grid: &'a mut TileGrid,
        effects: &'a mut dyn EffectPool,
        events: &'a mut WorldEventQueue,
        commands: &'a mut Commands,
    ) -> Self {
        Self {
            dt,
            config,
            grid,
            effects,
            events,
            commands,
        }
    }

    /// Add a body to the world after this frame
    pub fn spawn(&mut self, body: Body) {
        self.commands.spawns.push(body);
    }

    /// Remove a body from the world after this frame
    pub fn despawn(&mut self, id: BodyId) {
        if !self.commands.despawns.contains(&id) {
            self.commands.despawns.push(id);
        }
    }

    /// Take an effect body from the pool and place it at `at`
    ///
    /// Returns `false` when the pool could not provide one; the effect is
    /// then simply skipped.
    pub fn spawn_effect(&mut self, kind: EffectKind, at: Vec2) -> bool {
        match self.effects.acquire(kind) {
            Some(mut body) => {
                body.state.position = at;
                self.spawn(body);
                true
            }
            None => {
                log::debug!("No {:?} effect available, skipping", kind);
                false
            }
        }
    }

    /// Damage the tile grid at a world position
    pub fn apply_damage(&mut self, at: Vec2, source: &DamageSource) -> DamageReport {
        let mut engine = DamageEngine::new(
            self.grid,
            self.effects,
            &mut self.commands.spawns,
            self.events,
            self.config.debris_per_tile,
        );
        engine.apply_damage(at, source)
    }

    /// Ask the scene to pause; takes effect at the start of the next frame
    pub fn request_pause(&mut self) {
        self.commands.pause_requested = true;
    }

    /// Record an event for the presentation layer
    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }
}
