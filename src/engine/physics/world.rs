// Physics world: body storage and the per-frame pipeline

use std::collections::BTreeMap;

use super::body::{Body, BodyId, BodyState};
use super::collision::{detect_contacts, resolve_contacts};
use super::context::{Commands, FrameContext};
use super::registry::BodyRegistry;
use super::sweep::sweep;
use crate::core::config::PhysicsConfig;
use crate::core::math::Rect;
use crate::engine::effects::EffectPool;
use crate::engine::events::{WorldEvent, WorldEventQueue};
use crate::engine::tiles::TileGrid;

/// Bodies owned by a world, iterated in insertion order
#[derive(Debug, Default)]
pub struct BodySet {
    bodies: BTreeMap<BodyId, Body>,
    next_id: u64,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a body and assign it a fresh id
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        self.next_id += 1;
        let id = BodyId(self.next_id);
        body.state.id = id;
        self.bodies.insert(id, body);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.values_mut()
    }

    /// Remove every body, returning them in insertion order
    pub fn drain(&mut self) -> Vec<Body> {
        std::mem::take(&mut self.bodies).into_values().collect()
    }
}

/// Scene resources the world borrows for one step
pub struct StepEnv<'a> {
    pub config: &'a PhysicsConfig,
    pub grid: &'a mut TileGrid,
    pub effects: &'a mut dyn EffectPool,
    pub events: &'a mut WorldEventQueue,
}

/// Counters describing one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Bodies picked up by the registry this step
    pub registered: usize,
    /// Hits reported by world collision
    pub world_hits: usize,
    /// Overlapping pairs found by body collision
    pub contacts: usize,
    /// Bodies added at the end of the step
    pub spawned: usize,
    /// Bodies removed at the end of the step
    pub removed: usize,
    /// A behavior asked the scene to pause
    pub pause_requested: bool,
}

/// Owns the bodies of a scene and runs the per-frame physics pipeline
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    bodies: BodySet,
    registry: BodyRegistry,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body; it joins the registry at the start of the next step
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.insert(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(id).map(|body| &body.state)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut BodyState> {
        self.bodies.get_mut(id).map(|body| &mut body.state)
    }

    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Remove a body immediately, returning effect bodies to their pool
    ///
    /// Only call this between steps; behaviors use
    /// [`FrameContext::despawn`] instead.
    pub fn remove_body(&mut self, id: BodyId, effects: &mut dyn EffectPool) -> bool {
        self.registry.unregister(id);
        let Some(body) = self.bodies.remove(id) else {
            return false;
        };
        if body.state.effect.is_some() {
            effects.release(body);
        }
        true
    }

    /// Remove every non-persistent body matching `predicate`
    pub fn remove_where<F>(&mut self, effects: &mut dyn EffectPool, predicate: F) -> usize
    where
        F: Fn(&BodyState) -> bool,
    {
        let doomed: Vec<_> = self
            .bodies
            .iter()
            .filter(|body| !body.state.persistent && predicate(&body.state))
            .map(Body::id)
            .collect();

        doomed
            .into_iter()
            .filter(|id| self.remove_body(*id, effects))
            .count()
    }

    /// Drop every body and forget all registrations
    pub fn clear(&mut self) {
        self.registry.unregister_all();
        let dropped = self.bodies.drain();
        log::debug!("Cleared {} bodies from the physics world", dropped.len());
    }

    /// Body-collision bodies whose frame overlaps `rect`
    pub fn bodies_colliding_with(&self, rect: &Rect) -> Vec<BodyId> {
        self.registry
            .affected_by_body_collision()
            .iter()
            .copied()
            .filter(|id| {
                self.bodies
                    .get(*id)
                    .is_some_and(|body| body.state.physics_frame().intersects(rect))
            })
            .collect()
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Pipeline order: pre-frame hooks and registration, gravity, spin,
    /// movement with world collision, body collision detection, body
    /// collision resolution, post-frame hooks. Spawns and removals requested
    /// along the way are applied last.
    pub fn step(&mut self, dt: f32, env: StepEnv<'_>) -> StepStats {
        let StepEnv {
            config,
            grid,
            effects,
            events,
        } = env;

        let mut stats = StepStats::default();
        let mut commands = Commands::new();
        {
            let mut ctx = FrameContext::new(dt, config, grid, effects, events, &mut commands);

            stats.registered = self.pre_frame(&mut ctx);
            self.apply_gravity(dt, config.gravity);
            self.apply_spin(dt);
            stats.world_hits = self.move_bodies(&mut ctx);

            let eligible = self.registry.affected_by_body_collision();
            stats.contacts = detect_contacts(&mut self.bodies, eligible);
            resolve_contacts(&mut self.bodies, eligible, &mut ctx);

            self.post_frame(&mut ctx);
        }

        stats.pause_requested = commands.pause_requested;
        let (spawned, removed) = self.apply_commands(commands, effects);
        stats.spawned = spawned;
        stats.removed = removed;
        stats
    }

    fn pre_frame(&mut self, ctx: &mut FrameContext<'_>) -> usize {
        let mut registered = 0;
        for body in self.bodies.iter_mut() {
            if !body.state.registered {
                self.registry.register(body.state.id, body.state.capabilities);
                body.state.registered = true;
                registered += 1;
            }
            body.pre_frame(ctx);
        }
        registered
    }

    fn apply_gravity(&mut self, dt: f32, gravity: f32) {
        for id in self.registry.affected_by_gravity() {
            if let Some(body) = self.bodies.get_mut(*id) {
                body.state.velocity.y += gravity * dt * body.state.gravitation_multiplier;
            }
        }
    }

    fn apply_spin(&mut self, dt: f32) {
        for id in self.registry.all() {
            let Some(body) = self.bodies.get_mut(*id) else {
                continue;
            };
            let state = &mut body.state;
            if let Some(spin) = state.spin.as_mut() {
                if spin.remaining > 0.0 {
                    state.rotation += spin.rate * dt;
                    spin.remaining -= dt;
                }
            }
        }
    }

    fn move_bodies(&mut self, ctx: &mut FrameContext<'_>) -> usize {
        for id in self.registry.all() {
            if let Some(body) = self.bodies.get_mut(*id) {
                if !body.state.capabilities.world_collision {
                    body.state.position += body.state.velocity * ctx.dt;
                }
            }
        }

        let mut hits = 0;
        for id in self.registry.affected_by_world_collision() {
            let Some(body) = self.bodies.get_mut(*id) else {
                continue;
            };
            if !body.state.capabilities.world_collision {
                continue;
            }

            let movement = body.state.velocity * ctx.dt;
            let result = sweep(&body.state, movement, ctx.grid, ctx.config.sensor_inset);
            body.state.position += result.movement;
            for hit in result.hits() {
                ctx.emit(WorldEvent::WorldHit {
                    body: *id,
                    direction: hit.direction,
                    point: hit.point,
                });
                body.hit_world(hit.direction, hit.point, ctx);
                hits += 1;
            }
        }
        hits
    }

    fn post_frame(&mut self, ctx: &mut FrameContext<'_>) {
        for id in self.registry.all() {
            if let Some(body) = self.bodies.get_mut(*id) {
                body.post_frame(ctx);
            }
        }
    }

    fn apply_commands(&mut self, commands: Commands, effects: &mut dyn EffectPool) -> (usize, usize) {
        let Commands {
            spawns, despawns, ..
        } = commands;

        let mut doomed = despawns;
        doomed.extend(
            self.bodies
                .iter()
                .filter(|body| body.state.removal_requested)
                .map(Body::id),
        );
        let removed = doomed
            .into_iter()
            .filter(|id| self.remove_body(*id, effects))
            .count();

        let spawned = spawns.len();
        for body in spawns {
            self.bodies.insert(body);
        }

        if spawned > 0 || removed > 0 {
            log::trace!("Applied frame commands: {} spawned, {} removed", spawned, removed);
        }
        (spawned, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::effects::{EffectKind, NoEffects, RecyclingPool};
    use crate::engine::physics::{
        BodyBehavior, BodyBuilder, BodySnapshot, BodyTag, Direction,
    };
    use crate::engine::tiles::TileMap;
    use approx::assert_relative_eq;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    struct Scene {
        config: PhysicsConfig,
        grid: TileGrid,
        effects: NoEffects,
        events: WorldEventQueue,
        world: PhysicsWorld,
    }

    impl Scene {
        fn new(lines: &[&str]) -> Self {
            let config = PhysicsConfig::default();
            let map = TileMap::from_ascii(lines).unwrap();
            let grid = TileGrid::build(&map, Vec2::ZERO, config.tile_size, config.tile_health).unwrap();
            Self {
                config,
                grid,
                effects: NoEffects,
                events: WorldEventQueue::new(),
                world: PhysicsWorld::new(),
            }
        }

        fn step(&mut self, dt: f32) -> StepStats {
            self.world.step(
                dt,
                StepEnv {
                    config: &self.config,
                    grid: &mut self.grid,
                    effects: &mut self.effects,
                    events: &mut self.events,
                },
            )
        }
    }

    #[derive(Default)]
    struct Log {
        hits: Vec<Direction>,
        contacts: Vec<BodyId>,
        frames: usize,
    }

    struct Watcher {
        log: Rc<RefCell<Log>>,
        spawn_on_contact: bool,
        pause_on_hit: bool,
    }

    impl Watcher {
        fn new(log: &Rc<RefCell<Log>>) -> Self {
            Self {
                log: log.clone(),
                spawn_on_contact: false,
                pause_on_hit: false,
            }
        }
    }

    impl BodyBehavior for Watcher {
        fn on_pre_frame(&mut self, _body: &mut BodyState, _ctx: &mut FrameContext<'_>) {
            self.log.borrow_mut().frames += 1;
        }

        fn on_world_hit(
            &mut self,
            _body: &mut BodyState,
            direction: Direction,
            _point: Vec2,
            ctx: &mut FrameContext<'_>,
        ) {
            self.log.borrow_mut().hits.push(direction);
            if self.pause_on_hit {
                ctx.request_pause();
            }
        }

        fn on_body_collision(
            &mut self,
            _body: &mut BodyState,
            other: &BodySnapshot,
            ctx: &mut FrameContext<'_>,
        ) {
            self.log.borrow_mut().contacts.push(other.id);
            if self.spawn_on_contact {
                ctx.spawn(BodyBuilder::new(BodyTag::Prop).position(500.0, 500.0).build());
            }
        }
    }

    #[test]
    fn test_gravity_integrates_velocity_and_position() {
        let mut scene = Scene::new(&["...."]);
        let id = scene.world.add_body(
            BodyBuilder::new(BodyTag::Prop)
                .position(100.0, 1000.0)
                .world_collision(false)
                .build(),
        );

        scene.step(DT);
        let body = scene.world.body(id).unwrap();
        assert_relative_eq!(body.velocity.y, -800.0 * DT);
        assert_relative_eq!(body.position.y, 1000.0 - 800.0 * DT * DT);
    }

    #[test]
    fn test_gravity_multiplier_scales_pull() {
        let mut scene = Scene::new(&["...."]);
        let light = scene.world.add_body(
            BodyBuilder::new(BodyTag::Debris)
                .position(0.0, 1000.0)
                .gravity(0.5)
                .world_collision(false)
                .build(),
        );
        let floating = scene.world.add_body(
            BodyBuilder::new(BodyTag::Projectile)
                .position(0.0, 1000.0)
                .velocity(100.0, 0.0)
                .gravity(0.0)
                .world_collision(false)
                .build(),
        );

        scene.step(DT);
        assert_relative_eq!(scene.world.body(light).unwrap().velocity.y, -400.0 * DT);
        let floating = scene.world.body(floating).unwrap();
        assert_eq!(floating.velocity, Vec2::new(100.0, 0.0));
        assert_relative_eq!(floating.position.x, 100.0 * DT);
    }

    #[test]
    fn test_falling_body_comes_to_rest_on_ground() {
        let mut scene = Scene::new(&["....", "....", "####"]);
        let log = Rc::new(RefCell::new(Log::default()));
        let id = scene.world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .position(96.0, 100.0)
                .size(32.0, 32.0)
                .behavior(Watcher::new(&log))
                .build(),
        );

        for _ in 0..120 {
            scene.step(DT);
            if let Some(body) = scene.world.body_mut(id) {
                // Landing behavior: stop falling once the ground is reached
                if log.borrow().hits.last() == Some(&Direction::Down) {
                    body.velocity.y = 0.0;
                }
            }
        }

        let body = scene.world.body(id).unwrap();
        assert!(body.physics_frame().min.y >= 64.0);
        assert!(body.physics_frame().min.y < 65.0);
        assert_eq!(log.borrow().frames, 120);
    }

    #[test]
    fn test_world_hits_are_reported_as_events() {
        let mut scene = Scene::new(&["....", "....", "####"]);
        let id = scene.world.add_body(
            BodyBuilder::new(BodyTag::Prop)
                .position(96.0, 85.0)
                .size(32.0, 32.0)
                .velocity(0.0, -600.0)
                .build(),
        );

        let stats = scene.step(DT);
        assert_eq!(stats.world_hits, 1);
        assert!(scene.events.events().iter().any(|event| matches!(
            event,
            WorldEvent::WorldHit { body, direction: Direction::Down, .. } if *body == id
        )));
    }

    #[test]
    fn test_only_world_collision_bodies_are_swept() {
        let mut scene = Scene::new(&["..#.", "..#.", "...."]);
        let solid = scene.world.add_body(
            BodyBuilder::new(BodyTag::Prop)
                .position(96.0, 96.0)
                .size(32.0, 32.0)
                .velocity(1200.0, 0.0)
                .gravity(0.0)
                .build(),
        );
        let ghost = scene.world.add_body(
            BodyBuilder::new(BodyTag::Effect)
                .position(96.0, 96.0)
                .size(32.0, 32.0)
                .velocity(1200.0, 0.0)
                .gravity(0.0)
                .world_collision(false)
                .build(),
        );

        let stats = scene.step(DT);
        assert_eq!(scene.world.registry().affected_by_world_collision(), &[solid]);
        assert_eq!(stats.world_hits, 1);
        // Right edge stops short of the wall at x = 128
        assert_eq!(scene.world.body(solid).unwrap().position.x, 111.0);
        assert_relative_eq!(scene.world.body(ghost).unwrap().position.x, 96.0 + 1200.0 * DT);
    }

    #[test]
    fn test_bodies_join_registry_on_first_step() {
        let mut scene = Scene::new(&["...."]);
        let id = scene.world.add_body(BodyBuilder::new(BodyTag::Prop).build());
        assert!(scene.world.registry().is_empty());

        let stats = scene.step(DT);
        assert_eq!(stats.registered, 1);
        assert!(scene.world.registry().contains(id));
        assert!(scene.world.body(id).unwrap().is_registered());

        let stats = scene.step(DT);
        assert_eq!(stats.registered, 0);
        assert_eq!(scene.world.registry().len(), 1);
    }

    #[test]
    fn test_contacts_fire_on_both_sides_and_clear() {
        let mut scene = Scene::new(&["...."]);
        let log_a = Rc::new(RefCell::new(Log::default()));
        let log_b = Rc::new(RefCell::new(Log::default()));
        let a = scene.world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .position(100.0, 500.0)
                .size(20.0, 20.0)
                .gravity(0.0)
                .behavior(Watcher::new(&log_a))
                .build(),
        );
        let b = scene.world.add_body(
            BodyBuilder::new(BodyTag::Prop)
                .position(110.0, 500.0)
                .size(20.0, 20.0)
                .gravity(0.0)
                .behavior(Watcher::new(&log_b))
                .build(),
        );

        let stats = scene.step(DT);
        assert_eq!(stats.contacts, 1);
        assert_eq!(log_a.borrow().contacts, vec![b]);
        assert_eq!(log_b.borrow().contacts, vec![a]);
        for id in [a, b] {
            assert!(scene.world.body(id).unwrap().pending_collisions().is_empty());
        }
    }

    #[test]
    fn test_spawns_are_deferred_to_the_next_frame() {
        let mut scene = Scene::new(&["...."]);
        let log = Rc::new(RefCell::new(Log::default()));
        let mut spawner = Watcher::new(&log);
        spawner.spawn_on_contact = true;
        scene.world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .position(100.0, 500.0)
                .size(20.0, 20.0)
                .gravity(0.0)
                .behavior(spawner)
                .build(),
        );
        scene.world.add_body(
            BodyBuilder::new(BodyTag::Prop)
                .position(105.0, 500.0)
                .size(20.0, 20.0)
                .gravity(0.0)
                .build(),
        );

        let stats = scene.step(DT);
        assert_eq!(stats.spawned, 1);
        assert_eq!(scene.world.len(), 3);
        assert_eq!(scene.world.registry().len(), 2);

        let stats = scene.step(DT);
        assert_eq!(stats.registered, 1);
    }

    #[test]
    fn test_removal_requests_apply_after_the_frame() {
        let mut scene = Scene::new(&["...."]);
        let id = scene.world.add_body(BodyBuilder::new(BodyTag::Prop).gravity(0.0).build());
        scene.step(DT);

        scene.world.body_mut(id).unwrap().remove_from_world();
        let stats = scene.step(DT);
        assert_eq!(stats.removed, 1);
        assert!(scene.world.body(id).is_none());
        assert!(!scene.world.registry().contains(id));
    }

    #[test]
    fn test_pause_request_is_reported() {
        let mut scene = Scene::new(&["....", "####"]);
        let log = Rc::new(RefCell::new(Log::default()));
        let mut probe = Watcher::new(&log);
        probe.pause_on_hit = true;
        scene.world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .position(96.0, 81.0)
                .size(32.0, 32.0)
                .velocity(0.0, -600.0)
                .behavior(probe)
                .build(),
        );

        assert!(scene.step(DT).pause_requested);
    }

    #[test]
    fn test_spin_runs_for_its_duration() {
        let mut scene = Scene::new(&["...."]);
        let id = scene.world.add_body(
            BodyBuilder::new(BodyTag::Debris)
                .gravity(0.0)
                .world_collision(false)
                .spin(6.0, 0.04)
                .build(),
        );

        for _ in 0..10 {
            scene.step(DT);
        }
        // Time left is still positive on the third frame, then the spin stops
        assert_relative_eq!(scene.world.body(id).unwrap().rotation, 6.0 * DT * 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_remove_where_releases_effects_and_keeps_persistent() {
        let mut world = PhysicsWorld::new();
        let mut pool = RecyclingPool::new(4);
        let effect = world.add_body(
            BodyBuilder::new(BodyTag::Effect)
                .effect(EffectKind::Dust)
                .position(5000.0, 0.0)
                .build(),
        );
        let kept = world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .persistent()
                .position(5000.0, 0.0)
                .build(),
        );
        let near = world.add_body(BodyBuilder::new(BodyTag::Prop).build());

        let removed = world.remove_where(&mut pool, |body| body.position.x > 1000.0);
        assert_eq!(removed, 1);
        assert!(world.body(effect).is_none());
        assert!(world.body(kept).is_some());
        assert!(world.body(near).is_some());
        assert_eq!(pool.available(EffectKind::Dust), 1);
    }

    #[test]
    fn test_bodies_colliding_with_rect() {
        let mut scene = Scene::new(&["...."]);
        let inside = scene.world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .position(50.0, 50.0)
                .size(10.0, 10.0)
                .gravity(0.0)
                .build(),
        );
        scene.world.add_body(
            BodyBuilder::new(BodyTag::Actor)
                .position(300.0, 50.0)
                .size(10.0, 10.0)
                .gravity(0.0)
                .build(),
        );
        scene.world.add_body(
            BodyBuilder::new(BodyTag::Effect)
                .position(50.0, 50.0)
                .body_collision(false)
                .gravity(0.0)
                .build(),
        );
        scene.step(DT);

        let found = scene
            .world
            .bodies_colliding_with(&Rect::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)));
        assert_eq!(found, vec![inside]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut scene = Scene::new(&["...."]);
        scene.world.add_body(BodyBuilder::new(BodyTag::Prop).build());
        scene.step(DT);

        scene.world.clear();
        assert!(scene.world.is_empty());
        assert!(scene.world.registry().is_empty());
    }
}
