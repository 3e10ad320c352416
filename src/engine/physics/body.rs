// Simulation bodies: data, capability flags and behavior hooks

use glam::Vec2;
use std::fmt;

use super::context::FrameContext;
use crate::core::math::{sample_span, Rect};
use crate::engine::effects::EffectKind;
use crate::engine::tiles::DamageSource;

/// Handle identifying a body inside a [`PhysicsWorld`](super::PhysicsWorld)
///
/// Handles are handed out in increasing order, so sorting by id gives
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) u64);

impl BodyId {
    /// Placeholder carried by bodies that are not part of a world
    pub const UNASSIGNED: BodyId = BodyId(0);

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Physics passes a body opts into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Velocity is pulled down by gravity every frame
    pub gravity: bool,
    /// Movement is swept against solid tiles
    pub world_collision: bool,
    /// Overlaps with other bodies are reported
    pub body_collision: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        gravity: false,
        world_collision: false,
        body_collision: false,
    };

    pub const ALL: Capabilities = Capabilities {
        gravity: true,
        world_collision: true,
        body_collision: true,
    };
}

/// Direction of travel, also naming the edge that leads in that direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Leading direction on the vertical axis for a signed movement
    pub fn vertical(delta: f32) -> Self {
        if delta < 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Leading direction on the horizontal axis for a signed movement
    pub fn horizontal(delta: f32) -> Self {
        if delta < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Coarse role of a body, used by behaviors to decide how to react to contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyTag {
    Actor,
    Enemy,
    Projectile,
    Debris,
    Effect,
    Prop,
}

/// Continuous rotation applied for a limited time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Radians per second
    pub rate: f32,
    /// Seconds left
    pub remaining: f32,
}

/// Physical state of a body
#[derive(Debug, Clone)]
pub struct BodyState {
    pub(crate) id: BodyId,
    pub tag: BodyTag,

    // Kinematics
    /// Center of the body in world space
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub spin: Option<Spin>,
    /// Scales gravity for this body (1.0 = normal)
    pub gravitation_multiplier: f32,

    // Shape
    /// Visual size of the body
    pub size: Vec2,
    /// Fraction of `size` used for the physics frame
    pub frame_scale: Vec2,

    pub capabilities: Capabilities,
    /// Damage dealt when this body hits something
    pub damage: Option<DamageSource>,
    /// Pool the body returns to when it leaves the world
    pub effect: Option<EffectKind>,
    /// Persistent bodies survive the out-of-view cleanup
    pub persistent: bool,

    pub(crate) pending: Vec<BodyId>,
    pub(crate) registered: bool,
    pub(crate) removal_requested: bool,
}

impl BodyState {
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Axis-aligned collision frame centered on the body
    pub fn physics_frame(&self) -> Rect {
        Rect::from_center_size(self.position, self.size * self.frame_scale)
    }

    /// Sample points along one edge of the physics frame
    ///
    /// Points are pulled `inset` units in from the corners so a body resting
    /// against a wall does not sense that wall through its floor sensors, and
    /// are never further apart than `spacing`.
    pub fn sensor_points(&self, edge: Direction, spacing: f32, inset: f32) -> Vec<Vec2> {
        let frame = self.physics_frame();
        match edge {
            Direction::Down | Direction::Up => {
                let y = if edge == Direction::Down {
                    frame.min.y
                } else {
                    frame.max.y
                };
                sample_span(frame.min.x + inset, frame.max.x - inset, spacing)
                    .into_iter()
                    .map(|x| Vec2::new(x, y))
                    .collect()
            }
            Direction::Left | Direction::Right => {
                let x = if edge == Direction::Left {
                    frame.min.x
                } else {
                    frame.max.x
                };
                sample_span(frame.min.y + inset, frame.max.y - inset, spacing)
                    .into_iter()
                    .map(|y| Vec2::new(x, y))
                    .collect()
            }
        }
    }

    /// Whether the body has been picked up by the registry yet
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Bodies detected as overlapping this one and not yet resolved
    pub fn pending_collisions(&self) -> &[BodyId] {
        &self.pending
    }

    /// Ask for the body to leave the world at the end of the frame
    pub fn remove_from_world(&mut self) {
        self.removal_requested = true;
    }

    pub fn is_removal_requested(&self) -> bool {
        self.removal_requested
    }

    /// Read-only copy handed to the other side of a contact
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            tag: self.tag,
            position: self.position,
            velocity: self.velocity,
            frame: self.physics_frame(),
            damage: self.damage,
        }
    }
}

/// Copy of the parts of a body another body may look at during a contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub tag: BodyTag,
    pub position: Vec2,
    pub velocity: Vec2,
    pub frame: Rect,
    pub damage: Option<DamageSource>,
}

/// Per-body reactions to the physics pipeline
///
/// Every hook has an empty default, so a behavior only implements what it
/// reacts to.
pub trait BodyBehavior {
    /// Runs before integration, every frame the world is simulated
    fn on_pre_frame(&mut self, _body: &mut BodyState, _ctx: &mut FrameContext<'_>) {}

    /// Runs after collisions are resolved
    fn on_post_frame(&mut self, _body: &mut BodyState, _ctx: &mut FrameContext<'_>) {}

    /// The sweep stopped against a solid tile at `point`
    fn on_world_hit(
        &mut self,
        _body: &mut BodyState,
        _direction: Direction,
        _point: Vec2,
        _ctx: &mut FrameContext<'_>,
    ) {
    }

    /// The body's frame overlapped `other` this frame
    fn on_body_collision(
        &mut self,
        _body: &mut BodyState,
        _other: &BodySnapshot,
        _ctx: &mut FrameContext<'_>,
    ) {
    }

    /// A pooled body is about to be handed out again
    fn on_reuse(&mut self, _body: &mut BodyState) {}
}

/// Behavior that ignores every hook
#[derive(Debug, Default, Clone, Copy)]
pub struct Inert;

impl BodyBehavior for Inert {}

/// A body: physical state plus the behavior reacting to it
pub struct Body {
    pub state: BodyState,
    behavior: Box<dyn BodyBehavior>,
}

impl Body {
    pub fn id(&self) -> BodyId {
        self.state.id
    }

    pub(crate) fn pre_frame(&mut self, ctx: &mut FrameContext<'_>) {
        self.behavior.on_pre_frame(&mut self.state, ctx);
    }

    pub(crate) fn post_frame(&mut self, ctx: &mut FrameContext<'_>) {
        self.behavior.on_post_frame(&mut self.state, ctx);
    }

    pub(crate) fn hit_world(&mut self, direction: Direction, point: Vec2, ctx: &mut FrameContext<'_>) {
        self.behavior.on_world_hit(&mut self.state, direction, point, ctx);
    }

    pub(crate) fn collided(&mut self, other: &BodySnapshot, ctx: &mut FrameContext<'_>) {
        self.behavior.on_body_collision(&mut self.state, other, ctx);
    }

    /// Clear world bookkeeping so a released body can be handed out again
    pub(crate) fn recycle(&mut self) {
        self.state.id = BodyId::UNASSIGNED;
        self.state.pending.clear();
        self.state.registered = false;
        self.state.removal_requested = false;
        self.behavior.on_reuse(&mut self.state);
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").field("state", &self.state).finish_non_exhaustive()
    }
}

/// Builder for bodies with common configurations
pub struct BodyBuilder {
    tag: BodyTag,
    position: Vec2,
    velocity: Vec2,
    rotation: f32,
    spin: Option<Spin>,
    gravitation_multiplier: f32,
    size: Vec2,
    frame_scale: Vec2,
    capabilities: Capabilities,
    damage: Option<DamageSource>,
    effect: Option<EffectKind>,
    persistent: bool,
    behavior: Box<dyn BodyBehavior>,
}

impl BodyBuilder {
    /// Create a builder for a body taking part in every physics pass
    pub fn new(tag: BodyTag) -> Self {
        Self {
            tag,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            spin: None,
            gravitation_multiplier: 1.0,
            size: Vec2::ONE,
            frame_scale: Vec2::ONE,
            capabilities: Capabilities::ALL,
            damage: None,
            effect: None,
            persistent: false,
            behavior: Box::new(Inert),
        }
    }

    /// Set the initial center position
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Set the initial velocity
    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    /// Set the initial rotation (radians)
    pub fn rotation(mut self, angle: f32) -> Self {
        self.rotation = angle;
        self
    }

    /// Rotate continuously at `rate` radians per second for `duration` seconds
    pub fn spin(mut self, rate: f32, duration: f32) -> Self {
        self.spin = Some(Spin {
            rate,
            remaining: duration,
        });
        self
    }

    /// Set the visual size
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    /// Set the fraction of the size used for the physics frame
    pub fn frame_scale(mut self, x: f32, y: f32) -> Self {
        self.frame_scale = Vec2::new(x, y);
        self
    }

    /// Set the gravity multiplier; zero also drops the gravity capability
    pub fn gravity(mut self, multiplier: f32) -> Self {
        self.gravitation_multiplier = multiplier;
        self.capabilities.gravity = multiplier != 0.0;
        self
    }

    /// Opt in or out of sweeping against solid tiles
    pub fn world_collision(mut self, enabled: bool) -> Self {
        self.capabilities.world_collision = enabled;
        self
    }

    /// Opt in or out of body-to-body contacts
    pub fn body_collision(mut self, enabled: bool) -> Self {
        self.capabilities.body_collision = enabled;
        self
    }

    /// Attach a damage source
    pub fn damage(mut self, source: DamageSource) -> Self {
        self.damage = Some(source);
        self
    }

    /// Mark the body as belonging to an effect pool
    pub fn effect(mut self, kind: EffectKind) -> Self {
        self.effect = Some(kind);
        self
    }

    /// Keep the body through out-of-view cleanup
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Set the behavior reacting to physics hooks
    pub fn behavior<B: BodyBehavior + 'static>(mut self, behavior: B) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    /// Build the body
    pub fn build(self) -> Body {
        Body {
            state: BodyState {
                id: BodyId::UNASSIGNED,
                tag: self.tag,
                position: self.position,
                velocity: self.velocity,
                rotation: self.rotation,
                spin: self.spin,
                gravitation_multiplier: self.gravitation_multiplier,
                size: self.size,
                frame_scale: self.frame_scale,
                capabilities: self.capabilities,
                damage: self.damage,
                effect: self.effect,
                persistent: self.persistent,
                pending: Vec::new(),
                registered: false,
                removal_requested: false,
            },
            behavior: self.behavior,
        }
    }
}
