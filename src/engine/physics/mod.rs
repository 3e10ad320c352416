// Physics system: tile sweeps, body contacts and the frame pipeline

pub mod body;
mod collision;
mod context;
mod registry;
mod sweep;
mod world;

pub use body::{
    Body, BodyBehavior, BodyBuilder, BodyId, BodySnapshot, BodyState, BodyTag, Capabilities,
    Direction, Inert, Spin,
};
pub use collision::{detect_contacts, resolve_contacts};
pub use context::{Commands, FrameContext};
pub use registry::BodyRegistry;
pub use sweep::{sweep, SweepResult, WorldHit};
pub use world::{BodySet, PhysicsWorld, StepEnv, StepStats};
