// Game layer
//
// Concrete bodies built on top of the engine:
// - Runner and target actors
// - Projectiles that damage the tile grid
// - Pooled effect behaviors (debris, dust, smoke)
// - Win/lose rules and the scene that ties everything together

pub mod actors;
pub mod constants;
pub mod effects;
pub mod presets;
pub mod projectile;
pub mod rules;
pub mod scene;

// Re-export commonly used types
pub use actors::{Runner, RunnerStats, Target};
pub use projectile::Projectile;
pub use rules::{NoOutcome, OutcomeRule, TrackedBodyRule};
pub use scene::{FrameReport, GameScene};
