// Reusable effect bodies (debris, dust, smoke)
//
// Effects are short-lived bodies spawned in bursts. They are recycled through
// a pool instead of being rebuilt every time a tile breaks.

mod pool;

pub use pool::{EffectFactory, EffectPool, NoEffects, RecyclingPool, DEFAULT_POOL_CAPACITY};

/// Kind of pooled effect body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Small tile fragments falling out of a destroyed tile
    Debris,
    /// Dust cloud left where a tile was destroyed
    Dust,
    /// Smoke left by an explosion
    Smoke,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Debris, EffectKind::Dust, EffectKind::Smoke];
}
