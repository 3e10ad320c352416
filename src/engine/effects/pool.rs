// Effect pool: bounded free lists keyed by effect kind

use std::collections::HashMap;

use super::EffectKind;
use crate::engine::physics::Body;

/// Default number of idle bodies kept per effect kind
pub const DEFAULT_POOL_CAPACITY: usize = 32;

/// Source of effect bodies
pub trait EffectPool {
    /// Hand out a ready-to-place body, reused or freshly built
    fn acquire(&mut self, kind: EffectKind) -> Option<Body>;

    /// Take back a body that has left the world
    fn release(&mut self, body: Body);
}

/// Builds a fresh effect body, `None` if it cannot be created
pub type EffectFactory = Box<dyn FnMut() -> Option<Body>>;

/// Pool that recycles released bodies and falls back to a factory
pub struct RecyclingPool {
    capacity: usize,
    free: HashMap<EffectKind, Vec<Body>>,
    factories: HashMap<EffectKind, EffectFactory>,
    allocated: usize,
    reused: usize,
}

impl RecyclingPool {
    /// Create a pool keeping at most `capacity` idle bodies per kind
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: HashMap::new(),
            factories: HashMap::new(),
            allocated: 0,
            reused: 0,
        }
    }

    /// Register the factory used when no idle body of `kind` is left
    pub fn register<F>(&mut self, kind: EffectKind, factory: F)
    where
        F: FnMut() -> Option<Body> + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    /// Build `amount` bodies up front; returns how many were added
    pub fn preload(&mut self, kind: EffectKind, amount: usize) -> usize {
        let mut added = 0;
        for _ in 0..amount {
            if self.available(kind) >= self.capacity {
                break;
            }
            let Some(body) = self.build(kind) else {
                break;
            };
            self.free.entry(kind).or_default().push(body);
            added += 1;
        }
        log::debug!("Preloaded {} {:?} effect bodies", added, kind);
        added
    }

    /// Drop every idle body (scene setup and teardown)
    pub fn reset(&mut self) {
        self.free.clear();
        self.allocated = 0;
        self.reused = 0;
    }

    /// Idle bodies of a kind
    pub fn available(&self, kind: EffectKind) -> usize {
        self.free.get(&kind).map_or(0, Vec::len)
    }

    /// Bodies built by factories since the last reset
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Acquisitions served from idle bodies since the last reset
    pub fn reused(&self) -> usize {
        self.reused
    }

    fn build(&mut self, kind: EffectKind) -> Option<Body> {
        let factory = self.factories.get_mut(&kind)?;
        let mut body = factory()?;
        body.state.effect = Some(kind);
        self.allocated += 1;
        Some(body)
    }
}

impl Default for RecyclingPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl EffectPool for RecyclingPool {
    fn acquire(&mut self, kind: EffectKind) -> Option<Body> {
        let mut body = match self.free.get_mut(&kind).and_then(Vec::pop) {
            Some(body) => {
                self.reused += 1;
                body
            }
            None => self.build(kind)?,
        };
        body.recycle();
        Some(body)
    }

    fn release(&mut self, body: Body) {
        let Some(kind) = body.state.effect else {
            log::warn!("Released body {:?} does not belong to an effect pool", body.id());
            return;
        };
        let free = self.free.entry(kind).or_default();
        if free.len() < self.capacity {
            free.push(body);
        }
    }
}

/// Pool that never provides effects
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffects;

impl EffectPool for NoEffects {
    fn acquire(&mut self, _kind: EffectKind) -> Option<Body> {
        None
    }

    fn release(&mut self, _body: Body) {}
}
