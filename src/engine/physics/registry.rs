// Scene-scoped lists of bodies partitioned by capability

use std::collections::HashSet;

use super::body::{BodyId, Capabilities};

/// Registry of bodies taking part in the physics pipeline
///
/// Every list keeps registration order. A body appears at most once in each
/// list it qualifies for.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    members: HashSet<BodyId>,
    all: Vec<BodyId>,
    gravity: Vec<BodyId>,
    world_collision: Vec<BodyId>,
    body_collision: Vec<BodyId>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body to the master list and every capability list it qualifies for
    ///
    /// Returns `false` if the body was already registered.
    pub fn register(&mut self, id: BodyId, capabilities: Capabilities) -> bool {
        if !self.members.insert(id) {
            return false;
        }

        self.all.push(id);
        if capabilities.gravity {
            self.gravity.push(id);
        }
        if capabilities.world_collision {
            self.world_collision.push(id);
        }
        if capabilities.body_collision {
            self.body_collision.push(id);
        }
        true
    }

    /// Remove a body from every list
    pub fn unregister(&mut self, id: BodyId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }

        self.all.retain(|other| *other != id);
        self.gravity.retain(|other| *other != id);
        self.world_collision.retain(|other| *other != id);
        self.body_collision.retain(|other| *other != id);
        true
    }

    /// Forget every body (scene setup and teardown)
    pub fn unregister_all(&mut self) {
        self.members.clear();
        self.all.clear();
        self.gravity.clear();
        self.world_collision.clear();
        self.body_collision.clear();
    }

    pub fn all(&self) -> &[BodyId] {
        &self.all
    }

    pub fn affected_by_gravity(&self) -> &[BodyId] {
        &self.gravity
    }

    pub fn affected_by_world_collision(&self) -> &[BodyId] {
        &self.world_collision
    }

    pub fn affected_by_body_collision(&self) -> &[BodyId] {
        &self.body_collision
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
