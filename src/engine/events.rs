// World events raised during a frame for the presentation layer

use std::collections::HashSet;

use glam::Vec2;

use super::game_loop::SceneState;
use super::physics::{BodyId, Direction};

/// Something the simulation did that the outside world may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// A destructible tile lost health but is still standing
    TileDamaged { row: usize, column: usize, health: f32 },

    /// A tile was destroyed; its visual representation should be removed
    TileDestroyed { row: usize, column: usize, center: Vec2 },

    /// A body's sweep stopped against a solid tile
    WorldHit {
        body: BodyId,
        direction: Direction,
        point: Vec2,
    },

    /// Two bodies overlapped this frame
    BodyContact { first: BodyId, second: BodyId },

    /// The scene moved to a new state
    StateChanged { from: SceneState, to: SceneState },
}

/// Queue of events collected during frames until the presentation layer drains it
///
/// The host is expected to drain the queue every frame. Contacts that repeat
/// while nothing drains (a body resting on the ground, two bodies standing
/// inside each other) are kept once, so an undrained queue only grows with
/// tile and state changes.
#[derive(Debug, Default)]
pub struct WorldEventQueue {
    events: Vec<WorldEvent>,
    world_hits: HashSet<(BodyId, Direction)>,
    contacts: HashSet<(BodyId, BodyId)>,
}

impl WorldEventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            ..Self::default()
        }
    }

    /// Add an event
    ///
    /// Returns `false` if an identical contact is already pending.
    pub fn push(&mut self, event: WorldEvent) -> bool {
        let fresh = match event {
            WorldEvent::WorldHit { body, direction, .. } => self.world_hits.insert((body, direction)),
            WorldEvent::BodyContact { first, second } => self.contacts.insert((first, second)),
            _ => true,
        };
        if fresh {
            self.events.push(event);
        }
        fresh
    }

    /// Events collected since the last drain
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Take every pending event, leaving the queue empty
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        self.world_hits.clear();
        self.contacts.clear();
        std::mem::take(&mut self.events)
    }

    /// Drop all pending events
    pub fn clear(&mut self) {
        self.world_hits.clear();
        self.contacts.clear();
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
