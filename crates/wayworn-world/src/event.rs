//! Collision events delivered by the host and the observer they are sent to.

use glam::{DVec3, Vec2};
use wayworn_core::{BlockPos, GridAccess};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Survival,
    Creative,
    Spectator,
    Guest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player(GameMode),
    /// A non-player agent (animal, monster, NPC).
    Creature,
    /// Anything that is not an agent: items, projectiles, falling blocks.
    Passive,
}

/// Block face an entity collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
    North,
    East,
    South,
    West,
}

/// Axis-aligned entity bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl EntityBox {
    /// Whether the horizontal centre of the block at `pos` lies inside the box's x/z footprint.
    pub fn covers_block_centre(&self, pos: BlockPos) -> bool {
        let cx = pos.x as f64 + 0.5;
        let cz = pos.z as f64 + 0.5;
        cx >= self.min.x && cx <= self.max.x && cz >= self.min.z && cz <= self.max.z
    }
}

/// One entity touching one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity_id: u64,
    pub entity_kind: EntityKind,
    pub alive: bool,
    /// Entity feet position.
    pub entity_pos: DVec3,
    pub bounds: EntityBox,
    /// Collision box size: `x` is the width, `y` the height.
    pub hull_size: Vec2,
    pub block_pos: BlockPos,
    pub facing: Facing,
}

/// Receives every entity/block collision the host detects.
pub trait CollisionObserver {
    fn on_entity_collide(&mut self, grid: &mut dyn GridAccess, event: &CollisionEvent);
}
